//! Device snapshots and identity keys
//!
//! A [`DeviceSnapshot`] is one polling sample of one connected device. Its identity
//! is the pair of slot index and reported id, exposed as [`DeviceKey`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One tick's reading of a single connected device
///
/// `buttons` and `axes` may have any length, including zero. Devices that report
/// fewer inputs simply contribute nothing for the missing ones.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    /// Slot index, stable while connected and reused after disconnect
    pub index: usize,
    /// Opaque make/model string
    pub id: String,
    /// Pressed state per button
    #[serde(default)]
    pub buttons: Vec<bool>,
    /// Axis values, nominally in [-1, 1]
    #[serde(default)]
    pub axes: Vec<f32>,
}

impl DeviceSnapshot {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
            buttons: Vec::new(),
            axes: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<bool>) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_axes(mut self, axes: Vec<f32>) -> Self {
        self.axes = axes;
        self
    }

    /// Owned identity of this device
    pub fn key(&self) -> DeviceKey {
        DeviceKey {
            index: self.index,
            id: self.id.clone(),
        }
    }

    /// Compares identity without allocating a key
    pub fn matches(&self, key: &DeviceKey) -> bool {
        self.index == key.index && self.id == key.id
    }
}

/// Identity of a connected device: slot index plus reported id
///
/// Renders as `"{index}:{id}"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DeviceKey {
    pub index: usize,
    pub id: String,
}

impl DeviceKey {
    pub fn new(index: usize, id: impl Into<String>) -> Self {
        Self {
            index,
            id: id.into(),
        }
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.id)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum KeyParseError {
    #[error("Missing ':' separator in device key: {0}")]
    MissingSeparator(String),

    #[error("Invalid slot index in device key: {0}")]
    InvalidIndex(String),
}

impl FromStr for DeviceKey {
    type Err = KeyParseError;

    // Ids may contain ':' themselves, so only the first one separates
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (index, id) = s
            .split_once(':')
            .ok_or_else(|| KeyParseError::MissingSeparator(s.to_string()))?;
        let index = index
            .trim()
            .parse::<usize>()
            .map_err(|_| KeyParseError::InvalidIndex(s.to_string()))?;
        Ok(Self::new(index, id))
    }
}

/// Previous-tick sample retained per slot index for delta scoring
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct HistoryEntry {
    pub(crate) axes: Vec<f32>,
    pub(crate) buttons: Vec<bool>,
}

impl From<&DeviceSnapshot> for HistoryEntry {
    fn from(snapshot: &DeviceSnapshot) -> Self {
        Self {
            axes: snapshot.axes.clone(),
            buttons: snapshot.buttons.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_renders_index_and_id() {
        let key = DeviceKey::new(2, "Xbox Wireless Controller");
        assert_eq!(key.to_string(), "2:Xbox Wireless Controller");
    }

    #[test]
    fn key_parse_splits_at_first_colon() {
        let key: DeviceKey = "1:USB GamePad (Vendor: 0079 Product: 0006)".parse().unwrap();
        assert_eq!(key.index, 1);
        assert_eq!(key.id, "USB GamePad (Vendor: 0079 Product: 0006)");
    }

    #[test]
    fn key_parse_rejects_malformed_input() {
        assert_eq!(
            "no-separator".parse::<DeviceKey>(),
            Err(KeyParseError::MissingSeparator("no-separator".to_string()))
        );
        assert_eq!(
            "x:pad".parse::<DeviceKey>(),
            Err(KeyParseError::InvalidIndex("x:pad".to_string()))
        );
    }

    #[test]
    fn snapshot_matches_only_same_index_and_id() {
        let pad = DeviceSnapshot::new(0, "pad");
        assert!(pad.matches(&DeviceKey::new(0, "pad")));
        assert!(!pad.matches(&DeviceKey::new(1, "pad")));
        assert!(!pad.matches(&DeviceKey::new(0, "other")));
    }

    #[test]
    fn history_is_a_value_copy() {
        let mut pad = DeviceSnapshot::new(0, "pad")
            .with_axes(vec![0.5])
            .with_buttons(vec![true]);
        let history = HistoryEntry::from(&pad);
        pad.axes[0] = -1.0;
        pad.buttons[0] = false;
        assert_eq!(history.axes, vec![0.5]);
        assert_eq!(history.buttons, vec![true]);
    }

    #[test]
    fn missing_inputs_deserialize_as_empty() {
        let pad: DeviceSnapshot = toml::from_str("index = 3\nid = \"adapter\"").unwrap();
        assert!(pad.buttons.is_empty());
        assert!(pad.axes.is_empty());
    }
}
