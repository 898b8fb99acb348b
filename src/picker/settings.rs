use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;

/// Tuning for the active-device picker
///
/// Every field is independently optional when loaded from TOML; missing fields
/// fall back to [`PickerSettings::default`]. No value is rejected: zero or
/// negative values only change how eagerly the picker reacts.
///
/// # Examples
///
/// ```rust
/// use activepad::picker::PickerSettings;
///
/// // GameCube adapters drift more, so widen the deadzone
/// let adapter_settings = PickerSettings {
///     deadzone: 0.35,
///     ..PickerSettings::default()
/// };
/// assert_eq!(adapter_settings.switch_debounce_frames, 6);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerSettings {
    /// Minimum per-axis delta counted as movement
    pub deadzone: f32,

    /// Multiplier for the portion of an axis delta beyond the deadzone
    pub axis_weight: f32,

    /// Minimum score treated as real activity, about one full button press
    pub min_score: f32,

    /// Fail-safe window after a device becomes the active lock
    #[serde(deserialize_with = "clamped_u64")]
    pub hold_ms: u64,

    /// Consecutive ticks a challenger must win before the switch commits
    #[serde(deserialize_with = "clamped_u32")]
    pub switch_debounce_frames: u32,

    /// How far a challenger must out-score the current device on each tick
    pub score_margin: f32,
}

impl PickerSettings {
    pub fn hold_duration(&self) -> Duration {
        Duration::from_millis(self.hold_ms)
    }
}

// Negative counts from a config file mean "none" rather than a parse error
fn clamped_u64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(value.max(0) as u64)
}

fn clamped_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = i64::deserialize(deserializer)?;
    Ok(value.clamp(0, u32::MAX as i64) as u32)
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            deadzone: 0.25,
            axis_weight: 0.5,
            min_score: 1.0,
            hold_ms: 5000,
            switch_debounce_frames: 6,
            score_margin: 0.5,
        }
    }
}
