use std::borrow::Cow;
use std::collections::HashMap;
use std::time::Instant;
use tracing::{debug, info};

use super::scoring::activity_score;
use super::settings::PickerSettings;
use super::snapshot::{DeviceKey, DeviceSnapshot, HistoryEntry};

/// Which rule produced a selection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectionReason {
    /// The caller's preferred device is connected
    Preferred,
    /// The locked device is still connected and no challenger won
    Retained,
    /// A challenger out-scored the locked device long enough to take over
    Switched,
    /// Nothing was locked (or the lock vanished) and this device showed real activity
    Claimed,
    /// The locked device is absent but still inside its hold window
    Held,
}

/// The device reported for one tick
///
/// `device` borrows the caller's snapshot for every reason except
/// [`SelectionReason::Held`], where the device is missing from the input and
/// the picker reports its last seen copy instead.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection<'a> {
    pub device: Cow<'a, DeviceSnapshot>,
    pub reason: SelectionReason,
}

impl Selection<'_> {
    pub fn key(&self) -> DeviceKey {
        self.device.key()
    }
}

#[derive(Debug, Default)]
struct Challenger {
    key: Option<DeviceKey>,
    frames: u32,
}

impl Challenger {
    fn clear(&mut self) {
        self.key = None;
        self.frames = 0;
    }

    // Returns the streak length including this tick
    fn record(&mut self, key: &DeviceKey) -> u32 {
        if self.key.as_ref() == Some(key) {
            self.frames += 1;
        } else {
            self.key = Some(key.clone());
            self.frames = 1;
        }
        self.frames
    }
}

/// Picks the one active device out of all connected devices, tick by tick
///
/// Scores each device by what changed since its previous sample, then applies
/// hysteresis: once a device is locked it stays active until another device
/// out-scores it by [`PickerSettings::score_margin`] for
/// [`PickerSettings::switch_debounce_frames`] consecutive ticks. Idle noise from
/// always-on adapters therefore never steals the selection.
///
/// Each instance owns its state; independent pickers do not interfere.
///
/// # Examples
///
/// ```rust
/// use activepad::picker::{ActivePadPicker, DeviceSnapshot, PickerSettings};
///
/// let mut picker = ActivePadPicker::new(PickerSettings::default());
/// let pads = vec![
///     DeviceSnapshot::new(0, "idle adapter").with_axes(vec![0.0, 0.0]),
///     DeviceSnapshot::new(1, "gamepad").with_buttons(vec![true, false]),
/// ];
///
/// let active = picker.tick(&pads, None).map(|s| s.key().to_string());
/// assert_eq!(active.as_deref(), Some("1:gamepad"));
/// ```
#[derive(Debug)]
pub struct ActivePadPicker {
    settings: PickerSettings,

    // Previous sample per slot index, not per key
    history: HashMap<usize, HistoryEntry>,

    current_key: Option<DeviceKey>,
    last_seen: Option<DeviceSnapshot>,
    hold_until: Option<Instant>,
    challenger: Challenger,
}

impl ActivePadPicker {
    pub fn new(settings: PickerSettings) -> Self {
        debug!("Creating active pad picker with settings: {:?}", settings);
        Self {
            settings,
            history: HashMap::new(),
            current_key: None,
            last_seen: None,
            hold_until: None,
            challenger: Challenger::default(),
        }
    }

    pub fn settings(&self) -> &PickerSettings {
        &self.settings
    }

    /// Key of the locked device, if any; it may currently be disconnected
    pub fn current_key(&self) -> Option<&DeviceKey> {
        self.current_key.as_ref()
    }

    /// Runs one tick against the monotonic clock
    pub fn tick<'a>(
        &mut self,
        pads: &'a [DeviceSnapshot],
        preferred: Option<&DeviceKey>,
    ) -> Option<Selection<'a>> {
        self.tick_at(pads, preferred, Instant::now())
    }

    /// Runs one tick with `now` used for every time comparison
    pub fn tick_at<'a>(
        &mut self,
        pads: &'a [DeviceSnapshot],
        preferred: Option<&DeviceKey>,
        now: Instant,
    ) -> Option<Selection<'a>> {
        let scores = self.score_and_remember(pads);

        let mut best: Option<usize> = None;
        let mut best_score = 0.0;
        for (i, &score) in scores.iter().enumerate() {
            if score > best_score {
                best = Some(i);
                best_score = score;
            }
        }

        if let Some(preferred) = preferred {
            if let Some(pos) = pads.iter().position(|p| p.matches(preferred)) {
                if self.current_key.as_ref() != Some(preferred) {
                    info!("Preferred device {} is now active", preferred);
                }
                return Some(self.lock(pads, pos, now, SelectionReason::Preferred));
            }
            debug!("Preferred device {} is not connected, ignoring", preferred);
        }

        if let Some(current_pos) = self.current_position(pads) {
            return Some(self.arbitrate(pads, current_pos, best, best_score, now));
        }

        if let Some(best) = best.filter(|_| best_score >= self.settings.min_score) {
            info!(
                "Claiming {} as active device (score {:.2})",
                pads[best].key(),
                best_score
            );
            return Some(self.lock(pads, best, now, SelectionReason::Claimed));
        }

        if let (Some(hold_until), Some(last_seen)) = (self.hold_until, self.last_seen.as_ref()) {
            if now < hold_until {
                debug!("Holding absent device {}", last_seen.key());
                return Some(Selection {
                    device: Cow::Owned(last_seen.clone()),
                    reason: SelectionReason::Held,
                });
            }
        }

        None
    }

    // Scores every pad against its slot history, then overwrites the history
    fn score_and_remember(&mut self, pads: &[DeviceSnapshot]) -> Vec<f32> {
        pads.iter()
            .map(|pad| {
                let score = activity_score(self.history.get(&pad.index), pad, &self.settings);
                self.history.insert(pad.index, HistoryEntry::from(pad));
                score
            })
            .collect()
    }

    fn current_position(&self, pads: &[DeviceSnapshot]) -> Option<usize> {
        let key = self.current_key.as_ref()?;
        pads.iter().position(|p| p.matches(key))
    }

    fn arbitrate<'a>(
        &mut self,
        pads: &'a [DeviceSnapshot],
        current_pos: usize,
        best: Option<usize>,
        best_score: f32,
        now: Instant,
    ) -> Selection<'a> {
        let challenger =
            best.filter(|&b| b != current_pos && best_score >= self.settings.min_score);

        let Some(challenger) = challenger else {
            self.challenger.clear();
            return self.retain(pads, current_pos);
        };

        // History already holds this tick, so only buttons still held count
        let current_score = activity_score(
            self.history.get(&pads[current_pos].index),
            &pads[current_pos],
            &self.settings,
        );
        if best_score < current_score + self.settings.score_margin {
            self.challenger.clear();
            return self.retain(pads, current_pos);
        }

        let challenger_key = pads[challenger].key();
        let frames = self.challenger.record(&challenger_key);
        debug!(
            "Challenger {} out-scores current ({:.2} vs {:.2}), streak {}/{}",
            challenger_key,
            best_score,
            current_score,
            frames,
            self.settings.switch_debounce_frames
        );

        if frames >= self.settings.switch_debounce_frames {
            info!(
                "Switching active device from {} to {}",
                pads[current_pos].key(),
                challenger_key
            );
            return self.lock(pads, challenger, now, SelectionReason::Switched);
        }

        self.retain(pads, current_pos)
    }

    fn retain<'a>(&mut self, pads: &'a [DeviceSnapshot], pos: usize) -> Selection<'a> {
        self.last_seen = Some(pads[pos].clone());
        Selection {
            device: Cow::Borrowed(&pads[pos]),
            reason: SelectionReason::Retained,
        }
    }

    fn lock<'a>(
        &mut self,
        pads: &'a [DeviceSnapshot],
        pos: usize,
        now: Instant,
        reason: SelectionReason,
    ) -> Selection<'a> {
        let device = &pads[pos];
        self.current_key = Some(device.key());
        self.last_seen = Some(device.clone());
        self.hold_until = Some(now + self.settings.hold_duration());
        self.challenger.clear();
        Selection {
            device: Cow::Borrowed(device),
            reason,
        }
    }
}
