//! Per-tick activity scoring
//!
//! Scores only what changed since the previous tick. A device that keeps
//! reporting the same stale axis value (idle adapter drift) scores nothing, no
//! matter how long it has been connected.

use super::settings::PickerSettings;
use super::snapshot::{DeviceSnapshot, HistoryEntry};

const PRESSED_SCORE: f32 = 1.0;
const RELEASE_SCORE: f32 = 0.25;

/// Activity of `current` relative to the previous tick's `previous` sample
///
/// Pressed buttons count fully on every tick they are held, a release counts
/// lightly, and axes count only for the portion of their delta beyond the
/// deadzone. The result is never negative.
pub(crate) fn activity_score(
    previous: Option<&HistoryEntry>,
    current: &DeviceSnapshot,
    settings: &PickerSettings,
) -> f32 {
    let mut score = 0.0;

    for (i, &is_pressed) in current.buttons.iter().enumerate() {
        if is_pressed {
            score += PRESSED_SCORE;
        } else if let Some(previous) = previous {
            let was_pressed = previous.buttons.get(i).copied().unwrap_or(false);
            if was_pressed {
                score += RELEASE_SCORE;
            }
        }
    }

    for (i, &value) in current.axes.iter().enumerate() {
        let was = previous
            .and_then(|p| p.axes.get(i).copied())
            .map_or(0.0, sanitize_axis);
        let delta = (sanitize_axis(value) - was).abs();
        if delta > settings.deadzone {
            score += (delta - settings.deadzone) * settings.axis_weight;
        }
    }

    // Negative weights are accepted in settings but must not yield a negative score
    score.max(0.0)
}

fn sanitize_axis(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pad(buttons: Vec<bool>, axes: Vec<f32>) -> DeviceSnapshot {
        DeviceSnapshot::new(0, "pad")
            .with_buttons(buttons)
            .with_axes(axes)
    }

    #[test]
    fn pressed_buttons_count_fully_every_tick() {
        let settings = PickerSettings::default();
        let first = pad(vec![true, true, false], vec![]);
        assert_eq!(activity_score(None, &first, &settings), 2.0);

        let history = HistoryEntry::from(&first);
        assert_eq!(activity_score(Some(&history), &first, &settings), 2.0);
    }

    #[test]
    fn release_counts_only_with_history() {
        let settings = PickerSettings::default();
        let held = pad(vec![true, false], vec![]);
        let released = pad(vec![false, false], vec![]);

        let history = HistoryEntry::from(&held);
        assert_eq!(activity_score(Some(&history), &released, &settings), 0.25);
        assert_eq!(activity_score(None, &released, &settings), 0.0);
    }

    #[test]
    fn steady_released_buttons_score_nothing() {
        let settings = PickerSettings::default();
        let idle = pad(vec![false; 12], vec![]);
        let history = HistoryEntry::from(&idle);
        assert_eq!(activity_score(Some(&history), &idle, &settings), 0.0);
    }

    #[test]
    fn axis_delta_beyond_deadzone_is_weighted() {
        let settings = PickerSettings::default();
        let centered = pad(vec![], vec![0.0, 0.0]);
        let moved = pad(vec![], vec![1.0, 0.2]);

        let history = HistoryEntry::from(&centered);
        // (1.0 - 0.25) * 0.5; the second axis stays inside the deadzone
        assert_eq!(activity_score(Some(&history), &moved, &settings), 0.375);
    }

    #[test]
    fn stale_nonzero_axis_scores_nothing_after_first_tick() {
        let settings = PickerSettings::default();
        let drifting = pad(vec![], vec![0.9, -0.75]);

        assert!(activity_score(None, &drifting, &settings) > 0.0);
        let history = HistoryEntry::from(&drifting);
        assert_eq!(activity_score(Some(&history), &drifting, &settings), 0.0);
    }

    #[test]
    fn non_finite_axis_values_count_as_zero() {
        let settings = PickerSettings::default();
        let broken = pad(vec![], vec![f32::NAN, f32::INFINITY]);
        assert_eq!(activity_score(None, &broken, &settings), 0.0);

        let history = HistoryEntry {
            axes: vec![f32::NAN],
            buttons: vec![],
        };
        let moved = pad(vec![], vec![0.75]);
        assert_eq!(activity_score(Some(&history), &moved, &settings), 0.25);
    }

    #[test]
    fn inputs_missing_from_history_use_zero_baseline() {
        let settings = PickerSettings::default();
        let history = HistoryEntry::default();
        let grown = pad(vec![false, true], vec![0.75]);
        assert_eq!(activity_score(Some(&history), &grown, &settings), 1.25);
    }

    #[test]
    fn empty_snapshot_scores_zero() {
        let settings = PickerSettings::default();
        assert_eq!(activity_score(None, &pad(vec![], vec![]), &settings), 0.0);
    }
}
