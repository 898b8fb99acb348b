//! Active-device picker
//!
//! Decides, once per polling tick, which of several connected gamepads is the
//! one the application should follow.
//!
//! 1. `scoring` - Per-device activity score from the change since the previous tick
//! 2. [`active_picker`] - Lock, challenger debounce and hold window
//! 3. [`snapshot`] - Device samples and identity keys
//!
//! # Selection flow
//!
//! ```text
//! Snapshots ──► Score + History ──► Preferred? ──► Locked device present? ──► Claim ──► Hold
//!                                    (override)     (challenger debounce)
//! ```
//!
//! The picker performs no I/O and never blocks; the caller polls the hardware
//! and invokes [`ActivePadPicker::tick`] once per frame.

pub mod active_picker;
mod scoring;
pub mod settings;
pub mod snapshot;

pub use active_picker::{ActivePadPicker, Selection, SelectionReason};
pub use settings::PickerSettings;
pub use snapshot::{DeviceKey, DeviceSnapshot, KeyParseError};
