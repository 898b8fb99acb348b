//! Controller subsystem for live gamepad polling
//!
//! Wraps the active-device picker in a polling pipeline:
//!
//! 1. [`device_poller`] - Samples every connected gamepad through gilrs
//! 2. [`poller_handle`] - Runs the picker per tick and publishes the roster
//!
//! # Architecture
//!
//! ```text
//! Gamepads ──► DevicePoller ──► ActivePadPicker ──► watch<PadRoster>
//!              (Snapshots)      (Selection)
//! ```
//!
//! The poller runs on its own thread with a 60ms default interval.

pub mod device_poller;
pub mod poller_handle;

pub use device_poller::{DevicePoller, PollerError};
pub use poller_handle::{PadRoster, PickerLoop, PollerHandle, PollerSettings};
