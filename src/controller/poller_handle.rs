//! Poller Handle - runs the picker against live gamepads
//!
//! Owns the polling thread: samples every connected gamepad at a fixed
//! interval, feeds the snapshots to an [`ActivePadPicker`] and publishes the
//! resulting [`PadRoster`] on a watch channel. Subscribers are only woken when
//! the connected set or the active device actually changes.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tokio::sync::{oneshot, watch};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::device_poller::{DevicePoller, PollerError, Polling};
use crate::picker::{ActivePadPicker, DeviceKey, DeviceSnapshot, PickerSettings, SelectionReason};

/// Polling cadence for the hardware loop
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Milliseconds between two picker ticks
    pub interval_ms: u64,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self { interval_ms: 60 }
    }
}

/// Connected devices and the active one, as seen on the latest tick
#[derive(Clone, Debug, PartialEq)]
pub struct PadRoster {
    pub pads: Vec<DeviceKey>,
    pub active: Option<DeviceKey>,
    /// The active device is absent and reported from the hold window
    pub held: bool,
    pub changed_at: DateTime<Local>,
}

impl PadRoster {
    pub fn has_any(&self) -> bool {
        !self.pads.is_empty()
    }
}

impl Default for PadRoster {
    fn default() -> Self {
        Self {
            pads: Vec::new(),
            active: None,
            held: false,
            changed_at: Local::now(),
        }
    }
}

/// One picker plus the channel its results are published on
///
/// Kept free of gilrs so the publish logic runs on recorded snapshots as well.
pub struct PickerLoop {
    picker: ActivePadPicker,
    preferred: Option<DeviceKey>,
    roster_sender: watch::Sender<PadRoster>,
}

impl PickerLoop {
    pub fn new(
        settings: PickerSettings,
        preferred: Option<DeviceKey>,
        roster_sender: watch::Sender<PadRoster>,
    ) -> Self {
        Self {
            picker: ActivePadPicker::new(settings),
            preferred,
            roster_sender,
        }
    }

    /// Runs one picker tick and publishes the roster if it changed
    ///
    /// Returns whether subscribers were notified.
    pub fn step(&mut self, pads: &[DeviceSnapshot], now: Instant) -> bool {
        let selection = self.picker.tick_at(pads, self.preferred.as_ref(), now);
        let active = selection.as_ref().map(|s| s.key());
        let held = selection
            .as_ref()
            .is_some_and(|s| s.reason == SelectionReason::Held);

        self.roster_sender.send_if_modified(|roster| {
            let same_pads = roster.pads.len() == pads.len()
                && roster.pads.iter().zip(pads).all(|(key, pad)| pad.matches(key));
            if same_pads && roster.active == active && roster.held == held {
                return false;
            }

            if roster.active != active {
                match &active {
                    Some(key) => info!("Active device: {}", key),
                    None => info!("No active device"),
                }
            }
            if !same_pads {
                debug!("Connected devices changed: {} connected", pads.len());
            }

            roster.pads = pads.iter().map(DeviceSnapshot::key).collect();
            roster.active = active;
            roster.held = held;
            roster.changed_at = Local::now();
            true
        })
    }
}

/// Handle for the background polling thread
///
/// Gilrs contexts are driven from a single thread, so the poller gets a
/// dedicated OS thread instead of a tokio task. The thread exits once the
/// cancellation token fires.
pub struct PollerHandle {
    roster_receiver: watch::Receiver<PadRoster>,
    cancel: CancellationToken,
    thread: std::thread::JoinHandle<()>,
}

impl PollerHandle {
    /// Starts the polling thread and waits for gilrs to initialize
    ///
    /// # Errors
    ///
    /// * [`PollerError::InitializationError`] - gilrs could not be initialized
    /// * [`PollerError::ThreadError`] - the thread could not be spawned or died during startup
    pub async fn spawn(
        settings: Option<PollerSettings>,
        picker_settings: PickerSettings,
        preferred: Option<DeviceKey>,
        cancel: CancellationToken,
    ) -> Result<Self, PollerError> {
        let settings = settings.unwrap_or_default();
        info!(
            "Spawning device poller with settings: {:?}, picker: {:?}",
            settings, picker_settings
        );

        let (roster_sender, roster_receiver) = watch::channel(PadRoster::default());
        let (init_tx, init_rx) = oneshot::channel();
        let token = cancel.clone();

        let thread = std::thread::Builder::new()
            .name("device-poller".to_string())
            .spawn(move || {
                let poller = match DevicePoller::create() {
                    Ok(poller) => {
                        let _ = init_tx.send(Ok(()));
                        poller.initialize()
                    }
                    Err(e) => {
                        let _ = init_tx.send(Err(e));
                        return;
                    }
                };
                let picker_loop = PickerLoop::new(picker_settings, preferred, roster_sender);
                run_polling_loop(poller, picker_loop, &settings, &token);
            })
            .map_err(|e| PollerError::ThreadError(e.to_string()))?;

        init_rx
            .await
            .map_err(|_| PollerError::ThreadError("poller exited during startup".to_string()))??;

        info!("Device poller started");
        Ok(Self {
            roster_receiver,
            cancel,
            thread,
        })
    }

    /// Get a receiver for roster changes
    pub fn subscribe(&self) -> watch::Receiver<PadRoster> {
        debug!("New subscriber to pad roster");
        self.roster_receiver.clone()
    }

    /// Cancels polling and waits for the thread to finish its current tick
    pub fn shutdown(self) -> Result<(), PollerError> {
        self.cancel.cancel();
        self.thread
            .join()
            .map_err(|_| PollerError::ThreadError("poller thread panicked".to_string()))
    }
}

fn run_polling_loop(
    mut poller: DevicePoller<Polling>,
    mut picker_loop: PickerLoop,
    settings: &PollerSettings,
    cancel: &CancellationToken,
) {
    info!("Starting device polling loop");
    let interval = Duration::from_millis(settings.interval_ms);

    // For performance monitoring
    let mut published = 0u32;
    let mut last_log_time = Local::now();
    let log_interval = chrono::Duration::seconds(60);

    while !cancel.is_cancelled() {
        let pads = poller.sample();
        if picker_loop.step(&pads, Instant::now()) {
            published += 1;
        }

        let now = Local::now();
        if now - last_log_time > log_interval {
            info!(
                "Device poller stats: {} samples total, {} roster changes in last {} seconds",
                poller.samples_taken(),
                published,
                log_interval.num_seconds()
            );
            published = 0;
            last_log_time = now;
        }

        std::thread::sleep(interval);
    }

    if picker_loop.roster_sender.is_closed() {
        debug!("All roster subscribers dropped before shutdown");
    }
    info!("Device polling loop stopped");
}
