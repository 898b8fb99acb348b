use gilrs::{Axis, Button, Event, EventType, Gamepad, GamepadId, Gilrs};
use statum::{machine, state};
use tracing::{debug, error, info, warn};

use crate::picker::DeviceSnapshot;

// Fixed sampling order so button/axis indices stay stable across ticks
const BUTTON_ORDER: [Button; 19] = [
    Button::South,
    Button::East,
    Button::West,
    Button::North,
    Button::LeftTrigger,
    Button::RightTrigger,
    Button::LeftTrigger2,
    Button::RightTrigger2,
    Button::Select,
    Button::Start,
    Button::LeftThumb,
    Button::RightThumb,
    Button::DPadUp,
    Button::DPadDown,
    Button::DPadLeft,
    Button::DPadRight,
    Button::Mode,
    Button::C,
    Button::Z,
];

const AXIS_ORDER: [Axis; 8] = [
    Axis::LeftStickX,
    Axis::LeftStickY,
    Axis::RightStickX,
    Axis::RightStickY,
    Axis::LeftZ,
    Axis::RightZ,
    Axis::DPadX,
    Axis::DPadY,
];

// Poller errors
#[derive(Debug, thiserror::Error)]
pub enum PollerError {
    #[error("Failed to initialize poller: {0}")]
    InitializationError(String),

    #[error("Poller thread error: {0}")]
    ThreadError(String),
}

// Define poller states using statum's state macro
#[state]
#[derive(Debug, Clone)]
pub enum PollingState {
    Initializing,
    Polling,
}

#[machine]
#[derive(Debug)]
pub struct DevicePoller<S: PollingState> {
    // Gilrs context
    gilrs: Gilrs,

    // Snapshots taken since the poller started
    samples_taken: u64,
}

impl<S: PollingState> DevicePoller<S> {
    pub fn samples_taken(&self) -> u64 {
        self.samples_taken
    }
}

impl DevicePoller<Initializing> {
    pub fn create() -> Result<Self, PollerError> {
        info!("Initializing gilrs controller interface");
        let gilrs = match Gilrs::new() {
            Ok(g) => {
                info!("Successfully initialized gilrs");
                g
            }
            Err(e) => {
                error!("Failed to initialize gilrs: {}", e);
                return Err(PollerError::InitializationError(e.to_string()));
            }
        };

        Ok(Self::new(gilrs, 0))
    }

    // Log the initial roster and transition to Polling state
    pub fn initialize(self) -> DevicePoller<Polling> {
        let gamepads: Vec<(GamepadId, Gamepad<'_>)> = self.gilrs.gamepads().collect();

        if gamepads.is_empty() {
            warn!("No gamepad connected, polling until one appears");
        } else {
            info!("Found {} gamepads:", gamepads.len());
            for (id, gamepad) in &gamepads {
                info!(
                    "  [{}] Name: {}, UUID: {:?}",
                    id,
                    gamepad.name(),
                    gamepad.uuid()
                );
            }
        }

        debug!("Device poller initialized, transitioning to Polling state");
        self.transition()
    }
}

impl DevicePoller<Polling> {
    /// Drains pending gilrs events, then samples every connected gamepad
    pub fn sample(&mut self) -> Vec<DeviceSnapshot> {
        // gilrs only updates cached gamepad state while its event queue is drained
        while let Some(Event { id, event, .. }) = self.gilrs.next_event() {
            match event {
                EventType::Connected => {
                    info!("Gamepad {} connected: {}", id, self.gilrs.gamepad(id).name())
                }
                EventType::Disconnected => warn!("Gamepad {} disconnected", id),
                _ => {}
            }
        }

        self.samples_taken += 1;
        self.gilrs
            .gamepads()
            .filter(|(_, gamepad)| gamepad.is_connected())
            .map(|(id, gamepad)| snapshot_of(id, &gamepad))
            .collect()
    }
}

fn snapshot_of(id: GamepadId, gamepad: &Gamepad<'_>) -> DeviceSnapshot {
    DeviceSnapshot {
        index: usize::from(id),
        id: describe(gamepad.name(), gamepad.vendor_id(), gamepad.product_id()),
        buttons: BUTTON_ORDER.iter().map(|&b| gamepad.is_pressed(b)).collect(),
        axes: AXIS_ORDER.iter().map(|&a| gamepad.value(a)).collect(),
    }
}

// Name plus USB ids when gilrs knows them
fn describe(name: &str, vendor: Option<u16>, product: Option<u16>) -> String {
    match (vendor, product) {
        (Some(vendor), Some(product)) => {
            format!("{} (Vendor: {:04x} Product: {:04x})", name, vendor, product)
        }
        _ => name.to_string(),
    }
}
