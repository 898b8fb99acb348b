use activepad::config::AppConfig;
use activepad::controller::{PadRoster, PollerHandle};
use color_eyre::{eyre::eyre, Result};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(AppConfig::default_path);
    let config = AppConfig::load(&config_path)?;
    info!("Starting activepad with config: {:?}", config);

    let cancel = CancellationToken::new();
    let poller = PollerHandle::spawn(
        Some(config.poll.clone()),
        config.picker.clone(),
        config.preferred(),
        cancel.clone(),
    )
    .await
    .map_err(|e| eyre!("Failed to spawn device poller: {}", e))?;

    let mut roster_rx = poller.subscribe();
    loop {
        tokio::select! {
            changed = roster_rx.changed() => {
                if changed.is_err() {
                    error!("Device poller stopped publishing");
                    break;
                }
                let roster = roster_rx.borrow_and_update().clone();
                log_roster(&roster);
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown requested");
                break;
            }
        }
    }

    poller
        .shutdown()
        .map_err(|e| eyre!("Failed to stop device poller: {}", e))?;
    Ok(())
}

fn log_roster(roster: &PadRoster) {
    let connected: Vec<String> = roster.pads.iter().map(ToString::to_string).collect();
    match &roster.active {
        Some(key) if roster.held => info!(
            "[{}] Active: {} (held, disconnected) | Connected: {:?}",
            roster.changed_at.format("%H:%M:%S.%3f"),
            key,
            connected
        ),
        Some(key) => info!(
            "[{}] Active: {} | Connected: {:?}",
            roster.changed_at.format("%H:%M:%S.%3f"),
            key,
            connected
        ),
        None => info!(
            "[{}] Active: none | Connected: {:?}",
            roster.changed_at.format("%H:%M:%S.%3f"),
            connected
        ),
    }
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
