pub mod config;
pub mod device;
pub mod dispatch;
pub mod mqtt;
pub mod profile;

use color_eyre::{eyre::eyre, Result};
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::device::evdev_source::EvdevSource;
use crate::dispatch::scheduler::Scheduler;
use crate::mqtt::MqttPublisher;
use crate::profile::ProfileRegistry;

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let settings = config::load().map_err(|e| eyre!("Failed to load settings: {e}"))?;
    info!("Starting joybridge with settings: {:?}", settings);

    // A defect in the built-in tables must stop the process here, never
    // surface during event handling.
    let registry =
        ProfileRegistry::builtin().map_err(|e| eyre!("Built-in profile table is broken: {e}"))?;

    let (joy_tx, joy_rx) = mpsc::channel(100);
    let _publisher = MqttPublisher::spawn(settings.mqtt.clone(), joy_rx);

    let source = EvdevSource::new();
    let scheduler = Scheduler::new(source, registry, settings.joy, joy_tx);

    info!("joybridge ready, scanning for gamepads");
    scheduler.run().await;

    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
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
