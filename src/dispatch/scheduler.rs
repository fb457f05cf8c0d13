use std::time::{Duration, Instant};

use chrono::Local;
use tokio::sync::mpsc;
use tokio::time::interval;
use tracing::{debug, info, warn};

use crate::config::JoySettings;
use crate::device::source::{DeviceDescriptor, DeviceSource};
use crate::mqtt::message::JoyMessage;
use crate::profile::ProfileRegistry;

use super::dispatcher::{dispatch, DispatchTracker, PublishDecision};
use super::state::JoyState;

/// Coarse period for device re-detection.
const DETECT_PERIOD: Duration = Duration::from_secs(1);

/// Fine period for event draining and autorepeat checks.
const DISPATCH_PERIOD: Duration = Duration::from_millis(10);

/// Drives the whole pipeline from one task: a coarse tick re-resolves device
/// presence, a fine tick drains events through the dispatcher and handles
/// autorepeat. Because both ticks run in the same `select!` loop, detection
/// and dispatch can never interleave; the state buffer and tracker need no
/// locking.
pub struct Scheduler<S: DeviceSource> {
    source: S,
    registry: ProfileRegistry,
    settings: JoySettings,
    state: JoyState,
    tracker: DispatchTracker,
    active: Option<DeviceDescriptor>,
    sink: mpsc::Sender<JoyMessage>,
}

impl<S: DeviceSource> Scheduler<S> {
    pub fn new(
        source: S,
        registry: ProfileRegistry,
        settings: JoySettings,
        sink: mpsc::Sender<JoyMessage>,
    ) -> Self {
        Self {
            source,
            registry,
            settings,
            state: JoyState::new(),
            tracker: DispatchTracker::new(),
            active: None,
            sink,
        }
    }

    /// Run forever. Never blocks waiting for input: each tick processes what
    /// is immediately available and returns to the loop.
    pub async fn run(mut self) {
        info!(
            "Scheduler running: detection every {:?}, dispatch every {:?}",
            DETECT_PERIOD, DISPATCH_PERIOD
        );
        let mut detect = interval(DETECT_PERIOD);
        let mut drain = interval(DISPATCH_PERIOD);

        loop {
            tokio::select! {
                _ = detect.tick() => self.detect_devices(),
                _ = drain.tick() => self.dispatch_tick(Instant::now()),
            }
        }
    }

    /// Re-enumerate devices and (re)activate the first supported one.
    ///
    /// No device or an unsupported model suspends dispatch until a later tick
    /// finds something usable; neither condition is fatal.
    fn detect_devices(&mut self) {
        let descriptors = match self.source.enumerate() {
            Ok(descriptors) => descriptors,
            Err(e) => {
                warn!("Device scan failed: {e}");
                self.deactivate();
                return;
            }
        };

        let Some(descriptor) = descriptors.into_iter().next() else {
            warn!("No joystick was found. Rescanning");
            self.deactivate();
            return;
        };

        if self.registry.resolve(&descriptor.model).is_none() {
            warn!(
                "Joystick '{}' is not supported yet. Please plug in a supported joystick",
                descriptor.model
            );
            self.deactivate();
            return;
        }

        if self.active.as_ref() == Some(&descriptor) {
            return;
        }

        match self.source.open(&descriptor) {
            Ok(()) => {
                info!("Active joystick: '{}'", descriptor.model);
                self.active = Some(descriptor);
            }
            Err(e) => {
                warn!("Could not open '{}': {e}", descriptor.model);
                self.deactivate();
            }
        }
    }

    fn deactivate(&mut self) {
        if let Some(descriptor) = self.active.take() {
            info!("Deactivating '{}', dispatch suspended", descriptor.model);
        }
    }

    /// Drain available events through the dispatcher, then apply autorepeat.
    fn dispatch_tick(&mut self, now: Instant) {
        let Some(descriptor) = &self.active else {
            return;
        };
        let Some(profile) = self.registry.resolve(&descriptor.model) else {
            return;
        };

        match self.source.poll_events() {
            Ok(events) => {
                for event in events {
                    if event.model != descriptor.model {
                        debug!("Skipping event from inactive device '{}'", event.model);
                        continue;
                    }
                    let decision = dispatch(
                        &event,
                        profile,
                        &mut self.state,
                        &mut self.tracker,
                        self.settings.deadzone,
                        Duration::from_secs_f64(self.settings.coalesce_interval),
                        now,
                    );
                    if decision == PublishDecision::Publish {
                        Self::publish(&self.state, &mut self.tracker, &self.sink, now);
                    }
                }
            }
            Err(e) => {
                // Transient: abandon this drain pass, state stays as-is, the
                // next tick retries.
                warn!("Read failure, retrying next tick: {e}");
            }
        }

        // Autorepeat keeps subscribers fed while input is silent. Ignored
        // events count as silence here; only publishes rearm the timer.
        if self.settings.autorepeat_rate > 0.0 {
            let repeat_after = Duration::from_secs_f64(1.0 / self.settings.autorepeat_rate);
            if self.tracker.publish_overdue(now, repeat_after) {
                debug!("Autorepeat: republishing unchanged state");
                Self::publish(&self.state, &mut self.tracker, &self.sink, now);
            }
        }
    }

    /// Stamp the current state with the wall clock and hand it to the sink,
    /// fire-and-forget. The publish clock advances even if the sink is full
    /// so a congested broker cannot turn autorepeat into a busy loop.
    fn publish(
        state: &JoyState,
        tracker: &mut DispatchTracker,
        sink: &mpsc::Sender<JoyMessage>,
        now: Instant,
    ) {
        let message = JoyMessage::stamped(state, Local::now());
        if let Err(e) = sink.try_send(message) {
            warn!("Dropping joy message, sink unavailable: {e}");
        }
        tracker.mark_published(now);
    }
}
