use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::device::source::{EventKind, RawEvent};
use crate::profile::{Channel, DeviceProfile};

use super::normalize::normalize;
use super::state::JoyState;

/// Outcome of dispatching one raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishDecision {
    /// The state changed in a way subscribers must see now.
    Publish,
    /// Nothing to publish: the event was ignored or coalesced away.
    Ignore,
}

/// Dispatch history needed for coalescing and autorepeat.
///
/// Owned by the scheduler alongside the state buffer; the dispatcher records
/// the last handled event, the scheduler records publish times.
#[derive(Debug, Default)]
pub struct DispatchTracker {
    last_code: Option<crate::profile::EventCode>,
    last_publish: Option<Instant>,
}

impl DispatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once more than `interval` has passed since the last publish.
    /// Never having published counts as overdue.
    pub fn publish_overdue(&self, now: Instant, interval: Duration) -> bool {
        match self.last_publish {
            None => true,
            Some(at) => now.duration_since(at) > interval,
        }
    }

    pub fn mark_published(&mut self, now: Instant) {
        self.last_publish = Some(now);
    }
}

/// Consume one raw event: resolve it through the profile, update the state
/// buffer, and decide whether the new state should be published.
///
/// Buttons always publish; axis updates for the code that was just reported
/// are coalesced within `coalesce_interval`, while a switch to a different
/// control always goes out. Codes the profile does not map are inert, which
/// is expected for controls not wired into the profile.
pub fn dispatch(
    event: &RawEvent,
    profile: &DeviceProfile,
    state: &mut JoyState,
    tracker: &mut DispatchTracker,
    deadzone: f32,
    coalesce_interval: Duration,
    now: Instant,
) -> PublishDecision {
    let Some(channel) = profile.channel(event.code) else {
        trace!(
            "Ignoring code {:?}, not mapped for '{}'",
            event.code,
            profile.model()
        );
        return PublishDecision::Ignore;
    };

    match (event.kind, channel) {
        (EventKind::Key, Channel::Button(index)) => {
            // Devices should report 0/1 here; clamp anything else rather than
            // letting a stray magnitude through as a button value.
            state.set_button(index, event.state.clamp(0, 1));
            tracker.last_code = Some(event.code);
            debug!("Button {} -> {}", index, event.state.clamp(0, 1));
            PublishDecision::Publish
        }
        (EventKind::Absolute, Channel::Axis(index)) => {
            let Some((raw_min, raw_max)) = profile.axis_range(index) else {
                // Unreachable for validated profiles.
                debug!("Axis {} of '{}' has no range", index, profile.model());
                return PublishDecision::Ignore;
            };
            let value = normalize(raw_min, raw_max, event.state, deadzone);
            state.set_axis(index, value);

            // Coalesce rapid repeats of the same control; a different control
            // or an expired interval always publishes.
            let decision = if tracker.last_code != Some(event.code)
                || tracker.publish_overdue(now, coalesce_interval)
            {
                PublishDecision::Publish
            } else {
                PublishDecision::Ignore
            };
            tracker.last_code = Some(event.code);
            decision
        }
        (kind, channel) => {
            debug!(
                "Ignoring {:?} event on mismatched channel {:?}",
                kind, channel
            );
            PublishDecision::Ignore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{EventCode, ProfileRegistry};

    const COALESCE: Duration = Duration::from_millis(1);
    const DEADZONE: f32 = 0.05;

    fn registry() -> ProfileRegistry {
        ProfileRegistry::builtin().unwrap()
    }

    fn event(kind: EventKind, code: EventCode, state: i32) -> RawEvent {
        RawEvent {
            model: "Microsoft X-Box 360 pad".to_string(),
            kind,
            code,
            state,
        }
    }

    fn handle(
        ev: &RawEvent,
        state: &mut JoyState,
        tracker: &mut DispatchTracker,
        now: Instant,
    ) -> PublishDecision {
        let registry = registry();
        let profile = registry.resolve("Microsoft X-Box 360 pad").unwrap();
        dispatch(ev, profile, state, tracker, DEADZONE, COALESCE, now)
    }

    #[test]
    fn button_events_always_publish() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let now = Instant::now();

        let press = event(EventKind::Key, EventCode::BtnSouth, 1);
        assert_eq!(handle(&press, &mut state, &mut tracker, now), PublishDecision::Publish);
        tracker.mark_published(now);

        // Immediately after, same code again: still publishes.
        let release = event(EventKind::Key, EventCode::BtnSouth, 0);
        assert_eq!(handle(&release, &mut state, &mut tracker, now), PublishDecision::Publish);
        assert_eq!(state.buttons()[0], 0);
    }

    #[test]
    fn button_state_is_clamped() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let now = Instant::now();

        let odd = event(EventKind::Key, EventCode::BtnTl, 7);
        handle(&odd, &mut state, &mut tracker, now);
        assert_eq!(state.buttons()[4], 1);

        let negative = event(EventKind::Key, EventCode::BtnTl, -3);
        handle(&negative, &mut state, &mut tracker, now);
        assert_eq!(state.buttons()[4], 0);
    }

    #[test]
    fn same_axis_coalesces_within_interval() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let t0 = Instant::now();

        let first = event(EventKind::Absolute, EventCode::AbsX, 32767);
        assert_eq!(handle(&first, &mut state, &mut tracker, t0), PublishDecision::Publish);
        tracker.mark_published(t0);

        // Same code, well inside the interval: suppressed.
        let second = event(EventKind::Absolute, EventCode::AbsX, 16000);
        let t1 = t0 + Duration::from_micros(200);
        assert_eq!(handle(&second, &mut state, &mut tracker, t1), PublishDecision::Ignore);

        // The state buffer was still updated even though no publish happened.
        assert!(state.axes()[0] < 0.0);
    }

    #[test]
    fn same_axis_publishes_after_interval_expires() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let t0 = Instant::now();

        let first = event(EventKind::Absolute, EventCode::AbsX, 32767);
        assert_eq!(handle(&first, &mut state, &mut tracker, t0), PublishDecision::Publish);
        tracker.mark_published(t0);

        let second = event(EventKind::Absolute, EventCode::AbsX, 16000);
        let t1 = t0 + Duration::from_millis(5);
        assert_eq!(handle(&second, &mut state, &mut tracker, t1), PublishDecision::Publish);
    }

    #[test]
    fn different_axes_never_coalesce() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let t0 = Instant::now();

        let a = event(EventKind::Absolute, EventCode::AbsX, 32767);
        assert_eq!(handle(&a, &mut state, &mut tracker, t0), PublishDecision::Publish);
        tracker.mark_published(t0);

        // Different code immediately after: must publish regardless of timing.
        let b = event(EventKind::Absolute, EventCode::AbsY, 32767);
        assert_eq!(handle(&b, &mut state, &mut tracker, t0), PublishDecision::Publish);
    }

    #[test]
    fn unmapped_code_is_inert() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let now = Instant::now();

        // BTN_C is not wired into the X-Box 360 profile.
        let ev = event(EventKind::Key, EventCode::BtnC, 1);
        assert_eq!(handle(&ev, &mut state, &mut tracker, now), PublishDecision::Ignore);
        assert_eq!(state, JoyState::new());
        assert_eq!(tracker.last_code, None);
    }

    #[test]
    fn kind_channel_mismatch_is_ignored() {
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let now = Instant::now();

        // An Absolute event on a button code resolves to a button channel.
        let ev = event(EventKind::Absolute, EventCode::BtnSouth, 1);
        assert_eq!(handle(&ev, &mut state, &mut tracker, now), PublishDecision::Ignore);
        assert_eq!(state, JoyState::new());
    }

    #[test]
    fn abs_x_scenario_from_the_wire() {
        // Profile maps ABS_X -> axis 0 with range (-32768, 32767).
        let mut state = JoyState::new();
        let mut tracker = DispatchTracker::new();
        let t0 = Instant::now();

        // Full deflection to raw max: normalizes to exactly -1.0, first event
        // always publishes.
        let max = event(EventKind::Absolute, EventCode::AbsX, 32767);
        assert_eq!(handle(&max, &mut state, &mut tracker, t0), PublishDecision::Publish);
        assert_eq!(state.axes()[0], -1.0);
        tracker.mark_published(t0);

        // Back to raw 0 (the midpoint, inside the deadzone) right away: the
        // write happens but the publish is coalesced away.
        let mid = event(EventKind::Absolute, EventCode::AbsX, 0);
        let t1 = t0 + Duration::from_micros(100);
        assert_eq!(handle(&mid, &mut state, &mut tracker, t1), PublishDecision::Ignore);
        assert_eq!(state.axes()[0], 0.0);
    }
}
