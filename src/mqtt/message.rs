use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::dispatch::state::JoyState;

/// Wall-clock publish time split into whole seconds and the nanosecond
/// remainder (always below 1e9, so it fits the unsigned 32-bit field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub sec: i64,
    pub nanosec: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub stamp: Stamp,
    pub frame_id: String,
}

/// The serialized joystick snapshot subscribers receive: 8 normalized axes
/// and 11 button states under a stamped header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoyMessage {
    pub header: Header,
    pub axes: Vec<f32>,
    pub buttons: Vec<i32>,
}

impl JoyMessage {
    /// Snapshot the live state under the given wall-clock time.
    pub fn stamped(state: &JoyState, now: DateTime<Local>) -> Self {
        Self {
            header: Header {
                stamp: Stamp {
                    sec: now.timestamp(),
                    nanosec: now.timestamp_subsec_nanos(),
                },
                frame_id: String::new(),
            },
            axes: state.axes().to_vec(),
            buttons: state.buttons().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn stamp_splits_seconds_and_nanoseconds() {
        let now = Local.timestamp_opt(1_700_000_000, 250_000_000).unwrap();
        let message = JoyMessage::stamped(&JoyState::new(), now);
        assert_eq!(message.header.stamp.sec, 1_700_000_000);
        assert_eq!(message.header.stamp.nanosec, 250_000_000);
        assert!(message.header.stamp.nanosec < 1_000_000_000);
    }

    #[test]
    fn message_carries_the_full_state() {
        let mut state = JoyState::new();
        state.set_axis(0, -1.0);
        state.set_button(10, 1);

        let message = JoyMessage::stamped(&state, Local::now());
        assert_eq!(message.axes.len(), 8);
        assert_eq!(message.buttons.len(), 11);
        assert_eq!(message.axes[0], -1.0);
        assert_eq!(message.buttons[10], 1);
    }

    #[test]
    fn json_layout_matches_the_wire_contract() {
        let now = Local.timestamp_opt(42, 7).unwrap();
        let message = JoyMessage::stamped(&JoyState::new(), now);
        let value = serde_json::to_value(&message).unwrap();

        assert_eq!(value["header"]["stamp"]["sec"], 42);
        assert_eq!(value["header"]["stamp"]["nanosec"], 7);
        assert_eq!(value["header"]["frame_id"], "");
        assert_eq!(value["axes"].as_array().unwrap().len(), 8);
        assert_eq!(value["buttons"].as_array().unwrap().len(), 11);
    }
}
