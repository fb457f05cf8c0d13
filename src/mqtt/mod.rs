//! MQTT publish sink
//!
//! The outward-facing half of the bridge: [`message::JoyMessage`] is the wire
//! form of the normalized state (stamped header, 8 axes, 11 buttons, JSON
//! encoded) and [`publisher::MqttPublisher`] ships it to the broker. The
//! scheduler only holds an mpsc sender, so the broker connection can die and
//! recover without the dispatch pipeline noticing.

pub mod message;
pub mod publisher;

pub use message::JoyMessage;
pub use publisher::MqttPublisher;
