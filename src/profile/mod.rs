//! Device profile tables for supported gamepads
//!
//! Each supported gamepad model gets a [`registry::DeviceProfile`]: a map from
//! raw evdev event codes to logical channels, plus the raw value range of every
//! axis channel. Adding support for a new pad means adding one table entry in
//! [`registry`], no logic changes anywhere else.

pub mod registry;

pub use registry::{
    Channel, DeviceProfile, EventCode, ProfileError, ProfileRegistry,
};
