//! Device input boundary
//!
//! [`source::DeviceSource`] is the seam between the dispatch core and whatever
//! actually talks to the hardware. [`evdev_source::EvdevSource`] is the real
//! Linux implementation; tests swap in scripted mocks.

pub mod evdev_source;
pub mod source;

pub use source::{DeviceDescriptor, DeviceSource, EventKind, RawEvent, SourceError};
