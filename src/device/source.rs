use std::path::PathBuf;

use crate::profile::EventCode;

/// An input device found during enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    pub path: PathBuf,
    /// Model name as reported by the device; this is the registry lookup key.
    pub model: String,
}

/// Raw event category. Anything a backend cannot classify as one of these is
/// dropped before it reaches the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Button transition; `state` is the pressed magnitude (usually 0 or 1).
    Key,
    /// Absolute axis report; `state` is the raw axis value.
    Absolute,
}

/// One raw input event, consumed by a single dispatch step and not stored.
#[derive(Debug, Clone)]
pub struct RawEvent {
    /// Model of the device that produced the event.
    pub model: String,
    pub kind: EventKind,
    pub code: EventCode,
    pub state: i32,
}

/// Device source errors
///
/// All of these are transient from the scheduler's point of view: a failed
/// scan or read is logged, the current pass is abandoned and the next tick
/// retries.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to scan input devices: {0}")]
    Scan(String),

    #[error("Failed to open device: {0}")]
    Open(String),

    #[error("Failed to read events: {0}")]
    Read(String),
}

/// Non-blocking supplier of raw gamepad events.
///
/// `poll_events` returning `Ok(vec![])` means "nothing available right now";
/// an `Err` is a distinguishable transient I/O condition. Neither call may
/// block waiting for input.
pub trait DeviceSource {
    /// List the currently connected gamepad-like devices.
    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>, SourceError>;

    /// Make `descriptor` the active device future `poll_events` calls read from.
    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<(), SourceError>;

    /// Drain the events that are immediately available from the active device.
    fn poll_events(&mut self) -> Result<Vec<RawEvent>, SourceError>;
}
