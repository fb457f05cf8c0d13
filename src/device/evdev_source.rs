use std::io;

use evdev::{AbsoluteAxisCode, Device, EventSummary, KeyCode};
use tracing::{debug, info, trace};

use crate::profile::EventCode;

use super::source::{DeviceDescriptor, DeviceSource, EventKind, RawEvent, SourceError};

/// Linux evdev implementation of [`DeviceSource`].
///
/// Scans `/dev/input` for devices that advertise `BTN_SOUTH` (the common
/// gamepad marker) and reads the active device in non-blocking mode.
#[derive(Default)]
pub struct EvdevSource {
    active: Option<(String, Device)>,
}

impl EvdevSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeviceSource for EvdevSource {
    fn enumerate(&mut self) -> Result<Vec<DeviceDescriptor>, SourceError> {
        let mut found = Vec::new();
        for (path, device) in evdev::enumerate() {
            let is_gamepad = device
                .supported_keys()
                .is_some_and(|keys| keys.contains(KeyCode::BTN_SOUTH));
            if !is_gamepad {
                continue;
            }
            let model = device.name().unwrap_or("unknown").to_string();
            debug!("Found gamepad '{}' at {}", model, path.display());
            found.push(DeviceDescriptor { path, model });
        }
        Ok(found)
    }

    fn open(&mut self, descriptor: &DeviceDescriptor) -> Result<(), SourceError> {
        let mut device =
            Device::open(&descriptor.path).map_err(|e| SourceError::Open(e.to_string()))?;
        device
            .set_nonblocking(true)
            .map_err(|e| SourceError::Open(e.to_string()))?;
        info!(
            "Opened '{}' at {}",
            descriptor.model,
            descriptor.path.display()
        );
        self.active = Some((descriptor.model.clone(), device));
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<RawEvent>, SourceError> {
        let Some((model, device)) = self.active.as_mut() else {
            return Ok(Vec::new());
        };

        let mut events = Vec::new();
        loop {
            let batch = match device.fetch_events() {
                Ok(batch) => batch,
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => return Err(SourceError::Read(e.to_string())),
            };
            for event in batch {
                match event.destructure() {
                    EventSummary::Key(_, code, value) => {
                        if let Some(code) = map_key_code(code) {
                            events.push(RawEvent {
                                model: model.clone(),
                                kind: EventKind::Key,
                                code,
                                state: value,
                            });
                        } else {
                            trace!("Dropping unknown key code {:?}", code);
                        }
                    }
                    EventSummary::AbsoluteAxis(_, code, value) => {
                        if let Some(code) = map_axis_code(code) {
                            events.push(RawEvent {
                                model: model.clone(),
                                kind: EventKind::Absolute,
                                code,
                                state: value,
                            });
                        } else {
                            trace!("Dropping unknown axis code {:?}", code);
                        }
                    }
                    _ => {}
                }
            }
        }
        Ok(events)
    }
}

fn map_key_code(code: KeyCode) -> Option<EventCode> {
    match code {
        KeyCode::BTN_SOUTH => Some(EventCode::BtnSouth),
        KeyCode::BTN_EAST => Some(EventCode::BtnEast),
        KeyCode::BTN_WEST => Some(EventCode::BtnWest),
        KeyCode::BTN_NORTH => Some(EventCode::BtnNorth),
        KeyCode::BTN_C => Some(EventCode::BtnC),
        KeyCode::BTN_Z => Some(EventCode::BtnZ),
        KeyCode::BTN_TL => Some(EventCode::BtnTl),
        KeyCode::BTN_TR => Some(EventCode::BtnTr),
        KeyCode::BTN_TL2 => Some(EventCode::BtnTl2),
        KeyCode::BTN_TR2 => Some(EventCode::BtnTr2),
        KeyCode::BTN_SELECT => Some(EventCode::BtnSelect),
        KeyCode::BTN_START => Some(EventCode::BtnStart),
        KeyCode::BTN_MODE => Some(EventCode::BtnMode),
        KeyCode::BTN_THUMBL => Some(EventCode::BtnThumbl),
        KeyCode::BTN_THUMBR => Some(EventCode::BtnThumbr),
        _ => None,
    }
}

fn map_axis_code(code: AbsoluteAxisCode) -> Option<EventCode> {
    match code {
        AbsoluteAxisCode::ABS_X => Some(EventCode::AbsX),
        AbsoluteAxisCode::ABS_Y => Some(EventCode::AbsY),
        AbsoluteAxisCode::ABS_Z => Some(EventCode::AbsZ),
        AbsoluteAxisCode::ABS_RX => Some(EventCode::AbsRx),
        AbsoluteAxisCode::ABS_RY => Some(EventCode::AbsRy),
        AbsoluteAxisCode::ABS_RZ => Some(EventCode::AbsRz),
        AbsoluteAxisCode::ABS_HAT0X => Some(EventCode::AbsHat0X),
        AbsoluteAxisCode::ABS_HAT0Y => Some(EventCode::AbsHat0Y),
        _ => None,
    }
}
