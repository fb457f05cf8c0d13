use std::collections::HashMap;

use tracing::debug;

use crate::dispatch::state::{AXIS_COUNT, BUTTON_COUNT};

/// Raw evdev event codes understood by the built-in profiles.
///
/// This is a closed set: codes a device emits that are not listed here are
/// dropped at the device boundary, the same way codes missing from a profile's
/// code map are dropped during dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCode {
    AbsX,
    AbsY,
    AbsZ,
    AbsRx,
    AbsRy,
    AbsRz,
    AbsHat0X,
    AbsHat0Y,
    BtnSouth,
    BtnEast,
    BtnWest,
    BtnNorth,
    BtnC,
    BtnZ,
    BtnTl,
    BtnTr,
    BtnTl2,
    BtnTr2,
    BtnSelect,
    BtnStart,
    BtnMode,
    BtnThumbl,
    BtnThumbr,
}

/// A logical slot in the normalized joystick state.
///
/// Axis and button indices are independent namespaces that both start at zero,
/// so a bare integer is ambiguous. The tag makes the namespace explicit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Axis(usize),
    Button(usize),
}

/// Profile validation errors
///
/// All of these are defects in the built-in tables, so they are surfaced once
/// at registry construction and treated as fatal at startup, never during
/// event handling.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Profile '{model}': axis {axis} is mapped but has no value range")]
    MissingRange { model: &'static str, axis: usize },

    #[error("Profile '{model}': axis {axis} has an empty value range ({bound}, {bound})")]
    EmptyRange {
        model: &'static str,
        axis: usize,
        bound: i32,
    },

    #[error("Profile '{model}': axis channel {index} exceeds the 8-axis state")]
    AxisOutOfBounds { model: &'static str, index: usize },

    #[error("Profile '{model}': button channel {index} exceeds the 11-button state")]
    ButtonOutOfBounds { model: &'static str, index: usize },

    #[error("Profile '{model}': axis {axis} has a value range but no code mapping")]
    UnmappedRange { model: &'static str, axis: usize },
}

/// Per-model mapping from raw event codes to logical channels and value ranges.
#[derive(Debug, Clone)]
pub struct DeviceProfile {
    model: &'static str,
    codes: HashMap<EventCode, Channel>,
    ranges: HashMap<usize, (i32, i32)>,
}

impl DeviceProfile {
    fn new(
        model: &'static str,
        codes: &[(EventCode, Channel)],
        ranges: &[(usize, (i32, i32))],
    ) -> Self {
        Self {
            model,
            codes: codes.iter().copied().collect(),
            ranges: ranges.iter().copied().collect(),
        }
    }

    /// Model name this profile belongs to.
    pub fn model(&self) -> &'static str {
        self.model
    }

    /// Resolve a raw event code to its logical channel.
    pub fn channel(&self, code: EventCode) -> Option<Channel> {
        self.codes.get(&code).copied()
    }

    /// Raw value range of an axis channel.
    ///
    /// The range encodes polarity: the first bound maps to +1.0 and the second
    /// to -1.0, so axis inversion is expressed by swapping the bounds.
    pub fn axis_range(&self, axis: usize) -> Option<(i32, i32)> {
        self.ranges.get(&axis).copied()
    }

    fn validate(&self) -> Result<(), ProfileError> {
        for channel in self.codes.values() {
            match *channel {
                Channel::Axis(index) => {
                    if index >= AXIS_COUNT {
                        return Err(ProfileError::AxisOutOfBounds {
                            model: self.model,
                            index,
                        });
                    }
                    match self.ranges.get(&index) {
                        None => {
                            return Err(ProfileError::MissingRange {
                                model: self.model,
                                axis: index,
                            })
                        }
                        Some((min, max)) if min == max => {
                            return Err(ProfileError::EmptyRange {
                                model: self.model,
                                axis: index,
                                bound: *min,
                            })
                        }
                        Some(_) => {}
                    }
                }
                Channel::Button(index) => {
                    if index >= BUTTON_COUNT {
                        return Err(ProfileError::ButtonOutOfBounds {
                            model: self.model,
                            index,
                        });
                    }
                }
            }
        }

        // A range without a code mapping can never be hit; flag it as a table defect too.
        for &axis in self.ranges.keys() {
            let mapped = self
                .codes
                .values()
                .any(|&c| matches!(c, Channel::Axis(i) if i == axis));
            if !mapped {
                return Err(ProfileError::UnmappedRange {
                    model: self.model,
                    axis,
                });
            }
        }

        Ok(())
    }
}

/// Static lookup table from device model name to its profile.
///
/// Built once at startup from the built-in tables below and never mutated.
#[derive(Debug)]
pub struct ProfileRegistry {
    profiles: HashMap<&'static str, DeviceProfile>,
}

impl ProfileRegistry {
    /// Build the registry from the built-in profile tables, validating every
    /// entry. A validation failure means the tables themselves are broken and
    /// the process should not start.
    pub fn builtin() -> Result<Self, ProfileError> {
        let mut profiles = HashMap::new();
        for profile in builtin_profiles() {
            profile.validate()?;
            debug!("Registered profile for '{}'", profile.model());
            profiles.insert(profile.model, profile);
        }
        Ok(Self { profiles })
    }

    /// Look up the profile for a device model name.
    ///
    /// `None` means the model is not supported; the caller decides how to
    /// surface that (it is not fatal).
    pub fn resolve(&self, model: &str) -> Option<&DeviceProfile> {
        self.profiles.get(model)
    }
}

use Channel::{Axis, Button};
use EventCode::*;

const STICK_RANGE: (i32, i32) = (-32768, 32767);
const HAT_RANGE: (i32, i32) = (-1, 1);

// Standard axis layout shared by the X-Box style pads: sticks on X/Y and
// RX/RY, triggers on Z/RZ, D-pad on the hat axes.
const XBOX_AXES: [(EventCode, Channel); 8] = [
    (AbsX, Axis(0)),
    (AbsY, Axis(1)),
    (AbsZ, Axis(2)),
    (AbsRx, Axis(3)),
    (AbsRy, Axis(4)),
    (AbsRz, Axis(5)),
    (AbsHat0X, Axis(6)),
    (AbsHat0Y, Axis(7)),
];

fn with_xbox_axes(buttons: &[(EventCode, Channel)]) -> Vec<(EventCode, Channel)> {
    XBOX_AXES.iter().chain(buttons.iter()).copied().collect()
}

// Button layout shared by the Logitech F710 and both X-Box One pads.
const F710_BUTTONS: [(EventCode, Channel); 11] = [
    (BtnSouth, Button(0)),
    (BtnEast, Button(1)),
    (BtnNorth, Button(2)),
    (BtnWest, Button(3)),
    (BtnTl, Button(4)),
    (BtnTr, Button(5)),
    (BtnSelect, Button(6)),
    (BtnStart, Button(7)),
    (BtnMode, Button(8)),
    (BtnThumbl, Button(9)),
    (BtnThumbr, Button(10)),
];

fn builtin_profiles() -> Vec<DeviceProfile> {
    // Microsoft X-Box 360 pad
    let x360 = DeviceProfile::new(
        "Microsoft X-Box 360 pad",
        &with_xbox_axes(&[
            (BtnSouth, Button(0)),
            (BtnEast, Button(1)),
            (BtnWest, Button(2)),
            (BtnNorth, Button(3)),
            (BtnTl, Button(4)),
            (BtnTr, Button(5)),
            (BtnStart, Button(6)),
            (BtnSelect, Button(7)),
            (BtnMode, Button(8)),
            (BtnThumbl, Button(9)),
            (BtnThumbr, Button(10)),
        ]),
        &[
            (0, STICK_RANGE),
            (1, (32767, -32768)),
            (2, (0, 255)),
            (3, STICK_RANGE),
            (4, (32767, -32768)),
            (5, (0, 255)),
            (6, HAT_RANGE),
            (7, HAT_RANGE),
        ],
    );

    // Sony Computer Entertainment Wireless Controller (DualShock 4)
    let ps4 = DeviceProfile::new(
        "Sony Computer Entertainment Wireless Controller",
        &[
            (AbsX, Axis(0)),
            (AbsY, Axis(1)),
            (AbsRx, Axis(2)),
            (AbsZ, Axis(3)),
            (AbsRz, Axis(4)),
            (AbsRy, Axis(5)),
            (AbsHat0X, Axis(6)),
            (AbsHat0Y, Axis(7)),
            (BtnEast, Button(0)),
            (BtnC, Button(1)),
            (BtnSouth, Button(2)),
            (BtnNorth, Button(3)),
            (BtnWest, Button(4)),
            (BtnZ, Button(5)),
            (BtnTl2, Button(6)),
            (BtnTr2, Button(7)),
            (BtnMode, Button(8)),
            (BtnSelect, Button(9)),
            (BtnStart, Button(10)),
        ],
        &[
            (0, (0, 255)),
            (1, (0, 255)),
            (2, (0, 255)),
            (3, (0, 255)),
            (4, (0, 255)),
            (5, (0, 255)),
            (6, HAT_RANGE),
            (7, HAT_RANGE),
        ],
    );

    // Logitech Gamepad F710
    let f710 = DeviceProfile::new(
        "Logitech Gamepad F710",
        &with_xbox_axes(&F710_BUTTONS),
        &[
            (0, STICK_RANGE),
            (1, STICK_RANGE),
            (2, (0, 255)),
            (3, STICK_RANGE),
            (4, STICK_RANGE),
            (5, (0, 255)),
            (6, HAT_RANGE),
            (7, HAT_RANGE),
        ],
    );

    // Microsoft X-Box One pad
    let xone = DeviceProfile::new(
        "Microsoft X-Box One pad",
        &with_xbox_axes(&F710_BUTTONS),
        &[
            (0, STICK_RANGE),
            (1, STICK_RANGE),
            (2, (0, 1023)),
            (3, STICK_RANGE),
            (4, (-32768, -32767)),
            (5, (0, 1023)),
            (6, HAT_RANGE),
            (7, HAT_RANGE),
        ],
    );

    // Microsoft X-Box One S pad: same code map as the X-Box One pad, but the
    // triggers report a signed range.
    let xone_s = DeviceProfile::new(
        "Microsoft X-Box One S pad",
        &with_xbox_axes(&F710_BUTTONS),
        &[
            (0, STICK_RANGE),
            (1, STICK_RANGE),
            (2, (-1023, 1023)),
            (3, STICK_RANGE),
            (4, STICK_RANGE),
            (5, (-1023, 1023)),
            (6, HAT_RANGE),
            (7, HAT_RANGE),
        ],
    );

    vec![x360, ps4, f710, xone, xone_s]
}
