/// Number of logical axis channels in the normalized state.
pub const AXIS_COUNT: usize = 8;

/// Number of logical button channels in the normalized state.
pub const BUTTON_COUNT: usize = 11;

/// The current normalized joystick snapshot.
///
/// One instance lives for the whole process, owned by the scheduler task and
/// mutated in place as events arrive. Channel indices are guaranteed in-bounds
/// by profile validation, so the setters do plain indexing.
#[derive(Debug, Clone, PartialEq)]
pub struct JoyState {
    axes: [f32; AXIS_COUNT],
    buttons: [i32; BUTTON_COUNT],
}

impl Default for JoyState {
    fn default() -> Self {
        Self {
            axes: [0.0; AXIS_COUNT],
            buttons: [0; BUTTON_COUNT],
        }
    }
}

impl JoyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_axis(&mut self, index: usize, value: f32) {
        self.axes[index] = value;
    }

    pub fn set_button(&mut self, index: usize, state: i32) {
        self.buttons[index] = state;
    }

    pub fn axes(&self) -> &[f32] {
        &self.axes
    }

    pub fn buttons(&self) -> &[i32] {
        &self.buttons
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let state = JoyState::new();
        assert_eq!(state.axes(), &[0.0; AXIS_COUNT]);
        assert_eq!(state.buttons(), &[0; BUTTON_COUNT]);
    }

    #[test]
    fn mutates_in_place() {
        let mut state = JoyState::new();
        state.set_axis(3, -0.5);
        state.set_button(10, 1);
        assert_eq!(state.axes()[3], -0.5);
        assert_eq!(state.buttons()[10], 1);
        // Other channels untouched
        assert_eq!(state.axes()[0], 0.0);
        assert_eq!(state.buttons()[0], 0);
    }
}
