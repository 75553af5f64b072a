// Digital controls: keyboard keys, mouse buttons and gamepad buttons

use super::device::{GamepadButtons, GamepadState, RawDeviceSnapshot};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Analog trigger value above which a trigger counts as a held button
pub const TRIGGER_THRESHOLD: f32 = 0.333;

/// State of a digital control for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
    /// The gamepad backing the control is not connected
    Disconnected,
}

/// A single gamepad button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    Start,
    Back,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    Guide,
    A,
    B,
    X,
    Y,
    LeftTrigger,
    RightTrigger,
    LeftThumbstickUp,
    LeftThumbstickDown,
    LeftThumbstickLeft,
    LeftThumbstickRight,
    RightThumbstickUp,
    RightThumbstickDown,
    RightThumbstickLeft,
    RightThumbstickRight,
}

impl GamepadButton {
    /// Bit for this button in the pad's digital button mask
    pub fn mask(self) -> GamepadButtons {
        match self {
            Self::DPadUp => GamepadButtons::DPAD_UP,
            Self::DPadDown => GamepadButtons::DPAD_DOWN,
            Self::DPadLeft => GamepadButtons::DPAD_LEFT,
            Self::DPadRight => GamepadButtons::DPAD_RIGHT,
            Self::Start => GamepadButtons::START,
            Self::Back => GamepadButtons::BACK,
            Self::LeftStick => GamepadButtons::LEFT_STICK,
            Self::RightStick => GamepadButtons::RIGHT_STICK,
            Self::LeftShoulder => GamepadButtons::LEFT_SHOULDER,
            Self::RightShoulder => GamepadButtons::RIGHT_SHOULDER,
            Self::Guide => GamepadButtons::GUIDE,
            Self::A => GamepadButtons::A,
            Self::B => GamepadButtons::B,
            Self::X => GamepadButtons::X,
            Self::Y => GamepadButtons::Y,
            Self::LeftTrigger => GamepadButtons::LEFT_TRIGGER,
            Self::RightTrigger => GamepadButtons::RIGHT_TRIGGER,
            Self::LeftThumbstickUp => GamepadButtons::LEFT_THUMBSTICK_UP,
            Self::LeftThumbstickDown => GamepadButtons::LEFT_THUMBSTICK_DOWN,
            Self::LeftThumbstickLeft => GamepadButtons::LEFT_THUMBSTICK_LEFT,
            Self::LeftThumbstickRight => GamepadButtons::LEFT_THUMBSTICK_RIGHT,
            Self::RightThumbstickUp => GamepadButtons::RIGHT_THUMBSTICK_UP,
            Self::RightThumbstickDown => GamepadButtons::RIGHT_THUMBSTICK_DOWN,
            Self::RightThumbstickLeft => GamepadButtons::RIGHT_THUMBSTICK_LEFT,
            Self::RightThumbstickRight => GamepadButtons::RIGHT_THUMBSTICK_RIGHT,
        }
    }

    /// Read this button from a pad state. Triggers are analog and are
    /// compared against `TRIGGER_THRESHOLD`.
    fn is_down(self, state: &GamepadState) -> bool {
        match self {
            Self::LeftTrigger => state.left_trigger > TRIGGER_THRESHOLD,
            Self::RightTrigger => state.right_trigger > TRIGGER_THRESHOLD,
            _ => state.is_button_down(self.mask()),
        }
    }
}

/// Represents a physical digital input (keyboard key, mouse button, or gamepad button)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonSource {
    Keyboard(KeyCode),
    Mouse(MouseButton),
    Gamepad(GamepadButton),
}

impl ButtonSource {
    /// Create a keyboard input source
    pub fn key(code: KeyCode) -> Self {
        Self::Keyboard(code)
    }

    /// Create a mouse button input source
    pub fn mouse(button: MouseButton) -> Self {
        Self::Mouse(button)
    }

    /// Create a gamepad button input source
    pub fn gamepad(button: GamepadButton) -> Self {
        Self::Gamepad(button)
    }
}

/// Edge-tracking state machine for one digital input
///
/// Each update shifts the current state into the previous slot and samples a
/// fresh one, so `pressed` and `released` hold for exactly one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonControl {
    source: ButtonSource,
    previous: ButtonState,
    current: ButtonState,
}

impl ButtonControl {
    pub fn new(source: ButtonSource) -> Self {
        Self {
            source,
            previous: ButtonState::Up,
            current: ButtonState::Up,
        }
    }

    pub fn source(&self) -> ButtonSource {
        self.source
    }

    /// State this frame
    pub fn current_state(&self) -> ButtonState {
        self.current
    }

    /// State last frame
    pub fn previous_state(&self) -> ButtonState {
        self.previous
    }

    /// Went down this frame
    pub fn pressed(&self) -> bool {
        self.previous == ButtonState::Up && self.current == ButtonState::Down
    }

    /// Went up this frame
    pub fn released(&self) -> bool {
        self.previous == ButtonState::Down && self.current == ButtonState::Up
    }

    pub fn down(&self) -> bool {
        self.current == ButtonState::Down
    }

    pub fn up(&self) -> bool {
        !self.down()
    }

    /// Sample the snapshot for a new frame
    pub(crate) fn update(&mut self, snapshot: &RawDeviceSnapshot, player: usize) {
        let held = match self.source {
            ButtonSource::Keyboard(key) => snapshot.is_key_held(key),
            ButtonSource::Mouse(button) => snapshot.is_mouse_down(button),
            ButtonSource::Gamepad(button) => {
                let pad = snapshot.gamepad(player).filter(|pad| pad.connected);
                let Some(pad) = pad else {
                    // Keep the previous state untouched so a reconnect can't
                    // produce an edge against stale data
                    self.current = ButtonState::Disconnected;
                    return;
                };
                button.is_down(&pad.state)
            }
        };

        self.previous = self.current;
        self.current = if held {
            ButtonState::Down
        } else {
            ButtonState::Up
        };
    }

    /// Fresh control with the same configuration and no history
    pub fn deep_copy(&self) -> Self {
        Self::new(self.source)
    }
}
