// Raw device state sampled once per frame
//
// Everything the binding engine reads about the physical world goes through
// `RawDeviceSnapshot`. Keyboard and mouse state is accumulated from winit window
// events by `WindowInput`; gamepads are polled through the `GamepadSource` trait.

use bitflags::bitflags;
use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

bitflags! {
    /// Digital gamepad buttons held during a frame
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GamepadButtons: u32 {
        const DPAD_UP = 1;
        const DPAD_DOWN = 1 << 1;
        const DPAD_LEFT = 1 << 2;
        const DPAD_RIGHT = 1 << 3;
        const START = 1 << 4;
        const BACK = 1 << 5;
        const LEFT_STICK = 1 << 6;
        const RIGHT_STICK = 1 << 7;
        const LEFT_SHOULDER = 1 << 8;
        const RIGHT_SHOULDER = 1 << 9;
        const GUIDE = 1 << 11;
        const A = 1 << 12;
        const B = 1 << 13;
        const X = 1 << 14;
        const Y = 1 << 15;
        const LEFT_THUMBSTICK_LEFT = 1 << 21;
        const RIGHT_TRIGGER = 1 << 22;
        const LEFT_TRIGGER = 1 << 23;
        const RIGHT_THUMBSTICK_UP = 1 << 24;
        const RIGHT_THUMBSTICK_DOWN = 1 << 25;
        const RIGHT_THUMBSTICK_RIGHT = 1 << 26;
        const RIGHT_THUMBSTICK_LEFT = 1 << 27;
        const LEFT_THUMBSTICK_UP = 1 << 28;
        const LEFT_THUMBSTICK_DOWN = 1 << 29;
        const LEFT_THUMBSTICK_RIGHT = 1 << 30;
    }
}

impl Default for GamepadButtons {
    fn default() -> Self {
        Self::empty()
    }
}

/// Analog and digital state of one gamepad
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadState {
    /// Left thumbstick, each component in [-1, 1]
    pub left_stick: Vec2,
    /// Right thumbstick, each component in [-1, 1]
    pub right_stick: Vec2,
    /// Left trigger in [0, 1]
    pub left_trigger: f32,
    /// Right trigger in [0, 1]
    pub right_trigger: f32,
    /// Digital buttons currently held
    pub buttons: GamepadButtons,
}

impl GamepadState {
    /// Check if every button in `buttons` is held
    pub fn is_button_down(&self, buttons: GamepadButtons) -> bool {
        !buttons.is_empty() && self.buttons.contains(buttons)
    }

    pub fn with_buttons(mut self, buttons: GamepadButtons) -> Self {
        self.buttons = buttons;
        self
    }

    pub fn with_left_stick(mut self, x: f32, y: f32) -> Self {
        self.left_stick = Vec2::new(x, y);
        self
    }

    pub fn with_right_stick(mut self, x: f32, y: f32) -> Self {
        self.right_stick = Vec2::new(x, y);
        self
    }

    pub fn with_triggers(mut self, left: f32, right: f32) -> Self {
        self.left_trigger = left;
        self.right_trigger = right;
        self
    }
}

/// Per-player gamepad entry in a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GamepadSnapshot {
    /// Result of the most recent capability check
    pub connected: bool,
    /// Sampled state, all zero when disconnected
    pub state: GamepadState,
}

/// Immutable per-frame sample of every input device
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawDeviceSnapshot {
    pub keys_held: HashSet<KeyCode>,
    pub mouse_left_down: bool,
    pub mouse_right_down: bool,
    pub mouse_middle_down: bool,
    /// Direction the wheel moved since the previous frame: -1, 0 or 1
    pub mouse_scroll_delta: i8,
    /// One entry per player slot
    pub gamepads: Vec<GamepadSnapshot>,
}

impl RawDeviceSnapshot {
    /// Create an empty snapshot with a disconnected pad for each player
    pub fn new(max_players: usize) -> Self {
        Self {
            gamepads: vec![GamepadSnapshot::default(); max_players],
            ..Default::default()
        }
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Check if a mouse button is held. Buttons other than left, right and
    /// middle are never reported as held.
    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        match button {
            MouseButton::Left => self.mouse_left_down,
            MouseButton::Right => self.mouse_right_down,
            MouseButton::Middle => self.mouse_middle_down,
            _ => false,
        }
    }

    /// Gamepad entry for a player, `None` for slots outside the snapshot
    pub fn gamepad(&self, player: usize) -> Option<&GamepadSnapshot> {
        self.gamepads.get(player)
    }

    pub fn hold_key(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn set_mouse_down(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.mouse_left_down = down,
            MouseButton::Right => self.mouse_right_down = down,
            MouseButton::Middle => self.mouse_middle_down = down,
            _ => {}
        }
    }

    /// Mark a player's pad as connected with the given state
    pub fn connect_gamepad(&mut self, player: usize, state: GamepadState) {
        if self.gamepads.len() <= player {
            self.gamepads.resize(player + 1, GamepadSnapshot::default());
        }
        self.gamepads[player] = GamepadSnapshot {
            connected: true,
            state,
        };
    }

    pub fn disconnect_gamepad(&mut self, player: usize) {
        if let Some(pad) = self.gamepads.get_mut(player) {
            *pad = GamepadSnapshot::default();
        }
    }
}

/// Gamepad polling backend
///
/// Capability checks can be expensive on some platforms, so the manager only calls
/// `is_connected` on its refresh interval. `poll` runs every frame for pads that
/// were connected at the last check.
pub trait GamepadSource {
    fn is_connected(&mut self, player: usize) -> bool;
    fn poll(&mut self, player: usize) -> GamepadState;
}

/// Backend for platforms without gamepad support
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGamepads;

impl GamepadSource for NoGamepads {
    fn is_connected(&mut self, _player: usize) -> bool {
        false
    }

    fn poll(&mut self, _player: usize) -> GamepadState {
        GamepadState::default()
    }
}

/// In-memory gamepads driven by code (replays, bots, tests)
#[derive(Debug, Clone, Default)]
pub struct VirtualGamepads {
    pads: Vec<Option<GamepadState>>,
    capability_checks: usize,
}

impl VirtualGamepads {
    pub fn new(max_players: usize) -> Self {
        Self {
            pads: vec![None; max_players],
            capability_checks: 0,
        }
    }

    /// Plug in a pad for a player, or replace its state if already plugged in
    pub fn plug(&mut self, player: usize, state: GamepadState) {
        if self.pads.len() <= player {
            self.pads.resize(player + 1, None);
        }
        self.pads[player] = Some(state);
    }

    pub fn unplug(&mut self, player: usize) {
        if let Some(pad) = self.pads.get_mut(player) {
            *pad = None;
        }
    }

    /// Number of capability checks performed so far
    pub fn capability_checks(&self) -> usize {
        self.capability_checks
    }
}

impl GamepadSource for VirtualGamepads {
    fn is_connected(&mut self, player: usize) -> bool {
        self.capability_checks += 1;
        matches!(self.pads.get(player), Some(Some(_)))
    }

    fn poll(&mut self, player: usize) -> GamepadState {
        self.pads
            .get(player)
            .copied()
            .flatten()
            .unwrap_or_default()
    }
}

/// Keyboard and mouse state accumulated from window events between frames
#[derive(Debug)]
pub struct WindowInput {
    keys_held: HashSet<KeyCode>,
    mouse_left_down: bool,
    mouse_right_down: bool,
    mouse_middle_down: bool,
    /// Wheel movement since the last capture
    scroll: f32,
    focused: bool,
}

impl WindowInput {
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            mouse_left_down: false,
            mouse_right_down: false,
            mouse_middle_down: false,
            scroll: 0.0,
            focused: true,
        }
    }

    /// Process a window event from winit
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                // Only physical keys; repeats don't change the held set
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(key_code),
                        ElementState::Released => self.release_key(key_code),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.set_mouse_button(*button, *state == ElementState::Pressed);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let amount = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                self.scroll(amount);
            }
            WindowEvent::Focused(focused) => self.set_focused(*focused),
            _ => {}
        }
    }

    pub fn press_key(&mut self, key: KeyCode) {
        self.keys_held.insert(key);
    }

    pub fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn set_mouse_button(&mut self, button: MouseButton, down: bool) {
        match button {
            MouseButton::Left => self.mouse_left_down = down,
            MouseButton::Right => self.mouse_right_down = down,
            MouseButton::Middle => self.mouse_middle_down = down,
            _ => {}
        }
    }

    pub fn scroll(&mut self, amount: f32) {
        self.scroll += amount;
    }

    /// Update window focus. Losing focus drops everything held, since the
    /// matching release events go to another window.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused && !focused {
            log::debug!(
                "Window lost focus, clearing {} held keys",
                self.keys_held.len()
            );
            self.keys_held.clear();
            self.mouse_left_down = false;
            self.mouse_right_down = false;
            self.mouse_middle_down = false;
            self.scroll = 0.0;
        }
        self.focused = focused;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Build the snapshot for this frame and reset the scroll accumulator
    pub fn capture(&mut self, gamepads: &[GamepadSnapshot]) -> RawDeviceSnapshot {
        let mouse_scroll_delta = if self.scroll > 0.0 {
            1
        } else if self.scroll < 0.0 {
            -1
        } else {
            0
        };
        self.scroll = 0.0;

        RawDeviceSnapshot {
            keys_held: self.keys_held.clone(),
            mouse_left_down: self.mouse_left_down,
            mouse_right_down: self.mouse_right_down,
            mouse_middle_down: self.mouse_middle_down,
            mouse_scroll_delta,
            gamepads: gamepads.to_vec(),
        }
    }
}

impl Default for WindowInput {
    fn default() -> Self {
        Self::new()
    }
}
