// Input handling system
//
// This module maps physical inputs (keyboard keys, mouse buttons, gamepad buttons,
// sticks and triggers) to logical names per player, and answers per-frame queries
// like "was Jump pressed this frame" or "what is MoveX right now".
//
// ## Architecture
//
// - `device`: Raw device snapshot, window event accumulation, gamepad sources
// - `button`: Digital controls with press/release edge tracking
// - `axis`: Analog controls (key pairs and sticks) with deadzone and smoothing
// - `binding`: A control plus an optional modifier gate (Shift + E style chords)
// - `set`: Every binding registered under one logical name
// - `player`: Per-player registry of logical names and batch queries
// - `config`: Manager settings
// - `manager`: Main input manager coordinating everything
// - `action`: Logical names used by the game and their default bindings
//
// ## Usage Example
//
// ```rust
// use engine::input::{action, InputManager, NoGamepads};
//
// // Create input manager for 4 players with the default bindings
// let mut input_manager = InputManager::new(4);
// action::install_defaults(&mut input_manager)?;
//
// // In your event loop, forward window events
// input_manager.process_window_event(&event);
//
// // Once per frame, before game logic
// input_manager.update(delta_time, &mut NoGamepads);
//
// if input_manager.button_pressed(0, action::JUMP) {
//     // Player 0 just pressed jump!
// }
// let horizontal = input_manager.axis_state(0, action::MOVE_X);
// ```

pub mod action;
pub mod axis;
pub mod binding;
pub mod button;
pub mod config;
pub mod device;
pub mod manager;
pub mod player;
pub mod set;

// Re-export commonly used types
pub use axis::{AxisControl, AxisSource, Stick, StickAxis};
pub use binding::{AxisBinding, ButtonBinding};
pub use button::{ButtonControl, ButtonSource, ButtonState, GamepadButton};
pub use config::InputConfig;
pub use device::{
    GamepadButtons, GamepadSource, GamepadState, NoGamepads, RawDeviceSnapshot,
    VirtualGamepads, WindowInput,
};
pub use manager::InputManager;
pub use player::{Filter, PlayerRegistry};
pub use set::{AxisBindingSet, ButtonBindingSet, SharedAxisSet, SharedButtonSet};

/// Errors raised while registering or looking up bindings
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Binding set needs at least one binding")]
    EmptyBindingSet,

    #[error("Binding name must not be empty")]
    EmptyName,

    #[error("Modifier chain of '{0}' leads back to itself")]
    ModifierCycle(String),

    #[error("Modifier of '{name}' already belongs to player {owner}")]
    ForeignModifier { name: String, owner: usize },

    #[error("Unknown player: {0}")]
    UnknownPlayer(usize),

    #[error("Invalid filter: {0} (expected 'any' or 'all')")]
    InvalidFilter(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_display() {
        let err = InputError::UnknownPlayer(7);
        assert_eq!(err.to_string(), "Unknown player: 7");

        let err = InputError::ModifierCycle("Dash".to_string());
        assert_eq!(err.to_string(), "Modifier chain of 'Dash' leads back to itself");

        let err = InputError::ForeignModifier {
            name: "Dash".to_string(),
            owner: 1,
        };
        assert_eq!(err.to_string(), "Modifier of 'Dash' already belongs to player 1");
    }
}
