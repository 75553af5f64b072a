// Game action names and default bindings

use super::axis::{Stick, StickAxis};
use super::binding::{AxisBinding, ButtonBinding};
use super::button::GamepadButton;
use super::manager::InputManager;
use super::InputError;
use winit::keyboard::KeyCode;

// Axes
pub const MOVE_X: &str = "MoveX";
pub const MOVE_Y: &str = "MoveY";

// Buttons
pub const JUMP: &str = "Jump";
pub const SPRINT: &str = "Sprint";
pub const MENU: &str = "Menu";

/// Key-driven axes ramp up at this rate (units per second)
const KEY_SENSITIVITY: f32 = 8.0;

/// Key-driven axes fall back to rest at this rate
const KEY_GRAVITY: f32 = 12.0;

fn key_axis(positive: KeyCode, negative: KeyCode) -> AxisBinding {
    AxisBinding::from_keys(positive, negative)
        .with_sensitivity(KEY_SENSITIVITY)
        .with_gravity(KEY_GRAVITY)
}

/// Register the default bindings for every player, replacing any bindings
/// already registered under these names
///
/// Keyboard bindings are shared by all players; each player's gamepad
/// bindings read that player's own pad.
pub fn install_defaults(manager: &mut InputManager) -> Result<(), InputError> {
    manager.add_axis_bindings(
        MOVE_X,
        true,
        None,
        &[
            key_axis(KeyCode::KeyD, KeyCode::KeyA),
            key_axis(KeyCode::ArrowRight, KeyCode::ArrowLeft),
            AxisBinding::from_stick(Stick::Left, StickAxis::X),
        ],
    )?;

    manager.add_axis_bindings(
        MOVE_Y,
        true,
        None,
        &[
            key_axis(KeyCode::KeyW, KeyCode::KeyS),
            key_axis(KeyCode::ArrowUp, KeyCode::ArrowDown),
            AxisBinding::from_stick(Stick::Left, StickAxis::Y),
        ],
    )?;

    manager.add_button_bindings(
        JUMP,
        true,
        None,
        &[
            ButtonBinding::from_key(KeyCode::Space),
            ButtonBinding::from_gamepad(GamepadButton::A),
        ],
    )?;

    // Sprint only counts while Shift is held
    manager.add_button_bindings(
        SPRINT,
        true,
        None,
        &[
            ButtonBinding::from_key(KeyCode::KeyW)
                .with_modifier_binding(ButtonBinding::from_key(KeyCode::ShiftLeft)),
            ButtonBinding::from_gamepad(GamepadButton::LeftStick),
        ],
    )?;

    manager.add_button_bindings(
        MENU,
        true,
        None,
        &[
            ButtonBinding::from_key(KeyCode::Escape),
            ButtonBinding::from_gamepad(GamepadButton::Start),
        ],
    )?;

    log::info!(
        "Installed default bindings for {} players",
        manager.num_players()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::{GamepadButtons, GamepadState, NoGamepads, VirtualGamepads};
    use crate::engine::input::player::Filter;

    const DT: f32 = 0.016;

    #[test]
    fn test_defaults_registered_for_every_player() {
        let mut manager = InputManager::new(4);
        install_defaults(&mut manager).unwrap();

        for player_id in 0..4 {
            let player = manager.player(player_id).unwrap();
            assert!(player.has_axis(MOVE_X));
            assert!(player.has_axis(MOVE_Y));
            assert!(player.has_button(JUMP));
            assert!(player.has_button(SPRINT));
            assert!(player.has_button(MENU));
        }
    }

    #[test]
    fn test_install_twice_replaces() {
        let mut manager = InputManager::new(1);
        install_defaults(&mut manager).unwrap();
        install_defaults(&mut manager).unwrap();

        let jump = manager.player(0).unwrap().button_set(JUMP).unwrap();
        assert_eq!(jump.borrow().bindings().len(), 2);
    }

    #[test]
    fn test_sprint_needs_shift() {
        let mut manager = InputManager::new(1);
        let mut pads = NoGamepads;
        install_defaults(&mut manager).unwrap();

        manager.window_input_mut().press_key(KeyCode::KeyW);
        manager.update(DT, &mut pads);
        assert!(!manager.button_down(0, SPRINT));
        assert!(manager.axis_state(0, MOVE_Y) > 0.0);

        manager.window_input_mut().press_key(KeyCode::ShiftLeft);
        manager.update(DT, &mut pads);
        assert!(manager.button_down(0, SPRINT));
    }

    #[test]
    fn test_gamepad_jump_per_player() {
        let mut manager = InputManager::new(2);
        let mut pads = VirtualGamepads::new(2);
        pads.plug(1, GamepadState::default().with_buttons(GamepadButtons::A));
        install_defaults(&mut manager).unwrap();

        manager.update(DT, &mut pads);
        assert!(!manager.button_down(0, JUMP));
        assert!(manager.button_pressed(1, JUMP));
        assert!(manager.buttons_down(1, Filter::Any, Some(&[JUMP, MENU])));
        assert!(!manager.buttons_down(1, Filter::All, Some(&[JUMP, MENU])));
    }

    #[test]
    fn test_move_x_from_stick() {
        let mut manager = InputManager::new(1);
        let mut pads = VirtualGamepads::new(1);
        pads.plug(0, GamepadState::default().with_left_stick(-0.5, 0.0));
        install_defaults(&mut manager).unwrap();

        manager.update(DT, &mut pads);
        assert!(manager.axis_state(0, MOVE_X) < 0.0);
    }
}
