// Analog controls: gamepad thumbsticks and key pairs emulating an analog axis

use super::device::RawDeviceSnapshot;
use crate::core::math::{apply_deadzone, clamp_axis};
use winit::keyboard::KeyCode;

/// Deadzone used when none is configured
pub const DEFAULT_DEADZONE: f32 = 0.05;

/// Per-second rate used by key axes without a sensitivity; large enough to reach
/// full deflection within a single frame.
const SNAP_SENSITIVITY: f32 = 42_069.133;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stick {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StickAxis {
    X,
    Y,
}

/// Represents a physical analog input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisSource {
    /// Two keys driving an emulated axis towards +1 and -1
    Keys { positive: KeyCode, negative: KeyCode },
    /// One component of a gamepad thumbstick
    Stick { stick: Stick, axis: StickAxis },
}

/// Continuous control producing a value in [-1, 1]
///
/// Key axes keep their value between frames: holding a key accelerates the value
/// by `sensitivity` per second, and releasing everything pulls it back towards
/// zero by `gravity` per second. Without a gravity the value snaps to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisControl {
    source: AxisSource,
    deadzone: f32,
    reverse: bool,
    sensitivity: Option<f32>,
    gravity: Option<f32>,
    state: f32,
}

impl AxisControl {
    pub fn new(source: AxisSource) -> Self {
        Self {
            source,
            deadzone: DEFAULT_DEADZONE,
            reverse: false,
            sensitivity: None,
            gravity: None,
            state: 0.0,
        }
    }

    /// Create an axis emulated from two keys
    pub fn from_keys(positive: KeyCode, negative: KeyCode) -> Self {
        Self::new(AxisSource::Keys { positive, negative })
    }

    /// Create an axis reading one thumbstick component
    pub fn from_stick(stick: Stick, axis: StickAxis) -> Self {
        Self::new(AxisSource::Stick { stick, axis })
    }

    /// Set the magnitude at or below which the axis reads as zero
    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.deadzone = deadzone;
        self
    }

    /// Invert the axis
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Acceleration per second while a key is held (key axes only)
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = Some(sensitivity);
        self
    }

    /// Return-to-zero rate per second once keys are released (key axes only)
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn source(&self) -> AxisSource {
        self.source
    }

    pub fn deadzone(&self) -> f32 {
        self.deadzone
    }

    pub fn is_reversed(&self) -> bool {
        self.reverse
    }

    pub fn sensitivity(&self) -> Option<f32> {
        self.sensitivity
    }

    pub fn gravity(&self) -> Option<f32> {
        self.gravity
    }

    /// Current value with the deadzone applied
    pub fn state(&self) -> f32 {
        apply_deadzone(self.state, self.deadzone)
    }

    /// Stored value before the deadzone gate
    pub fn raw_state(&self) -> f32 {
        self.state
    }

    pub fn set_state(&mut self, value: f32) {
        self.state = value;
    }

    pub(crate) fn update(&mut self, snapshot: &RawDeviceSnapshot, player: usize, delta_time: f32) {
        match self.source {
            AxisSource::Keys { positive, negative } => {
                self.update_keys(snapshot, positive, negative, delta_time)
            }
            AxisSource::Stick { stick, axis } => self.update_stick(snapshot, player, stick, axis),
        }
    }

    fn update_stick(
        &mut self,
        snapshot: &RawDeviceSnapshot,
        player: usize,
        stick: Stick,
        axis: StickAxis,
    ) {
        // A missing or disconnected pad reads as centered
        let pad = snapshot
            .gamepad(player)
            .filter(|pad| pad.connected)
            .map(|pad| pad.state)
            .unwrap_or_default();

        let position = match stick {
            Stick::Left => pad.left_stick,
            Stick::Right => pad.right_stick,
        };
        let mut value = match axis {
            StickAxis::X => position.x,
            StickAxis::Y => position.y,
        };

        if self.reverse {
            value = -value;
        }

        self.state = clamp_axis(apply_deadzone(value, self.deadzone));
    }

    fn update_keys(
        &mut self,
        snapshot: &RawDeviceSnapshot,
        positive: KeyCode,
        negative: KeyCode,
        delta_time: f32,
    ) {
        let sensitivity = self.sensitivity.unwrap_or(SNAP_SENSITIVITY);
        let mut value = 0.0;

        if snapshot.is_key_held(positive) {
            value += sensitivity;
        }
        if snapshot.is_key_held(negative) {
            value -= sensitivity;
        }

        if self.reverse {
            value = -value;
        }

        let mut returning = false;
        if value.abs() <= self.deadzone {
            value = 0.0;
            match self.gravity {
                None => self.state = 0.0,
                Some(gravity) if self.state.abs() > self.deadzone => {
                    value = if self.state > 0.0 { -gravity } else { gravity };
                    returning = true;
                }
                Some(_) => {}
            }
        }

        let next = clamp_axis(self.state + value * delta_time);

        // Gravity settles on zero instead of swinging past it
        self.state = if returning && next * self.state < 0.0 {
            0.0
        } else {
            next
        };
    }

    /// Fresh control with the same configuration and a zeroed value
    pub fn deep_copy(&self) -> Self {
        Self {
            state: 0.0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::device::GamepadState;
    use approx::assert_relative_eq;

    fn stick_snapshot(x: f32, y: f32) -> RawDeviceSnapshot {
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.connect_gamepad(0, GamepadState::default().with_left_stick(x, y));
        snapshot
    }

    #[test]
    fn test_defaults() {
        let axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA);
        assert_eq!(axis.deadzone(), DEFAULT_DEADZONE);
        assert!(!axis.is_reversed());
        assert_eq!(axis.sensitivity(), None);
        assert_eq!(axis.gravity(), None);
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_stick_within_deadzone_is_zero() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::X).with_deadzone(0.1);
        axis.update(&stick_snapshot(0.05, 0.0), 0, 0.016);
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_stick_value_passes_through() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::X).with_deadzone(0.1);
        axis.update(&stick_snapshot(0.5, 0.0), 0, 0.016);
        assert_eq!(axis.state(), 0.5);
    }

    #[test]
    fn test_stick_reverse() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::X)
            .with_deadzone(0.1)
            .with_reverse(true);
        axis.update(&stick_snapshot(0.5, 0.0), 0, 0.016);
        assert_eq!(axis.state(), -0.5);
    }

    #[test]
    fn test_stick_component_selection() {
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.connect_gamepad(
            0,
            GamepadState::default()
                .with_left_stick(0.2, 0.3)
                .with_right_stick(-0.6, 0.9),
        );

        let mut left_y = AxisControl::from_stick(Stick::Left, StickAxis::Y);
        let mut right_x = AxisControl::from_stick(Stick::Right, StickAxis::X);
        left_y.update(&snapshot, 0, 0.016);
        right_x.update(&snapshot, 0, 0.016);

        assert_eq!(left_y.state(), 0.3);
        assert_eq!(right_x.state(), -0.6);
    }

    #[test]
    fn test_stick_clamped() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::Y);
        axis.update(&stick_snapshot(0.0, 1.7), 0, 0.016);
        assert_eq!(axis.state(), 1.0);
    }

    #[test]
    fn test_stick_disconnected_reads_zero() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::X);
        let mut snapshot = stick_snapshot(0.8, 0.0);
        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), 0.8);

        snapshot.disconnect_gamepad(0);
        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_keys_without_sensitivity_snap() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA);
        let mut snapshot = RawDeviceSnapshot::new(1);

        snapshot.hold_key(KeyCode::KeyA);
        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), -1.0);

        // No gravity: releasing snaps back immediately
        snapshot.release_key(KeyCode::KeyA);
        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), 0.0);
        assert_eq!(axis.raw_state(), 0.0);
    }

    #[test]
    fn test_keys_accelerate_by_sensitivity() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA).with_sensitivity(10.0);
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.hold_key(KeyCode::KeyD);

        axis.update(&snapshot, 0, 0.05);
        assert_relative_eq!(axis.state(), 0.5, epsilon = 1e-6);

        axis.update(&snapshot, 0, 0.05);
        assert_relative_eq!(axis.state(), 1.0, epsilon = 1e-6);

        axis.update(&snapshot, 0, 0.05);
        assert_eq!(axis.state(), 1.0);
    }

    #[test]
    fn test_keys_reverse() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA).with_reverse(true);
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.hold_key(KeyCode::KeyD);

        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), -1.0);
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA);
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.hold_key(KeyCode::KeyD);
        snapshot.hold_key(KeyCode::KeyA);

        axis.update(&snapshot, 0, 0.016);
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_gravity_single_step() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA)
            .with_sensitivity(10.0)
            .with_gravity(20.0)
            .with_deadzone(0.05);
        axis.set_state(0.8);

        axis.update(&RawDeviceSnapshot::new(1), 0, 0.01);
        assert_relative_eq!(axis.state(), 0.6, epsilon = 1e-5);
    }

    #[test]
    fn test_gravity_never_overshoots_zero() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA)
            .with_sensitivity(10.0)
            .with_gravity(20.0)
            .with_deadzone(0.05);
        axis.set_state(0.8);

        // One step of gravity (2.0) is larger than the value itself
        axis.update(&RawDeviceSnapshot::new(1), 0, 0.1);
        assert_eq!(axis.state(), 0.0);
        assert_eq!(axis.raw_state(), 0.0);
    }

    #[test]
    fn test_gravity_decays_monotonically() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA)
            .with_sensitivity(10.0)
            .with_gravity(20.0)
            .with_deadzone(0.05);
        axis.set_state(-0.8);
        let snapshot = RawDeviceSnapshot::new(1);

        let mut last = axis.raw_state();
        for _ in 0..10 {
            axis.update(&snapshot, 0, 0.016);
            let current = axis.raw_state();
            assert!(current <= 0.0, "Value swung past zero: {}", current);
            assert!(current.abs() <= last.abs());
            last = current;
        }
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_gravity_stops_inside_deadzone() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA)
            .with_gravity(20.0)
            .with_deadzone(0.05);
        axis.set_state(0.03);

        axis.update(&RawDeviceSnapshot::new(1), 0, 0.016);
        assert_eq!(axis.raw_state(), 0.03);
        assert_eq!(axis.state(), 0.0);
    }

    #[test]
    fn test_state_reads_through_deadzone() {
        let mut axis = AxisControl::from_stick(Stick::Left, StickAxis::X).with_deadzone(0.2);
        axis.set_state(0.15);
        assert_eq!(axis.state(), 0.0);
        assert_eq!(axis.raw_state(), 0.15);

        axis.set_state(0.25);
        assert_eq!(axis.state(), 0.25);
    }

    #[test]
    fn test_deep_copy_resets_value() {
        let mut axis = AxisControl::from_keys(KeyCode::KeyD, KeyCode::KeyA)
            .with_sensitivity(4.0)
            .with_gravity(8.0)
            .with_reverse(true);
        axis.set_state(0.7);

        let copy = axis.deep_copy();
        assert_eq!(copy.source(), axis.source());
        assert_eq!(copy.sensitivity(), Some(4.0));
        assert_eq!(copy.gravity(), Some(8.0));
        assert!(copy.is_reversed());
        assert_eq!(copy.raw_state(), 0.0);
    }
}
