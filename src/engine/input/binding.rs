// Bindings: one physical control plus an optional modifier gate
//
// A modifier is a shared button set that must be held for the binding to count,
// which is how chords such as Shift+Click are expressed. Modifiers are shared
// handles, so several bindings can be gated by the same set.

use super::axis::{AxisControl, AxisSource, Stick, StickAxis};
use super::button::{ButtonControl, ButtonSource, GamepadButton};
use super::device::RawDeviceSnapshot;
use super::set::{ButtonBindingSet, SharedButtonSet};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Digital binding
#[derive(Debug)]
pub struct ButtonBinding {
    control: ButtonControl,
    modifier: Option<SharedButtonSet>,
}

impl ButtonBinding {
    pub fn new(control: ButtonControl) -> Self {
        Self {
            control,
            modifier: None,
        }
    }

    pub fn from_source(source: ButtonSource) -> Self {
        Self::new(ButtonControl::new(source))
    }

    pub fn from_key(key: KeyCode) -> Self {
        Self::from_source(ButtonSource::key(key))
    }

    pub fn from_mouse(button: MouseButton) -> Self {
        Self::from_source(ButtonSource::mouse(button))
    }

    pub fn from_gamepad(button: GamepadButton) -> Self {
        Self::from_source(ButtonSource::gamepad(button))
    }

    /// Gate this binding on a set that must be held
    pub fn with_modifier(mut self, modifier: SharedButtonSet) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Gate this binding on a single other binding
    pub fn with_modifier_binding(self, modifier: ButtonBinding) -> Self {
        self.with_modifier(ButtonBindingSet::single(modifier).into_shared())
    }

    pub fn control(&self) -> &ButtonControl {
        &self.control
    }

    pub fn source(&self) -> ButtonSource {
        self.control.source()
    }

    pub fn modifier(&self) -> Option<&SharedButtonSet> {
        self.modifier.as_ref()
    }

    fn modifier_down(&self) -> bool {
        self.modifier
            .as_ref()
            .map_or(true, |modifier| modifier.borrow().down())
    }

    pub fn pressed(&self) -> bool {
        self.control.pressed() && self.modifier_down()
    }

    pub fn released(&self) -> bool {
        self.control.released() && self.modifier_down()
    }

    pub fn down(&self) -> bool {
        self.control.down() && self.modifier_down()
    }

    /// Up when either the control or the modifier is up. This is deliberately
    /// not the negation of `down`.
    pub fn up(&self) -> bool {
        self.control.up()
            || self
                .modifier
                .as_ref()
                .map_or(false, |modifier| modifier.borrow().up())
    }

    /// Advance the modifier, then the control
    pub(crate) fn update(&mut self, snapshot: &RawDeviceSnapshot, player_id: usize, delta_time: f32) {
        if let Some(modifier) = &self.modifier {
            modifier.borrow_mut().update(snapshot, delta_time);
        }
        self.control.update(snapshot, player_id);
    }

    pub(crate) fn new_frame(&self) {
        if let Some(modifier) = &self.modifier {
            modifier.borrow_mut().new_frame();
        }
    }

    pub(crate) fn set_player(&self, player_id: usize) {
        if let Some(modifier) = &self.modifier {
            modifier.borrow_mut().set_player(player_id);
        }
    }

    /// Independent copy: fresh control state and a deep-copied modifier
    pub fn deep_copy(&self) -> Self {
        Self {
            control: self.control.deep_copy(),
            modifier: self
                .modifier
                .as_ref()
                .map(|modifier| modifier.borrow().deep_copy().into_shared()),
        }
    }
}

/// Analog binding
#[derive(Debug)]
pub struct AxisBinding {
    control: AxisControl,
    modifier: Option<SharedButtonSet>,
}

impl AxisBinding {
    pub fn new(control: AxisControl) -> Self {
        Self {
            control,
            modifier: None,
        }
    }

    pub fn from_keys(positive: KeyCode, negative: KeyCode) -> Self {
        Self::new(AxisControl::from_keys(positive, negative))
    }

    pub fn from_stick(stick: Stick, axis: StickAxis) -> Self {
        Self::new(AxisControl::from_stick(stick, axis))
    }

    pub fn with_deadzone(mut self, deadzone: f32) -> Self {
        self.control = self.control.with_deadzone(deadzone);
        self
    }

    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.control = self.control.with_reverse(reverse);
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.control = self.control.with_sensitivity(sensitivity);
        self
    }

    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.control = self.control.with_gravity(gravity);
        self
    }

    pub fn with_modifier(mut self, modifier: SharedButtonSet) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn with_modifier_binding(self, modifier: ButtonBinding) -> Self {
        self.with_modifier(ButtonBindingSet::single(modifier).into_shared())
    }

    pub fn control(&self) -> &AxisControl {
        &self.control
    }

    pub fn source(&self) -> AxisSource {
        self.control.source()
    }

    pub fn modifier(&self) -> Option<&SharedButtonSet> {
        self.modifier.as_ref()
    }

    pub fn state(&self) -> f32 {
        match &self.modifier {
            Some(modifier) if !modifier.borrow().down() => 0.0,
            _ => self.control.state(),
        }
    }

    /// Advance the modifier, then the control. A released modifier also zeroes
    /// the smoothed value so it restarts from rest once the modifier is held.
    pub(crate) fn update(&mut self, snapshot: &RawDeviceSnapshot, player_id: usize, delta_time: f32) {
        let Some(modifier) = &self.modifier else {
            self.control.update(snapshot, player_id, delta_time);
            return;
        };

        modifier.borrow_mut().update(snapshot, delta_time);
        self.control.update(snapshot, player_id, delta_time);
        if !modifier.borrow().down() {
            self.control.set_state(0.0);
        }
    }

    pub(crate) fn new_frame(&self) {
        if let Some(modifier) = &self.modifier {
            modifier.borrow_mut().new_frame();
        }
    }

    pub(crate) fn set_player(&self, player_id: usize) {
        if let Some(modifier) = &self.modifier {
            modifier.borrow_mut().set_player(player_id);
        }
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            control: self.control.deep_copy(),
            modifier: self
                .modifier
                .as_ref()
                .map(|modifier| modifier.borrow().deep_copy().into_shared()),
        }
    }
}
