// Binding sets: every physical binding mapped to one logical name
//
// Sets are shared, single-threaded handles because a registered set can also
// gate other bindings as a modifier. The `consumed` flag makes `update`
// idempotent within a frame no matter how many bindings reach the set.

use super::axis::AxisSource;
use super::binding::{AxisBinding, ButtonBinding};
use super::button::ButtonSource;
use super::device::RawDeviceSnapshot;
use super::InputError;
use crate::core::math::is_active_axis;
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedButtonSet = Rc<RefCell<ButtonBindingSet>>;
pub type SharedAxisSet = Rc<RefCell<AxisBindingSet>>;

/// Button bindings combined with OR semantics
#[derive(Debug)]
pub struct ButtonBindingSet {
    key: String,
    player_id: usize,
    /// Set once a registry has claimed this set, directly or as a modifier
    owned: bool,
    bindings: Vec<ButtonBinding>,
    consumed: bool,
}

impl ButtonBindingSet {
    /// Create a set from a non-empty list of bindings
    pub fn new(bindings: Vec<ButtonBinding>) -> Result<Self, InputError> {
        if bindings.is_empty() {
            return Err(InputError::EmptyBindingSet);
        }

        Ok(Self {
            key: String::new(),
            player_id: 0,
            owned: false,
            bindings,
            consumed: false,
        })
    }

    /// Create a set holding exactly one binding
    pub fn single(binding: ButtonBinding) -> Self {
        Self {
            key: String::new(),
            player_id: 0,
            owned: false,
            bindings: vec![binding],
            consumed: false,
        }
    }

    pub fn into_shared(self) -> SharedButtonSet {
        Rc::new(RefCell::new(self))
    }

    /// Logical name this set is registered under (empty if unregistered)
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Player whose registry claimed this set, `None` while unclaimed
    pub fn owner(&self) -> Option<usize> {
        self.owned.then_some(self.player_id)
    }

    pub fn bindings(&self) -> &[ButtonBinding] {
        &self.bindings
    }

    /// Whether the set has already advanced this frame
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    pub fn pressed(&self) -> bool {
        self.bindings.iter().any(ButtonBinding::pressed)
    }

    pub fn released(&self) -> bool {
        self.bindings.iter().any(ButtonBinding::released)
    }

    pub fn down(&self) -> bool {
        self.bindings.iter().any(ButtonBinding::down)
    }

    pub fn up(&self) -> bool {
        !self.down()
    }

    /// Allow the set to advance again. Propagates to member modifiers so sets
    /// that are only ever used as modifiers get reset too.
    pub fn new_frame(&mut self) {
        self.consumed = false;
        for binding in &self.bindings {
            binding.new_frame();
        }
    }

    /// Advance every binding once per frame; further calls are no-ops until
    /// the next `new_frame`
    pub fn update(&mut self, snapshot: &RawDeviceSnapshot, delta_time: f32) {
        if self.consumed {
            return;
        }

        let player_id = self.player_id;
        for binding in &mut self.bindings {
            binding.update(snapshot, player_id, delta_time);
        }
        self.consumed = true;
    }

    pub(crate) fn push(&mut self, binding: ButtonBinding) {
        self.bindings.push(binding);
    }

    /// Remove every binding driven by `source`. Returns true if any was removed.
    pub(crate) fn remove_source(&mut self, source: ButtonSource) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.source() != source);
        self.bindings.len() != before
    }

    pub(crate) fn set_key(&mut self, key: &str) {
        self.key = key.to_string();
    }

    /// Assign the set and every modifier it reaches to a player
    pub(crate) fn set_player(&mut self, player_id: usize) {
        self.player_id = player_id;
        self.owned = true;
        for binding in &self.bindings {
            binding.set_player(player_id);
        }
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            key: self.key.clone(),
            player_id: self.player_id,
            owned: false,
            bindings: self.bindings.iter().map(ButtonBinding::deep_copy).collect(),
            consumed: false,
        }
    }
}

/// Axis bindings where the first active binding wins
#[derive(Debug)]
pub struct AxisBindingSet {
    key: String,
    player_id: usize,
    bindings: Vec<AxisBinding>,
    consumed: bool,
}

impl AxisBindingSet {
    /// Create a set from a non-empty list of bindings
    pub fn new(bindings: Vec<AxisBinding>) -> Result<Self, InputError> {
        if bindings.is_empty() {
            return Err(InputError::EmptyBindingSet);
        }

        Ok(Self {
            key: String::new(),
            player_id: 0,
            bindings,
            consumed: false,
        })
    }

    pub fn single(binding: AxisBinding) -> Self {
        Self {
            key: String::new(),
            player_id: 0,
            bindings: vec![binding],
            consumed: false,
        }
    }

    pub fn into_shared(self) -> SharedAxisSet {
        Rc::new(RefCell::new(self))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn player_id(&self) -> usize {
        self.player_id
    }

    pub fn bindings(&self) -> &[AxisBinding] {
        &self.bindings
    }

    pub fn is_consumed(&self) -> bool {
        self.consumed
    }

    /// Value of the first binding, in list order, that is not at rest.
    /// Later bindings are ignored while an earlier one is active.
    pub fn state(&self) -> f32 {
        self.bindings
            .iter()
            .map(AxisBinding::state)
            .find(|state| is_active_axis(*state))
            .unwrap_or(0.0)
    }

    pub fn new_frame(&mut self) {
        self.consumed = false;
        for binding in &self.bindings {
            binding.new_frame();
        }
    }

    pub fn update(&mut self, snapshot: &RawDeviceSnapshot, delta_time: f32) {
        if self.consumed {
            return;
        }

        let player_id = self.player_id;
        for binding in &mut self.bindings {
            binding.update(snapshot, player_id, delta_time);
        }
        self.consumed = true;
    }

    pub(crate) fn push(&mut self, binding: AxisBinding) {
        self.bindings.push(binding);
    }

    pub(crate) fn remove_source(&mut self, source: AxisSource) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.source() != source);
        self.bindings.len() != before
    }

    pub(crate) fn set_key(&mut self, key: &str) {
        self.key = key.to_string();
    }

    pub(crate) fn set_player(&mut self, player_id: usize) {
        self.player_id = player_id;
        for binding in &self.bindings {
            binding.set_player(player_id);
        }
    }

    pub fn deep_copy(&self) -> Self {
        Self {
            key: self.key.clone(),
            player_id: self.player_id,
            bindings: self.bindings.iter().map(AxisBinding::deep_copy).collect(),
            consumed: false,
        }
    }
}

/// Check whether `target` is `modifier` itself or is reachable through the
/// modifiers of its bindings
pub(crate) fn modifier_chain_contains(modifier: &SharedButtonSet, target: &SharedButtonSet) -> bool {
    if Rc::ptr_eq(modifier, target) {
        return true;
    }

    modifier
        .borrow()
        .bindings
        .iter()
        .filter_map(ButtonBinding::modifier)
        .any(|next| modifier_chain_contains(next, target))
}

/// First player other than `player_id` that owns a set reachable from `modifier`
pub(crate) fn foreign_owner(modifier: &SharedButtonSet, player_id: usize) -> Option<usize> {
    let set = modifier.borrow();
    if let Some(owner) = set.owner().filter(|&owner| owner != player_id) {
        return Some(owner);
    }

    set.bindings
        .iter()
        .filter_map(ButtonBinding::modifier)
        .find_map(|next| foreign_owner(next, player_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::axis::{Stick, StickAxis};
    use crate::engine::input::button::GamepadButton;
    use crate::engine::input::device::{GamepadButtons, GamepadState};
    use winit::keyboard::KeyCode;

    fn jump_set() -> ButtonBindingSet {
        ButtonBindingSet::new(vec![
            ButtonBinding::from_key(KeyCode::KeyW),
            ButtonBinding::from_gamepad(GamepadButton::DPadUp),
        ])
        .unwrap()
    }

    fn frame(set: &mut ButtonBindingSet, snapshot: &RawDeviceSnapshot) {
        set.new_frame();
        set.update(snapshot, 0.016);
    }

    #[test]
    fn test_empty_set_rejected() {
        assert!(matches!(
            ButtonBindingSet::new(Vec::new()),
            Err(InputError::EmptyBindingSet)
        ));
        assert!(matches!(
            AxisBindingSet::new(Vec::new()),
            Err(InputError::EmptyBindingSet)
        ));
    }

    #[test]
    fn test_union_semantics() {
        let mut set = jump_set();
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.connect_gamepad(0, GamepadState::default());

        snapshot.hold_key(KeyCode::KeyW);
        frame(&mut set, &snapshot);
        assert!(set.down());

        snapshot.release_key(KeyCode::KeyW);
        snapshot.connect_gamepad(
            0,
            GamepadState::default().with_buttons(GamepadButtons::DPAD_UP),
        );
        frame(&mut set, &snapshot);
        assert!(set.down());
        assert!(!set.up());

        snapshot.connect_gamepad(0, GamepadState::default());
        frame(&mut set, &snapshot);
        assert!(set.up());
        assert!(set.released());
    }

    #[test]
    fn test_update_idempotent_within_frame() {
        let mut once = jump_set();
        let mut twice = jump_set();
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.hold_key(KeyCode::KeyW);

        once.new_frame();
        once.update(&snapshot, 0.016);

        twice.new_frame();
        twice.update(&snapshot, 0.016);
        twice.update(&snapshot, 0.016);

        assert!(twice.is_consumed());
        assert!(twice.pressed());
        for (a, b) in once.bindings().iter().zip(twice.bindings()) {
            assert_eq!(a.control(), b.control());
        }
    }

    #[test]
    fn test_update_without_new_frame_is_noop() {
        let mut set = jump_set();
        let mut snapshot = RawDeviceSnapshot::new(1);

        frame(&mut set, &snapshot);
        snapshot.hold_key(KeyCode::KeyW);
        set.update(&snapshot, 0.016);
        assert!(!set.down());

        frame(&mut set, &snapshot);
        assert!(set.down());
    }

    #[test]
    fn test_new_frame_reaches_modifiers() {
        let modifier = ButtonBindingSet::single(ButtonBinding::from_key(KeyCode::ShiftLeft))
            .into_shared();
        let mut set = ButtonBindingSet::single(
            ButtonBinding::from_key(KeyCode::KeyR).with_modifier(Rc::clone(&modifier)),
        );
        let snapshot = RawDeviceSnapshot::new(1);

        frame(&mut set, &snapshot);
        assert!(modifier.borrow().is_consumed());

        set.new_frame();
        assert!(!modifier.borrow().is_consumed());
    }

    #[test]
    fn test_set_player_reaches_modifiers() {
        let modifier = ButtonBindingSet::single(ButtonBinding::from_gamepad(GamepadButton::B))
            .into_shared();
        let mut set = ButtonBindingSet::single(
            ButtonBinding::from_gamepad(GamepadButton::A).with_modifier(Rc::clone(&modifier)),
        );

        set.set_player(2);
        assert_eq!(set.player_id(), 2);
        assert_eq!(modifier.borrow().player_id(), 2);
    }

    #[test]
    fn test_foreign_owner_found_through_chain() {
        let shift = ButtonBindingSet::single(ButtonBinding::from_key(KeyCode::ShiftLeft))
            .into_shared();
        let ctrl_shift = ButtonBindingSet::single(
            ButtonBinding::from_key(KeyCode::ControlLeft).with_modifier(Rc::clone(&shift)),
        )
        .into_shared();
        assert_eq!(shift.borrow().owner(), None);
        assert_eq!(foreign_owner(&ctrl_shift, 1), None);

        shift.borrow_mut().set_player(0);
        assert_eq!(shift.borrow().owner(), Some(0));
        assert_eq!(foreign_owner(&ctrl_shift, 1), Some(0));
        assert_eq!(foreign_owner(&ctrl_shift, 0), None);

        let copy = ctrl_shift.borrow().deep_copy().into_shared();
        assert_eq!(foreign_owner(&copy, 1), None);
    }

    #[test]
    fn test_remove_source() {
        let mut set = jump_set();
        assert!(set.remove_source(ButtonSource::gamepad(GamepadButton::DPadUp)));
        assert_eq!(set.bindings().len(), 1);
        assert!(!set.remove_source(ButtonSource::gamepad(GamepadButton::DPadUp)));
    }

    #[test]
    fn test_axis_first_active_wins() {
        let mut set = AxisBindingSet::new(vec![
            AxisBinding::from_keys(KeyCode::KeyD, KeyCode::KeyA),
            AxisBinding::from_stick(Stick::Left, StickAxis::X),
        ])
        .unwrap();
        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.connect_gamepad(0, GamepadState::default().with_left_stick(0.4, 0.0));

        set.new_frame();
        set.update(&snapshot, 0.016);
        assert_eq!(set.state(), 0.4);

        // The key axis comes first in the list, so it masks the stick
        snapshot.hold_key(KeyCode::KeyA);
        set.new_frame();
        set.update(&snapshot, 0.016);
        assert_eq!(set.state(), -1.0);
    }

    #[test]
    fn test_axis_all_at_rest() {
        let mut set = AxisBindingSet::single(AxisBinding::from_stick(Stick::Right, StickAxis::X));
        set.new_frame();
        set.update(&RawDeviceSnapshot::new(1), 0.016);
        assert_eq!(set.state(), 0.0);
    }

    #[test]
    fn test_deep_copy_is_independent() {
        let mut set = jump_set();
        set.set_key("Jump");
        let mut copy = set.deep_copy();
        assert_eq!(copy.key(), "Jump");
        assert_eq!(copy.bindings().len(), 2);

        let mut snapshot = RawDeviceSnapshot::new(1);
        snapshot.hold_key(KeyCode::KeyW);
        frame(&mut copy, &snapshot);
        assert!(copy.down());
        assert!(!set.down());
    }

    #[test]
    fn test_modifier_chain_contains() {
        let shift = ButtonBindingSet::single(ButtonBinding::from_key(KeyCode::ShiftLeft))
            .into_shared();
        let ctrl_shift = ButtonBindingSet::single(
            ButtonBinding::from_key(KeyCode::ControlLeft).with_modifier(Rc::clone(&shift)),
        )
        .into_shared();
        let unrelated = ButtonBindingSet::single(ButtonBinding::from_key(KeyCode::KeyZ))
            .into_shared();

        assert!(modifier_chain_contains(&ctrl_shift, &ctrl_shift));
        assert!(modifier_chain_contains(&ctrl_shift, &shift));
        assert!(!modifier_chain_contains(&shift, &ctrl_shift));
        assert!(!modifier_chain_contains(&ctrl_shift, &unrelated));
    }
}
