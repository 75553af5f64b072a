// Per-player registry of logical button and axis names

use super::axis::AxisSource;
use super::binding::{AxisBinding, ButtonBinding};
use super::button::ButtonSource;
use super::device::RawDeviceSnapshot;
use super::set::{
    foreign_owner, modifier_chain_contains, AxisBindingSet, ButtonBindingSet, SharedAxisSet,
    SharedButtonSet,
};
use super::InputError;
use std::collections::HashMap;
use std::rc::Rc;
use std::str::FromStr;

/// How a batch query combines the sets it tests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// True if any named set matches; unknown names are skipped
    #[default]
    Any,
    /// True only if every named set exists and matches
    All,
}

impl FromStr for Filter {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "any" => Ok(Self::Any),
            "all" => Ok(Self::All),
            _ => Err(InputError::InvalidFilter(s.to_string())),
        }
    }
}

/// Logical inputs registered for a single player
///
/// Buttons and axes live in separate namespaces, so "Move" can name both a
/// button set and an axis set. Names are case-sensitive.
#[derive(Debug)]
pub struct PlayerRegistry {
    /// Player ID (0-3 for up to 4 players)
    player_id: usize,

    buttons: HashMap<String, SharedButtonSet>,

    axes: HashMap<String, SharedAxisSet>,
}

impl PlayerRegistry {
    /// Create an empty registry for a player
    pub fn new(player_id: usize) -> Self {
        Self {
            player_id,
            buttons: HashMap::new(),
            axes: HashMap::new(),
        }
    }

    /// Player this registry belongs to
    pub fn player_id(&self) -> usize {
        self.player_id
    }

    /// Register a button binding under a logical name
    ///
    /// Without `replace` the binding joins any existing set of that name; with it
    /// the old set is dropped and a fresh one started. Returns the set now
    /// registered under `name`, which can be used as a modifier elsewhere.
    pub fn add_button_binding(
        &mut self,
        name: &str,
        binding: ButtonBinding,
        replace: bool,
    ) -> Result<SharedButtonSet, InputError> {
        validate_name(name)?;
        self.check_owner(name, binding.modifier())?;

        let existing = if replace {
            None
        } else {
            self.buttons.get(name).cloned()
        };

        let set = match existing {
            Some(set) => {
                self.check_modifier(name, &set, &binding)?;
                set.borrow_mut().push(binding);
                log::debug!(
                    "Player {}: added binding to button '{}'",
                    self.player_id,
                    name
                );
                set
            }
            None => {
                let set = ButtonBindingSet::single(binding).into_shared();
                if self.buttons.insert(name.to_string(), Rc::clone(&set)).is_some() {
                    log::debug!("Player {}: replaced button '{}'", self.player_id, name);
                } else {
                    log::debug!("Player {}: registered button '{}'", self.player_id, name);
                }
                set
            }
        };

        {
            let mut inner = set.borrow_mut();
            inner.set_key(name);
            inner.set_player(self.player_id);
        }
        Ok(set)
    }

    /// Register several button bindings under one name
    pub fn add_button_bindings(
        &mut self,
        name: &str,
        replace: bool,
        bindings: Vec<ButtonBinding>,
    ) -> Result<SharedButtonSet, InputError> {
        validate_name(name)?;
        if bindings.is_empty() {
            return Err(InputError::EmptyBindingSet);
        }
        for binding in &bindings {
            self.check_owner(name, binding.modifier())?;
        }

        if replace {
            self.buttons.remove(name);
        } else if let Some(existing) = self.buttons.get(name) {
            for binding in &bindings {
                self.check_modifier(name, existing, binding)?;
            }
        }

        let mut set = None;
        for binding in bindings {
            set = Some(self.add_button_binding(name, binding, false)?);
        }
        set.ok_or(InputError::EmptyBindingSet)
    }

    /// Reject a modifier chain that reaches a set claimed by another player.
    /// Each set advances with exactly one registry.
    fn check_owner(
        &self,
        name: &str,
        modifier: Option<&SharedButtonSet>,
    ) -> Result<(), InputError> {
        let Some(owner) = modifier.and_then(|modifier| foreign_owner(modifier, self.player_id))
        else {
            return Ok(());
        };

        log::warn!(
            "Player {}: rejected binding for '{}', its modifier belongs to player {}",
            self.player_id,
            name,
            owner
        );
        Err(InputError::ForeignModifier {
            name: name.to_string(),
            owner,
        })
    }

    /// Reject a binding whose modifier chain leads back to the set it joins
    fn check_modifier(
        &self,
        name: &str,
        set: &SharedButtonSet,
        binding: &ButtonBinding,
    ) -> Result<(), InputError> {
        match binding.modifier() {
            Some(modifier) if modifier_chain_contains(modifier, set) => {
                log::warn!(
                    "Player {}: rejected binding for '{}', its modifier chain leads back to it",
                    self.player_id,
                    name
                );
                Err(InputError::ModifierCycle(name.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Remove a button set by name
    pub fn remove_button_binding(&mut self, name: &str) -> bool {
        let removed = self.buttons.remove(name).is_some();
        if removed {
            log::debug!("Player {}: removed button '{}'", self.player_id, name);
        }
        removed
    }

    /// Remove a button set by identity
    pub fn remove_button_set(&mut self, set: &SharedButtonSet) -> bool {
        let name = self
            .buttons
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, set))
            .map(|(name, _)| name.clone());

        match name {
            Some(name) => self.remove_button_binding(&name),
            None => false,
        }
    }

    /// Remove the bindings driven by `source` from a button set. A set left
    /// without bindings is removed entirely.
    pub fn remove_button_source(&mut self, name: &str, source: ButtonSource) -> bool {
        let Some(set) = self.buttons.get(name).cloned() else {
            return false;
        };

        let emptied = {
            let mut set = set.borrow_mut();
            if !set.remove_source(source) {
                return false;
            }
            set.bindings().is_empty()
        };

        if emptied {
            self.remove_button_binding(name);
        }
        true
    }

    /// Register an axis binding under a logical name
    pub fn add_axis_binding(
        &mut self,
        name: &str,
        binding: AxisBinding,
        replace: bool,
    ) -> Result<SharedAxisSet, InputError> {
        validate_name(name)?;
        self.check_owner(name, binding.modifier())?;

        let existing = if replace {
            None
        } else {
            self.axes.get(name).cloned()
        };

        let set = match existing {
            Some(set) => {
                set.borrow_mut().push(binding);
                log::debug!("Player {}: added binding to axis '{}'", self.player_id, name);
                set
            }
            None => {
                let set = AxisBindingSet::single(binding).into_shared();
                if self.axes.insert(name.to_string(), Rc::clone(&set)).is_some() {
                    log::debug!("Player {}: replaced axis '{}'", self.player_id, name);
                } else {
                    log::debug!("Player {}: registered axis '{}'", self.player_id, name);
                }
                set
            }
        };

        {
            let mut inner = set.borrow_mut();
            inner.set_key(name);
            inner.set_player(self.player_id);
        }
        Ok(set)
    }

    /// Register several axis bindings under one name
    pub fn add_axis_bindings(
        &mut self,
        name: &str,
        replace: bool,
        bindings: Vec<AxisBinding>,
    ) -> Result<SharedAxisSet, InputError> {
        validate_name(name)?;
        if bindings.is_empty() {
            return Err(InputError::EmptyBindingSet);
        }
        for binding in &bindings {
            self.check_owner(name, binding.modifier())?;
        }

        if replace {
            self.axes.remove(name);
        }

        let mut set = None;
        for binding in bindings {
            set = Some(self.add_axis_binding(name, binding, false)?);
        }
        set.ok_or(InputError::EmptyBindingSet)
    }

    /// Remove an axis set by name
    pub fn remove_axis_binding(&mut self, name: &str) -> bool {
        let removed = self.axes.remove(name).is_some();
        if removed {
            log::debug!("Player {}: removed axis '{}'", self.player_id, name);
        }
        removed
    }

    /// Remove an axis set by identity
    pub fn remove_axis_set(&mut self, set: &SharedAxisSet) -> bool {
        let name = self
            .axes
            .iter()
            .find(|(_, registered)| Rc::ptr_eq(registered, set))
            .map(|(name, _)| name.clone());

        match name {
            Some(name) => self.remove_axis_binding(&name),
            None => false,
        }
    }

    /// Remove the bindings driven by `source` from an axis set. A set left
    /// without bindings is removed entirely.
    pub fn remove_axis_source(&mut self, name: &str, source: AxisSource) -> bool {
        let Some(set) = self.axes.get(name).cloned() else {
            return false;
        };

        let emptied = {
            let mut set = set.borrow_mut();
            if !set.remove_source(source) {
                return false;
            }
            set.bindings().is_empty()
        };

        if emptied {
            self.remove_axis_binding(name);
        }
        true
    }

    /// Allow every set to advance again
    pub fn new_frame(&mut self) {
        for set in self.buttons.values() {
            set.borrow_mut().new_frame();
        }
        for set in self.axes.values() {
            set.borrow_mut().new_frame();
        }
    }

    /// Advance every set for a new frame
    ///
    /// All consumed flags are cleared before any set advances, so a set that is
    /// reached first as another set's modifier is still advanced exactly once.
    pub fn update(&mut self, snapshot: &RawDeviceSnapshot, delta_time: f32) {
        self.new_frame();

        for set in self.buttons.values() {
            set.borrow_mut().update(snapshot, delta_time);
        }
        for set in self.axes.values() {
            set.borrow_mut().update(snapshot, delta_time);
        }
    }

    /// Shared handle to a button set, usable as a modifier elsewhere
    pub fn button_set(&self, name: &str) -> Option<SharedButtonSet> {
        self.buttons.get(name).cloned()
    }

    /// Shared handle to an axis set
    pub fn axis_set(&self, name: &str) -> Option<SharedAxisSet> {
        self.axes.get(name).cloned()
    }

    /// Check if a button name is registered
    pub fn has_button(&self, name: &str) -> bool {
        self.buttons.contains_key(name)
    }

    /// Check if an axis name is registered
    pub fn has_axis(&self, name: &str) -> bool {
        self.axes.contains_key(name)
    }

    /// Registered button names, in no particular order
    pub fn button_names(&self) -> impl Iterator<Item = &str> {
        self.buttons.keys().map(String::as_str)
    }

    /// Registered axis names, in no particular order
    pub fn axis_names(&self) -> impl Iterator<Item = &str> {
        self.axes.keys().map(String::as_str)
    }

    /// Remove every registered button and axis
    pub fn clear(&mut self) {
        self.buttons.clear();
        self.axes.clear();
    }

    /// Button went down this frame
    pub fn button_pressed(&self, name: &str) -> bool {
        self.test_button(name, ButtonBindingSet::pressed)
    }

    /// Button went up this frame
    pub fn button_released(&self, name: &str) -> bool {
        self.test_button(name, ButtonBindingSet::released)
    }

    /// Button is held
    pub fn button_down(&self, name: &str) -> bool {
        self.test_button(name, ButtonBindingSet::down)
    }

    /// Unknown names read as up
    pub fn button_up(&self, name: &str) -> bool {
        !self.button_down(name)
    }

    /// Batch press query. `None` tests every registered button.
    pub fn buttons_pressed(&self, filter: Filter, names: Option<&[&str]>) -> bool {
        self.filter_buttons(filter, names, ButtonBindingSet::pressed)
    }

    /// Batch release query
    pub fn buttons_released(&self, filter: Filter, names: Option<&[&str]>) -> bool {
        self.filter_buttons(filter, names, ButtonBindingSet::released)
    }

    /// Batch hold query
    pub fn buttons_down(&self, filter: Filter, names: Option<&[&str]>) -> bool {
        self.filter_buttons(filter, names, ButtonBindingSet::down)
    }

    /// Negation of `buttons_down` with the same filter and names
    pub fn buttons_up(&self, filter: Filter, names: Option<&[&str]>) -> bool {
        !self.buttons_down(filter, names)
    }

    /// Value of an axis, 0 for unknown names
    pub fn axis_state(&self, name: &str) -> f32 {
        self.axes
            .get(name)
            .map_or(0.0, |set| set.borrow().state())
    }

    fn test_button(&self, name: &str, test: fn(&ButtonBindingSet) -> bool) -> bool {
        self.buttons
            .get(name)
            .map_or(false, |set| test(&set.borrow()))
    }

    fn filter_buttons(
        &self,
        filter: Filter,
        names: Option<&[&str]>,
        test: fn(&ButtonBindingSet) -> bool,
    ) -> bool {
        match names {
            Some(names) => self.match_buttons(filter, names.iter().copied(), test),
            None => self.match_buttons(filter, self.button_names(), test),
        }
    }

    fn match_buttons<'n>(
        &self,
        filter: Filter,
        mut names: impl Iterator<Item = &'n str>,
        test: fn(&ButtonBindingSet) -> bool,
    ) -> bool {
        match filter {
            Filter::Any => names.any(|name| self.test_button(name, test)),
            Filter::All => names.all(|name| self.test_button(name, test)),
        }
    }
}

fn validate_name(name: &str) -> Result<(), InputError> {
    if name.is_empty() {
        return Err(InputError::EmptyName);
    }
    Ok(())
}
