// Frame driver: owns the player registries and the device snapshots they read

use super::binding::{AxisBinding, ButtonBinding};
use super::config::InputConfig;
use super::device::{
    GamepadSnapshot, GamepadSource, GamepadState, RawDeviceSnapshot, WindowInput,
};
use super::player::{Filter, PlayerRegistry};
use super::InputError;
use winit::event::{MouseButton, WindowEvent};
use winit::keyboard::KeyCode;

/// Main input manager that owns every player's registry and the device snapshot
///
/// Drive it once per frame: feed window events through `process_window_event`
/// as they arrive, then call `update` before running game logic.
pub struct InputManager {
    config: InputConfig,

    /// Registry for each player
    players: Vec<PlayerRegistry>,

    /// Keyboard and mouse state collected from window events
    window: WindowInput,

    /// Connection state and latest sample for each player's pad
    gamepads: Vec<GamepadSnapshot>,

    /// Snapshot for the current frame
    snapshot: RawDeviceSnapshot,

    /// Snapshot for the previous frame, used by the raw key and mouse queries
    previous: RawDeviceSnapshot,

    /// Seconds since the last gamepad capability check
    capability_timer: f32,
}

impl InputManager {
    /// Create a new input manager with default settings
    pub fn new(max_players: usize) -> Self {
        Self::with_config(InputConfig::new().with_max_players(max_players))
    }

    /// Create an input manager from explicit settings
    pub fn with_config(config: InputConfig) -> Self {
        let max_players = config.max_players;
        let players = (0..max_players).map(PlayerRegistry::new).collect();

        Self {
            // First update runs a capability check straight away
            capability_timer: config.capability_check_interval,
            config,
            players,
            window: WindowInput::new(),
            gamepads: vec![GamepadSnapshot::default(); max_players],
            snapshot: RawDeviceSnapshot::new(max_players),
            previous: RawDeviceSnapshot::new(max_players),
        }
    }

    /// Process a window event from winit
    pub fn process_window_event(&mut self, event: &WindowEvent) {
        self.window.process_window_event(event);
    }

    /// Direct access to the keyboard/mouse accumulator, for input that does not
    /// come from a window (replays, scripted input)
    pub fn window_input_mut(&mut self) -> &mut WindowInput {
        &mut self.window
    }

    /// Advance all input by one frame
    ///
    /// Gamepads are sampled every frame, but their connection state is only
    /// re-checked every `capability_check_interval` seconds. While the manager
    /// is inactive (disabled, or unfocused without `update_when_unfocused`)
    /// bindings keep the values from the last active frame, while raw key and
    /// mouse edges report nothing new.
    pub fn update(&mut self, delta_time: f32, gamepads: &mut dyn GamepadSource) {
        self.refresh_capabilities(delta_time, gamepads);

        for (player_id, pad) in self.gamepads.iter_mut().enumerate() {
            pad.state = if pad.connected {
                gamepads.poll(player_id)
            } else {
                GamepadState::default()
            };
        }

        if !self.is_active() {
            // Raw edges last one frame even while bindings are frozen
            self.previous = self.snapshot.clone();
            self.snapshot.mouse_scroll_delta = 0;
            return;
        }

        let next = self.window.capture(&self.gamepads);
        self.previous = std::mem::replace(&mut self.snapshot, next);

        for player in &mut self.players {
            player.update(&self.snapshot, delta_time);
        }
    }

    fn refresh_capabilities(&mut self, delta_time: f32, gamepads: &mut dyn GamepadSource) {
        if self.capability_timer < self.config.capability_check_interval {
            self.capability_timer += delta_time;
            return;
        }
        self.capability_timer = 0.0;

        for (player_id, pad) in self.gamepads.iter_mut().enumerate() {
            let connected = gamepads.is_connected(player_id);
            if connected != pad.connected {
                if connected {
                    log::info!("Gamepad connected for player {}", player_id);
                } else {
                    log::info!("Gamepad disconnected for player {}", player_id);
                }
            }
            pad.connected = connected;
        }
    }

    /// Whether `update` currently advances bindings
    pub fn is_active(&self) -> bool {
        self.config.enabled && (self.config.update_when_unfocused || self.window.is_focused())
    }

    /// Master switch; a disabled manager stops advancing bindings
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.config.enabled != enabled {
            log::info!("Input {}", if enabled { "enabled" } else { "disabled" });
        }
        self.config.enabled = enabled;
    }

    /// Keep advancing bindings while the window is not focused
    pub fn set_update_when_unfocused(&mut self, update: bool) {
        self.config.update_when_unfocused = update;
    }

    /// Current settings, including the enable and unfocused switches
    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Get the registry for a specific player
    pub fn player(&self, player_id: usize) -> Option<&PlayerRegistry> {
        self.players.get(player_id)
    }

    /// Get the mutable registry for a specific player
    pub fn player_mut(&mut self, player_id: usize) -> Option<&mut PlayerRegistry> {
        self.players.get_mut(player_id)
    }

    /// Get the number of players
    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    /// Snapshot used by the current frame
    pub fn snapshot(&self) -> &RawDeviceSnapshot {
        &self.snapshot
    }

    /// Connection state as of the last capability check
    pub fn is_gamepad_connected(&self, player_id: usize) -> bool {
        self.gamepads
            .get(player_id)
            .map_or(false, |pad| pad.connected)
    }

    /// Resolve an optional player list, `None` meaning every player
    fn target_players(&self, players: Option<&[usize]>) -> Result<Vec<usize>, InputError> {
        match players {
            None => Ok((0..self.players.len()).collect()),
            Some(ids) => {
                if let Some(&unknown) = ids.iter().find(|&&id| id >= self.players.len()) {
                    return Err(InputError::UnknownPlayer(unknown));
                }
                Ok(ids.to_vec())
            }
        }
    }

    /// Register a button binding for several players. Each player gets an
    /// independent deep copy of `template`.
    pub fn add_button_binding(
        &mut self,
        name: &str,
        template: &ButtonBinding,
        players: Option<&[usize]>,
        replace: bool,
    ) -> Result<(), InputError> {
        for player_id in self.target_players(players)? {
            self.players[player_id].add_button_binding(name, template.deep_copy(), replace)?;
        }
        Ok(())
    }

    /// Register several button bindings under one name for several players
    pub fn add_button_bindings(
        &mut self,
        name: &str,
        replace: bool,
        players: Option<&[usize]>,
        templates: &[ButtonBinding],
    ) -> Result<(), InputError> {
        for player_id in self.target_players(players)? {
            let copies = templates.iter().map(ButtonBinding::deep_copy).collect();
            self.players[player_id].add_button_bindings(name, replace, copies)?;
        }
        Ok(())
    }

    /// Remove a button name from several players. Returns true if any player had it.
    pub fn remove_button_binding(&mut self, name: &str, players: Option<&[usize]>) -> bool {
        let Ok(targets) = self.target_players(players) else {
            return false;
        };

        let mut found = false;
        for player_id in targets {
            if self.players[player_id].remove_button_binding(name) {
                found = true;
            }
        }
        found
    }

    /// Register an axis binding for several players, one deep copy each
    pub fn add_axis_binding(
        &mut self,
        name: &str,
        template: &AxisBinding,
        players: Option<&[usize]>,
        replace: bool,
    ) -> Result<(), InputError> {
        for player_id in self.target_players(players)? {
            self.players[player_id].add_axis_binding(name, template.deep_copy(), replace)?;
        }
        Ok(())
    }

    /// Register several axis bindings under one name for several players
    pub fn add_axis_bindings(
        &mut self,
        name: &str,
        replace: bool,
        players: Option<&[usize]>,
        templates: &[AxisBinding],
    ) -> Result<(), InputError> {
        for player_id in self.target_players(players)? {
            let copies = templates.iter().map(AxisBinding::deep_copy).collect();
            self.players[player_id].add_axis_bindings(name, replace, copies)?;
        }
        Ok(())
    }

    /// Remove an axis name from several players. Returns true if any player had it.
    pub fn remove_axis_binding(&mut self, name: &str, players: Option<&[usize]>) -> bool {
        let Ok(targets) = self.target_players(players) else {
            return false;
        };

        let mut found = false;
        for player_id in targets {
            if self.players[player_id].remove_axis_binding(name) {
                found = true;
            }
        }
        found
    }

    /// Remove every binding from every player
    pub fn clear_bindings(&mut self) {
        for player in &mut self.players {
            player.clear();
        }
    }

    /// Check if a player pressed a logical button this frame
    pub fn button_pressed(&self, player_id: usize, name: &str) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.button_pressed(name))
    }

    /// Check if a player released a logical button this frame
    pub fn button_released(&self, player_id: usize, name: &str) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.button_released(name))
    }

    /// Check if a player is holding a logical button
    pub fn button_down(&self, player_id: usize, name: &str) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.button_down(name))
    }

    /// Negation of `button_down`; unknown players and names read as up
    pub fn button_up(&self, player_id: usize, name: &str) -> bool {
        !self.button_down(player_id, name)
    }

    /// Batch press query for one player. `None` tests every registered button.
    pub fn buttons_pressed(&self, player_id: usize, filter: Filter, names: Option<&[&str]>) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.buttons_pressed(filter, names))
    }

    /// Batch release query for one player
    pub fn buttons_released(&self, player_id: usize, filter: Filter, names: Option<&[&str]>) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.buttons_released(filter, names))
    }

    /// Batch hold query for one player
    pub fn buttons_down(&self, player_id: usize, filter: Filter, names: Option<&[&str]>) -> bool {
        self.player(player_id)
            .map_or(false, |player| player.buttons_down(filter, names))
    }

    /// Negation of `buttons_down` with the same filter and names
    pub fn buttons_up(&self, player_id: usize, filter: Filter, names: Option<&[&str]>) -> bool {
        !self.buttons_down(player_id, filter, names)
    }

    /// Current value of a player's axis, 0 for unknown players and names
    pub fn axis_state(&self, player_id: usize, name: &str) -> f32 {
        self.player(player_id)
            .map_or(0.0, |player| player.axis_state(name))
    }

    // Player 1 shorthands

    /// `button_pressed` for player 1
    pub fn p1_button_pressed(&self, name: &str) -> bool {
        self.button_pressed(0, name)
    }

    /// `button_released` for player 1
    pub fn p1_button_released(&self, name: &str) -> bool {
        self.button_released(0, name)
    }

    /// `button_down` for player 1
    pub fn p1_button_down(&self, name: &str) -> bool {
        self.button_down(0, name)
    }

    /// `button_up` for player 1
    pub fn p1_button_up(&self, name: &str) -> bool {
        self.button_up(0, name)
    }

    /// `axis_state` for player 1
    pub fn p1_axis_state(&self, name: &str) -> f32 {
        self.axis_state(0, name)
    }

    /// Check if any player pressed a logical button this frame
    pub fn any_player_pressed(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.button_pressed(name))
    }

    /// Check if any player is holding a logical button
    pub fn any_player_down(&self, name: &str) -> bool {
        self.players.iter().any(|player| player.button_down(name))
    }

    /// Get a list of all players who pressed a logical button this frame
    pub fn players_who_pressed(&self, name: &str) -> Vec<usize> {
        self.players
            .iter()
            .filter(|player| player.button_pressed(name))
            .map(|player| player.player_id())
            .collect()
    }

    /// Key went down this frame, bypassing logical names
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.snapshot.is_key_held(key) && !self.previous.is_key_held(key)
    }

    /// Keys that went down this frame, in no particular order
    pub fn pressed_keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.snapshot
            .keys_held
            .iter()
            .copied()
            .filter(|key| !self.previous.is_key_held(*key))
    }

    /// Key went up this frame
    pub fn key_released(&self, key: KeyCode) -> bool {
        self.previous.is_key_held(key) && !self.snapshot.is_key_held(key)
    }

    /// Key is held
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.snapshot.is_key_held(key)
    }

    /// Key is not held
    pub fn key_up(&self, key: KeyCode) -> bool {
        !self.key_down(key)
    }

    /// Mouse button went down this frame
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.snapshot.is_mouse_down(button) && !self.previous.is_mouse_down(button)
    }

    /// Mouse button went up this frame
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.previous.is_mouse_down(button) && !self.snapshot.is_mouse_down(button)
    }

    /// Mouse button is held
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.snapshot.is_mouse_down(button)
    }

    /// Wheel direction this frame: -1, 0 or 1
    pub fn mouse_scroll(&self) -> i8 {
        self.snapshot.mouse_scroll_delta
    }
}

impl Default for InputManager {
    fn default() -> Self {
        Self::with_config(InputConfig::default())
    }
}
