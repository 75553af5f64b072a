// Input manager configuration

/// Default number of local players
pub const DEFAULT_MAX_PLAYERS: usize = 4;

/// Default seconds between gamepad capability checks
pub const DEFAULT_CAPABILITY_CHECK_INTERVAL: f32 = 1.0;

/// Settings for an `InputManager`
#[derive(Debug, Clone, PartialEq)]
pub struct InputConfig {
    /// Number of player slots (typically 4)
    pub max_players: usize,

    /// Seconds between gamepad connection checks. Pads plugged in or removed
    /// are noticed at most this late.
    pub capability_check_interval: f32,

    /// Keep updating bindings while the window is not focused
    pub update_when_unfocused: bool,

    /// Master switch; a disabled manager skips binding updates entirely
    pub enabled: bool,
}

impl InputConfig {
    pub fn new() -> Self {
        Self {
            max_players: DEFAULT_MAX_PLAYERS,
            capability_check_interval: DEFAULT_CAPABILITY_CHECK_INTERVAL,
            update_when_unfocused: false,
            enabled: true,
        }
    }

    pub fn with_max_players(mut self, max_players: usize) -> Self {
        self.max_players = max_players;
        self
    }

    pub fn with_capability_check_interval(mut self, seconds: f32) -> Self {
        self.capability_check_interval = seconds;
        self
    }

    pub fn with_update_when_unfocused(mut self, update: bool) -> Self {
        self.update_when_unfocused = update;
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::new()
    }
}
