// Rusted Input - per-player input binding engine

pub mod core;
pub mod engine;

pub use engine::input::{action, InputConfig, InputError, InputManager};
