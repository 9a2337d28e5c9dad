//! Ring Runner - a side-scrolling ring collecting runner
//!
//! Core modules:
//! - `sim`: Deterministic frame simulation (spawning, physics, collisions, damage)
//! - `controller`: Run state machine and host callback seam
//! - `renderer`: Render pass, tessellation and the WebGPU presenter
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences
//! - `profile`: Character and theme data

pub mod controller;
pub mod profile;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use controller::{HostHooks, RunController};
pub use profile::{CharacterProfile, Color, Theme};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use glam::Vec2;

/// Game geometry constants (canvas space, y grows downward)
pub mod consts {
    /// Logical canvas size
    pub const CANVAS_WIDTH: f32 = 1000.0;
    pub const CANVAS_HEIGHT: f32 = 700.0;

    /// Top of the ground strip
    pub const GROUND_LINE: f32 = 600.0;
    /// Grass band drawn on top of the ground strip
    pub const GRASS_HEIGHT: f32 = 20.0;

    /// Player defaults - x stays fixed while the world scrolls past
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_SIZE: f32 = 60.0;
    /// Resting y of the player's top edge
    pub const PLAYER_GROUND_Y: f32 = 540.0;

    /// Ring pickup size
    pub const RING_SIZE: f32 = 30.0;
    /// Drawn ring radius
    pub const RING_RADIUS: f32 = 15.0;

    /// Ground obstacle size and anchor
    pub const OBSTACLE_SIZE: f32 = 60.0;
    pub const OBSTACLE_Y: f32 = 540.0;

    /// Power-up monitor size and anchor
    pub const POWER_UP_SIZE: f32 = 50.0;
    pub const POWER_UP_Y: f32 = 550.0;

    /// Frames per sprite animation step (also the invincibility flicker period)
    pub const ANIMATION_STEP_FRAMES: u64 = 4;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}

/// Wrap a scroll offset into (-period, 0]
#[inline]
pub fn wrap_scroll(offset: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    let wrapped = offset % period;
    if wrapped > 0.0 { wrapped - period } else { wrapped }
}
