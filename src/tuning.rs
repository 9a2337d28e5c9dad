//! Data-driven game balance
//!
//! Every number the simulation uses for speeds, spawn rates and timers lives
//! here so difficulty can be adjusted without touching the frame logic.
//! Units are canvas pixels and display frames (60 Hz).

use serde::{Deserialize, Serialize};

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Downward acceleration (px/frame²)
    pub gravity: f32,
    /// Vertical velocity applied by a jump (negative is up)
    pub jump_velocity: f32,

    // === Scrolling ===
    /// Leftward speed of obstacles and power-up monitors (px/frame)
    pub hazard_scroll_speed: f32,
    /// Leftward speed of rings (px/frame)
    pub ring_scroll_speed: f32,
    /// Cosmetic ring spin (radians/frame)
    pub ring_spin: f32,
    /// Entities whose x falls to or below this are culled
    pub cull_x: f32,
    /// Background parallax speed (px/frame)
    pub background_scroll_speed: f32,

    // === Spawning ===
    /// x where obstacles and power-ups appear
    pub spawn_edge_x: f32,
    /// Ring base x when no offset is given
    pub ring_default_offset: f32,
    /// Horizontal jitter added to every ring: [0, jitter)
    pub ring_jitter: f32,
    /// Vertical ring placement: [min, max)
    pub ring_min_y: f32,
    pub ring_max_y: f32,
    /// Per-frame spawn probabilities
    pub obstacle_chance: f64,
    pub power_up_chance: f64,
    pub ring_chance: f64,
    /// Rings placed at run start, at `initial_ring_start + i * initial_ring_spacing`
    pub initial_rings: u32,
    pub initial_ring_start: f32,
    pub initial_ring_spacing: f32,

    // === Damage & power-ups ===
    /// Grace period after any absorbed hit
    pub invincibility_frames: u32,
    /// Magnet duration (600 = 10 seconds at 60 fps)
    pub magnet_frames: u32,
    /// Rings closer than this are pulled while the magnet is active
    pub magnet_radius: f32,
    /// Fraction of the remaining delta a ring closes per frame
    pub magnet_pull: f32,
    /// Upper bound on scattered-ring particles for one hit
    pub ring_scatter_cap: u32,

    // === Scoring ===
    pub ring_score: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 1.0,
            jump_velocity: -20.0,

            hazard_scroll_speed: 8.0,
            ring_scroll_speed: 6.0,
            ring_spin: 0.1,
            cull_x: -100.0,
            background_scroll_speed: 2.0,

            spawn_edge_x: 1200.0,
            ring_default_offset: 1200.0,
            ring_jitter: 400.0,
            ring_min_y: 350.0,
            ring_max_y: 500.0,
            obstacle_chance: 0.01,
            power_up_chance: 0.003,
            ring_chance: 0.02,
            initial_rings: 5,
            initial_ring_start: 800.0,
            initial_ring_spacing: 200.0,

            invincibility_frames: 120,
            magnet_frames: 600,
            magnet_radius: 300.0,
            magnet_pull: 0.1,
            ring_scatter_cap: 20,

            ring_score: 10,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Load tuning from JSON, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::warn!("Invalid tuning JSON ({err}), using defaults");
                Self::default()
            }
        }
    }

    /// Clamp values that would break the frame logic
    fn sanitized(mut self) -> Self {
        self.obstacle_chance = self.obstacle_chance.clamp(0.0, 1.0);
        self.power_up_chance = self.power_up_chance.clamp(0.0, 1.0);
        self.ring_chance = self.ring_chance.clamp(0.0, 1.0);
        self.magnet_pull = self.magnet_pull.clamp(0.0, 1.0);
        self.ring_jitter = self.ring_jitter.max(0.0);
        if self.ring_max_y <= self.ring_min_y {
            self.ring_max_y = self.ring_min_y + 1.0;
        }
        self
    }
}
