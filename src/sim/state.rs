//! Run state and entity model
//!
//! Entities are plain value records. All of them are owned by `GameState`
//! and a reset replaces every collection.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::events::{GameEvent, RunSummary};
use crate::consts::*;
use crate::profile::Color;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Idle, background only
    Menu,
    /// Full simulation active
    Playing,
    /// Simulation frozen
    Paused,
    /// Run ended, final stats available
    GameOver,
}

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player-controlled runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner; x is fixed while the world scrolls
    pub pos: Vec2,
    pub vel_y: f32,
    pub size: Vec2,
    pub jumping: bool,
    /// Resting y of the top edge
    pub ground_y: f32,
    pub facing: Facing,
    /// Per-character base speed
    pub base_speed: f32,
}

impl Player {
    pub fn new(base_speed: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_X, PLAYER_GROUND_Y),
            vel_y: 0.0,
            size: Vec2::splat(PLAYER_SIZE),
            jumping: false,
            ground_y: PLAYER_GROUND_Y,
            facing: Facing::Right,
            base_speed,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    /// Start a jump; refused while airborne
    pub fn jump(&mut self, velocity: f32) -> bool {
        if self.jumping {
            return false;
        }
        self.vel_y = velocity;
        self.jumping = true;
        true
    }
}

/// A ring pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ring {
    pub pos: Vec2,
    pub size: Vec2,
    /// Cosmetic spin (radians)
    pub rotation: f32,
}

impl Ring {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: Vec2::splat(RING_SIZE),
            rotation: 0.0,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// A ground hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub size: Vec2,
    pub color: Color,
}

impl Obstacle {
    pub fn new(x: f32, color: Color) -> Self {
        Self {
            pos: Vec2::new(x, OBSTACLE_Y),
            size: Vec2::splat(OBSTACLE_SIZE),
            color,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Magnet,
    Shield,
}

/// A power-up monitor sitting on the ground
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub size: Vec2,
    pub kind: PowerUpKind,
    /// Cleared on pickup; culled on the next pass
    pub active: bool,
}

impl PowerUp {
    pub fn new(x: f32, kind: PowerUpKind) -> Self {
        Self {
            pos: Vec2::new(x, POWER_UP_Y),
            size: Vec2::splat(POWER_UP_SIZE),
            kind,
            active: true,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.pos, self.size)
    }
}

/// Particle visual style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParticleKind {
    /// Small fading square
    Sparkle,
    /// Scattered ring arcing under gravity
    RingScatter,
}

/// A visual-only particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Frames left
    pub life: u32,
    pub color: Color,
    pub kind: ParticleKind,
    /// Added to vel.y every frame
    pub gravity: Option<f32>,
}

/// Lifetime of a sparkle particle (frames)
pub const SPARKLE_LIFE: u32 = 30;
/// Lifetime of a scattered ring particle (frames)
pub const RING_SCATTER_LIFE: u32 = 60;

/// Score and ring bank for a run.
///
/// `held_rings` is the damage buffer and drops to zero on an unshielded hit;
/// `total_collected` only ever grows and is the mintable amount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u64,
    pub held_rings: u32,
    pub total_collected: u32,
}

impl RunStats {
    /// Bank one ring
    pub fn collect_ring(&mut self, score: u64) {
        self.held_rings = self.held_rings.saturating_add(1);
        self.total_collected = self.total_collected.saturating_add(1);
        self.score = self.score.saturating_add(score);
        debug_assert!(self.held_rings <= self.total_collected);
    }

    /// Drop all held rings, returning how many were lost
    pub fn lose_held_rings(&mut self) -> u32 {
        std::mem::take(&mut self.held_rings)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            held_rings: self.held_rings,
            total_collected: self.total_collected,
        }
    }
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn and particle randomness
    pub rng: Pcg32,
    pub phase: RunPhase,
    pub player: Player,
    /// Active entities (insertion order is spawn order)
    pub rings: Vec<Ring>,
    pub obstacles: Vec<Obstacle>,
    pub power_ups: Vec<PowerUp>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub stats: RunStats,
    /// Frames simulated this run
    pub frame: u64,
    /// Post-hit grace period (frames remaining)
    pub invincibility_ticks: u32,
    /// Magnet power-up (frames remaining)
    pub magnet_ticks: u32,
    /// Absorbs exactly one hit
    pub shield: bool,
    /// Background parallax offset, in (-canvas width, 0]
    pub background_scroll: f32,
    /// Color tag given to newly spawned obstacles
    pub obstacle_color: Color,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create an idle state in the menu
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RunPhase::Menu,
            player: Player::new(0.0),
            rings: Vec::new(),
            obstacles: Vec::new(),
            power_ups: Vec::new(),
            particles: Vec::new(),
            stats: RunStats::default(),
            frame: 0,
            invincibility_ticks: 0,
            magnet_ticks: 0,
            shield: false,
            background_scroll: 0.0,
            obstacle_color: Color::hex(0xEF4444),
            events: Vec::new(),
        }
    }

    /// Replace everything with a fresh run; entities are not spawned here
    pub fn reset(&mut self, seed: u64, base_speed: f32, obstacle_color: Color) {
        *self = Self {
            player: Player::new(base_speed),
            obstacle_color,
            phase: self.phase,
            ..Self::new(seed)
        };
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_ticks > 0
    }

    pub fn magnet_active(&self) -> bool {
        self.magnet_ticks > 0
    }

    /// Queue an event for the host
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all queued events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
