//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per display frame
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod physics;
pub mod resolve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, magnet_pull};
pub use events::{GameEvent, RunSummary, SoundCue};
pub use resolve::{HitOutcome, decide_hit};
pub use state::{
    Facing, GameState, Obstacle, Particle, ParticleKind, Player, PowerUp, PowerUpKind, Ring,
    RunPhase, RunStats,
};
pub use tick::{TickInput, tick};
