//! Frame events handed to the host
//!
//! The simulation never calls out directly. It queues events on
//! `GameState::events` and the run controller drains them after each frame.

use serde::{Deserialize, Serialize};

use super::resolve::HitOutcome;
use super::state::PowerUpKind;

/// Sound hooks; playback is up to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    RingCollect,
    PowerUp,
    Damage,
    GameOver,
}

/// Terminal stats of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub score: u64,
    pub held_rings: u32,
    /// The only value ever offered for minting
    pub total_collected: u32,
}

impl RunSummary {
    /// Whether there is anything to mint
    pub fn mintable(&self) -> bool {
        self.total_collected > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Score or held rings changed
    ScoreChanged { score: u64, held_rings: u32 },
    /// An obstacle hit was resolved with something other than death
    Hit(HitOutcome),
    PowerUpActivated(PowerUpKind),
    /// Fired once per run
    GameOver(RunSummary),
    Sound(SoundCue),
}
