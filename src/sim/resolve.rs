//! Damage and power-up resolution
//!
//! Obstacle hits go through a single priority table:
//!
//! | invincible | shield | held rings | outcome      |
//! |------------|--------|------------|--------------|
//! | yes        | any    | any        | `Ignored`    |
//! | no         | yes    | any        | `Shielded`   |
//! | no         | no     | > 0        | `RingsLost`  |
//! | no         | no     | 0          | `Died`       |

use serde::{Deserialize, Serialize};

use super::events::{GameEvent, SoundCue};
use super::spawn::{emit_ring_scatter, emit_sparkles};
use super::state::{GameState, PowerUpKind, RunPhase};
use crate::profile::Color;
use crate::tuning::Tuning;

/// How an obstacle hit was settled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitOutcome {
    /// Invincibility window swallowed the hit
    Ignored,
    /// Shield broke instead of the player
    Shielded,
    /// Held rings scattered; the player survives
    RingsLost { lost: u32 },
    /// Nothing left to absorb the hit
    Died,
}

/// Pure priority table for an obstacle hit
pub fn decide_hit(invincible: bool, shield: bool, held_rings: u32) -> HitOutcome {
    if invincible {
        HitOutcome::Ignored
    } else if shield {
        HitOutcome::Shielded
    } else if held_rings > 0 {
        HitOutcome::RingsLost { lost: held_rings }
    } else {
        HitOutcome::Died
    }
}

/// Settle one obstacle hit against shield, invincibility and the ring bank
pub fn resolve_obstacle_hit(state: &mut GameState, tuning: &Tuning, particle_cap: usize) -> HitOutcome {
    let outcome = decide_hit(state.is_invincible(), state.shield, state.stats.held_rings);
    let player_pos = state.player.pos;

    match outcome {
        HitOutcome::Ignored => {}
        HitOutcome::Shielded => {
            state.shield = false;
            state.invincibility_ticks = tuning.invincibility_frames;
            emit_sparkles(state, player_pos, Color::SHIELD_BLUE, particle_cap);
            state.emit(GameEvent::Sound(SoundCue::Damage));
            state.emit(GameEvent::Hit(outcome));
            log::debug!("Shield absorbed hit at frame {}", state.frame);
        }
        HitOutcome::RingsLost { lost } => {
            emit_ring_scatter(state, player_pos, lost, tuning.ring_scatter_cap, particle_cap);
            state.stats.lose_held_rings();
            state.invincibility_ticks = tuning.invincibility_frames;
            state.emit(GameEvent::ScoreChanged {
                score: state.stats.score,
                held_rings: state.stats.held_rings,
            });
            state.emit(GameEvent::Sound(SoundCue::Damage));
            state.emit(GameEvent::Hit(outcome));
            log::debug!("Lost {} rings at frame {}", lost, state.frame);
        }
        HitOutcome::Died => {
            state.phase = RunPhase::GameOver;
            let summary = state.stats.summary();
            state.emit(GameEvent::Sound(SoundCue::GameOver));
            state.emit(GameEvent::GameOver(summary));
            log::info!(
                "Game over: score {}, held {}, collected {}",
                summary.score,
                summary.held_rings,
                summary.total_collected
            );
        }
    }

    outcome
}

/// Apply a collected power-up
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind, tuning: &Tuning, particle_cap: usize) {
    let player_pos = state.player.pos;
    match kind {
        PowerUpKind::Magnet => {
            state.magnet_ticks = tuning.magnet_frames;
            emit_sparkles(state, player_pos, Color::MAGNET_PURPLE, particle_cap);
        }
        PowerUpKind::Shield => {
            state.shield = true;
            emit_sparkles(state, player_pos, Color::SHIELD_BLUE, particle_cap);
        }
    }
    state.emit(GameEvent::PowerUpActivated(kind));
    state.emit(GameEvent::Sound(SoundCue::PowerUp));
    log::debug!("Power-up {:?} activated", kind);
}

/// Bank a ring touched at `ring_pos`
pub fn collect_ring(state: &mut GameState, ring_pos: glam::Vec2, tuning: &Tuning, particle_cap: usize) {
    state.stats.collect_ring(tuning.ring_score);
    state.emit(GameEvent::ScoreChanged {
        score: state.stats.score,
        held_rings: state.stats.held_rings,
    });
    emit_sparkles(state, ring_pos, Color::GOLD, particle_cap);
    state.emit(GameEvent::Sound(SoundCue::RingCollect));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn playing_state() -> GameState {
        let mut state = GameState::new(21);
        state.phase = RunPhase::Playing;
        state
    }

    #[test]
    fn test_priority_table() {
        assert_eq!(decide_hit(true, true, 5), HitOutcome::Ignored);
        assert_eq!(decide_hit(true, false, 0), HitOutcome::Ignored);
        assert_eq!(decide_hit(false, true, 5), HitOutcome::Shielded);
        assert_eq!(decide_hit(false, true, 0), HitOutcome::Shielded);
        assert_eq!(decide_hit(false, false, 3), HitOutcome::RingsLost { lost: 3 });
        assert_eq!(decide_hit(false, false, 0), HitOutcome::Died);
    }

    #[test]
    fn test_shield_beats_ring_loss() {
        let mut state = playing_state();
        let tuning = Tuning::default();
        for _ in 0..5 {
            state.stats.collect_ring(10);
        }
        state.shield = true;

        let outcome = resolve_obstacle_hit(&mut state, &tuning, 500);
        assert_eq!(outcome, HitOutcome::Shielded);
        assert!(!state.shield);
        assert_eq!(state.stats.held_rings, 5);
        assert_eq!(state.invincibility_ticks, 120);
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.events.contains(&GameEvent::Sound(SoundCue::Damage)));
    }

    #[test]
    fn test_ring_loss_scatters_and_reports() {
        let mut state = playing_state();
        let tuning = Tuning::default();
        for _ in 0..3 {
            state.stats.collect_ring(10);
        }

        let outcome = resolve_obstacle_hit(&mut state, &tuning, 500);
        assert_eq!(outcome, HitOutcome::RingsLost { lost: 3 });
        assert_eq!(state.stats.held_rings, 0);
        assert_eq!(state.stats.total_collected, 3);
        assert_eq!(state.invincibility_ticks, 120);
        assert_eq!(state.particles.len(), 3);
        assert!(state.events.contains(&GameEvent::ScoreChanged { score: 30, held_rings: 0 }));
    }

    #[test]
    fn test_unprotected_hit_is_fatal() {
        let mut state = playing_state();
        let tuning = Tuning::default();
        state.stats.score = 70;

        let outcome = resolve_obstacle_hit(&mut state, &tuning, 500);
        assert_eq!(outcome, HitOutcome::Died);
        assert_eq!(state.phase, RunPhase::GameOver);
        let over: Vec<_> = state
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::GameOver(summary) => Some(*summary),
                _ => None,
            })
            .collect();
        assert_eq!(over.len(), 1);
        assert_eq!(over[0].score, 70);
        assert_eq!(over[0].held_rings, 0);
        assert!(!over[0].mintable());
    }

    #[test]
    fn test_invincible_hit_changes_nothing() {
        let mut state = playing_state();
        let tuning = Tuning::default();
        state.invincibility_ticks = 30;

        let outcome = resolve_obstacle_hit(&mut state, &tuning, 500);
        assert_eq!(outcome, HitOutcome::Ignored);
        assert_eq!(state.invincibility_ticks, 30);
        assert_eq!(state.phase, RunPhase::Playing);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_power_ups() {
        let mut state = playing_state();
        let tuning = Tuning::default();

        apply_power_up(&mut state, PowerUpKind::Magnet, &tuning, 500);
        assert_eq!(state.magnet_ticks, 600);
        assert_eq!(state.particles[0].color, Color::MAGNET_PURPLE);

        apply_power_up(&mut state, PowerUpKind::Shield, &tuning, 500);
        assert!(state.shield);
        assert!(state.events.contains(&GameEvent::PowerUpActivated(PowerUpKind::Shield)));
    }
}
