//! Per-frame simulation tick
//!
//! One call advances the run by exactly one display frame. The step order is
//! fixed and every step sees the state left by the previous one.

use super::physics::{
    advance_particles, advance_rings, cull, integrate_player, scroll_background, scroll_hazards,
    tick_timers,
};
use super::resolve::{HitOutcome, apply_power_up, collect_ring, resolve_obstacle_hit};
use super::spawn::{maybe_spawn_ring, spawn_obstacle};
use super::state::{Facing, GameState, PowerUpKind, RunPhase};
use crate::tuning::Tuning;

/// Input sampled between frames, applied at the start of the next one
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (space / up / W)
    pub jump: bool,
    /// Change sprite facing
    pub facing: Option<Facing>,
}

/// Advance the run by one frame
pub fn tick(state: &mut GameState, input: &TickInput, tuning: &Tuning, particle_cap: usize) {
    // Frozen unless playing
    if state.phase != RunPhase::Playing {
        return;
    }

    if input.jump && !state.player.jump(tuning.jump_velocity) {
        log::trace!("Jump ignored, already airborne");
    }
    if let Some(facing) = input.facing {
        state.player.facing = facing;
    }

    state.frame += 1;

    // 1. Timed effects
    tick_timers(state);
    // 2-3. Gravity and ground clamp
    integrate_player(state, tuning);
    // 4. Hazards scroll
    scroll_hazards(state, tuning);
    // 5. Rings scroll, spin and magnet
    advance_rings(state, tuning);
    // 6. Off-screen and collected entities
    cull(state, tuning);
    // 7. New arrivals
    spawn_obstacle(state, tuning);
    maybe_spawn_ring(state, tuning);
    // 8. Collisions
    if resolve_collisions(state, tuning, particle_cap) == Some(HitOutcome::Died) {
        return;
    }
    // 9. Visual bookkeeping
    advance_particles(state);
    scroll_background(state, tuning);
}

/// Test the player against obstacles, power-ups and rings, in that order.
///
/// Overlaps are gathered against the state as it stood after spawning, then
/// resolved. Returns `Some(Died)` when an obstacle ended the run, in which
/// case nothing further is processed this frame.
fn resolve_collisions(state: &mut GameState, tuning: &Tuning, particle_cap: usize) -> Option<HitOutcome> {
    let player_box = state.player.bounds();

    let obstacle_hits = state
        .obstacles
        .iter()
        .filter(|o| player_box.overlaps(&o.bounds()))
        .count();
    let mut last = None;
    for _ in 0..obstacle_hits {
        let outcome = resolve_obstacle_hit(state, tuning, particle_cap);
        last = Some(outcome);
        if outcome == HitOutcome::Died {
            return last;
        }
    }

    let mut picked: Vec<PowerUpKind> = Vec::new();
    for power_up in state.power_ups.iter_mut() {
        if power_up.active && player_box.overlaps(&power_up.bounds()) {
            power_up.active = false;
            picked.push(power_up.kind);
        }
    }
    for kind in picked {
        apply_power_up(state, kind, tuning, particle_cap);
    }

    let mut collected = Vec::new();
    state.rings.retain(|ring| {
        if player_box.overlaps(&ring.bounds()) {
            collected.push(ring.pos);
            false
        } else {
            true
        }
    });
    for pos in collected {
        collect_ring(state, pos, tuning, particle_cap);
    }

    last
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Color;
    use crate::sim::events::GameEvent;
    use crate::sim::state::{Obstacle, PowerUp, Ring};
    use glam::Vec2;

    /// Tuning with spawning disabled so tests control every entity
    fn quiet_tuning() -> Tuning {
        Tuning {
            obstacle_chance: 0.0,
            power_up_chance: 0.0,
            ring_chance: 0.0,
            ..Default::default()
        }
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(12345);
        state.phase = RunPhase::Playing;
        state
    }

    /// Place an obstacle so that it sits on the player after this frame's scroll
    fn obstacle_on_player(state: &mut GameState, tuning: &Tuning) {
        let x = state.player.pos.x + tuning.hazard_scroll_speed;
        state.obstacles.push(Obstacle::new(x, Color::BLACK));
    }

    fn ring_on_player(state: &mut GameState, tuning: &Tuning) {
        let pos = Vec2::new(state.player.pos.x + tuning.ring_scroll_speed, state.player.pos.y);
        state.rings.push(Ring::new(pos));
    }

    #[test]
    fn test_frozen_outside_playing() {
        let tuning = quiet_tuning();
        for phase in [RunPhase::Menu, RunPhase::Paused, RunPhase::GameOver] {
            let mut state = GameState::new(1);
            state.phase = phase;
            state.rings.push(Ring::new(Vec2::new(500.0, 400.0)));
            tick(&mut state, &TickInput { jump: true, ..Default::default() }, &tuning, 500);
            assert_eq!(state.frame, 0);
            assert_eq!(state.rings[0].pos.x, 500.0);
            assert!(!state.player.jumping);
        }
    }

    #[test]
    fn test_jump_applied_at_frame_start() {
        let mut state = playing_state();
        let tuning = quiet_tuning();
        tick(&mut state, &TickInput { jump: true, ..Default::default() }, &tuning, 500);
        assert!(state.player.jumping);
        assert_eq!(state.player.vel_y, -19.0);
        assert_eq!(state.player.pos.y, 521.0);

        // A second jump mid-air is ignored
        tick(&mut state, &TickInput { jump: true, ..Default::default() }, &tuning, 500);
        assert_eq!(state.player.vel_y, -18.0);
    }

    #[test]
    fn test_ring_collection() {
        let mut state = playing_state();
        let tuning = quiet_tuning();
        ring_on_player(&mut state, &tuning);

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert!(state.rings.is_empty());
        assert_eq!(state.stats.score, 10);
        assert_eq!(state.stats.held_rings, 1);
        assert_eq!(state.stats.total_collected, 1);
        assert!(state.events.contains(&GameEvent::ScoreChanged { score: 10, held_rings: 1 }));
        assert_eq!(state.particles.len(), 8);
    }

    #[test]
    fn test_power_up_pickup_is_culled_next_frame() {
        let mut state = playing_state();
        let tuning = quiet_tuning();
        let x = state.player.pos.x + tuning.hazard_scroll_speed;
        state.power_ups.push(PowerUp::new(x, PowerUpKind::Magnet));

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert_eq!(state.magnet_ticks, 600);
        assert_eq!(state.power_ups.len(), 1);
        assert!(!state.power_ups[0].active);

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert!(state.power_ups.is_empty());
        assert_eq!(state.magnet_ticks, 599);
    }

    #[test]
    fn test_death_reported_once_even_with_two_obstacles() {
        let mut state = playing_state();
        let tuning = quiet_tuning();
        obstacle_on_player(&mut state, &tuning);
        obstacle_on_player(&mut state, &tuning);
        ring_on_player(&mut state, &tuning);

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert_eq!(state.phase, RunPhase::GameOver);
        let game_overs = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver(_)))
            .count();
        assert_eq!(game_overs, 1);
        // Ring after the fatal hit is not collected
        assert_eq!(state.stats.total_collected, 0);

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert_eq!(state.frame, 1);
    }

    #[test]
    fn test_second_obstacle_in_same_frame_hits_invincibility() {
        let mut state = playing_state();
        let tuning = quiet_tuning();
        state.stats.collect_ring(10);
        obstacle_on_player(&mut state, &tuning);
        obstacle_on_player(&mut state, &tuning);

        tick(&mut state, &TickInput::default(), &tuning, 500);
        assert_eq!(state.phase, RunPhase::Playing);
        assert_eq!(state.stats.held_rings, 0);
        assert_eq!(state.invincibility_ticks, 120);
    }

    #[test]
    fn test_determinism() {
        let tuning = Tuning::default();
        let mut a = playing_state();
        let mut b = playing_state();
        for frame in 0..600 {
            let input = TickInput {
                jump: frame % 45 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, &tuning, 500);
            tick(&mut b, &input, &tuning, 500);
        }
        assert_eq!(a.frame, b.frame);
        assert_eq!(a.stats, b.stats);
        assert_eq!(a.rings.len(), b.rings.len());
        assert_eq!(a.obstacles.len(), b.obstacles.len());
        assert_eq!(a.phase, b.phase);
    }
}
