//! Spawner and particle emitters
//!
//! Each entity class arrives through an independent per-frame Bernoulli
//! trial. There is no cooldown or spacing between spawns, so clusters and
//! overlaps are possible.

use glam::Vec2;
use rand::Rng;

use super::state::{
    GameState, Obstacle, Particle, ParticleKind, PowerUp, PowerUpKind, RING_SCATTER_LIFE, Ring,
    SPARKLE_LIFE,
};
use crate::profile::Color;
use crate::tuning::Tuning;

/// Sparkles per burst
pub const SPARKLE_COUNT: usize = 8;
/// Gravity applied to scattered rings
pub const RING_SCATTER_GRAVITY: f32 = 0.5;

/// Append one ring at `offset_x` (or the default downstream offset) plus jitter
pub fn spawn_ring(state: &mut GameState, tuning: &Tuning, offset_x: Option<f32>) {
    let base = offset_x.unwrap_or(tuning.ring_default_offset);
    let jitter = if tuning.ring_jitter > 0.0 {
        state.rng.random_range(0.0..tuning.ring_jitter)
    } else {
        0.0
    };
    let y = state.rng.random_range(tuning.ring_min_y..tuning.ring_max_y);
    state.rings.push(Ring::new(Vec2::new(base + jitter, y)));
}

/// Per-frame ring trial
pub fn maybe_spawn_ring(state: &mut GameState, tuning: &Tuning) {
    if state.rng.random_bool(tuning.ring_chance) {
        spawn_ring(state, tuning, None);
    }
}

/// Per-frame obstacle and power-up trials (independent of each other)
pub fn spawn_obstacle(state: &mut GameState, tuning: &Tuning) {
    if state.rng.random_bool(tuning.obstacle_chance) {
        let color = state.obstacle_color;
        state.obstacles.push(Obstacle::new(tuning.spawn_edge_x, color));
    }

    if state.rng.random_bool(tuning.power_up_chance) {
        let kind = if state.rng.random_bool(0.5) {
            PowerUpKind::Magnet
        } else {
            PowerUpKind::Shield
        };
        state.power_ups.push(PowerUp::new(tuning.spawn_edge_x, kind));
    }
}

/// Staggered rings so the first seconds of a run are never empty
pub fn spawn_initial_rings(state: &mut GameState, tuning: &Tuning) {
    for i in 0..tuning.initial_rings {
        let offset = tuning.initial_ring_start + i as f32 * tuning.initial_ring_spacing;
        spawn_ring(state, tuning, Some(offset));
    }
}

/// Push a particle, evicting the oldest when at the cap
fn push_particle(state: &mut GameState, particle: Particle, cap: usize) {
    if cap == 0 {
        return;
    }
    if state.particles.len() >= cap {
        state.particles.remove(0);
    }
    state.particles.push(particle);
}

/// Burst of fading sparkles
pub fn emit_sparkles(state: &mut GameState, pos: Vec2, color: Color, cap: usize) {
    for _ in 0..SPARKLE_COUNT {
        let vel = Vec2::new(
            (state.rng.random::<f32>() - 0.5) * 10.0,
            (state.rng.random::<f32>() - 0.5) * 10.0,
        );
        let particle = Particle {
            pos,
            vel,
            life: SPARKLE_LIFE,
            color,
            kind: ParticleKind::Sparkle,
            gravity: None,
        };
        push_particle(state, particle, cap);
    }
}

/// Upward arc of scattered rings, one per lost ring up to `visual_cap`
pub fn emit_ring_scatter(state: &mut GameState, pos: Vec2, lost: u32, visual_cap: u32, cap: usize) {
    let count = lost.min(visual_cap);
    if count == 0 {
        return;
    }
    for i in 0..count {
        // Spread over the upper half circle (canvas y points down)
        let angle = std::f32::consts::PI / count as f32 * i as f32 + std::f32::consts::PI;
        let speed = 5.0 + state.rng.random::<f32>() * 10.0;
        let wobble = (state.rng.random::<f32>() - 0.5) * 5.0;
        let vel = Vec2::new(angle.cos() * speed + wobble, angle.sin() * speed - 5.0);
        let particle = Particle {
            pos,
            vel,
            life: RING_SCATTER_LIFE,
            color: Color::GOLD,
            kind: ParticleKind::RingScatter,
            gravity: Some(RING_SCATTER_GRAVITY),
        };
        push_particle(state, particle, cap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_placement_ranges() {
        let mut state = GameState::new(3);
        let tuning = Tuning::default();
        for _ in 0..200 {
            spawn_ring(&mut state, &tuning, None);
        }
        spawn_ring(&mut state, &tuning, Some(800.0));

        let (defaults, offset) = state.rings.split_at(200);
        for ring in defaults {
            assert!(ring.pos.x >= 1200.0 && ring.pos.x < 1600.0);
            assert!(ring.pos.y >= 350.0 && ring.pos.y < 500.0);
        }
        assert!(offset[0].pos.x >= 800.0 && offset[0].pos.x < 1200.0);
    }

    #[test]
    fn initial_rings_are_staggered() {
        let mut state = GameState::new(11);
        let tuning = Tuning::default();
        spawn_initial_rings(&mut state, &tuning);
        assert_eq!(state.rings.len(), 5);
        for (i, ring) in state.rings.iter().enumerate() {
            let base = 800.0 + i as f32 * 200.0;
            assert!(ring.pos.x >= base && ring.pos.x < base + 400.0);
        }
    }

    #[test]
    fn certain_spawns_land_on_spawn_edge() {
        let mut state = GameState::new(5);
        let tuning = Tuning {
            obstacle_chance: 1.0,
            power_up_chance: 1.0,
            ..Default::default()
        };
        spawn_obstacle(&mut state, &tuning);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.power_ups.len(), 1);
        assert_eq!(state.obstacles[0].pos, Vec2::new(1200.0, 540.0));
        assert_eq!(state.power_ups[0].pos, Vec2::new(1200.0, 550.0));
        assert!(state.power_ups[0].active);
    }

    #[test]
    fn zero_chance_never_spawns() {
        let mut state = GameState::new(5);
        let tuning = Tuning {
            obstacle_chance: 0.0,
            power_up_chance: 0.0,
            ring_chance: 0.0,
            ..Default::default()
        };
        for _ in 0..1000 {
            spawn_obstacle(&mut state, &tuning);
            maybe_spawn_ring(&mut state, &tuning);
        }
        assert!(state.obstacles.is_empty());
        assert!(state.power_ups.is_empty());
        assert!(state.rings.is_empty());
    }

    #[test]
    fn ring_scatter_is_capped() {
        let mut state = GameState::new(9);
        emit_ring_scatter(&mut state, Vec2::ZERO, 150, 20, 500);
        assert_eq!(state.particles.len(), 20);
        assert!(state.particles.iter().all(|p| p.kind == ParticleKind::RingScatter));
        assert!(state.particles.iter().all(|p| p.gravity == Some(RING_SCATTER_GRAVITY)));
    }

    #[test]
    fn particle_cap_evicts_oldest() {
        let mut state = GameState::new(9);
        emit_sparkles(&mut state, Vec2::ZERO, Color::GOLD, 10);
        emit_sparkles(&mut state, Vec2::ONE, Color::SHIELD_BLUE, 10);
        assert_eq!(state.particles.len(), 10);
        assert_eq!(state.particles.last().map(|p| p.color), Some(Color::SHIELD_BLUE));

        emit_sparkles(&mut state, Vec2::ZERO, Color::GOLD, 0);
        assert_eq!(state.particles.len(), 10);
    }
}
