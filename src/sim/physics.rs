//! Per-frame integration steps
//!
//! Each function is one numbered step of the frame. `tick` calls them in a
//! fixed order; they are public so tests can drive single steps.

use super::collision::magnet_pull;
use super::state::GameState;
use crate::consts::CANVAS_WIDTH;
use crate::tuning::Tuning;
use crate::wrap_scroll;

/// Count down timed effects, flooring at zero
pub fn tick_timers(state: &mut GameState) {
    state.invincibility_ticks = state.invincibility_ticks.saturating_sub(1);
    state.magnet_ticks = state.magnet_ticks.saturating_sub(1);
}

/// Gravity, vertical integration and the ground clamp
pub fn integrate_player(state: &mut GameState, tuning: &Tuning) {
    let player = &mut state.player;
    player.vel_y += tuning.gravity;
    player.pos.y += player.vel_y;

    if player.pos.y >= player.ground_y {
        player.pos.y = player.ground_y;
        player.vel_y = 0.0;
        player.jumping = false;
    }
}

/// Scroll obstacles and power-up monitors toward the player
pub fn scroll_hazards(state: &mut GameState, tuning: &Tuning) {
    for obstacle in &mut state.obstacles {
        obstacle.pos.x -= tuning.hazard_scroll_speed;
    }
    for power_up in &mut state.power_ups {
        power_up.pos.x -= tuning.hazard_scroll_speed;
    }
}

/// Scroll and spin rings, then apply the magnet
pub fn advance_rings(state: &mut GameState, tuning: &Tuning) {
    let player_pos = state.player.pos;
    let magnet = state.magnet_active();

    for ring in &mut state.rings {
        ring.pos.x -= tuning.ring_scroll_speed;
        ring.rotation += tuning.ring_spin;

        if magnet {
            ring.pos = magnet_pull(ring.pos, player_pos, tuning.magnet_radius, tuning.magnet_pull);
        }
    }
}

/// Drop everything that scrolled past the cull line and collected monitors
pub fn cull(state: &mut GameState, tuning: &Tuning) {
    let cull_x = tuning.cull_x;
    state.obstacles.retain(|o| o.pos.x > cull_x);
    state.rings.retain(|r| r.pos.x > cull_x);
    state.power_ups.retain(|p| p.pos.x > cull_x && p.active);
}

/// Move particles and expire them
pub fn advance_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        if let Some(gravity) = particle.gravity {
            particle.vel.y += gravity;
        }
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}

/// Background parallax
pub fn scroll_background(state: &mut GameState, tuning: &Tuning) {
    state.background_scroll = wrap_scroll(
        state.background_scroll - tuning.background_scroll_speed,
        CANVAS_WIDTH,
    );
}
