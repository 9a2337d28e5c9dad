//! Render pass
//!
//! Turns a `GameState` snapshot into an ordered `DrawList`. The pass is total:
//! any sprite that is not ready yet is replaced by a solid fallback shape, so
//! a frame can always be produced.

use glam::Vec2;

use crate::consts::*;
use crate::profile::{CharacterProfile, Color, Theme};
use crate::settings::Settings;
use crate::sim::collision::Aabb;
use crate::sim::state::{Facing, GameState, ParticleKind, PowerUpKind, RunPhase, SPARKLE_LIFE};
use crate::tuning::Tuning;

/// Fixed colors that do not come from a theme
mod palette {
    use crate::profile::Color;

    pub const OUTLINE: Color = Color::hex(0x1F2937);
    pub const MONITOR_BOX: Color = Color::hex(0x475569);
    pub const MONITOR_OUTLINE: Color = Color::hex(0x94A3B8);
    pub const MONITOR_SCREEN: Color = Color::hex(0x0F172A);
    pub const BAR_TRACK: Color = Color::new(0.0, 0.0, 0.0, 0.5);
}

/// Images the host may have loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageRef {
    Background,
    /// Index into the character's run frames
    RunFrame(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// One drawing primitive in canvas space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    FillRect {
        rect: Aabb,
        color: Color,
    },
    StrokeRect {
        rect: Aabb,
        color: Color,
        width: f32,
    },
    FillCircle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    StrokeCircle {
        center: Vec2,
        radius: f32,
        color: Color,
        width: f32,
        dashed: bool,
    },
    Line {
        from: Vec2,
        to: Vec2,
        color: Color,
        width: f32,
    },
    Image {
        image: ImageRef,
        rect: Aabb,
        flip_x: bool,
    },
    Text {
        pos: Vec2,
        text: String,
        size: f32,
        color: Color,
        align: TextAlign,
    },
}

/// Draw commands in painter's order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn push(&mut self, cmd: DrawCmd) {
        self.commands.push(cmd);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands.iter()
    }

    /// All text lines, in order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: Color) {
        self.push(DrawCmd::FillRect {
            rect: Aabb::new(min, size),
            color,
        });
    }

    fn text(&mut self, pos: Vec2, text: String, size: f32, color: Color, align: TextAlign) {
        self.push(DrawCmd::Text {
            pos,
            text,
            size,
            color,
            align,
        });
    }
}

/// Readiness of asynchronously loaded images
pub trait AssetSource {
    fn background_ready(&self) -> bool;
    fn run_frame_ready(&self, index: usize) -> bool;
}

/// No images at all; every sprite uses its fallback
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAssets;

impl AssetSource for NoAssets {
    fn background_ready(&self) -> bool {
        false
    }

    fn run_frame_ready(&self, _index: usize) -> bool {
        false
    }
}

/// Everything the render pass reads besides the game state
pub struct RenderContext<'a> {
    pub theme: &'a Theme,
    pub character: &'a CharacterProfile,
    pub settings: &'a Settings,
    pub tuning: &'a Tuning,
    pub assets: &'a dyn AssetSource,
}

/// Build the full frame for the current state
pub fn build_frame(state: &GameState, ctx: &RenderContext) -> DrawList {
    let mut list = DrawList::default();

    draw_background(&mut list, state, ctx);
    draw_ground(&mut list, ctx.theme);

    if state.phase != RunPhase::Menu {
        for ring in &state.rings {
            let center = ring.bounds().center();
            list.push(DrawCmd::StrokeCircle {
                center,
                radius: RING_RADIUS,
                color: Color::GOLD,
                width: 4.0,
                dashed: false,
            });
            // Glint marks the spin
            let glint = center + Vec2::from_angle(ring.rotation) * (RING_RADIUS - 4.0);
            list.push(DrawCmd::FillCircle {
                center: glint,
                radius: 3.0,
                color: Color::WHITE,
            });
        }

        for obstacle in &state.obstacles {
            let rect = obstacle.bounds();
            list.push(DrawCmd::FillRect {
                rect,
                color: obstacle.color,
            });
            list.push(DrawCmd::StrokeRect {
                rect,
                color: palette::OUTLINE,
                width: 3.0,
            });
            let max = rect.max();
            list.push(DrawCmd::Line {
                from: rect.min,
                to: max,
                color: palette::OUTLINE,
                width: 3.0,
            });
            list.push(DrawCmd::Line {
                from: Vec2::new(max.x, rect.min.y),
                to: Vec2::new(rect.min.x, max.y),
                color: palette::OUTLINE,
                width: 3.0,
            });
        }

        for power_up in state.power_ups.iter().filter(|p| p.active) {
            draw_monitor(&mut list, power_up.bounds(), power_up.kind);
        }

        if ctx.settings.particles {
            draw_particles(&mut list, state);
        }

        draw_player(&mut list, state, ctx);

        if ctx.settings.show_hud {
            draw_hud(&mut list, state, ctx);
        }
    }

    draw_overlay(&mut list, state);
    list
}

fn draw_background(list: &mut DrawList, state: &GameState, ctx: &RenderContext) {
    let size = Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    if ctx.assets.background_ready() {
        // Two copies side by side for a seamless loop
        for offset in [0.0, CANVAS_WIDTH] {
            list.push(DrawCmd::Image {
                image: ImageRef::Background,
                rect: Aabb::new(Vec2::new(state.background_scroll + offset, 0.0), size),
                flip_x: false,
            });
        }
    } else {
        list.fill_rect(Vec2::ZERO, size, ctx.theme.sky);
    }
}

fn draw_ground(list: &mut DrawList, theme: &Theme) {
    list.fill_rect(
        Vec2::new(0.0, GROUND_LINE),
        Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT - GROUND_LINE),
        theme.ground,
    );
    list.fill_rect(
        Vec2::new(0.0, GROUND_LINE),
        Vec2::new(CANVAS_WIDTH, GRASS_HEIGHT),
        theme.grass,
    );
}

fn draw_monitor(list: &mut DrawList, rect: Aabb, kind: PowerUpKind) {
    list.push(DrawCmd::FillRect {
        rect,
        color: palette::MONITOR_BOX,
    });
    list.push(DrawCmd::StrokeRect {
        rect,
        color: palette::MONITOR_OUTLINE,
        width: 2.0,
    });
    let inset = Vec2::splat(8.0);
    list.fill_rect(rect.min + inset, rect.size - inset * 2.0, palette::MONITOR_SCREEN);

    let center = rect.center();
    match kind {
        PowerUpKind::Magnet => list.push(DrawCmd::FillCircle {
            center,
            radius: 9.0,
            color: Color::MAGNET_PURPLE,
        }),
        PowerUpKind::Shield => list.push(DrawCmd::StrokeCircle {
            center,
            radius: 11.0,
            color: Color::SHIELD_BLUE,
            width: 3.0,
            dashed: false,
        }),
    }
}

fn draw_particles(list: &mut DrawList, state: &GameState) {
    for particle in &state.particles {
        match particle.kind {
            ParticleKind::Sparkle => {
                let alpha = particle.life as f32 / SPARKLE_LIFE as f32;
                list.fill_rect(
                    particle.pos - Vec2::splat(3.0),
                    Vec2::splat(6.0),
                    particle.color.with_alpha(alpha),
                );
            }
            ParticleKind::RingScatter => list.push(DrawCmd::StrokeCircle {
                center: particle.pos,
                radius: 8.0,
                color: particle.color,
                width: 2.0,
                dashed: false,
            }),
        }
    }
}

/// Whether the player is drawn this frame
fn player_visible(state: &GameState, settings: &Settings) -> bool {
    if !state.is_invincible() || !settings.effective_flicker() {
        return true;
    }
    (state.frame / ANIMATION_STEP_FRAMES) % 2 == 0
}

fn draw_player(list: &mut DrawList, state: &GameState, ctx: &RenderContext) {
    let player = &state.player;
    let rect = player.bounds();
    let center = rect.center();
    let width = player.size.x;

    if player_visible(state, ctx.settings) {
        let frame_count = ctx.character.run_frames.len();
        let sprite = (frame_count > 0)
            .then(|| ((state.frame / ANIMATION_STEP_FRAMES) as usize) % frame_count)
            .filter(|&index| ctx.assets.run_frame_ready(index));

        match sprite {
            Some(index) => list.push(DrawCmd::Image {
                image: ImageRef::RunFrame(index),
                rect,
                flip_x: player.facing == Facing::Left,
            }),
            None => {
                list.push(DrawCmd::FillCircle {
                    center,
                    radius: width / 2.0,
                    color: ctx.character.color,
                });
                let dir = match player.facing {
                    Facing::Right => 1.0,
                    Facing::Left => -1.0,
                };
                let eye = center + Vec2::new(dir * 10.0, -8.0);
                list.push(DrawCmd::FillCircle {
                    center: eye,
                    radius: 7.0,
                    color: Color::WHITE,
                });
                list.push(DrawCmd::FillCircle {
                    center: eye + Vec2::new(dir * 2.0, 0.0),
                    radius: 3.0,
                    color: Color::BLACK,
                });
            }
        }
    }

    if state.shield {
        list.push(DrawCmd::StrokeCircle {
            center,
            radius: width / 2.0 + 10.0,
            color: Color::SHIELD_BLUE.with_alpha(0.8),
            width: 3.0,
            dashed: false,
        });
    }

    if state.magnet_active() {
        let alpha = if ctx.settings.effective_magnet_pulse() {
            (state.frame as f32 * 0.1).sin().abs()
        } else {
            0.5
        };
        list.push(DrawCmd::StrokeCircle {
            center,
            radius: width + 40.0,
            color: Color::MAGNET_PURPLE.with_alpha(alpha),
            width: 2.0,
            dashed: true,
        });
    }
}

fn draw_hud(list: &mut DrawList, state: &GameState, ctx: &RenderContext) {
    let text = ctx.theme.text;
    list.text(
        Vec2::new(20.0, 40.0),
        format!("SCORE: {}", state.stats.score),
        24.0,
        text,
        TextAlign::Left,
    );
    list.text(
        Vec2::new(20.0, 72.0),
        format!("RINGS: {}", state.stats.held_rings),
        24.0,
        Color::GOLD,
        TextAlign::Left,
    );

    let mut y = 88.0;
    if state.magnet_active() && ctx.tuning.magnet_frames > 0 {
        let fraction = state.magnet_ticks as f32 / ctx.tuning.magnet_frames as f32;
        list.fill_rect(Vec2::new(20.0, y), Vec2::new(200.0, 8.0), palette::BAR_TRACK);
        list.fill_rect(
            Vec2::new(20.0, y),
            Vec2::new(200.0 * fraction.min(1.0), 8.0),
            Color::MAGNET_PURPLE,
        );
        y += 16.0;
    }
    if state.shield {
        list.text(
            Vec2::new(20.0, y + 16.0),
            "SHIELD".to_string(),
            16.0,
            Color::SHIELD_BLUE,
            TextAlign::Left,
        );
    }
}

fn draw_overlay(list: &mut DrawList, state: &GameState) {
    let center_x = CANVAS_WIDTH / 2.0;
    let center_y = CANVAS_HEIGHT / 2.0;
    fn dim(list: &mut DrawList, alpha: f32) {
        list.fill_rect(
            Vec2::ZERO,
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            Color::BLACK.with_alpha(alpha),
        );
    }

    match state.phase {
        RunPhase::Playing => {}
        RunPhase::Menu => {
            dim(list, 0.4);
            list.text(
                Vec2::new(center_x, center_y - 20.0),
                "RING RUNNER".to_string(),
                56.0,
                Color::GOLD,
                TextAlign::Center,
            );
            list.text(
                Vec2::new(center_x, center_y + 30.0),
                "Press START to run".to_string(),
                22.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }
        RunPhase::Paused => {
            dim(list, 0.5);
            list.text(
                Vec2::new(center_x, center_y),
                "PAUSED".to_string(),
                48.0,
                Color::WHITE,
                TextAlign::Center,
            );
        }
        RunPhase::GameOver => {
            dim(list, 0.7);
            let summary = state.stats.summary();
            let lines = [
                ("GAME OVER".to_string(), 56.0, Color::hex(0xEF4444)),
                (format!("Score: {}", summary.score), 26.0, Color::WHITE),
                (format!("Rings collected: {}", summary.total_collected), 26.0, Color::GOLD),
                (
                    if summary.mintable() {
                        format!("Mint {} rings", summary.total_collected)
                    } else {
                        "No rings to mint".to_string()
                    },
                    20.0,
                    Color::WHITE,
                ),
            ];
            let mut y = center_y - 70.0;
            for (text, size, color) in lines {
                list.text(Vec2::new(center_x, y), text, size, color, TextAlign::Center);
                y += size + 18.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Obstacle, Particle, PowerUp, Ring};

    struct AllAssets;

    impl AssetSource for AllAssets {
        fn background_ready(&self) -> bool {
            true
        }
        fn run_frame_ready(&self, _index: usize) -> bool {
            true
        }
    }

    struct Fixture {
        theme: Theme,
        character: CharacterProfile,
        settings: Settings,
        tuning: Tuning,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                theme: Theme::default(),
                character: CharacterProfile::default(),
                settings: Settings::default(),
                tuning: Tuning::default(),
            }
        }

        fn build(&self, state: &GameState, assets: &dyn AssetSource) -> DrawList {
            let ctx = RenderContext {
                theme: &self.theme,
                character: &self.character,
                settings: &self.settings,
                tuning: &self.tuning,
                assets,
            };
            build_frame(state, &ctx)
        }
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(3);
        state.phase = RunPhase::Playing;
        state
    }

    fn player_images(list: &DrawList) -> usize {
        list.iter()
            .filter(|c| matches!(c, DrawCmd::Image { image: ImageRef::RunFrame(_), .. }))
            .count()
    }

    fn player_fallbacks(list: &DrawList, character: &CharacterProfile) -> usize {
        list.iter()
            .filter(|c| matches!(c, DrawCmd::FillCircle { color, radius, .. } if *color == character.color && *radius == 30.0))
            .count()
    }

    #[test]
    fn menu_draws_background_and_title_only() {
        let fixture = Fixture::new();
        let mut state = GameState::new(1);
        state.rings.push(Ring::new(Vec2::new(300.0, 400.0)));

        let list = fixture.build(&state, &NoAssets);
        assert_eq!(
            list.commands[0],
            DrawCmd::FillRect {
                rect: Aabb::new(Vec2::ZERO, Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT)),
                color: fixture.theme.sky,
            }
        );
        assert!(!list.iter().any(|c| matches!(c, DrawCmd::StrokeCircle { .. })));
        assert!(list.texts().any(|t| t == "RING RUNNER"));
    }

    #[test]
    fn missing_sprites_fall_back_to_shapes() {
        let fixture = Fixture::new();
        let state = playing_state();

        let fallback = fixture.build(&state, &NoAssets);
        assert_eq!(player_images(&fallback), 0);
        assert_eq!(player_fallbacks(&fallback, &fixture.character), 1);

        let sprites = fixture.build(&state, &AllAssets);
        assert_eq!(player_images(&sprites), 1);
        assert_eq!(player_fallbacks(&sprites, &fixture.character), 0);
        let backgrounds = sprites
            .iter()
            .filter(|c| matches!(c, DrawCmd::Image { image: ImageRef::Background, .. }))
            .count();
        assert_eq!(backgrounds, 2);
    }

    #[test]
    fn sprite_frame_follows_animation_step() {
        let fixture = Fixture::new();
        let mut state = playing_state();
        state.frame = 4 * 13;
        state.player.facing = Facing::Left;

        let list = fixture.build(&state, &AllAssets);
        // 12 run frames, so step 13 wraps to 1
        assert!(list.iter().any(|c| matches!(
            c,
            DrawCmd::Image { image: ImageRef::RunFrame(1), flip_x: true, .. }
        )));
    }

    #[test]
    fn invincibility_flickers_unless_reduced_motion() {
        let mut fixture = Fixture::new();
        let mut state = playing_state();
        state.invincibility_ticks = 60;

        state.frame = 4;
        let hidden = fixture.build(&state, &NoAssets);
        assert_eq!(player_fallbacks(&hidden, &fixture.character), 0);

        state.frame = 8;
        let shown = fixture.build(&state, &NoAssets);
        assert_eq!(player_fallbacks(&shown, &fixture.character), 1);

        fixture.settings.reduced_motion = true;
        state.frame = 4;
        let steady = fixture.build(&state, &NoAssets);
        assert_eq!(player_fallbacks(&steady, &fixture.character), 1);
    }

    #[test]
    fn power_up_effects_are_drawn() {
        let fixture = Fixture::new();
        let mut state = playing_state();
        state.shield = true;
        state.magnet_ticks = 300;
        state.frame = 10;

        let list = fixture.build(&state, &NoAssets);
        let shield = list.iter().any(|c| matches!(
            c,
            DrawCmd::StrokeCircle { radius, dashed: false, .. } if *radius == 40.0
        ));
        let magnet = list.iter().find_map(|c| match c {
            DrawCmd::StrokeCircle { radius, dashed: true, color, .. } if *radius == 100.0 => Some(color.a),
            _ => None,
        });
        assert!(shield);
        let alpha = magnet.unwrap_or(-1.0);
        assert!((alpha - 1.0f32.sin().abs()).abs() < 1e-5);
        assert!(list.texts().any(|t| t == "SHIELD"));
    }

    #[test]
    fn entities_and_particles() {
        let mut fixture = Fixture::new();
        let mut state = playing_state();
        state.rings.push(Ring::new(Vec2::new(300.0, 400.0)));
        state.obstacles.push(Obstacle::new(500.0, fixture.theme.obstacle));
        let mut taken = PowerUp::new(700.0, PowerUpKind::Magnet);
        taken.active = false;
        state.power_ups.push(taken);
        state.power_ups.push(PowerUp::new(800.0, PowerUpKind::Shield));
        state.particles.push(Particle {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            life: 15,
            color: Color::GOLD,
            kind: ParticleKind::Sparkle,
            gravity: None,
        });

        let list = fixture.build(&state, &NoAssets);
        let ring_circles = list
            .iter()
            .filter(|c| matches!(c, DrawCmd::StrokeCircle { radius, .. } if *radius == RING_RADIUS))
            .count();
        assert_eq!(ring_circles, 1);
        let crosses = list.iter().filter(|c| matches!(c, DrawCmd::Line { .. })).count();
        assert_eq!(crosses, 2);
        let monitors = list
            .iter()
            .filter(|c| matches!(c, DrawCmd::FillRect { color, .. } if *color == palette::MONITOR_BOX))
            .count();
        assert_eq!(monitors, 1);
        let sparkle = list.iter().any(|c| matches!(
            c,
            DrawCmd::FillRect { color, .. } if *color == Color::GOLD.with_alpha(0.5)
        ));
        assert!(sparkle);

        fixture.settings.particles = false;
        let without = fixture.build(&state, &NoAssets);
        assert_eq!(without.len(), list.len() - 1);
    }

    #[test]
    fn overlays_follow_phase() {
        let mut fixture = Fixture::new();
        let mut state = playing_state();
        state.stats.collect_ring(10);

        let playing = fixture.build(&state, &NoAssets);
        assert!(playing.texts().any(|t| t == "SCORE: 10"));
        assert!(playing.texts().any(|t| t == "RINGS: 1"));
        assert!(!playing.texts().any(|t| t == "PAUSED"));

        state.phase = RunPhase::Paused;
        let paused = fixture.build(&state, &NoAssets);
        assert!(paused.texts().any(|t| t == "PAUSED"));

        state.phase = RunPhase::GameOver;
        state.stats.lose_held_rings();
        let over = fixture.build(&state, &NoAssets);
        assert!(over.texts().any(|t| t == "GAME OVER"));
        assert!(over.texts().any(|t| t == "Rings collected: 1"));
        assert!(over.texts().any(|t| t == "Mint 1 rings"));

        fixture.settings.show_hud = false;
        let bare = fixture.build(&state, &NoAssets);
        assert!(!bare.texts().any(|t| t.starts_with("SCORE")));
    }
}
