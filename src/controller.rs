//! Run controller
//!
//! Owns the per-run `GameState` and drives the `menu → playing → paused /
//! gameover` state machine. The host schedules `frame` once per display
//! refresh and stops as soon as it returns `false`.

use crate::profile::{CharacterProfile, Theme};
use crate::renderer::scene::{AssetSource, DrawList, RenderContext, build_frame};
use crate::settings::Settings;
use crate::sim::events::{GameEvent, RunSummary, SoundCue};
use crate::sim::spawn::spawn_initial_rings;
use crate::sim::state::{Facing, GameState, PowerUpKind, RunPhase};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Callbacks into the host application. Every method defaults to a no-op.
pub trait HostHooks {
    /// Score or held rings changed
    fn on_score_changed(&mut self, _score: u64, _held_rings: u32) {}
    /// Terminal stats, once per run
    fn on_game_over(&mut self, _summary: RunSummary) {}
    fn on_power_up(&mut self, _kind: PowerUpKind) {}
    fn on_sound(&mut self, _cue: SoundCue) {}
}

impl HostHooks for () {}

/// Drives one run at a time
pub struct RunController {
    state: GameState,
    tuning: Tuning,
    settings: Settings,
    character: CharacterProfile,
    theme: Theme,
    /// Seed for the next reset
    next_seed: u64,
    /// Input latched between frames
    pending: TickInput,
    last_summary: Option<RunSummary>,
}

impl RunController {
    pub fn new(seed: u64, character: CharacterProfile, theme: Theme, tuning: Tuning, settings: Settings) -> Self {
        let mut state = GameState::new(seed);
        state.reset(seed, character.speed, theme.obstacle);
        Self {
            state,
            tuning,
            settings,
            character,
            theme,
            next_seed: seed,
            pending: TickInput::default(),
            last_summary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tooling and tests
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> RunPhase {
        self.state.phase
    }

    /// Whether the host should keep scheduling frames
    pub fn is_running(&self) -> bool {
        self.state.phase == RunPhase::Playing
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn character(&self) -> &CharacterProfile {
        &self.character
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Live stats of the current run
    pub fn summary(&self) -> RunSummary {
        self.state.stats.summary()
    }

    /// Stats reported by the most recent game over
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    /// Settings only affect presentation and the particle cap, so they may
    /// change at any time
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Pick a character; applies from the next reset
    pub fn set_character(&mut self, character: CharacterProfile) -> bool {
        if self.is_running() || self.phase() == RunPhase::Paused {
            log::debug!("Character change ignored mid-run");
            return false;
        }
        self.character = character;
        true
    }

    /// Pick a theme; applies from the next reset
    pub fn set_theme(&mut self, theme: Theme) -> bool {
        if self.is_running() || self.phase() == RunPhase::Paused {
            log::debug!("Theme change ignored mid-run");
            return false;
        }
        self.theme = theme;
        true
    }

    /// `menu → playing` with a full reset
    pub fn start_run(&mut self) -> bool {
        if self.phase() != RunPhase::Menu {
            log::debug!("start ignored in {:?}", self.phase());
            return false;
        }
        self.begin_run();
        true
    }

    /// `gameover → playing` with a full reset, optionally with a new seed
    pub fn restart(&mut self, seed: Option<u64>) -> bool {
        if self.phase() != RunPhase::GameOver {
            log::debug!("restart ignored in {:?}", self.phase());
            return false;
        }
        if let Some(seed) = seed {
            self.next_seed = seed;
        }
        self.begin_run();
        true
    }

    /// `playing → paused`
    pub fn pause(&mut self) -> bool {
        if self.phase() != RunPhase::Playing {
            return false;
        }
        self.state.phase = RunPhase::Paused;
        log::info!("Paused at frame {}", self.state.frame);
        true
    }

    /// `paused → playing`, no reset
    pub fn resume(&mut self) -> bool {
        if self.phase() != RunPhase::Paused {
            return false;
        }
        self.state.phase = RunPhase::Playing;
        log::info!("Resumed at frame {}", self.state.frame);
        true
    }

    /// Back to the menu once the host is done with the game-over screen
    /// (e.g. after minting). Also abandons a paused run.
    pub fn reset_to_menu(&mut self) -> bool {
        match self.phase() {
            RunPhase::GameOver | RunPhase::Paused => {
                let seed = self.state.seed;
                self.state.reset(seed, self.character.speed, self.theme.obstacle);
                self.state.phase = RunPhase::Menu;
                self.pending = TickInput::default();
                self.state.emit(GameEvent::ScoreChanged {
                    score: 0,
                    held_rings: 0,
                });
                log::info!("Back to menu");
                true
            }
            _ => false,
        }
    }

    /// Latch a jump for the next frame
    pub fn jump(&mut self) -> bool {
        if !self.is_running() || self.state.player.jumping {
            return false;
        }
        self.pending.jump = true;
        true
    }

    /// Latch a facing change for the next frame
    pub fn set_facing(&mut self, facing: Facing) {
        if self.is_running() {
            self.pending.facing = Some(facing);
        }
    }

    /// Run one frame (if playing) and hand its events to the host.
    /// Returns whether another frame should be scheduled.
    pub fn frame<H: HostHooks + ?Sized>(&mut self, hooks: &mut H) -> bool {
        if self.is_running() {
            let input = std::mem::take(&mut self.pending);
            tick(&mut self.state, &input, &self.tuning, self.settings.max_particles());
        }
        self.dispatch_events(hooks);
        self.is_running()
    }

    /// Forward queued events to the host
    pub fn dispatch_events<H: HostHooks + ?Sized>(&mut self, hooks: &mut H) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::ScoreChanged { score, held_rings } => hooks.on_score_changed(score, held_rings),
                GameEvent::GameOver(summary) => {
                    self.last_summary = Some(summary);
                    hooks.on_game_over(summary);
                }
                GameEvent::PowerUpActivated(kind) => hooks.on_power_up(kind),
                GameEvent::Sound(cue) => hooks.on_sound(cue),
                GameEvent::Hit(_) => {}
            }
        }
    }

    /// Build the draw list for the current state
    pub fn draw(&self, assets: &dyn AssetSource) -> DrawList {
        let ctx = RenderContext {
            theme: &self.theme,
            character: &self.character,
            settings: &self.settings,
            tuning: &self.tuning,
            assets,
        };
        build_frame(&self.state, &ctx)
    }

    fn begin_run(&mut self) {
        let seed = self.next_seed;
        self.next_seed = seed
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);

        self.state.reset(seed, self.character.speed, self.theme.obstacle);
        spawn_initial_rings(&mut self.state, &self.tuning);
        self.state.phase = RunPhase::Playing;
        self.pending = TickInput::default();
        self.state.emit(GameEvent::ScoreChanged {
            score: 0,
            held_rings: 0,
        });
        log::info!(
            "Run started: seed {}, character {}, theme {}",
            seed,
            self.character.name,
            self.theme.id
        );
    }
}
