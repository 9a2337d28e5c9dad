//! Ring Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement};

    use ring_runner::renderer::{NoAssets, RenderState, tessellate};
    use ring_runner::sim::{Facing, RunPhase, RunSummary, SoundCue};
    use ring_runner::{CharacterProfile, HostHooks, RunController, Settings, Theme, Tuning};

    /// Game instance holding all state
    struct Game {
        controller: RunController,
        render_state: Option<RenderState>,
        hooks: DomHooks,
        /// A requestAnimationFrame callback is pending
        loop_active: bool,
    }

    /// Mirrors score and game-over results into the page
    struct DomHooks {
        document: Document,
    }

    impl DomHooks {
        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }
    }

    impl HostHooks for DomHooks {
        fn on_score_changed(&mut self, score: u64, held_rings: u32) {
            self.set_text("hud-score", &score.to_string());
            self.set_text("hud-rings", &held_rings.to_string());
        }

        fn on_game_over(&mut self, summary: RunSummary) {
            self.set_text("final-score", &summary.score.to_string());
            self.set_text("final-rings", &summary.total_collected.to_string());
            self.set_visible("mint-btn", summary.mintable());
        }

        fn on_sound(&mut self, cue: SoundCue) {
            log::debug!("Sound cue: {:?}", cue);
        }
    }

    impl Game {
        /// Draw the current state once
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let list = self.controller.draw(&NoAssets);
            let vertices = tessellate(&list, self.controller.settings().quality.circle_segments());
            render_state.clear_color = self.controller.theme().sky;
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => log::error!("Out of memory!"),
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Show the overlay matching the current phase
        fn update_overlays(&self) {
            let phase = self.controller.phase();
            self.hooks.set_visible("menu", phase == RunPhase::Menu);
            self.hooks.set_visible("pause-menu", phase == RunPhase::Paused);
            self.hooks.set_visible("game-over", phase == RunPhase::GameOver);
            self.hooks.set_visible("hud", phase != RunPhase::Menu);
        }

        /// Flush events and redraw after a command outside the frame loop
        fn refresh(&mut self) {
            self.controller.dispatch_events(&mut self.hooks);
            self.render();
            self.update_overlays();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ring Runner starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let controller = RunController::new(
            seed,
            CharacterProfile::default(),
            Theme::default(),
            Tuning::default(),
            Settings::load(),
        );
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = match RenderState::new(surface, &adapter, width, height).await {
            Ok(render_state) => Some(render_state),
            Err(err) => {
                log::error!("No GPU device, running without a canvas: {err}");
                None
            }
        };

        let game = Rc::new(RefCell::new(Game {
            controller,
            render_state,
            hooks: DomHooks {
                document: document.clone(),
            },
            loop_active: false,
        }));

        setup_keyboard(game.clone());
        setup_buttons(&document, game.clone());
        setup_auto_pause(&document, game.clone());

        game.borrow_mut().refresh();
        log::info!("Ring Runner ready");
    }

    /// Schedule frames until the controller stops playing
    fn ensure_loop(game: &Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            if g.loop_active || !g.controller.is_running() {
                return;
            }
            g.loop_active = true;
        }
        request_animation_frame(game.clone());
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let Game {
                controller, hooks, ..
            } = &mut *g;
            let running = controller.frame(hooks);
            g.render();
            if !running {
                g.loop_active = false;
                g.update_overlays();
            }
            running
        };

        if keep_going {
            request_animation_frame(game);
        }
    }

    /// Apply a command, refresh the page and restart the loop if needed
    fn command(game: &Rc<RefCell<Game>>, f: impl FnOnce(&mut RunController) -> bool) {
        let changed = {
            let mut g = game.borrow_mut();
            let changed = f(&mut g.controller);
            if changed {
                g.refresh();
            }
            changed
        };
        if changed {
            ensure_loop(game);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            match event.code().as_str() {
                "Space" | "ArrowUp" | "KeyW" => {
                    event.prevent_default();
                    game.borrow_mut().controller.jump();
                }
                "ArrowLeft" | "KeyA" => game.borrow_mut().controller.set_facing(Facing::Left),
                "ArrowRight" | "KeyD" => game.borrow_mut().controller.set_facing(Facing::Right),
                "Escape" | "KeyP" => {
                    let phase = game.borrow().controller.phase();
                    match phase {
                        RunPhase::Playing => command(&game, |c| c.pause()),
                        RunPhase::Paused => command(&game, |c| c.resume()),
                        _ => {}
                    }
                }
                "Enter" => {
                    let phase = game.borrow().controller.phase();
                    match phase {
                        RunPhase::Menu => command(&game, |c| c.start_run()),
                        RunPhase::GameOver => {
                            command(&game, |c| c.restart(Some(js_sys::Date::now() as u64)))
                        }
                        _ => {}
                    }
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(document, "start-btn", move |_| command(&game, |c| c.start_run()));
        }
        {
            let game = game.clone();
            on_click(document, "resume-btn", move |_| command(&game, |c| c.resume()));
        }
        {
            let game = game.clone();
            on_click(document, "quit-btn", move |_| command(&game, |c| c.reset_to_menu()));
        }
        {
            let game = game.clone();
            on_click(document, "restart-btn", move |_| {
                command(&game, |c| c.restart(Some(js_sys::Date::now() as u64)))
            });
        }
        // Minting happens in the page; the core only goes back to the menu
        on_click(document, "mint-btn", move |_| {
            if let Some(summary) = game.borrow().controller.last_summary() {
                log::info!("Mint requested for {} rings", summary.total_collected);
            }
            command(&game, |c| c.reset_to_menu());
        });
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                command(&game, |c| {
                    let paused = c.pause();
                    if paused {
                        log::info!("Auto-paused (tab hidden)");
                    }
                    paused
                });
            }
        });
        let _ = document.add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Frames the headless runner plays before giving up (five minutes at 60 fps)
#[cfg(not(target_arch = "wasm32"))]
const AUTOPLAY_FRAME_LIMIT: u64 = 60 * 60 * 5;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use ring_runner::{CharacterProfile, RunController, Settings, Theme, Tuning};

    env_logger::init();
    log::info!("Ring Runner (native) starting...");
    log::info!("Native mode plays a headless autopilot run; use the wasm build for the browser game");

    // ring-runner [seed] [character id] [tuning.json]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);
    let character = args
        .next()
        .and_then(|s| s.parse().ok())
        .map(CharacterProfile::by_id)
        .unwrap_or_default();
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json_or_default(&json),
            Err(err) => {
                log::warn!("Could not read {path} ({err}), using default tuning");
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut controller = RunController::new(seed, character, Theme::default(), tuning, Settings::default());
    let mut hooks = autopilot::LogHooks::default();
    controller.start_run();

    while controller.frame(&mut hooks) {
        if autopilot::should_jump(controller.state()) {
            controller.jump();
        }
        if controller.state().frame >= AUTOPLAY_FRAME_LIMIT {
            log::info!("Autopilot survived {} frames, stopping", AUTOPLAY_FRAME_LIMIT);
            break;
        }
    }

    let summary = controller.last_summary().unwrap_or_else(|| controller.summary());
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("Could not encode summary: {err}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use ring_runner::HostHooks;
    use ring_runner::sim::{GameState, RunSummary};

    /// Horizontal gap ahead of the player at which a jump clears an obstacle
    const JUMP_WINDOW: std::ops::Range<f32> = 16.0..48.0;

    /// Jump when the nearest obstacle enters the window in front of the player
    pub fn should_jump(state: &GameState) -> bool {
        let front = state.player.pos.x + state.player.size.x;
        !state.player.jumping
            && state
                .obstacles
                .iter()
                .any(|o| JUMP_WINDOW.contains(&(o.pos.x - front)))
    }

    #[derive(Default)]
    pub struct LogHooks {
        pub score_updates: u64,
    }

    impl HostHooks for LogHooks {
        fn on_score_changed(&mut self, score: u64, held_rings: u32) {
            self.score_updates += 1;
            log::debug!("score {} rings {}", score, held_rings);
        }

        fn on_game_over(&mut self, summary: RunSummary) {
            log::info!(
                "Run over after {} score updates, mintable: {}",
                self.score_updates,
                summary.mintable()
            );
        }
    }
}
