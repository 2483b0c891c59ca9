//! Lane Dash entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use lane_dash::sim::{GamePhase, GameState, TickInput, tick};
    use lane_dash::{HighScores, Settings};

    // JS bridge: the host page renders the scene from each frame snapshot
    #[wasm_bindgen(inline_js = "
        export function present_frame(json) {
            if (window.laneDashPresent) {
                window.laneDashPresent(JSON.parse(json));
            }
        }
    ")]
    extern "C" {
        fn present_frame(json: &str);
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: TickInput,
        last_time: f64,
        settings: Settings,
        highscores: HighScores,
        /// Guards against recording the same run twice
        score_recorded: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                input: TickInput::default(),
                last_time: 0.0,
                settings: Settings::load(),
                highscores: HighScores::load(),
                score_recorded: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one simulation step with this frame's delta
        fn update(&mut self, dt: f32, time: f64) {
            let input = self.input.clone();
            tick(&mut self.state, &input, dt);

            // All inputs are one-shot edges; clear after the tick consumes them
            self.input = TickInput::default();

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            // Record the run once when it ends
            if self.state.phase == GamePhase::GameOver && !self.score_recorded {
                self.score_recorded = true;
                let score = self.state.display_score();
                if let Some(rank) =
                    self.highscores
                        .add_score(score, self.state.run_time, js_sys::Date::now())
                {
                    log::info!("New high score: {} (rank {})", score, rank);
                }
                self.highscores.save();
            }
        }

        /// Hand the frame snapshot to the host page's renderer
        fn present(&self) {
            match serde_json::to_string(&self.state.snapshot()) {
                Ok(json) => present_frame(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {e}"),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            // Update score
            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.display_score().to_string()));
            }

            // Update best score
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                let best = self.highscores.top_score().unwrap_or(0);
                el.set_text_content(Some(&best.to_string()));
            }

            // Update FPS (hidden entirely when disabled in settings)
            if let Some(el) = document.get_element_by_id("hud-fps") {
                if self.settings.show_fps {
                    let _ = el.set_attribute("class", "hud-item");
                    if let Some(val) = document.query_selector("#hud-fps .hud-value").ok().flatten()
                    {
                        val.set_text_content(Some(&self.fps.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Start button only while idle
            if let Some(el) = document.get_element_by_id("start-btn") {
                if self.state.phase == GamePhase::Idle {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Show/hide game over panel
            if let Some(el) = document.get_element_by_id("game-over") {
                if self.state.phase == GamePhase::GameOver {
                    let _ = el.set_attribute("class", "");
                    if let Some(score_el) = document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&self.state.display_score().to_string()));
                    }
                    if let Some(best_el) = document.get_element_by_id("final-best") {
                        let best = self.highscores.top_score().unwrap_or(0);
                        best_el.set_text_content(Some(&best.to_string()));
                    }
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }

        /// Replace the session for a fresh run
        fn restart(&mut self, seed: u64) {
            self.state = GameState::new(seed);
            self.input = TickInput::default();
            self.score_recorded = false;
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Lane Dash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));
        log::info!("Game initialized with seed: {}", seed);

        // Apply presentation preferences to the page
        {
            let g = game.borrow();
            let mut classes: Vec<&str> = Vec::new();
            if g.settings.high_contrast {
                classes.push("high-contrast");
            }
            if g.settings.reduced_motion {
                classes.push("reduced-motion");
            }
            if let Some(body) = document.body() {
                let _ = body.set_attribute("class", &classes.join(" "));
            }
        }

        setup_input_handlers(game.clone());
        setup_start_button(game.clone());
        setup_restart_button(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Lane Dash running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut g = game.borrow_mut();
            match event.key().as_str() {
                "ArrowLeft" | "a" | "A" => g.input.move_left = true,
                "ArrowRight" | "d" | "D" => g.input.move_right = true,
                " " | "ArrowUp" | "w" | "W" => g.input.jump = true,
                "r" | "R" => g.input.reset = true,
                "f" | "F" => {
                    g.settings.show_fps = !g.settings.show_fps;
                    g.settings.save();
                }
                _ => {}
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_start_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {}", seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Variable frame delta; the tick clamps it
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                1.0 / 60.0
            };
            g.last_time = time;

            g.update(dt, time);
            g.present();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use lane_dash::sim::{GamePhase, GameState, TickInput, tick};

    env_logger::init();
    log::info!("Lane Dash (native) starting...");

    // Headless demo: one scripted session at a fixed frame rate, hopping
    // over anything that closes in on the player's lane
    let mut state = GameState::new(0xC0FFEE);
    let start = TickInput {
        start: true,
        ..Default::default()
    };
    tick(&mut state, &start, 0.0);

    let dt = 1.0 / 60.0;
    let mut frames = 0u32;
    while state.phase == GamePhase::Running && frames < 60 * 60 {
        let threat = state
            .obstacles
            .iter()
            .any(|o| o.pos.x == state.player.pos.x && o.pos.z > -6.0 && o.pos.z < 0.0);
        let input = TickInput {
            jump: threat,
            ..Default::default()
        };
        tick(&mut state, &input, dt);
        frames += 1;
    }

    println!(
        "demo run: {:.1}s survived, score {}",
        state.run_time,
        state.display_score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
