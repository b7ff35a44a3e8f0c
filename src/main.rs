//! Grade Catch entry point
//!
//! In the browser this wires the page (canvases, keyboard, touch, session
//! storage, audio) to one engine per player and drives them from
//! `requestAnimationFrame`. Natively it runs a headless self-playing soak.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, TouchEvent};

    use grade_catch::audio::AudioManager;
    use grade_catch::engine::resolve_player_names;
    use grade_catch::persistence::SessionData;
    use grade_catch::platform::now_ms;
    use grade_catch::renderer::CanvasPainter;
    use grade_catch::sim::SoundCue;
    use grade_catch::{Engine, GameOptions, Host, PlayerSlot, ResultsRoute, SessionContext};

    /// Browser collaborators shared by every player on the page
    struct WebHost {
        audio: AudioManager,
        data: SessionData,
        results_url: String,
    }

    impl Host for WebHost {
        fn play_cue(&mut self, cue: SoundCue) {
            self.audio.play(cue);
        }

        fn navigate_to_results(&mut self, route: &ResultsRoute) {
            let url = format!("{}?{}", self.results_url, route.query_string());
            let location = web_sys::window().map(|w| w.location());
            if let Some(Err(e)) = location.map(|l| l.set_href(&url)) {
                log::error!("Navigation to {} failed: {:?}", url, e);
            }
        }

        fn prompt_for_name(&mut self, slot: PlayerSlot) -> Option<String> {
            web_sys::window()?
                .prompt_with_message(&format!("Name for player {}?", slot.number()))
                .ok()
                .flatten()
        }

        fn session_data(&mut self) -> &mut SessionData {
            &mut self.data
        }

        fn timestamp(&self) -> f64 {
            js_sys::Date::now()
        }
    }

    struct PlayerView {
        engine: Engine,
        painter: CanvasPainter,
        canvas: HtmlCanvasElement,
    }

    /// Everything living on the page
    struct App {
        session: SessionContext,
        players: Vec<PlayerView>,
        host: WebHost,
    }

    impl App {
        fn frame(&mut self, now: f64) {
            for player in &mut self.players {
                player
                    .engine
                    .frame(now, &self.session, &mut player.painter, &mut self.host);
            }
        }

        fn start(&mut self, now: f64) {
            self.host.audio.resume();
            for player in &mut self.players {
                player.engine.start(now);
            }
        }

        /// New runs for everyone once every run has ended
        fn restart(&mut self, now: f64) {
            if !self.players.iter().all(|p| p.engine.state().is_game_over()) {
                return;
            }
            if self.session.is_two_player() {
                self.host.data.release_handshake();
            }
            for player in &mut self.players {
                player.engine.restart(now);
            }
        }

        fn concede(&mut self, now: f64) {
            for player in &mut self.players {
                player.engine.concede(now, &mut self.host);
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Grade Catch starting...");

        let options = GameOptions::load();
        let registry = Rc::new(options.registry());
        let seed = options.seed.unwrap_or_else(|| js_sys::Date::now() as u64);

        let mut host = WebHost {
            audio: AudioManager::new(&options),
            data: SessionData::for_platform(),
            results_url: options.results_url.clone(),
        };
        let mut session = SessionContext::new(options.mode);
        resolve_player_names(&mut session, &options, &mut host);
        if session.is_two_player() {
            // A handshake left behind by an abandoned page must not pair with this one
            host.data.release_handshake();
        }

        let doc = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let mut players = Vec::new();
        for &slot in session.mode.slots() {
            let player_options = options.player(slot);
            let canvas: HtmlCanvasElement = doc
                .get_element_by_id(&player_options.canvas_id)
                .ok_or_else(|| JsValue::from_str(&format!("no canvas #{}", player_options.canvas_id)))?
                .dyn_into()?;
            let painter = CanvasPainter::new(&player_options.canvas_id, &options, &registry)?;
            let player_seed = seed.wrapping_add(u64::from(slot.number()) << 32);
            players.push(PlayerView {
                engine: Engine::new(slot, &options, registry.clone(), player_seed),
                painter,
                canvas,
            });
        }

        log::info!(
            "{} player(s) ready with seed {}",
            session.mode.player_count(),
            seed
        );

        let app = Rc::new(RefCell::new(App {
            session,
            players,
            host,
        }));

        setup_keyboard(app.clone());
        setup_touch(app.clone());
        request_animation_frame(app);

        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let now = now_ms();
                let code = event.code();
                match code.as_str() {
                    "Space" | "Enter" => a.start(now),
                    "KeyR" => a.restart(now),
                    "Escape" => a.concede(now),
                    _ => {}
                }
                let mut bound = false;
                for player in &mut a.players {
                    bound |= player.engine.press_key(&code);
                }
                if bound || code == "Space" {
                    event.prevent_default();
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let code = event.code();
                for player in &mut a.players {
                    player.engine.release_key(&code);
                }
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Positions of the touches that started on this canvas, in canvas
    /// coordinates
    fn touch_xs(event: &TouchEvent, canvas: &HtmlCanvasElement) -> Vec<f32> {
        let rect = canvas.get_bounding_client_rect();
        let scale = if rect.width() > 0.0 {
            canvas.width() as f64 / rect.width()
        } else {
            1.0
        };
        let touches = event.target_touches();
        (0..touches.length())
            .filter_map(|i| touches.get(i))
            .map(|t| ((t.client_x() as f64 - rect.left()) * scale) as f32)
            .collect()
    }

    fn setup_touch(app: Rc<RefCell<App>>) {
        let count = app.borrow().players.len();
        for index in 0..count {
            let canvas = app.borrow().players[index].canvas.clone();

            // Start, move and end all recompute intents from the remaining touches
            for kind in ["touchstart", "touchmove", "touchend"] {
                let app = app.clone();
                let target = canvas.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    let xs = touch_xs(&event, &target);
                    let mut a = app.borrow_mut();
                    if event.type_() == "touchstart" {
                        a.start(now_ms());
                    }
                    if let Some(player) = a.players.get_mut(index) {
                        player.engine.touch(&xs);
                    }
                });
                let _ = canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
                closure.forget();
            }

            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                    if let Some(player) = app.borrow_mut().players.get_mut(index) {
                        player.engine.cancel_touch();
                    }
                });
                let _ = canvas.add_event_listener_with_callback("touchcancel", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Grade Catch (native) starting...");
    log::info!("The game itself runs in the browser; running a headless soak instead");

    headless::soak(std::env::args().nth(1).and_then(|s| s.parse().ok()).unwrap_or(42));
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Self-playing run with no page attached
#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::rc::Rc;

    use grade_catch::persistence::SessionData;
    use grade_catch::renderer::NullPainter;
    use grade_catch::sim::SoundCue;
    use grade_catch::{Engine, GameOptions, Host, PlayerMode, PlayerSlot, ResultsRoute, SessionContext};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    #[derive(Default)]
    struct HeadlessHost {
        data: SessionData,
        cues: u32,
        route: Option<ResultsRoute>,
    }

    impl Host for HeadlessHost {
        fn play_cue(&mut self, cue: SoundCue) {
            self.cues += 1;
            log::trace!("cue {:?}", cue);
        }

        fn navigate_to_results(&mut self, route: &ResultsRoute) {
            self.route = Some(route.clone());
        }

        fn prompt_for_name(&mut self, _slot: PlayerSlot) -> Option<String> {
            None
        }

        fn session_data(&mut self) -> &mut SessionData {
            &mut self.data
        }
    }

    /// Chase the lowest note worth points, dodge the rest
    fn autopilot(engine: &mut Engine) {
        let state = engine.state();
        let registry = engine.registry();
        let center = state.paddle.rect.pos.x + state.paddle.rect.size.x / 2.0;
        let target = state
            .notes
            .iter()
            .filter(|n| registry.get(n.type_index).is_some_and(|t| t.catch_effect.life_delta >= 0.0))
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
            .map(|n| n.pos.x + n.size.x / 2.0);

        let (left, right) = match target {
            Some(x) if x < center - 4.0 => (true, false),
            Some(x) if x > center + 4.0 => (false, true),
            _ => (false, false),
        };
        for (code, held) in [("ArrowLeft", left), ("ArrowRight", right)] {
            if held {
                engine.press_key(code);
            } else {
                engine.release_key(code);
            }
        }
    }

    pub fn soak(seed: u64) {
        let options = GameOptions::default();
        let registry = Rc::new(options.registry());
        let session = SessionContext::new(PlayerMode::Single);
        let mut engine = Engine::new(PlayerSlot::One, &options, registry, seed);
        let mut host = HeadlessHost::default();
        let mut painter = NullPainter;

        engine.start(0.0);
        let mut frames = 0;
        while host.route.is_none() && frames < MAX_FRAMES {
            let now = frames as f64 * FRAME_MS;
            autopilot(&mut engine);
            engine.frame(now, &session, &mut painter, &mut host);
            frames += 1;
        }

        let state = engine.state();
        log::info!(
            "Seed {}: {} frames, score {}, lives {}, difficulty {}, {} cues",
            seed,
            frames,
            state.score,
            state.lives,
            state.difficulty,
            host.cues
        );
        match host.route {
            Some(route) => log::info!("Results: {}", route.query_string()),
            None => log::info!("Still alive after {} frames", frames),
        }
    }
}
