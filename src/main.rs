//! Retrocade entry point
//!
//! Handles platform-specific initialization and runs the cabinet loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_cabinet {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use retrocade::audio::AudioManager;
    use retrocade::bestscore;
    use retrocade::consts::*;
    use retrocade::games::{ActiveGame, GameKind};
    use retrocade::input::{Intent, map_key};
    use retrocade::renderer::canvas::CanvasPainter;
    use retrocade::renderer::scene::Frame;
    use retrocade::sim::{GameEvent, Phase};

    /// Cabinet instance holding all state
    struct Cabinet {
        game: ActiveGame,
        painter: CanvasPainter,
        audio: AudioManager,
        events: Vec<GameEvent>,
        frame: Frame,
        last_time: f64,
    }

    impl Cabinet {
        fn new(ctx: CanvasRenderingContext2d) -> Self {
            let seed = js_sys::Date::now() as u64;
            let kind = GameKind::Snake;
            Self {
                game: ActiveGame::new(kind, seed, bestscore::load(kind)),
                painter: CanvasPainter::new(ctx),
                audio: AudioManager::new(),
                events: Vec::new(),
                frame: Frame::new(),
                last_time: 0.0,
            }
        }

        /// Handle one intent; cabinet-level intents are consumed here,
        /// the rest go to the running game.
        fn handle_intent(&mut self, intent: Intent) {
            match intent {
                Intent::Pause => self.toggle_pause(),
                Intent::Restart => self.restart(),
                Intent::Mute => self.audio.toggle_muted(),
                Intent::Select(kind) => self.switch_game(kind),
                other => self.game.apply(other),
            }
        }

        fn toggle_pause(&mut self) {
            let session = self.game.session_mut();
            // Nothing to pause once the run is over
            if !matches!(session.phase, Phase::Over { .. }) {
                session.paused = !session.paused;
                log::info!("Paused: {}", session.paused);
            }
        }

        /// Fresh run of the current game; the best carries over even when
        /// storage reads back stale or empty
        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            let stored = bestscore::load(self.game.kind());
            self.game = self.game.restarted(seed, stored);
            self.events.clear();
            log::info!("Restarted {}", self.game.kind().title());
        }

        fn switch_game(&mut self, kind: GameKind) {
            let seed = js_sys::Date::now() as u64;
            self.game = ActiveGame::new(kind, seed, bestscore::load(kind));
            self.events.clear();
            log::info!("Switched to {} (seed {seed})", kind.title());
        }

        /// Advance the simulation one frame
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (((time - self.last_time) / 1000.0) as f32).min(MAX_FRAME_DT)
            } else {
                0.0
            };
            self.last_time = time;

            self.events.clear();
            self.game.tick(dt, &mut self.events);
            self.audio.handle_events(&self.events);

            if self.game.session_mut().take_best_dirty() {
                bestscore::save(self.game.kind(), self.game.session().best);
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            self.frame.cmds.clear();
            self.game.scene(&mut self.frame);
            self.painter.paint(&self.frame);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let window = web_sys::window().unwrap();
            let document = window.document().unwrap();

            let hud = self.game.hud();

            if let Some(el) = document.query_selector("#hud-game .hud-value").ok().flatten() {
                el.set_text_content(Some(hud.title));
            }
            if let Some(el) = document
                .query_selector("#hud-score .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-best .hud-value").ok().flatten() {
                el.set_text_content(Some(&hud.best.to_string()));
            }
            if let Some(el) = document
                .query_selector("#hud-lives .hud-value")
                .ok()
                .flatten()
            {
                el.set_text_content(Some(&hud.lives.to_string()));
            }

            if let Some(el) = document.get_element_by_id("hud-muted") {
                let class = if self.audio.muted() {
                    "hud-item"
                } else {
                    "hud-item hidden"
                };
                let _ = el.set_attribute("class", class);
            }

            // Status overlay (ready / paused / life lost / game over)
            if let Some(el) = document.get_element_by_id("overlay") {
                if hud.status.is_empty() {
                    let _ = el.set_attribute("class", "hidden");
                } else {
                    el.set_text_content(Some(hud.status));
                    let _ = el.set_attribute("class", "");
                }
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Retrocade starting...");

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

        // Fixed logical resolution; CSS handles any visual scaling
        canvas.set_width(CANVAS_W as u32);
        canvas.set_height(CANVAS_H as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let cabinet = Rc::new(RefCell::new(Cabinet::new(ctx)));
        let running = Rc::new(Cell::new(true));

        setup_input_handlers(&canvas, cabinet.clone());
        setup_menu_buttons(cabinet.clone());
        setup_auto_pause(cabinet.clone());
        setup_shutdown(running.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(cabinet, running);

        log::info!("Retrocade running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, cabinet: Rc<RefCell<Cabinet>>) {
        // Keyboard
        {
            let cabinet = cabinet.clone();
            let window = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                if let Some(intent) = map_key(&event.key()) {
                    // Keep arrows/space from scrolling the page
                    event.prevent_default();
                    let mut c = cabinet.borrow_mut();
                    // First gesture also unlocks the audio context
                    c.audio.resume();
                    c.handle_intent(intent);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer down on the canvas unlocks audio; only breakout also
        // treats it as the launch action (a stray click must never hard
        // drop a piece)
        {
            let cabinet = cabinet.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::PointerEvent| {
                let mut c = cabinet.borrow_mut();
                c.audio.resume();
                if c.game.kind() == GameKind::Breakout {
                    c.handle_intent(Intent::Primary);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(cabinet: Rc<RefCell<Cabinet>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        for kind in GameKind::ALL {
            let id = format!("btn-{}", kind.title().to_lowercase());
            if let Some(btn) = document.get_element_by_id(&id) {
                let cabinet = cabinet.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut c = cabinet.borrow_mut();
                    c.audio.resume();
                    c.handle_intent(Intent::Select(kind));
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("btn-mute") {
            let cabinet = cabinet.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cabinet.borrow_mut().handle_intent(Intent::Mute);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("btn-restart") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cabinet.borrow_mut().handle_intent(Intent::Restart);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Invalidate the frame loop when the page goes away; nothing may
    /// mutate cabinet state after this fires.
    fn setup_shutdown(running: Rc<Cell<bool>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            running.set(false);
            log::info!("Cabinet stopped");
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_auto_pause(cabinet: Rc<RefCell<Cabinet>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let cabinet = cabinet.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut c = cabinet.borrow_mut();
                    let session = c.game.session_mut();
                    if session.phase == Phase::Playing && !session.paused {
                        session.paused = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut c = cabinet.borrow_mut();
                let session = c.game.session_mut();
                if session.phase == Phase::Playing && !session.paused {
                    session.paused = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(cabinet: Rc<RefCell<Cabinet>>, running: Rc<Cell<bool>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            cabinet_loop(cabinet, running, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn cabinet_loop(cabinet: Rc<RefCell<Cabinet>>, running: Rc<Cell<bool>>, time: f64) {
        if !running.get() {
            return;
        }

        {
            let mut c = cabinet.borrow_mut();
            c.update(time);
            c.render();
            c.update_hud();
        }

        request_animation_frame(cabinet, running);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_cabinet::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use retrocade::games::{ActiveGame, GameKind};

    env_logger::init();
    log::info!("Retrocade (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    // Short scripted demo of each core as a smoke check
    for kind in GameKind::ALL {
        let mut game = ActiveGame::new(kind, 42, 0);
        game.apply(retrocade::Intent::Primary);
        game.apply(retrocade::Intent::Move(retrocade::sim::Dir::Right));

        let mut events = Vec::new();
        for _ in 0..600 {
            game.tick(1.0 / 60.0, &mut events);
        }

        log::info!(
            "{}: score {} after 10s, {} events",
            kind.title(),
            game.session().score,
            events.len()
        );
    }
}
