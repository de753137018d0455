//! Block Breaker entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, PointerEvent, TouchEvent};

    use block_breaker::consts::SIM_DT;
    use block_breaker::sim::{EntityKind, Shape, TickInput};
    use block_breaker::storage::{KeyValueStore, LocalStore, MemoryStore, StorageError};
    use block_breaker::{App, Settings};

    /// LocalStorage when the browser allows it, memory otherwise (private mode)
    enum BrowserStore {
        Local(LocalStore),
        Memory(MemoryStore),
    }

    impl BrowserStore {
        fn open() -> Self {
            match LocalStore::open() {
                Ok(store) => BrowserStore::Local(store),
                Err(e) => {
                    log::warn!("{}; best score will not survive a reload", e);
                    BrowserStore::Memory(MemoryStore::new())
                }
            }
        }
    }

    impl KeyValueStore for BrowserStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            match self {
                BrowserStore::Local(s) => s.get(key),
                BrowserStore::Memory(s) => s.get(key),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            match self {
                BrowserStore::Local(s) => s.set(key, value),
                BrowserStore::Memory(s) => s.set(key, value),
            }
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            match self {
                BrowserStore::Local(s) => s.remove(key),
                BrowserStore::Memory(s) => s.remove(key),
            }
        }
    }

    /// Game instance holding all state
    struct Game {
        app: App<BrowserStore>,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        input: TickInput,
        last_time: f64,
        /// Last HUD overlay written to the DOM
        last_overlay: Option<block_breaker::Overlay>,
    }

    impl Game {
        /// Convert a client-space x to scene x
        fn to_scene_x(&self, client_x: f32) -> f32 {
            let rect = self.canvas.get_bounding_client_rect();
            let width = rect.width().max(1.0) as f32;
            (client_x - rect.left() as f32) * self.app.settings().arena_width / width
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32) {
            self.app.frame(dt, &self.input);
        }

        /// Draw the arena (scene is y-up, canvas is y-down)
        fn render(&self) {
            let arena = self.app.scene().world().arena();
            let height = arena.height as f64;

            self.ctx.set_fill_style_str("#000000");
            self.ctx.fill_rect(0.0, 0.0, arena.width as f64, height);

            for entity in self.app.scene().world().entities() {
                let x = entity.pos.x as f64;
                let y = height - entity.pos.y as f64;
                match (entity.kind, entity.shape) {
                    (EntityKind::Floor, _) => {}
                    (EntityKind::Brick { color }, Shape::Rect { half_extents }) => {
                        self.ctx.set_fill_style_str(color.hex());
                        fill_centered_rect(&self.ctx, x, y, half_extents.x as f64, half_extents.y as f64);
                    }
                    (_, Shape::Rect { half_extents }) => {
                        self.ctx.set_fill_style_str("#ffffff");
                        fill_centered_rect(&self.ctx, x, y, half_extents.x as f64, half_extents.y as f64);
                    }
                    (_, Shape::Circle { radius }) => {
                        self.ctx.set_fill_style_str("#ffffff");
                        self.ctx.begin_path();
                        let _ = self.ctx.arc(x, y, radius as f64, 0.0, std::f64::consts::TAU);
                        self.ctx.fill();
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let overlay = self.app.overlay();
            if self.last_overlay.as_ref() == Some(&overlay) {
                return;
            }

            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&overlay.level_line));
            }
            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&overlay.score_line));
            }

            if let Some(el) = document.get_element_by_id("game-over") {
                match &overlay.game_over {
                    Some(game_over) => {
                        let _ = el.set_attribute("class", "");
                        if let Some(banner) = document.get_element_by_id("game-over-banner") {
                            banner.set_text_content(Some(&game_over.banner));
                        }
                        if let Some(high) = document.get_element_by_id("new-high-score") {
                            match &game_over.new_high_score {
                                Some(text) => {
                                    high.set_text_content(Some(text));
                                    let _ = high.set_attribute("class", "");
                                }
                                None => {
                                    let _ = high.set_attribute("class", "hidden");
                                }
                            }
                        }
                        if let Some(prompt) = document.get_element_by_id("play-again") {
                            prompt.set_text_content(Some(&game_over.prompt));
                        }
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }

            self.last_overlay = Some(overlay);
        }
    }

    fn fill_centered_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, hx: f64, hy: f64) {
        ctx.fill_rect(x - hx, y - hy, hx * 2.0, hy * 2.0);
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Block Breaker starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Arena matches the viewport, in CSS pixels
        let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(390.0) as f32;
        let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(844.0) as f32;
        let settings = Settings::for_screen(width, height).validated();
        canvas.set_width(settings.arena_width as u32);
        canvas.set_height(settings.arena_height as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let app = App::with_settings(BrowserStore::open(), settings);
        log::info!("Best score: {}", app.best_score());

        let game = Rc::new(RefCell::new(Game {
            app,
            canvas: canvas.clone(),
            ctx,
            input: TickInput::default(),
            last_time: 0.0,
            last_overlay: None,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_play_again(game.clone());
        request_animation_frame(game);

        log::info!("Block Breaker running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse / pen drag
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut g = game.borrow_mut();
                let x = g.to_scene_x(event.client_x() as f32);
                g.input.touch_x = Some(x);
            });
            let _ = canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch drag
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let x = g.to_scene_x(touch.client_x() as f32);
                    g.input.touch_x = Some(x);
                }
            });
            let _ = canvas.add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_play_again(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("play-again") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                if g.app.play_again() {
                    g.input = TickInput::default();
                    log::info!("Game restarted (best score {})", g.app.best_score());
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
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
mod native {
    use block_breaker::App;
    use block_breaker::consts::PADDLE_WIDTH;
    use block_breaker::sim::TickInput;
    use block_breaker::storage::KeyValueStore;

    /// Frame length for the headless run
    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Log the overlay this often (frames)
    const REPORT_EVERY: u64 = 600;

    /// Play one game with a paddle that chases the ball, drifting off centre
    /// over time so the run eventually ends
    pub fn run_autopilot<S: KeyValueStore>(app: &mut App<S>, max_frames: u64) {
        let mut input = TickInput::default();

        for frame in 0..max_frames {
            if let Some(ball_x) = app
                .scene()
                .ball()
                .and_then(|id| app.scene().world().get(id))
                .map(|ball| ball.pos.x)
            {
                let drift = (frame as f32 * 0.004).sin() * PADDLE_WIDTH * 0.6;
                input.touch_x = Some(ball_x + drift);
            }

            app.frame(FRAME_DT, &input);

            if frame % REPORT_EVERY == 0 {
                let overlay = app.overlay();
                log::info!("[frame {}] {} | {}", frame, overlay.level_line, overlay.score_line);
            }

            if app.is_game_over() {
                let overlay = app.overlay();
                if let Some(game_over) = &overlay.game_over {
                    log::info!("{} - {}", game_over.banner, overlay.score_line);
                    if let Some(high) = &game_over.new_high_score {
                        log::info!("{}", high);
                    }
                }
                app.play_again();
                log::info!("Best score is now {}", app.best_score());
                return;
            }
        }

        log::info!(
            "Stopped after {} frames: level {}, score {}",
            max_frames,
            app.level(),
            app.score()
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use block_breaker::App;
    use block_breaker::storage::FileStore;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Block Breaker (native) starting...");
    log::info!("Native mode runs a headless autopilot - serve the wasm build for the playable version");

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "block_breaker.json".to_string());
    let store = match FileStore::open(&path) {
        Ok(store) => store,
        Err(e) => {
            log::error!("Cannot open {}: {}", path, e);
            std::process::exit(1);
        }
    };

    let mut app = App::new(store);
    log::info!("Best score so far: {}", app.best_score());

    // Ten minutes of game time at most
    native::run_autopilot(&mut app, 60 * 60 * 10);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
