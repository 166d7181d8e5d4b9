//! Roll-a-Ball entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use roll_a_ball::audio::AudioManager;
    use roll_a_ball::consts::*;
    use roll_a_ball::hud;
    use roll_a_ball::renderer::RenderState;
    use roll_a_ball::sim::{GameEvent, GamePhase, GameState, LEVEL_COUNT, LEVELS, TickInput, tick};
    use roll_a_ball::{AudioService, BestTimes, Settings};

    /// Game instance holding all state
    struct Game {
        /// `None` while the level select menu is up
        state: Option<GameState>,
        render_state: Option<RenderState>,
        audio: AudioManager,
        records: BestTimes,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        /// Movement keys currently held
        held: HashSet<String>,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            audio.set_music_volume(settings.music_volume);
            audio.set_music_enabled(settings.music_enabled);
            Self {
                state: None,
                render_state: None,
                audio,
                records: BestTimes::load(),
                settings,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                held: HashSet::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        fn start_level(&mut self, id: u32) {
            let state = GameState::new(id);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.snap_camera(state.player.pos);
            }
            log::info!("Starting level {} \"{}\"", state.level_id(), state.layout.name);
            self.state = Some(state);
            self.accumulator = 0.0;
            self.input = TickInput {
                idle_mode: self.input.idle_mode,
                ..TickInput::default()
            };
            self.audio.resume();
            self.audio.start_music();
        }

        fn return_to_menu(&mut self) {
            self.audio.stop_music();
            self.state = None;
            refresh_level_list(self);
        }

        /// Directional input from held keys
        fn held_direction(&self) -> Vec2 {
            let down = |keys: &[&str]| keys.iter().any(|k| self.held.contains(*k));
            let mut dir = Vec2::ZERO;
            if down(&["a", "arrowleft"]) {
                dir.x -= 1.0;
            }
            if down(&["d", "arrowright"]) {
                dir.x += 1.0;
            }
            if down(&["w", "arrowup"]) {
                dir.y -= 1.0;
            }
            if down(&["s", "arrowdown"]) {
                dir.y += 1.0;
            }
            dir
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 && time > oldest_time {
                self.fps = (60000.0 / (time - oldest_time)).round() as u32;
            }

            let move_dir = self.held_direction();
            let Some(state) = self.state.as_mut() else {
                return;
            };

            let dt = dt.min(0.1);
            self.accumulator += dt;
            self.input.move_dir = move_dir;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                tick(state, &self.input, SIM_DT, &self.audio);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.pause = false;
                self.input.restart = false;
            }

            let level = state.level_id();
            let spawn = state.layout.spawn;
            let events = state.drain_events();
            for event in events {
                match event {
                    GameEvent::Collected { id, kind } => {
                        log::debug!("Collected pickup {} ({:?})", id, kind);
                    }
                    GameEvent::Won { time_taken } => {
                        log::info!("Level {} cleared in {:.2}s", level, time_taken);
                        if self.records.record(level, time_taken, js_sys::Date::now()) {
                            log::info!("New best time for level {}", level);
                            self.records.save();
                        }
                    }
                    GameEvent::Lost => log::info!("Level {} lost: time ran out", level),
                    GameEvent::Paused => self.audio.stop_music(),
                    GameEvent::Resumed => self.audio.start_music(),
                    GameEvent::Restarted => {
                        if let Some(render_state) = self.render_state.as_mut() {
                            render_state.snap_camera(spawn);
                        }
                        self.audio.start_music();
                    }
                    GameEvent::ReturnToMenu => {
                        self.return_to_menu();
                        return;
                    }
                }
            }
        }

        /// Render the current frame
        fn render(&mut self, time: f64) {
            let (Some(render_state), Some(state)) = (self.render_state.as_mut(), self.state.as_ref())
            else {
                return;
            };
            match render_state.render(state, (time / 1000.0) as f32) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            set_visible(document, "menu", self.state.is_none());
            set_visible(document, "hud", self.state.is_some());

            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            set_visible(document, "hud-fps", self.settings.show_fps);

            let Some(state) = self.state.as_ref() else {
                set_visible(document, "pause-menu", false);
                set_visible(document, "win-banner", false);
                set_visible(document, "lose-banner", false);
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-count") {
                el.set_text_content(Some(&hud::count_text(state.score(), state.total())));
            }
            if let Some(el) = document.get_element_by_id("hud-level") {
                el.set_text_content(Some(&format!("{}. {}", state.level_id(), state.layout.name)));
            }
            if let Some(el) = document.get_element_by_id("hud-seconds") {
                el.set_text_content(Some(&format!("Time: {}", hud::seconds_left(&state.timer))));
            }
            if let Some(el) = document.get_element_by_id("hud-timer") {
                el.set_text_content(Some(&hud::clock_text(&state.timer)));
                let urgency = hud::Urgency::from_remaining(state.timer.remaining);
                let _ = el.set_attribute("class", urgency.css_class());
            }
            if let Some(el) = document.get_element_by_id("hud-timer-bar") {
                let _ = el.set_attribute(
                    "style",
                    &format!("width: {:.1}%", hud::progress_percent(&state.timer)),
                );
            }

            set_visible(document, "pause-menu", state.phase == GamePhase::Paused);
            set_visible(document, "win-banner", state.phase == GamePhase::Won);
            set_visible(document, "lose-banner", state.phase == GamePhase::Lost);

            if state.phase == GamePhase::Won {
                if let Some(el) = document.get_element_by_id("win-time") {
                    el.set_text_content(Some(&format!("{:.2}s", state.timer.elapsed())));
                }
            }
        }
    }

    /// Show or hide by the `hidden` token only, keeping layout classes
    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", &hud::with_hidden(&el.class_name(), visible));
        }
    }

    fn document() -> Result<Document, JsValue> {
        web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    pub async fn run() -> Result<(), JsValue> {
        log::info!("Roll-a-Ball starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = document()?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;

        // Set canvas size
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let camera_smoothing = settings.camera_smoothing;
        let game = Rc::new(RefCell::new(Game::new(settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, camera_smoothing)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        setup_menu(&document, game.clone())?;
        setup_options(&document, game.clone());
        setup_pause_menu(&document, game.clone());
        setup_input_handlers(game.clone());
        setup_auto_pause(&document, game.clone());

        refresh_level_list(&game.borrow());

        // Start game loop
        request_animation_frame(game);

        log::info!("Roll-a-Ball running!");
        Ok(())
    }

    /// One button per table level, labelled with the best time when known
    fn setup_menu(document: &Document, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let Some(list) = document.get_element_by_id("level-list") else {
            log::warn!("No #level-list element, menu disabled");
            return Ok(());
        };

        for entry in LEVELS.iter() {
            let btn = document.create_element("button")?;
            btn.set_id(&format!("level-btn-{}", entry.id));
            btn.set_text_content(Some(&format!("{}. {}", entry.id, entry.name)));

            let game = game.clone();
            let id = entry.id;
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().start_level(id);
            });
            btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();

            list.append_child(&btn)?;
        }
        Ok(())
    }

    fn refresh_level_list(game: &Game) {
        let Ok(document) = document() else {
            return;
        };
        for entry in LEVELS.iter() {
            let Some(btn) = document.get_element_by_id(&format!("level-btn-{}", entry.id)) else {
                continue;
            };
            let label = match game.records.best(entry.id) {
                Some(best) if game.settings.show_best_times => {
                    format!("{}. {} ({:.1}s)", entry.id, entry.name, best)
                }
                _ => format!("{}. {}", entry.id, entry.name),
            };
            btn.set_text_content(Some(&label));
        }
        if let Some(el) = document.get_element_by_id("menu-progress") {
            el.set_text_content(Some(&hud::cleared_text(game.records.cleared(), LEVEL_COUNT)));
        }
    }

    fn music_label(enabled: bool) -> &'static str {
        if enabled { "Music: On" } else { "Music: Off" }
    }

    fn setup_options(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("music-btn") {
            btn.set_text_content(Some(music_label(game.borrow().settings.music_enabled)));
            let btn_clone = btn.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                let enabled = g.settings.toggle_music();
                g.settings.save();
                g.audio.set_music_enabled(enabled);
                if enabled && g.state.as_ref().is_some_and(|s| s.phase == GamePhase::Active) {
                    g.audio.start_music();
                }
                btn_clone.set_text_content(Some(music_label(enabled)));
                log::info!("Music {}", if enabled { "enabled" } else { "disabled" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_pause_menu(document: &Document, game: Rc<RefCell<Game>>) {
        // Resume button
        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.pause = true; // Toggle back to playing
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.restart = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("menu-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().return_to_menu();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key().to_lowercase();
                match key.as_str() {
                    "w" | "a" | "s" | "d" | "arrowup" | "arrowdown" | "arrowleft" | "arrowright" => {
                        event.prevent_default();
                        g.held.insert(key);
                    }
                    // Toggles ignore auto-repeat
                    _ if event.repeat() => {}
                    "escape" => g.input.pause = true,
                    "r" => g.input.restart = true,
                    "i" => {
                        g.input.idle_mode = !g.input.idle_mode;
                        log::info!("Idle mode: {}", g.input.idle_mode);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().held.remove(&event.key().to_lowercase());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(document: &Document, game: Rc<RefCell<Game>>) {
        let is_active = |g: &Game| g.state.as_ref().is_some_and(|s| s.phase == GamePhase::Active);

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.held.clear();
                    if is_active(&g) {
                        g.input.pause = true;
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
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.held.clear();
                if g.settings.pause_on_blur && is_active(&g) {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
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

            g.update(dt, time);
            g.render(time);
            if let Ok(document) = document() {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        return;
    }
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Roll-a-Ball (native) starting...");
    log::info!("Native mode runs the autopilot headless - use `trunk serve` for the web version");

    let level = match std::env::args().nth(1).map(|arg| arg.parse::<u32>()) {
        None => None,
        Some(Ok(id)) => Some(id),
        Some(Err(e)) => {
            log::error!("Level must be a number: {}", e);
            std::process::exit(2);
        }
    };

    let ids: Vec<u32> = match level {
        Some(id) => vec![id],
        None => roll_a_ball::sim::LEVELS.iter().map(|e| e.id).collect(),
    };

    let mut cleared = 0;
    for id in &ids {
        if headless::run_level(*id) {
            cleared += 1;
        }
    }
    log::info!("Autopilot cleared {} of {} levels", cleared, ids.len());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use roll_a_ball::SilentAudio;
    use roll_a_ball::consts::SIM_DT;
    use roll_a_ball::sim::{GameEvent, GameState, TickInput, tick};

    /// Play one level with the autopilot until the menu return fires.
    /// Returns whether it was won.
    pub fn run_level(id: u32) -> bool {
        let mut state = GameState::new(id);
        let input = TickInput {
            idle_mode: true,
            ..TickInput::default()
        };
        let audio = SilentAudio;

        let mut won = false;
        // Level time plus the longest menu delay, with slack
        let max_ticks = ((state.layout.time_limit + 10.0) / SIM_DT) as u64;
        for _ in 0..max_ticks {
            tick(&mut state, &input, SIM_DT, &audio);
            for event in state.drain_events() {
                match event {
                    GameEvent::Won { time_taken } => {
                        log::info!(
                            "Level {} \"{}\": won in {:.2}s",
                            state.level_id(),
                            state.layout.name,
                            time_taken
                        );
                        won = true;
                    }
                    GameEvent::Lost => {
                        log::info!(
                            "Level {} \"{}\": lost with {}/{} pickups",
                            state.level_id(),
                            state.layout.name,
                            state.score(),
                            state.total()
                        );
                    }
                    GameEvent::ReturnToMenu => return won,
                    _ => {}
                }
            }
        }
        log::warn!("Level {} did not finish within the tick budget", id);
        won
    }
}
