//! Capybara Evasion entry point
//!
//! In the browser this sets up the canvas, WebGPU, the DOM HUD and input, then
//! runs the frame loop. Natively it runs headless rounds driven by the
//! autopilot and appends them to the score file.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use capybara_evasion::audio::AudioManager;
    use capybara_evasion::platform::FrameTimer;
    use capybara_evasion::renderer::{RenderState, Viewport, scene};
    use capybara_evasion::score_log::LocalStorageStore;
    use capybara_evasion::sim::{TickInput, Variant};
    use capybara_evasion::{FrameOutcome, GameContext, MusicPlayer, Settings};

    /// Game instance holding all state
    struct Game {
        ctx: GameContext<LocalStorageStore, AudioManager>,
        render_state: Option<RenderState>,
        timer: FrameTimer,
        /// Latched input; one-shot flags are cleared after the frame that used them
        input: TickInput,
        /// Canvas size in CSS pixels, for pointer mapping
        css_viewport: Viewport,
        /// Frame loop stopped (quit or fatal error)
        halted: bool,
    }

    impl Game {
        fn set_pointer(&mut self, css: Vec2) {
            self.input.pointer = Some(self.css_viewport.pointer_to_field(css));
        }

        /// Run the frames due at rAF time `time_ms`
        fn update(&mut self, time_ms: f64) {
            let frames = self.timer.advance_to(time_ms / 1000.0);
            for _ in 0..frames {
                self.input.now = self.timer.step();
                match self.ctx.frame(&self.input) {
                    Ok(FrameOutcome::Continue) => {}
                    Ok(FrameOutcome::Quit) => {
                        self.quit();
                        return;
                    }
                    Err(e) => {
                        fatal(&format!("Could not save score: {e}"));
                        self.halted = true;
                        return;
                    }
                }
                self.input.restart = false;
                self.input.quit = false;
                self.input.toggle_mute = false;
            }
            self.ctx.music_mut().update();
        }

        fn quit(&mut self) {
            log::info!("Leaving after {} frames", self.timer.frame_count);
            self.halted = true;
            self.ctx.music_mut().pause();

            let Some(window) = web_sys::window() else {
                return;
            };
            if let Some(document) = window.document() {
                set_text(&document, "game-over-title", "Thanks for playing!");
                set_text(&document, "game-over-prompt", "");
            }
            // Only closes tabs opened by script; otherwise the page just stays halted
            let _ = window.close();
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = scene::build(self.ctx.round(), self.input.idle_mode);
            match render_state.render(&vertices) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let (w, h) = render_state.size;
                    render_state.resize(w, h);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let hud = self.ctx.hud();
            set_text(document, "hud-score", &hud.score_text);
            set_text(document, "mute-label", &hud.mute_label);

            if let Some(el) = document.get_element_by_id("game-over") {
                match &hud.game_over {
                    Some(panel) => {
                        let _ = el.set_attribute("class", "");
                        set_text(document, "game-over-title", &panel.title);
                        set_text(document, "game-over-prompt", &panel.prompt);
                        set_text(document, "score-history", &panel.history.join("\n"));
                    }
                    None => {
                        let _ = el.set_attribute("class", "hidden");
                    }
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    /// Log an unrecoverable error and show it on the page
    pub fn fatal(message: &str) {
        log::error!("{message}");
        if let Some(document) = web_sys::window().and_then(|w| w.document()) {
            if let Some(el) = document.get_element_by_id("fatal-error") {
                el.set_text_content(Some(message));
                let _ = el.set_attribute("class", "");
            }
        }
    }

    fn physical_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn css_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        Viewport::new(canvas.client_width() as f32, canvas.client_height() as f32)
    }

    pub async fn run() -> Result<(), JsValue> {
        log::info!("Capybara Evasion starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = physical_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        let settings = Settings::load();
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let timer = FrameTimer::new();

        let music = AudioManager::new(settings.effective_music_volume());
        log::info!("Music volume {:.2}", music.volume());
        let ctx = GameContext::new(
            Variant::default(),
            LocalStorageStore::default(),
            music,
            seed,
            timer.now(),
        )
        .map_err(|e| JsValue::from_str(&format!("Could not open score log: {e}")))?;

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

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;

        let game = Rc::new(RefCell::new(Game {
            ctx,
            render_state: Some(render_state),
            timer,
            input: TickInput::default(),
            css_viewport: css_viewport(&canvas),
            halted: false,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas.clone(), game.clone());
        setup_page_lifecycle(game.clone(), settings.mute_on_blur);

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(game);

        log::info!("Capybara Evasion running (seed {seed})");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move - position relative to the canvas
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut()
                    .set_pointer(Vec2::new(event.offset_x() as f32, event.offset_y() as f32));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse down - browsers only start audio after a gesture
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow().ctx.music().unlock();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start/move
        for name in ["touchstart", "touchmove"] {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut g = game.borrow_mut();
                g.ctx.music().unlock();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f32 - rect.left() as f32;
                    let y = touch.client_y() as f32 - rect.top() as f32;
                    g.set_pointer(Vec2::new(x, y));
                }
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                g.ctx.music().unlock();
                match event.key().as_str() {
                    "r" | "R" => g.input.restart = true,
                    "q" | "Q" => g.input.quit = true,
                    "m" | "M" => g.input.toggle_mute = true,
                    "i" | "I" => {
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
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = physical_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);

            let mut g = game.borrow_mut();
            g.css_viewport = css_viewport(&canvas);
            if let Some(render_state) = g.render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_page_lifecycle(game: Rc<RefCell<Game>>, mute_on_blur: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Tab hidden/shown - silence the music without touching the mute toggle
        if mute_on_blur {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.ctx.music_mut().pause();
                    log::info!("Music paused (tab hidden)");
                } else if !g.ctx.round().muted && !g.halted {
                    g.ctx.music_mut().resume();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Page going away - the window close request
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.halted {
                    return;
                }
                let input = TickInput {
                    now: g.timer.now(),
                    close: true,
                    ..Default::default()
                };
                if let Ok(FrameOutcome::Quit) = g.ctx.frame(&input) {
                    g.halted = true;
                }
            });
            let _ =
                window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
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
            if g.halted {
                return;
            }

            g.update(time);
            if g.halted {
                return;
            }
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
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
    let _ = console_log::init_with_level(log::Level::Info);

    if let Err(e) = wasm_game::run().await {
        wasm_game::fatal(&format!("Startup failed: {e:?}"));
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use anyhow::{Context, Result, anyhow};
    use clap::Parser;

    use capybara_evasion::platform::FrameTimer;
    use capybara_evasion::score_log::FileStore;
    use capybara_evasion::sim::{TickInput, Variant};
    use capybara_evasion::{FrameOutcome, GameContext, Settings, SilentMusic};

    #[derive(Parser, Debug)]
    #[command(name = "capybara-evasion")]
    #[command(about = "Headless Capybara Evasion rounds played by the autopilot")]
    struct Cli {
        /// RNG seed (defaults to settings, then the clock)
        #[arg(long)]
        seed: Option<u64>,
        /// Stop after this many frames in total (60 per second)
        #[arg(long, default_value_t = 36_000)]
        max_frames: u64,
        /// Number of rounds to play before quitting
        #[arg(long, default_value_t = 1)]
        rounds: u32,
        /// Game variant: classic (ms scores) or continuous (second scores)
        #[arg(long, default_value = "classic", value_parser = parse_variant)]
        variant: Variant,
        /// Score log file (defaults to the settings' path)
        #[arg(long)]
        scores: Option<PathBuf>,
        /// Settings file (defaults to settings.json)
        #[arg(long)]
        settings: Option<PathBuf>,
    }

    fn parse_variant(s: &str) -> Result<Variant, String> {
        Variant::from_str(s).ok_or_else(|| format!("unknown variant '{s}' (classic, continuous)"))
    }

    fn clock_seed() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    }

    pub fn run() -> Result<()> {
        env_logger::init();
        let cli = Cli::parse();
        if cli.max_frames == 0 {
            return Err(anyhow!("--max-frames must be > 0"));
        }
        if cli.rounds == 0 {
            return Err(anyhow!("--rounds must be > 0"));
        }

        let settings = match &cli.settings {
            Some(path) => Settings::load_from(path),
            None => Settings::load(),
        };
        let seed = cli.seed.or(settings.seed).unwrap_or_else(clock_seed);
        let path = cli
            .scores
            .unwrap_or_else(|| PathBuf::from(&settings.score_log_path));
        let variant = cli.variant;

        let mut timer = FrameTimer::new();
        let mut ctx = GameContext::new(
            variant,
            FileStore::new(&path),
            SilentMusic::default(),
            seed,
            timer.now(),
        )
        .with_context(|| format!("opening score log {}", path.display()))?;

        let mut finished = 0;
        while timer.frame_count < cli.max_frames {
            let now = timer.step();
            let mut input = TickInput {
                now,
                idle_mode: true,
                ..Default::default()
            };
            if ctx.round().is_over() {
                if finished >= cli.rounds {
                    input.quit = true;
                } else {
                    input.restart = true;
                }
            }

            let outcome = ctx
                .frame(&input)
                .with_context(|| format!("recording score in {}", path.display()))?;
            if outcome == FrameOutcome::Quit {
                break;
            }
            // A loss is visible for exactly one frame before restart/quit
            if ctx.round().is_over() {
                finished += 1;
                println!("Round {finished}: {}", ctx.hud().score_text);
            }
        }

        if !ctx.round().is_over() {
            println!(
                "Stopped at the {}-frame limit with {} mid-round",
                cli.max_frames,
                ctx.hud().score_text
            );
        }

        println!(
            "{} variant, seed {}, {} frames",
            variant.as_str(),
            seed,
            timer.frame_count
        );
        println!("Recent rounds ({}):", path.display());
        for line in ctx.history() {
            println!("  {line}");
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> anyhow::Result<()> {
    headless::run()
}
