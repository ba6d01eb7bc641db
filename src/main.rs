//! QA Bug Hunt entry point
//!
//! On the web this wires the DOM to the engine and runs the frame loop.
//! Natively it plays a headless autoplay round and logs the result.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, KeyboardEvent, PointerEvent};

    use qa_bug_hunt::platform::web::browser_capabilities;
    use qa_bug_hunt::sim::{BugId, GamePhase, PointerInput, PointerKind, PointerTarget};
    use qa_bug_hunt::{Game, MotionPreference};

    /// Engine plus the little bit of DOM bookkeeping the host needs
    struct Host {
        game: Game,
        last_time: f64,
        /// Bug elements currently in the arena
        rendered: Vec<BugId>,
    }

    impl Host {
        fn new(seed: u64) -> Self {
            Self {
                game: Game::new(seed, browser_capabilities()),
                last_time: 0.0,
                rendered: Vec::new(),
            }
        }

        /// Mirror engine state into the arena and HUD
        fn sync(&mut self, document: &Document) {
            self.sync_bugs(document);
            self.sync_hud(document);
        }

        fn sync_bugs(&mut self, document: &Document) {
            let Some(arena) = document.get_element_by_id("arena") else {
                return;
            };
            let _ = arena
                .class_list()
                .toggle_with_force("shake", self.game.arena_shaking());

            let session = self.game.session();
            let mobile_like = session.mobile_like;
            let live: Vec<BugId> = session.live_bugs().map(|b| b.id).collect();

            for id in self.rendered.iter().filter(|id| !live.contains(id)) {
                if let Some(el) = document.get_element_by_id(&id.to_string()) {
                    el.remove();
                }
            }

            for bug in session.live_bugs() {
                let dom_id = bug.id.to_string();
                let el = match document.get_element_by_id(&dom_id) {
                    Some(el) => el,
                    None => match create_bug_element(document, &arena, bug.id, bug.variant().tag) {
                        Some(el) => el,
                        None => continue,
                    },
                };
                if let Ok(el) = el.dyn_into::<HtmlElement>() {
                    let size = bug.hit_size(mobile_like);
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{:.2}%", bug.pos.x));
                    let _ = style.set_property("top", &format!("{:.2}%", bug.pos.y));
                    let _ = style.set_property("width", &format!("{}px", size));
                    let _ = style.set_property("height", &format!("{}px", size));
                }
            }
            self.rendered = live;
        }

        fn sync_hud(&self, document: &Document) {
            let game = &self.game;
            let session = game.session();

            set_text(document, "hud-score", &session.score.to_string());
            set_text(document, "hud-time", &format!("{:.1}s", session.time_left));
            set_text(document, "hud-combo", &format!("x{}", session.combo));
            set_text(document, "hud-wave", &session.wave.to_string());
            set_text(document, "hud-best", &game.best_score().to_string());
            set_text(document, "flash", game.flash_message().unwrap_or(""));

            if let Some(bar) = document
                .get_element_by_id("hud-progress")
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = bar
                    .style()
                    .set_property("width", &format!("{:.1}%", game.progress_percent()));
            }

            let phase = match session.phase {
                GamePhase::Idle => "idle",
                GamePhase::Running => "running",
                GamePhase::Finished => "finished",
            };
            if let Some(root) = document.get_element_by_id("bug-hunt") {
                let _ = root.set_attribute("data-phase", phase);
            }

            if session.phase == GamePhase::Finished {
                set_text(document, "result-score", &session.score.to_string());
                set_text(document, "result-accuracy", &format!("{}%", game.accuracy()));
                set_text(document, "result-wave", &session.wave.to_string());
                set_text(document, "result-label", &game.result_label());
            }

            let prefs = game.preferences();
            set_text(
                document,
                "sound-toggle",
                if prefs.sound_enabled { "Sound on" } else { "Sound off" },
            );
            set_text(
                document,
                "haptics-toggle",
                if prefs.haptics_enabled { "Haptics on" } else { "Haptics off" },
            );
            if let Some(el) = document.get_element_by_id("haptics-toggle") {
                let _ = el
                    .class_list()
                    .toggle_with_force("hidden", !game.haptics_available());
            }
            set_text(document, "motion-toggle", &format!("Motion {}", prefs.motion.as_str()));
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn create_bug_element(
        document: &Document,
        arena: &Element,
        id: BugId,
        tag: &str,
    ) -> Option<Element> {
        let el = document.create_element("button").ok()?;
        el.set_id(&id.to_string());
        el.set_class_name(&format!("bug bug-{}", tag));
        let _ = el.set_attribute("type", "button");
        let _ = el.set_attribute("data-bug-id", &id.0.to_string());
        let _ = el.set_attribute("aria-label", "Squash bug");
        arena.append_child(&el).ok()?;
        Some(el)
    }

    /// Bug id carried by an event target (or its bug ancestor)
    fn bug_id_of(target: Option<web_sys::EventTarget>) -> Option<BugId> {
        let element = target?.dyn_into::<Element>().ok()?;
        let bug = element.closest("[data-bug-id]").ok().flatten()?;
        bug.get_attribute("data-bug-id")?.parse::<u32>().ok().map(BugId)
    }

    /// Classify where a pointer-down landed
    fn pointer_target(event: &PointerEvent, arena: &Element) -> PointerTarget {
        let Some(target) = event
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
        else {
            return PointerTarget::Outside;
        };
        if let Some(id) = bug_id_of(event.target()) {
            return PointerTarget::Bug(id);
        }
        if &target == arena {
            PointerTarget::Arena
        } else {
            PointerTarget::Outside
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&format!("Logger init failed: {}", e).into());
        }

        log::info!("QA Bug Hunt starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - nothing to attach to");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let host = Rc::new(RefCell::new(Host::new(seed)));
        log::info!("Engine initialized with seed: {}", seed);

        setup_pointer(&document, host.clone());
        setup_keyboard(host.clone());
        setup_buttons(&document, host.clone());

        host.borrow_mut().sync(&document);
        request_animation_frame(host);
    }

    fn setup_pointer(document: &Document, host: Rc<RefCell<Host>>) {
        let Some(arena) = document.get_element_by_id("arena") else {
            log::warn!("No #arena element - pointer input disabled");
            return;
        };
        let arena_clone = arena.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
            let input = PointerInput {
                kind: PointerKind::from_dom(&event.pointer_type()),
                is_primary: event.is_primary(),
                button: event.button(),
                target: pointer_target(&event, &arena_clone),
            };
            if host.borrow_mut().game.pointer_down(&input) {
                event.prevent_default();
            }
        });
        let _ = arena.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keyboard(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            let key = event.key();
            let mut h = host.borrow_mut();
            // A focused bug button takes Enter/Space as a squash
            let consumed = match bug_id_of(event.target()) {
                Some(id) if h.game.bug_key_down(id, &key) => true,
                _ => h.game.key_down(&key),
            };
            if consumed {
                event.prevent_default();
            }
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn on_click(document: &Document, id: &str, host: Rc<RefCell<Host>>, action: fn(&mut Game)) {
        let Some(btn) = document.get_element_by_id(id) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            action(&mut host.borrow_mut().game);
        });
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(document: &Document, host: Rc<RefCell<Host>>) {
        on_click(document, "start-btn", host.clone(), |game| {
            game.start();
        });
        on_click(document, "close-btn", host.clone(), Game::close);
        on_click(document, "sound-toggle", host.clone(), |game| {
            game.toggle_sound();
        });
        on_click(document, "haptics-toggle", host.clone(), |game| {
            game.toggle_haptics();
        });
        on_click(document, "motion-toggle", host, |game| {
            let next = match game.preferences().motion {
                MotionPreference::Auto => MotionPreference::On,
                MotionPreference::On => MotionPreference::Off,
                MotionPreference::Off => MotionPreference::Auto,
            };
            game.set_motion_preference(next);
        });
    }

    fn request_animation_frame(host: Rc<RefCell<Host>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(host, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(host: Rc<RefCell<Host>>, time: f64) {
        {
            let mut h = host.borrow_mut();
            let dt = if h.last_time > 0.0 {
                time - h.last_time
            } else {
                0.0
            };
            h.last_time = time;

            // Clipped inside the engine
            h.game.advance(dt);
            for event in h.game.drain_events() {
                log::debug!("{:?}", event);
            }
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                h.sync(&document);
            }
        }

        request_animation_frame(host);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use qa_bug_hunt::platform::Capabilities;
    use qa_bug_hunt::sim::{GameEvent, GamePhase};
    use qa_bug_hunt::{Game, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|json| Tuning::from_json(&json).map_err(|e| e.to_string()))
        {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Could not load tuning from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    log::info!("QA Bug Hunt (native) - headless autoplay, seed {}", seed);

    let mut game = match Game::with_tuning(seed, Capabilities::headless(), tuning) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Rejected tuning: {}", e);
            std::process::exit(1);
        }
    };
    game.start();

    // Squash a bug every 400 ms and whiff every fifth swing
    const FRAME_MS: f64 = 16.0;
    const SWING_MS: f64 = 400.0;
    let mut since_swing = 0.0;
    let mut swings = 0u32;
    while game.phase() == GamePhase::Running {
        game.advance(FRAME_MS);
        since_swing += FRAME_MS;
        if since_swing >= SWING_MS {
            since_swing = 0.0;
            swings += 1;
            let target = game.session().live_bugs().next().map(|b| b.id);
            match target {
                Some(id) if swings % 5 != 0 => {
                    game.hit(id);
                }
                _ => {
                    game.miss();
                }
            }
        }
        for event in game.drain_events() {
            match event {
                GameEvent::WaveSpawned { wave, count } => {
                    log::info!("Wave {} (+{} bugs)", wave, count)
                }
                GameEvent::Finished { score, new_best } => {
                    log::info!("Finished with {} points (new best: {})", score, new_best)
                }
                other => log::debug!("{:?}", other),
            }
        }
    }

    let session = game.session();
    println!(
        "score {} | hits {} | misses {} | accuracy {}% | wave {} | {}",
        session.score,
        session.hits,
        session.misses,
        game.accuracy(),
        session.wave,
        game.result_label()
    );
}
