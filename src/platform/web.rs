//! Browser capabilities (WASM only)

use wasm_bindgen::prelude::*;

use super::{Capabilities, DeviceProbe};
use crate::audio::WebAudio;
use crate::error::CapabilityError;
use crate::feedback::{Celebration, HapticSink};
use crate::persistence::LocalStorage;

const MOBILE_LIKE_QUERY: &str = "(max-width: 767px), (hover: none), (pointer: coarse)";
const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Confetti is optional: the page may or may not have loaded it.
#[wasm_bindgen(inline_js = "
    export function launch_confetti(particleCount) {
        return new Promise((resolve, reject) => {
            try {
                const confetti = window.confetti;
                if (typeof confetti !== 'function') {
                    reject('confetti not loaded');
                    return;
                }
                confetti({ particleCount, spread: 80, origin: { y: 0.6 } });
                resolve();
            } catch (e) {
                reject(e);
            }
        });
    }
")]
extern "C" {
    fn launch_confetti(particle_count: u32) -> js_sys::Promise;
}

fn media_matches(query: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.match_media(query).ok().flatten())
        .map(|mql| mql.matches())
        .unwrap_or(false)
}

/// `matchMedia` backed device probe. Each call re-queries.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaQueryProbe;

impl DeviceProbe for MediaQueryProbe {
    fn is_mobile_like(&self) -> bool {
        media_matches(MOBILE_LIKE_QUERY)
    }

    fn prefers_reduced_motion(&self) -> bool {
        media_matches(REDUCED_MOTION_QUERY)
    }
}

/// `navigator.vibrate`
pub struct Vibration {
    navigator: web_sys::Navigator,
}

impl Vibration {
    /// `None` when the browser has no vibration API
    pub fn detect() -> Option<Self> {
        let navigator = web_sys::window()?.navigator();
        let supported = js_sys::Reflect::get(&navigator, &JsValue::from_str("vibrate"))
            .map(|f| f.is_function())
            .unwrap_or(false);
        supported.then_some(Self { navigator })
    }
}

impl HapticSink for Vibration {
    fn vibrate(&mut self, pattern: &[u32]) -> Result<(), CapabilityError> {
        let accepted = match pattern {
            [single] => self.navigator.vibrate_with_duration(*single),
            _ => {
                let array: js_sys::Array = pattern.iter().map(|ms| JsValue::from(*ms)).collect();
                self.navigator.vibrate_with_pattern(&JsValue::from(array))
            }
        };
        if accepted {
            Ok(())
        } else {
            Err(CapabilityError::Failed {
                capability: "vibration",
                reason: "pattern rejected".to_string(),
            })
        }
    }
}

/// `window.confetti`, fired and forgotten
#[derive(Debug, Default, Clone, Copy)]
pub struct Confetti;

impl Celebration for Confetti {
    fn launch(&mut self, particle_count: u32) -> Result<(), CapabilityError> {
        let promise = launch_confetti(particle_count);
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::debug!("Celebration skipped: {:?}", e);
            }
        });
        Ok(())
    }
}

/// Capabilities backed by the current browser window
pub fn browser_capabilities() -> Capabilities {
    let mut caps = Capabilities::headless()
        .with_storage(LocalStorage::new())
        .with_device(MediaQueryProbe)
        .with_audio(WebAudio::new())
        .with_celebration(Confetti);
    caps.haptics = Vibration::detect().map(|v| Box::new(v) as Box<dyn HapticSink>);
    if caps.haptics.is_none() {
        log::info!("Vibration API unavailable - haptics disabled");
    }
    caps
}
