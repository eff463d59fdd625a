//! Adaptive presentation engine for the portfolio site.
//!
//! `core` holds the platform-free state machines and is built for every
//! target; everything that touches the DOM is wasm-only.

pub mod constants;
pub mod core;
pub mod error;

#[cfg(target_arch = "wasm32")]
mod ambient;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod hydrate;
#[cfg(target_arch = "wasm32")]
mod lazy_image;
#[cfg(target_arch = "wasm32")]
mod probe;
#[cfg(target_arch = "wasm32")]
mod reveal;
#[cfg(target_arch = "wasm32")]
mod typewriter;

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    pub use crate::ambient::AmbientBackground;
    pub use crate::lazy_image::{ImageOptions, ProgressiveImage};
    pub use crate::reveal::RevealGate;
    pub use crate::typewriter::ScrambleTypewriter;

    use crate::{dom, hydrate, probe};
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    #[wasm_bindgen(start)]
    pub fn start() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).ok();
        log::info!("folio-motion starting");

        spawn_local(async move {
            if let Err(e) = init().await {
                log::error!("init error: {:?}", e);
            }
        });
        Ok(())
    }

    async fn init() -> anyhow::Result<()> {
        dom::dom_ready().await?;
        let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
        let profile = probe::profile();
        hydrate::hydrate(&document, &profile)?;
        Ok(())
    }

    /// The page's capability profile as a plain JS object.
    #[wasm_bindgen(js_name = capabilityProfile)]
    pub fn capability_profile() -> js_sys::Object {
        let p = probe::profile();
        let obj = js_sys::Object::new();
        for (key, value) in [
            ("isMobile", p.is_mobile),
            ("isLowEndDevice", p.is_low_end_device),
            ("prefersReducedMotion", p.prefers_reduced_motion),
            ("isSlowConnection", p.is_slow_connection),
        ] {
            if let Err(e) =
                js_sys::Reflect::set(&obj, &JsValue::from_str(key), &JsValue::from_bool(value))
            {
                log::warn!("[probe] could not set {}: {:?}", key, e);
            }
        }
        obj
    }
}
