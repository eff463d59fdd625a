use crate::constants::REDUCED_MOTION_QUERY;
use crate::core::{CapabilityDetector, CapabilityProfile, DeviceSignals};
use std::cell::OnceCell;
use wasm_bindgen::JsValue;
use web_sys as web;

/// Reads capability signals from the live browser.
pub struct BrowserDetector;

impl BrowserDetector {
    pub fn signals(&self) -> DeviceSignals {
        let Some(window) = web::window() else {
            return DeviceSignals::default();
        };
        let navigator = window.navigator();
        let connection = js_sys::Reflect::get(&navigator, &JsValue::from_str("connection"))
            .ok()
            .filter(|c| c.is_object());
        // `effectiveType` and `saveData` are not exposed by web-sys.
        let connection_field = |name: &str| {
            connection
                .as_ref()
                .and_then(|c| js_sys::Reflect::get(c, &JsValue::from_str(name)).ok())
        };
        let cores = navigator.hardware_concurrency();
        DeviceSignals {
            viewport_width: window.inner_width().ok().and_then(|v| v.as_f64()),
            hardware_concurrency: (cores.is_finite() && cores > 0.0).then_some(cores as u32),
            prefers_reduced_motion: window
                .match_media(REDUCED_MOTION_QUERY)
                .ok()
                .flatten()
                .map(|m| m.matches()),
            effective_type: connection_field("effectiveType").and_then(|v| v.as_string()),
            save_data: connection_field("saveData").and_then(|v| v.as_bool()),
        }
    }
}

impl CapabilityDetector for BrowserDetector {
    fn detect(&self) -> CapabilityProfile {
        CapabilityProfile::from_signals(&self.signals())
    }
}

thread_local! {
    static PROFILE: OnceCell<CapabilityProfile> = const { OnceCell::new() };
}

/// The page's capability profile, probed on first use and fixed afterwards.
pub fn profile() -> CapabilityProfile {
    PROFILE.with(|cell| {
        *cell.get_or_init(|| {
            let p = BrowserDetector.detect();
            log::info!(
                "[probe] mobile={} low_end={} reduced_motion={} slow_net={}",
                p.is_mobile,
                p.is_low_end_device,
                p.prefers_reduced_motion,
                p.is_slow_connection
            );
            p
        })
    })
}
