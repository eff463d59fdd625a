use crate::core::{
    CapabilityProfile, Tick, Typewriter, TypewriterOptions, TypewriterPhase, TypewriterTiming,
};
use crate::frame::{AnimationLoop, LoopControl};
use crate::probe;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

struct TypewriterInner {
    element: web::HtmlElement,
    typewriter: Typewriter,
    raf: Option<AnimationLoop>,
}

impl TypewriterInner {
    fn render(&self) {
        self.element
            .set_text_content(Some(self.typewriter.displayed_text()));
    }
}

/// Writes an animated reveal of `text` into an element.
#[wasm_bindgen]
pub struct ScrambleTypewriter {
    inner: Rc<RefCell<TypewriterInner>>,
}

#[wasm_bindgen]
impl ScrambleTypewriter {
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: web::HtmlElement,
        text: String,
        speed: Option<f64>,
        scramble_on_mount: Option<bool>,
        scramble_duration: Option<f64>,
    ) -> ScrambleTypewriter {
        let defaults = TypewriterOptions::default();
        let options = TypewriterOptions {
            speed_ms: speed.unwrap_or(defaults.speed_ms),
            scramble_on_mount: scramble_on_mount.unwrap_or(defaults.scramble_on_mount),
            scramble_duration_ms: scramble_duration.unwrap_or(defaults.scramble_duration_ms),
        };
        Self::with_options(element, &text, &options, &probe::profile())
    }

    /// Replace the text. The running animation is cancelled before the new
    /// run is scheduled.
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&self, text: String) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.typewriter.source_text() == text {
                return;
            }
            if let Some(old) = inner.raf.take() {
                old.cancel();
            }
            inner.typewriter.restart(&text);
            set_label(&inner.element, &text);
            inner.render();
        }
        start_run(&self.inner);
    }

    /// The string currently on display.
    #[wasm_bindgen(getter)]
    pub fn text(&self) -> String {
        self.inner.borrow().typewriter.displayed_text().to_owned()
    }

    #[wasm_bindgen(getter)]
    pub fn done(&self) -> bool {
        self.inner.borrow().typewriter.phase() == TypewriterPhase::Done
    }

    pub fn stop(&self) {
        if let Some(raf) = self.inner.borrow_mut().raf.take() {
            raf.cancel();
        }
    }
}

impl ScrambleTypewriter {
    pub fn with_options(
        element: web::HtmlElement,
        text: &str,
        options: &TypewriterOptions,
        profile: &CapabilityProfile,
    ) -> Self {
        let timing = TypewriterTiming::resolve(options, profile);
        set_label(&element, text);
        let inner = TypewriterInner {
            element,
            typewriter: Typewriter::new(text, timing),
            raf: None,
        };
        inner.render();
        let inner = Rc::new(RefCell::new(inner));
        start_run(&inner);
        Self { inner }
    }
}

// Screen readers get the final text, never the scrambled frames.
fn set_label(element: &web::HtmlElement, text: &str) {
    _ = element.set_attribute("aria-label", text);
}

fn start_run(inner: &Rc<RefCell<TypewriterInner>>) {
    let generation = inner.borrow().typewriter.generation();
    let weak = Rc::downgrade(inner);
    let raf = AnimationLoop::start(move |timestamp| {
        let Some(inner) = weak.upgrade() else {
            return LoopControl::Stop;
        };
        let mut inner = inner.borrow_mut();
        if inner.typewriter.generation() != generation {
            return LoopControl::Stop;
        }
        let tick = inner.typewriter.tick(timestamp);
        inner.render();
        match tick {
            Tick::Continue => LoopControl::Continue,
            Tick::Done => {
                log::debug!("[typewriter] done ({} chars)", inner.typewriter.source_text().len());
                LoopControl::Stop
            }
        }
    });
    inner.borrow_mut().raf = Some(raf);
}
