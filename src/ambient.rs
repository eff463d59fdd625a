//! Full-page ambient glyph rain drawn behind all content.

use crate::constants::{
    AMBIENT_FADE_FILL, AMBIENT_FONT_SIZE_PX, AMBIENT_GLYPH_FILL, AMBIENT_LAYOUT_ATTRIBUTES,
    AMBIENT_OPACITY, AMBIENT_REMEASURE_INTERVAL_MS, AMBIENT_SETTLE_REMEASURE_MS,
};
use crate::core::{
    document_height, AmbientScene, CanvasSize, CapabilityProfile, GlyphSurface, MeasureThrottle,
};
use crate::dom::{self, Timeout};
use crate::error::SetupError;
use crate::events::{DebouncedResize, MutationSubscription};
use crate::frame::{AnimationLoop, LoopControl};
use crate::probe;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

struct Canvas2d {
    ctx: web::CanvasRenderingContext2d,
}

impl Canvas2d {
    // Resizing a canvas resets its context state.
    fn reset_state(&self) {
        self.ctx
            .set_font(&format!("{}px monospace", AMBIENT_FONT_SIZE_PX));
        self.ctx.set_fill_style_str(AMBIENT_GLYPH_FILL);
    }
}

impl GlyphSurface for Canvas2d {
    fn fade(&mut self, width: f64, height: f64) {
        self.ctx.set_fill_style_str(AMBIENT_FADE_FILL);
        self.ctx.fill_rect(0.0, 0.0, width, height);
        self.ctx.set_fill_style_str(AMBIENT_GLYPH_FILL);
    }

    fn draw_glyph(&mut self, glyph: char, x: f64, y: f64) {
        let mut buf = [0u8; 4];
        _ = self.ctx.fill_text(glyph.encode_utf8(&mut buf), x, y);
    }
}

struct AmbientInner {
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    surface: Canvas2d,
    scene: AmbientScene,
}

impl AmbientInner {
    fn measure(&self) -> (f64, f64) {
        let samples = dom::document_height_samples_excluding(&self.document, &self.canvas);
        (
            dom::layout_viewport_width(&self.document),
            document_height(&samples),
        )
    }

    fn apply_size(&self, size: CanvasSize) {
        self.canvas.set_width(size.width);
        self.canvas.set_height(size.height);
        let width = format!("{}px", size.width);
        let height = format!("{}px", size.height);
        dom::set_styles(
            &self.canvas,
            &[("width", width.as_str()), ("height", height.as_str())],
        );
        self.surface.reset_state();
    }

    fn reconcile(&mut self) {
        let (width, height) = self.measure();
        if let Some(size) = self.scene.reconcile(width, height) {
            self.apply_size(size);
        }
    }
}

/// Mount handle for the ambient background. Dropping it (or calling
/// `unmount`) stops the loop, detaches every observer and removes the canvas.
#[wasm_bindgen]
pub struct AmbientBackground {
    inner: Option<Rc<RefCell<AmbientInner>>>,
    _loop: Option<AnimationLoop>,
    _mutations: Option<MutationSubscription>,
    _resize: Option<DebouncedResize>,
    _settle: Option<Timeout>,
}

#[wasm_bindgen]
impl AmbientBackground {
    /// Attach to the current page. Never fails: without motion permission or
    /// a 2D context the handle is inert and nothing is rendered.
    pub fn mount() -> AmbientBackground {
        Self::mount_with(&probe::profile())
    }

    pub fn unmount(self) {}

    #[wasm_bindgen(getter)]
    pub fn active(&self) -> bool {
        self.inner.is_some()
    }
}

impl AmbientBackground {
    pub fn mount_with(profile: &CapabilityProfile) -> Self {
        if profile.ambient_fps().is_none() {
            log::info!("[ambient] reduced motion; not mounting");
            return Self::inert();
        }
        match Self::attach(profile) {
            Ok(bg) => bg,
            Err(e) => {
                log::warn!("[ambient] disabled: {}", e);
                Self::inert()
            }
        }
    }

    fn inert() -> Self {
        Self {
            inner: None,
            _loop: None,
            _mutations: None,
            _resize: None,
            _settle: None,
        }
    }

    fn attach(profile: &CapabilityProfile) -> Result<Self, SetupError> {
        let document = dom::document()?;
        let body = document.body().ok_or(SetupError::NoBody)?;
        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(SetupError::js)?
            .dyn_into()
            .map_err(|_| SetupError::NoContext)?;
        let ctx: web::CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into().ok())
            .ok_or(SetupError::NoContext)?;

        _ = canvas.set_attribute("aria-hidden", "true");
        dom::set_styles(
            &canvas,
            &[
                ("position", "absolute"),
                ("top", "0"),
                ("left", "0"),
                ("z-index", "-1"),
                ("pointer-events", "none"),
                ("opacity", AMBIENT_OPACITY),
            ],
        );
        body.prepend_with_node_1(&canvas).map_err(SetupError::js)?;

        let samples = dom::document_height_samples_excluding(&document, &canvas);
        let scene = AmbientScene::new(
            profile,
            dom::layout_viewport_width(&document),
            document_height(&samples),
        );
        let inner = AmbientInner {
            document,
            canvas: canvas.clone(),
            surface: Canvas2d { ctx },
            scene,
        };
        inner.apply_size(inner.scene.canvas_size());
        log::info!(
            "[ambient] mounted {}x{} columns={} interval={:.1}ms",
            inner.scene.field().width(),
            inner.scene.field().height(),
            inner.scene.field().column_count(),
            inner.scene.frame_interval_ms().unwrap_or_default()
        );
        let inner = Rc::new(RefCell::new(inner));

        // Layout signals only raise a flag; the loop measures at most once per
        // throttle interval.
        let needs_measure = Rc::new(Cell::new(false));

        let flag = needs_measure.clone();
        let ignore: &web::Node = &canvas;
        let mutations = MutationSubscription::observe(
            &body,
            Some(ignore.clone()),
            AMBIENT_LAYOUT_ATTRIBUTES,
            move |_| flag.set(true),
        )
        .map_err(|e| log::warn!("[ambient] no mutation observer: {}", e))
        .ok();

        let flag = needs_measure.clone();
        let resize = DebouncedResize::listen(move || flag.set(true))
            .map_err(|e| log::warn!("[ambient] no resize listener: {}", e))
            .ok();

        let flag = needs_measure.clone();
        let settle = Timeout::new(AMBIENT_SETTLE_REMEASURE_MS, move || flag.set(true)).ok();

        let weak = Rc::downgrade(&inner);
        let mut throttle = MeasureThrottle::new(AMBIENT_REMEASURE_INTERVAL_MS);
        let raf = AnimationLoop::start(move |timestamp| {
            let Some(inner) = weak.upgrade() else {
                return LoopControl::Stop;
            };
            let mut inner = inner.borrow_mut();
            if needs_measure.take() {
                throttle.mark();
            }
            if throttle.poll(timestamp) {
                inner.reconcile();
            }
            let AmbientInner { scene, surface, .. } = &mut *inner;
            scene.frame(timestamp, surface);
            LoopControl::Continue
        });

        Ok(Self {
            inner: Some(inner),
            _loop: Some(raf),
            _mutations: mutations,
            _resize: resize,
            _settle: settle,
        })
    }
}

impl Drop for AmbientBackground {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.take() {
            inner.borrow().canvas.remove();
            log::info!("[ambient] unmounted");
        }
    }
}
