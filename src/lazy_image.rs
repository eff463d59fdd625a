//! Deferred image loading with quality tiers and a terminal error state.

use crate::constants::{IMAGE_ERROR_GLYPH, IMAGE_FADE_MS, IMAGE_ROOT_MARGIN};
use crate::core::{quality_url, CapabilityProfile, ImageLoadState, ImageQuality, LoadTrigger};
use crate::dom::{self, Timeout};
use crate::error::SetupError;
use crate::events::{EventSubscription, IntersectionSubscription};
use crate::probe;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone, Debug)]
pub struct ImageOptions {
    pub alt: String,
    pub priority: bool,
    pub quality: ImageQuality,
    pub object_fit: String,
    /// Low-quality image shown blurred until the real one arrives.
    pub placeholder: Option<String>,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            alt: String::new(),
            priority: false,
            quality: ImageQuality::Auto,
            object_fit: "cover".to_string(),
            placeholder: None,
        }
    }
}

struct ImageInner {
    container: web::HtmlElement,
    img: web::HtmlImageElement,
    placeholder: Option<web::HtmlElement>,
    url: String,
    reduced_motion: bool,
    state: ImageLoadState,
    visibility: Option<IntersectionSubscription>,
    fallback: Option<Timeout>,
    listeners: Vec<EventSubscription>,
}

impl ImageInner {
    fn stamp_state(&self) {
        _ = self
            .container
            .set_attribute("data-state", self.state.phase().as_str());
    }

    /// Runs once, right after the state moved to near-viewport.
    fn start_fetch(&self, trigger: LoadTrigger) {
        log::debug!("[image] load {} via {:?}", self.url, trigger);
        if let Some(t) = &self.fallback {
            t.cancel();
        }
        if let Some(v) = &self.visibility {
            v.disconnect();
        }
        self.img.set_src(&self.url);
        self.stamp_state();
    }

    fn drop_placeholder(&mut self) {
        if let Some(p) = self.placeholder.take() {
            p.remove();
        }
    }
}

/// An image that is fetched only when it is about to scroll into view.
#[wasm_bindgen]
pub struct ProgressiveImage {
    inner: Rc<RefCell<ImageInner>>,
}

#[wasm_bindgen]
impl ProgressiveImage {
    #[wasm_bindgen(constructor)]
    pub fn new(
        container: web::HtmlElement,
        src: String,
        alt: Option<String>,
        priority: Option<bool>,
        quality: Option<String>,
        object_fit: Option<String>,
        placeholder: Option<String>,
    ) -> Result<ProgressiveImage, JsValue> {
        let defaults = ImageOptions::default();
        let options = ImageOptions {
            alt: alt.unwrap_or(defaults.alt),
            priority: priority.unwrap_or(defaults.priority),
            quality: quality
                .as_deref()
                .and_then(ImageQuality::parse)
                .unwrap_or(defaults.quality),
            object_fit: object_fit.unwrap_or(defaults.object_fit),
            placeholder: placeholder.or(defaults.placeholder),
        };
        Ok(Self::register(container, &src, &options, &probe::profile())?)
    }

    #[wasm_bindgen(getter)]
    pub fn state(&self) -> String {
        self.inner.borrow().state.phase().as_str().to_string()
    }

    #[wasm_bindgen(getter, js_name = isLoaded)]
    pub fn is_loaded(&self) -> bool {
        self.inner.borrow().state.is_loaded()
    }

    #[wasm_bindgen(getter, js_name = hasErrored)]
    pub fn has_errored(&self) -> bool {
        self.inner.borrow().state.has_errored()
    }
}

impl ProgressiveImage {
    pub fn register(
        container: web::HtmlElement,
        src: &str,
        options: &ImageOptions,
        profile: &CapabilityProfile,
    ) -> Result<Self, SetupError> {
        let document = dom::document()?;
        let quality = options.quality.resolve(profile);
        let url = quality_url(src, quality);

        dom::set_styles(&container, &[("position", "relative"), ("overflow", "hidden")]);

        let placeholder = match &options.placeholder {
            Some(lqip) => {
                let el = create_html(&document, "div")?;
                let bg = format!("url(\"{}\")", lqip.replace('"', "%22"));
                dom::set_styles(
                    &el,
                    &[
                        ("position", "absolute"),
                        ("inset", "0"),
                        ("background-image", bg.as_str()),
                        ("background-size", "cover"),
                        ("background-position", "center"),
                        ("filter", "blur(12px)"),
                        ("transform", "scale(1.05)"),
                    ],
                );
                Some(el)
            }
            None if !profile.prefers_reduced_motion => {
                let el = create_html(&document, "div")?;
                dom::set_styles(
                    &el,
                    &[
                        ("position", "absolute"),
                        ("inset", "0"),
                        ("background", "rgba(255, 255, 255, 0.06)"),
                    ],
                );
                _ = el.class_list().add_1("image-shimmer");
                Some(el)
            }
            None => None,
        };
        if let Some(p) = &placeholder {
            _ = p.set_attribute("aria-hidden", "true");
            container.append_child(p).map_err(SetupError::js)?;
        }

        let img: web::HtmlImageElement = document
            .create_element("img")
            .map_err(SetupError::js)?
            .dyn_into()
            .map_err(|_| SetupError::Js("img is not an HTMLImageElement".into()))?;
        img.set_alt(&options.alt);
        let fade = if profile.prefers_reduced_motion {
            "none".to_string()
        } else {
            format!("opacity {}ms ease-out", IMAGE_FADE_MS)
        };
        dom::set_styles(
            &img,
            &[
                ("position", "relative"),
                ("display", "block"),
                ("width", "100%"),
                ("height", "100%"),
                ("object-fit", options.object_fit.as_str()),
                ("opacity", "0"),
                ("transition", fade.as_str()),
            ],
        );
        container.append_child(&img).map_err(SetupError::js)?;

        let inner = Rc::new(RefCell::new(ImageInner {
            container,
            img: img.clone(),
            placeholder,
            url,
            reduced_motion: profile.prefers_reduced_motion,
            state: ImageLoadState::register(false, dom::now_ms()),
            visibility: None,
            fallback: None,
            listeners: Vec::new(),
        }));
        inner.borrow().stamp_state();

        let weak = Rc::downgrade(&inner);
        let on_load = EventSubscription::listen(&img, "load", move |_| on_loaded(&weak))?;
        let weak = Rc::downgrade(&inner);
        let on_error = EventSubscription::listen(&img, "error", move |_| on_errored(&weak))?;
        inner.borrow_mut().listeners = vec![on_load, on_error];

        let weak = Rc::downgrade(&inner);
        if options.priority {
            begin_load(&weak, LoadTrigger::Priority);
            return Ok(Self { inner });
        }

        let visibility = {
            let weak = weak.clone();
            let target: web::Element = inner.borrow().container.clone().into();
            IntersectionSubscription::observe(
                &target,
                0.0,
                Some(IMAGE_ROOT_MARGIN),
                move |entry, observer| {
                    if entry.is_intersecting() {
                        observer.disconnect();
                        begin_load(&weak, LoadTrigger::Intersection);
                    }
                },
            )
        };
        match visibility {
            Ok(sub) => inner.borrow_mut().visibility = Some(sub),
            Err(e) => log::warn!("[image] no intersection observer, relying on fallback: {}", e),
        }

        // Load anyway if visibility detection never reports. The timer is
        // armed for the state's own deadline and fires through `poll_fallback`.
        let delay = inner.borrow().state.fallback_delay_ms(dom::now_ms());
        let fallback = {
            let weak = weak.clone();
            Timeout::new(delay.ceil() as i32 + 1, move || fallback_load(&weak))
        };
        match fallback {
            Ok(t) => inner.borrow_mut().fallback = Some(t),
            Err(e) => {
                log::warn!("[image] fallback timer failed, loading now: {}", e);
                begin_load(&weak, LoadTrigger::FallbackTimeout);
            }
        }
        Ok(Self { inner })
    }
}

fn create_html(document: &web::Document, tag: &str) -> Result<web::HtmlElement, SetupError> {
    document
        .create_element(tag)
        .map_err(SetupError::js)?
        .dyn_into()
        .map_err(|_| SetupError::Js(format!("<{}> is not an HTMLElement", tag)))
}

fn begin_load(weak: &Weak<RefCell<ImageInner>>, trigger: LoadTrigger) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if inner.state.begin(trigger) {
        inner.start_fetch(trigger);
    }
}

fn fallback_load(weak: &Weak<RefCell<ImageInner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if inner.state.poll_fallback(dom::now_ms()) {
        inner.start_fetch(LoadTrigger::FallbackTimeout);
    }
}

fn on_loaded(weak: &Weak<RefCell<ImageInner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if !inner.state.mark_loaded() {
        return;
    }
    _ = inner.img.style().set_property("opacity", "1");
    if inner.reduced_motion {
        inner.drop_placeholder();
    } else if let Some(p) = &inner.placeholder {
        // Keep the placeholder under the fading image; it is hidden by then.
        _ = p.style().set_property("opacity", "0");
    }
    inner.stamp_state();
}

fn on_errored(weak: &Weak<RefCell<ImageInner>>) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let mut inner = inner.borrow_mut();
    if !inner.state.mark_errored() {
        return;
    }
    log::warn!("[image] failed to load {}", inner.url);
    inner.drop_placeholder();
    inner.img.remove();
    if let Some(document) = dom::window_document() {
        if let Ok(el) = create_html(&document, "div") {
            el.set_text_content(Some(IMAGE_ERROR_GLYPH));
            _ = el.set_attribute("role", "img");
            _ = el.set_attribute("aria-label", "Image unavailable");
            dom::set_styles(
                &el,
                &[
                    ("display", "flex"),
                    ("align-items", "center"),
                    ("justify-content", "center"),
                    ("width", "100%"),
                    ("height", "100%"),
                    ("min-height", "4rem"),
                    ("background", "#1f1f1f"),
                    ("color", "#777"),
                    ("font-size", "1.5rem"),
                ],
            );
            _ = inner.container.append_child(&el);
        }
    }
    inner.stamp_state();
}
