use crate::error::SetupError;
use std::cell::Cell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

#[inline]
pub fn window() -> Result<web::Window, SetupError> {
    web::window().ok_or(SetupError::NoWindow)
}

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn document() -> Result<web::Document, SetupError> {
    window()?.document().ok_or(SetupError::NoDocument)
}

/// Resolves once the initial markup is parsed.
pub async fn dom_ready() -> Result<(), SetupError> {
    let document = document()?;
    if document.ready_state() != "loading" {
        return Ok(());
    }
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let opts = web::AddEventListenerOptions::new();
        opts.set_once(true);
        _ = document.add_event_listener_with_callback_and_add_event_listener_options(
            "DOMContentLoaded",
            &resolve,
            &opts,
        );
    });
    JsFuture::from(promise).await.map_err(SetupError::js)?;
    Ok(())
}

#[inline]
pub fn now_ms() -> f64 {
    instant::now()
}

pub fn viewport_width() -> f64 {
    web::window()
        .and_then(|w| w.inner_width().ok())
        .and_then(|v| v.as_f64())
        .unwrap_or(0.0)
}

/// Width of the layout viewport without the scrollbar, so full-width layers do
/// not cause horizontal overflow.
pub fn layout_viewport_width(document: &web::Document) -> f64 {
    document
        .document_element()
        .map(|root| root.client_width() as f64)
        .filter(|w| *w > 0.0)
        .unwrap_or_else(viewport_width)
}

/// Raw height measurements of the document: body and root `scrollHeight`,
/// `offsetHeight` and the root `clientHeight`.
pub fn document_height_samples(document: &web::Document) -> [f64; 5] {
    let mut out = [0.0; 5];
    if let Some(body) = document.body() {
        out[0] = body.scroll_height() as f64;
        out[1] = body.offset_height() as f64;
    }
    if let Some(root) = document.document_element() {
        out[2] = root.client_height() as f64;
        out[3] = root.scroll_height() as f64;
        if let Some(root) = root.dyn_ref::<web::HtmlElement>() {
            out[4] = root.offset_height() as f64;
        }
    }
    out
}

/// Measure with `exclude` taken out of layout so an element sized from the
/// measurement never measures itself.
pub fn document_height_samples_excluding(
    document: &web::Document,
    exclude: &web::HtmlElement,
) -> [f64; 5] {
    let style = exclude.style();
    let previous = style.get_property_value("display").unwrap_or_default();
    _ = style.set_property("display", "none");
    let samples = document_height_samples(document);
    if previous.is_empty() {
        _ = style.remove_property("display");
    } else {
        _ = style.set_property("display", &previous);
    }
    samples
}

#[inline]
pub fn set_styles(el: &web::HtmlElement, styles: &[(&str, &str)]) {
    let style = el.style();
    for (k, v) in styles {
        _ = style.set_property(k, v);
    }
}

#[inline]
pub fn data_attr(el: &web::Element, name: &str) -> Option<String> {
    el.get_attribute(&format!("data-{}", name))
}

/// One-shot `setTimeout` that is cleared when dropped.
pub struct Timeout {
    id: Cell<Option<i32>>,
    _closure: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn new(delay_ms: i32, callback: impl FnOnce() + 'static) -> Result<Self, SetupError> {
        let window = window()?;
        let id = Cell::new(None);
        let mut callback = Some(callback);
        let closure = Closure::wrap(Box::new(move || {
            if let Some(cb) = callback.take() {
                cb();
            }
        }) as Box<dyn FnMut()>);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            )
            .map_err(SetupError::js)?;
        id.set(Some(handle));
        Ok(Self {
            id,
            _closure: closure,
        })
    }

    pub fn cancel(&self) {
        if let Some(id) = self.id.take() {
            if let Some(w) = web::window() {
                w.clear_timeout_with_handle(id);
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
