use crate::error::SetupError;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

type IntersectionCallback = Closure<dyn FnMut(js_sys::Array, web::IntersectionObserver)>;
type MutationCallback = Closure<dyn FnMut(js_sys::Array, web::MutationObserver)>;

/// Observes one element's intersection with the viewport until dropped.
pub struct IntersectionSubscription {
    observer: web::IntersectionObserver,
    _callback: IntersectionCallback,
}

impl IntersectionSubscription {
    /// `handler` receives each entry for the element together with the
    /// observer, so it can disconnect from inside the callback.
    pub fn observe(
        target: &web::Element,
        threshold: f64,
        root_margin: Option<&str>,
        mut handler: impl FnMut(&web::IntersectionObserverEntry, &web::IntersectionObserver) + 'static,
    ) -> Result<Self, SetupError> {
        let callback = Closure::wrap(Box::new(
            move |entries: js_sys::Array, observer: web::IntersectionObserver| {
                for entry in entries.iter() {
                    if let Ok(entry) = entry.dyn_into::<web::IntersectionObserverEntry>() {
                        handler(&entry, &observer);
                    }
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, web::IntersectionObserver)>);

        let init = web::IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(threshold));
        if let Some(margin) = root_margin {
            init.set_root_margin(margin);
        }
        let observer =
            web::IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)
                .map_err(SetupError::js)?;
        observer.observe(target);
        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn disconnect(&self) {
        self.observer.disconnect();
    }
}

impl Drop for IntersectionSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

/// Watches a subtree for structural and attribute changes until dropped.
pub struct MutationSubscription {
    observer: web::MutationObserver,
    _callback: MutationCallback,
}

impl MutationSubscription {
    /// `handler` is called once per batch with the records that survived
    /// `ignore` (records whose target is `ignore` are dropped). Only the
    /// attributes named in `attributes` are watched.
    pub fn observe(
        target: &web::Node,
        ignore: Option<web::Node>,
        attributes: &[&str],
        mut handler: impl FnMut(usize) + 'static,
    ) -> Result<Self, SetupError> {
        let callback = Closure::wrap(Box::new(
            move |records: js_sys::Array, _observer: web::MutationObserver| {
                let relevant = records
                    .iter()
                    .filter_map(|r| r.dyn_into::<web::MutationRecord>().ok())
                    .filter(|r| match (&ignore, r.target()) {
                        (Some(ignored), Some(t)) => !ignored.is_same_node(Some(&t)),
                        _ => true,
                    })
                    .count();
                if relevant > 0 {
                    handler(relevant);
                }
            },
        ) as Box<dyn FnMut(js_sys::Array, web::MutationObserver)>);

        let observer =
            web::MutationObserver::new(callback.as_ref().unchecked_ref()).map_err(SetupError::js)?;
        let init = web::MutationObserverInit::new();
        init.set_child_list(true);
        init.set_subtree(true);
        init.set_attributes(true);
        let filter: js_sys::Array = attributes.iter().map(|a| JsValue::from_str(a)).collect();
        init.set_attribute_filter(&filter);
        observer
            .observe_with_options(target, &init)
            .map_err(SetupError::js)?;
        Ok(Self {
            observer,
            _callback: callback,
        })
    }
}

impl Drop for MutationSubscription {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}
