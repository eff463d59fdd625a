use crate::constants::REVEAL_VISIBLE_CLASS;
use crate::core::{RevealOptions, RevealQueue, RevealState};
use crate::error::SetupError;
use crate::events::IntersectionSubscription;
use crate::probe;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

type RevealHook = Box<dyn FnOnce()>;

struct RevealInner {
    element: web::Element,
    state: RevealState,
    hooks: RevealQueue<RevealHook>,
}

impl RevealInner {
    /// Side effects of the one transition to visible. Returns the hooks, which
    /// must run after the borrow is released.
    fn apply_visible(&mut self) -> Vec<RevealHook> {
        _ = self.element.class_list().add_1(REVEAL_VISIBLE_CLASS);
        _ = self.element.set_attribute("data-revealed", "true");
        self.hooks.release()
    }
}

fn run_hooks(hooks: Vec<RevealHook>) {
    for hook in hooks {
        hook();
    }
}

fn js_hook(callback: js_sys::Function) -> RevealHook {
    Box::new(move || {
        if let Err(e) = callback.call0(&JsValue::NULL) {
            log::warn!("[reveal] callback threw: {:?}", e);
        }
    })
}

/// One-shot gate that flips to visible the first time enough of its region
/// enters the viewport. It never hides again.
#[wasm_bindgen]
pub struct RevealGate {
    inner: Rc<RefCell<RevealInner>>,
    _observer: Option<IntersectionSubscription>,
}

#[wasm_bindgen]
impl RevealGate {
    #[wasm_bindgen(constructor)]
    pub fn new(
        element: web::Element,
        threshold: Option<f64>,
        on_reveal: Option<js_sys::Function>,
    ) -> Result<RevealGate, JsValue> {
        let options = RevealOptions {
            threshold: threshold.unwrap_or(RevealOptions::default().threshold),
        };
        let immediate = probe::profile().prefers_reduced_motion;
        Ok(Self::observe(element, &options, immediate, on_reveal)?)
    }

    #[wasm_bindgen(getter)]
    pub fn visible(&self) -> bool {
        self.inner.borrow().state.has_fired()
    }
}

impl RevealGate {
    /// With `immediate` the region is revealed at mount and never observed.
    pub fn observe(
        element: web::Element,
        options: &RevealOptions,
        immediate: bool,
        on_reveal: Option<js_sys::Function>,
    ) -> Result<Self, SetupError> {
        let inner = Rc::new(RefCell::new(RevealInner {
            element: element.clone(),
            state: RevealState::default(),
            hooks: RevealQueue::with(on_reveal.map(js_hook).into_iter().collect()),
        }));
        if immediate {
            let hooks = {
                let mut i = inner.borrow_mut();
                if i.state.force() {
                    i.apply_visible()
                } else {
                    Vec::new()
                }
            };
            run_hooks(hooks);
            return Ok(Self {
                inner,
                _observer: None,
            });
        }
        let options = *options;
        let weak = Rc::downgrade(&inner);
        let observer = IntersectionSubscription::observe(
            &element,
            options.clamped_threshold(),
            None,
            move |entry, observer| {
                let Some(inner) = weak.upgrade() else {
                    observer.disconnect();
                    return;
                };
                let hooks = {
                    let mut inner = inner.borrow_mut();
                    let fired = inner.state.observe_ratio(
                        entry.is_intersecting(),
                        entry.intersection_ratio(),
                        &options,
                    );
                    if !fired {
                        return;
                    }
                    observer.disconnect();
                    inner.apply_visible()
                };
                run_hooks(hooks);
            },
        )?;
        Ok(Self {
            inner,
            _observer: Some(observer),
        })
    }

    /// Run `hook` once the region is revealed, or right away if it already is.
    pub fn on_reveal(&self, hook: impl FnOnce() + 'static) {
        let ready = self.inner.borrow_mut().hooks.defer(Box::new(hook));
        if let Some(hook) = ready {
            hook();
        }
    }
}
