use crate::constants::AMBIENT_RESIZE_DEBOUNCE_MS;
use crate::dom::{self, Timeout};
use crate::error::SetupError;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// An event listener that is removed again when dropped.
pub struct EventSubscription {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl EventSubscription {
    pub fn listen(
        target: &web::EventTarget,
        event: &'static str,
        handler: impl FnMut(web::Event) + 'static,
    ) -> Result<Self, SetupError> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(SetupError::js)?;
        Ok(Self {
            target: target.clone(),
            event,
            closure,
        })
    }
}

impl Drop for EventSubscription {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Window `resize` listener that only calls back once resizing settles.
pub struct DebouncedResize {
    _listener: EventSubscription,
    _pending: Rc<RefCell<Option<Timeout>>>,
}

impl DebouncedResize {
    pub fn listen(on_settled: impl Fn() + 'static) -> Result<Self, SetupError> {
        let window = dom::window()?;
        let pending: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
        let pending_ev = pending.clone();
        let on_settled = Rc::new(on_settled);
        let listener = EventSubscription::listen(&window, "resize", move |_ev| {
            let on_settled = on_settled.clone();
            // Replacing the pending timeout drops (and clears) the previous one.
            let timeout = Timeout::new(AMBIENT_RESIZE_DEBOUNCE_MS, move || on_settled());
            match timeout {
                Ok(t) => *pending_ev.borrow_mut() = Some(t),
                Err(e) => log::warn!("[resize] debounce timer failed: {}", e),
            }
        })?;
        Ok(Self {
            _listener: listener,
            _pending: pending,
        })
    }
}
