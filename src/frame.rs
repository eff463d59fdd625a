use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

type FrameCallback = Closure<dyn FnMut(f64)>;

/// A `requestAnimationFrame` loop owned by the component that started it.
///
/// The pending frame is cancelled on [`AnimationLoop::cancel`] and on drop, so
/// a remounted or restarted component never leaves an orphaned loop behind.
pub struct AnimationLoop {
    tick: Rc<RefCell<Option<FrameCallback>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl AnimationLoop {
    /// Schedule `step` on every animation frame until it returns
    /// [`LoopControl::Stop`] or the loop is cancelled.
    pub fn start(mut step: impl FnMut(f64) -> LoopControl + 'static) -> Self {
        let tick: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));
        let handle = Rc::new(Cell::new(None));
        let tick_weak: Weak<RefCell<Option<FrameCallback>>> = Rc::downgrade(&tick);
        let handle_tick = handle.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            handle_tick.set(None);
            if step(timestamp) == LoopControl::Stop {
                return;
            }
            if let Some(tick) = tick_weak.upgrade() {
                schedule(&tick, &handle_tick);
            }
        }) as Box<dyn FnMut(f64)>));
        schedule(&tick, &handle);
        Self { tick, handle }
    }

    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(w) = web::window() {
                _ = w.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.cancel();
        self.tick.borrow_mut().take();
    }
}

fn schedule(tick: &Rc<RefCell<Option<FrameCallback>>>, handle: &Rc<Cell<Option<i32>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        match w.request_animation_frame(cb.as_ref().unchecked_ref()) {
            Ok(id) => handle.set(Some(id)),
            Err(e) => log::warn!("[frame] requestAnimationFrame failed: {:?}", e),
        }
    }
}
