// controller.rs - Mount lifecycle and frame loop
//
// Wires host capabilities to the simulation: the self-rescheduling tick,
// the debounced resize path, pointer forwarding, and teardown. Handlers
// hold weak references so nothing can outlive an unmounted field.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::FieldConfig;
use crate::host::{FrameHandle, Host, Subscription, Surface, TimeoutHandle};
use crate::rng::RandomSource;
use crate::sim::ParticleField;

/// Trailing-edge debounce window for resize events.
pub const RESIZE_DEBOUNCE_MS: u32 = 150;

struct Inner {
    field: ParticleField,
    surface: Box<dyn Surface>,
    frame: Option<FrameHandle>,
    debounce: Option<TimeoutHandle>,
    running: bool,
}

pub struct FieldController {
    host: Host,
    inner: Option<Rc<RefCell<Inner>>>,
    resize_sub: Option<Subscription>,
    click_sub: Option<Subscription>,
}

impl FieldController {
    /// Bind to a surface and start the loop. A missing surface yields an
    /// inert controller: every method is a no-op and nothing is logged.
    pub fn mount(
        host: Host,
        surface: Option<Box<dyn Surface>>,
        config: FieldConfig,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let Some(surface) = surface else {
            return Self {
                host,
                inner: None,
                resize_sub: None,
                click_sub: None,
            };
        };

        let (w, h) = surface.size();
        let inner = Rc::new(RefCell::new(Inner {
            field: ParticleField::new(w, h, config, rng),
            surface,
            frame: None,
            debounce: None,
            running: true,
        }));

        let resize_sub = {
            let host_for_cb = host.clone();
            let weak = Rc::downgrade(&inner);
            host.events.on_resize(Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    debounce_resize(&host_for_cb, &inner);
                }
            }))
        };

        let click_sub = {
            let weak = Rc::downgrade(&inner);
            host.events.on_click(Box::new(move |x, y| {
                if let Some(inner) = weak.upgrade() {
                    let mut state = inner.borrow_mut();
                    if state.running {
                        state.field.burst_at(x, y);
                    }
                }
            }))
        };

        schedule_tick(&host, &inner);

        Self {
            host,
            inner: Some(inner),
            resize_sub: Some(resize_sub),
            click_sub: Some(click_sub),
        }
    }

    pub fn mounted(&self) -> bool {
        self.inner.is_some()
    }

    /// Spawn a burst directly, bypassing the pointer stream.
    pub fn burst_at(&self, x: f32, y: f32) {
        if let Some(inner) = &self.inner {
            inner.borrow_mut().field.burst_at(x, y);
        }
    }

    /// Inspect the running simulation. None when not mounted.
    pub fn with_field<R>(&self, f: impl FnOnce(&ParticleField) -> R) -> Option<R> {
        self.inner.as_ref().map(|inner| f(&inner.borrow().field))
    }

    /// Tear everything down: cancel the pending frame, clear any pending
    /// debounce, detach both listeners. Safe to call any number of
    /// times; also runs on drop so teardown covers every exit path.
    pub fn unmount(&mut self) {
        self.resize_sub.take();
        self.click_sub.take();
        let Some(inner) = self.inner.take() else {
            return;
        };
        let mut state = inner.borrow_mut();
        state.running = false;
        if let Some(handle) = state.frame.take() {
            self.host.scheduler.cancel_frame(handle);
        }
        if let Some(handle) = state.debounce.take() {
            self.host.timer.clear_timeout(handle);
        }
    }
}

impl Drop for FieldController {
    fn drop(&mut self) {
        self.unmount();
    }
}

fn schedule_tick(host: &Host, inner: &Rc<RefCell<Inner>>) {
    let host2 = host.clone();
    let weak = Rc::downgrade(inner);
    let handle = host.scheduler.request_frame(Box::new(move || {
        let Some(inner) = weak.upgrade() else {
            return;
        };
        {
            let mut state = inner.borrow_mut();
            if !state.running {
                return;
            }
            state.frame = None;
            let state = &mut *state;
            state.field.tick();
            state.surface.present(state.field.frame());
        }
        schedule_tick(&host2, &inner);
    }));
    inner.borrow_mut().frame = Some(handle);
}

/// Trailing-edge debounce: every resize event restarts the window, only
/// the last one recreates the population.
fn debounce_resize(host: &Host, inner: &Rc<RefCell<Inner>>) {
    let pending = inner.borrow_mut().debounce.take();
    if let Some(handle) = pending {
        host.timer.clear_timeout(handle);
    }
    let weak = Rc::downgrade(inner);
    let handle = host.timer.set_timeout(
        RESIZE_DEBOUNCE_MS,
        Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let mut state = inner.borrow_mut();
            state.debounce = None;
            if !state.running {
                return;
            }
            let (w, h) = state.surface.size();
            state.field.resize(w, h);
        }),
    );
    inner.borrow_mut().debounce = Some(handle);
}
