// host.rs - Host environment capabilities
//
// The controller never touches the browser directly; everything it needs
// from its host is injected behind these traits, so the full mount
// lifecycle runs under test against manually driven fakes.

use std::rc::Rc;

use crate::render::Frame;

/// Identifier for a scheduled frame callback (requestAnimationFrame id
/// shaped: the browser hands out i32s).
pub type FrameHandle = i32;
/// Identifier for a pending timeout.
pub type TimeoutHandle = i32;

/// "Run this right before the next repaint."
pub trait Scheduler {
    fn request_frame(&self, cb: Box<dyn FnOnce()>) -> FrameHandle;
    fn cancel_frame(&self, handle: FrameHandle);
}

/// One-shot delayed callback, used for resize debouncing.
pub trait Timer {
    fn set_timeout(&self, delay_ms: u32, cb: Box<dyn FnOnce()>) -> TimeoutHandle;
    fn clear_timeout(&self, handle: TimeoutHandle);
}

/// An active listener registration. Dropping it detaches the listener;
/// detaching runs at most once.
pub struct Subscription {
    detach: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(detach: impl FnOnce() + 'static) -> Self {
        Self {
            detach: Some(Box::new(detach)),
        }
    }

    /// A subscription with nothing to detach.
    pub fn empty() -> Self {
        Self { detach: None }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(detach) = self.detach.take() {
            detach();
        }
    }
}

/// Viewport and pointer event streams.
pub trait Events {
    /// Viewport resize notifications.
    fn on_resize(&self, cb: Box<dyn FnMut()>) -> Subscription;
    /// Pointer clicks, already translated to surface-local coordinates.
    fn on_click(&self, cb: Box<dyn FnMut(f32, f32)>) -> Subscription;
}

/// The rectangular region the field draws into.
pub trait Surface {
    /// Current on-screen pixel size of the surface's layout box.
    fn size(&self) -> (u32, u32);
    /// Push a finished frame to the screen.
    fn present(&mut self, frame: &Frame);
}

/// Capability bundle handed to mount. Everything runs on the host's one
/// logical thread; Rc is sharing, not synchronization.
#[derive(Clone)]
pub struct Host {
    pub scheduler: Rc<dyn Scheduler>,
    pub timer: Rc<dyn Timer>,
    pub events: Rc<dyn Events>,
}
