// web/ - Browser bindings
//
// Implements every host capability over web-sys and exposes the
// wasm-bindgen handle the page script drives. Everything else in the
// crate is host-independent and compiles natively.

use std::rc::Rc;
use std::sync::Once;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, MouseEvent, window};

use crate::config::FieldConfig;
use crate::controller::FieldController;
use crate::host::{Events, FrameHandle, Host, Scheduler, Subscription, Surface, Timer, TimeoutHandle};
use crate::render::Frame;
use crate::rng::XorShift32;

/// requestAnimationFrame-backed scheduler. Closure memory is released to
/// the JS garbage collector after the single call.
struct WebScheduler;

impl Scheduler for WebScheduler {
    fn request_frame(&self, cb: Box<dyn FnOnce()>) -> FrameHandle {
        let Some(win) = window() else { return 0 };
        let f = Closure::once_into_js(move || cb());
        win.request_animation_frame(f.unchecked_ref()).unwrap_or(0)
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        if let Some(win) = window() {
            let _ = win.cancel_animation_frame(handle);
        }
    }
}

/// setTimeout-backed one-shot timer.
struct WebTimer;

impl Timer for WebTimer {
    fn set_timeout(&self, delay_ms: u32, cb: Box<dyn FnOnce()>) -> TimeoutHandle {
        let Some(win) = window() else { return 0 };
        let f = Closure::once_into_js(move || cb());
        win.set_timeout_with_callback_and_timeout_and_arguments_0(
            f.unchecked_ref(),
            delay_ms as i32,
        )
        .unwrap_or(0)
    }

    fn clear_timeout(&self, handle: TimeoutHandle) {
        if let Some(win) = window() {
            win.clear_timeout_with_handle(handle);
        }
    }
}

/// Window resize plus canvas click streams. Click coordinates are
/// translated into canvas-local space before being handed over.
struct WebEvents {
    canvas: Option<HtmlCanvasElement>,
}

impl Events for WebEvents {
    fn on_resize(&self, mut cb: Box<dyn FnMut()>) -> Subscription {
        let Some(win) = window() else {
            return Subscription::empty();
        };
        let closure = Closure::wrap(Box::new(move || cb()) as Box<dyn FnMut()>);
        if win
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .is_err()
        {
            return Subscription::empty();
        }
        Subscription::new(move || {
            if let Some(win) = window() {
                let _ = win
                    .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            }
        })
    }

    fn on_click(&self, mut cb: Box<dyn FnMut(f32, f32)>) -> Subscription {
        let Some(canvas) = self.canvas.clone() else {
            return Subscription::empty();
        };
        let target = canvas.clone();
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let rect = target.get_bounding_client_rect();
            let x = event.client_x() as f64 - rect.left();
            let y = event.client_y() as f64 - rect.top();
            cb(x as f32, y as f32);
        }) as Box<dyn FnMut(MouseEvent)>);
        if canvas
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .is_err()
        {
            return Subscription::empty();
        }
        Subscription::new(move || {
            let _ = canvas
                .remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        })
    }
}

/// A 2D canvas as the drawing surface.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    /// None when the 2D context is unavailable; the field then never
    /// starts, which is the intended degraded mode.
    fn acquire(canvas: HtmlCanvasElement) -> Option<Self> {
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;
        Some(Self { canvas, ctx })
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (u32, u32) {
        // re-read the layout box and keep the backing buffer in step
        let rect = self.canvas.get_bounding_client_rect();
        let w = rect.width().max(0.0) as u32;
        let h = rect.height().max(0.0) as u32;
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        (w, h)
    }

    fn present(&mut self, frame: &Frame) {
        if frame.is_empty() {
            return;
        }
        let data = wasm_bindgen::Clamped(frame.bytes());
        if let Ok(image) =
            ImageData::new_with_u8_clamped_array_and_sh(data, frame.width(), frame.height())
        {
            let _ = self.ctx.put_image_data(&image, 0.0, 0.0);
        }
    }
}

fn init_page_hooks() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Warn);
    });
}

fn lookup_canvas(id: &str) -> Option<HtmlCanvasElement> {
    window()?
        .document()?
        .get_element_by_id(id)?
        .dyn_into()
        .ok()
}

/// The particle background as seen from the page script.
#[wasm_bindgen]
pub struct EmberField {
    controller: FieldController,
}

#[wasm_bindgen]
impl EmberField {
    /// Mount onto the canvas with the given id. Pass 0 or an empty
    /// string to fall back to a default. If the canvas or its 2D context
    /// is missing the handle is inert and the page stays static.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas_id: &str,
        particle_count: u32,
        particle_color: &str,
        connection_color: &str,
    ) -> EmberField {
        init_page_hooks();

        let config = FieldConfig::from_css(particle_count as usize, particle_color, connection_color);
        let canvas = lookup_canvas(canvas_id);
        let surface = canvas
            .clone()
            .and_then(CanvasSurface::acquire)
            .map(|s| Box::new(s) as Box<dyn Surface>);
        let host = Host {
            scheduler: Rc::new(WebScheduler),
            timer: Rc::new(WebTimer),
            events: Rc::new(WebEvents { canvas }),
        };
        let rng = Box::new(XorShift32::new(js_sys::Date::now() as u32));

        EmberField {
            controller: FieldController::mount(host, surface, config, rng),
        }
    }

    pub fn mounted(&self) -> bool {
        self.controller.mounted()
    }

    /// Spawn a burst at canvas-local coordinates, for hosts that route
    /// pointer input themselves.
    pub fn burst_at(&self, x: f32, y: f32) {
        self.controller.burst_at(x, y);
    }

    pub fn unmount(&mut self) {
        self.controller.unmount();
    }

    pub fn width(&self) -> u32 {
        self.controller
            .with_field(|f| f.frame().width())
            .unwrap_or(0)
    }

    pub fn height(&self) -> u32 {
        self.controller
            .with_field(|f| f.frame().height())
            .unwrap_or(0)
    }

    /// Raw RGBA buffer access for hosts that blit themselves.
    pub fn buffer_ptr(&self) -> *const u8 {
        self.controller
            .with_field(|f| f.frame().ptr())
            .unwrap_or(std::ptr::null())
    }

    pub fn buffer_len(&self) -> usize {
        self.controller.with_field(|f| f.frame().len()).unwrap_or(0)
    }
}
