// common/ - Manually driven host fakes
//
// A stepped frame scheduler, a virtual-clock timer, a scripted event
// source, and a surface that records presents. Together they run the
// full mount lifecycle without a browser.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use ember_engine::host::{
    Events, FrameHandle, Host, Scheduler, Subscription, Surface, Timer, TimeoutHandle,
};
use ember_engine::render::Frame;

type Callback = Box<dyn FnOnce()>;

#[derive(Default)]
pub struct ManualScheduler {
    pending: RefCell<Vec<(FrameHandle, Callback)>>,
    next: Cell<FrameHandle>,
    cancelled: RefCell<Vec<FrameHandle>>,
}

impl ManualScheduler {
    /// Run every callback scheduled so far. Callbacks registered while
    /// stepping wait for the next step, like real frames do.
    pub fn step(&self) -> usize {
        let batch: Vec<_> = self.pending.borrow_mut().drain(..).collect();
        let n = batch.len();
        for (_, cb) in batch {
            cb();
        }
        n
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled.borrow().len()
    }
}

impl Scheduler for ManualScheduler {
    fn request_frame(&self, cb: Callback) -> FrameHandle {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.pending.borrow_mut().push((id, cb));
        id
    }

    fn cancel_frame(&self, handle: FrameHandle) {
        self.pending.borrow_mut().retain(|(id, _)| *id != handle);
        self.cancelled.borrow_mut().push(handle);
    }
}

#[derive(Default)]
pub struct ManualTimer {
    now: Cell<u64>,
    pending: RefCell<Vec<(TimeoutHandle, u64, Callback)>>,
    next: Cell<TimeoutHandle>,
}

impl ManualTimer {
    /// Advance the virtual clock, firing due timeouts in order.
    pub fn advance(&self, ms: u64) {
        let target = self.now.get() + ms;
        loop {
            let due = {
                let pending = self.pending.borrow();
                pending
                    .iter()
                    .enumerate()
                    .filter(|(_, (_, at, _))| *at <= target)
                    .min_by_key(|(_, (_, at, _))| *at)
                    .map(|(i, _)| i)
            };
            let Some(i) = due else { break };
            let (_, at, cb) = self.pending.borrow_mut().remove(i);
            self.now.set(at);
            cb();
        }
        self.now.set(target);
    }

    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }
}

impl Timer for ManualTimer {
    fn set_timeout(&self, delay_ms: u32, cb: Callback) -> TimeoutHandle {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.pending
            .borrow_mut()
            .push((id, self.now.get() + delay_ms as u64, cb));
        id
    }

    fn clear_timeout(&self, handle: TimeoutHandle) {
        self.pending.borrow_mut().retain(|(id, _, _)| *id != handle);
    }
}

type ResizeSlots = Rc<RefCell<Vec<(u32, Box<dyn FnMut()>)>>>;
type ClickSlots = Rc<RefCell<Vec<(u32, Box<dyn FnMut(f32, f32)>)>>>;

#[derive(Default)]
pub struct FakeEvents {
    resize: ResizeSlots,
    click: ClickSlots,
    next: Cell<u32>,
}

impl FakeEvents {
    pub fn emit_resize(&self) {
        let mut slots = std::mem::take(&mut *self.resize.borrow_mut());
        for (_, cb) in slots.iter_mut() {
            cb();
        }
        let mut current = self.resize.borrow_mut();
        slots.extend(std::mem::take(&mut *current));
        *current = slots;
    }

    pub fn emit_click(&self, x: f32, y: f32) {
        let mut slots = std::mem::take(&mut *self.click.borrow_mut());
        for (_, cb) in slots.iter_mut() {
            cb(x, y);
        }
        let mut current = self.click.borrow_mut();
        slots.extend(std::mem::take(&mut *current));
        *current = slots;
    }

    pub fn resize_listeners(&self) -> usize {
        self.resize.borrow().len()
    }

    pub fn click_listeners(&self) -> usize {
        self.click.borrow().len()
    }
}

impl Events for FakeEvents {
    fn on_resize(&self, cb: Box<dyn FnMut()>) -> Subscription {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.resize.borrow_mut().push((id, cb));
        let slots = Rc::clone(&self.resize);
        Subscription::new(move || slots.borrow_mut().retain(|(sid, _)| *sid != id))
    }

    fn on_click(&self, cb: Box<dyn FnMut(f32, f32)>) -> Subscription {
        let id = self.next.get() + 1;
        self.next.set(id);
        self.click.borrow_mut().push((id, cb));
        let slots = Rc::clone(&self.click);
        Subscription::new(move || slots.borrow_mut().retain(|(sid, _)| *sid != id))
    }
}

/// Surface fake: layout size lives in a shared cell so tests can change
/// it mid-run; presents are counted.
pub struct MemorySurface {
    pub size: Rc<Cell<(u32, u32)>>,
    pub presents: Rc<Cell<usize>>,
}

impl Surface for MemorySurface {
    fn size(&self) -> (u32, u32) {
        self.size.get()
    }

    fn present(&mut self, _frame: &Frame) {
        self.presents.set(self.presents.get() + 1);
    }
}

pub struct TestHost {
    pub host: Host,
    pub scheduler: Rc<ManualScheduler>,
    pub timer: Rc<ManualTimer>,
    pub events: Rc<FakeEvents>,
}

pub fn test_host() -> TestHost {
    let scheduler = Rc::new(ManualScheduler::default());
    let timer = Rc::new(ManualTimer::default());
    let events = Rc::new(FakeEvents::default());
    let host = Host {
        scheduler: Rc::clone(&scheduler) as Rc<dyn Scheduler>,
        timer: Rc::clone(&timer) as Rc<dyn Timer>,
        events: Rc::clone(&events) as Rc<dyn Events>,
    };
    TestHost {
        host,
        scheduler,
        timer,
        events,
    }
}

/// A surface plus the shared handles tests poke at.
pub fn memory_surface(w: u32, h: u32) -> (Box<dyn Surface>, Rc<Cell<(u32, u32)>>, Rc<Cell<usize>>) {
    let size = Rc::new(Cell::new((w, h)));
    let presents = Rc::new(Cell::new(0));
    let surface = MemorySurface {
        size: Rc::clone(&size),
        presents: Rc::clone(&presents),
    };
    (Box::new(surface), size, presents)
}
