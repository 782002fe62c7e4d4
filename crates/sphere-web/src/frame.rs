use std::cell::RefCell;
use std::rc::Rc;

use instant::Instant;
use sphere_core::GalleryController;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::render::GpuState;

/// Longest step fed to the controller; background-tab gaps are clamped.
const MAX_FRAME_DT_SEC: f32 = 0.1;

pub struct FrameContext {
    pub gallery: Rc<RefCell<GalleryController>>,
    pub gpu: Rc<RefCell<Option<GpuState>>>,
    pub last_instant: Instant,
    pub clock_sec: f64,
}

impl FrameContext {
    pub fn new(
        gallery: Rc<RefCell<GalleryController>>,
        gpu: Rc<RefCell<Option<GpuState>>>,
    ) -> Self {
        let now = Instant::now();
        Self {
            gallery,
            gpu,
            last_instant: now,
            clock_sec: 0.0,
        }
    }

    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt_sec = (now - self.last_instant)
            .as_secs_f32()
            .min(MAX_FRAME_DT_SEC);
        self.last_instant = now;
        self.clock_sec += dt_sec as f64;

        let mut gallery = self.gallery.borrow_mut();
        gallery.frame(self.clock_sec, dt_sec);

        let mut gpu = self.gpu.borrow_mut();
        let Some(gpu) = gpu.as_mut() else {
            return;
        };
        match gpu.render(gallery.scene()) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => gpu.recover(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("[gpu] out of memory; skipping frame");
            }
            Err(e) => log::warn!("[gpu] {:?}", e),
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx_tick.borrow_mut().frame();
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    let Some(w) = web::window() else {
        return;
    };
    if let Some(cb) = tick.borrow().as_ref() {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
