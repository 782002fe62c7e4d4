use std::cell::RefCell;
use std::rc::Rc;

use sphere_core::GalleryController;
use wasm_bindgen::closure::{Closure, WasmClosure};
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::dom;
use crate::input;
use crate::overlay;
use crate::render::GpuState;

pub struct InputWiring {
    pub window: web::Window,
    pub document: web::Document,
    pub canvas: web::HtmlCanvasElement,
    pub gallery: Rc<RefCell<GalleryController>>,
    pub gpu: Rc<RefCell<Option<GpuState>>>,
}

pub fn wire_input_handlers(w: &InputWiring) {
    wire_pointer(w);
    wire_touch(w);
    wire_resize(w);
    wire_keydown(w);
    wire_start_button(w);
}

fn listen<T>(target: &web::EventTarget, kind: &str, closure: Closure<T>)
where
    T: ?Sized + WasmClosure,
{
    if let Err(e) = target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
    {
        log::warn!("[dom] could not listen for {}: {:?}", kind, e);
    }
    closure.forget();
}

fn wire_pointer(w: &InputWiring) {
    // mousemove on window: the absolute mapping spans the whole window width
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            gallery.borrow_mut().pointer_move(input::mouse_client(&ev));
        }) as Box<dyn FnMut(_)>);
        listen(&w.window, "mousemove", closure);
    }

    // click (and synthetic tap click): focus, or close when outside the focused tile
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::MouseEvent| {
            gallery.borrow_mut().click(input::mouse_client(&ev));
        }) as Box<dyn FnMut(_)>);
        listen(&w.canvas, "click", closure);
    }
}

fn wire_touch(w: &InputWiring) {
    // touchstart
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
            if let Some(p) = input::first_touch_client(&ev) {
                gallery.borrow_mut().touch_start(p, ev.time_stamp());
            }
        }) as Box<dyn FnMut(_)>);
        listen(&w.canvas, "touchstart", closure);
    }

    // touchmove
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
            let Some(p) = input::first_touch_client(&ev) else {
                return;
            };
            let mut g = gallery.borrow_mut();
            if g.is_touching() {
                ev.prevent_default();
            }
            g.touch_move(p);
        }) as Box<dyn FnMut(_)>);
        listen(&w.canvas, "touchmove", closure);
    }

    // touchend
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move |ev: web::TouchEvent| {
            gallery.borrow_mut().touch_end(ev.time_stamp());
        }) as Box<dyn FnMut(_)>);
        listen(&w.canvas, "touchend", closure);
    }

    // touchcancel: the browser took the sequence over; no tap, no drag
    {
        let gallery = w.gallery.clone();
        let closure = Closure::wrap(Box::new(move || {
            gallery.borrow_mut().touch_cancel();
        }) as Box<dyn FnMut()>);
        listen(&w.canvas, "touchcancel", closure);
    }
}

fn wire_resize(w: &InputWiring) {
    let gallery = w.gallery.clone();
    let gpu = w.gpu.clone();
    let canvas = w.canvas.clone();
    let window = w.window.clone();
    let closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas);
        if let Some(gpu) = gpu.borrow_mut().as_mut() {
            gpu.resize_if_needed(canvas.width(), canvas.height());
        }
        gallery
            .borrow_mut()
            .resize(input::viewport_for(&window, &canvas));
    }) as Box<dyn FnMut()>);
    listen(&w.window, "resize", closure);
}

fn wire_keydown(w: &InputWiring) {
    let gallery = w.gallery.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.key() == "Escape" && gallery.borrow_mut().close() {
            ev.prevent_default();
        }
    }) as Box<dyn FnMut(_)>);
    listen(&w.window, "keydown", closure);
}

fn wire_start_button(w: &InputWiring) {
    let gallery = w.gallery.clone();
    let document = w.document.clone();
    dom::add_click_listener(&w.document, "start-button", move || {
        if gallery.borrow_mut().start() {
            overlay::show_revealed(&document);
        } else {
            log::warn!("[reveal] already revealed; ignoring extra click");
        }
    });
}
