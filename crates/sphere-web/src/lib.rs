#![cfg(target_arch = "wasm32")]
use std::cell::RefCell;
use std::rc::Rc;

use sphere_core::{Camera, GalleryConfig, GalleryController, PlaceholderSurfaces};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod dom;
mod events;
mod frame;
mod images;
mod input;
mod overlay;
mod render;

const CANVAS_ID: &str = "gallery-canvas";

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("sphere-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", CANVAS_ID))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("{:?}", e)))?;

    // Match CSS size * devicePixelRatio before WebGPU acquires the canvas
    dom::sync_canvas_backing_size(&canvas);

    let touch_device = dom::is_touch_device(&window);
    let config = GalleryConfig::for_device(touch_device);
    log::info!(
        "[config] {} tiles, radius {}, touch={}",
        config.tile_count,
        config.radius,
        touch_device
    );

    let mut gpu = match render::GpuState::new(&canvas).await {
        Ok(gpu) => Some(gpu),
        Err(e) => {
            log::error!("[gpu] unavailable, running without rendering: {:?}", e);
            None
        }
    };
    let mut gallery = match gpu.as_mut() {
        Some(gpu) => GalleryController::new(config, &mut gpu.tiles)?,
        None => GalleryController::new(config, &mut PlaceholderSurfaces::default())?,
    };

    let viewport = input::viewport_for(&window, &canvas);
    gallery.resize(viewport);
    gallery.attach_camera(Camera::gallery(viewport.aspect().unwrap_or(1.0)));
    overlay::show_dormant(&document);

    let gallery = Rc::new(RefCell::new(gallery));
    let gpu = Rc::new(RefCell::new(gpu));

    events::wire_input_handlers(&events::InputWiring {
        window: window.clone(),
        document: document.clone(),
        canvas: canvas.clone(),
        gallery: gallery.clone(),
        gpu: gpu.clone(),
    });
    images::load_all(&document, &gallery, &gpu);

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext::new(gallery, gpu)));
    frame::start_loop(frame_ctx);
    Ok(())
}
