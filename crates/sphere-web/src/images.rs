//! Fire-and-forget image loading through `HtmlImageElement`.
//!
//! Each distinct URL is fetched once. On load the pixels are read back
//! through a 2D canvas and uploaded to every tile using that URL; failures
//! are logged and the tiles keep their placeholder.

use std::cell::RefCell;
use std::rc::Rc;

use fnv::FnvHashMap;
use sphere_core::{AssetError, GalleryController, TileId};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

use crate::render::GpuState;

pub fn load_all(
    document: &web::Document,
    gallery: &Rc<RefCell<GalleryController>>,
    gpu: &Rc<RefCell<Option<GpuState>>>,
) {
    let mut by_url: FnvHashMap<String, Vec<TileId>> = FnvHashMap::default();
    for (tile, url) in gallery.borrow().tiles().image_requests() {
        by_url.entry(url).or_default().push(tile);
    }
    log::info!("[image] loading {} distinct images", by_url.len());
    for (url, tiles) in by_url {
        if let Err(e) = load_one(document, url.clone(), tiles, gallery.clone(), gpu.clone()) {
            log::warn!("[image] {}", e);
        }
    }
}

fn load_one(
    document: &web::Document,
    url: String,
    tiles: Vec<TileId>,
    gallery: Rc<RefCell<GalleryController>>,
    gpu: Rc<RefCell<Option<GpuState>>>,
) -> Result<(), AssetError> {
    let img = web::HtmlImageElement::new().map_err(|e| AssetError::Load {
        url: url.clone(),
        reason: format!("{:?}", e),
    })?;
    img.set_cross_origin(Some("anonymous"));

    let onload = {
        let img = img.clone();
        let document = document.clone();
        let url = url.clone();
        Closure::wrap(Box::new(move || {
            if let Err(e) = on_loaded(&document, &img, &url, &tiles, &gallery, &gpu) {
                log::warn!("[image] {}", e);
            }
        }) as Box<dyn FnMut()>)
    };
    let onerror = {
        let url = url.clone();
        Closure::wrap(Box::new(move || {
            log::warn!("[image] failed to load {}; keeping placeholder", url);
        }) as Box<dyn FnMut()>)
    };
    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    onload.forget();
    onerror.forget();
    img.set_src(&url);
    Ok(())
}

fn on_loaded(
    document: &web::Document,
    img: &web::HtmlImageElement,
    url: &str,
    tiles: &[TileId],
    gallery: &Rc<RefCell<GalleryController>>,
    gpu: &Rc<RefCell<Option<GpuState>>>,
) -> Result<(), AssetError> {
    let (w, h) = (img.natural_width(), img.natural_height());
    if w == 0 || h == 0 {
        return Err(AssetError::EmptyImage {
            url: url.to_string(),
        });
    }
    {
        let mut g = gallery.borrow_mut();
        for &tile in tiles {
            g.set_image_dimensions(tile, w, h);
        }
    }
    let mut gpu = gpu.borrow_mut();
    let Some(gpu) = gpu.as_mut() else {
        return Ok(());
    };
    let rgba = read_pixels(document, img, w, h).map_err(|reason| AssetError::Load {
        url: url.to_string(),
        reason,
    })?;
    let g = gallery.borrow();
    for &tile in tiles {
        let surface = g
            .tiles()
            .get(tile)
            .map(|t| t.surface)
            .ok_or(AssetError::UnknownTile(tile.0))?;
        gpu.upload_rgba(surface, w, h, &rgba)?;
    }
    log::debug!("[image] {} ({}x{}) -> {} tiles", url, w, h, tiles.len());
    Ok(())
}

/// Decode by drawing into a scratch 2D canvas and reading the RGBA back.
fn read_pixels(
    document: &web::Document,
    img: &web::HtmlImageElement,
    w: u32,
    h: u32,
) -> Result<Vec<u8>, String> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| format!("{:?}", e))?
        .dyn_into()
        .map_err(|e| format!("{:?}", e))?;
    canvas.set_width(w);
    canvas.set_height(h);
    let ctx: web::CanvasRenderingContext2d = canvas
        .get_context("2d")
        .map_err(|e| format!("{:?}", e))?
        .ok_or_else(|| "no 2d context".to_string())?
        .dyn_into()
        .map_err(|e| format!("{:?}", e))?;
    ctx.draw_image_with_html_image_element(img, 0.0, 0.0)
        .map_err(|e| format!("{:?}", e))?;
    let data = ctx
        .get_image_data(0.0, 0.0, w as f64, h as f64)
        .map_err(|e| format!("{:?}", e))?;
    Ok(data.data().0)
}
