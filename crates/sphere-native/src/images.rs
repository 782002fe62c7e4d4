//! Background image decoding. One worker thread per distinct image; results
//! come back over a channel drained by the event loop once per frame.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use fnv::FnvHashMap;
use sphere_core::{AssetError, TileId};

pub struct DecodedImage {
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub struct ImageResult {
    pub tiles: Vec<TileId>,
    pub image: Result<DecodedImage, AssetError>,
}

/// Gallery URLs are site-absolute (`/name.webp`); natively they resolve
/// against the images directory.
pub fn resolve(root: &Path, url: &str) -> PathBuf {
    root.join(url.trim_start_matches('/'))
}

pub fn spawn_decoders(root: &Path, requests: Vec<(TileId, String)>) -> Receiver<ImageResult> {
    let (tx, rx) = mpsc::channel();
    let mut by_url: FnvHashMap<String, Vec<TileId>> = FnvHashMap::default();
    for (tile, url) in requests {
        by_url.entry(url).or_default().push(tile);
    }
    log::info!("[image] decoding {} distinct images", by_url.len());
    for (url, tiles) in by_url {
        let path = resolve(root, &url);
        let tx = tx.clone();
        let spawned = thread::Builder::new()
            .name("image-decode".into())
            .spawn(move || decode_and_send(tx, url, path, tiles));
        if let Err(e) = spawned {
            log::warn!("[image] could not spawn decoder: {}", e);
        }
    }
    rx
}

fn decode_and_send(tx: Sender<ImageResult>, url: String, path: PathBuf, tiles: Vec<TileId>) {
    let image = decode(url, &path);
    // Receiver gone means the window closed; nothing to do.
    let _ = tx.send(ImageResult { tiles, image });
}

fn decode(url: String, path: &Path) -> Result<DecodedImage, AssetError> {
    let img = image::open(path)
        .map_err(|e| AssetError::Load {
            url: url.clone(),
            reason: e.to_string(),
        })?
        .to_rgba8();
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(AssetError::EmptyImage { url });
    }
    Ok(DecodedImage {
        url,
        width,
        height,
        rgba: img.into_raw(),
    })
}
