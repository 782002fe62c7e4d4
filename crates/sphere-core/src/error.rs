use thiserror::Error;

/// Rejected [`GalleryConfig`](crate::GalleryConfig) values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("tile count must be at least 1")]
    NoTiles,
    #[error("sphere radius must be positive and finite, got {0}")]
    Radius(f32),
    #[error("tile size must be positive, got {width}x{height}")]
    TileSize { width: f32, height: f32 },
    #[error("{name} must lie in (0, 1], got {value}")]
    Fraction { name: &'static str, value: f32 },
}

/// Image loading failures. Front ends log these and keep the placeholder.
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("image {url} has zero extent")]
    EmptyImage { url: String },
    #[error("failed to load {url}: {reason}")]
    Load { url: String, reason: String },
    #[error("no surface for tile {0}")]
    UnknownTile(u32),
}
