pub mod camera;
pub mod choreography;
pub mod config;
pub mod constants;
pub mod controller;
pub mod easing;
pub mod error;
pub mod focus;
pub mod gesture;
pub mod hit;
pub mod layout;
pub mod rotation;
pub mod tile;
pub mod timeline;
pub mod transform;

#[cfg(feature = "gpu")]
pub mod gpu;

pub static TILES_WGSL: &str = include_str!("../shaders/tiles.wgsl");

pub use camera::{Camera, SurfaceRect, Viewport};
pub use config::{FocusFractions, GalleryConfig};
pub use controller::{FocusStage, GalleryController, Phase, Selection};
pub use easing::{Ease, EasingSet};
pub use error::{AssetError, ConfigError};
pub use gesture::{GestureInterpreter, TouchKind, TouchOutcome};
pub use hit::{Hit, HitTester, Hits, Ray, RayHitTester};
pub use rotation::{RotationIntegrator, YawPitch};
pub use tile::{PlaceholderSurfaces, SurfaceFactory, SurfaceHandle, Tile, TileId, TileRegistry};
pub use timeline::{Choreographer, Claim, Scene, Timeline, TimelineKind};
pub use transform::{SphereGroup, Transform};
