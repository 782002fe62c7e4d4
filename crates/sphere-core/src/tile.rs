use std::fmt;

use glam::{Quat, Vec2, Vec3};

use crate::config::GalleryConfig;
use crate::layout::LayoutPoint;
use crate::transform::Transform;

/// Dense index of a tile within its registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(pub u32);

impl TileId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Opaque reference to a quad owned by the renderer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceHandle(pub u32);

/// Renderer-side quad allocation.
pub trait SurfaceFactory {
    fn create_quad(&mut self, width: f32, height: f32) -> SurfaceHandle;
}

/// Hands out sequential handles without drawing anything. Used when no GPU is
/// available and in tests.
#[derive(Debug, Default)]
pub struct PlaceholderSurfaces {
    next: u32,
}

impl SurfaceFactory for PlaceholderSurfaces {
    fn create_quad(&mut self, _width: f32, _height: f32) -> SurfaceHandle {
        let handle = SurfaceHandle(self.next);
        self.next += 1;
        handle
    }
}

#[derive(Clone, Debug)]
pub struct Tile {
    pub id: TileId,
    pub surface: SurfaceHandle,
    pub base_position: Vec3,
    pub base_orientation: Quat,
    pub base_size: Vec2,
    pub equatorial: bool,
    pub image: Option<String>,
    image_aspect: Option<f32>,
    pub transform: Transform,
    pub opacity: f32,
    pub depth_test: bool,
    pub draw_order: i32,
}

impl Tile {
    pub fn image_aspect(&self) -> Option<f32> {
        self.image_aspect
    }

    /// Aspect used for the focused presentation; falls back to the quad's own.
    pub fn presentation_aspect(&self) -> f32 {
        self.image_aspect
            .unwrap_or(self.base_size.x / self.base_size.y)
    }

    /// Records the loaded image's aspect. Only the first valid call sticks.
    pub fn set_image_dimensions(&mut self, width: u32, height: u32) -> bool {
        if self.image_aspect.is_some() || width == 0 || height == 0 {
            return false;
        }
        self.image_aspect = Some(width as f32 / height as f32);
        true
    }

    pub fn base_transform(&self) -> Transform {
        Transform::new(self.base_position, self.base_orientation)
    }

    /// Snap back to the recorded resting transform, bit for bit.
    pub fn restore_base(&mut self) {
        self.transform = self.base_transform();
    }
}

#[derive(Clone, Debug, Default)]
pub struct TileRegistry {
    tiles: Vec<Tile>,
}

impl TileRegistry {
    /// Build one tile per layout point. Tiles start invisible, waiting for the reveal.
    pub fn from_layout(
        points: &[LayoutPoint],
        config: &GalleryConfig,
        surfaces: &mut dyn SurfaceFactory,
    ) -> Self {
        let others = config.off_equator_images();
        let tiles = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let image = if p.equatorial && config.equator_image.is_some() {
                    config.equator_image.clone()
                } else if others.is_empty() {
                    None
                } else {
                    Some(others[i % others.len()].to_string())
                };
                Tile {
                    id: TileId(i as u32),
                    surface: surfaces.create_quad(config.tile_size.x, config.tile_size.y),
                    base_position: p.position,
                    base_orientation: p.orientation,
                    base_size: config.tile_size,
                    equatorial: p.equatorial,
                    image,
                    image_aspect: None,
                    transform: Transform::new(p.position, p.orientation),
                    opacity: 0.0,
                    depth_test: true,
                    draw_order: 0,
                }
            })
            .collect();
        Self { tiles }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    pub fn get_mut(&mut self, id: TileId) -> Option<&mut Tile> {
        self.tiles.get_mut(id.index())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.tiles.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = TileId> + '_ {
        self.tiles.iter().map(|t| t.id)
    }

    /// `(tile, image)` pairs for the image loader.
    pub fn image_requests(&self) -> Vec<(TileId, String)> {
        self.tiles
            .iter()
            .filter_map(|t| t.image.clone().map(|url| (t.id, url)))
            .collect()
    }
}
