use glam::{Mat4, Vec2, Vec3};
use smallvec::SmallVec;

use crate::tile::{TileId, TileRegistry};
use crate::transform::SphereGroup;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Hit {
    pub tile: TileId,
    pub distance: f32,
    pub point: Vec3,
}

pub type Hits = SmallVec<[Hit; 4]>;

/// Ray picking against the tile set.
///
/// Ordering contract:
/// - The closest hit along the ray comes first.
/// - Equal distances resolve towards the lower `TileId`.
///
/// Implementations must not mutate anything; the same inputs give the same hits.
pub trait HitTester {
    fn hits(&self, ray: Ray, group: &SphereGroup, tiles: &TileRegistry) -> Hits;

    fn nearest(&self, ray: Ray, group: &SphereGroup, tiles: &TileRegistry) -> Option<Hit> {
        self.hits(ray, group, tiles).into_iter().next()
    }
}

/// Geometric picking: every tile is a two-sided rectangle in its local z = 0 plane.
/// Opacity and texture state are ignored.
#[derive(Clone, Copy, Debug, Default)]
pub struct RayHitTester;

impl HitTester for RayHitTester {
    fn hits(&self, ray: Ray, group: &SphereGroup, tiles: &TileRegistry) -> Hits {
        let group_m = group.world_matrix();
        let mut hits: Hits = tiles
            .iter()
            .filter_map(|tile| {
                let world = group_m * tile.transform.matrix();
                ray_quad(ray, world, tile.base_size).map(|t| Hit {
                    tile: tile.id,
                    distance: t,
                    point: ray.at(t),
                })
            })
            .collect();
        hits.sort_by(|a, b| {
            a.distance
                .total_cmp(&b.distance)
                .then_with(|| a.tile.cmp(&b.tile))
        });
        hits
    }
}

/// Distance along `ray` to a `size` rectangle centred on the local origin of
/// `world`, or `None` when the ray misses or points away.
#[inline]
pub fn ray_quad(ray: Ray, world: Mat4, size: Vec2) -> Option<f32> {
    if world.determinant().abs() <= f32::EPSILON {
        return None;
    }
    let inv = world.inverse();
    // Affine maps keep the ray parameter, so `t` is valid in world space too.
    let o = inv.transform_point3(ray.origin);
    let d = inv.transform_vector3(ray.dir);
    if d.z.abs() < 1e-9 {
        return None;
    }
    let t = -o.z / d.z;
    if t < 0.0 {
        return None;
    }
    let p = o + d * t;
    (p.x.abs() <= size.x * 0.5 && p.y.abs() <= size.y * 0.5).then_some(t)
}
