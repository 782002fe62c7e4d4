// Sphere layout and tile registry construction.

use glam::Vec3;
use sphere_core::config::GalleryConfig;
use sphere_core::layout::{facing_center, fibonacci_sphere, generate, GOLDEN_ANGLE};
use sphere_core::tile::{PlaceholderSurfaces, TileId, TileRegistry};

const EPS: f32 = 1e-4;

#[test]
fn golden_angle_matches_closed_form() {
    let expected = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    assert!((GOLDEN_ANGLE - expected).abs() < 1e-6);
}

#[test]
fn points_are_reproducible_and_on_the_sphere() {
    for n in [2usize, 3, 10, 36, 101] {
        let a = fibonacci_sphere(n, 15.0);
        let b = fibonacci_sphere(n, 15.0);
        assert_eq!(a, b, "n={n} not reproducible");
        assert_eq!(a.len(), n);
        for p in &a {
            assert!((p.length() - 15.0).abs() < 1e-3, "n={n}: |{p}| != 15");
        }
    }
}

#[test]
fn sweep_runs_from_north_to_south_pole() {
    let pts = fibonacci_sphere(36, 15.0);
    assert!((pts[0].y - 15.0).abs() < EPS);
    assert!((pts[35].y + 15.0).abs() < EPS);
    // y decreases monotonically along the sweep
    for w in pts.windows(2) {
        assert!(w[1].y < w[0].y);
    }
}

#[test]
fn single_point_sits_at_the_north_pole() {
    let pts = fibonacci_sphere(1, 4.0);
    assert_eq!(pts, vec![Vec3::new(0.0, 4.0, 0.0)]);
}

#[test]
fn zero_points_is_empty() {
    assert!(fibonacci_sphere(0, 4.0).is_empty());
}

#[test]
fn second_point_is_turned_by_the_golden_angle() {
    let pts = fibonacci_sphere(5, 1.0);
    let p = pts[1];
    let theta = p.z.atan2(p.x);
    let expected = GOLDEN_ANGLE.sin().atan2(GOLDEN_ANGLE.cos());
    assert!((theta - expected).abs() < EPS);
}

#[test]
fn resting_orientation_faces_the_centre() {
    for p in generate(36, 15.0, 0.12) {
        let forward = p.orientation * Vec3::Z;
        let inward = -p.position.normalize();
        assert!(
            forward.dot(inward) > 0.9999,
            "tile at {} faces {}",
            p.position,
            forward
        );
        assert!((p.orientation.length() - 1.0).abs() < EPS);
    }
}

#[test]
fn poles_still_get_a_defined_orientation() {
    let q = facing_center(Vec3::new(0.0, 15.0, 0.0));
    assert!(q.is_finite());
    assert!((q * Vec3::Z).dot(-Vec3::Y) > 0.999);
}

#[test]
fn equatorial_band_is_tagged_by_height() {
    let points = generate(36, 15.0, 0.12);
    let band = 15.0 * 0.12;
    assert!(points.iter().any(|p| p.equatorial));
    for p in &points {
        assert_eq!(p.equatorial, p.position.y.abs() <= band);
    }
}

#[test]
fn registry_assigns_images_by_band() {
    let config = GalleryConfig::default();
    let points = generate(config.tile_count, config.radius, config.equator_band_fraction);
    let tiles = TileRegistry::from_layout(&points, &config, &mut PlaceholderSurfaces::default());
    assert_eq!(tiles.len(), 36);
    let equator = config.equator_image.clone().unwrap();
    for t in tiles.iter() {
        let image = t.image.as_deref().unwrap();
        if t.equatorial {
            assert_eq!(image, equator);
        } else {
            assert_ne!(image, equator);
        }
    }
}

#[test]
fn registry_tiles_start_hidden_at_rest() {
    let config = GalleryConfig::default();
    let points = generate(8, 5.0, 0.12);
    let tiles = TileRegistry::from_layout(&points, &config, &mut PlaceholderSurfaces::default());
    for (i, t) in tiles.iter().enumerate() {
        assert_eq!(t.id, TileId(i as u32));
        assert_eq!(t.opacity, 0.0);
        assert_eq!(t.transform, t.base_transform());
        assert!(t.depth_test);
        assert_eq!(t.draw_order, 0);
        assert!(t.image_aspect().is_none());
    }
    // Surface handles are unique per tile.
    let mut handles: Vec<_> = tiles.iter().map(|t| t.surface.0).collect();
    handles.dedup();
    assert_eq!(handles.len(), 8);
}

#[test]
fn image_aspect_is_set_once() {
    let config = GalleryConfig::default();
    let points = generate(2, 5.0, 0.12);
    let mut tiles = TileRegistry::from_layout(&points, &config, &mut PlaceholderSurfaces::default());
    let t = tiles.get_mut(TileId(0)).unwrap();
    assert!((t.presentation_aspect() - 2.5 / 3.5).abs() < EPS);
    assert!(!t.set_image_dimensions(0, 100));
    assert!(t.set_image_dimensions(200, 100));
    assert!(!t.set_image_dimensions(100, 200));
    assert_eq!(t.image_aspect(), Some(2.0));
    assert_eq!(t.presentation_aspect(), 2.0);
}
