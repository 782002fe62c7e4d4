// Controller behaviour driven headlessly: a scripted hit tester stands in
// for ray picking and placeholder surfaces stand in for the renderer.

use std::cell::Cell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use sphere_core::camera::{Camera, Viewport};
use sphere_core::config::GalleryConfig;
use sphere_core::constants::{DIMMED_OPACITY, FOCUS_DRAW_ORDER, TOUCH_DRIFT_PER_FRAME};
use sphere_core::controller::{FocusStage, GalleryController, Phase, Selection};
use sphere_core::error::ConfigError;
use sphere_core::gesture::TouchOutcome;
use sphere_core::hit::{Hit, HitTester, Hits, Ray};
use sphere_core::rotation::{idle_pose, YawPitch};
use sphere_core::tile::{PlaceholderSurfaces, TileId, TileRegistry};
use sphere_core::timeline::TimelineKind;
use sphere_core::transform::SphereGroup;

const DT: f32 = 1.0 / 60.0;
const CENTRE: Vec2 = Vec2::new(400.0, 300.0);

/// Reports whatever tile the test last scripted, for any ray.
#[derive(Clone, Default)]
struct ScriptedHits(Rc<Cell<Option<TileId>>>);

impl ScriptedHits {
    fn set(&self, tile: Option<u32>) {
        self.0.set(tile.map(TileId));
    }
}

impl HitTester for ScriptedHits {
    fn hits(&self, ray: Ray, _group: &SphereGroup, _tiles: &TileRegistry) -> Hits {
        let mut hits = Hits::new();
        if let Some(tile) = self.0.get() {
            hits.push(Hit {
                tile,
                distance: 1.0,
                point: ray.at(1.0),
            });
        }
        hits
    }
}

struct Rig {
    gallery: GalleryController<ScriptedHits>,
    hits: ScriptedHits,
    clock: f64,
}

impl Rig {
    fn new(config: GalleryConfig) -> Self {
        let hits = ScriptedHits::default();
        let mut gallery = GalleryController::with_hit_tester(
            config,
            &mut PlaceholderSurfaces::default(),
            hits.clone(),
        )
        .unwrap();
        gallery.resize(Viewport::fullscreen(800.0, 600.0));
        gallery.attach_camera(Camera::gallery(1.0));
        Self {
            gallery,
            hits,
            clock: 0.0,
        }
    }

    fn revealed(config: GalleryConfig) -> Self {
        let mut rig = Self::new(config);
        assert!(rig.gallery.start());
        rig.run(5.0);
        assert!(!rig.gallery.is_animating());
        rig
    }

    fn run(&mut self, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            self.clock += DT as f64;
            self.gallery.frame(self.clock, DT);
        }
    }

    fn focus_by_click(&mut self, tile: u32) {
        self.hits.set(Some(tile));
        self.gallery.click(CENTRE);
    }

    fn focused(tile: u32, stage: FocusStage) -> Selection {
        Selection::Focused {
            tile: TileId(tile),
            stage,
        }
    }
}

#[test]
fn invalid_config_is_rejected() {
    let config = GalleryConfig {
        tile_count: 0,
        ..GalleryConfig::default()
    };
    let result = GalleryController::new(config, &mut PlaceholderSurfaces::default());
    assert!(matches!(result, Err(ConfigError::NoTiles)));
}

#[test]
fn dormant_gallery_wobbles_and_ignores_input() {
    let mut rig = Rig::new(GalleryConfig::default());
    assert_eq!(rig.gallery.phase(), Phase::Dormant);
    rig.gallery.frame(1.0, DT);
    assert_eq!(rig.gallery.group().rotation, idle_pose(1.0));

    rig.gallery.pointer_move(Vec2::new(800.0, 10.0));
    assert_eq!(rig.gallery.rotation().target(), YawPitch::ZERO);
    rig.gallery.touch_start(CENTRE, 0.0);
    assert!(!rig.gallery.is_touching());
    assert_eq!(rig.gallery.touch_end(50.0), None);
    rig.focus_by_click(4);
    assert_eq!(rig.gallery.selection(), Selection::None);
    for t in rig.gallery.tiles().iter() {
        assert_eq!(t.opacity, 0.0);
    }
}

#[test]
fn idle_motion_stops_the_instant_the_reveal_starts() {
    let mut rig = Rig::new(GalleryConfig::default());
    rig.gallery.frame(1.0, DT);
    let pose = idle_pose(1.0);
    assert!(rig.gallery.start());
    rig.gallery.frame(2.0, 0.0);
    assert_eq!(rig.gallery.group().rotation, pose);
    assert_ne!(rig.gallery.group().rotation, idle_pose(2.0));
}

#[test]
fn reveal_shows_every_tile_and_pulls_the_camera_in() {
    let rig = Rig::revealed(GalleryConfig::default());
    assert_eq!(rig.gallery.phase(), Phase::Revealed);
    for t in rig.gallery.tiles().iter() {
        assert_eq!(t.opacity, 1.0);
        assert_eq!(t.transform.scale, Vec3::ONE);
    }
    assert_eq!(rig.gallery.camera().unwrap().eye, Vec3::new(0.0, 0.0, 12.0));
    assert_eq!(rig.gallery.group().rotation, YawPitch::ZERO);
}

#[test]
fn start_is_idempotent() {
    let mut once = Rig::new(GalleryConfig::default());
    let mut twice = Rig::new(GalleryConfig::default());
    assert!(once.gallery.start());
    assert!(twice.gallery.start());
    once.run(1.0);
    twice.run(1.0);
    assert!(!twice.gallery.start());
    assert!(twice.gallery.is_transition_running(TimelineKind::Reveal));
    once.run(4.0);
    twice.run(4.0);
    assert_eq!(once.gallery.phase(), twice.gallery.phase());
    assert_eq!(once.gallery.camera(), twice.gallery.camera());
    for (a, b) in once.gallery.tiles().iter().zip(twice.gallery.tiles().iter()) {
        assert_eq!(a.opacity, b.opacity);
        assert_eq!(a.transform, b.transform);
    }
}

#[test]
fn click_on_a_tile_focuses_it() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    assert_eq!(
        rig.gallery.selection(),
        Rig::focused(3, FocusStage::Entering)
    );
    let tile = rig.gallery.tiles().get(TileId(3)).unwrap();
    assert!(!tile.depth_test);
    assert_eq!(tile.draw_order, FOCUS_DRAW_ORDER);

    rig.run(1.2);
    assert_eq!(rig.gallery.selection(), Rig::focused(3, FocusStage::Settled));
    let tile = rig.gallery.tiles().get(TileId(3)).unwrap();
    assert_ne!(tile.transform.scale, Vec3::ONE);
    assert!(tile.transform.position.length() < 1e-4);
    for t in rig.gallery.tiles().iter().filter(|t| t.id != TileId(3)) {
        assert_eq!(t.opacity, DIMMED_OPACITY);
    }
}

#[test]
fn click_on_empty_space_does_nothing() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.hits.set(None);
    rig.gallery.click(CENTRE);
    assert_eq!(rig.gallery.selection(), Selection::None);
    assert!(!rig.gallery.is_animating());
}

#[test]
fn second_focus_is_ignored_while_focused() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    rig.run(1.2);
    let before = rig.gallery.selection();
    assert!(!rig.gallery.focus(TileId(5)));
    assert!(!rig.gallery.focus_at(CENTRE));
    assert_eq!(rig.gallery.selection(), before);
    assert_eq!(rig.gallery.tiles().get(TileId(5)).unwrap().opacity, DIMMED_OPACITY);
}

#[test]
fn click_inside_the_focused_tile_is_a_no_op() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    rig.run(1.2);
    rig.focus_by_click(3);
    assert_eq!(rig.gallery.selection(), Rig::focused(3, FocusStage::Settled));
    assert!(!rig.gallery.is_animating());
}

#[test]
fn outside_click_closes_and_restores_the_exact_base() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    rig.run(1.2);
    rig.focus_by_click(8);
    assert_eq!(rig.gallery.selection(), Rig::focused(3, FocusStage::Leaving));

    rig.run(1.0);
    assert_eq!(rig.gallery.selection(), Selection::None);
    let tile = rig.gallery.tiles().get(TileId(3)).unwrap();
    assert_eq!(tile.transform.orientation, tile.base_orientation);
    assert_eq!(tile.transform.position, tile.base_position);
    assert_eq!(tile.transform.scale, Vec3::ONE);
    assert!(tile.depth_test);
    assert_eq!(tile.draw_order, 0);
    for t in rig.gallery.tiles().iter() {
        assert_eq!(t.opacity, 1.0);
    }
}

#[test]
fn miss_while_focused_counts_as_outside() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    rig.run(1.2);
    rig.hits.set(None);
    rig.gallery.click(CENTRE);
    assert_eq!(rig.gallery.selection(), Rig::focused(3, FocusStage::Leaving));
}

#[test]
fn close_during_focus_in_finishes_it_first() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(6);
    rig.run(0.2);
    assert!(rig.gallery.close());
    assert_eq!(rig.gallery.selection(), Rig::focused(6, FocusStage::Leaving));
    assert!(!rig.gallery.is_transition_running(TimelineKind::FocusIn(TileId(6))));
    assert!(!rig.gallery.close());

    rig.run(1.0);
    assert_eq!(rig.gallery.selection(), Selection::None);
    let tile = rig.gallery.tiles().get(TileId(6)).unwrap();
    assert_eq!(tile.transform, tile.base_transform());
}

#[test]
fn close_with_nothing_focused_is_a_no_op() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    assert!(!rig.gallery.close());
    assert_eq!(rig.gallery.selection(), Selection::None);
}

#[test]
fn focus_during_the_reveal_finishes_the_reveal() {
    let mut rig = Rig::new(GalleryConfig::default());
    rig.gallery.start();
    rig.run(0.5);
    rig.focus_by_click(2);
    assert!(!rig.gallery.is_transition_running(TimelineKind::Reveal));
    assert_eq!(rig.gallery.camera().unwrap().eye, Vec3::new(0.0, 0.0, 12.0));
    rig.run(1.2);
    for t in rig.gallery.tiles().iter().filter(|t| t.id != TileId(2)) {
        assert_eq!(t.opacity, DIMMED_OPACITY);
        assert_eq!(t.transform.scale, Vec3::ONE);
    }
}

#[test]
fn missing_camera_or_surface_makes_picking_inert() {
    let hits = ScriptedHits::default();
    hits.set(Some(1));
    let mut gallery = GalleryController::with_hit_tester(
        GalleryConfig::default(),
        &mut PlaceholderSurfaces::default(),
        hits,
    )
    .unwrap();
    gallery.start();
    gallery.click(CENTRE);
    assert_eq!(gallery.selection(), Selection::None);

    // Camera, but no surface yet.
    gallery.attach_camera(Camera::gallery(1.0));
    gallery.click(CENTRE);
    assert_eq!(gallery.selection(), Selection::None);

    // Surface, but no camera.
    let hits = ScriptedHits::default();
    hits.set(Some(1));
    let mut gallery = GalleryController::with_hit_tester(
        GalleryConfig::default(),
        &mut PlaceholderSurfaces::default(),
        hits,
    )
    .unwrap();
    gallery.resize(Viewport::fullscreen(800.0, 600.0));
    gallery.start();
    assert!(!gallery.focus(TileId(1)));
    assert!(gallery.pick(CENTRE).is_none());
}

#[test]
fn unknown_tile_cannot_be_focused() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    assert!(!rig.gallery.focus(TileId(999)));
    assert_eq!(rig.gallery.selection(), Selection::None);
}

#[test]
fn pointer_sets_an_absolute_target() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.gallery.pointer_move(Vec2::new(800.0, 300.0));
    let first = rig.gallery.rotation().target();
    rig.gallery.pointer_move(Vec2::new(800.0, 120.0));
    assert_eq!(rig.gallery.rotation().target(), first);
    assert!((first.yaw - std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    rig.gallery.pointer_move(Vec2::new(200.0, 300.0));
    assert!((rig.gallery.rotation().target().yaw + std::f32::consts::FRAC_PI_4).abs() < 1e-6);
}

#[test]
fn touch_accumulates_a_relative_target() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.gallery.touch_start(Vec2::new(400.0, 300.0), 0.0);
    rig.gallery.touch_move(Vec2::new(480.0, 300.0));
    rig.gallery.touch_move(Vec2::new(560.0, 300.0));
    let yaw = rig.gallery.rotation().target().yaw;
    assert!((yaw - 0.2 * std::f32::consts::PI).abs() < 1e-5);
    // Moving back to the same x does not reset the target the way a pointer would.
    rig.gallery.touch_end(600.0);
    rig.gallery.touch_start(Vec2::new(560.0, 300.0), 1000.0);
    rig.gallery.touch_move(Vec2::new(560.0, 300.0));
    assert_eq!(rig.gallery.rotation().target().yaw, yaw);
}

#[test]
fn the_two_mappings_disagree_on_the_same_path() {
    let path = [200.0f32, 280.0, 360.0, 280.0];
    let mut pointer = Rig::revealed(GalleryConfig::default());
    let mut touch = Rig::revealed(GalleryConfig::default());
    touch.gallery.touch_start(Vec2::new(path[0], 300.0), 0.0);
    for &x in &path {
        pointer.gallery.pointer_move(Vec2::new(x, 300.0));
        touch.gallery.touch_move(Vec2::new(x, 300.0));
    }
    let p = pointer.gallery.rotation().target().yaw;
    let t = touch.gallery.rotation().target().yaw;
    // Pointer: only the final x matters, 280 of 800 is -0.3 of the half range.
    assert!((p + 0.3 * std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    // Touch: only the net travel matters, +80 px of 800 is 0.1 of a half turn.
    assert!((t - 0.1 * std::f32::consts::PI).abs() < 1e-5);
}

#[test]
fn quick_tap_focuses_and_drag_does_not() {
    let mut rig = Rig::revealed(GalleryConfig::for_device(true));
    rig.hits.set(Some(9));
    rig.gallery.touch_start(CENTRE, 0.0);
    rig.gallery.touch_move(CENTRE + Vec2::new(60.0, 0.0));
    assert_eq!(rig.gallery.touch_end(100.0), Some(TouchOutcome::Drag));
    assert_eq!(rig.gallery.selection(), Selection::None);

    rig.gallery.touch_start(CENTRE, 1000.0);
    rig.gallery.touch_move(CENTRE + Vec2::new(2.0, 3.0));
    assert!(matches!(
        rig.gallery.touch_end(1100.0),
        Some(TouchOutcome::Tap(_))
    ));
    assert_eq!(rig.gallery.selection(), Rig::focused(9, FocusStage::Entering));
}

#[test]
fn slow_press_is_not_a_tap() {
    let mut rig = Rig::revealed(GalleryConfig::for_device(true));
    rig.hits.set(Some(9));
    rig.gallery.touch_start(CENTRE, 0.0);
    assert_eq!(rig.gallery.touch_end(300.0), Some(TouchOutcome::Drag));
    assert_eq!(rig.gallery.selection(), Selection::None);
}

#[test]
fn input_is_frozen_while_focused() {
    let mut rig = Rig::revealed(GalleryConfig::for_device(true));
    rig.focus_by_click(3);
    let target = rig.gallery.rotation().target();
    let group = rig.gallery.group().rotation;
    rig.gallery.pointer_move(Vec2::new(10.0, 10.0));
    rig.gallery.touch_start(CENTRE, 0.0);
    rig.gallery.touch_move(CENTRE + Vec2::new(100.0, 0.0));
    rig.run(0.5);
    assert_eq!(rig.gallery.rotation().target(), target);
    assert_eq!(rig.gallery.group().rotation, group);
    assert!(!rig.gallery.is_touching());
}

#[test]
fn touch_devices_drift_unless_touching() {
    let mut rig = Rig::revealed(GalleryConfig::for_device(true));
    let before = rig.gallery.rotation().target().yaw;
    rig.run(DT);
    let after = rig.gallery.rotation().target().yaw;
    assert!((after - before - TOUCH_DRIFT_PER_FRAME).abs() < 1e-6);

    rig.gallery.touch_start(CENTRE, 0.0);
    rig.run(DT * 3.0);
    assert_eq!(rig.gallery.rotation().target().yaw, after);
}

#[test]
fn desktop_does_not_drift() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.run(1.0);
    assert_eq!(rig.gallery.rotation().target(), YawPitch::ZERO);
}

#[test]
fn rotation_stays_yaw_only_while_revealed() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.gallery.pointer_move(Vec2::new(700.0, 500.0));
    for _ in 0..200 {
        rig.run(DT);
        assert_eq!(rig.gallery.group().rotation.pitch, 0.0);
    }
    let target = rig.gallery.rotation().target().yaw;
    assert!((rig.gallery.group().rotation.yaw - target).abs() < 1e-3);
}

#[test]
fn focused_size_follows_the_loaded_image() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    assert!(rig.gallery.set_image_dimensions(TileId(3), 2000, 1000));
    assert!(!rig.gallery.set_image_dimensions(TileId(3), 10, 1000));
    assert!(!rig.gallery.set_image_dimensions(TileId(999), 10, 10));
    rig.focus_by_click(3);
    rig.run(1.2);
    let tile = rig.gallery.tiles().get(TileId(3)).unwrap();
    let size = tile.transform.scale.truncate() * tile.base_size;
    assert!((size.x / size.y - 2.0).abs() < 1e-3);
}

#[test]
fn resize_is_idempotent_and_leaves_selection_alone() {
    let mut rig = Rig::revealed(GalleryConfig::default());
    rig.focus_by_click(3);
    rig.run(1.2);
    let selection = rig.gallery.selection();
    let viewport = Viewport::fullscreen(1280.0, 720.0);
    rig.gallery.resize(viewport);
    let once = rig.gallery.camera().cloned();
    rig.gallery.resize(viewport);
    assert_eq!(rig.gallery.camera().cloned(), once);
    assert!((once.unwrap().aspect - 1280.0 / 720.0).abs() < 1e-6);
    assert_eq!(rig.gallery.viewport(), &viewport);
    assert_eq!(rig.gallery.selection(), selection);
    // Empty sizes keep the last good aspect.
    rig.gallery.resize(Viewport::fullscreen(0.0, 0.0));
    assert!((rig.gallery.camera().unwrap().aspect - 1280.0 / 720.0).abs() < 1e-6);
}

#[test]
fn attached_camera_takes_the_viewport_aspect() {
    let mut rig = Rig::new(GalleryConfig::default());
    rig.gallery.attach_camera(Camera::gallery(0.25));
    assert!((rig.gallery.camera().unwrap().aspect - 800.0 / 600.0).abs() < 1e-6);
}

#[test]
fn pointer_turns_the_sphere_once_the_reveal_lets_go_of_it() {
    let mut rig = Rig::new(GalleryConfig::default());
    assert!(rig.gallery.start());
    rig.run(2.0);
    assert!(rig.gallery.is_transition_running(TimelineKind::Reveal));
    rig.gallery.pointer_move(Vec2::new(800.0, 300.0));
    rig.run(1.0);
    assert!(rig.gallery.is_transition_running(TimelineKind::Reveal));
    let yaw = rig.gallery.group().rotation.yaw;
    assert!(yaw > 0.5, "group yaw {yaw} while the reveal finishes");
    assert_eq!(rig.gallery.group().rotation.pitch, 0.0);
}

#[test]
fn reveal_holds_the_sphere_while_its_rotation_track_runs() {
    let mut rig = Rig::new(GalleryConfig::default());
    assert!(rig.gallery.start());
    rig.gallery.pointer_move(Vec2::new(800.0, 300.0));
    rig.run(0.5);
    // Still easing from the idle pose towards zero, not towards the pointer.
    assert!(rig.gallery.group().rotation.yaw.abs() < 0.1);
}

#[test]
fn cancelled_touch_has_no_outcome_and_drift_resumes() {
    let mut rig = Rig::revealed(GalleryConfig::for_device(true));
    rig.hits.set(Some(4));
    rig.gallery.touch_start(CENTRE, 0.0);
    assert!(rig.gallery.is_touching());
    let held = rig.gallery.rotation().target().yaw;
    rig.run(DT * 3.0);
    assert_eq!(rig.gallery.rotation().target().yaw, held);

    rig.gallery.touch_cancel();
    assert!(!rig.gallery.is_touching());
    assert_eq!(rig.gallery.touch_end(50.0), None);
    assert_eq!(rig.gallery.selection(), Selection::None);

    rig.run(DT);
    let after = rig.gallery.rotation().target().yaw;
    assert!((after - held - TOUCH_DRIFT_PER_FRAME).abs() < 1e-6);
}
