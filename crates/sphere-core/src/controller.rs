//! The gallery's single state owner.
//!
//! Frontends forward raw input and one `frame` call per animation frame; the
//! controller owns the phase, the selection, the rotation and every running
//! transition. Entry points that need a missing collaborator (no camera yet,
//! zero-sized viewport) do nothing.

use glam::Vec2;

use crate::camera::{Camera, Viewport};
use crate::choreography;
use crate::config::GalleryConfig;
use crate::constants::{FOCUS_DRAW_ORDER, TOUCH_DRIFT_PER_FRAME};
use crate::error::ConfigError;
use crate::focus::focus_target;
use crate::gesture::{pointer_yaw, GestureInterpreter, TouchOutcome};
use crate::hit::{HitTester, Hits, Ray, RayHitTester};
use crate::layout;
use crate::rotation::{idle_pose, RotationIntegrator};
use crate::tile::{SurfaceFactory, TileId, TileRegistry};
use crate::timeline::{Choreographer, Claim, Completed, Scene, TimelineKind};
use crate::transform::SphereGroup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Idle wobble behind the start button.
    Dormant,
    /// Interactive; entered once and never left.
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusStage {
    Entering,
    Settled,
    Leaving,
}

/// At most one focused tile. `Focused` holds from the start of focus-in until
/// focus-out completes, and doubles as the "modal open" gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Focused { tile: TileId, stage: FocusStage },
}

impl Selection {
    pub fn tile(&self) -> Option<TileId> {
        match *self {
            Selection::None => None,
            Selection::Focused { tile, .. } => Some(tile),
        }
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, Selection::None)
    }
}

pub struct GalleryController<H: HitTester = RayHitTester> {
    config: GalleryConfig,
    scene: Scene,
    viewport: Viewport,
    phase: Phase,
    selection: Selection,
    rotation: RotationIntegrator,
    gestures: GestureInterpreter,
    choreographer: Choreographer,
    hit_tester: H,
}

impl GalleryController<RayHitTester> {
    pub fn new(
        config: GalleryConfig,
        surfaces: &mut dyn SurfaceFactory,
    ) -> Result<Self, ConfigError> {
        Self::with_hit_tester(config, surfaces, RayHitTester)
    }
}

impl<H: HitTester> GalleryController<H> {
    pub fn with_hit_tester(
        config: GalleryConfig,
        surfaces: &mut dyn SurfaceFactory,
        hit_tester: H,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let points = layout::generate(config.tile_count, config.radius, config.equator_band_fraction);
        let tiles = TileRegistry::from_layout(&points, &config, surfaces);
        log::info!(
            "[layout] {} tiles on r={} ({} equatorial)",
            tiles.len(),
            config.radius,
            tiles.iter().filter(|t| t.equatorial).count()
        );
        Ok(Self {
            config,
            scene: Scene {
                tiles,
                camera: None,
                group: SphereGroup::default(),
            },
            viewport: Viewport::default(),
            phase: Phase::Dormant,
            selection: Selection::None,
            rotation: RotationIntegrator::default(),
            gestures: GestureInterpreter::default(),
            choreographer: Choreographer::default(),
            hit_tester,
        })
    }

    pub fn config(&self) -> &GalleryConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn tiles(&self) -> &TileRegistry {
        &self.scene.tiles
    }

    pub fn camera(&self) -> Option<&Camera> {
        self.scene.camera.as_ref()
    }

    pub fn group(&self) -> &SphereGroup {
        &self.scene.group
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn rotation(&self) -> &RotationIntegrator {
        &self.rotation
    }

    pub fn is_touching(&self) -> bool {
        self.gestures.is_touching()
    }

    pub fn is_animating(&self) -> bool {
        !self.choreographer.is_idle()
    }

    pub fn is_transition_running(&self, kind: TimelineKind) -> bool {
        self.choreographer.is_running(kind)
    }

    /// Install the camera. Its aspect follows the current viewport if known.
    pub fn attach_camera(&mut self, mut camera: Camera) {
        if let Some(aspect) = self.viewport.aspect() {
            camera.aspect = aspect;
        }
        self.scene.camera = Some(camera);
    }

    /// Idempotent; only touches the viewport and the camera aspect.
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        if let (Some(cam), Some(aspect)) = (self.scene.camera.as_mut(), viewport.aspect()) {
            cam.aspect = aspect;
        }
    }

    /// Records the loaded image's pixel size on a tile. First valid call wins.
    pub fn set_image_dimensions(&mut self, tile: TileId, width: u32, height: u32) -> bool {
        self.scene
            .tiles
            .get_mut(tile)
            .map(|t| t.set_image_dimensions(width, height))
            .unwrap_or(false)
    }

    /// `Dormant → Revealed`. Returns false when already revealed.
    pub fn start(&mut self) -> bool {
        if self.phase == Phase::Revealed {
            return false;
        }
        self.phase = Phase::Revealed;
        let timeline = choreography::reveal(&self.scene, &self.config.easing);
        let done = self.choreographer.start(timeline, &mut self.scene);
        self.complete(done);
        log::info!("[reveal] started with {} tiles", self.scene.tiles.len());
        true
    }

    /// Absolute pointer mapping; ignored before the reveal and while focused.
    pub fn pointer_move(&mut self, client: Vec2) {
        if self.phase != Phase::Revealed || self.selection.is_open() {
            return;
        }
        if let Some(yaw) = pointer_yaw(client.x, self.viewport.window.x) {
            self.rotation.set_target_yaw(yaw);
        }
    }

    pub fn touch_start(&mut self, client: Vec2, now_ms: f64) {
        if self.phase != Phase::Revealed || self.selection.is_open() {
            return;
        }
        self.gestures.touch_start(client, now_ms);
    }

    /// Relative touch mapping; accumulates into the target yaw.
    pub fn touch_move(&mut self, client: Vec2) {
        if !self.gestures.is_touching()
            || self.phase != Phase::Revealed
            || self.selection.is_open()
        {
            return;
        }
        if let Some(delta) = self.gestures.touch_move(client, self.viewport.window.x) {
            self.rotation.add_target_yaw(delta);
        }
    }

    /// Ends the touch sequence; a tap with nothing focused tries to focus.
    pub fn touch_end(&mut self, now_ms: f64) -> Option<TouchOutcome> {
        if self.phase != Phase::Revealed {
            return None;
        }
        let outcome = self.gestures.touch_end(now_ms)?;
        log::debug!("[touch] {:?}", outcome);
        if let TouchOutcome::Tap(point) = outcome {
            if !self.selection.is_open() {
                self.focus_at(point);
            }
        }
        Some(outcome)
    }

    /// The host aborted the touch sequence; it yields no outcome.
    pub fn touch_cancel(&mut self) {
        if self.gestures.is_touching() {
            log::debug!("[touch] cancelled");
        }
        self.gestures.cancel();
    }

    /// Click or synthetic tap. While focused, only an outside click does
    /// anything, and it closes the focus.
    pub fn click(&mut self, client: Vec2) {
        if let Some(focused) = self.selection.tile() {
            if self.scene.camera.is_none() {
                return;
            }
            let inside = self.hits_at(client).iter().any(|h| h.tile == focused);
            if !inside {
                self.close();
            }
            return;
        }
        self.focus_at(client);
    }

    fn ray_at(&self, client: Vec2) -> Option<Ray> {
        let cam = self.scene.camera.as_ref()?;
        let ndc = self.viewport.surface.to_ndc(client)?;
        Some(cam.ray_through_ndc(ndc))
    }

    /// All tiles under a client point, nearest first.
    pub fn hits_at(&self, client: Vec2) -> Hits {
        match self.ray_at(client) {
            Some(ray) => self
                .hit_tester
                .hits(ray, &self.scene.group, &self.scene.tiles),
            None => Hits::new(),
        }
    }

    pub fn pick(&self, client: Vec2) -> Option<TileId> {
        let ray = self.ray_at(client)?;
        self.hit_tester
            .nearest(ray, &self.scene.group, &self.scene.tiles)
            .map(|h| h.tile)
    }

    /// Focus whatever tile lies under the client point.
    pub fn focus_at(&mut self, client: Vec2) -> bool {
        if self.phase != Phase::Revealed || self.selection.is_open() {
            return false;
        }
        match self.pick(client) {
            Some(tile) => self.focus(tile),
            None => false,
        }
    }

    /// Begin focus-in on `tile`. No-op before the reveal, while anything is
    /// focused, or without a camera.
    pub fn focus(&mut self, tile: TileId) -> bool {
        if self.phase != Phase::Revealed
            || self.selection.is_open()
            || self.scene.camera.is_none()
            || self.scene.tiles.get(tile).is_none()
        {
            return false;
        }
        // The reveal may still own the tiles and the camera; finish it first.
        let claims = choreography::tile_claims(&self.scene, &[]);
        let done = self.choreographer.settle(&claims, &mut self.scene);
        self.complete(done);

        let (Some(cam), Some(t)) = (self.scene.camera.as_ref(), self.scene.tiles.get(tile)) else {
            return false;
        };
        let target = focus_target(t, &self.scene.group, cam, self.config.focus_fractions());
        let Some(timeline) =
            choreography::focus_in(&self.scene, tile, &target, &self.config.easing)
        else {
            return false;
        };
        if let Some(t) = self.scene.tiles.get_mut(tile) {
            t.depth_test = false;
            t.draw_order = FOCUS_DRAW_ORDER;
        }
        self.selection = Selection::Focused {
            tile,
            stage: FocusStage::Entering,
        };
        let done = self.choreographer.start(timeline, &mut self.scene);
        self.complete(done);
        log::info!(
            "[focus] tile {} -> {:.2}x{:.2} world units",
            tile,
            target.size.x,
            target.size.y
        );
        true
    }

    /// Begin focus-out. No-op when nothing is focused or it is already leaving.
    pub fn close(&mut self) -> bool {
        let Selection::Focused { tile, stage } = self.selection else {
            return false;
        };
        if stage == FocusStage::Leaving {
            return false;
        }
        let claims = choreography::tile_claims(&self.scene, &[]);
        let done = self.choreographer.settle(&claims, &mut self.scene);
        self.complete(done);

        let Some(timeline) = choreography::focus_out(&self.scene, tile, &self.config.easing) else {
            return false;
        };
        self.selection = Selection::Focused {
            tile,
            stage: FocusStage::Leaving,
        };
        let done = self.choreographer.start(timeline, &mut self.scene);
        self.complete(done);
        log::info!("[focus] tile {} closing", tile);
        true
    }

    /// One animation frame. `now_sec` is wall-clock time (drives the idle
    /// wobble); `dt_sec` advances the timelines.
    pub fn frame(&mut self, now_sec: f64, dt_sec: f32) {
        let done = self.choreographer.advance(dt_sec, &mut self.scene);
        self.complete(done);

        match self.phase {
            Phase::Dormant => {
                self.scene.group.rotation = idle_pose(now_sec);
            }
            Phase::Revealed => {
                if self.selection.is_open() || self.choreographer.is_claimed(Claim::Group) {
                    return;
                }
                if self.config.touch_device && !self.gestures.is_touching() {
                    self.rotation.add_target_yaw(TOUCH_DRIFT_PER_FRAME);
                }
                self.scene.group.rotation = self.rotation.step();
            }
        }
    }

    fn complete(&mut self, done: Completed) {
        for kind in done {
            match kind {
                TimelineKind::Reveal => log::info!("[reveal] complete"),
                TimelineKind::FocusIn(tile) => {
                    if self.selection
                        == (Selection::Focused {
                            tile,
                            stage: FocusStage::Entering,
                        })
                    {
                        self.selection = Selection::Focused {
                            tile,
                            stage: FocusStage::Settled,
                        };
                        log::debug!("[focus] tile {} settled", tile);
                    }
                }
                TimelineKind::FocusOut(tile) => {
                    if let Some(t) = self.scene.tiles.get_mut(tile) {
                        t.restore_base();
                        t.depth_test = true;
                        t.draw_order = 0;
                    }
                    if self.selection.tile() == Some(tile) {
                        self.selection = Selection::None;
                    }
                    log::debug!("[focus] tile {} released", tile);
                }
            }
        }
    }
}
