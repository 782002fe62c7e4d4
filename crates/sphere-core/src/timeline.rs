//! Shared-clock animation timelines.
//!
//! A [`Timeline`] is a list of [`Track`]s, each animating one property with
//! its own delay, duration and easing. Tiles never animate themselves: the
//! [`Choreographer`] advances every running timeline and writes the resolved
//! values into the [`Scene`].
//!
//! Each timeline *claims* what it writes. At most one running timeline owns
//! a claim; starting another over the same claim fast-forwards the old one to
//! its end first, so its completion effects always happen.

use fnv::{FnvHashMap, FnvHashSet};
use glam::{Quat, Vec3};
use smallvec::SmallVec;

use crate::camera::Camera;
use crate::easing::Ease;
use crate::rotation::YawPitch;
use crate::tile::{TileId, TileRegistry};
use crate::transform::SphereGroup;

/// Everything timelines can write to.
#[derive(Clone, Debug)]
pub struct Scene {
    pub tiles: TileRegistry,
    pub camera: Option<Camera>,
    pub group: SphereGroup,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Claim {
    Tile(TileId),
    Camera,
    Group,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Property {
    Opacity { tile: TileId, from: f32, to: f32 },
    Position { tile: TileId, from: Vec3, to: Vec3 },
    Scale { tile: TileId, from: Vec3, to: Vec3 },
    /// Slerped over a single progress value, never per axis.
    Orientation { tile: TileId, from: Quat, to: Quat },
    CameraEye { from: Vec3, to: Vec3 },
    GroupRotation { from: YawPitch, to: YawPitch },
}

impl Property {
    pub fn claim(&self) -> Claim {
        match *self {
            Property::Opacity { tile, .. }
            | Property::Position { tile, .. }
            | Property::Scale { tile, .. }
            | Property::Orientation { tile, .. } => Claim::Tile(tile),
            Property::CameraEye { .. } => Claim::Camera,
            Property::GroupRotation { .. } => Claim::Group,
        }
    }

    /// Write the value at eased progress `e`. `e >= 1` writes `to` exactly.
    fn write(&self, e: f32, scene: &mut Scene) {
        let done = e >= 1.0;
        match *self {
            Property::Opacity { tile, from, to } => {
                if let Some(t) = scene.tiles.get_mut(tile) {
                    t.opacity = if done { to } else { from + (to - from) * e };
                }
            }
            Property::Position { tile, from, to } => {
                if let Some(t) = scene.tiles.get_mut(tile) {
                    t.transform.position = if done { to } else { from.lerp(to, e) };
                }
            }
            Property::Scale { tile, from, to } => {
                if let Some(t) = scene.tiles.get_mut(tile) {
                    t.transform.scale = if done { to } else { from.lerp(to, e) };
                }
            }
            Property::Orientation { tile, from, to } => {
                if let Some(t) = scene.tiles.get_mut(tile) {
                    t.transform.orientation = if done { to } else { from.slerp(to, e) };
                }
            }
            Property::CameraEye { from, to } => {
                if let Some(cam) = scene.camera.as_mut() {
                    cam.eye = if done { to } else { from.lerp(to, e) };
                }
            }
            Property::GroupRotation { from, to } => {
                scene.group.rotation = if done { to } else { from.lerp(to, e) };
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    pub property: Property,
    /// Start offset on the timeline clock, seconds.
    pub delay: f32,
    pub duration: f32,
    pub ease: Ease,
}

impl Track {
    pub fn new(property: Property, delay: f32, duration: f32, ease: Ease) -> Self {
        Self {
            property,
            delay,
            duration,
            ease,
        }
    }

    pub fn end(&self) -> f32 {
        self.delay + self.duration.max(0.0)
    }

    /// Raw (un-eased) progress in \[0, 1\] at `elapsed`.
    pub fn progress(&self, elapsed: f32) -> f32 {
        if self.duration <= 0.0 {
            return if elapsed >= self.delay { 1.0 } else { 0.0 };
        }
        ((elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
    }

    fn apply(&self, elapsed: f32, scene: &mut Scene) {
        let p = self.progress(elapsed);
        let e = if p >= 1.0 { 1.0 } else { self.ease.apply(p) };
        self.property.write(e, scene);
    }
}

/// What a timeline does; reported back when it completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimelineKind {
    Reveal,
    FocusIn(TileId),
    FocusOut(TileId),
}

#[derive(Clone, Debug)]
pub struct Timeline {
    kind: TimelineKind,
    tracks: Vec<Track>,
    elapsed: f32,
    rendered: bool,
}

impl Timeline {
    pub fn new(kind: TimelineKind) -> Self {
        Self {
            kind,
            tracks: Vec::new(),
            elapsed: 0.0,
            rendered: false,
        }
    }

    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    pub fn kind(&self) -> TimelineKind {
        self.kind
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn duration(&self) -> f32 {
        self.tracks.iter().map(Track::end).fold(0.0, f32::max)
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    pub fn claims(&self) -> FnvHashSet<Claim> {
        self.tracks.iter().map(|t| t.property.claim()).collect()
    }

    /// Claims whose every track has ended at the current clock.
    pub fn finished_claims(&self) -> FnvHashSet<Claim> {
        let mut finished = self.claims();
        for track in self.tracks.iter().filter(|t| t.end() > self.elapsed) {
            finished.remove(&track.property.claim());
        }
        finished
    }

    /// Move the clock to `elapsed` and write the tracks still in play. The
    /// first seek writes every track; later seeks skip tracks that had
    /// already ended, so a released claim is left to its next writer.
    pub fn seek(&mut self, elapsed: f32, scene: &mut Scene) {
        let prev = self.elapsed;
        let first = !self.rendered;
        self.elapsed = elapsed.max(0.0);
        self.rendered = true;
        for track in &self.tracks {
            if first || track.end() > prev {
                track.apply(self.elapsed, scene);
            }
        }
    }
}

pub type Completed = SmallVec<[TimelineKind; 2]>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct TimelineId(u32);

/// Runs timelines against a scene and enforces single ownership of claims.
#[derive(Debug, Default)]
pub struct Choreographer {
    running: Vec<(TimelineId, Timeline)>,
    owners: FnvHashMap<Claim, TimelineId>,
    next_id: u32,
}

impl Choreographer {
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    pub fn is_claimed(&self, claim: Claim) -> bool {
        self.owners.contains_key(&claim)
    }

    pub fn is_running(&self, kind: TimelineKind) -> bool {
        self.running.iter().any(|(_, t)| t.kind() == kind)
    }

    pub fn running(&self) -> impl Iterator<Item = &Timeline> {
        self.running.iter().map(|(_, t)| t)
    }

    /// Fast-forward every running timeline that owns one of `claims`.
    /// Returns the finished kinds in start order.
    pub fn settle(&mut self, claims: &FnvHashSet<Claim>, scene: &mut Scene) -> Completed {
        let mut conflicting: Vec<TimelineId> = claims
            .iter()
            .filter_map(|c| self.owners.get(c).copied())
            .collect();
        conflicting.sort_by_key(|id| id.0);
        conflicting.dedup();
        let mut done = Completed::new();
        for id in conflicting {
            if let Some(pos) = self.running.iter().position(|(rid, _)| *rid == id) {
                let (_, mut timeline) = self.running.remove(pos);
                let end = timeline.duration();
                timeline.seek(end, scene);
                self.release(id);
                log::debug!("[timeline] fast-forwarded {:?}", timeline.kind());
                done.push(timeline.kind());
            }
        }
        done
    }

    /// Take ownership of the timeline's claims and render it at time zero.
    /// Anything still owning those claims is fast-forwarded and reported.
    pub fn start(&mut self, mut timeline: Timeline, scene: &mut Scene) -> Completed {
        let claims = timeline.claims();
        let done = self.settle(&claims, scene);
        let id = TimelineId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        for claim in claims {
            self.owners.insert(claim, id);
        }
        timeline.seek(0.0, scene);
        log::debug!(
            "[timeline] started {:?} ({} tracks, {:.2}s)",
            timeline.kind(),
            timeline.tracks().len(),
            timeline.duration()
        );
        self.running.push((id, timeline));
        done
    }

    /// Advance all timelines by `dt` seconds; returns the ones that finished.
    pub fn advance(&mut self, dt: f32, scene: &mut Scene) -> Completed {
        let mut done = Completed::new();
        let mut finished_ids: SmallVec<[TimelineId; 2]> = SmallVec::new();
        for (id, timeline) in self.running.iter_mut() {
            let next = timeline.elapsed() + dt.max(0.0);
            timeline.seek(next, scene);
            if timeline.is_finished() {
                finished_ids.push(*id);
                done.push(timeline.kind());
            } else {
                for claim in timeline.finished_claims() {
                    if self.owners.get(&claim) == Some(&*id) {
                        self.owners.remove(&claim);
                    }
                }
            }
        }
        if !finished_ids.is_empty() {
            self.running.retain(|(id, _)| !finished_ids.contains(id));
            for id in finished_ids {
                self.release(id);
            }
        }
        done
    }

    fn release(&mut self, id: TimelineId) {
        self.owners.retain(|_, owner| *owner != id);
    }
}
