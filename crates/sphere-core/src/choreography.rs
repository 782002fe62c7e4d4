//! Builders for the three composite transitions: reveal, focus-in, focus-out.
//!
//! Each builder reads the scene's *current* values as `from`, so a timeline
//! started right after another one settles continues without a jump.

use fnv::FnvHashSet;
use glam::Vec3;

use crate::constants::{
    camera_work_eye, DIMMED_OPACITY, FOCUS_FADE_SEC, FOCUS_MOVE_SEC, REVEAL_CAMERA_SEC,
    REVEAL_FADE_AT_SEC, REVEAL_FADE_SEC, REVEAL_GROW_AT_SEC, REVEAL_GROW_SEC,
    REVEAL_ROTATION_SEC, REVEAL_STAGGER_SEC, REVEAL_START_SCALE, UNFOCUS_FADE_SEC,
    UNFOCUS_MOVE_SEC,
};
use crate::easing::EasingSet;
use crate::focus::FocusTarget;
use crate::rotation::YawPitch;
use crate::tile::TileId;
use crate::timeline::{Claim, Property, Scene, Timeline, TimelineKind, Track};
use crate::transform::shortest_path;

/// Claims for a transition touching every tile, plus `extra`.
pub fn tile_claims(scene: &Scene, extra: &[Claim]) -> FnvHashSet<Claim> {
    scene
        .tiles
        .ids()
        .map(Claim::Tile)
        .chain(extra.iter().copied())
        .collect()
}

/// Camera pull-in, staggered fade and grow of every tile, idle rotation reset.
pub fn reveal(scene: &Scene, easing: &EasingSet) -> Timeline {
    let mut tl = Timeline::new(TimelineKind::Reveal);
    if let Some(cam) = &scene.camera {
        tl.push(Track::new(
            Property::CameraEye {
                from: cam.eye,
                to: camera_work_eye(),
            },
            0.0,
            REVEAL_CAMERA_SEC,
            easing.reveal_camera,
        ));
    }
    for (i, tile) in scene.tiles.iter().enumerate() {
        let stagger = i as f32 * REVEAL_STAGGER_SEC;
        tl.push(Track::new(
            Property::Opacity {
                tile: tile.id,
                from: tile.opacity,
                to: 1.0,
            },
            REVEAL_FADE_AT_SEC + stagger,
            REVEAL_FADE_SEC,
            easing.reveal_fade,
        ));
        tl.push(Track::new(
            Property::Scale {
                tile: tile.id,
                from: Vec3::splat(REVEAL_START_SCALE),
                to: Vec3::ONE,
            },
            REVEAL_GROW_AT_SEC + stagger,
            REVEAL_GROW_SEC,
            easing.reveal_grow,
        ));
    }
    tl.push(Track::new(
        Property::GroupRotation {
            from: scene.group.rotation,
            to: YawPitch::ZERO,
        },
        0.0,
        REVEAL_ROTATION_SEC,
        easing.reveal_rotation,
    ));
    tl
}

/// Dim the other tiles and carry `focused` to `target`.
pub fn focus_in(
    scene: &Scene,
    focused: TileId,
    target: &FocusTarget,
    easing: &EasingSet,
) -> Option<Timeline> {
    let tile = scene.tiles.get(focused)?;
    let mut tl = Timeline::new(TimelineKind::FocusIn(focused));
    for other in scene.tiles.iter().filter(|t| t.id != focused) {
        tl.push(Track::new(
            Property::Opacity {
                tile: other.id,
                from: other.opacity,
                to: DIMMED_OPACITY,
            },
            0.0,
            FOCUS_FADE_SEC,
            easing.focus_fade,
        ));
    }
    tl.push(Track::new(
        Property::Position {
            tile: focused,
            from: tile.transform.position,
            to: target.position,
        },
        0.0,
        FOCUS_MOVE_SEC,
        easing.focus_move,
    ));
    tl.push(Track::new(
        Property::Scale {
            tile: focused,
            from: tile.transform.scale,
            to: target.scale,
        },
        0.0,
        FOCUS_MOVE_SEC,
        easing.focus_move,
    ));
    tl.push(Track::new(
        Property::Orientation {
            tile: focused,
            from: tile.transform.orientation,
            to: target.orientation,
        },
        0.0,
        FOCUS_MOVE_SEC,
        easing.focus_turn,
    ));
    Some(tl)
}

/// Restore the other tiles and carry `focused` back to its resting transform.
pub fn focus_out(scene: &Scene, focused: TileId, easing: &EasingSet) -> Option<Timeline> {
    let tile = scene.tiles.get(focused)?;
    let mut tl = Timeline::new(TimelineKind::FocusOut(focused));
    for other in scene.tiles.iter().filter(|t| t.id != focused) {
        tl.push(Track::new(
            Property::Opacity {
                tile: other.id,
                from: other.opacity,
                to: 1.0,
            },
            0.0,
            UNFOCUS_FADE_SEC,
            easing.focus_fade,
        ));
    }
    tl.push(Track::new(
        Property::Position {
            tile: focused,
            from: tile.transform.position,
            to: tile.base_position,
        },
        0.0,
        UNFOCUS_MOVE_SEC,
        easing.focus_move,
    ));
    tl.push(Track::new(
        Property::Scale {
            tile: focused,
            from: tile.transform.scale,
            to: Vec3::ONE,
        },
        0.0,
        UNFOCUS_MOVE_SEC,
        easing.focus_move,
    ));
    tl.push(Track::new(
        Property::Orientation {
            tile: focused,
            from: tile.transform.orientation,
            to: shortest_path(tile.transform.orientation, tile.base_orientation),
        },
        0.0,
        UNFOCUS_MOVE_SEC,
        easing.focus_turn,
    ));
    Some(tl)
}
