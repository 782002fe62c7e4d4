use glam::Vec2;
use sphere_core::config::{FocusFractions, GalleryConfig, DEFAULT_EQUATOR_IMAGE, DEFAULT_IMAGES};
use sphere_core::constants::*;
use sphere_core::error::ConfigError;

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_within_reasonable_bounds() {
    assert!(ROTATION_DAMPING > 0.0 && ROTATION_DAMPING < 1.0);
    assert!(DIMMED_OPACITY > 0.0 && DIMMED_OPACITY < 1.0);
    assert!(CAMERA_WORK_Z < CAMERA_START_Z);
    assert!(CAMERA_WORK_Z < DEFAULT_SPHERE_RADIUS);
    assert!(REVEAL_START_SCALE > 0.0 && REVEAL_START_SCALE < 1.0);
    assert!(FOCUS_FRACTION_DESKTOP * FOCUS_FRACTION_TOUCH_MULTIPLIER > FOCUS_FRACTION_TOUCH_MAX);
    assert!(FOCUS_FRACTION_TOUCH_MAX <= 1.0);
    assert!(UNFOCUS_MOVE_SEC < FOCUS_MOVE_SEC);
}

#[test]
fn default_config_is_valid() {
    let config = GalleryConfig::default();
    assert_eq!(config.validate(), Ok(()));
    assert_eq!(config.images.len(), DEFAULT_IMAGES.len());
    assert_eq!(config.equator_image.as_deref(), Some(DEFAULT_EQUATOR_IMAGE));
    assert!(!config.off_equator_images().contains(&DEFAULT_EQUATOR_IMAGE));
    assert_eq!(config.off_equator_images().len(), DEFAULT_IMAGES.len() - 1);
}

#[test]
fn device_class_selects_fractions() {
    let desktop = GalleryConfig::for_device(false);
    let touch = GalleryConfig::for_device(true);
    assert_eq!(desktop.focus_fractions(), FocusFractions::uniform(FOCUS_FRACTION_DESKTOP));
    assert_eq!(touch.focus_fractions(), FocusFractions::uniform(FOCUS_FRACTION_TOUCH_MAX));
}

#[test]
fn validation_rejects_bad_values() {
    let mut c = GalleryConfig::default();
    c.tile_count = 0;
    assert_eq!(c.validate(), Err(ConfigError::NoTiles));

    let mut c = GalleryConfig::default();
    c.radius = -1.0;
    assert_eq!(c.validate(), Err(ConfigError::Radius(-1.0)));

    let mut c = GalleryConfig::default();
    c.tile_size = Vec2::new(0.0, 3.0);
    assert!(matches!(c.validate(), Err(ConfigError::TileSize { .. })));

    let mut c = GalleryConfig::default();
    c.touch_fractions.height = 1.5;
    assert!(matches!(
        c.validate(),
        Err(ConfigError::Fraction { value, .. }) if value == 1.5
    ));
}

#[test]
fn errors_read_well() {
    assert_eq!(
        ConfigError::Radius(0.0).to_string(),
        "sphere radius must be positive and finite, got 0"
    );
}
