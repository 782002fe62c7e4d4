//! Gallery configuration.
//!
//! Desktop and touch builds differ only in data (image list, viewport
//! fractions, easing choice), so both are expressed through one struct.

use glam::Vec2;

use crate::constants::{
    default_tile_size, DEFAULT_SPHERE_RADIUS, DEFAULT_TILE_COUNT, EQUATOR_BAND_FRACTION,
    FOCUS_FRACTION_DESKTOP, FOCUS_FRACTION_TOUCH_MAX, FOCUS_FRACTION_TOUCH_MULTIPLIER,
};
use crate::easing::EasingSet;
use crate::error::ConfigError;

pub const DEFAULT_IMAGES: &[&str] = &[
    "/Frame 633478.webp",
    "/Frame 633479.webp",
    "/Frame 633481.webp",
    "/Frame 633482.webp",
    "/Frame 633483.webp",
    "/Frame 633496.webp",
    "/Frame 633499.webp",
    "/Frame 633500.webp",
    "/Frame 633501.webp",
];
pub const DEFAULT_EQUATOR_IMAGE: &str = "/Frame 633501.webp";

/// Fraction of the visible world width/height a focused tile may occupy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusFractions {
    pub width: f32,
    pub height: f32,
}

impl FocusFractions {
    pub fn uniform(f: f32) -> Self {
        Self {
            width: f,
            height: f,
        }
    }

    /// Touch screens are physically smaller, so the focused tile gets more room.
    pub fn for_touch(desktop: Self) -> Self {
        Self {
            width: (desktop.width * FOCUS_FRACTION_TOUCH_MULTIPLIER).min(FOCUS_FRACTION_TOUCH_MAX),
            height: (desktop.height * FOCUS_FRACTION_TOUCH_MULTIPLIER)
                .min(FOCUS_FRACTION_TOUCH_MAX),
        }
    }

    pub fn as_vec2(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

#[derive(Clone, Debug)]
pub struct GalleryConfig {
    pub tile_count: usize,
    pub radius: f32,
    pub tile_size: Vec2,
    pub images: Vec<String>,
    /// Image shown on every tile of the equatorial band.
    pub equator_image: Option<String>,
    pub equator_band_fraction: f32,
    pub desktop_fractions: FocusFractions,
    pub touch_fractions: FocusFractions,
    pub easing: EasingSet,
    /// Device class; enables touch fractions and ambient drift.
    pub touch_device: bool,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        let desktop = FocusFractions::uniform(FOCUS_FRACTION_DESKTOP);
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            radius: DEFAULT_SPHERE_RADIUS,
            tile_size: default_tile_size(),
            images: DEFAULT_IMAGES.iter().map(|s| s.to_string()).collect(),
            equator_image: Some(DEFAULT_EQUATOR_IMAGE.to_string()),
            equator_band_fraction: EQUATOR_BAND_FRACTION,
            desktop_fractions: desktop,
            touch_fractions: FocusFractions::for_touch(desktop),
            easing: EasingSet::default(),
            touch_device: false,
        }
    }
}

impl GalleryConfig {
    pub fn for_device(touch_device: bool) -> Self {
        Self {
            touch_device,
            ..Self::default()
        }
    }

    /// Fractions for the configured device class.
    pub fn focus_fractions(&self) -> FocusFractions {
        if self.touch_device {
            self.touch_fractions
        } else {
            self.desktop_fractions
        }
    }

    /// Images used off the equator: the list minus the equatorial override.
    pub fn off_equator_images(&self) -> Vec<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .filter(|u| Some(*u) != self.equator_image.as_deref())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_count == 0 {
            return Err(ConfigError::NoTiles);
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(ConfigError::Radius(self.radius));
        }
        if !(self.tile_size.x > 0.0 && self.tile_size.y > 0.0) {
            return Err(ConfigError::TileSize {
                width: self.tile_size.x,
                height: self.tile_size.y,
            });
        }
        check_fraction("equator_band_fraction", self.equator_band_fraction)?;
        for (name, value) in [
            ("desktop width fraction", self.desktop_fractions.width),
            ("desktop height fraction", self.desktop_fractions.height),
            ("touch width fraction", self.touch_fractions.width),
            ("touch height fraction", self.touch_fractions.height),
        ] {
            check_fraction(name, value)?;
        }
        Ok(())
    }
}

fn check_fraction(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::Fraction { name, value })
    }
}
