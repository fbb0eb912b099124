//! Mirror bridge
//!
//! Translates between the external lighting-service representation (one
//! on/off switch, a 0..100 level, and a hue/saturation pair per color)
//! and the engine's native staged RGBW configuration. The bridge is an
//! explicit two-function contract so the core never depends on a host
//! runtime: the service layer calls [`MirrorBridge::apply_external_change`]
//! when its characteristics change and [`MirrorBridge::produce_external_snapshot`]
//! to refresh them from the engine.

use embassy_time::Instant;

use crate::color::{hue_sat_from_rgbw, normalize_hue, rgbw_from_hue_sat};
use crate::config::{ColorTarget, Config};

/// External representation of the fixture state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    pub on: bool,
    /// Level in percent, 0..=100.
    pub level: u8,
    /// Hue in degrees / saturation in percent, per color.
    pub hue_one: f32,
    pub sat_one: f32,
    pub hue_two: f32,
    pub sat_two: f32,
}

impl Mirror {
    /// Clamp every field into its documented range and wrap the hues.
    pub fn sanitized(&self) -> Self {
        Self {
            on: self.on,
            level: self.level.min(100),
            hue_one: normalize_hue(self.hue_one),
            sat_one: self.sat_one.clamp(0.0, 100.0),
            hue_two: normalize_hue(self.hue_two),
            sat_two: self.sat_two.clamp(0.0, 100.0),
        }
    }
}

impl Default for Mirror {
    fn default() -> Self {
        Self {
            on: false,
            level: 50,
            hue_one: 0.0,
            sat_one: 0.0,
            hue_two: 0.0,
            sat_two: 0.0,
        }
    }
}

/// Stateless translator apart from the RGBW-extraction switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorBridge {
    extract_white: bool,
}

impl MirrorBridge {
    pub const fn new(extract_white: bool) -> Self {
        Self { extract_white }
    }

    /// Whether hue/sat colors are split into RGB plus a white component.
    pub const fn rgbw_extraction(&self) -> bool {
        self.extract_white
    }

    pub fn set_rgbw_extraction(&mut self, enabled: bool) {
        self.extract_white = enabled;
    }

    /// Flip the extraction mode; returns the new state.
    pub fn toggle_rgbw_extraction(&mut self) -> bool {
        self.extract_white = !self.extract_white;
        self.extract_white
    }

    /// Write a sanitized mirror state into the staged configuration.
    /// Every touched field goes through a setter, so the change tracker
    /// picks the update up for persistence.
    pub fn apply_external_change(&self, mirror: &Mirror, config: &mut Config, now: Instant) {
        let mirror = mirror.sanitized();

        config.set_color(
            ColorTarget::One,
            rgbw_from_hue_sat(mirror.hue_one, mirror.sat_one, self.extract_white),
            now,
        );
        config.set_color(
            ColorTarget::Two,
            rgbw_from_hue_sat(mirror.hue_two, mirror.sat_two, self.extract_white),
            now,
        );
        config.set_brightness(level_to_brightness(mirror.level), now);
        config.set_power(mirror.on, now);
    }

    /// Build a mirror snapshot from the staged configuration.
    pub fn produce_external_snapshot(&self, config: &Config) -> Mirror {
        let (hue_one, sat_one) = hue_sat_from_rgbw(&config.color_staged(ColorTarget::One));
        let (hue_two, sat_two) = hue_sat_from_rgbw(&config.color_staged(ColorTarget::Two));

        Mirror {
            on: config.onoff_staged() >= 0.5,
            level: brightness_to_level(config.brightness_staged()),
            hue_one,
            sat_one,
            hue_two,
            sat_two,
        }
        .sanitized()
    }
}

/// Linear 0..100 level to 0..255 brightness.
pub fn level_to_brightness(level: u8) -> f32 {
    (f32::from(level.min(100)) / 100.0) * 255.0
}

/// Linear 0..255 brightness to the nearest 0..100 level.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn brightness_to_level(brightness: f32) -> u8 {
    let clamped = brightness.clamp(0.0, 255.0);
    libm::roundf((clamped / 255.0) * 100.0) as u8
}

/// Cubic 0..100 level to 0..255 brightness (rounded), for embeddings that
/// want a perceptual level curve instead of the linear one.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn cubic_level_to_brightness(level: u8) -> u8 {
    if level == 0 {
        return 0;
    }
    if level >= 100 {
        return 255;
    }
    let normalized = f32::from(level) / 100.0;
    let scaled = normalized * normalized * normalized;
    (scaled * 255.0 + 0.5) as u8
}
