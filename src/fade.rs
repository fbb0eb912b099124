//! Staged-value fade engine
//!
//! Every configuration change becomes a smooth transition by stepping the
//! active values toward their staged targets once per render tick,
//! bounded by the configured per-tick increments.

use crate::color::{CHANNELS, RgbwF};
use crate::config::Config;

/// Minimum movement that counts as a change when reporting fade activity.
pub const CHANGE_EPSILON: f32 = 1e-5;

/// Move `current` toward `target` by at most `step`.
///
/// Snaps exactly to the target once within `step`, so repeated
/// application converges in `ceil(|target - current| / step)` calls and
/// never overshoots. A zero or negative step jumps immediately.
pub fn step_towards(current: f32, target: f32, step: f32) -> f32 {
    if step <= 0.0 {
        return target;
    }
    let diff = target - current;
    if libm::fabsf(diff) <= step {
        return target;
    }
    if diff > 0.0 { current + step } else { current - step }
}

/// The post-fade values used for rendering this tick.
#[derive(Debug, Clone, Copy)]
pub struct ActiveValues {
    pub color_one: RgbwF,
    pub color_two: RgbwF,
    /// Global brightness, 0..=255.
    pub brightness: f32,
    /// On/off fade factor, 0..=1.
    pub onoff: f32,
}

impl ActiveValues {
    /// Start dark on the colors so the first fade-in ramps up from black.
    pub const fn new() -> Self {
        Self {
            color_one: RgbwF::splat(0.0),
            color_two: RgbwF::splat(0.0),
            brightness: 255.0,
            onoff: 1.0,
        }
    }

    /// Step brightness, on/off and all eight color channels toward their
    /// staged targets. Returns how many channels moved by more than
    /// [`CHANGE_EPSILON`]; zero means the fade has settled.
    pub fn tick(&mut self, config: &Config) -> u8 {
        let mut changes = 0u8;

        let prev = self.brightness;
        self.brightness = step_towards(prev, config.brightness_staged, config.brightness_increment)
            .clamp(0.0, 255.0);
        if libm::fabsf(self.brightness - prev) > CHANGE_EPSILON {
            changes += 1;
        }

        let prev = self.onoff;
        self.onoff =
            step_towards(prev, config.onoff_staged, config.onoff_increment).clamp(0.0, 1.0);
        if libm::fabsf(self.onoff - prev) > CHANGE_EPSILON {
            changes += 1;
        }

        for channel in 0..CHANNELS {
            changes += step_channel(
                &mut self.color_one.0[channel],
                config.color_one_staged.0[channel],
                config.color_increment,
            );
            changes += step_channel(
                &mut self.color_two.0[channel],
                config.color_two_staged.0[channel],
                config.color_increment,
            );
        }

        changes
    }
}

impl Default for ActiveValues {
    fn default() -> Self {
        Self::new()
    }
}

fn step_channel(channel: &mut f32, target: f32, step: f32) -> u8 {
    let prev = *channel;
    *channel = step_towards(prev, target, step).clamp(0.0, 255.0);
    u8::from(libm::fabsf(*channel - prev) > CHANGE_EPSILON)
}
