//! Engine configuration
//!
//! Holds every staged target and tuning parameter. Fields are only
//! mutated through setters so each change lands in the change tracker,
//! which the external persistence layer polls to decide when to flush.
//! Values are clamped on the way in; a setter never rejects.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::RgbwF;
use crate::gradient::{GradientMode, GradientParams, Interpolation};
use crate::shimmer::ShimmerParams;

/// Time offset used to back-date the modification timestamp when an
/// immediate save is requested (one hour).
const IMMEDIATE_SAVE_BACKDATE_MS: u64 = 3_600_000;

/// Which of the two staged colors a setter addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorTarget {
    One = 0,
    Two = 1,
}

impl ColorTarget {
    pub fn from_raw(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::One),
            1 => Some(Self::Two),
            _ => None,
        }
    }
}

/// Monotonic change counter plus last-modified timestamp.
///
/// The counter only ever increases; the persistence layer compares it
/// against the last value it flushed and debounces on the timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeTracker {
    counter: u32,
    last_modified: Instant,
}

impl ChangeTracker {
    const fn new() -> Self {
        Self {
            counter: 0,
            last_modified: Instant::from_millis(0),
        }
    }

    pub fn mark(&mut self, now: Instant) {
        self.counter = self.counter.wrapping_add(1);
        self.last_modified = now;
    }

    /// Bump the counter and back-date the timestamp so the next debounce
    /// check fires immediately.
    pub fn backdate(&mut self, now: Instant) {
        self.counter = self.counter.wrapping_add(1);
        self.last_modified =
            Instant::from_millis(now.as_millis().saturating_sub(IMMEDIATE_SAVE_BACKDATE_MS));
    }

    pub const fn counter(&self) -> u32 {
        self.counter
    }

    /// Restore the counter from a persisted snapshot.
    pub(crate) fn restore_counter(&mut self, counter: u32) {
        self.counter = counter;
    }

    pub const fn last_modified(&self) -> Instant {
        self.last_modified
    }
}

/// Complete engine configuration.
#[derive(Debug, PartialEq)]
pub struct Config {
    pub(crate) color_one_staged: RgbwF,
    pub(crate) color_two_staged: RgbwF,
    pub(crate) brightness_staged: f32,
    pub(crate) onoff_staged: f32,

    /// Per-tick fade increments.
    pub(crate) color_increment: f32,
    pub(crate) brightness_increment: f32,
    pub(crate) onoff_increment: f32,

    pub(crate) render_interval: Duration,
    pub(crate) shimmer_interval: Duration,

    pub(crate) gradient: GradientParams,
    pub(crate) shimmer: ShimmerParams,

    pub(crate) count: usize,
    pub(crate) changes: ChangeTracker,
}

impl Config {
    /// Defaults for a strip of `count` pixels: red/green endpoints, full
    /// brightness, powered on, padded-linear gradient, shimmer active.
    pub fn new(count: usize) -> Self {
        Self {
            color_one_staged: RgbwF::new(255.0, 0.0, 0.0, 0.0),
            color_two_staged: RgbwF::new(0.0, 255.0, 0.0, 0.0),
            brightness_staged: 255.0,
            onoff_staged: 1.0,
            color_increment: 1.0,
            brightness_increment: 1.0,
            onoff_increment: 0.01,
            render_interval: Duration::from_millis(10),
            shimmer_interval: Duration::from_millis(10),
            gradient: GradientParams::default(),
            shimmer: ShimmerParams::default(),
            count,
            changes: ChangeTracker::new(),
        }
    }

    /* --- read access --- */

    pub const fn color_staged(&self, target: ColorTarget) -> RgbwF {
        match target {
            ColorTarget::One => self.color_one_staged,
            ColorTarget::Two => self.color_two_staged,
        }
    }

    pub const fn brightness_staged(&self) -> f32 {
        self.brightness_staged
    }

    pub const fn onoff_staged(&self) -> f32 {
        self.onoff_staged
    }

    pub const fn gradient(&self) -> &GradientParams {
        &self.gradient
    }

    pub const fn shimmer(&self) -> &ShimmerParams {
        &self.shimmer
    }

    pub const fn count(&self) -> usize {
        self.count
    }

    pub const fn changes(&self) -> &ChangeTracker {
        &self.changes
    }

    pub const fn render_interval(&self) -> Duration {
        self.render_interval
    }

    pub const fn shimmer_interval(&self) -> Duration {
        self.shimmer_interval
    }

    /* --- staged targets --- */

    pub fn set_color(&mut self, target: ColorTarget, color: RgbwF, now: Instant) {
        let mut clamped = color;
        for channel in &mut clamped.0 {
            *channel = channel.clamp(0.0, 255.0);
        }
        match target {
            ColorTarget::One => self.color_one_staged = clamped,
            ColorTarget::Two => self.color_two_staged = clamped,
        }
        self.changes.mark(now);
    }

    pub fn set_brightness(&mut self, brightness: f32, now: Instant) {
        self.brightness_staged = brightness.clamp(0.0, 255.0);
        #[cfg(feature = "esp32-log")]
        println!("[Config.set_brightness] staging brightness {:?}", self.brightness_staged);
        self.changes.mark(now);
    }

    /// Stage the on/off fade target; the rendered output fades between the
    /// two states at `onoff_increment` per tick.
    pub fn set_power(&mut self, on: bool, now: Instant) {
        self.onoff_staged = if on { 1.0 } else { 0.0 };
        self.changes.mark(now);
    }

    /* --- fade tuning --- */

    pub fn set_color_increment(&mut self, step: f32, now: Instant) {
        self.color_increment = step;
        self.changes.mark(now);
    }

    pub fn set_brightness_increment(&mut self, step: f32, now: Instant) {
        self.brightness_increment = step;
        self.changes.mark(now);
    }

    pub fn set_onoff_increment(&mut self, step: f32, now: Instant) {
        self.onoff_increment = step;
        self.changes.mark(now);
    }

    pub fn set_render_interval(&mut self, interval: Duration, now: Instant) {
        self.render_interval = interval;
        self.changes.mark(now);
    }

    pub fn set_shimmer_interval(&mut self, interval: Duration, now: Instant) {
        self.shimmer_interval = interval;
        self.changes.mark(now);
    }

    /* --- gradient tuning --- */

    pub fn set_gradient_mode(&mut self, mode: GradientMode, now: Instant) {
        self.gradient.mode = mode;
        self.changes.mark(now);
    }

    pub fn set_gradient_invert(&mut self, invert: bool, now: Instant) {
        self.gradient.invert = invert;
        self.changes.mark(now);
    }

    pub fn set_padding_begin(&mut self, begin: f32, now: Instant) {
        self.gradient.padding_begin = begin.clamp(0.0, 0.4);
        self.changes.mark(now);
    }

    pub fn set_padding_value(&mut self, value: f32, now: Instant) {
        self.gradient.padding_value = value.clamp(0.0, 1.0);
        self.changes.mark(now);
    }

    pub fn set_edge_size(&mut self, size: f32, now: Instant) {
        self.gradient.edge_size = size.clamp(0.0, 0.5);
        self.cap_center_size();
        self.changes.mark(now);
    }

    pub fn set_center_size(&mut self, size: f32, now: Instant) {
        self.gradient.center_size = size.clamp(0.0, 1.0);
        self.cap_center_size();
        self.changes.mark(now);
    }

    pub fn set_interpolation(&mut self, interpolation: Interpolation, now: Instant) {
        self.gradient.interpolation = interpolation;
        self.changes.mark(now);
    }

    /* --- shimmer tuning --- */

    pub fn set_shimmer_enabled(&mut self, enabled: bool, now: Instant) {
        self.shimmer.enabled = enabled;
        self.changes.mark(now);
    }

    pub fn set_shimmer_amplitude(&mut self, min: f32, max: f32, now: Instant) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.shimmer.min_amplitude = min.max(0.0);
        self.shimmer.max_amplitude = max.max(0.0);
        self.changes.mark(now);
    }

    pub fn set_shimmer_evolve_steps(&mut self, min: f32, max: f32, now: Instant) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.shimmer.evolve_min_steps = min.max(0.0);
        self.shimmer.evolve_max_steps = max.max(0.0);
        self.changes.mark(now);
    }

    pub fn set_shimmer_hold_steps(&mut self, min: u32, max: u32, now: Instant) {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.shimmer.hold_min_steps = min;
        self.shimmer.hold_max_steps = max;
        self.changes.mark(now);
    }

    /* --- change tracking --- */

    pub fn mark_changed(&mut self, now: Instant) {
        self.changes.mark(now);
    }

    /// Request that the persistence layer saves on its next check instead
    /// of waiting out the debounce delay.
    pub fn request_immediate_save(&mut self, now: Instant) {
        self.changes.backdate(now);
    }

    /// Re-clamp every field into its documented range. Applied after a
    /// persisted configuration is decoded.
    pub fn sanitize(&mut self) {
        for channel in &mut self.color_one_staged.0 {
            *channel = channel.clamp(0.0, 255.0);
        }
        for channel in &mut self.color_two_staged.0 {
            *channel = channel.clamp(0.0, 255.0);
        }
        self.brightness_staged = self.brightness_staged.clamp(0.0, 255.0);
        self.onoff_staged = self.onoff_staged.clamp(0.0, 1.0);

        self.gradient.padding_begin = self.gradient.padding_begin.clamp(0.0, 0.4);
        self.gradient.padding_value = self.gradient.padding_value.clamp(0.0, 1.0);
        self.gradient.edge_size = self.gradient.edge_size.clamp(0.0, 0.5);
        self.gradient.center_size = self.gradient.center_size.clamp(0.0, 1.0);
        self.cap_center_size();

        self.shimmer.min_amplitude = self.shimmer.min_amplitude.max(0.0);
        self.shimmer.max_amplitude = self.shimmer.max_amplitude.max(self.shimmer.min_amplitude);
        self.shimmer.evolve_min_steps = self.shimmer.evolve_min_steps.max(0.0);
        self.shimmer.evolve_max_steps =
            self.shimmer.evolve_max_steps.max(self.shimmer.evolve_min_steps);
        if self.shimmer.hold_max_steps < self.shimmer.hold_min_steps {
            self.shimmer.hold_max_steps = self.shimmer.hold_min_steps;
        }
    }

    fn cap_center_size(&mut self) {
        let max_center = (1.0 - 2.0 * self.gradient.edge_size).max(0.0);
        if self.gradient.center_size > max_center {
            self.gradient.center_size = max_center;
        }
    }
}
