//! Light engine - the rendering core
//!
//! Owns the configuration, the active (post-fade) values and the
//! per-pixel buffers, and advances them on two independent cadences: the
//! render timer drives fade → gradient → output scaling, the shimmer
//! timer drives the oscillators and the scale shift register. Timers fire
//! by elapsed-time comparison; a missed interval runs once when next
//! polled, with no catch-up backlog.

use embassy_time::Instant;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{Rgbw, RgbwF};
use crate::config::Config;
use crate::fade::ActiveValues;
use crate::shimmer::Shimmer;
use crate::{gradient, output};

/// Why the engine (or its output driver) could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    /// Configured pixel count is zero.
    NoPixels,
    /// Configured pixel count exceeds the static capacity.
    CapacityExceeded,
    /// The output driver failed to initialize.
    Output,
}

/// Rendering core for a strip of up to `MAX_PIXELS` pixels.
///
/// The pixel count is fixed at construction; buffers are statically
/// allocated at capacity and sliced to the active count.
pub struct LightEngine<const MAX_PIXELS: usize> {
    config: Config,
    active: ActiveValues,

    colors: [Rgbw; MAX_PIXELS],
    scale: [RgbwF; MAX_PIXELS],
    pixels: [Rgbw; MAX_PIXELS],

    shimmer: Shimmer,

    render_last: Instant,
    shimmer_last: Instant,
    fade_changes: u8,
}

impl<const MAX_PIXELS: usize> LightEngine<MAX_PIXELS> {
    /// Create an engine. Fails when the configured pixel count is zero or
    /// exceeds `MAX_PIXELS`; the caller must treat that as fatal since
    /// the fixture cannot render.
    pub fn new(config: Config, seed: u64, now: Instant) -> Result<Self, InitError> {
        let count = config.count();
        if count == 0 {
            #[cfg(feature = "esp32-log")]
            println!("[LightEngine.new] rejected: zero pixel count");
            return Err(InitError::NoPixels);
        }
        if count > MAX_PIXELS {
            #[cfg(feature = "esp32-log")]
            println!("[LightEngine.new] rejected: {} pixels > capacity {}", count, MAX_PIXELS);
            return Err(InitError::CapacityExceeded);
        }

        Ok(Self {
            config,
            active: ActiveValues::new(),
            colors: [Rgbw::default(); MAX_PIXELS],
            scale: [RgbwF::splat(1.0); MAX_PIXELS],
            pixels: [Rgbw::default(); MAX_PIXELS],
            shimmer: Shimmer::new(seed),
            render_last: now,
            shimmer_last: now,
            fade_changes: 0,
        })
    }

    /// Run whichever stages are due at `now`. Returns true when a new
    /// frame was produced and should be pushed to the output driver.
    pub fn poll(&mut self, now: Instant) -> bool {
        let count = self.config.count();
        let mut rendered = false;

        if elapsed_ms(self.render_last, now) > self.config.render_interval().as_millis() {
            self.render_last = now;

            self.fade_changes = self.active.tick(&self.config);

            gradient::render(
                &mut self.colors[..count],
                self.config.gradient(),
                &self.active.color_one,
                &self.active.color_two,
            );

            output::apply(
                &mut self.pixels[..count],
                &self.colors[..count],
                &self.scale[..count],
                self.active.brightness,
                self.active.onoff,
            );

            rendered = true;
        }

        if elapsed_ms(self.shimmer_last, now) > self.config.shimmer_interval().as_millis() {
            self.shimmer_last = now;
            let params = *self.config.shimmer();
            self.shimmer.tick(&params, &mut self.scale[..count]);
        }

        rendered
    }

    /// Hardware-ready frame from the last render tick.
    pub fn frame(&self) -> &[Rgbw] {
        &self.pixels[..self.config.count()]
    }

    /// Write one pixel of the output frame directly, bypassing the
    /// pipeline (the next render tick overwrites it). Returns false and
    /// leaves the frame untouched for an out-of-range index.
    pub fn set_pixel(&mut self, index: usize, pixel: Rgbw) -> bool {
        if index >= self.config.count() {
            return false;
        }
        self.pixels[index] = pixel;
        true
    }

    /// Zero the rendered colors and the output frame.
    pub fn clear(&mut self) {
        let count = self.config.count();
        for pixel in &mut self.colors[..count] {
            *pixel = Rgbw::default();
        }
        for pixel in &mut self.pixels[..count] {
            *pixel = Rgbw::default();
        }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Mutable configuration access for setters (console, device bridge).
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    pub const fn active(&self) -> &ActiveValues {
        &self.active
    }

    /// Per-pixel scale factors written by the shimmer engine.
    pub fn scale(&self) -> &[RgbwF] {
        &self.scale[..self.config.count()]
    }

    /// True while the last render tick still moved at least one value
    /// toward its staged target.
    pub const fn is_fading(&self) -> bool {
        self.fade_changes > 0
    }
}

/// Elapsed milliseconds between two instants, matching the wrapping
/// millisecond arithmetic of the device loop.
fn elapsed_ms(earlier: Instant, now: Instant) -> u64 {
    now.as_millis().wrapping_sub(earlier.as_millis())
}
