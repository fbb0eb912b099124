//! Shimmer engine
//!
//! Four independent stochastic oscillators (one per channel) produce
//! slowly evolving amplitude values that travel along the strip through a
//! per-channel scale shift register. The output scaling stage multiplies
//! these factors into the rendered colors.

use crate::color::{CHANNELS, RgbwF};
use crate::mathf::{map_range, smooth_step};

/// Random multiplier bounds applied to the evolve step count (±20%).
pub const JITTER_MIN: f32 = 0.8;
pub const JITTER_MAX: f32 = 1.2;

/// Neutral scale factor pushed while the effect is disabled.
const NEUTRAL: f32 = 1.0;

/// Tuning for the shimmer oscillators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShimmerParams {
    /// Lower bound of the amplitude range.
    pub min_amplitude: f32,
    /// Upper bound of the amplitude range.
    pub max_amplitude: f32,
    /// Step-count range for evolve segments; the actual count scales with
    /// the size of the amplitude jump.
    pub evolve_min_steps: f32,
    pub evolve_max_steps: f32,
    /// Step-count range for hold segments, drawn uniformly.
    pub hold_min_steps: u32,
    pub hold_max_steps: u32,
    pub enabled: bool,
}

impl Default for ShimmerParams {
    fn default() -> Self {
        Self {
            min_amplitude: 0.6,
            max_amplitude: 1.2,
            evolve_min_steps: 100.0,
            evolve_max_steps: 200.0,
            hold_min_steps: 10,
            hold_max_steps: 30,
            enabled: true,
        }
    }
}

/// SplitMix64 generator. The engine needs bounded uniform draws, not
/// cryptographic quality, and this stays deterministic for a given seed.
#[derive(Debug, Clone)]
struct Rng {
    state: u64,
}

impl Rng {
    const fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform draw in [0, 1) with 24 bits of resolution.
    #[allow(clippy::cast_precision_loss)]
    fn next_f32(&mut self) -> f32 {
        (self.next_u64() >> 40) as f32 / (1u64 << 24) as f32
    }

    fn range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform draw in `min..=max`.
    #[allow(clippy::cast_possible_truncation)]
    fn range_u32(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        min + (self.next_u64() % u64::from(max - min + 1)) as u32
    }
}

/// One two-phase oscillator: evolve toward a random amplitude, then hold
/// it. `step` is compared against `total_steps` to detect segment
/// completion.
#[derive(Debug, Clone)]
struct Oscillator {
    prev: f32,
    next: f32,
    output: f32,
    total_steps: u32,
    step: u32,
    hold: bool,
}

impl Oscillator {
    const fn new() -> Self {
        Self {
            prev: NEUTRAL,
            next: NEUTRAL,
            output: NEUTRAL,
            total_steps: 0,
            step: 1,
            hold: false,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn advance(&mut self, params: &ShimmerParams, rng: &mut Rng) -> f32 {
        if self.step > self.total_steps {
            self.prev = self.next;

            if self.hold {
                self.total_steps = rng.range_u32(params.hold_min_steps, params.hold_max_steps);
            } else {
                self.next = rng.range_f32(params.min_amplitude, params.max_amplitude);
                // Larger jumps take proportionally longer, with ±20% jitter.
                let jump = libm::fabsf(self.next - self.prev);
                let mapped = map_range(
                    jump,
                    params.min_amplitude,
                    params.max_amplitude,
                    params.evolve_min_steps,
                    params.evolve_max_steps,
                );
                self.total_steps = (mapped * rng.range_f32(JITTER_MIN, JITTER_MAX)) as u32;
            }

            self.hold = !self.hold;
            self.step = 0;
        }

        let diff = self.next - self.prev;
        let progress = if self.total_steps == 0 {
            1.0
        } else {
            self.step as f32 / self.total_steps as f32
        };
        self.output = self.prev + smooth_step(progress) * diff;

        self.step += 1;
        self.output
    }
}

/// The four oscillators plus their shared random source. Channels 0 and 2
/// shift forward, 1 and 3 backward, so the modulation travels in
/// alternating directions per channel.
#[derive(Debug, Clone)]
pub struct Shimmer {
    channels: [Oscillator; CHANNELS],
    rng: Rng,
}

impl Shimmer {
    pub const fn new(seed: u64) -> Self {
        Self {
            channels: [
                Oscillator::new(),
                Oscillator::new(),
                Oscillator::new(),
                Oscillator::new(),
            ],
            rng: Rng::new(seed),
        }
    }

    /// Advance all oscillators one step and push their outputs into the
    /// scale shift register. A disabled effect pushes the neutral factor
    /// into every channel instead.
    pub fn tick(&mut self, params: &ShimmerParams, scale: &mut [RgbwF]) {
        if params.enabled {
            for (channel, oscillator) in self.channels.iter_mut().enumerate() {
                let value = oscillator.advance(params, &mut self.rng);
                shift_scale_channel(scale, value, channel, channel % 2 == 0);
            }
        } else {
            for channel in 0..CHANNELS {
                shift_scale_channel(scale, NEUTRAL, channel, channel % 2 == 0);
            }
        }
    }

    /// Current interpolated output per channel.
    pub fn outputs(&self) -> [f32; CHANNELS] {
        [
            self.channels[0].output,
            self.channels[1].output,
            self.channels[2].output,
            self.channels[3].output,
        ]
    }
}

/// Shift one channel of the scale register by a single position and insert
/// `value` at the entry end. Forward inserts at pixel 0; backward inserts
/// at the last pixel. No-op for an empty register or a channel outside
/// 0..4.
pub fn shift_scale_channel(scale: &mut [RgbwF], value: f32, channel: usize, forward: bool) {
    if scale.is_empty() || channel >= CHANNELS {
        return;
    }

    let last = scale.len() - 1;
    if forward {
        for i in (1..=last).rev() {
            scale[i].0[channel] = scale[i - 1].0[channel];
        }
        scale[0].0[channel] = value;
    } else {
        for i in 0..last {
            scale[i].0[channel] = scale[i + 1].0[channel];
        }
        scale[last].0[channel] = value;
    }
}
