//! Gradient renderer
//!
//! Distributes the two active colors across the pixel array under one of
//! five spatial policies. All blending happens in floating point; the
//! result is written as bytes by truncation. Rounding is reserved for the
//! output scaling stage.

use crate::color::{Rgbw, RgbwF, blend};
use crate::mathf::smooth_step;

const MODE_NAME_LINEAR: &str = "linear";
const MODE_NAME_LINEAR_PADDING: &str = "linear_padding";
const MODE_NAME_SINGLE_COLOR: &str = "single_color";
const MODE_NAME_MIDPOINT_SPLIT: &str = "midpoint_split";
const MODE_NAME_EDGE_CENTER: &str = "edge_center";

/// Transition zones narrower than this skip interpolation and hard-switch
/// between the adjacent bands.
pub const TRANSITION_EPSILON: f32 = 1e-6;

/// Spatial policy mapping the two endpoint colors onto the strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GradientMode {
    /// Plain 0→1 blend across the strip.
    Linear = 0,
    /// Linear blend confined to a padded span; constant mix outside it.
    LinearPadding = 1,
    /// Primary color across the entire strip (respects inversion).
    SingleColor = 2,
    /// Hard switch at the midpoint, no blend.
    MidpointSplit = 3,
    /// Primary on both edges, secondary in a centered band, blended
    /// transitions between them.
    EdgeCenter = 4,
}

/// Interpolation curve used inside transition zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Interpolation {
    Linear = 0,
    #[default]
    Smooth = 1,
}

impl GradientMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Linear,
            1 => Self::LinearPadding,
            2 => Self::SingleColor,
            3 => Self::MidpointSplit,
            4 => Self::EdgeCenter,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => MODE_NAME_LINEAR,
            Self::LinearPadding => MODE_NAME_LINEAR_PADDING,
            Self::SingleColor => MODE_NAME_SINGLE_COLOR,
            Self::MidpointSplit => MODE_NAME_MIDPOINT_SPLIT,
            Self::EdgeCenter => MODE_NAME_EDGE_CENTER,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_LINEAR => Some(Self::Linear),
            MODE_NAME_LINEAR_PADDING => Some(Self::LinearPadding),
            MODE_NAME_SINGLE_COLOR => Some(Self::SingleColor),
            MODE_NAME_MIDPOINT_SPLIT => Some(Self::MidpointSplit),
            MODE_NAME_EDGE_CENTER => Some(Self::EdgeCenter),
            _ => None,
        }
    }
}

impl Interpolation {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Linear,
            1 => Self::Smooth,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Smooth => "smooth",
        }
    }

    fn apply(self, t: f32) -> f32 {
        match self {
            Self::Smooth => smooth_step(t),
            Self::Linear => t.clamp(0.0, 1.0),
        }
    }
}

/// Tuning for the gradient renderer. Out-of-range values are clamped at
/// render time, so a stale persisted value can never break a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientParams {
    pub mode: GradientMode,
    /// Normalized position where the padded blend span begins (0..=0.4).
    pub padding_begin: f32,
    /// Mix ratio held constant outside the padded span (0..=1).
    pub padding_value: f32,
    /// Width of the primary band at each edge (0..=0.5).
    pub edge_size: f32,
    /// Width of the secondary band in the middle (0..=1, further capped so
    /// `2 * edge_size + center_size <= 1`).
    pub center_size: f32,
    pub interpolation: Interpolation,
    /// Swap the roles of color one and color two.
    pub invert: bool,
}

impl Default for GradientParams {
    fn default() -> Self {
        Self {
            mode: GradientMode::LinearPadding,
            padding_begin: 0.1,
            padding_value: 0.95,
            edge_size: 0.0,
            center_size: 0.05,
            interpolation: Interpolation::Smooth,
            invert: false,
        }
    }
}

/// Fill `colors` from the two active colors under the configured mode.
#[allow(clippy::cast_precision_loss)]
pub fn render(colors: &mut [Rgbw], params: &GradientParams, one: &RgbwF, two: &RgbwF) {
    if colors.is_empty() {
        return;
    }

    let (primary, secondary) = if params.invert { (two, one) } else { (one, two) };

    match params.mode {
        GradientMode::SingleColor => {
            for pixel in colors.iter_mut() {
                *pixel = primary.to_bytes();
            }
        }

        GradientMode::MidpointSplit => {
            let split_index = (colors.len() + 1) / 2;
            for (i, pixel) in colors.iter_mut().enumerate() {
                let src = if i < split_index { primary } else { secondary };
                *pixel = src.to_bytes();
            }
        }

        GradientMode::LinearPadding => {
            render_linear_padding(colors, params, primary, secondary);
        }

        GradientMode::EdgeCenter => {
            render_edge_center(colors, params, primary, secondary);
        }

        GradientMode::Linear => {
            let n = colors.len();
            if n == 1 {
                colors[0] = primary.to_bytes();
                return;
            }
            for (i, pixel) in colors.iter_mut().enumerate() {
                let t = i as f32 / (n - 1) as f32;
                *pixel = blend(*primary, *secondary, t).to_bytes();
            }
        }
    }
}

/// Linear blend confined to `[padding_begin, 1 - padding_begin]`; outside
/// that span the mix ratio is pinned to `padding_value` / `1 - padding_value`.
#[allow(clippy::cast_precision_loss)]
fn render_linear_padding(
    colors: &mut [Rgbw],
    params: &GradientParams,
    primary: &RgbwF,
    secondary: &RgbwF,
) {
    let pad_start = params.padding_begin.clamp(0.0, 0.4);
    let pad_value = params.padding_value.clamp(0.0, 1.0);

    let n = colors.len();
    if n == 1 {
        colors[0] = blend(*primary, *secondary, 0.5).to_bytes();
        return;
    }

    let start_idx = pad_start * (n - 1) as f32;
    let end_idx = (1.0 - pad_start) * (n - 1) as f32;
    let range = end_idx - start_idx;

    for (i, pixel) in colors.iter_mut().enumerate() {
        let pos = i as f32;
        let primary_weight = if pos <= start_idx {
            pad_value
        } else if pos >= end_idx || range <= 0.0 {
            // Degenerate span: hold the boundary mix instead of dividing
            // by a zero-width range.
            1.0 - pad_value
        } else {
            let t = ((pos - start_idx) / range).clamp(0.0, 1.0);
            pad_value + (1.0 - 2.0 * pad_value) * t
        };

        let secondary_weight = (1.0 - primary_weight).clamp(0.0, 1.0);
        *pixel = blend(*primary, *secondary, secondary_weight).to_bytes();
    }
}

/// Primary band at both edges, secondary band in the middle, transition
/// zones blended with the configured curve. Transitions narrower than
/// `TRANSITION_EPSILON` hard-switch between the bands.
#[allow(clippy::cast_precision_loss)]
fn render_edge_center(
    colors: &mut [Rgbw],
    params: &GradientParams,
    primary: &RgbwF,
    secondary: &RgbwF,
) {
    let edge_size = params.edge_size.clamp(0.0, 0.5);
    let max_center = 1.0 - 2.0 * edge_size;
    let center_size = params.center_size.clamp(0.0, 1.0).min(max_center).max(0.0);

    let transition_total = (1.0 - (2.0 * edge_size + center_size)).max(0.0);
    let half_transition = transition_total * 0.5;

    let left_edge_end = edge_size;
    let left_transition_end = left_edge_end + half_transition;
    let center_end = left_transition_end + center_size;
    let right_transition_end = center_end + half_transition;

    let n = colors.len();
    for (i, pixel) in colors.iter_mut().enumerate() {
        let x = if n <= 1 { 0.0 } else { i as f32 / (n - 1) as f32 };

        if x <= left_edge_end {
            *pixel = primary.to_bytes();
            continue;
        }

        if x < left_transition_end && half_transition > TRANSITION_EPSILON {
            let t = (x - left_edge_end) / half_transition;
            let amount = params.interpolation.apply(t);
            *pixel = blend(*primary, *secondary, amount).to_bytes();
            continue;
        }

        if x < center_end {
            *pixel = secondary.to_bytes();
            continue;
        }

        if x < right_transition_end && half_transition > TRANSITION_EPSILON {
            let t = (x - center_end) / half_transition;
            let amount = params.interpolation.apply(t);
            *pixel = blend(*secondary, *primary, amount).to_bytes();
            continue;
        }

        *pixel = primary.to_bytes();
    }
}
