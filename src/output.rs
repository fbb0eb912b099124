//! Output scaling stage
//!
//! Combines the gradient-rendered colors, the per-channel scale register,
//! global brightness and the on/off factor into final byte values. This
//! is the only stage that rounds; everything upstream keeps full float
//! precision or truncates.

use crate::color::{CHANNELS, Rgbw, RgbwF};

/// For every pixel:
/// `out[c] = round(clamp(color[c] * scale[c], 0, 255) * (brightness / 255) * onoff)`.
///
/// Rounding adds 0.5 before truncation; the saturating cast keeps the
/// result in 0..=255. No hardware I/O happens here.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn apply(
    pixels: &mut [Rgbw],
    colors: &[Rgbw],
    scale: &[RgbwF],
    brightness: f32,
    onoff: f32,
) {
    let brightness_norm = brightness.clamp(0.0, 255.0) / 255.0;

    let count = pixels.len().min(colors.len()).min(scale.len());
    for i in 0..count {
        for c in 0..CHANNELS {
            let scaled = f32::from(colors[i].0[c]) * scale[i].0[c];
            let base = scaled.clamp(0.0, 255.0);
            let level = base * brightness_norm * onoff;
            pixels[i].0[c] = (level + 0.5) as u8;
        }
    }
}
