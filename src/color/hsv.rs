//! Hue/saturation conversions for the external mirror representation.
//!
//! Hue is expressed in degrees (0..360) and saturation in percent
//! (0..100), matching the lighting service's characteristic ranges.
//! Value is always taken as full; overall intensity lives in the
//! brightness path, not in the color.

use super::RgbwF;

/// Wrap a hue angle into [0, 360).
pub fn normalize_hue(hue: f32) -> f32 {
    let wrapped = libm::fmodf(hue, 360.0);
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

/// Build a full-value RGBW color from hue (degrees) and saturation
/// (percent).
///
/// With `extract_white` set, the minimum common component of the RGB
/// result is moved into the white channel.
pub fn rgbw_from_hue_sat(hue_deg: f32, sat_percent: f32, extract_white: bool) -> RgbwF {
    let hue = normalize_hue(hue_deg);
    let saturation = sat_percent.clamp(0.0, 100.0) / 100.0;

    let value = 1.0;
    let chroma = value * saturation;
    let x = chroma * (1.0 - libm::fabsf(libm::fmodf(hue / 60.0, 2.0) - 1.0));
    let m = value - chroma;

    let (r1, g1, b1) = if hue < 60.0 {
        (chroma, x, 0.0)
    } else if hue < 120.0 {
        (x, chroma, 0.0)
    } else if hue < 180.0 {
        (0.0, chroma, x)
    } else if hue < 240.0 {
        (0.0, x, chroma)
    } else if hue < 300.0 {
        (x, 0.0, chroma)
    } else {
        (chroma, 0.0, x)
    };

    let r = r1 + m;
    let g = g1 + m;
    let b = b1 + m;

    if extract_white {
        let whiteness = r.min(g).min(b);
        RgbwF::new(
            (r - whiteness).clamp(0.0, 1.0) * 255.0,
            (g - whiteness).clamp(0.0, 1.0) * 255.0,
            (b - whiteness).clamp(0.0, 1.0) * 255.0,
            whiteness.clamp(0.0, 1.0) * 255.0,
        )
    } else {
        RgbwF::new(
            r.clamp(0.0, 1.0) * 255.0,
            g.clamp(0.0, 1.0) * 255.0,
            b.clamp(0.0, 1.0) * 255.0,
            0.0,
        )
    }
}

/// Recover hue (degrees) and saturation (percent) from an RGBW color.
///
/// The white channel is folded back into RGB (saturating at 255) before
/// conversion, the inverse of the extraction in [`rgbw_from_hue_sat`].
pub fn hue_sat_from_rgbw(pixel: &RgbwF) -> (f32, f32) {
    let r = pixel.0[0].clamp(0.0, 255.0);
    let g = pixel.0[1].clamp(0.0, 255.0);
    let b = pixel.0[2].clamp(0.0, 255.0);
    let w = pixel.0[3].clamp(0.0, 255.0);

    let r_norm = (r + w).clamp(0.0, 255.0) / 255.0;
    let g_norm = (g + w).clamp(0.0, 255.0) / 255.0;
    let b_norm = (b + w).clamp(0.0, 255.0) / 255.0;

    let max = r_norm.max(g_norm).max(b_norm);
    let min = r_norm.min(g_norm).min(b_norm);
    let delta = max - min;

    let mut hue = 0.0;
    if delta > 1e-5 {
        if max == r_norm {
            hue = 60.0 * libm::fmodf((g_norm - b_norm) / delta, 6.0);
        } else if max == g_norm {
            hue = 60.0 * ((b_norm - r_norm) / delta + 2.0);
        } else {
            hue = 60.0 * ((r_norm - g_norm) / delta + 4.0);
        }
    }
    if hue < 0.0 {
        hue += 360.0;
    }

    let saturation = if max <= 1e-5 { 0.0 } else { delta / max };

    (hue, saturation * 100.0)
}
