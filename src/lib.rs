#![no_std]

pub mod color;
pub mod config;
pub mod engine;
pub mod fade;
pub mod fixture;
pub mod gradient;
pub mod mathf;
pub mod mirror;
pub mod output;
pub mod persist;
pub mod shimmer;

pub use color::{CHANNELS, Rgbw, RgbwF};
pub use config::{ChangeTracker, ColorTarget, Config};
pub use engine::{InitError, LightEngine};
pub use fixture::Fixture;
pub use gradient::{GradientMode, GradientParams, Interpolation};
pub use mirror::{Mirror, MirrorBridge};
pub use persist::{DecodeError, SaveDebounce, decode_config, encode_config};
pub use shimmer::{Shimmer, ShimmerParams};

pub use embassy_time::{Duration, Instant};

/// Abstract LED strip driver trait
///
/// Implement this trait to support different hardware platforms.
/// The fixture is generic over this trait; the engine never touches
/// pins or protocols directly.
pub trait OutputDriver {
    /// Prepare the hardware. Returns false when the strip cannot be
    /// driven; the fixture treats that as fatal.
    fn init(&mut self) -> bool {
        true
    }

    /// Write a full frame of RGBW pixels to the strip.
    fn write(&mut self, frame: &[Rgbw]);

    /// Blank the strip immediately.
    fn clear(&mut self) {}
}
