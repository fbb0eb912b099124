//! Configuration blob codec and save debounce policy.
//!
//! The storage backend (flash, NVS, a file) lives outside the core; this
//! module owns the wire format and the flush policy. Blob layout:
//!
//! `[version tag, 16 bytes zero-padded][payload][checksum u16 LE]`
//!
//! The payload is a fixed-width little-endian field-by-field encoding of
//! [`Config`], change counter included. The checksum is the byte sum of
//! the payload truncated to 16 bits. A tag mismatch rejects the blob, so
//! a layout change only needs a new [`CONFIG_TAG`].

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::config::Config;
use crate::gradient::{GradientMode, Interpolation};

/// Version tag stored in front of the payload. Bump on layout changes.
pub const CONFIG_TAG: &str = "V03.00.01";

/// Stored length of the tag field.
const TAG_LEN: usize = 16;

/// Exact encoded payload size.
const PAYLOAD_LEN: usize = 112;

/// Capacity of the encode buffer.
pub const BLOB_CAPACITY: usize = 160;

const _: () = assert!(BLOB_CAPACITY >= TAG_LEN + PAYLOAD_LEN + 2);
const _: () = assert!(CONFIG_TAG.len() <= TAG_LEN);

/// Default debounce delay before a dirty configuration is flushed.
pub const DEFAULT_SAVE_DELAY: Duration = Duration::from_millis(15_000);

/// Why a stored blob was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// Blob is shorter than tag plus checksum.
    TooShort,
    /// Stored version tag does not match [`CONFIG_TAG`].
    TagMismatch,
    /// Payload length differs from the current layout.
    SizeMismatch,
    /// Stored checksum does not match the payload.
    ChecksumMismatch,
}

fn tag_field() -> [u8; TAG_LEN] {
    let mut field = [0u8; TAG_LEN];
    let bytes = CONFIG_TAG.as_bytes();
    field[..bytes.len()].copy_from_slice(bytes);
    field
}

fn checksum(payload: &[u8]) -> u16 {
    let mut sum = 0u32;
    for byte in payload {
        sum = sum.wrapping_add(u32::from(*byte));
    }
    #[allow(clippy::cast_possible_truncation)]
    {
        (sum & 0xFFFF) as u16
    }
}

struct Writer {
    buf: Vec<u8, BLOB_CAPACITY>,
}

impl Writer {
    const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    // Capacity is guaranteed by the const assertion above, so a failed
    // extend cannot happen for the fixed layout.
    fn put(&mut self, bytes: &[u8]) {
        let _ = self.buf.extend_from_slice(bytes);
    }

    fn put_f32(&mut self, value: f32) {
        self.put(&value.to_le_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.put(&value.to_le_bytes());
    }

    fn put_u8(&mut self, value: u8) {
        self.put(&[value]);
    }
}

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        let end = self.pos + n;
        if end > self.buf.len() {
            return Err(DecodeError::SizeMismatch);
        }
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn f32(&mut self) -> Result<f32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        Ok(self.take(1)?[0])
    }
}

/// Encode a configuration snapshot into the versioned blob form.
#[allow(clippy::cast_possible_truncation)]
pub fn encode_config(config: &Config) -> Vec<u8, BLOB_CAPACITY> {
    let mut writer = Writer::new();
    writer.put(&tag_field());

    let payload_start = writer.buf.len();

    for channel in &config.color_one_staged.0 {
        writer.put_f32(*channel);
    }
    for channel in &config.color_two_staged.0 {
        writer.put_f32(*channel);
    }
    writer.put_f32(config.brightness_staged);
    writer.put_f32(config.onoff_staged);

    writer.put_f32(config.color_increment);
    writer.put_f32(config.brightness_increment);
    writer.put_f32(config.onoff_increment);

    writer.put_u32(config.render_interval.as_millis() as u32);
    writer.put_u32(config.shimmer_interval.as_millis() as u32);

    writer.put_u8(config.gradient.mode as u8);
    writer.put_u8(config.gradient.interpolation as u8);
    writer.put_u8(u8::from(config.gradient.invert));
    writer.put_f32(config.gradient.padding_begin);
    writer.put_f32(config.gradient.padding_value);
    writer.put_f32(config.gradient.edge_size);
    writer.put_f32(config.gradient.center_size);

    writer.put_u8(u8::from(config.shimmer.enabled));
    writer.put_f32(config.shimmer.min_amplitude);
    writer.put_f32(config.shimmer.max_amplitude);
    writer.put_f32(config.shimmer.evolve_min_steps);
    writer.put_f32(config.shimmer.evolve_max_steps);
    writer.put_u32(config.shimmer.hold_min_steps);
    writer.put_u32(config.shimmer.hold_max_steps);

    writer.put_u32(config.count as u32);
    writer.put_u32(config.changes.counter());

    let csum = checksum(&writer.buf[payload_start..]);
    writer.put(&csum.to_le_bytes());

    writer.buf
}

/// Decode a stored blob back into a configuration. The result is
/// re-sanitized so a blob written by a different build can never carry
/// out-of-range values into the renderer.
pub fn decode_config(bytes: &[u8]) -> Result<Config, DecodeError> {
    if bytes.len() < TAG_LEN + 2 {
        #[cfg(feature = "esp32-log")]
        println!("[persist.decode_config] blob too short: {} bytes", bytes.len());
        return Err(DecodeError::TooShort);
    }

    let (tag, rest) = bytes.split_at(TAG_LEN);
    if tag != tag_field() {
        #[cfg(feature = "esp32-log")]
        println!("[persist.decode_config] version tag mismatch");
        return Err(DecodeError::TagMismatch);
    }

    let payload_len = rest.len() - 2;
    if payload_len != PAYLOAD_LEN {
        #[cfg(feature = "esp32-log")]
        println!(
            "[persist.decode_config] payload size mismatch: stored {} expected {}",
            payload_len, PAYLOAD_LEN
        );
        return Err(DecodeError::SizeMismatch);
    }

    let (payload, stored_csum) = rest.split_at(payload_len);
    let stored = u16::from_le_bytes([stored_csum[0], stored_csum[1]]);
    if stored != checksum(payload) {
        #[cfg(feature = "esp32-log")]
        println!("[persist.decode_config] checksum mismatch");
        return Err(DecodeError::ChecksumMismatch);
    }

    let mut reader = Reader::new(payload);

    let mut color_one = [0.0f32; 4];
    for channel in &mut color_one {
        *channel = reader.f32()?;
    }
    let mut color_two = [0.0f32; 4];
    for channel in &mut color_two {
        *channel = reader.f32()?;
    }

    let brightness_staged = reader.f32()?;
    let onoff_staged = reader.f32()?;

    let color_increment = reader.f32()?;
    let brightness_increment = reader.f32()?;
    let onoff_increment = reader.f32()?;

    let render_interval = u64::from(reader.u32()?);
    let shimmer_interval = u64::from(reader.u32()?);

    let mode = GradientMode::from_raw(reader.u8()?);
    let interpolation = Interpolation::from_raw(reader.u8()?);
    let invert = reader.u8()? != 0;
    let padding_begin = reader.f32()?;
    let padding_value = reader.f32()?;
    let edge_size = reader.f32()?;
    let center_size = reader.f32()?;

    let shimmer_enabled = reader.u8()? != 0;
    let min_amplitude = reader.f32()?;
    let max_amplitude = reader.f32()?;
    let evolve_min_steps = reader.f32()?;
    let evolve_max_steps = reader.f32()?;
    let hold_min_steps = reader.u32()?;
    let hold_max_steps = reader.u32()?;

    let count = reader.u32()? as usize;
    let counter = reader.u32()?;

    let mut config = Config::new(count);
    config.color_one_staged.0 = color_one;
    config.color_two_staged.0 = color_two;
    config.brightness_staged = brightness_staged;
    config.onoff_staged = onoff_staged;
    config.color_increment = color_increment;
    config.brightness_increment = brightness_increment;
    config.onoff_increment = onoff_increment;
    config.render_interval = Duration::from_millis(render_interval);
    config.shimmer_interval = Duration::from_millis(shimmer_interval);

    // Unknown discriminants fall back to the defaults rather than
    // rejecting an otherwise intact blob.
    config.gradient.mode = mode.unwrap_or(GradientMode::LinearPadding);
    config.gradient.interpolation = interpolation.unwrap_or(Interpolation::Smooth);
    config.gradient.invert = invert;
    config.gradient.padding_begin = padding_begin;
    config.gradient.padding_value = padding_value;
    config.gradient.edge_size = edge_size;
    config.gradient.center_size = center_size;

    config.shimmer.enabled = shimmer_enabled;
    config.shimmer.min_amplitude = min_amplitude;
    config.shimmer.max_amplitude = max_amplitude;
    config.shimmer.evolve_min_steps = evolve_min_steps;
    config.shimmer.evolve_max_steps = evolve_max_steps;
    config.shimmer.hold_min_steps = hold_min_steps;
    config.shimmer.hold_max_steps = hold_max_steps;

    config.changes.restore_counter(counter);
    config.sanitize();

    Ok(config)
}

/// Tracks the last flushed change counter and decides when a dirty
/// configuration is due for a save.
#[derive(Debug, Clone, Copy)]
pub struct SaveDebounce {
    last_saved_counter: u32,
    delay: Duration,
}

impl SaveDebounce {
    pub const fn new() -> Self {
        Self::with_delay(DEFAULT_SAVE_DELAY)
    }

    pub const fn with_delay(delay: Duration) -> Self {
        Self {
            last_saved_counter: 0,
            delay,
        }
    }

    /// True when the configuration changed since the last save and the
    /// latest modification is older than the debounce delay. Wrapping
    /// millisecond arithmetic keeps this true after a clock reset, so a
    /// pre-reboot change is never stuck unsaved.
    pub fn needs_save(&self, config: &Config, now: Instant) -> bool {
        let changes = config.changes();
        if changes.counter() == self.last_saved_counter {
            return false;
        }
        let elapsed = now
            .as_millis()
            .wrapping_sub(changes.last_modified().as_millis());
        elapsed >= self.delay.as_millis()
    }

    /// Record that the current configuration state has been flushed (or
    /// was just loaded from the store).
    pub fn mark_saved(&mut self, config: &Config) {
        self.last_saved_counter = config.changes().counter();
    }
}

impl Default for SaveDebounce {
    fn default() -> Self {
        Self::new()
    }
}
