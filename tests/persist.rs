mod tests {
    use duotone_led_engine::config::{ColorTarget, Config};
    use duotone_led_engine::color::RgbwF;
    use duotone_led_engine::gradient::{GradientMode, Interpolation};
    use duotone_led_engine::persist::{
        DecodeError, SaveDebounce, decode_config, encode_config,
    };
    use embassy_time::{Duration, Instant};

    fn modified_config() -> Config {
        let now = Instant::from_millis(500);
        let mut config = Config::new(31);
        config.set_color(ColorTarget::One, RgbwF::new(10.0, 20.0, 30.0, 40.0), now);
        config.set_brightness(128.0, now);
        config.set_gradient_mode(GradientMode::EdgeCenter, now);
        config.set_gradient_invert(true, now);
        config.set_interpolation(Interpolation::Linear, now);
        config.set_edge_size(0.2, now);
        config.set_shimmer_amplitude(0.5, 1.5, now);
        config.set_shimmer_enabled(false, now);
        config
    }

    #[test]
    fn test_blob_round_trip() {
        let config = modified_config();
        let blob = encode_config(&config);

        let decoded = decode_config(&blob).expect("blob should decode");

        assert_eq!(decoded.count(), 31);
        assert_eq!(
            decoded.color_staged(ColorTarget::One),
            RgbwF::new(10.0, 20.0, 30.0, 40.0)
        );
        assert_eq!(decoded.brightness_staged(), 128.0);
        assert_eq!(decoded.gradient().mode, GradientMode::EdgeCenter);
        assert_eq!(decoded.gradient().interpolation, Interpolation::Linear);
        assert!(decoded.gradient().invert);
        assert_eq!(decoded.gradient().edge_size, 0.2);
        assert_eq!(decoded.shimmer().min_amplitude, 0.5);
        assert_eq!(decoded.shimmer().max_amplitude, 1.5);
        assert!(!decoded.shimmer().enabled);
        // Change counter survives the round trip.
        assert_eq!(decoded.changes().counter(), config.changes().counter());
    }

    #[test]
    fn test_decode_rejects_short_blob() {
        assert_eq!(decode_config(&[0u8; 4]), Err(DecodeError::TooShort));
    }

    #[test]
    fn test_decode_rejects_foreign_tag() {
        let mut blob = encode_config(&Config::new(31));
        blob[0] ^= 0xFF;
        assert_eq!(decode_config(&blob), Err(DecodeError::TagMismatch));
    }

    #[test]
    fn test_decode_rejects_truncated_payload() {
        let mut blob = encode_config(&Config::new(31));
        blob.truncate(blob.len() - 1);
        assert_eq!(decode_config(&blob), Err(DecodeError::SizeMismatch));
    }

    #[test]
    fn test_decode_rejects_corrupted_payload() {
        let mut blob = encode_config(&Config::new(31));
        let middle = blob.len() / 2;
        blob[middle] = blob[middle].wrapping_add(1);
        assert_eq!(decode_config(&blob), Err(DecodeError::ChecksumMismatch));
    }

    #[test]
    fn test_decode_sanitizes_out_of_range_fields() {
        // A blob written by a different build may carry values outside the
        // documented ranges; patch one in by hand and re-seal the checksum.
        let mut blob = encode_config(&Config::new(31));

        // brightness_staged sits right after the 16-byte tag and the two
        // 16-byte staged colors.
        let offset = 16 + 32;
        blob[offset..offset + 4].copy_from_slice(&9999.0f32.to_le_bytes());

        let payload_end = blob.len() - 2;
        let sum: u32 = blob[16..payload_end].iter().map(|b| u32::from(*b)).sum();
        let csum = (sum & 0xFFFF) as u16;
        blob[payload_end..].copy_from_slice(&csum.to_le_bytes());

        let decoded = decode_config(&blob).expect("patched blob should decode");
        assert_eq!(decoded.brightness_staged(), 255.0);
    }

    #[test]
    fn test_debounce_waits_out_the_delay() {
        let mut config = Config::new(31);
        let debounce = SaveDebounce::with_delay(Duration::from_millis(15_000));

        // Untouched config never needs a save.
        assert!(!debounce.needs_save(&config, Instant::from_millis(100)));

        config.set_brightness(10.0, Instant::from_millis(1_000));
        assert!(!debounce.needs_save(&config, Instant::from_millis(2_000)));
        assert!(debounce.needs_save(&config, Instant::from_millis(16_001)));
    }

    #[test]
    fn test_mark_saved_clears_dirtiness() {
        let mut config = Config::new(31);
        let mut debounce = SaveDebounce::with_delay(Duration::from_millis(15_000));

        config.set_brightness(10.0, Instant::from_millis(1_000));
        assert!(debounce.needs_save(&config, Instant::from_millis(60_000)));

        debounce.mark_saved(&config);
        assert!(!debounce.needs_save(&config, Instant::from_millis(120_000)));
    }

    #[test]
    fn test_immediate_save_request_skips_the_delay() {
        let mut config = Config::new(31);
        let debounce = SaveDebounce::with_delay(Duration::from_millis(15_000));

        config.request_immediate_save(Instant::from_millis(20_000));
        assert!(debounce.needs_save(&config, Instant::from_millis(20_001)));
    }
}
