mod tests {
    use duotone_led_engine::color::RgbwF;
    use duotone_led_engine::shimmer::{Shimmer, ShimmerParams, shift_scale_channel};

    #[test]
    fn test_shift_forward_enters_at_first_pixel() {
        let mut scale = [RgbwF::splat(1.0); 3];
        shift_scale_channel(&mut scale, 2.0, 0, true);

        assert_eq!(scale[0].0[0], 2.0);
        assert_eq!(scale[1].0[0], 1.0);
        assert_eq!(scale[2].0[0], 1.0);
        // Other channels untouched.
        assert_eq!(scale[0].0[1], 1.0);
    }

    #[test]
    fn test_shift_forward_moves_existing_values() {
        let mut scale = [
            RgbwF::new(1.0, 0.0, 0.0, 0.0),
            RgbwF::new(2.0, 0.0, 0.0, 0.0),
            RgbwF::new(3.0, 0.0, 0.0, 0.0),
        ];
        shift_scale_channel(&mut scale, 9.0, 0, true);
        assert_eq!(scale[0].0[0], 9.0);
        assert_eq!(scale[1].0[0], 1.0);
        assert_eq!(scale[2].0[0], 2.0);
    }

    #[test]
    fn test_shift_backward_enters_at_last_pixel() {
        let mut scale = [
            RgbwF::new(0.0, 1.0, 0.0, 0.0),
            RgbwF::new(0.0, 2.0, 0.0, 0.0),
            RgbwF::new(0.0, 3.0, 0.0, 0.0),
        ];
        shift_scale_channel(&mut scale, 9.0, 1, false);
        assert_eq!(scale[0].0[1], 2.0);
        assert_eq!(scale[1].0[1], 3.0);
        assert_eq!(scale[2].0[1], 9.0);
    }

    #[test]
    fn test_shift_ignores_invalid_channel_and_empty_register() {
        let mut scale = [RgbwF::splat(1.0); 2];
        shift_scale_channel(&mut scale, 5.0, 4, true);
        assert_eq!(scale, [RgbwF::splat(1.0); 2]);

        let mut empty: [RgbwF; 0] = [];
        shift_scale_channel(&mut empty, 5.0, 0, true);
    }

    #[test]
    fn test_disabled_effect_pushes_neutral() {
        let params = ShimmerParams {
            enabled: false,
            ..ShimmerParams::default()
        };
        let mut shimmer = Shimmer::new(7);
        let mut scale = [RgbwF::splat(0.5); 3];

        for _ in 0..3 {
            shimmer.tick(&params, &mut scale);
        }
        assert_eq!(scale, [RgbwF::splat(1.0); 3]);
    }

    #[test]
    fn test_outputs_stay_within_amplitude_bounds() {
        let params = ShimmerParams::default();
        let mut shimmer = Shimmer::new(42);
        let mut scale = [RgbwF::splat(1.0); 4];

        for _ in 0..10_000 {
            shimmer.tick(&params, &mut scale);
            for output in shimmer.outputs() {
                assert!(output >= params.min_amplitude - 1e-6);
                assert!(output <= params.max_amplitude + 1e-6);
            }
        }

        // The register only ever holds oscillator outputs (or the initial
        // neutral factor), so it obeys the same bounds.
        for pixel in &scale {
            for channel in 0..4 {
                assert!(pixel.0[channel] >= params.min_amplitude - 1e-6);
                assert!(pixel.0[channel] <= params.max_amplitude + 1e-6);
            }
        }
    }

    #[test]
    fn test_oscillators_evolve_away_from_neutral() {
        let params = ShimmerParams::default();
        let mut shimmer = Shimmer::new(1);
        let mut scale = [RgbwF::splat(1.0); 2];

        for _ in 0..500 {
            shimmer.tick(&params, &mut scale);
        }
        let moved = shimmer
            .outputs()
            .iter()
            .any(|output| (output - 1.0).abs() > 1e-3);
        assert!(moved, "expected at least one channel to drift off 1.0");
    }

    #[test]
    fn test_channels_travel_in_alternating_directions() {
        let params = ShimmerParams {
            // Degenerate amplitude range pins every draw to 2.0 so the
            // direction of travel is observable.
            min_amplitude: 2.0,
            max_amplitude: 2.0,
            evolve_min_steps: 0.0,
            evolve_max_steps: 0.0,
            hold_min_steps: 0,
            hold_max_steps: 0,
            enabled: true,
        };
        let mut shimmer = Shimmer::new(3);
        let mut scale = [RgbwF::splat(1.0); 4];

        // One tick inserts at one end only.
        shimmer.tick(&params, &mut scale);
        assert_eq!(scale[0].0[0], 2.0);
        assert_eq!(scale[3].0[0], 1.0);
        assert_eq!(scale[3].0[1], 2.0);
        assert_eq!(scale[0].0[1], 1.0);
        assert_eq!(scale[0].0[2], 2.0);
        assert_eq!(scale[3].0[3], 2.0);
    }
}
