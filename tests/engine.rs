mod tests {
    use duotone_led_engine::color::{Rgbw, RgbwF};
    use duotone_led_engine::config::{ColorTarget, Config};
    use duotone_led_engine::engine::{InitError, LightEngine};
    use duotone_led_engine::gradient::GradientMode;
    use duotone_led_engine::{Fixture, OutputDriver};
    use embassy_time::Instant;

    const SEED: u64 = 99;

    #[test]
    fn test_init_rejects_zero_pixels() {
        let result = LightEngine::<8>::new(Config::new(0), SEED, Instant::from_millis(0));
        assert!(matches!(result, Err(InitError::NoPixels)));
    }

    #[test]
    fn test_init_rejects_count_over_capacity() {
        let result = LightEngine::<8>::new(Config::new(9), SEED, Instant::from_millis(0));
        assert!(matches!(result, Err(InitError::CapacityExceeded)));
    }

    #[test]
    fn test_render_timer_gates_frames() {
        let mut engine =
            LightEngine::<8>::new(Config::new(3), SEED, Instant::from_millis(0)).unwrap();

        // Default interval is 10 ms; nothing happens before it elapses.
        assert!(!engine.poll(Instant::from_millis(5)));
        assert!(engine.poll(Instant::from_millis(11)));
        assert!(!engine.poll(Instant::from_millis(12)));
        // A long stall still produces exactly one frame, no backlog.
        assert!(engine.poll(Instant::from_millis(500)));
        assert!(!engine.poll(Instant::from_millis(501)));
    }

    #[test]
    fn test_linear_scenario_renders_expected_frame() {
        let now = Instant::from_millis(0);
        let mut config = Config::new(3);
        config.set_color(ColorTarget::One, RgbwF::new(255.0, 0.0, 0.0, 0.0), now);
        config.set_color(ColorTarget::Two, RgbwF::new(0.0, 0.0, 255.0, 0.0), now);
        config.set_brightness(255.0, now);
        config.set_gradient_mode(GradientMode::Linear, now);
        config.set_shimmer_enabled(false, now);
        // Jump-size increment so the fade converges in a single tick.
        config.set_color_increment(255.0, now);

        let mut engine = LightEngine::<8>::new(config, SEED, now).unwrap();
        assert!(engine.poll(Instant::from_millis(11)));

        // Gradient blending truncates (127.5 -> 127); output scaling is
        // identity here (scale 1, brightness 255, onoff 1).
        assert_eq!(
            engine.frame(),
            &[
                Rgbw::new(255, 0, 0, 0),
                Rgbw::new(127, 0, 127, 0),
                Rgbw::new(0, 0, 255, 0),
            ]
        );
    }

    #[test]
    fn test_is_fading_reports_settling() {
        let now = Instant::from_millis(0);
        let mut config = Config::new(3);
        config.set_color_increment(255.0, now);
        config.set_shimmer_enabled(false, now);

        let mut engine = LightEngine::<8>::new(config, SEED, now).unwrap();

        // First tick moves both colors onto their staged targets.
        assert!(engine.poll(Instant::from_millis(11)));
        assert!(engine.is_fading());

        assert!(engine.poll(Instant::from_millis(22)));
        assert!(!engine.is_fading());
    }

    #[test]
    fn test_shimmer_modulates_the_scale_register() {
        let now = Instant::from_millis(0);
        let mut engine = LightEngine::<8>::new(Config::new(4), SEED, now).unwrap();

        for tick in 1..=300 {
            engine.poll(Instant::from_millis(tick * 11));
        }

        let params = *engine.config().shimmer();
        let mut moved = false;
        for pixel in engine.scale() {
            for channel in 0..4 {
                let value = pixel.0[channel];
                assert!(value >= params.min_amplitude - 1e-6);
                assert!(value <= params.max_amplitude + 1e-6);
                if (value - 1.0).abs() > 1e-3 {
                    moved = true;
                }
            }
        }
        assert!(moved, "expected the shimmer to leave the neutral scale");
    }

    #[test]
    fn test_set_pixel_checks_bounds() {
        let now = Instant::from_millis(0);
        let mut engine = LightEngine::<8>::new(Config::new(3), SEED, now).unwrap();

        assert!(engine.set_pixel(2, Rgbw::new(1, 2, 3, 4)));
        assert_eq!(engine.frame()[2], Rgbw::new(1, 2, 3, 4));

        // Index 3 is within capacity but outside the configured count.
        assert!(!engine.set_pixel(3, Rgbw::new(9, 9, 9, 9)));
    }

    #[test]
    fn test_clear_blanks_the_frame() {
        let now = Instant::from_millis(0);
        let mut config = Config::new(3);
        config.set_color_increment(255.0, now);
        let mut engine = LightEngine::<8>::new(config, SEED, now).unwrap();

        engine.poll(Instant::from_millis(11));
        assert!(engine.frame().iter().any(|pixel| *pixel != Rgbw::default()));

        engine.clear();
        assert!(engine.frame().iter().all(|pixel| *pixel == Rgbw::default()));
    }

    #[derive(Default)]
    struct CountingDriver {
        initialized: bool,
        writes: usize,
        clears: usize,
        last_frame_len: usize,
    }

    impl OutputDriver for CountingDriver {
        fn init(&mut self) -> bool {
            self.initialized = true;
            true
        }

        fn write(&mut self, frame: &[Rgbw]) {
            self.writes += 1;
            self.last_frame_len = frame.len();
        }

        fn clear(&mut self) {
            self.clears += 1;
        }
    }

    struct FailingDriver;

    impl OutputDriver for FailingDriver {
        fn init(&mut self) -> bool {
            false
        }

        fn write(&mut self, _frame: &[Rgbw]) {}
    }

    #[test]
    fn test_fixture_writes_only_rendered_frames() {
        let now = Instant::from_millis(0);
        let engine = LightEngine::<8>::new(Config::new(3), SEED, now).unwrap();
        let mut fixture = Fixture::new(engine, CountingDriver::default()).unwrap();

        assert!(fixture.output().initialized);
        assert_eq!(fixture.output().clears, 1);

        assert!(!fixture.poll(Instant::from_millis(5)));
        assert_eq!(fixture.output().writes, 0);

        assert!(fixture.poll(Instant::from_millis(11)));
        assert_eq!(fixture.output().writes, 1);
        assert_eq!(fixture.output().last_frame_len, 3);
    }

    #[test]
    fn test_fixture_rejects_failing_driver() {
        let engine =
            LightEngine::<8>::new(Config::new(3), SEED, Instant::from_millis(0)).unwrap();
        let result = Fixture::new(engine, FailingDriver);
        assert!(matches!(result, Err(InitError::Output)));
    }
}
