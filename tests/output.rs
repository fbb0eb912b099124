mod tests {
    use duotone_led_engine::color::{Rgbw, RgbwF};
    use duotone_led_engine::output::apply;

    #[test]
    fn test_identity_passthrough() {
        let colors = [Rgbw::new(10, 20, 30, 40); 2];
        let scale = [RgbwF::splat(1.0); 2];
        let mut pixels = [Rgbw::default(); 2];

        apply(&mut pixels, &colors, &scale, 255.0, 1.0);
        assert_eq!(pixels, colors);
    }

    #[test]
    fn test_scale_is_clamped_before_dimming() {
        let colors = [Rgbw::new(200, 200, 200, 200)];
        let scale = [RgbwF::new(10.0, -5.0, 1.0, 0.5)];
        let mut pixels = [Rgbw::default()];

        // Half brightness: the over-scaled channel caps at 255 first.
        apply(&mut pixels, &colors, &scale, 127.5, 1.0);
        assert_eq!(pixels[0].r(), 128); // 255 * 0.5 rounded
        assert_eq!(pixels[0].g(), 0); // negative scale clamps to zero
        assert_eq!(pixels[0].b(), 100);
        assert_eq!(pixels[0].w(), 50);
    }

    #[test]
    fn test_result_always_within_byte_range() {
        let colors = [Rgbw::new(255, 255, 255, 255); 4];
        let extremes = [
            RgbwF::splat(1000.0),
            RgbwF::splat(-1000.0),
            RgbwF::splat(0.0),
            RgbwF::splat(1.0),
        ];
        let mut pixels = [Rgbw::default(); 4];

        apply(&mut pixels, &colors, &extremes, 255.0, 1.0);
        assert_eq!(pixels[0], Rgbw::new(255, 255, 255, 255));
        assert_eq!(pixels[1], Rgbw::default());
        assert_eq!(pixels[2], Rgbw::default());
        assert_eq!(pixels[3], Rgbw::new(255, 255, 255, 255));
    }

    #[test]
    fn test_rounding_to_nearest() {
        let colors = [Rgbw::new(255, 100, 0, 0)];
        let scale = [RgbwF::splat(1.0)];
        let mut pixels = [Rgbw::default()];

        // onoff 0.5: 255 * 0.5 = 127.5 rounds up to 128;
        // brightness 128/255 on 100: 50.19... rounds down to 50.
        apply(&mut pixels, &colors, &scale, 255.0, 0.5);
        assert_eq!(pixels[0].r(), 128);

        apply(&mut pixels, &colors, &scale, 128.0, 1.0);
        assert_eq!(pixels[0].g(), 50);
    }

    #[test]
    fn test_onoff_zero_blanks_the_frame() {
        let colors = [Rgbw::new(255, 128, 64, 32); 3];
        let scale = [RgbwF::splat(1.2); 3];
        let mut pixels = [Rgbw::new(1, 1, 1, 1); 3];

        apply(&mut pixels, &colors, &scale, 255.0, 0.0);
        assert_eq!(pixels, [Rgbw::default(); 3]);
    }
}
