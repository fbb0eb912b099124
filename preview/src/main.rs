//! Desktop preview app for duotone-led-engine
//!
//! Renders the simulated strip in a window with interactive controls for
//! the two colors, the gradient modes and the shimmer effect. All state
//! changes go through the engine's configuration setters, exactly like
//! the on-device console and bridge would.

use std::time::Instant as StdInstant;

use duotone_led_engine::{
    ColorTarget, Config, GradientMode, Instant, Interpolation, LightEngine, RgbwF,
};
use eframe::egui::{self};

/// Maximum number of LEDs the engine supports in the preview build
const MAX_PIXELS: usize = 180;

/// Default number of LEDs in the simulated strip
const DEFAULT_LED_COUNT: usize = 60;

/// Size of each LED rectangle in pixels
const LED_SIZE: f32 = 12.0;

/// Gap between LEDs
const LED_GAP: f32 = 2.0;

/// Seed for the shimmer random source (fixed so runs are reproducible)
const SHIMMER_SEED: u64 = 0x5eed;

fn main() -> eframe::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 600.0])
            .with_title("Duotone LED Preview"),
        ..Default::default()
    };

    eframe::run_native(
        "duotone-led-preview",
        options,
        Box::new(|_cc| Ok(Box::new(PreviewApp::new()))),
    )
}

struct PreviewApp {
    /// The rendering engine
    engine: LightEngine<MAX_PIXELS>,

    /// Synthetic time in milliseconds
    t_ms: u64,
    /// Wall-clock reference for delta time
    last_frame: StdInstant,
    /// Whether animation is playing
    playing: bool,
    /// Time scale multiplier (1.0 = realtime)
    time_scale: f32,

    // UI state (tracked to detect changes and push setters)
    power: bool,
    brightness: u8,
    color_one: [u8; 3],
    color_two: [u8; 3],
    mode: GradientMode,
    invert: bool,
    smooth_curve: bool,
    padding_begin: f32,
    edge_size: f32,
    center_size: f32,
    shimmer_enabled: bool,
    led_count: usize,
    led_size: f32,
}

impl PreviewApp {
    fn new() -> Self {
        let led_count = DEFAULT_LED_COUNT;
        let app = Self {
            engine: Self::build_engine(led_count),
            t_ms: 0,
            last_frame: StdInstant::now(),
            playing: true,
            time_scale: 1.0,
            power: true,
            brightness: 255,
            color_one: [255, 0, 0],
            color_two: [0, 0, 255],
            mode: GradientMode::LinearPadding,
            invert: false,
            smooth_curve: true,
            padding_begin: 0.1,
            edge_size: 0.1,
            center_size: 0.05,
            shimmer_enabled: true,
            led_count,
            led_size: LED_SIZE,
        };
        app.with_applied_settings()
    }

    fn build_engine(led_count: usize) -> LightEngine<MAX_PIXELS> {
        // Fast fades so the preview reacts snappily to control changes.
        let now = Instant::from_millis(0);
        let mut config = Config::new(led_count);
        config.set_color_increment(8.0, now);
        config.set_brightness_increment(8.0, now);
        config.set_onoff_increment(0.05, now);
        LightEngine::new(config, SHIMMER_SEED, now)
            .expect("preview pixel count is within capacity")
    }

    fn with_applied_settings(mut self) -> Self {
        self.apply_settings();
        self
    }

    /// Push the full UI state into the engine configuration.
    fn apply_settings(&mut self) {
        let now = Instant::from_millis(self.t_ms);
        let config = self.engine.config_mut();

        config.set_color(ColorTarget::One, rgbw_from_srgb(self.color_one), now);
        config.set_color(ColorTarget::Two, rgbw_from_srgb(self.color_two), now);
        config.set_brightness(f32::from(self.brightness), now);
        config.set_power(self.power, now);
        config.set_gradient_mode(self.mode, now);
        config.set_gradient_invert(self.invert, now);
        config.set_interpolation(
            if self.smooth_curve {
                Interpolation::Smooth
            } else {
                Interpolation::Linear
            },
            now,
        );
        config.set_padding_begin(self.padding_begin, now);
        config.set_edge_size(self.edge_size, now);
        config.set_center_size(self.center_size, now);
        config.set_shimmer_enabled(self.shimmer_enabled, now);
    }

    /// Rebuild the engine after a pixel-count change and replay settings.
    fn rebuild_engine(&mut self) {
        self.engine = Self::build_engine(self.led_count);
        self.apply_settings();
    }

    fn reset_time(&mut self) {
        self.t_ms = 0;
        self.last_frame = StdInstant::now();
    }

    fn toggle_playing(&mut self) {
        self.playing = !self.playing;
    }

    /// Update synthetic time based on wall clock and time scale
    fn update_time(&mut self) {
        let now = StdInstant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        if self.playing {
            let delta_ms_f64 = delta.as_secs_f64() * 1000.0 * f64::from(self.time_scale);
            let delta_ms_f64 = if delta_ms_f64.is_finite() {
                #[allow(clippy::cast_precision_loss)]
                delta_ms_f64.clamp(0.0, u64::MAX as f64)
            } else {
                0.0
            };
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let delta_ms = delta_ms_f64 as u64;
            self.t_ms = self.t_ms.wrapping_add(delta_ms);
        }
    }
}

fn rgbw_from_srgb(srgb: [u8; 3]) -> RgbwF {
    RgbwF::new(
        f32::from(srgb[0]),
        f32::from(srgb[1]),
        f32::from(srgb[2]),
        0.0,
    )
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_time();

        // Advance the engine to the synthetic time and grab the frame.
        self.engine.poll(Instant::from_millis(self.t_ms));
        let frame: Vec<_> = self.engine.frame().to_vec();

        // Request continuous repaint for animation
        ctx.request_repaint();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.horizontal(|ui| {
                // <PlaybackControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        if ui.button("⏮ Reset").clicked() {
                            self.reset_time();
                        }
                        if ui
                            .button(if self.playing { "⏸ Pause" } else { "▶ Play" })
                            .clicked()
                        {
                            self.toggle_playing();
                        }
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        let secs = self.t_ms / 1000;
                        let ms = self.t_ms % 1000;
                        ui.label(format!("Time: {secs}.{ms:03}s"));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("Speed:");
                        ui.add(
                            egui::Slider::new(&mut self.time_scale, 0.1..=5.0)
                                .logarithmic(true),
                        );
                    });
                });
                // </PlaybackControls>

                ui.add_space(16.0);

                // <StripControls>
                ui.vertical(|ui| {
                    ui.horizontal(|ui| {
                        ui.label("Size: ");
                        ui.add(egui::Slider::new(&mut self.led_size, 4.0..=32.0));
                    });

                    ui.add_space(4.0);

                    ui.horizontal(|ui| {
                        ui.label("LEDs:");
                        let old_led_count = self.led_count;
                        ui.add(egui::Slider::new(&mut self.led_count, 1usize..=MAX_PIXELS));
                        if self.led_count != old_led_count {
                            self.rebuild_engine();
                        }
                    });
                });
                // </StripControls>
            });

            ui.add_space(16.0);

            let mut changed = false;

            ui.horizontal(|ui| {
                ui.label("Mode:");
                let mut selected = self.mode;
                egui::ComboBox::from_id_salt("gradient_mode")
                    .selected_text(self.mode.as_str())
                    .show_ui(ui, |ui| {
                        for mode in [
                            GradientMode::Linear,
                            GradientMode::LinearPadding,
                            GradientMode::SingleColor,
                            GradientMode::MidpointSplit,
                            GradientMode::EdgeCenter,
                        ] {
                            ui.selectable_value(&mut selected, mode, mode.as_str());
                        }
                    });
                if selected != self.mode {
                    self.mode = selected;
                    changed = true;
                }

                ui.add_space(8.0);
                changed |= ui.checkbox(&mut self.invert, "Invert").changed();
                changed |= ui.checkbox(&mut self.smooth_curve, "Smooth curve").changed();
            });

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label("Color 1:");
                changed |= ui.color_edit_button_srgb(&mut self.color_one).changed();
                ui.label("Color 2:");
                changed |= ui.color_edit_button_srgb(&mut self.color_two).changed();

                ui.add_space(8.0);

                ui.label("Brightness:");
                changed |= ui
                    .add(egui::DragValue::new(&mut self.brightness).range(0u8..=255u8))
                    .changed();

                changed |= ui.checkbox(&mut self.power, "Power").changed();
                changed |= ui.checkbox(&mut self.shimmer_enabled, "Shimmer").changed();
            });

            ui.add_space(4.0);

            ui.horizontal(|ui| {
                ui.label("Padding:");
                changed |= ui
                    .add(egui::Slider::new(&mut self.padding_begin, 0.0..=0.4))
                    .changed();
                ui.label("Edge:");
                changed |= ui
                    .add(egui::Slider::new(&mut self.edge_size, 0.0..=0.5))
                    .changed();
                ui.label("Center:");
                changed |= ui
                    .add(egui::Slider::new(&mut self.center_size, 0.0..=1.0))
                    .changed();
            });

            if changed {
                self.apply_settings();
            }

            ui.add_space(16.0);

            // === LED Display ===
            let available_width = ui.available_width();
            let led_pitch = self.led_size + LED_GAP;

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let leds_per_row = (available_width / led_pitch).floor().max(1.0) as usize;
            let rows = frame.len().div_ceil(leds_per_row);
            #[allow(clippy::cast_precision_loss)]
            let height = rows as f32 * led_pitch;

            let (response, painter) =
                ui.allocate_painter(egui::vec2(available_width, height), egui::Sense::hover());
            let origin = response.rect.min;

            #[allow(clippy::cast_precision_loss)]
            for (i, pixel) in frame.iter().enumerate() {
                let row = i / leds_per_row;
                let col = i % leds_per_row;
                let x = origin.x + col as f32 * led_pitch;
                let y = origin.y + row as f32 * led_pitch;

                let rect = egui::Rect::from_min_size(
                    egui::pos2(x, y),
                    egui::vec2(self.led_size, self.led_size),
                );
                let rgb = pixel.to_rgb8();
                let color = egui::Color32::from_rgb(rgb.r, rgb.g, rgb.b);
                painter.rect_filled(rect, 3.0, color);
            }
        });
    }
}
