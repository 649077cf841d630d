use crate::config::{AppSettings, MAX_PITCH_HZ, MIN_PITCH_HZ};
use crate::morse::timing::{MAX_SPEED, MIN_SPEED};
use egui::RichText;

pub fn render_settings_panel(
    ui: &mut egui::Ui,
    settings: &mut AppSettings,
    settings_changed: &mut bool,
    vibration_available: bool,
) {
    egui::ScrollArea::vertical().show(ui, |ui| {
        // Output channels
        egui::CollapsingHeader::new(RichText::new("Outputs").strong())
            .default_open(true)
            .show(ui, |ui| {
                if ui
                    .checkbox(&mut settings.playback.audio_enabled, "Sound")
                    .changed()
                {
                    *settings_changed = true;
                }

                ui.horizontal(|ui| {
                    if ui
                        .checkbox(&mut settings.playback.vibration_enabled, "Vibration")
                        .changed()
                    {
                        *settings_changed = true;
                    }
                    if !vibration_available {
                        ui.label(RichText::new("(not available on this device)").weak());
                    }
                });

                if ui
                    .checkbox(&mut settings.playback.visual_enabled, "Flash")
                    .changed()
                {
                    *settings_changed = true;
                }
            });

        ui.add_space(8.0);

        // Tone and timing
        egui::CollapsingHeader::new(RichText::new("Playback").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Volume:");
                    if ui
                        .add(egui::Slider::new(&mut settings.playback.volume, 0.0..=1.0))
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Pitch:");
                    if ui
                        .add(
                            egui::Slider::new(
                                &mut settings.playback.pitch_hz,
                                MIN_PITCH_HZ..=MAX_PITCH_HZ,
                            )
                            .suffix(" Hz")
                            .fixed_decimals(0),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.horizontal(|ui| {
                    ui.label("Speed:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.playback.speed, MIN_SPEED..=MAX_SPEED)
                                .suffix("×")
                                .fixed_decimals(1),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });

                ui.label(RichText::new("Changes apply to the next Play.").weak());
            });

        ui.add_space(8.0);

        egui::CollapsingHeader::new(RichText::new("Display").strong())
            .default_open(true)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label("Font Size:");
                    if ui
                        .add(
                            egui::Slider::new(&mut settings.ui.font_size, 10.0..=24.0)
                                .fixed_decimals(0),
                        )
                        .changed()
                    {
                        *settings_changed = true;
                    }
                });
            });
    });
}
