use crate::app::MorseApp;
use crate::config::ConversionDirection;
use crate::playback::PlaybackStatus;
use egui::{Color32, RichText, Vec2};
use std::time::Instant;

const LAMP_ON: Color32 = Color32::from_rgb(255, 200, 40);
const LAMP_OFF: Color32 = Color32::from_rgb(60, 60, 60);

pub fn render_main_panel(ui: &mut egui::Ui, app: &mut MorseApp) {
    if let Some(notice) = app.settings_notice.clone() {
        ui.horizontal(|ui| {
            ui.label(RichText::new(notice).color(Color32::YELLOW));
            if ui.button("Dismiss").clicked() {
                app.settings_notice = None;
            }
        });
        ui.add_space(4.0);
    }

    render_direction(ui, app);

    ui.add_space(8.0);

    match app.settings.ui.direction {
        ConversionDirection::TextToMorse => {
            if render_input(ui, "Text", &mut app.text_input) {
                app.on_text_changed();
            }
            ui.add_space(6.0);
            render_output(ui, "Morse", &app.morse_input);
        }
        ConversionDirection::MorseToText => {
            if render_input(ui, "Morse", &mut app.morse_input) {
                app.on_morse_changed();
            }
            ui.add_space(6.0);
            render_output(ui, "Text", &app.text_input);
        }
    }

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    render_transport(ui, app);

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.button("Clear").clicked() {
            app.clear();
        }

        ui.add_space(10.0);

        if ui.button("Settings").clicked() {
            app.show_settings = !app.show_settings;
        }
    });
}

fn render_direction(ui: &mut egui::Ui, app: &mut MorseApp) {
    let mut direction = app.settings.ui.direction;
    ui.horizontal(|ui| {
        ui.label(RichText::new("Convert:").strong());
        ui.radio_value(&mut direction, ConversionDirection::TextToMorse, "Text → Morse");
        ui.radio_value(&mut direction, ConversionDirection::MorseToText, "Morse → Text");
    });
    app.set_direction(direction);
}

/// Returns true if the text changed
fn render_input(ui: &mut egui::Ui, label: &str, value: &mut String) -> bool {
    ui.label(RichText::new(label).strong());
    let response = ui.add(
        egui::TextEdit::multiline(value)
            .font(egui::TextStyle::Monospace)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    response.changed()
}

fn render_output(ui: &mut egui::Ui, label: &str, value: &str) {
    ui.horizontal(|ui| {
        ui.label(RichText::new(label).strong());
        if ui.small_button("Copy").clicked() {
            ui.ctx().copy_text(value.to_string());
        }
    });
    let mut shown = value;
    ui.add(
        egui::TextEdit::multiline(&mut shown)
            .font(egui::TextStyle::Monospace)
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
}

fn render_transport(ui: &mut egui::Ui, app: &mut MorseApp) {
    let status = app.session.status();

    ui.horizontal(|ui| {
        render_lamp(ui, app.flash.is_lit(Instant::now()));

        ui.add_space(10.0);

        if ui
            .add_enabled(
                status == PlaybackStatus::Idle && !app.morse_input.trim().is_empty(),
                egui::Button::new("Play"),
            )
            .clicked()
        {
            app.play();
        }
        if ui
            .add_enabled(status == PlaybackStatus::Playing, egui::Button::new("Pause"))
            .clicked()
        {
            app.pause();
        }
        if ui
            .add_enabled(status == PlaybackStatus::Paused, egui::Button::new("Resume"))
            .clicked()
        {
            app.resume();
        }
        if ui
            .add_enabled(status != PlaybackStatus::Idle, egui::Button::new("Stop"))
            .clicked()
        {
            app.stop();
        }
    });

    ui.add_space(4.0);

    let (status_text, status_color) = match status {
        PlaybackStatus::Idle => ("Idle", Color32::GRAY),
        PlaybackStatus::Playing => ("Sending", Color32::from_rgb(100, 200, 100)),
        PlaybackStatus::Paused => ("Paused", Color32::YELLOW),
    };

    ui.horizontal(|ui| {
        ui.label(RichText::new("Status:").strong());
        ui.label(RichText::new(status_text).color(status_color));
        if status != PlaybackStatus::Idle {
            ui.add_space(20.0);
            ui.label(format!("{} / {}", app.session.cursor(), app.session.sequence_len()));
        }
        ui.add_space(20.0);
        ui.label(RichText::new("Ctrl+Space play/pause, Esc stop").weak());
    });
}

fn render_lamp(ui: &mut egui::Ui, lit: bool) {
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(20.0), egui::Sense::hover());
    let color = if lit { LAMP_ON } else { LAMP_OFF };
    ui.painter().circle_filled(rect.center(), 9.0, color);
}
