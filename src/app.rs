use crossbeam_channel::bounded;
use egui::Key;
use std::time::Instant;

use crate::audio::AudioEngine;
use crate::config::{AppSettings, ConversionDirection};
use crate::emitter::{EmitterSet, FlashIndicator, ToneEmitter, VibrationEmitter, VisualEmitter};
use crate::messages::AudioCommand;
use crate::morse::{decode, encode, tokenize};
use crate::playback::{PlaybackSession, PlaybackStatus};
use crate::ui::{render_main_panel, render_settings_panel};

pub struct MorseApp {
    pub settings: AppSettings,
    pub settings_notice: Option<String>,
    pub text_input: String,
    pub morse_input: String,

    // Playback
    pub session: PlaybackSession,
    pub flash: FlashIndicator,
    pub vibration_available: bool,
    audio_engine: Option<AudioEngine>,

    // UI state
    pub show_settings: bool,
    settings_changed: bool,
}

impl MorseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let load_result = AppSettings::load_with_notice();

        // Create channel for audio communication
        let (cmd_tx, cmd_rx) = bounded::<AudioCommand>(64);

        let tone_queue = (cmd_tx, cmd_rx.clone());
        let (audio_engine, tone_queue) = match AudioEngine::new(cmd_rx) {
            Ok(engine) => (Some(engine), Some(tone_queue)),
            Err(e) => {
                tracing::warn!(error = %e, "failed to initialize audio");
                (None, None)
            }
        };

        let flash = FlashIndicator::new();
        let vibration = VibrationEmitter::detect();
        let vibration_available = vibration.is_available();
        let emitters = EmitterSet::new(
            Box::new(ToneEmitter::new(tone_queue)),
            Box::new(vibration),
            Box::new(VisualEmitter::new(flash.clone())),
        );

        Self {
            settings: load_result.settings,
            settings_notice: load_result.notice,
            text_input: String::new(),
            morse_input: String::new(),
            session: PlaybackSession::new(emitters),
            flash,
            vibration_available,
            audio_engine,
            show_settings: false,
            settings_changed: false,
        }
    }

    pub fn on_text_changed(&mut self) {
        self.morse_input = encode(&self.text_input);
    }

    pub fn on_morse_changed(&mut self) {
        self.text_input = decode(&self.morse_input);
    }

    pub fn set_direction(&mut self, direction: ConversionDirection) {
        if self.settings.ui.direction != direction {
            self.settings.ui.direction = direction;
            self.settings_changed = true;
        }
    }

    pub fn play(&mut self) {
        let params = match self.settings.playback.to_params() {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, "playback settings rejected");
                return;
            }
        };

        let sequence = tokenize(&self.morse_input);
        self.session.play(sequence, params, Instant::now());
    }

    pub fn pause(&mut self) {
        self.session.pause();
    }

    pub fn resume(&mut self) {
        self.session.resume(Instant::now());
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    pub fn clear(&mut self) {
        self.stop();
        self.text_input.clear();
        self.morse_input.clear();
    }

    /// Hand queued tone commands to the audio engine
    fn pump_audio(&self) {
        if let Some(ref engine) = self.audio_engine {
            engine.process_commands();
        }
    }

    fn handle_keyboard(&mut self, ctx: &egui::Context) {
        let (escape, space_with_ctrl) = ctx.input(|i| {
            (
                i.key_pressed(Key::Escape),
                i.modifiers.ctrl && i.key_pressed(Key::Space),
            )
        });

        // Escape - Stop
        if escape {
            self.stop();
        }

        // Ctrl+Space - Play / pause / resume
        if space_with_ctrl {
            match self.session.status() {
                PlaybackStatus::Idle => self.play(),
                PlaybackStatus::Playing => self.pause(),
                PlaybackStatus::Paused => self.resume(),
            }
        }
    }

    fn apply_settings_changes(&mut self) {
        if self.settings_changed {
            if let Err(e) = self.settings.save() {
                tracing::warn!(error = %e, "failed to save settings");
            }
            self.settings_changed = false;
        }
    }

    fn schedule_repaint(&self, ctx: &egui::Context) {
        let now = Instant::now();
        let next_step = self
            .session
            .next_due()
            .map(|due| due.saturating_duration_since(now));
        let flash_off = self.flash.remaining(now);

        if let Some(wait) = [next_step, flash_off].into_iter().flatten().min() {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for MorseApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply font size
        ctx.style_mut(|style| {
            style.text_styles.iter_mut().for_each(|(_, font_id)| {
                font_id.size = self.settings.ui.font_size;
            });
        });

        // Run the pending playback step, if due
        self.session.tick(Instant::now());
        self.pump_audio();

        // Handle keyboard input
        self.handle_keyboard(ctx);

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings = !self.show_settings;
                        ui.close();
                    }
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
            });
        });

        // Settings window (separate OS window)
        if self.show_settings {
            let settings = &mut self.settings;
            let settings_changed = &mut self.settings_changed;
            let show_settings = &mut self.show_settings;
            let vibration_available = self.vibration_available;

            ctx.show_viewport_immediate(
                egui::ViewportId::from_hash_of("settings_viewport"),
                egui::ViewportBuilder::default()
                    .with_title("Settings")
                    .with_inner_size([360.0, 320.0]),
                |ctx, _class| {
                    egui::CentralPanel::default().show(ctx, |ui| {
                        render_settings_panel(
                            ui,
                            settings,
                            settings_changed,
                            vibration_available,
                        );
                    });

                    if ctx.input(|i| i.viewport().close_requested()) {
                        *show_settings = false;
                    }
                },
            );
        }

        // Main content
        egui::CentralPanel::default().show(ctx, |ui| {
            render_main_panel(ui, self);
        });

        // Controls clicked this frame may have queued a silence
        self.pump_audio();

        // Apply any settings changes
        self.apply_settings_changes();

        self.schedule_repaint(ctx);
    }
}
