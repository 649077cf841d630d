mod app;
mod audio;
mod config;
mod emitter;
mod messages;
mod morse;
mod playback;
mod ui;

use app::MorseApp;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([520.0, 420.0])
            .with_min_inner_size([400.0, 320.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Morse Transmitter",
        options,
        Box::new(|cc| Ok(Box::new(MorseApp::new(cc)))),
    )
}
