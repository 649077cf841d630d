use std::time::Duration;

/// Messages from UI thread to Audio thread
#[derive(Clone, Debug, PartialEq)]
pub enum AudioCommand {
    /// Sound one tone, replacing whatever is still sounding
    KeyTone {
        frequency_hz: f32,
        volume: f32,
        duration: Duration,
    },
    /// Cut the current tone short
    Silence,
}
