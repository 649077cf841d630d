pub mod session;

pub use session::{PlaybackSession, PlaybackStatus};

use crate::morse::Speed;

/// Parameters fixed for one playback session
#[derive(Clone, Debug, PartialEq)]
pub struct PlaybackParams {
    pub audio_enabled: bool,
    pub vibration_enabled: bool,
    pub visual_enabled: bool,
    /// Tone gain (0.0 - 1.0)
    pub volume: f32,
    /// Tone frequency in Hz (200 - 2000)
    pub pitch_hz: f32,
    pub speed: Speed,
}
