//! Output channels a playback session drives.
//!
//! Each channel is told to fire for a duration and may be silenced early.
//! Channels never report failure: a channel without the hardware it needs
//! simply does nothing.

pub mod tone;
pub mod vibration;
pub mod visual;

use std::time::{Duration, Instant};

use crate::playback::PlaybackParams;

pub use tone::ToneEmitter;
pub use vibration::VibrationEmitter;
pub use visual::{FlashIndicator, VisualEmitter};

pub trait Emitter {
    /// Pick up per-session parameters (pitch, volume) before the first fire
    fn prepare(&mut self, _params: &PlaybackParams) {}

    /// Produce the signal for `duration`, starting at `now`
    fn fire(&mut self, duration: Duration, now: Instant);

    /// Stop any signal that is still active
    fn silence(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Channel {
    Tone,
    Vibration,
    Visual,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Tone, Channel::Vibration, Channel::Visual];

    pub fn is_enabled(&self, params: &PlaybackParams) -> bool {
        match self {
            Channel::Tone => params.audio_enabled,
            Channel::Vibration => params.vibration_enabled,
            Channel::Visual => params.visual_enabled,
        }
    }
}

/// The three process-wide output channels
pub struct EmitterSet {
    tone: Box<dyn Emitter>,
    vibration: Box<dyn Emitter>,
    visual: Box<dyn Emitter>,
}

impl EmitterSet {
    pub fn new(
        tone: Box<dyn Emitter>,
        vibration: Box<dyn Emitter>,
        visual: Box<dyn Emitter>,
    ) -> Self {
        Self {
            tone,
            vibration,
            visual,
        }
    }

    fn channel_mut(&mut self, channel: Channel) -> &mut Box<dyn Emitter> {
        match channel {
            Channel::Tone => &mut self.tone,
            Channel::Vibration => &mut self.vibration,
            Channel::Visual => &mut self.visual,
        }
    }

    pub fn prepare(&mut self, params: &PlaybackParams) {
        for channel in Channel::ALL {
            self.channel_mut(channel).prepare(params);
        }
    }

    /// Fire every channel enabled in `params`, all starting together
    pub fn fire_enabled(&mut self, params: &PlaybackParams, duration: Duration, now: Instant) {
        for channel in Channel::ALL {
            if channel.is_enabled(params) {
                self.channel_mut(channel).fire(duration, now);
            }
        }
    }

    /// Silence every channel, enabled or not
    pub fn silence_all(&mut self) {
        for channel in Channel::ALL {
            self.channel_mut(channel).silence();
        }
    }
}
