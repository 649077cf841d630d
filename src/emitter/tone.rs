use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::time::{Duration, Instant};

use super::Emitter;
use crate::messages::AudioCommand;
use crate::playback::PlaybackParams;

/// Sends tones to the audio engine. Without an engine every call is a no-op.
pub struct ToneEmitter {
    /// Command queue to the engine, plus a handle on its receiving end used
    /// to clear stale tones when the queue is full
    queue: Option<(Sender<AudioCommand>, Receiver<AudioCommand>)>,
    frequency_hz: f32,
    volume: f32,
}

impl ToneEmitter {
    pub fn new(queue: Option<(Sender<AudioCommand>, Receiver<AudioCommand>)>) -> Self {
        if queue.is_none() {
            tracing::warn!("no audio output, tone channel disabled");
        }
        Self {
            queue,
            frequency_hz: 600.0,
            volume: 0.5,
        }
    }
}

impl Emitter for ToneEmitter {
    fn prepare(&mut self, params: &PlaybackParams) {
        self.frequency_hz = params.pitch_hz;
        self.volume = params.volume;
    }

    fn fire(&mut self, duration: Duration, _now: Instant) {
        let Some((tx, _)) = &self.queue else {
            return;
        };

        let cmd = AudioCommand::KeyTone {
            frequency_hz: self.frequency_hz,
            volume: self.volume,
            duration,
        };
        if tx.try_send(cmd).is_err() {
            tracing::trace!("audio command queue full, tone dropped");
        }
    }

    fn silence(&mut self) {
        let Some((tx, rx)) = &self.queue else {
            return;
        };

        if let Err(TrySendError::Full(cmd)) = tx.try_send(AudioCommand::Silence) {
            // Everything still queued is older than the silence
            let dropped = rx.try_iter().count();
            tracing::debug!(dropped, "audio command queue full, cleared for silence");
            if tx.try_send(cmd).is_err() {
                tracing::warn!("silence could not be queued");
            }
        }
    }
}
