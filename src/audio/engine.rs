use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{Receiver, TryRecvError};
use std::sync::{Arc, Mutex};

use super::tone::{Keyer, ToneVoice};
use super::AudioError;
use crate::messages::AudioCommand;

pub struct AudioEngine {
    keyer: Arc<Mutex<Keyer>>,
    cmd_rx: Receiver<AudioCommand>,
    sample_rate: u32,
    _stream: cpal::Stream,
}

impl AudioEngine {
    pub fn new(cmd_rx: Receiver<AudioCommand>) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported_config = device.default_output_config()?;
        let sample_rate = supported_config.sample_rate().0;

        let keyer = Arc::new(Mutex::new(Keyer::default()));
        let keyer_for_callback = Arc::clone(&keyer);

        let stream = match supported_config.sample_format() {
            cpal::SampleFormat::F32 => {
                Self::build_stream::<f32>(&device, &supported_config.into(), keyer_for_callback)?
            }
            cpal::SampleFormat::I16 => {
                Self::build_stream::<i16>(&device, &supported_config.into(), keyer_for_callback)?
            }
            cpal::SampleFormat::U16 => {
                Self::build_stream::<u16>(&device, &supported_config.into(), keyer_for_callback)?
            }
            other => return Err(AudioError::UnsupportedSampleFormat(other)),
        };

        stream.play()?;
        tracing::info!(sample_rate, "audio output started");

        Ok(Self {
            keyer,
            cmd_rx,
            sample_rate,
            _stream: stream,
        })
    }

    fn build_stream<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        keyer: Arc<Mutex<Keyer>>,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: cpal::SizedSample + cpal::FromSample<f32>,
    {
        let channels = config.channels as usize;

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                let num_frames = data.len() / channels;
                let mut mono_buffer = vec![0.0f32; num_frames];

                // A poisoned lock leaves the buffer silent
                if let Ok(mut keyer) = keyer.lock() {
                    keyer.fill_buffer(&mut mono_buffer);
                }

                // Duplicate mono to all channels
                for (frame_idx, frame) in data.chunks_mut(channels).enumerate() {
                    let sample = mono_buffer.get(frame_idx).copied().unwrap_or(0.0);
                    let converted: T = T::from_sample(sample);
                    for channel_sample in frame.iter_mut() {
                        *channel_sample = converted;
                    }
                }
            },
            |err| {
                tracing::warn!(error = %err, "audio stream error");
            },
            None,
        )
    }

    /// Process pending commands (call this from the main thread periodically)
    pub fn process_commands(&self) {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(cmd) => {
                    let Ok(mut keyer) = self.keyer.lock() else {
                        return;
                    };
                    match cmd {
                        AudioCommand::KeyTone {
                            frequency_hz,
                            volume,
                            duration,
                        } => {
                            keyer.key(ToneVoice::new(
                                frequency_hz,
                                volume,
                                duration,
                                self.sample_rate,
                            ));
                        }
                        AudioCommand::Silence => {
                            keyer.silence();
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => break,
            }
        }
    }
}
