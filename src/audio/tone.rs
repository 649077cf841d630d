use std::time::Duration;

/// Generates sine wave tones with envelope shaping
pub struct ToneGenerator {
    frequency_hz: f32,
    sample_rate: f32,
    phase: f64,
    // Envelope for click-free keying (in samples)
    ramp_samples: usize,
}

impl ToneGenerator {
    pub fn new(frequency_hz: f32, sample_rate: u32) -> Self {
        // Ramp time ~5ms to avoid clicks
        let ramp_samples = (sample_rate as f32 * 0.005) as usize;

        Self {
            frequency_hz,
            sample_rate: sample_rate as f32,
            phase: 0.0,
            ramp_samples,
        }
    }

    /// Generate a sample at the current phase
    pub fn next_sample(&mut self) -> f32 {
        let sample = (self.phase * 2.0 * std::f64::consts::PI).sin() as f32;
        self.phase += self.frequency_hz as f64 / self.sample_rate as f64;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }

    /// Apply raised cosine envelope to avoid clicks
    pub fn envelope(&self, position: usize, total: usize) -> f32 {
        // Short tones (very high speed) get a proportionally shorter ramp
        let ramp = self.ramp_samples.min(total / 2);
        if ramp == 0 {
            return 1.0;
        }

        if position < ramp {
            // Attack: raised cosine ramp up
            0.5 * (1.0 - (std::f32::consts::PI * position as f32 / ramp as f32).cos())
        } else if position >= total - ramp {
            // Release: raised cosine ramp down
            let release_pos = position - (total - ramp);
            0.5 * (1.0 + (std::f32::consts::PI * release_pos as f32 / ramp as f32).cos())
        } else {
            1.0
        }
    }
}

/// The single tone the output device plays at any moment
pub struct ToneVoice {
    generator: ToneGenerator,
    gain: f32,
    samples_total: usize,
    samples_elapsed: usize,
}

impl ToneVoice {
    pub fn new(frequency_hz: f32, volume: f32, duration: Duration, sample_rate: u32) -> Self {
        let samples_total = (duration.as_secs_f64() * sample_rate as f64).round() as usize;
        Self {
            generator: ToneGenerator::new(frequency_hz, sample_rate),
            gain: volume.clamp(0.0, 1.0),
            samples_total,
            samples_elapsed: 0,
        }
    }

    /// Returns None once the tone has run its full duration
    pub fn next_sample(&mut self) -> Option<f32> {
        if self.is_finished() {
            return None;
        }

        let raw = self.generator.next_sample();
        let envelope = self
            .generator
            .envelope(self.samples_elapsed, self.samples_total);
        self.samples_elapsed += 1;

        Some(raw * envelope * self.gain)
    }

    pub fn is_finished(&self) -> bool {
        self.samples_elapsed >= self.samples_total
    }
}

/// Holds at most one voice; keying a new tone drops the old one
#[derive(Default)]
pub struct Keyer {
    voice: Option<ToneVoice>,
}

impl Keyer {
    pub fn key(&mut self, voice: ToneVoice) {
        self.voice = Some(voice);
    }

    pub fn silence(&mut self) {
        self.voice = None;
    }

    /// Fill a mono buffer, writing silence after the voice ends
    pub fn fill_buffer(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = match self.voice.as_mut().and_then(|voice| voice.next_sample()) {
                Some(value) => value,
                None => 0.0,
            };
        }

        if self.voice.as_ref().is_some_and(|voice| voice.is_finished()) {
            self.voice = None;
        }
    }
}
