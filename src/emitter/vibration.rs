use std::time::{Duration, Instant};

use super::Emitter;

/// A haptic actuator that can be pulsed for a duration
pub trait VibrationMotor {
    fn pulse(&mut self, duration: Duration);
    fn stop(&mut self);
}

pub struct VibrationEmitter {
    motor: Option<Box<dyn VibrationMotor>>,
}

impl VibrationEmitter {
    pub fn new(motor: Option<Box<dyn VibrationMotor>>) -> Self {
        Self { motor }
    }

    /// Look for a vibration motor on this platform.
    /// Desktop targets have none, so the channel becomes a no-op.
    pub fn detect() -> Self {
        tracing::debug!("no vibration motor available, vibration channel disabled");
        Self::new(None)
    }

    pub fn is_available(&self) -> bool {
        self.motor.is_some()
    }
}

impl Emitter for VibrationEmitter {
    fn fire(&mut self, duration: Duration, _now: Instant) {
        if let Some(motor) = self.motor.as_mut() {
            motor.pulse(duration);
        }
    }

    fn silence(&mut self) {
        if let Some(motor) = self.motor.as_mut() {
            motor.stop();
        }
    }
}
