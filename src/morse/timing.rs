use std::time::Duration;

use crate::config::ConfigError;

/// Length of one dot at speed 1.0
pub const BASE_UNIT_MS: u64 = 50;

/// Units of silence between the dots and dashes of one letter
pub const INTRA_GAP_UNITS: u32 = 1;

pub const MIN_SPEED: f32 = 0.5;
pub const MAX_SPEED: f32 = 3.0;

/// A single Morse symbol in a playback sequence
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MorseSymbol {
    Dot,       // 1 unit tone
    Dash,      // 3 units tone
    LetterGap, // 3 units silence (between letters)
    WordGap,   // 7 units silence (between words)
}

impl MorseSymbol {
    /// Returns the duration in units (1 unit = dot length)
    pub fn units(&self) -> u32 {
        match self {
            MorseSymbol::Dot => 1,
            MorseSymbol::Dash => 3,
            MorseSymbol::LetterGap => 3,
            MorseSymbol::WordGap => 7,
        }
    }

    /// Returns true if this symbol produces a signal
    pub fn is_signal(&self) -> bool {
        matches!(self, MorseSymbol::Dot | MorseSymbol::Dash)
    }
}

/// Playback speed multiplier, always within [`MIN_SPEED`, `MAX_SPEED`]
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Speed(f32);

impl Speed {
    pub const NORMAL: Speed = Speed(1.0);

    pub fn new(value: f32) -> Result<Self, ConfigError> {
        if !(MIN_SPEED..=MAX_SPEED).contains(&value) {
            return Err(ConfigError::SpeedOutOfRange { value });
        }
        Ok(Self(value))
    }

    /// Clamp an arbitrary value into the valid range (NaN falls back to normal speed)
    pub fn clamped(value: f32) -> Self {
        if value.is_nan() {
            return Self::NORMAL;
        }
        Self(value.clamp(MIN_SPEED, MAX_SPEED))
    }

    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::NORMAL
    }
}

fn units_to_duration(units: u32, speed: Speed) -> Duration {
    let micros = (units as u64 * BASE_UNIT_MS * 1000) as f64 / speed.get() as f64;
    Duration::from_micros(micros.round() as u64)
}

/// How long a symbol lasts at the given speed
pub fn duration(symbol: MorseSymbol, speed: Speed) -> Duration {
    units_to_duration(symbol.units(), speed)
}

/// Silence after each dot or dash before the next symbol starts
pub fn intra_gap(speed: Speed) -> Duration {
    units_to_duration(INTRA_GAP_UNITS, speed)
}

/// Delay between starting this symbol and starting the next one
pub fn step_delay(symbol: MorseSymbol, speed: Speed) -> Duration {
    if symbol.is_signal() {
        duration(symbol, speed) + intra_gap(speed)
    } else {
        duration(symbol, speed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_base_durations() {
        let speed = Speed::NORMAL;
        assert_eq!(duration(MorseSymbol::Dot, speed), ms(50));
        assert_eq!(duration(MorseSymbol::Dash, speed), ms(150));
        assert_eq!(intra_gap(speed), ms(50));
        assert_eq!(duration(MorseSymbol::LetterGap, speed), ms(150));
        assert_eq!(duration(MorseSymbol::WordGap, speed), ms(350));
    }

    #[test]
    fn test_dash_is_three_dots() {
        let speed = Speed::NORMAL;
        assert_eq!(
            duration(MorseSymbol::Dash, speed),
            duration(MorseSymbol::Dot, speed) * 3
        );
    }

    #[test]
    fn test_double_speed_halves_durations() {
        let fast = Speed::new(2.0).unwrap();
        for symbol in [
            MorseSymbol::Dot,
            MorseSymbol::Dash,
            MorseSymbol::LetterGap,
            MorseSymbol::WordGap,
        ] {
            assert_eq!(duration(symbol, fast), duration(symbol, Speed::NORMAL) / 2);
        }
    }

    #[test]
    fn test_step_delay_includes_intra_gap_for_signals() {
        let speed = Speed::NORMAL;
        assert_eq!(step_delay(MorseSymbol::Dash, speed), ms(200));
        assert_eq!(step_delay(MorseSymbol::Dot, speed), ms(100));
        assert_eq!(step_delay(MorseSymbol::LetterGap, speed), ms(150));
        assert_eq!(step_delay(MorseSymbol::WordGap, speed), ms(350));
    }

    #[test]
    fn test_speed_range() {
        assert!(Speed::new(0.5).is_ok());
        assert!(Speed::new(3.0).is_ok());
        assert!(matches!(
            Speed::new(0.4),
            Err(ConfigError::SpeedOutOfRange { .. })
        ));
        assert!(Speed::new(3.5).is_err());
        assert!(Speed::new(f32::NAN).is_err());
        assert_eq!(Speed::clamped(0.1).get(), MIN_SPEED);
        assert_eq!(Speed::clamped(9.0).get(), MAX_SPEED);
        assert_eq!(Speed::clamped(f32::NAN), Speed::NORMAL);
    }
}
