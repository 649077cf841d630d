use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::morse::timing::{Speed, MAX_SPEED, MIN_SPEED};
use crate::playback::PlaybackParams;

pub const MIN_PITCH_HZ: f32 = 200.0;
pub const MAX_PITCH_HZ: f32 = 2000.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("speed {value} is outside the range 0.5..=3.0")]
    SpeedOutOfRange { value: f32 },

    #[error("pitch {value} Hz is outside the range 200..=2000 Hz")]
    PitchOutOfRange { value: f32 },

    #[error("volume {value} is outside the range 0.0..=1.0")]
    VolumeOutOfRange { value: f32 },

    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AppSettings {
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub ui: UiSettings,
}

/// Defaults applied to every playback session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlaybackSettings {
    pub audio_enabled: bool,
    pub vibration_enabled: bool,
    pub visual_enabled: bool,
    /// Tone gain (0.0 - 1.0)
    pub volume: f32,
    /// Tone frequency in Hz (200 - 2000)
    pub pitch_hz: f32,
    /// Playback speed multiplier (0.5 - 3.0)
    pub speed: f32,
}

/// Which box the user types into
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionDirection {
    #[default]
    TextToMorse,
    MorseToText,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub font_size: f32,
    pub direction: ConversionDirection,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            audio_enabled: true,
            vibration_enabled: false,
            visual_enabled: true,
            volume: 0.5,
            pitch_hz: 600.0,
            speed: 1.0,
        }
    }
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            direction: ConversionDirection::TextToMorse,
        }
    }
}

impl PlaybackSettings {
    /// Validate the stored values into the parameters a session plays with
    pub fn to_params(&self) -> Result<PlaybackParams, ConfigError> {
        if !(MIN_PITCH_HZ..=MAX_PITCH_HZ).contains(&self.pitch_hz) {
            return Err(ConfigError::PitchOutOfRange {
                value: self.pitch_hz,
            });
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(ConfigError::VolumeOutOfRange { value: self.volume });
        }

        Ok(PlaybackParams {
            audio_enabled: self.audio_enabled,
            vibration_enabled: self.vibration_enabled,
            visual_enabled: self.visual_enabled,
            volume: self.volume,
            pitch_hz: self.pitch_hz,
            speed: Speed::new(self.speed)?,
        })
    }

    /// Pull out-of-range values (e.g. from a hand-edited file) back into range.
    /// Returns true if anything changed.
    pub fn clamp_to_range(&mut self) -> bool {
        let before = self.clone();

        self.volume = if self.volume.is_nan() {
            Self::default().volume
        } else {
            self.volume.clamp(0.0, 1.0)
        };
        self.pitch_hz = if self.pitch_hz.is_nan() {
            Self::default().pitch_hz
        } else {
            self.pitch_hz.clamp(MIN_PITCH_HZ, MAX_PITCH_HZ)
        };
        self.speed = Speed::clamped(self.speed).get();

        let changed = *self != before;
        if changed {
            tracing::warn!(
                volume = before.volume,
                pitch_hz = before.pitch_hz,
                speed = before.speed,
                "playback settings out of range, clamped (speed {}..={})",
                MIN_SPEED,
                MAX_SPEED
            );
        }
        changed
    }
}

pub struct SettingsLoadResult {
    pub settings: AppSettings,
    pub notice: Option<String>,
}

impl AppSettings {
    /// Get the default config file path
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("morse_transmitter").join("settings.toml")
        } else {
            PathBuf::from("settings.toml")
        }
    }

    /// Load settings from the default config path, or return defaults if not found
    pub fn load_with_notice() -> SettingsLoadResult {
        Self::load_with_notice_from(&Self::config_path())
    }

    pub fn load_with_notice_from(path: &Path) -> SettingsLoadResult {
        match Self::load(path) {
            Ok(settings) => {
                tracing::debug!(path = %path.display(), "loaded settings");
                SettingsLoadResult {
                    settings,
                    notice: None,
                }
            }
            Err(err) => {
                let mut notice = None;
                if path.exists() {
                    tracing::warn!(path = %path.display(), error = %err, "unable to load settings");
                    notice = Some(match backup_settings_file(path) {
                        Some(backup_path) => format!(
                            "Settings file was reset due to an incompatible format. Backup saved to {}",
                            backup_path.display()
                        ),
                        None => {
                            "Settings file was reset due to an incompatible format.".to_string()
                        }
                    });
                } else {
                    tracing::debug!(path = %path.display(), "no settings file, using defaults");
                }

                SettingsLoadResult {
                    settings: Self::default(),
                    notice,
                }
            }
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut settings: Self = toml::from_str(&content)?;
        settings.playback.clamp_to_range();
        Ok(settings)
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        // Create parent directory if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "saved settings");
        Ok(())
    }
}

fn backup_settings_file(path: &Path) -> Option<PathBuf> {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .ok()
        .map(|d| d.as_secs())?;
    let file_name = path.file_name()?.to_string_lossy();
    let backup_name = format!("{}.bak.{}", file_name, timestamp);
    let backup_path = path.with_file_name(backup_name);
    if std::fs::rename(path, &backup_path).is_ok() {
        Some(backup_path)
    } else {
        None
    }
}
