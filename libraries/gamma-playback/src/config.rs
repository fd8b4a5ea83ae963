//! Controller configuration
//!
//! Loaded from an optional TOML file with `GAMMA_`-prefixed environment
//! overrides (nested keys use `__`, e.g. `GAMMA_SLEEP_TIMER__MAX_MINUTES`).

use crate::error::{PlaybackError, Result};
use gamma_core::AudioMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ControllerConfig {
    /// Length of the preview window for gated tracks
    #[serde(default = "default_trial_duration_secs")]
    pub trial_duration_secs: u64,

    /// Volume used until the user moves the slider (0.0 - 1.0)
    #[serde(default = "default_volume")]
    pub default_volume: f32,

    #[serde(default)]
    pub sleep_timer: SleepTimerBounds,

    #[serde(default)]
    pub audio_mode: AudioMode,

    #[serde(default)]
    pub notification: NotificationSettings,

    /// Buffered controller events per subscriber
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,

    /// Queued commands before callers wait
    #[serde(default = "default_command_capacity")]
    pub command_capacity: usize,
}

/// Allowed sleep timer durations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SleepTimerBounds {
    #[serde(default = "default_min_minutes")]
    pub min_minutes: u32,

    #[serde(default = "default_max_minutes")]
    pub max_minutes: u32,

    #[serde(default = "default_step_minutes")]
    pub step_minutes: u32,
}

impl SleepTimerBounds {
    /// Whether `minutes` lies in range and on a step
    pub fn accepts(&self, minutes: u32) -> bool {
        self.step_minutes != 0
            && minutes >= self.min_minutes
            && minutes <= self.max_minutes
            && (minutes - self.min_minutes) % self.step_minutes == 0
    }
}

impl Default for SleepTimerBounds {
    fn default() -> Self {
        Self {
            min_minutes: default_min_minutes(),
            max_minutes: default_max_minutes(),
            step_minutes: default_step_minutes(),
        }
    }
}

/// Now-playing notification text
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NotificationSettings {
    #[serde(default = "default_title")]
    pub title: String,

    /// Appended to the title during a trial
    #[serde(default = "default_trial_suffix")]
    pub trial_suffix: String,

    #[serde(default = "default_paused_title")]
    pub paused_title: String,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            trial_suffix: default_trial_suffix(),
            paused_title: default_paused_title(),
        }
    }
}

impl ControllerConfig {
    /// Load configuration from an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path).required(true));
        }

        settings = settings.add_source(
            config::Environment::with_prefix("GAMMA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .map_err(|e| PlaybackError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| PlaybackError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.trial_duration_secs == 0 {
            return Err(PlaybackError::Config(
                "trial_duration_secs must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.default_volume) {
            return Err(PlaybackError::Config(format!(
                "default_volume must be within 0.0..=1.0, got {}",
                self.default_volume
            )));
        }

        let bounds = &self.sleep_timer;
        if bounds.step_minutes == 0
            || bounds.min_minutes == 0
            || bounds.min_minutes > bounds.max_minutes
        {
            return Err(PlaybackError::Config(format!(
                "invalid sleep timer bounds: {}..={} step {}",
                bounds.min_minutes, bounds.max_minutes, bounds.step_minutes
            )));
        }

        if self.event_capacity == 0 || self.command_capacity == 0 {
            return Err(PlaybackError::Config(
                "channel capacities must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Trial window as a `Duration`
    pub fn trial_duration(&self) -> Duration {
        Duration::from_secs(self.trial_duration_secs)
    }
}

// Default values
fn default_trial_duration_secs() -> u64 {
    60
}

fn default_volume() -> f32 {
    0.8
}

fn default_min_minutes() -> u32 {
    5
}

fn default_max_minutes() -> u32 {
    360
}

fn default_step_minutes() -> u32 {
    5
}

fn default_title() -> String {
    "Now Playing".to_string()
}

fn default_trial_suffix() -> String {
    " (Preview)".to_string()
}

fn default_paused_title() -> String {
    "Paused".to_string()
}

fn default_event_capacity() -> usize {
    64
}

fn default_command_capacity() -> usize {
    32
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            trial_duration_secs: default_trial_duration_secs(),
            default_volume: default_volume(),
            sleep_timer: SleepTimerBounds::default(),
            audio_mode: AudioMode::default(),
            notification: NotificationSettings::default(),
            event_capacity: default_event_capacity(),
            command_capacity: default_command_capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = ControllerConfig::default();
        assert_eq!(config.trial_duration(), Duration::from_secs(60));
        assert_eq!(config.default_volume, 0.8);
        assert_eq!(config.sleep_timer.min_minutes, 5);
        assert_eq!(config.sleep_timer.max_minutes, 360);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sleep_bounds_accept_steps_only() {
        let bounds = SleepTimerBounds::default();
        assert!(bounds.accepts(5));
        assert!(bounds.accepts(30));
        assert!(bounds.accepts(360));
        assert!(!bounds.accepts(0));
        assert!(!bounds.accepts(7));
        assert!(!bounds.accepts(365));
    }

    #[test]
    fn zero_step_bounds_accept_nothing() {
        let bounds = SleepTimerBounds {
            min_minutes: 5,
            max_minutes: 60,
            step_minutes: 0,
        };
        assert!(!bounds.accepts(5));
        assert!(!bounds.accepts(30));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ControllerConfig::from_toml_str(
            r#"
            trial_duration_secs = 30

            [sleep_timer]
            max_minutes = 120

            [audio_mode]
            duck_others = true
            "#,
        )
        .unwrap();

        assert_eq!(config.trial_duration_secs, 30);
        assert_eq!(config.sleep_timer.max_minutes, 120);
        assert_eq!(config.sleep_timer.step_minutes, 5);
        assert!(config.audio_mode.duck_others);
        assert!(config.audio_mode.allow_background);
        assert_eq!(config.notification.title, "Now Playing");
    }

    #[test]
    fn out_of_range_volume_is_rejected() {
        let err = ControllerConfig::from_toml_str("default_volume = 1.5").unwrap_err();
        assert!(matches!(err, PlaybackError::Config(_)));
    }

    #[test]
    fn zero_trial_is_rejected() {
        let config = ControllerConfig {
            trial_duration_secs: 0,
            ..ControllerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "default_volume = 0.5").unwrap();

        let config = ControllerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.default_volume, 0.5);
    }

    #[test]
    fn load_missing_file_fails() {
        let err = ControllerConfig::load(Some(Path::new("/nonexistent/gamma.toml"))).unwrap_err();
        assert!(matches!(err, PlaybackError::Config(_)));
    }
}
