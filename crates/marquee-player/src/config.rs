//! Typed player configuration.
//!
//! Serialized into the watch page so the browser shell receives the same
//! validated values the engine uses.

use serde::{Deserialize, Serialize};

use crate::error::{PlayerError, Result};

/// Options handed to the adaptive-stream client on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HlsConfig {
    /// Demux in a background worker when the platform allows it.
    #[serde(default = "default_true")]
    pub enable_worker: bool,

    #[serde(default = "default_true")]
    pub low_latency_mode: bool,

    /// Seconds of already-played media kept in the buffer.
    #[serde(default = "default_back_buffer")]
    pub back_buffer_length_secs: u32,
}

impl Default for HlsConfig {
    fn default() -> Self {
        Self {
            enable_worker: true,
            low_latency_mode: true,
            back_buffer_length_secs: default_back_buffer(),
        }
    }
}

/// Controls rendered in the player skin, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    PlayLarge,
    Play,
    Progress,
    CurrentTime,
    Mute,
    Volume,
    Settings,
    Pip,
    Airplay,
    Fullscreen,
}

/// Menus available under the settings control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettingsMenu {
    Quality,
    Speed,
}

/// Where keyboard shortcuts are listened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardScope {
    /// Shortcuts apply while the player has focus.
    #[serde(default = "default_true")]
    pub focused: bool,
    /// Shortcuts apply anywhere on the page.
    #[serde(default = "default_true")]
    pub global: bool,
}

impl Default for KeyboardScope {
    fn default() -> Self {
        Self {
            focused: true,
            global: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    #[serde(default)]
    pub hls: HlsConfig,

    /// Step for arrow-key seeking, in seconds.
    #[serde(default = "default_seek_step")]
    pub seek_step_secs: f64,

    /// Positions at or below this are not persisted as resume points.
    #[serde(default = "default_resume_threshold")]
    pub resume_threshold_secs: f64,

    #[serde(default = "default_true")]
    pub autoplay: bool,

    #[serde(default = "default_controls")]
    pub controls: Vec<Control>,

    #[serde(default = "default_settings_menus")]
    pub settings_menus: Vec<SettingsMenu>,

    #[serde(default)]
    pub keyboard: KeyboardScope,

    /// Maximum number of streams remembered in the resume store.
    #[serde(default = "default_progress_capacity")]
    pub progress_capacity: usize,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            hls: HlsConfig::default(),
            seek_step_secs: default_seek_step(),
            resume_threshold_secs: default_resume_threshold(),
            autoplay: true,
            controls: default_controls(),
            settings_menus: default_settings_menus(),
            keyboard: KeyboardScope::default(),
            progress_capacity: default_progress_capacity(),
        }
    }
}

impl PlayerConfig {
    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            return Err(PlayerError::invalid_config(format!(
                "seek_step_secs must be positive, got {}",
                self.seek_step_secs
            )));
        }
        if !self.resume_threshold_secs.is_finite() || self.resume_threshold_secs < 0.0 {
            return Err(PlayerError::invalid_config(format!(
                "resume_threshold_secs must be non-negative, got {}",
                self.resume_threshold_secs
            )));
        }
        if self.progress_capacity == 0 {
            return Err(PlayerError::invalid_config(
                "progress_capacity must be at least 1",
            ));
        }
        if self.settings_menus.contains(&SettingsMenu::Quality)
            && !self.controls.contains(&Control::Settings)
        {
            return Err(PlayerError::invalid_config(
                "quality menu requires the settings control",
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_back_buffer() -> u32 {
    90
}

fn default_seek_step() -> f64 {
    10.0
}

fn default_resume_threshold() -> f64 {
    5.0
}

fn default_progress_capacity() -> usize {
    500
}

fn default_controls() -> Vec<Control> {
    vec![
        Control::PlayLarge,
        Control::Play,
        Control::Progress,
        Control::CurrentTime,
        Control::Mute,
        Control::Volume,
        Control::Settings,
        Control::Pip,
        Control::Airplay,
        Control::Fullscreen,
    ]
}

fn default_settings_menus() -> Vec<SettingsMenu> {
    vec![SettingsMenu::Quality, SettingsMenu::Speed]
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_defaults_are_valid() {
        let config = PlayerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.seek_step_secs, 10.0);
        assert_eq!(config.resume_threshold_secs, 5.0);
        assert_eq!(config.hls.back_buffer_length_secs, 90);
    }

    #[test]
    fn test_serialized_names() {
        let json = serde_json::to_value(PlayerConfig::default()).unwrap();
        assert_eq!(json["controls"][0], "play-large");
        assert_eq!(json["controls"][3], "current-time");
        assert_eq!(json["settings_menus"][0], "quality");
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let config: PlayerConfig = serde_json::from_str(r#"{"seek_step_secs": 5}"#).unwrap();
        assert_eq!(config.seek_step_secs, 5.0);
        assert!(config.autoplay);
        assert_eq!(config.controls.len(), 10);
    }

    #[test]
    fn test_rejects_bad_values() {
        let config = PlayerConfig {
            seek_step_secs: 0.0,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(PlayerError::InvalidConfig(_)));

        let config = PlayerConfig {
            progress_capacity: 0,
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(PlayerError::InvalidConfig(_)));

        let config = PlayerConfig {
            controls: vec![Control::Play],
            ..Default::default()
        };
        assert_matches!(config.validate(), Err(PlayerError::InvalidConfig(_)));
    }
}
