//! Settings file for the shop.
//!
//! The file is TOML and every key is optional:
//!
//! ```toml
//! [game]
//! starting_money = 1000
//! starting_reputation = 50
//! # seed = 42
//!
//! [audio]
//! enabled = true
//! master_volume = 0.3
//! sample_rate = 44100
//!
//! [storage]
//! tutorial_flag = "trumpet-shop.json"
//!
//! [logging]
//! level = "info"
//! file = "trumpet-shop.log"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::audio::{DEFAULT_MASTER_VOLUME, DEFAULT_SAMPLE_RATE};
use crate::game::{STARTING_MONEY, STARTING_REPUTATION};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub game: GameConfig,
    pub audio: AudioConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_money: u64,
    pub starting_reputation: u64,
    /// Fixed RNG seed for reproducible order books and melodies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: STARTING_MONEY,
            starting_reputation: STARTING_REPUTATION,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub enabled: bool,
    pub master_volume: f32,
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            master_volume: DEFAULT_MASTER_VOLUME,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub tutorial_flag: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            tutorial_flag: "trumpet-shop.json".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// Log destination while the game owns the terminal. Unset disables play-mode logging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: Some("trumpet-shop.log".to_string()),
        }
    }
}

impl LoggingConfig {
    pub fn level_filter(&self) -> log::LevelFilter {
        self.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow!("Failed to read config file {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| anyhow!("Failed to parse config file {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise returns the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn create_default(path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(&Config::default())
            .context("Failed to serialize default config")?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.audio.master_volume) {
            return Err(anyhow!(
                "audio.master_volume must be within 0.0..=1.0, got {}",
                self.audio.master_volume
            ));
        }
        if self.audio.sample_rate < 8_000 {
            return Err(anyhow!(
                "audio.sample_rate must be at least 8000, got {}",
                self.audio.sample_rate
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        fs::write(&path, "[game]\nstarting_money = 250\nseed = 9\n").unwrap();
        let config = Config::load(&path).unwrap();
        assert_eq!(config.game.starting_money, 250);
        assert_eq!(config.game.starting_reputation, STARTING_REPUTATION);
        assert_eq!(config.game.seed, Some(9));
        assert_eq!(config.audio, AudioConfig::default());
    }

    #[test]
    fn default_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        Config::create_default(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());
    }

    #[test]
    fn rejects_out_of_range_volume() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        fs::write(&path, "[audio]\nmaster_volume = 1.5\n").unwrap();
        let err = Config::load(&path).unwrap_err();
        assert!(err.to_string().contains("master_volume"));
    }

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.logging.level_filter(), log::LevelFilter::Info);
    }
}
