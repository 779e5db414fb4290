//! SimulationConfig — tuning data симуляции (JSON)
//!
//! Все секции опциональны: отсутствующие поля берутся из Default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::{AIConfig, UtilityTuning};
use crate::clock::ClockConfig;
use crate::power::GridConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: u64,
    pub grid: GridConfig,
    pub clock: ClockConfig,
    pub utility: UtilityTuning,
    /// Параметры врагов по умолчанию (спавнер копирует в AIConfig)
    pub agent: AIConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid: GridConfig::default(),
            clock: ClockConfig::default(),
            utility: UtilityTuning::default(),
            agent: AIConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let grid = &self.grid;
        if grid.max_power < 0.0 {
            return Err(ConfigError::Invalid("grid.max_power must be >= 0".into()));
        }
        if grid.initial_power < 0.0 || grid.initial_power > grid.max_power {
            return Err(ConfigError::Invalid(format!(
                "grid.initial_power {} outside [0, {}]",
                grid.initial_power, grid.max_power
            )));
        }
        if grid.tick_interval_secs <= 0.0 {
            return Err(ConfigError::Invalid("grid.tick_interval_secs must be > 0".into()));
        }

        if self.clock.day_length_secs <= 0.0 {
            return Err(ConfigError::Invalid("clock.day_length_secs must be > 0".into()));
        }

        let agent = &self.agent;
        if agent.attack_radius < 0.0 || agent.patrol_radius < 0.0 {
            return Err(ConfigError::Invalid("agent radii must be >= 0".into()));
        }
        if agent.attack_radius >= agent.chase_radius {
            return Err(ConfigError::Invalid(format!(
                "agent.attack_radius ({}) must be < chase_radius ({})",
                agent.attack_radius, agent.chase_radius
            )));
        }
        if agent.attack_cooldown < 0.0 {
            return Err(ConfigError::Invalid("agent.attack_cooldown must be >= 0".into()));
        }

        Ok(())
    }
}
