//! Simulation configuration (RON)
//!
//! Все поля опциональны в файле: недостающие берутся из `Default`.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use thiserror::Error;

use crate::skills::{FIRE_BOLT_DEFAULT, FIRE_BOLT_MAX, FIRE_BOLT_MIN};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Serialize(#[from] ron::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub playfield_width: f32,
    pub playfield_height: f32,
    /// Seed для DeterministicRng (спавн, разброс Fire Bolt)
    pub seed: u64,
    /// Минимальная дистанция орка от игрока при спавне волны
    pub wave_min_distance: f32,
    pub boss_min_distance: f32,
    /// Лимит попыток rejection sampling при спавне
    pub spawn_max_attempts: u32,
    /// Размер стартовой волны
    pub initial_wave: u32,
    /// Через сколько секунд появляется High Orc (None = только вручную)
    pub boss_spawn_delay: Option<f32>,
    pub fire_bolt_count: u32,
    pub sp_regen_rate: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            playfield_width: 800.0,
            playfield_height: 600.0,
            seed: 42,
            wave_min_distance: 200.0,
            boss_min_distance: 300.0,
            spawn_max_attempts: 64,
            initial_wave: 15,
            boss_spawn_delay: Some(30.0),
            fire_bolt_count: FIRE_BOLT_DEFAULT,
            sp_regen_rate: 10.0,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&content)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, Default::default())?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |value: f32| value.is_finite() && value > 0.0;

        if !positive(self.playfield_width) || !positive(self.playfield_height) {
            return Err(ConfigError::Invalid(format!(
                "playfield must be positive, got {}x{}",
                self.playfield_width, self.playfield_height
            )));
        }
        if !(FIRE_BOLT_MIN..=FIRE_BOLT_MAX).contains(&self.fire_bolt_count) {
            return Err(ConfigError::Invalid(format!(
                "fire_bolt_count must be in {}..={}, got {}",
                FIRE_BOLT_MIN, FIRE_BOLT_MAX, self.fire_bolt_count
            )));
        }
        if self.spawn_max_attempts == 0 {
            return Err(ConfigError::Invalid("spawn_max_attempts must be at least 1".into()));
        }
        if self.wave_min_distance < 0.0 || self.boss_min_distance < 0.0 {
            return Err(ConfigError::Invalid("spawn distances must not be negative".into()));
        }
        if !(self.sp_regen_rate.is_finite() && self.sp_regen_rate >= 0.0) {
            return Err(ConfigError::Invalid("sp_regen_rate must not be negative".into()));
        }
        if self.boss_spawn_delay.is_some_and(|delay| !(delay.is_finite() && delay >= 0.0)) {
            return Err(ConfigError::Invalid("boss_spawn_delay must not be negative".into()));
        }
        Ok(())
    }
}
