//! Generator configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Parameters for one stage generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub min_main_path_length: u32,
    pub max_main_path_length: u32,
    /// Treasure and shop rooms combined
    pub special_room_count: u32,
    /// Chance for each main-path room to grow a side branch
    pub branch_probability: f32,
    /// Placement attempts allowed per special category
    pub special_room_attempts: u32,
    /// Fixed seed; a fresh one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_width: 8,
            grid_height: 8,
            min_main_path_length: 3,
            max_main_path_length: 7,
            special_room_count: 2,
            branch_probability: 0.3,
            special_room_attempts: 20,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject values the generator cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::Invalid {
                field: "grid_width/grid_height",
                reason: format!(
                    "grid must be non-empty, got {}x{}",
                    self.grid_width, self.grid_height
                ),
            });
        }
        if i32::try_from(self.grid_width).is_err() || i32::try_from(self.grid_height).is_err() {
            return Err(ConfigError::Invalid {
                field: "grid_width/grid_height",
                reason: "grid dimensions exceed i32 range".into(),
            });
        }
        if self.min_main_path_length > self.max_main_path_length {
            return Err(ConfigError::Invalid {
                field: "min_main_path_length",
                reason: format!(
                    "{} is greater than max_main_path_length {}",
                    self.min_main_path_length, self.max_main_path_length
                ),
            });
        }
        if !(0.0..=1.0).contains(&self.branch_probability) {
            return Err(ConfigError::Invalid {
                field: "branch_probability",
                reason: format!("{} is outside [0, 1]", self.branch_probability),
            });
        }
        if self.special_room_count > 0 && self.special_room_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "special_room_attempts",
                reason: "must be positive when special rooms are requested".into(),
            });
        }
        Ok(())
    }

    /// Treasure gets the larger half of the special-room count
    pub fn treasure_count(&self) -> u32 {
        self.special_room_count.div_ceil(2)
    }

    pub fn shop_count(&self) -> u32 {
        self.special_room_count / 2
    }
}
