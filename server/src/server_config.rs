use std::time::Duration;

use common::config::Validate;
use common::games::snake::SnakeGameSettings;
use serde::{Deserialize, Serialize};

use crate::game_registry::RegistrySettings;

pub const DEFAULT_CONFIG_PATH: &str = "snake_arcade.yaml";
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const MAX_LEADERBOARD_LIMIT: usize = 100;

/// Process configuration, read from YAML at start-up.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub field_width: i32,
    pub field_height: i32,
    pub max_walls: usize,
    pub tick_interval_ms: u64,
    pub wall_spawn_probability: f64,
    pub near_head_override_probability: f64,
    pub wall_lifetime_min_secs: u32,
    pub wall_lifetime_max_secs: u32,
    pub starvation_timeout_secs: u64,
    pub max_game_age_secs: u64,
    pub leaderboard_default_limit: usize,
    pub rng_seed: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let game = SnakeGameSettings::default();
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            field_width: game.field_width,
            field_height: game.field_height,
            max_walls: game.max_walls,
            tick_interval_ms: 200,
            wall_spawn_probability: game.wall_spawn_probability,
            near_head_override_probability: game.near_head_override_probability,
            wall_lifetime_min_secs: game.wall_lifetime_min_secs,
            wall_lifetime_max_secs: game.wall_lifetime_max_secs,
            starvation_timeout_secs: game.starvation_timeout.as_secs(),
            max_game_age_secs: 600,
            leaderboard_default_limit: 10,
            rng_seed: None,
        }
    }
}

impl ServerConfig {
    pub fn game_settings(&self) -> SnakeGameSettings {
        SnakeGameSettings {
            field_width: self.field_width,
            field_height: self.field_height,
            max_walls: self.max_walls,
            wall_spawn_probability: self.wall_spawn_probability,
            near_head_override_probability: self.near_head_override_probability,
            wall_lifetime_min_secs: self.wall_lifetime_min_secs,
            wall_lifetime_max_secs: self.wall_lifetime_max_secs,
            starvation_timeout: Duration::from_secs(self.starvation_timeout_secs),
            ..SnakeGameSettings::default()
        }
    }

    pub fn registry_settings(&self) -> RegistrySettings {
        RegistrySettings {
            game: self.game_settings(),
            tick_interval: Duration::from_millis(self.tick_interval_ms),
            max_game_age: Duration::from_secs(self.max_game_age_secs),
            rng_seed: self.rng_seed,
        }
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bind_address.trim().is_empty() {
            return Err("Bind address must not be empty".to_string());
        }
        if self.tick_interval_ms < 50 || self.tick_interval_ms > 5000 {
            return Err("Tick interval must be between 50ms and 5000ms".to_string());
        }
        if self.max_game_age_secs < 1 {
            return Err("Max game age must be at least one second".to_string());
        }
        if self.leaderboard_default_limit < 1 || self.leaderboard_default_limit > MAX_LEADERBOARD_LIMIT {
            return Err(format!(
                "Leaderboard default limit must be between 1 and {}",
                MAX_LEADERBOARD_LIMIT
            ));
        }
        self.game_settings().validate()
    }
}
