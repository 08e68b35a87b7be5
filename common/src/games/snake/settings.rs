use std::time::Duration;

use crate::config::Validate;
use super::types::FieldSize;

pub const DEFAULT_FIELD_SIZE: i32 = 15;
pub const DEFAULT_MAX_WALLS: usize = 6;
pub const DEFAULT_INITIAL_SNAKE_LENGTH: usize = 3;
pub const DEFAULT_WALL_SPAWN_PROBABILITY: f64 = 0.2;
pub const DEFAULT_NEAR_HEAD_OVERRIDE_PROBABILITY: f64 = 0.3;
pub const DEFAULT_NEAR_HEAD_RADIUS: i32 = 2;
pub const DEFAULT_WALL_LIFETIME_SECS: (u32, u32) = (5, 14);
pub const DEFAULT_STARVATION_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_FOOD_SCORE: u32 = 10;

/// Tuning parameters of a single game.
#[derive(Clone, Debug, PartialEq)]
pub struct SnakeGameSettings {
    pub field_width: i32,
    pub field_height: i32,
    pub max_walls: usize,
    pub initial_snake_length: usize,
    /// Per-tick probability of attempting a wall spawn.
    pub wall_spawn_probability: f64,
    /// Probability that a cell near the head is still a wall candidate.
    pub near_head_override_probability: f64,
    pub near_head_radius: i32,
    pub wall_lifetime_min_secs: u32,
    pub wall_lifetime_max_secs: u32,
    pub starvation_timeout: Duration,
    pub food_score: u32,
}

impl SnakeGameSettings {
    pub fn field_size(&self) -> FieldSize {
        FieldSize::new(self.field_width, self.field_height)
    }
}

impl Default for SnakeGameSettings {
    fn default() -> Self {
        Self {
            field_width: DEFAULT_FIELD_SIZE,
            field_height: DEFAULT_FIELD_SIZE,
            max_walls: DEFAULT_MAX_WALLS,
            initial_snake_length: DEFAULT_INITIAL_SNAKE_LENGTH,
            wall_spawn_probability: DEFAULT_WALL_SPAWN_PROBABILITY,
            near_head_override_probability: DEFAULT_NEAR_HEAD_OVERRIDE_PROBABILITY,
            near_head_radius: DEFAULT_NEAR_HEAD_RADIUS,
            wall_lifetime_min_secs: DEFAULT_WALL_LIFETIME_SECS.0,
            wall_lifetime_max_secs: DEFAULT_WALL_LIFETIME_SECS.1,
            starvation_timeout: DEFAULT_STARVATION_TIMEOUT,
            food_score: DEFAULT_FOOD_SCORE,
        }
    }
}

impl Validate for SnakeGameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.field_width < 5 || self.field_width > 100 {
            return Err("Field width must be between 5 and 100".to_string());
        }
        if self.field_height < 5 || self.field_height > 100 {
            return Err("Field height must be between 5 and 100".to_string());
        }
        if self.initial_snake_length < 1 || self.initial_snake_length as i32 > self.field_width / 2 + 1 {
            return Err("Initial snake length must fit in the left half of the field".to_string());
        }
        if !(0.0..=1.0).contains(&self.wall_spawn_probability) {
            return Err("Wall spawn probability must be between 0.0 and 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.near_head_override_probability) {
            return Err("Near-head override probability must be between 0.0 and 1.0".to_string());
        }
        if self.near_head_radius < 0 {
            return Err("Near-head radius must not be negative".to_string());
        }
        if self.wall_lifetime_min_secs < 1 || self.wall_lifetime_min_secs > self.wall_lifetime_max_secs {
            return Err("Wall lifetime range must satisfy 1 <= min <= max".to_string());
        }
        if self.starvation_timeout < Duration::from_secs(1) {
            return Err("Starvation timeout must be at least one second".to_string());
        }
        Ok(())
    }
}
