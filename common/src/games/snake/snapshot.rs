use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Direction, GameStatus, Point};

/// Owned copy of a game's state, shaped for API responses.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub id: String,
    pub snake: SnakeSnapshot,
    pub food: FoodSnapshot,
    pub walls: Vec<WallSnapshot>,
    pub width: i32,
    pub height: i32,
    pub status: GameStatus,
    pub score: u32,
    pub food_count: u32,
    pub time: u32,
    pub last_food_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_update_time: DateTime<Utc>,
    pub max_walls: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SnakeSnapshot {
    pub body: Vec<Point>,
    pub direction: Direction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodSnapshot {
    pub position: Point,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WallSnapshot {
    pub position: Point,
    pub created_at: DateTime<Utc>,
    /// Seconds.
    pub lifetime: u32,
}
