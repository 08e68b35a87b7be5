use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MAX_PLAYER_NAME_LEN: usize = 100;
pub const ANONYMOUS_PLAYER: &str = "anonymous";

/// A finished game as kept on the leaderboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub player_name: String,
    pub score: u32,
    pub time_played: u32,
    pub food_count: u32,
    pub created_at: DateTime<Utc>,
}

impl GameRecord {
    pub fn new(player_name: &str, score: u32, time_played: u32, food_count: u32) -> Self {
        Self {
            player_name: normalize_player_name(player_name),
            score,
            time_played,
            food_count,
            created_at: Utc::now(),
        }
    }
}

pub fn normalize_player_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return ANONYMOUS_PLAYER.to_string();
    }
    trimmed.chars().take(MAX_PLAYER_NAME_LEN).collect()
}

pub trait RecordStore: Send + Sync {
    fn save(&self, record: GameRecord) -> Result<(), String>;

    /// Best records first; ties keep insertion order.
    fn top(&self, limit: usize) -> Result<Vec<GameRecord>, String>;
}

#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<Vec<GameRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordStore for InMemoryRecordStore {
    fn save(&self, record: GameRecord) -> Result<(), String> {
        let mut records = self
            .records
            .write()
            .map_err(|_| "Record store lock poisoned".to_string())?;
        records.push(record);
        Ok(())
    }

    fn top(&self, limit: usize) -> Result<Vec<GameRecord>, String> {
        let records = self
            .records
            .read()
            .map_err(|_| "Record store lock poisoned".to_string())?;

        let mut sorted: Vec<GameRecord> = records.clone();
        // Stable sort keeps earlier records ahead on equal scores.
        sorted.sort_by(|a, b| b.score.cmp(&a.score));
        sorted.truncate(limit);
        Ok(sorted)
    }
}
