use chrono::{DateTime, Utc};

use super::types::Point;

/// A transient obstacle that disappears once its lifetime has elapsed.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub position: Point,
    pub created_at: DateTime<Utc>,
    pub lifetime_secs: u32,
}

impl Wall {
    pub fn new(position: Point, created_at: DateTime<Utc>, lifetime_secs: u32) -> Self {
        Self {
            position,
            created_at,
            lifetime_secs,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        let age_ms = (now - self.created_at).num_milliseconds();
        age_ms >= i64::from(self.lifetime_secs) * 1000
    }
}
