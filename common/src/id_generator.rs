use chrono::{DateTime, Local};
use rand::Rng;

use crate::GameId;

/// `<yyyyMMddHHmmss>-<8 hex digits>`, e.g. `20260101120000-0f3a9c21`.
pub fn generate_game_id(now: DateTime<Local>) -> GameId {
    let suffix: u32 = rand::rng().random();
    GameId::new(format!("{}-{:08x}", now.format("%Y%m%d%H%M%S"), suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_game_id_shape() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        let id = generate_game_id(now);
        let (stamp, suffix) = id.as_str().split_once('-').unwrap();
        assert_eq!(stamp, "20260304050607");
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
