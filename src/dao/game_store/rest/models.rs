use serde::Deserialize;

use crate::dao::models::{GamePlayerRow, GameRecord, GameRow, HoleScoreRow};

/// Game headers.
pub const GAMES_TABLE: &str = "games";
/// Rosters.
pub const PLAYERS_TABLE: &str = "game_players";
/// One row per finalized hole.
pub const HOLES_TABLE: &str = "hole_scores";
/// Saved setup forms, one per user.
pub const DRAFTS_TABLE: &str = "draft_games";
/// `select` clause embedding the roster and the hole scores into each game row.
pub const GAME_WITH_RELATIONS: &str = "*,game_players(*),hole_scores(*)";
/// `Prefer` header turning inserts into idempotent upserts.
pub const PREFER_UPSERT: &str = "resolution=merge-duplicates,return=minimal";

/// A `games` row with its embedded relations, as returned by resource embedding.
#[derive(Debug, Deserialize)]
pub struct EmbeddedGameRow {
    #[serde(flatten)]
    pub game: GameRow,
    #[serde(default)]
    pub game_players: Vec<GamePlayerRow>,
    #[serde(default)]
    pub hole_scores: Vec<HoleScoreRow>,
}

impl From<EmbeddedGameRow> for GameRecord {
    fn from(row: EmbeddedGameRow) -> Self {
        let mut holes = row.hole_scores;
        holes.sort_by_key(|hole| hole.hole_number);
        Self {
            game: row.game,
            players: row.game_players,
            holes,
        }
    }
}

/// Build an `eq.` filter value.
pub fn eq(value: impl std::fmt::Display) -> String {
    format!("eq.{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::{GameStatus, PlayerKind};
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn embedded_row_maps_into_sorted_record() {
        let game_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let payload = json!({
            "id": game_id,
            "user_id": Uuid::nil(),
            "course_name": "Links",
            "course_par": 8,
            "hole_count": 2,
            "status": "completed",
            "total_score": 7,
            "completed_at": "2025-04-02T18:00:00Z",
            "created_at": "2025-04-02T16:00:00Z",
            "user_contribution": 57.1,
            "game_players": [
                { "id": player_id, "game_id": game_id, "user_id": null, "name": "Bo", "kind": "registered" }
            ],
            "hole_scores": [
                { "id": Uuid::new_v4(), "game_id": game_id, "hole_number": 2, "par": 4, "total_strokes": 3,
                  "strokes_json": "[]" },
                { "id": Uuid::new_v4(), "game_id": game_id, "hole_number": 1, "par": 4, "total_strokes": 4,
                  "strokes_json": format!("[{{\"number\":1,\"playerId\":\"{player_id}\",\"playerName\":\"Bo\"}}]") }
            ]
        });

        let row: EmbeddedGameRow = serde_json::from_value(payload).unwrap();
        let record: GameRecord = row.into();

        assert_eq!(record.game.status, GameStatus::Completed);
        assert_eq!(record.players[0].kind, PlayerKind::Registered);
        assert_eq!(record.holes[0].hole_number, 1);
        assert_eq!(record.holes[0].strokes_json[0].player_id, player_id);
        assert!(record.holes[1].strokes_json.is_empty());
    }

    #[test]
    fn eq_filter_formats_value() {
        assert_eq!(eq(42), "eq.42");
    }
}
