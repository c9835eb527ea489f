use serde::{Deserialize, Serialize};
use serde_with::{json::JsonString, serde_as};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status stored on the `games` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Holes are still being played (or awaiting confirmation).
    Active,
    /// The final summary was committed.
    Completed,
}

/// Role a player holds inside a scramble team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    /// The user who created the game.
    Host,
    /// Another user with an account.
    Registered,
    /// A name-only player without an account.
    #[default]
    Guest,
}

/// Row of the `games` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRow {
    /// Primary key of the game.
    pub id: Uuid,
    /// Owner of the game (the host's account).
    pub user_id: Uuid,
    /// Display name of the course.
    pub course_name: String,
    /// Sum of the planned pars, when the course data provided all of them.
    pub course_par: Option<i32>,
    /// Number of holes to play.
    pub hole_count: i32,
    /// Current lifecycle status.
    pub status: GameStatus,
    /// Team score, set on completion.
    pub total_score: Option<i32>,
    /// Completion timestamp, `null` while the game is open.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Share (percent) of the strokes contributed by the owning user.
    pub user_contribution: Option<f64>,
}

/// Row of the `game_players` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamePlayerRow {
    /// Primary key of the player entry.
    pub id: Uuid,
    /// Game the player belongs to.
    pub game_id: Uuid,
    /// Account linked to the player, if any.
    pub user_id: Option<Uuid>,
    /// Display name.
    pub name: String,
    /// Player role; older rows without the column are guests.
    #[serde(default)]
    pub kind: PlayerKind,
}

/// One stroke as serialized inside `hole_scores.strokes_json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeRecord {
    /// 1-based position of the stroke within its hole.
    pub number: u16,
    /// Player whose ball was used.
    pub player_id: Uuid,
    /// Player name at the time of the stroke, kept for display.
    pub player_name: String,
    /// Account credited with the stroke.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor_user_id: Option<Uuid>,
}

/// Row of the `hole_scores` table.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoleScoreRow {
    /// Primary key, assigned by the backend on first insert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    /// Game the hole belongs to.
    pub game_id: Uuid,
    /// 1-based hole number.
    pub hole_number: i32,
    /// Par of the hole.
    pub par: i32,
    /// Number of strokes the team took.
    pub total_strokes: i32,
    /// Ordered strokes, stored as a JSON string column.
    #[serde_as(as = "JsonString")]
    pub strokes_json: Vec<StrokeRecord>,
}

/// Patch applied to a `games` row when the game is completed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatusUpdate {
    /// New status (always completed today).
    pub status: GameStatus,
    /// Team score.
    pub total_score: i32,
    /// Completion timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub completed_at: OffsetDateTime,
    /// Share (percent) of the strokes contributed by the owning user.
    pub user_contribution: Option<f64>,
}

/// Row of the `draft_games` table: the unsent setup form of one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftGameRow {
    /// Owner of the draft; one draft per user.
    pub user_id: Uuid,
    /// Form content as the client sent it.
    pub game_data: serde_json::Value,
    /// Last time the draft was saved.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

/// A game row together with its roster and hole scores.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    /// The `games` row.
    pub game: GameRow,
    /// Matching `game_players` rows.
    pub players: Vec<GamePlayerRow>,
    /// Matching `hole_scores` rows, in any order.
    pub holes: Vec<HoleScoreRow>,
}

/// Search hit returned by the course catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseCandidate {
    /// Catalog identifier of the course.
    pub id: i64,
    /// Course name.
    pub course_name: String,
    /// Club the course belongs to, when different from the course name.
    pub club_name: Option<String>,
    /// Human readable location ("City, State, Country").
    pub location: Option<String>,
}

/// Par information for a single hole of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CourseHole {
    /// 1-based hole number.
    pub number: u8,
    /// Par of the hole.
    pub par: u8,
    /// Length of the hole from the selected tee.
    pub yardage: Option<u32>,
    /// Stroke index of the hole.
    pub handicap: Option<u8>,
}

/// Course details resolved for the preferred tee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetails {
    /// Catalog identifier of the course.
    pub id: i64,
    /// Course name.
    pub course_name: String,
    /// Name of the tee the holes were taken from.
    pub tee_name: Option<String>,
    /// Total par reported for the tee.
    pub par_total: Option<u32>,
    /// Holes in playing order.
    pub holes: Vec<CourseHole>,
}

impl CourseDetails {
    /// Per-hole pars in playing order.
    pub fn hole_pars(&self) -> Vec<u8> {
        self.holes.iter().map(|hole| hole.par).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn hole_row_stores_strokes_as_json_string() {
        let game_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let row = HoleScoreRow {
            id: None,
            game_id,
            hole_number: 3,
            par: 4,
            total_strokes: 1,
            strokes_json: vec![StrokeRecord {
                number: 1,
                player_id,
                player_name: "Ana".into(),
                contributor_user_id: None,
            }],
        };

        let value = serde_json::to_value(&row).unwrap();
        assert!(value.get("id").is_none());
        let raw = value["strokes_json"].as_str().expect("strokes stored as string");
        let strokes: serde_json::Value = serde_json::from_str(raw).unwrap();
        assert_eq!(strokes[0]["playerName"], "Ana");
        assert_eq!(strokes[0]["number"], 1);

        let back: HoleScoreRow = serde_json::from_value(value).unwrap();
        assert_eq!(back, row);
    }

    #[test]
    fn player_row_without_kind_defaults_to_guest() {
        let row: GamePlayerRow = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "game_id": Uuid::nil(),
            "user_id": null,
            "name": "Walk-on",
        }))
        .unwrap();
        assert_eq!(row.kind, PlayerKind::Guest);
    }

    #[test]
    fn open_game_row_parses_null_completion() {
        let row: GameRow = serde_json::from_value(json!({
            "id": Uuid::nil(),
            "user_id": Uuid::nil(),
            "course_name": "Pebble",
            "course_par": 72,
            "hole_count": 18,
            "status": "active",
            "total_score": null,
            "completed_at": null,
            "created_at": "2025-03-01T12:30:00.123456+00:00",
            "user_contribution": null,
        }))
        .unwrap();
        assert!(row.completed_at.is_none());
        assert_eq!(row.status, GameStatus::Active);
        assert_eq!(row.created_at.year(), 2025);
    }
}
