use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dao::models::{GameStatus, PlayerKind},
    dto::{
        format_timestamp,
        validation::{validate_hole_pars, validate_par},
    },
    state::{
        controller::{HoleAdvance, SyncStatus},
        game::{
            CompletedGameSummary, GameSession, HoleResult, HoleScore, Player, PlayerContribution,
            PlayerSetup, ScoreLabel, SessionSetup, Stroke,
        },
    },
};

/// Hard ceiling on the number of holes accepted at the HTTP boundary.
const MAX_HOLES: u8 = 36;
const MAX_NAME_LEN: usize = 40;

/// Payload used to start a new scramble round.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGameRequest {
    pub course_name: String,
    /// Number of holes to play; the configured default when omitted.
    #[serde(default)]
    pub total_holes: Option<u8>,
    pub players: Vec<PlayerInput>,
    /// Par for each hole, or empty to enter pars while playing.
    #[serde(default)]
    pub hole_pars: Vec<u8>,
    /// Catalog course to take the hole pars from when `hole_pars` is empty.
    #[serde(default)]
    pub course_id: Option<i64>,
}

impl Validate for CreateGameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.course_name.trim().is_empty() {
            let mut err = ValidationError::new("course_name_empty");
            err.message = Some("Course name must not be empty".into());
            errors.add("course_name", err);
        }

        if let Some(total_holes) = self.total_holes {
            if total_holes == 0 || total_holes > MAX_HOLES {
                let mut err = ValidationError::new("total_holes_range");
                err.message =
                    Some(format!("Hole count must be between 1 and {MAX_HOLES}").into());
                errors.add("total_holes", err);
            } else if let Err(err) = validate_hole_pars(&self.hole_pars, total_holes) {
                errors.add("hole_pars", err);
            }
        } else if let Some(err) = self
            .hole_pars
            .iter()
            .find_map(|par| validate_par(*par).err())
        {
            errors.add("hole_pars", err);
        }

        if self.players.len() < 2 {
            let mut err = ValidationError::new("players_count");
            err.message = Some("A scramble needs at least two players".into());
            errors.add("players", err);
        }
        if self
            .players
            .iter()
            .any(|player| player.name.trim().is_empty() || player.name.chars().count() > MAX_NAME_LEN)
        {
            let mut err = ValidationError::new("player_name");
            err.message =
                Some(format!("Player names must have 1 to {MAX_NAME_LEN} characters").into());
            errors.add("players", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl CreateGameRequest {
    /// Turn the request into a ledger setup, using `default_holes` when no count was given.
    pub fn into_setup(self, default_holes: u8) -> SessionSetup {
        let total_holes = self.total_holes.unwrap_or(default_holes);
        SessionSetup {
            course_name: self.course_name,
            total_holes,
            players: self.players.into_iter().map(Into::into).collect(),
            hole_pars: self.hole_pars,
        }
    }
}

/// Player definition supplied when creating a game.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PlayerInput {
    pub name: String,
    /// Defaults to a guest.
    #[serde(default)]
    pub kind: PlayerKind,
    /// Account of a registered player.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

impl From<PlayerInput> for PlayerSetup {
    fn from(input: PlayerInput) -> Self {
        Self {
            name: input.name,
            kind: input.kind,
            owner_user_id: input.user_id,
        }
    }
}

/// Stroke to append to the current hole.
#[derive(Debug, Deserialize, ToSchema)]
pub struct RecordStrokeRequest {
    /// Player whose ball was played.
    pub player_id: Uuid,
}

/// Par to assign to the current hole.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetParRequest {
    #[validate(range(min = 1, max = 10))]
    pub par: u8,
}

/// Optional par used when finalizing the current hole.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct AdvanceHoleRequest {
    /// Overrides the par already assigned to the hole.
    #[serde(default)]
    #[validate(range(min = 1, max = 10))]
    pub par: Option<u8>,
}

/// Persistence outcome attached to mutating responses.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SyncReport {
    Synced,
    LocalOnly { reason: String },
    Queued { reason: String },
}

impl From<SyncStatus> for SyncReport {
    fn from(status: SyncStatus) -> Self {
        match status {
            SyncStatus::Synced => SyncReport::Synced,
            SyncStatus::LocalOnly { reason } => SyncReport::LocalOnly { reason },
            SyncStatus::Queued { reason } => SyncReport::Queued { reason },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerView {
    pub id: Uuid,
    pub name: String,
    pub kind: PlayerKind,
    pub user_id: Option<Uuid>,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            kind: player.kind,
            user_id: player.owner_user_id,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StrokeView {
    pub sequence_number: u16,
    pub player_id: Uuid,
}

impl From<Stroke> for StrokeView {
    fn from(stroke: Stroke) -> Self {
        Self {
            sequence_number: stroke.sequence_number,
            player_id: stroke.player_id,
        }
    }
}

/// A hole of the ledger, finalized or in progress.
#[derive(Debug, Serialize, ToSchema)]
pub struct HoleView {
    pub hole_number: u8,
    pub par: Option<u8>,
    pub total_strokes: u32,
    pub strokes: Vec<StrokeView>,
    /// Only set once par is known.
    pub label: Option<ScoreLabel>,
}

impl From<&HoleScore> for HoleView {
    fn from(hole: &HoleScore) -> Self {
        Self {
            hole_number: hole.hole_number(),
            par: hole.par(),
            total_strokes: hole.total_strokes(),
            strokes: hole.strokes().iter().copied().map(Into::into).collect(),
            label: hole
                .par()
                .filter(|_| hole.total_strokes() > 0)
                .map(|par| ScoreLabel::classify(hole.total_strokes(), par)),
        }
    }
}

/// Snapshot of the round in progress.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSessionView {
    pub id: Uuid,
    pub course_name: String,
    pub total_holes: u8,
    pub current_hole: u8,
    /// Par that finalizing the current hole would use.
    pub current_par: Option<u8>,
    /// "active", "finish_pending" or "completed".
    pub phase: String,
    pub status: GameStatus,
    /// Whether the header and roster reached the store.
    pub synced: bool,
    pub created_at: String,
    pub players: Vec<PlayerView>,
    /// Finalized holes.
    pub holes: Vec<HoleView>,
    /// The current hole once it has a stroke or a par.
    pub open_hole: Option<HoleView>,
}

impl From<&GameSession> for GameSessionView {
    fn from(session: &GameSession) -> Self {
        Self {
            id: session.id,
            course_name: session.course_name.clone(),
            total_holes: session.total_holes,
            current_hole: session.current_hole(),
            current_par: session.current_par(),
            phase: session.phase().as_str().to_string(),
            status: session.status(),
            synced: session.synced,
            created_at: format_timestamp(session.created_at),
            players: session.players().map(Into::into).collect(),
            holes: session.holes().iter().map(Into::into).collect(),
            open_hole: session.open_hole().map(Into::into),
        }
    }
}

/// Response to a newly created game.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateGameResponse {
    pub game: GameSessionView,
    pub sync: SyncReport,
}

/// Response to a recorded stroke.
#[derive(Debug, Serialize, ToSchema)]
pub struct StrokeResponse {
    pub stroke: StrokeView,
    pub game: GameSessionView,
}

/// Response to an undo; `removed` is empty when there was nothing to undo.
#[derive(Debug, Serialize, ToSchema)]
pub struct UndoResponse {
    pub removed: Option<StrokeView>,
    pub game: GameSessionView,
}

/// Response to finalizing a hole.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdvanceHoleResponse {
    /// Whether every hole is finalized and the round can be completed.
    pub finished: bool,
    pub current_hole: u8,
    pub sync: SyncReport,
    pub game: GameSessionView,
}

impl AdvanceHoleResponse {
    /// Combine the advance outcome with the refreshed session.
    pub fn new(advance: HoleAdvance, sync: SyncStatus, game: GameSessionView) -> Self {
        Self {
            finished: advance.finished,
            current_hole: advance.current_hole,
            sync: sync.into(),
            game,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HoleResultView {
    pub hole_number: u8,
    pub par: u8,
    pub strokes: u32,
    pub relative_to_par: i32,
    pub label: ScoreLabel,
}

impl From<HoleResult> for HoleResultView {
    fn from(hole: HoleResult) -> Self {
        Self {
            hole_number: hole.hole_number,
            par: hole.par,
            strokes: hole.strokes,
            relative_to_par: hole.relative_to_par,
            label: hole.label,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContributionView {
    pub player_id: Uuid,
    pub name: String,
    pub strokes: u32,
    /// Percentage of the team strokes played with this player's ball.
    pub contribution_pct: f64,
}

impl From<PlayerContribution> for ContributionView {
    fn from(contribution: PlayerContribution) -> Self {
        Self {
            player_id: contribution.player_id,
            name: contribution.name,
            strokes: contribution.strokes,
            contribution_pct: contribution.contribution_pct,
        }
    }
}

/// Scorecard of a finished round.
#[derive(Debug, Serialize, ToSchema)]
pub struct GameSummaryView {
    pub game_id: Uuid,
    pub course_name: String,
    pub total_holes: u8,
    pub holes: Vec<HoleResultView>,
    pub total_score: u32,
    pub total_par: u32,
    pub relative_to_par: i32,
    pub contributions: Vec<ContributionView>,
    /// Share of the strokes credited to the requesting user.
    pub user_contribution_pct: Option<f64>,
    pub created_at: String,
    pub completed_at: Option<String>,
}

impl From<CompletedGameSummary> for GameSummaryView {
    fn from(summary: CompletedGameSummary) -> Self {
        Self {
            game_id: summary.game_id,
            course_name: summary.course_name,
            total_holes: summary.total_holes,
            holes: summary.holes.into_iter().map(Into::into).collect(),
            total_score: summary.total_score,
            total_par: summary.total_par,
            relative_to_par: summary.relative_to_par,
            contributions: summary.contributions.into_iter().map(Into::into).collect(),
            user_contribution_pct: summary.user_contribution_pct,
            created_at: format_timestamp(summary.created_at),
            completed_at: summary.completed_at.map(format_timestamp),
        }
    }
}

/// Response to completing a round.
#[derive(Debug, Serialize, ToSchema)]
pub struct CompleteGameResponse {
    pub summary: GameSummaryView,
    pub sync: SyncReport,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(value: serde_json::Value) -> CreateGameRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn minimal_request_is_valid() {
        let payload = request(json!({
            "course_name": "St Andrews",
            "players": [
                { "name": "Ana", "kind": "host" },
                { "name": "Bo" }
            ]
        }));
        assert!(payload.validate().is_ok());

        let setup = payload.into_setup(18);
        assert_eq!(setup.total_holes, 18);
        assert_eq!(setup.players[1].kind, PlayerKind::Guest);
    }

    #[test]
    fn bad_fields_are_all_reported() {
        let payload = request(json!({
            "course_name": "  ",
            "total_holes": 3,
            "hole_pars": [4, 4],
            "players": [{ "name": "" }]
        }));
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("course_name"));
        assert!(fields.contains_key("hole_pars"));
        assert!(fields.contains_key("players"));
    }

    #[test]
    fn sync_report_is_tagged() {
        let report = SyncReport::from(SyncStatus::Queued {
            reason: "offline".into(),
        });
        assert_eq!(
            serde_json::to_value(report).unwrap(),
            json!({ "state": "queued", "reason": "offline" })
        );
    }
}
