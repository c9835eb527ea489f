use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{
        GamePlayerRow, GameRecord, GameRow, GameStatus, GameStatusUpdate, HoleScoreRow,
        PlayerKind, StrokeRecord,
    },
    state::state_machine::{InvalidTransition, SessionEvent, SessionPhase},
};

/// Identifier of a player inside a game roster.
pub type PlayerId = Uuid;

/// A member of the scramble team.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Stable identifier within the game.
    pub id: PlayerId,
    /// Display name.
    pub name: String,
    /// Role in the team.
    pub kind: PlayerKind,
    /// Account the player belongs to, if any.
    pub owner_user_id: Option<Uuid>,
}

/// One team stroke, attributed to the player whose ball was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    /// 1-based position within the hole.
    pub sequence_number: u16,
    /// Player whose ball was played.
    pub player_id: PlayerId,
    /// Account credited with the stroke.
    pub contributor_user_id: Option<Uuid>,
}

/// Strokes and par of a single hole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoleScore {
    hole_number: u8,
    par: Option<u8>,
    strokes: Vec<Stroke>,
}

impl HoleScore {
    fn new(hole_number: u8) -> Self {
        Self {
            hole_number,
            par: None,
            strokes: Vec::new(),
        }
    }

    /// 1-based hole number.
    pub fn hole_number(&self) -> u8 {
        self.hole_number
    }

    /// Par assigned to the hole, if any yet.
    pub fn par(&self) -> Option<u8> {
        self.par
    }

    /// Strokes in the order they were recorded.
    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    /// Team score on the hole.
    pub fn total_strokes(&self) -> u32 {
        self.strokes.len() as u32
    }

    /// Number of strokes played with `player_id`'s ball.
    pub fn strokes_by(&self, player_id: PlayerId) -> u32 {
        self.strokes
            .iter()
            .filter(|stroke| stroke.player_id == player_id)
            .count() as u32
    }

    fn push_stroke(&mut self, player: &Player) -> Result<Stroke, LedgerError> {
        let sequence_number = u16::try_from(self.strokes.len() + 1)
            .map_err(|_| LedgerError::TooManyStrokes(self.hole_number))?;
        let stroke = Stroke {
            sequence_number,
            player_id: player.id,
            contributor_user_id: player.owner_user_id,
        };
        self.strokes.push(stroke);
        Ok(stroke)
    }
}

/// Golf name of a hole result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ScoreLabel {
    /// Holed with the first stroke.
    HoleInOne,
    /// Three or more under par.
    Albatross,
    /// Two under par.
    Eagle,
    /// One under par.
    Birdie,
    /// Level with par.
    Par,
    /// One over par.
    Bogey,
    /// Two or more over par.
    DoubleBogeyOrWorse,
}

impl ScoreLabel {
    /// Name the result of playing a par-`par` hole in `strokes`.
    pub fn classify(strokes: u32, par: u8) -> Self {
        if strokes == 1 {
            return ScoreLabel::HoleInOne;
        }
        match strokes as i64 - i64::from(par) {
            i64::MIN..=-3 => ScoreLabel::Albatross,
            -2 => ScoreLabel::Eagle,
            -1 => ScoreLabel::Birdie,
            0 => ScoreLabel::Par,
            1 => ScoreLabel::Bogey,
            _ => ScoreLabel::DoubleBogeyOrWorse,
        }
    }
}

/// Player entry supplied when setting up a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSetup {
    /// Display name, trimmed on creation.
    pub name: String,
    /// Role in the team.
    pub kind: PlayerKind,
    /// Linked account; the host falls back to the game owner.
    pub owner_user_id: Option<Uuid>,
}

/// Everything needed to open a new session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSetup {
    /// Course the round is played on.
    pub course_name: String,
    /// Number of holes to play.
    pub total_holes: u8,
    /// Team roster in playing order.
    pub players: Vec<PlayerSetup>,
    /// Planned par for each hole, or empty when the course data is unknown.
    pub hole_pars: Vec<u8>,
}

/// Violations of the score ledger rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Course name is blank.
    #[error("course name must not be empty")]
    EmptyCourseName,
    /// Hole count outside `1..=max`.
    #[error("hole count must be between 1 and {max} (got {got})")]
    HoleCount {
        /// Requested count.
        got: u8,
        /// Configured upper bound.
        max: u8,
    },
    /// Fewer than two players, or nobody besides the host.
    #[error("a scramble needs at least two players and one of them must not be the host")]
    NotEnoughPlayers,
    /// A player name is blank.
    #[error("player name must not be empty")]
    EmptyPlayerName,
    /// More than one host in the roster.
    #[error("only one host player is allowed")]
    MultipleHosts,
    /// Planned pars do not cover every hole.
    #[error("expected {expected} hole pars, got {got}")]
    ParCount {
        /// Number of holes.
        expected: usize,
        /// Number of pars supplied.
        got: usize,
    },
    /// Par of zero.
    #[error("par must be at least 1")]
    InvalidPar,
    /// Stroke numbers are `u16`; the hole is full.
    #[error("hole {0} cannot take any more strokes")]
    TooManyStrokes(u8),
    /// Stroke attributed to someone outside the roster.
    #[error("player `{0}` is not part of this game")]
    UnknownPlayer(PlayerId),
    /// The round has no hole left to play.
    #[error("every hole is already finalized")]
    NoOpenHole,
    /// Finalizing a hole nobody played.
    #[error("hole {0} has no strokes recorded")]
    NoStrokes(u8),
    /// Finalizing a hole without a known par.
    #[error("hole {0} has no par")]
    MissingPar(u8),
    /// Stored rows cannot be turned back into a session.
    #[error("stored game `{game_id}` is inconsistent: {reason}")]
    CorruptRecord {
        /// Offending game.
        game_id: Uuid,
        /// What is wrong with it.
        reason: String,
    },
    /// Phase change not allowed from the current phase.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// In-memory score ledger of one scramble round.
///
/// Finalized holes live in `holes` (always numbered `1..=k`); the hole being
/// played, if it has strokes or an assigned par, lives in `open_hole`. The
/// current hole number is derived from the finalized count so it cannot drift.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSession {
    /// Game identifier, shared with the stored row.
    pub id: Uuid,
    /// Owner of the game.
    pub user_id: Uuid,
    /// Course the round is played on.
    pub course_name: String,
    /// Number of holes to play.
    pub total_holes: u8,
    /// When the round was set up.
    pub created_at: OffsetDateTime,
    /// Whether the game header and roster reached the store.
    pub synced: bool,
    players: IndexMap<PlayerId, Player>,
    planned_pars: Vec<u8>,
    holes: Vec<HoleScore>,
    open_hole: Option<HoleScore>,
    phase: SessionPhase,
}

impl GameSession {
    /// Validate a setup and open a fresh session on hole 1.
    pub fn new(user_id: Uuid, setup: SessionSetup, max_holes: u8) -> Result<Self, LedgerError> {
        let SessionSetup {
            course_name,
            total_holes,
            players,
            hole_pars,
        } = setup;

        let course_name = course_name.trim().to_string();
        if course_name.is_empty() {
            return Err(LedgerError::EmptyCourseName);
        }

        if total_holes == 0 || total_holes > max_holes {
            return Err(LedgerError::HoleCount {
                got: total_holes,
                max: max_holes,
            });
        }

        if !hole_pars.is_empty() && hole_pars.len() != usize::from(total_holes) {
            return Err(LedgerError::ParCount {
                expected: usize::from(total_holes),
                got: hole_pars.len(),
            });
        }
        if hole_pars.contains(&0) {
            return Err(LedgerError::InvalidPar);
        }

        if players.len() < 2 || players.iter().all(|player| player.kind == PlayerKind::Host) {
            return Err(LedgerError::NotEnoughPlayers);
        }
        if players
            .iter()
            .filter(|player| player.kind == PlayerKind::Host)
            .count()
            > 1
        {
            return Err(LedgerError::MultipleHosts);
        }

        let players = players
            .into_iter()
            .map(|setup| {
                let name = setup.name.trim().to_string();
                if name.is_empty() {
                    return Err(LedgerError::EmptyPlayerName);
                }
                let owner_user_id = match setup.kind {
                    PlayerKind::Host => setup.owner_user_id.or(Some(user_id)),
                    _ => setup.owner_user_id,
                };
                let player = Player {
                    id: Uuid::new_v4(),
                    name,
                    kind: setup.kind,
                    owner_user_id,
                };
                Ok((player.id, player))
            })
            .collect::<Result<IndexMap<_, _>, _>>()?;

        Ok(Self {
            id: Uuid::new_v4(),
            user_id,
            course_name,
            total_holes,
            created_at: OffsetDateTime::now_utc(),
            synced: false,
            players,
            planned_pars: hole_pars,
            holes: Vec::new(),
            open_hole: None,
            phase: SessionPhase::Active,
        })
    }

    /// Roster in setup order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Look up a roster member.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    /// Finalized holes, ordered by hole number.
    pub fn holes(&self) -> &[HoleScore] {
        &self.holes
    }

    /// The hole being played, once it has a stroke or a par.
    pub fn open_hole(&self) -> Option<&HoleScore> {
        self.open_hole.as_ref()
    }

    /// Current phase of the round.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Persisted status of the round.
    pub fn status(&self) -> GameStatus {
        self.phase.status()
    }

    /// Lowest hole number without a finalized score, in `1..=total_holes + 1`.
    pub fn current_hole(&self) -> u8 {
        self.holes.len() as u8 + 1
    }

    /// Whether every hole has been finalized.
    pub fn is_finished(&self) -> bool {
        self.phase != SessionPhase::Active
    }

    /// Par planned from course data for `hole_number`.
    pub fn planned_par(&self, hole_number: u8) -> Option<u8> {
        self.planned_pars
            .get(usize::from(hole_number).checked_sub(1)?)
            .copied()
    }

    /// Par that would apply to the current hole if it were finalized now.
    pub fn current_par(&self) -> Option<u8> {
        self.open_hole
            .as_ref()
            .and_then(HoleScore::par)
            .or_else(|| self.planned_par(self.current_hole()))
    }

    /// Sum of the planned pars when the course data covered every hole.
    pub fn course_par(&self) -> Option<u32> {
        (self.planned_pars.len() == usize::from(self.total_holes))
            .then(|| self.planned_pars.iter().map(|par| u32::from(*par)).sum())
    }

    /// Append a stroke played with `player_id`'s ball to the current hole.
    pub fn record_stroke(&mut self, player_id: PlayerId) -> Result<Stroke, LedgerError> {
        if self.phase != SessionPhase::Active {
            return Err(LedgerError::NoOpenHole);
        }
        let player = self
            .players
            .get(&player_id)
            .ok_or(LedgerError::UnknownPlayer(player_id))?;

        let hole_number = self.holes.len() as u8 + 1;
        let hole = self
            .open_hole
            .get_or_insert_with(|| HoleScore::new(hole_number));
        hole.push_stroke(player)
    }

    /// Remove the most recent stroke of the current hole, if there is one.
    pub fn undo_last_stroke(&mut self) -> Option<Stroke> {
        let hole = self.open_hole.as_mut()?;
        let stroke = hole.strokes.pop();
        // A hole opened only by that stroke goes back to not existing.
        if hole.strokes.is_empty() && hole.par.is_none() {
            self.open_hole = None;
        }
        stroke
    }

    /// Assign par to the current hole.
    pub fn set_par(&mut self, par: u8) -> Result<(), LedgerError> {
        if par == 0 {
            return Err(LedgerError::InvalidPar);
        }
        if self.phase != SessionPhase::Active {
            return Err(LedgerError::NoOpenHole);
        }
        let hole_number = self.current_hole();
        self.open_hole
            .get_or_insert_with(|| HoleScore::new(hole_number))
            .par = Some(par);
        Ok(())
    }

    /// Finalize the current hole and move to the next one.
    ///
    /// Par is taken from `par`, else the par already assigned to the hole,
    /// else the planned par. Returns `true` when the finalized hole was the
    /// last one of the round.
    pub fn finalize_hole(&mut self, par: Option<u8>) -> Result<bool, LedgerError> {
        if self.phase != SessionPhase::Active {
            return Err(LedgerError::NoOpenHole);
        }

        let hole_number = self.current_hole();
        let stroke_count = self.open_hole.as_ref().map_or(0, HoleScore::total_strokes);
        if stroke_count == 0 {
            return Err(LedgerError::NoStrokes(hole_number));
        }

        let par = par
            .or_else(|| self.current_par())
            .ok_or(LedgerError::MissingPar(hole_number))?;
        if par == 0 {
            return Err(LedgerError::InvalidPar);
        }

        let last = hole_number == self.total_holes;
        let next = self.phase.next(SessionEvent::HoleFinalized { last })?;

        if let Some(mut hole) = self.open_hole.take() {
            hole.par = Some(par);
            self.holes.push(hole);
        }
        self.phase = next;
        Ok(last)
    }

    /// Commit the round after the last hole was finalized.
    pub fn complete(&mut self) -> Result<(), LedgerError> {
        self.phase = self.phase.next(SessionEvent::Complete)?;
        Ok(())
    }

    /// Derive totals and contributions from the finalized holes.
    pub fn summary(&self, completed_at: Option<OffsetDateTime>) -> CompletedGameSummary {
        let holes = self
            .holes
            .iter()
            .map(|hole| {
                HoleResult::new(
                    hole.hole_number,
                    hole.par.unwrap_or_default(),
                    hole.total_strokes(),
                )
            })
            .collect();

        let tallies = self
            .players
            .values()
            .map(|player| {
                let strokes: u32 = self.holes.iter().map(|hole| hole.strokes_by(player.id)).sum();
                (player.id, player.name.clone(), strokes)
            })
            .collect();

        let user_strokes = self
            .holes
            .iter()
            .flat_map(|hole| hole.strokes.iter())
            .filter(|stroke| stroke.contributor_user_id == Some(self.user_id))
            .count() as u32;

        CompletedGameSummary::from_parts(
            SummaryHeader {
                game_id: self.id,
                course_name: self.course_name.clone(),
                total_holes: self.total_holes,
                created_at: self.created_at,
                completed_at,
            },
            holes,
            tallies,
            user_strokes,
        )
    }

    /// `games` row describing this session.
    pub fn header_row(&self) -> GameRow {
        GameRow {
            id: self.id,
            user_id: self.user_id,
            course_name: self.course_name.clone(),
            course_par: self.course_par().map(|par| par as i32),
            hole_count: i32::from(self.total_holes),
            status: self.status(),
            total_score: None,
            completed_at: None,
            created_at: self.created_at,
            user_contribution: None,
        }
    }

    /// `game_players` rows for the roster.
    pub fn player_rows(&self) -> Vec<GamePlayerRow> {
        self.players
            .values()
            .map(|player| GamePlayerRow {
                id: player.id,
                game_id: self.id,
                user_id: player.owner_user_id,
                name: player.name.clone(),
                kind: player.kind,
            })
            .collect()
    }

    /// `hole_scores` row for a finalized hole.
    pub fn hole_row(&self, hole: &HoleScore) -> HoleScoreRow {
        let strokes_json = hole
            .strokes
            .iter()
            .map(|stroke| StrokeRecord {
                number: stroke.sequence_number,
                player_id: stroke.player_id,
                player_name: self
                    .players
                    .get(&stroke.player_id)
                    .map(|player| player.name.clone())
                    .unwrap_or_default(),
                contributor_user_id: stroke.contributor_user_id,
            })
            .collect();

        HoleScoreRow {
            id: None,
            game_id: self.id,
            hole_number: i32::from(hole.hole_number),
            par: i32::from(hole.par.unwrap_or_default()),
            total_strokes: hole.total_strokes() as i32,
            strokes_json,
        }
    }

    /// `hole_scores` rows for every finalized hole.
    pub fn hole_rows(&self) -> Vec<HoleScoreRow> {
        self.holes.iter().map(|hole| self.hole_row(hole)).collect()
    }
}

impl TryFrom<GameRecord> for GameSession {
    type Error = LedgerError;

    /// Rebuild an unfinished session from its stored rows.
    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let GameRecord {
            game,
            players,
            mut holes,
        } = record;
        let corrupt = |reason: String| LedgerError::CorruptRecord {
            game_id: game.id,
            reason,
        };

        if game.completed_at.is_some() || game.status == GameStatus::Completed {
            return Err(corrupt("game is already completed".into()));
        }
        let total_holes = u8::try_from(game.hole_count)
            .ok()
            .filter(|count| *count > 0)
            .ok_or_else(|| corrupt(format!("invalid hole count {}", game.hole_count)))?;
        if holes.len() > usize::from(total_holes) {
            return Err(corrupt(format!(
                "{} hole scores for a {total_holes}-hole round",
                holes.len()
            )));
        }

        let players: IndexMap<PlayerId, Player> = players
            .into_iter()
            .map(|row| {
                (
                    row.id,
                    Player {
                        id: row.id,
                        name: row.name,
                        kind: row.kind,
                        owner_user_id: row.user_id,
                    },
                )
            })
            .collect();

        holes.sort_by_key(|hole| hole.hole_number);
        let mut finalized = Vec::with_capacity(holes.len());
        for (index, row) in holes.into_iter().enumerate() {
            let expected = index as i32 + 1;
            if row.hole_number != expected {
                return Err(corrupt(format!(
                    "expected hole {expected}, found hole {}",
                    row.hole_number
                )));
            }
            let par = u8::try_from(row.par)
                .ok()
                .filter(|par| *par > 0)
                .ok_or_else(|| corrupt(format!("hole {expected} has invalid par {}", row.par)))?;
            if row.strokes_json.is_empty() {
                return Err(corrupt(format!("hole {expected} has no strokes")));
            }

            let mut strokes = Vec::with_capacity(row.strokes_json.len());
            let mut records = row.strokes_json;
            records.sort_by_key(|stroke| stroke.number);
            for (position, stroke) in records.into_iter().enumerate() {
                if usize::from(stroke.number) != position + 1 {
                    return Err(corrupt(format!("hole {expected} has gaps in its strokes")));
                }
                if !players.contains_key(&stroke.player_id) {
                    return Err(corrupt(format!(
                        "hole {expected} references unknown player `{}`",
                        stroke.player_id
                    )));
                }
                strokes.push(Stroke {
                    sequence_number: stroke.number,
                    player_id: stroke.player_id,
                    contributor_user_id: stroke.contributor_user_id,
                });
            }

            finalized.push(HoleScore {
                hole_number: expected as u8,
                par: Some(par),
                strokes,
            });
        }

        let phase = if finalized.len() == usize::from(total_holes) {
            SessionPhase::FinishPending
        } else {
            SessionPhase::Active
        };

        Ok(Self {
            id: game.id,
            user_id: game.user_id,
            course_name: game.course_name,
            total_holes,
            created_at: game.created_at,
            synced: true,
            players,
            planned_pars: Vec::new(),
            holes: finalized,
            open_hole: None,
            phase,
        })
    }
}

/// Result of one finalized hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleResult {
    /// 1-based hole number.
    pub hole_number: u8,
    /// Par the hole was finalized with.
    pub par: u8,
    /// Team strokes on the hole.
    pub strokes: u32,
    /// `strokes - par`.
    pub relative_to_par: i32,
    /// Golf name of the result.
    pub label: ScoreLabel,
}

impl HoleResult {
    fn new(hole_number: u8, par: u8, strokes: u32) -> Self {
        Self {
            hole_number,
            par,
            strokes,
            relative_to_par: strokes as i32 - i32::from(par),
            label: ScoreLabel::classify(strokes, par),
        }
    }
}

/// Share of the team strokes played with one player's ball.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerContribution {
    /// Roster entry.
    pub player_id: PlayerId,
    /// Display name.
    pub name: String,
    /// Strokes played with this player's ball.
    pub strokes: u32,
    /// Share of the team total, in percent.
    pub contribution_pct: f64,
}

/// Derived scorecard of a finished round.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedGameSummary {
    /// Game the scorecard belongs to.
    pub game_id: Uuid,
    /// Course the round was played on.
    pub course_name: String,
    /// Holes planned for the round.
    pub total_holes: u8,
    /// Finalized holes in order.
    pub holes: Vec<HoleResult>,
    /// Team strokes over the round.
    pub total_score: u32,
    /// Sum of the pars of the finalized holes.
    pub total_par: u32,
    /// `total_score - total_par`.
    pub relative_to_par: i32,
    /// Per-player shares, in roster order.
    pub contributions: Vec<PlayerContribution>,
    /// Share of the strokes credited to the owning user.
    pub user_contribution_pct: Option<f64>,
    /// When the round was set up.
    pub created_at: OffsetDateTime,
    /// When the round was committed, if it was.
    pub completed_at: Option<OffsetDateTime>,
}

struct SummaryHeader {
    game_id: Uuid,
    course_name: String,
    total_holes: u8,
    created_at: OffsetDateTime,
    completed_at: Option<OffsetDateTime>,
}

impl CompletedGameSummary {
    fn from_parts(
        header: SummaryHeader,
        holes: Vec<HoleResult>,
        tallies: Vec<(PlayerId, String, u32)>,
        user_strokes: u32,
    ) -> Self {
        let total_score: u32 = holes.iter().map(|hole| hole.strokes).sum();
        let total_par: u32 = holes.iter().map(|hole| u32::from(hole.par)).sum();
        let contributions = tallies
            .into_iter()
            .map(|(player_id, name, strokes)| PlayerContribution {
                player_id,
                name,
                strokes,
                contribution_pct: percentage(strokes, total_score),
            })
            .collect();

        Self {
            game_id: header.game_id,
            course_name: header.course_name,
            total_holes: header.total_holes,
            holes,
            total_score,
            total_par,
            relative_to_par: total_score as i32 - total_par as i32,
            contributions,
            user_contribution_pct: Some(percentage(user_strokes, total_score)),
            created_at: header.created_at,
            completed_at: header.completed_at,
        }
    }

    /// Patch committing this summary to the `games` row.
    pub fn status_update(&self) -> GameStatusUpdate {
        GameStatusUpdate {
            status: GameStatus::Completed,
            total_score: self.total_score as i32,
            completed_at: self.completed_at.unwrap_or_else(OffsetDateTime::now_utc),
            user_contribution: self.user_contribution_pct,
        }
    }
}

impl From<GameRecord> for CompletedGameSummary {
    /// Rebuild a history entry; rows without hole scores fall back to the stored totals.
    fn from(record: GameRecord) -> Self {
        let GameRecord {
            game,
            players,
            mut holes,
        } = record;
        holes.sort_by_key(|hole| hole.hole_number);

        let header = SummaryHeader {
            game_id: game.id,
            course_name: game.course_name,
            total_holes: u8::try_from(game.hole_count).unwrap_or_default(),
            created_at: game.created_at,
            completed_at: game.completed_at,
        };

        if holes.is_empty() {
            let total_score = game.total_score.unwrap_or_default().max(0) as u32;
            let total_par = game.course_par.unwrap_or_default().max(0) as u32;
            return Self {
                game_id: header.game_id,
                course_name: header.course_name,
                total_holes: header.total_holes,
                holes: Vec::new(),
                total_score,
                total_par,
                relative_to_par: total_score as i32 - total_par as i32,
                contributions: players
                    .into_iter()
                    .map(|player| PlayerContribution {
                        player_id: player.id,
                        name: player.name,
                        strokes: 0,
                        contribution_pct: 0.0,
                    })
                    .collect(),
                user_contribution_pct: game.user_contribution,
                created_at: header.created_at,
                completed_at: header.completed_at,
            };
        }

        let results = holes
            .iter()
            .map(|hole| {
                HoleResult::new(
                    u8::try_from(hole.hole_number).unwrap_or_default(),
                    u8::try_from(hole.par).unwrap_or_default(),
                    hole.strokes_json.len() as u32,
                )
            })
            .collect();

        let strokes = || holes.iter().flat_map(|hole| hole.strokes_json.iter());
        let tallies = players
            .into_iter()
            .map(|player| {
                let count = strokes()
                    .filter(|stroke| stroke.player_id == player.id)
                    .count() as u32;
                (player.id, player.name, count)
            })
            .collect();
        let user_strokes = strokes()
            .filter(|stroke| stroke.contributor_user_id == Some(game.user_id))
            .count() as u32;

        let mut summary = Self::from_parts(header, results, tallies, user_strokes);
        if game.user_contribution.is_some() {
            summary.user_contribution_pct = game.user_contribution;
        }
        summary
    }
}

fn percentage(part: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(part) * 100.0 / f64::from(total)
}
