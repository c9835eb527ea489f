//! Per-user game controller: owns the active session, drives the ledger and
//! pushes every change to the store without letting remote failures undo
//! local progress.

use std::{collections::HashSet, sync::Arc};

use time::OffsetDateTime;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    dao::{game_store::GameStore, storage::StorageError},
    error::ServiceError,
    state::{
        game::{CompletedGameSummary, GameSession, PlayerId, SessionSetup, Stroke},
        outbox::{PendingSync, SyncOutbox},
    },
};

/// How far a change made it towards the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The store accepted the write.
    Synced,
    /// The write failed; the change only exists in this process for now.
    LocalOnly {
        /// Why the write failed.
        reason: String,
    },
    /// The write failed and was queued for a background retry.
    Queued {
        /// Why the first attempt failed.
        reason: String,
    },
}

impl SyncStatus {
    fn local_only(err: &StorageError) -> Self {
        SyncStatus::LocalOnly {
            reason: err.to_string(),
        }
    }
}

/// A result that was applied locally, together with its persistence outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncOutcome<T> {
    /// The locally applied result.
    pub value: T,
    /// What happened to the remote write.
    pub sync: SyncStatus,
}

impl<T> SyncOutcome<T> {
    fn new(value: T, sync: SyncStatus) -> Self {
        Self { value, sync }
    }
}

/// Result of finalizing a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleAdvance {
    /// Whether every hole is now finalized.
    pub finished: bool,
    /// Hole now being played (`total_holes + 1` once finished).
    pub current_hole: u8,
}

/// Drives one user's scramble session.
pub struct GameController {
    user_id: Uuid,
    store: Arc<dyn GameStore>,
    outbox: Arc<SyncOutbox>,
    config: AppConfig,
    session: Option<GameSession>,
}

impl GameController {
    /// Build a controller for `user_id` with its collaborators.
    pub fn new(
        user_id: Uuid,
        store: Arc<dyn GameStore>,
        outbox: Arc<SyncOutbox>,
        config: AppConfig,
    ) -> Self {
        Self {
            user_id,
            store,
            outbox,
            config,
            session: None,
        }
    }

    /// User this controller belongs to.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// The session in progress, if any.
    pub fn active(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    fn session_mut(&mut self) -> Result<&mut GameSession, ServiceError> {
        self.session
            .as_mut()
            .ok_or_else(|| ServiceError::InvalidState("no game in progress".into()))
    }

    fn ensure_idle(&self) -> Result<(), ServiceError> {
        match &self.session {
            Some(session) => Err(ServiceError::InvalidState(format!(
                "game `{}` is still in progress",
                session.id
            ))),
            None => Ok(()),
        }
    }

    /// Open a new session and try to store its header and roster.
    pub async fn create_session(
        &mut self,
        setup: SessionSetup,
    ) -> Result<SyncOutcome<GameSession>, ServiceError> {
        self.ensure_idle()?;
        let mut session = GameSession::new(self.user_id, setup, self.config.max_holes)?;

        let sync = match self
            .store
            .create_game(session.header_row(), session.player_rows())
            .await
        {
            Ok(_) => {
                session.synced = true;
                SyncStatus::Synced
            }
            Err(err) => {
                warn!(game_id = %session.id, error = %err, "game created locally only");
                SyncStatus::local_only(&err)
            }
        };

        info!(
            game_id = %session.id,
            user_id = %self.user_id,
            holes = session.total_holes,
            "game session created"
        );
        self.session = Some(session.clone());
        Ok(SyncOutcome::new(session, sync))
    }

    /// Record a stroke played with `player_id`'s ball on the current hole.
    pub fn record_stroke(&mut self, player_id: PlayerId) -> Result<Stroke, ServiceError> {
        let session = self.session_mut()?;
        let stroke = session.record_stroke(player_id)?;
        debug!(
            game_id = %session.id,
            hole = session.current_hole(),
            sequence = stroke.sequence_number,
            "stroke recorded"
        );
        Ok(stroke)
    }

    /// Remove the latest stroke of the current hole; `None` when there was nothing to undo.
    pub fn undo_last_stroke(&mut self) -> Result<Option<Stroke>, ServiceError> {
        let session = self.session_mut()?;
        Ok(session.undo_last_stroke())
    }

    /// Assign par to the current hole.
    pub fn set_hole_par(&mut self, par: u8) -> Result<(), ServiceError> {
        self.session_mut()?.set_par(par)?;
        Ok(())
    }

    /// Finalize the current hole, then store it on a best-effort basis.
    pub async fn advance_hole(
        &mut self,
        par: Option<u8>,
    ) -> Result<SyncOutcome<HoleAdvance>, ServiceError> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| ServiceError::InvalidState("no game in progress".into()))?;
        let finished = session.finalize_hole(par)?;
        let advance = HoleAdvance {
            finished,
            current_hole: session.current_hole(),
        };

        let sync = match push_last_hole(self.store.as_ref(), session).await {
            Ok(()) => SyncStatus::Synced,
            Err(err) => {
                warn!(game_id = %session.id, error = %err, "hole kept locally only");
                SyncStatus::local_only(&err)
            }
        };

        debug!(game_id = %session.id, current_hole = advance.current_hole, finished, "hole finalized");
        Ok(SyncOutcome::new(advance, sync))
    }

    /// Commit the finished round and clear it locally.
    ///
    /// A failed write does not bring the session back: the game is queued in
    /// the outbox and the summary is returned anyway.
    pub async fn complete_session(
        &mut self,
    ) -> Result<SyncOutcome<CompletedGameSummary>, ServiceError> {
        let mut session = self
            .session
            .take()
            .ok_or_else(|| ServiceError::InvalidState("no game in progress".into()))?;
        if let Err(err) = session.complete() {
            self.session = Some(session);
            return Err(err.into());
        }

        let summary = session.summary(Some(OffsetDateTime::now_utc()));
        let mut pending = PendingSync {
            header: session.header_row(),
            players: session.player_rows(),
            header_synced: session.synced,
            holes: session.hole_rows(),
            status: summary.status_update(),
        };

        let sync = match pending.replay(self.store.as_ref()).await {
            Ok(()) => SyncStatus::Synced,
            Err(err) => {
                warn!(game_id = %session.id, error = %err, "completed game queued for sync");
                let reason = err.to_string();
                self.outbox.enqueue(pending);
                SyncStatus::Queued { reason }
            }
        };

        info!(
            game_id = %session.id,
            total_score = summary.total_score,
            relative_to_par = summary.relative_to_par,
            "game completed"
        );
        Ok(SyncOutcome::new(summary, sync))
    }

    /// Rebuild the latest unfinished game of this user from the store.
    pub async fn resume_session(&mut self) -> Result<Option<GameSession>, ServiceError> {
        self.ensure_idle()?;
        let Some(record) = self.store.find_open_game(self.user_id).await? else {
            return Ok(None);
        };
        let session = GameSession::try_from(record)?;
        info!(
            game_id = %session.id,
            current_hole = session.current_hole(),
            "game session resumed"
        );
        self.session = Some(session.clone());
        Ok(Some(session))
    }

    /// Delete one of this user's games wherever it lives: the store, the
    /// outbox and the active session.
    pub async fn delete_session(&mut self, game_id: Uuid) -> Result<(), ServiceError> {
        let stored = self.store.delete_game(self.user_id, game_id).await?;
        let queued = self.outbox.remove_owned(self.user_id, game_id).is_some();
        let active = self
            .session
            .as_ref()
            .is_some_and(|session| session.id == game_id);
        if active {
            self.session = None;
        }

        if !(stored || queued || active) {
            return Err(ServiceError::NotFound(format!("game `{game_id}` not found")));
        }
        info!(%game_id, stored, queued, active, "game deleted");
        Ok(())
    }

    /// Scorecard of one of this user's games, whether active, queued or stored.
    pub async fn fetch_game(
        &self,
        game_id: Uuid,
    ) -> Result<Option<CompletedGameSummary>, ServiceError> {
        if let Some(session) = self.session.as_ref().filter(|session| session.id == game_id) {
            return Ok(Some(session.summary(None)));
        }
        if let Some(pending) = self.outbox.find_owned(self.user_id, game_id) {
            return Ok(Some(pending.as_record().into()));
        }
        let record = self.store.get_game(self.user_id, game_id).await?;
        Ok(record.map(CompletedGameSummary::from))
    }

    /// Completed games of this user, most recent first, including games
    /// still waiting in the outbox.
    pub async fn fetch_history(&self) -> Result<Vec<CompletedGameSummary>, ServiceError> {
        let mut records = self.store.list_completed_games(self.user_id).await?;
        let stored: HashSet<Uuid> = records.iter().map(|record| record.game.id).collect();
        records.extend(
            self.outbox
                .pending_for(self.user_id)
                .into_iter()
                .filter(|pending| !stored.contains(&pending.game_id()))
                .map(|pending| pending.as_record()),
        );

        records.sort_by(|a, b| b.game.created_at.cmp(&a.game.created_at));
        records.truncate(self.config.history_limit);
        Ok(records.into_iter().map(CompletedGameSummary::from).collect())
    }
}

/// Store the most recently finalized hole, creating the header first when it never synced.
async fn push_last_hole(
    store: &dyn GameStore,
    session: &mut GameSession,
) -> Result<(), StorageError> {
    if !session.synced {
        store
            .create_game(session.header_row(), session.player_rows())
            .await?;
        session.synced = true;
    }
    let Some(hole) = session.holes().last() else {
        return Ok(());
    };
    let row = session.hole_row(hole);
    store.upsert_hole_scores(session.id, vec![row]).await
}
