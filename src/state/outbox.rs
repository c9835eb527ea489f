use dashmap::DashMap;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{GamePlayerRow, GameRecord, GameRow, GameStatusUpdate, HoleScoreRow},
    storage::StorageResult,
};

/// Everything needed to write a completed game to the store again.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSync {
    /// `games` row as it was when the game was completed.
    pub header: GameRow,
    /// Roster rows.
    pub players: Vec<GamePlayerRow>,
    /// Whether the header and roster already reached the store.
    pub header_synced: bool,
    /// Every finalized hole.
    pub holes: Vec<HoleScoreRow>,
    /// Completion patch.
    pub status: GameStatusUpdate,
}

impl PendingSync {
    /// Game the entry belongs to.
    pub fn game_id(&self) -> Uuid {
        self.header.id
    }

    /// Write header, holes and status in order. Every step is idempotent, so a
    /// replay after a partial failure only repeats work the store already merged.
    pub async fn replay(&mut self, store: &dyn GameStore) -> StorageResult<()> {
        if !self.header_synced {
            store
                .create_game(self.header.clone(), self.players.clone())
                .await?;
            self.header_synced = true;
        }
        if !self.holes.is_empty() {
            store
                .upsert_hole_scores(self.header.id, self.holes.clone())
                .await?;
        }
        store
            .update_game_status(self.header.id, self.status.clone())
            .await
    }

    /// The game as it will look once stored, for local history listings.
    pub fn as_record(&self) -> GameRecord {
        let mut game = self.header.clone();
        game.status = self.status.status;
        game.total_score = Some(self.status.total_score);
        game.completed_at = Some(self.status.completed_at);
        game.user_contribution = self.status.user_contribution;
        GameRecord {
            game,
            players: self.players.clone(),
            holes: self.holes.clone(),
        }
    }
}

/// Outcome of one pass over the outbox.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Entries written and removed.
    pub drained: usize,
    /// Entries still waiting.
    pub remaining: usize,
}

/// Completed games whose final write has not reached the store yet, keyed by game id.
///
/// Lives in memory only: entries do not survive a restart.
#[derive(Debug, Default)]
pub struct SyncOutbox {
    entries: DashMap<Uuid, PendingSync>,
}

impl SyncOutbox {
    /// Create an empty outbox.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `pending`, replacing any older entry for the same game.
    pub fn enqueue(&self, pending: PendingSync) {
        debug!(game_id = %pending.game_id(), "queueing game for sync");
        self.entries.insert(pending.game_id(), pending);
    }

    /// Drop the entry for `game_id` when `user_id` owns it, returning it.
    pub fn remove_owned(&self, user_id: Uuid, game_id: Uuid) -> Option<PendingSync> {
        self.entries
            .remove_if(&game_id, |_, pending| pending.header.user_id == user_id)
            .map(|(_, pending)| pending)
    }

    /// Queued entry for `game_id` when `user_id` owns it.
    pub fn find_owned(&self, user_id: Uuid, game_id: Uuid) -> Option<PendingSync> {
        self.entries
            .get(&game_id)
            .filter(|entry| entry.header.user_id == user_id)
            .map(|entry| entry.value().clone())
    }

    /// Whether a write is pending for `game_id`.
    pub fn contains(&self, game_id: Uuid) -> bool {
        self.entries.contains_key(&game_id)
    }

    /// Queued games owned by `user_id`.
    pub fn pending_for(&self, user_id: Uuid) -> Vec<PendingSync> {
        self.entries
            .iter()
            .filter(|entry| entry.header.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Number of queued games.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replay every queued game once against `store`.
    ///
    /// Entries are cloned out before replaying so no map guard is held across
    /// an await. An entry deleted while its replay was running stays deleted.
    pub async fn flush(&self, store: &dyn GameStore) -> FlushReport {
        let ids: Vec<Uuid> = self.entries.iter().map(|entry| *entry.key()).collect();
        let mut report = FlushReport::default();

        for game_id in ids {
            let Some(mut pending) = self.entries.get(&game_id).map(|entry| entry.clone()) else {
                continue;
            };

            match pending.replay(store).await {
                Ok(()) => {
                    self.entries.remove(&game_id);
                    report.drained += 1;
                }
                Err(err) => {
                    warn!(%game_id, error = %err, "queued game sync failed");
                    if let Some(mut entry) = self.entries.get_mut(&game_id) {
                        entry.header_synced = pending.header_synced;
                    }
                    report.remaining += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::{
        game_store::memory::MemoryGameStore,
        models::{GameStatus, StrokeRecord},
    };
    use time::OffsetDateTime;

    fn pending(user_id: Uuid) -> PendingSync {
        let game_id = Uuid::new_v4();
        let player_id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        PendingSync {
            header: GameRow {
                id: game_id,
                user_id,
                course_name: "Les Bordes".into(),
                course_par: None,
                hole_count: 1,
                status: GameStatus::Completed,
                total_score: None,
                completed_at: None,
                created_at: now,
                user_contribution: None,
            },
            players: vec![GamePlayerRow {
                id: player_id,
                game_id,
                user_id: Some(user_id),
                name: "Ana".into(),
                kind: Default::default(),
            }],
            header_synced: false,
            holes: vec![HoleScoreRow {
                id: None,
                game_id,
                hole_number: 1,
                par: 3,
                total_strokes: 1,
                strokes_json: vec![StrokeRecord {
                    number: 1,
                    player_id,
                    player_name: "Ana".into(),
                    contributor_user_id: Some(user_id),
                }],
            }],
            status: GameStatusUpdate {
                status: GameStatus::Completed,
                total_score: 1,
                completed_at: now,
                user_contribution: Some(100.0),
            },
        }
    }

    #[tokio::test]
    async fn flush_writes_whole_game_and_drains() {
        let store = MemoryGameStore::new();
        let outbox = SyncOutbox::new();
        let entry = pending(Uuid::new_v4());
        let game_id = entry.game_id();
        outbox.enqueue(entry);

        let report = outbox.flush(&store).await;

        assert_eq!(report, FlushReport { drained: 1, remaining: 0 });
        assert!(outbox.is_empty());
        let stored = store.get(game_id).unwrap();
        assert_eq!(stored.holes.len(), 1);
        assert_eq!(stored.game.total_score, Some(1));
        assert!(stored.game.completed_at.is_some());
    }

    #[tokio::test]
    async fn replaying_twice_is_harmless() {
        let store = MemoryGameStore::new();
        let mut entry = pending(Uuid::new_v4());

        entry.replay(&store).await.unwrap();
        entry.replay(&store).await.unwrap();

        let stored = store.get(entry.game_id()).unwrap();
        assert_eq!(stored.holes.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn pending_for_filters_by_owner() {
        let outbox = SyncOutbox::new();
        let owner = Uuid::new_v4();
        outbox.enqueue(pending(owner));
        outbox.enqueue(pending(Uuid::new_v4()));

        let mine = outbox.pending_for(owner);
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].as_record().game.total_score, Some(1));
        let game_id = mine[0].game_id();
        assert!(outbox.find_owned(Uuid::new_v4(), game_id).is_none());
        assert!(outbox.remove_owned(Uuid::new_v4(), game_id).is_none());
        assert!(outbox.find_owned(owner, game_id).is_some());
        assert!(outbox.remove_owned(owner, game_id).is_some());
        assert_eq!(outbox.len(), 1);
    }
}
