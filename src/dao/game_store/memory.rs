use std::sync::Arc;

use dashmap::DashMap;
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::{
    game_store::GameStore,
    models::{DraftGameRow, GamePlayerRow, GameRecord, GameRow, GameStatusUpdate, HoleScoreRow},
    storage::{StorageError, StorageResult},
};

/// Process-local store used when no backend is configured, and by tests.
#[derive(Clone, Default)]
pub struct MemoryGameStore {
    games: Arc<DashMap<Uuid, GameRecord>>,
    drafts: Arc<DashMap<Uuid, DraftGameRow>>,
}

impl MemoryGameStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch a stored record by game id.
    pub fn get(&self, game_id: Uuid) -> Option<GameRecord> {
        self.games.get(&game_id).map(|entry| entry.clone())
    }

    /// Number of stored games.
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the store holds no games.
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    fn with_game<T>(
        &self,
        game_id: Uuid,
        apply: impl FnOnce(&mut GameRecord) -> T,
    ) -> StorageResult<T> {
        let mut entry = self
            .games
            .get_mut(&game_id)
            .ok_or_else(|| StorageError::rejected(format!("game `{game_id}` not found")))?;
        Ok(apply(entry.value_mut()))
    }
}

impl GameStore for MemoryGameStore {
    fn create_game(
        &self,
        header: GameRow,
        players: Vec<GamePlayerRow>,
    ) -> BoxFuture<'static, StorageResult<Uuid>> {
        let store = self.clone();
        Box::pin(async move {
            let id = header.id;
            // Same game id again is a replay: refresh header and roster, keep holes.
            let holes = store
                .games
                .get(&id)
                .map(|existing| existing.holes.clone())
                .unwrap_or_default();
            store.games.insert(
                id,
                GameRecord {
                    game: header,
                    players,
                    holes,
                },
            );
            Ok(id)
        })
    }

    fn upsert_hole_scores(
        &self,
        game_id: Uuid,
        rows: Vec<HoleScoreRow>,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_game(game_id, |record| {
                for mut row in rows {
                    match record
                        .holes
                        .iter_mut()
                        .find(|existing| existing.hole_number == row.hole_number)
                    {
                        Some(existing) => {
                            row.id = existing.id;
                            *existing = row;
                        }
                        None => {
                            row.id = Some(Uuid::new_v4());
                            record.holes.push(row);
                        }
                    }
                }
                record.holes.sort_by_key(|hole| hole.hole_number);
            })
        })
    }

    fn update_game_status(
        &self,
        game_id: Uuid,
        update: GameStatusUpdate,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.with_game(game_id, |record| {
                record.game.status = update.status;
                record.game.total_score = Some(update.total_score);
                record.game.completed_at = Some(update.completed_at);
                record.game.user_contribution = update.user_contribution;
            })
        })
    }

    fn list_completed_games(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            let mut records: Vec<GameRecord> = store
                .games
                .iter()
                .filter(|entry| {
                    entry.game.user_id == user_id && entry.game.completed_at.is_some()
                })
                .map(|entry| entry.clone())
                .collect();
            records.sort_by(|a, b| b.game.created_at.cmp(&a.game.created_at));
            Ok(records)
        })
    }

    fn find_open_game(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .games
                .iter()
                .filter(|entry| entry.game.user_id == user_id && entry.game.completed_at.is_none())
                .max_by_key(|entry| entry.game.created_at)
                .map(|entry| entry.clone()))
        })
    }

    fn get_game(
        &self,
        user_id: Uuid,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecord>>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .get(game_id)
                .filter(|record| record.game.user_id == user_id))
        })
    }

    fn delete_game(&self, user_id: Uuid, game_id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let store = self.clone();
        Box::pin(async move {
            Ok(store
                .games
                .remove_if(&game_id, |_, record| record.game.user_id == user_id)
                .is_some())
        })
    }

    fn fetch_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<DraftGameRow>>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.drafts.get(&user_id).map(|entry| entry.clone())) })
    }

    fn save_draft(&self, draft: DraftGameRow) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.drafts.insert(draft.user_id, draft);
            Ok(())
        })
    }

    fn clear_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move {
            store.drafts.remove(&user_id);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::GameStatus;
    use time::{Duration, OffsetDateTime};

    fn header(user_id: Uuid, created_at: OffsetDateTime) -> GameRow {
        GameRow {
            id: Uuid::new_v4(),
            user_id,
            course_name: "Muni".into(),
            course_par: None,
            hole_count: 9,
            status: GameStatus::Active,
            total_score: None,
            completed_at: None,
            created_at,
            user_contribution: None,
        }
    }

    fn hole(game_id: Uuid, hole_number: i32, total_strokes: i32) -> HoleScoreRow {
        HoleScoreRow {
            id: None,
            game_id,
            hole_number,
            par: 4,
            total_strokes,
            strokes_json: Vec::new(),
        }
    }

    #[tokio::test]
    async fn upsert_replaces_existing_hole_and_keeps_its_id() {
        let store = MemoryGameStore::new();
        let game = header(Uuid::new_v4(), OffsetDateTime::now_utc());
        let id = store.create_game(game, Vec::new()).await.unwrap();

        store
            .upsert_hole_scores(id, vec![hole(id, 2, 5), hole(id, 1, 3)])
            .await
            .unwrap();
        let first_id = store.get(id).unwrap().holes[0].id;

        store.upsert_hole_scores(id, vec![hole(id, 1, 4)]).await.unwrap();
        let record = store.get(id).unwrap();
        assert_eq!(record.holes.len(), 2);
        assert_eq!(record.holes[0].hole_number, 1);
        assert_eq!(record.holes[0].total_strokes, 4);
        assert_eq!(record.holes[0].id, first_id);
    }

    #[tokio::test]
    async fn upsert_on_unknown_game_fails() {
        let store = MemoryGameStore::new();
        let game_id = Uuid::new_v4();
        let result = store.upsert_hole_scores(game_id, vec![hole(game_id, 1, 3)]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn open_and_completed_games_are_split() {
        let store = MemoryGameStore::new();
        let user = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let done = store
            .create_game(header(user, now - Duration::days(1)), Vec::new())
            .await
            .unwrap();
        store
            .update_game_status(
                done,
                GameStatusUpdate {
                    status: GameStatus::Completed,
                    total_score: 40,
                    completed_at: now,
                    user_contribution: Some(50.0),
                },
            )
            .await
            .unwrap();
        let open = store.create_game(header(user, now), Vec::new()).await.unwrap();
        store
            .create_game(header(Uuid::new_v4(), now), Vec::new())
            .await
            .unwrap();

        let completed = store.list_completed_games(user).await.unwrap();
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].game.id, done);
        assert_eq!(completed[0].game.total_score, Some(40));

        let found = store.find_open_game(user).await.unwrap().unwrap();
        assert_eq!(found.game.id, open);
    }

    #[tokio::test]
    async fn games_are_only_visible_to_their_owner() {
        let store = MemoryGameStore::new();
        let owner = Uuid::new_v4();
        let other = Uuid::new_v4();
        let id = store
            .create_game(header(owner, OffsetDateTime::now_utc()), Vec::new())
            .await
            .unwrap();

        assert!(store.get_game(other, id).await.unwrap().is_none());
        assert!(!store.delete_game(other, id).await.unwrap());
        assert!(store.get(id).is_some());

        assert_eq!(store.get_game(owner, id).await.unwrap().unwrap().game.id, id);
        assert!(store.delete_game(owner, id).await.unwrap());
        assert!(!store.delete_game(owner, id).await.unwrap());
    }

    #[tokio::test]
    async fn one_draft_per_user() {
        let store = MemoryGameStore::new();
        let user = Uuid::new_v4();
        let draft = |course: &str| DraftGameRow {
            user_id: user,
            game_data: serde_json::json!({ "courseName": course }),
            last_updated: OffsetDateTime::now_utc(),
        };

        store.save_draft(draft("Old Course")).await.unwrap();
        store.save_draft(draft("New Course")).await.unwrap();
        let saved = store.fetch_draft(user).await.unwrap().unwrap();
        assert_eq!(saved.game_data["courseName"], "New Course");
        assert!(store.fetch_draft(Uuid::new_v4()).await.unwrap().is_none());

        store.clear_draft(user).await.unwrap();
        assert!(store.fetch_draft(user).await.unwrap().is_none());
    }
}
