pub mod memory;
pub mod rest;

use crate::dao::models::{
    DraftGameRow, GamePlayerRow, GameRecord, GameRow, GameStatusUpdate, HoleScoreRow,
};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;
use uuid::Uuid;

/// Abstraction over the persistence layer for games, rosters and hole scores.
///
/// Writes are expected to be idempotent so a completed game can be replayed
/// from the sync outbox after a partial failure.
pub trait GameStore: Send + Sync {
    /// Insert or refresh a game header and its roster.
    fn create_game(
        &self,
        header: GameRow,
        players: Vec<GamePlayerRow>,
    ) -> BoxFuture<'static, StorageResult<Uuid>>;
    /// Insert or replace hole scores, keyed by `(game_id, hole_number)`.
    fn upsert_hole_scores(
        &self,
        game_id: Uuid,
        rows: Vec<HoleScoreRow>,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Apply the completion patch to a game header.
    fn update_game_status(
        &self,
        game_id: Uuid,
        update: GameStatusUpdate,
    ) -> BoxFuture<'static, StorageResult<()>>;
    /// Completed games of `user_id`, newest first.
    fn list_completed_games(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<GameRecord>>>;
    /// Latest game of `user_id` that was never completed.
    fn find_open_game(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<GameRecord>>>;
    /// One game of `user_id` with its roster and holes.
    fn get_game(
        &self,
        user_id: Uuid,
        game_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameRecord>>>;
    /// Delete a game of `user_id`; `false` when no such game was stored.
    fn delete_game(&self, user_id: Uuid, game_id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Saved setup form of `user_id`, if any.
    fn fetch_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<Option<DraftGameRow>>>;
    /// Store the setup form, replacing the previous one of the same user.
    fn save_draft(&self, draft: DraftGameRow) -> BoxFuture<'static, StorageResult<()>>;
    /// Forget the setup form of `user_id`.
    fn clear_draft(&self, user_id: Uuid) -> BoxFuture<'static, StorageResult<()>>;
    /// Cheap round-trip proving the backend answers.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
