//! Business logic behind the game routes. Every call locks the caller's
//! controller so two commands of the same user never interleave, then lets
//! go of it once it is idle again.

use time::OffsetDateTime;
use tracing::warn;
use uuid::Uuid;

use crate::{
    dao::models::DraftGameRow,
    dto::{
        draft::{DraftGameView, SaveDraftRequest},
        game::{
            AdvanceHoleRequest, AdvanceHoleResponse, CompleteGameResponse, CreateGameRequest,
            CreateGameResponse, GameSessionView, GameSummaryView, RecordStrokeRequest,
            SetParRequest, StrokeResponse, UndoResponse,
        },
    },
    error::ServiceError,
    services::course_service,
    state::{SharedState, controller::GameController},
};

fn active_view(controller: &GameController) -> Result<GameSessionView, ServiceError> {
    controller
        .active()
        .map(GameSessionView::from)
        .ok_or_else(|| ServiceError::NotFound("no game in progress".into()))
}

/// Run `$body` with the caller's controller locked as `$controller`, then
/// release the controller if the command left it idle.
macro_rules! with_controller {
    ($state:expr, $user_id:expr, |$controller:ident| $body:expr) => {{
        let result: Result<_, ServiceError> = async {
            let shared = $state.controller($user_id);
            #[allow(unused_mut)]
            let mut $controller = shared.lock().await;
            $body
        }
        .await;
        $state.release_controller($user_id);
        result
    }};
}

/// Start a new round, taking hole pars from the course catalog when asked to.
/// A saved draft is cleared once the round exists.
pub async fn create_game(
    state: &SharedState,
    user_id: Uuid,
    mut request: CreateGameRequest,
) -> Result<CreateGameResponse, ServiceError> {
    if let (Some(course_id), true) = (request.course_id, request.hole_pars.is_empty()) {
        let planned = course_service::planned_pars(state, course_id, request.total_holes).await;
        if let Some(pars) = planned {
            if let Ok(total_holes) = u8::try_from(pars.len()) {
                request.total_holes = Some(total_holes);
                request.hole_pars = pars;
            }
        }
    }

    let setup = request.into_setup(state.config().default_hole_count);
    let outcome = with_controller!(state, user_id, |controller| {
        controller.create_session(setup).await
    })?;

    if let Err(err) = state.game_store().clear_draft(user_id).await {
        warn!(%user_id, error = %err, "draft not cleared after game creation");
    }

    Ok(CreateGameResponse {
        game: GameSessionView::from(&outcome.value),
        sync: outcome.sync.into(),
    })
}

/// Snapshot of the caller's round in progress.
pub async fn active_game(state: &SharedState, user_id: Uuid) -> Result<GameSessionView, ServiceError> {
    with_controller!(state, user_id, |controller| active_view(&controller))
}

/// Reload the caller's latest unfinished round from the store.
pub async fn resume_game(state: &SharedState, user_id: Uuid) -> Result<GameSessionView, ServiceError> {
    with_controller!(state, user_id, |controller| {
        controller
            .resume_session()
            .await?
            .map(|session| GameSessionView::from(&session))
            .ok_or_else(|| ServiceError::NotFound("no unfinished game to resume".into()))
    })
}

/// Record a stroke on the current hole.
pub async fn record_stroke(
    state: &SharedState,
    user_id: Uuid,
    request: RecordStrokeRequest,
) -> Result<StrokeResponse, ServiceError> {
    with_controller!(state, user_id, |controller| {
        let stroke = controller.record_stroke(request.player_id)?;
        Ok(StrokeResponse {
            stroke: stroke.into(),
            game: active_view(&controller)?,
        })
    })
}

/// Remove the latest stroke of the current hole.
pub async fn undo_last_stroke(
    state: &SharedState,
    user_id: Uuid,
) -> Result<UndoResponse, ServiceError> {
    with_controller!(state, user_id, |controller| {
        let removed = controller.undo_last_stroke()?;
        Ok(UndoResponse {
            removed: removed.map(Into::into),
            game: active_view(&controller)?,
        })
    })
}

/// Assign par to the current hole.
pub async fn set_hole_par(
    state: &SharedState,
    user_id: Uuid,
    request: SetParRequest,
) -> Result<GameSessionView, ServiceError> {
    with_controller!(state, user_id, |controller| {
        controller.set_hole_par(request.par)?;
        active_view(&controller)
    })
}

/// Finalize the current hole.
pub async fn advance_hole(
    state: &SharedState,
    user_id: Uuid,
    request: AdvanceHoleRequest,
) -> Result<AdvanceHoleResponse, ServiceError> {
    with_controller!(state, user_id, |controller| {
        let outcome = controller.advance_hole(request.par).await?;
        Ok(AdvanceHoleResponse::new(
            outcome.value,
            outcome.sync,
            active_view(&controller)?,
        ))
    })
}

/// Commit the finished round.
pub async fn complete_game(
    state: &SharedState,
    user_id: Uuid,
) -> Result<CompleteGameResponse, ServiceError> {
    with_controller!(state, user_id, |controller| {
        let outcome = controller.complete_session().await?;
        Ok(CompleteGameResponse {
            summary: outcome.value.into(),
            sync: outcome.sync.into(),
        })
    })
}

/// Most recent completed rounds of the caller.
pub async fn history(state: &SharedState, user_id: Uuid) -> Result<Vec<GameSummaryView>, ServiceError> {
    with_controller!(state, user_id, |controller| {
        Ok(controller
            .fetch_history()
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    })
}

/// Scorecard of one of the caller's games.
pub async fn game_details(
    state: &SharedState,
    user_id: Uuid,
    game_id: Uuid,
) -> Result<GameSummaryView, ServiceError> {
    with_controller!(state, user_id, |controller| {
        controller
            .fetch_game(game_id)
            .await?
            .map(GameSummaryView::from)
            .ok_or_else(|| ServiceError::NotFound(format!("game `{game_id}` not found")))
    })
}

/// Delete one of the caller's games.
pub async fn delete_game(state: &SharedState, user_id: Uuid, game_id: Uuid) -> Result<(), ServiceError> {
    with_controller!(state, user_id, |controller| {
        controller.delete_session(game_id).await
    })
}

/// Saved setup form of the caller.
pub async fn draft(state: &SharedState, user_id: Uuid) -> Result<DraftGameView, ServiceError> {
    state
        .game_store()
        .fetch_draft(user_id)
        .await?
        .map(DraftGameView::from)
        .ok_or_else(|| ServiceError::NotFound("no draft saved".into()))
}

/// Keep the caller's setup form, replacing any earlier one.
pub async fn save_draft(
    state: &SharedState,
    user_id: Uuid,
    request: SaveDraftRequest,
) -> Result<DraftGameView, ServiceError> {
    let row = DraftGameRow {
        user_id,
        game_data: request.game_data,
        last_updated: OffsetDateTime::now_utc(),
    };
    state.game_store().save_draft(row.clone()).await?;
    Ok(row.into())
}

/// Forget the caller's setup form.
pub async fn clear_draft(state: &SharedState, user_id: Uuid) -> Result<(), ServiceError> {
    state.game_store().clear_draft(user_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::{
        config::AppConfig,
        dao::game_store::memory::MemoryGameStore,
        dto::game::SyncReport,
        state::AppState,
    };

    fn state() -> SharedState {
        AppState::new(AppConfig::default(), Arc::new(MemoryGameStore::new()), None)
    }

    fn create_request(holes: u8) -> CreateGameRequest {
        serde_json::from_value(json!({
            "course_name": "Augusta",
            "total_holes": holes,
            "players": [
                { "name": "Ana", "kind": "host" },
                { "name": "Bo" },
                { "name": "Cy" }
            ]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn full_round_through_the_service() {
        let state = state();
        let user = Uuid::new_v4();

        let created = create_game(&state, user, create_request(1)).await.unwrap();
        assert!(matches!(created.sync, SyncReport::Synced));
        let cy = created.game.players[2].id;

        let stroke = record_stroke(&state, user, RecordStrokeRequest { player_id: cy })
            .await
            .unwrap();
        assert_eq!(stroke.stroke.sequence_number, 1);
        assert_eq!(stroke.game.open_hole.as_ref().unwrap().total_strokes, 1);

        let advanced = advance_hole(&state, user, AdvanceHoleRequest { par: Some(3) })
            .await
            .unwrap();
        assert!(advanced.finished);
        assert_eq!(advanced.game.phase, "finish_pending");

        let completed = complete_game(&state, user).await.unwrap();
        assert_eq!(completed.summary.total_score, 1);
        assert_eq!(completed.summary.contributions[2].contribution_pct, 100.0);
        assert_eq!(completed.summary.user_contribution_pct, Some(0.0));

        assert!(matches!(
            active_game(&state, user).await,
            Err(ServiceError::NotFound(_))
        ));
        let history = history(&state, user).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].game_id, completed.summary.game_id);
    }

    #[tokio::test]
    async fn users_do_not_share_sessions() {
        let state = state();
        let ana = Uuid::new_v4();
        let bo = Uuid::new_v4();

        create_game(&state, ana, create_request(9)).await.unwrap();

        assert!(active_game(&state, ana).await.is_ok());
        assert!(active_game(&state, bo).await.is_err());
        assert!(create_game(&state, bo, create_request(9)).await.is_ok());
    }

    #[tokio::test]
    async fn undo_reports_what_was_removed() {
        let state = state();
        let user = Uuid::new_v4();
        let created = create_game(&state, user, create_request(2)).await.unwrap();
        let ana = created.game.players[0].id;

        let empty = undo_last_stroke(&state, user).await.unwrap();
        assert!(empty.removed.is_none());

        record_stroke(&state, user, RecordStrokeRequest { player_id: ana })
            .await
            .unwrap();
        let undone = undo_last_stroke(&state, user).await.unwrap();
        assert_eq!(undone.removed.unwrap().player_id, ana);
        assert!(undone.game.open_hole.is_none());
    }

    #[tokio::test]
    async fn resume_without_stored_game_is_not_found() {
        let state = state();
        assert!(matches!(
            resume_game(&state, Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn other_users_cannot_delete_a_finished_game() {
        let state = state();
        let ana = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let created = create_game(&state, ana, create_request(1)).await.unwrap();
        let bo = created.game.players[1].id;
        record_stroke(&state, ana, RecordStrokeRequest { player_id: bo })
            .await
            .unwrap();
        advance_hole(&state, ana, AdvanceHoleRequest { par: Some(3) })
            .await
            .unwrap();
        let game_id = complete_game(&state, ana).await.unwrap().summary.game_id;

        assert!(matches!(
            delete_game(&state, mallory, game_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            game_details(&state, mallory, game_id).await,
            Err(ServiceError::NotFound(_))
        ));
        assert_eq!(history(&state, ana).await.unwrap().len(), 1);

        let details = game_details(&state, ana, game_id).await.unwrap();
        assert_eq!(details.total_score, 1);
        assert_eq!(details.contributions[1].strokes, 1);
    }

    #[tokio::test]
    async fn idle_users_do_not_keep_a_controller() {
        let state = state();
        let user = Uuid::new_v4();

        assert!(active_game(&state, user).await.is_err());
        assert!(history(&state, Uuid::new_v4()).await.unwrap().is_empty());
        assert_eq!(state.controller_count(), 0);

        let created = create_game(&state, user, create_request(1)).await.unwrap();
        assert_eq!(state.controller_count(), 1);

        let ana = created.game.players[0].id;
        record_stroke(&state, user, RecordStrokeRequest { player_id: ana })
            .await
            .unwrap();
        advance_hole(&state, user, AdvanceHoleRequest { par: Some(4) })
            .await
            .unwrap();
        complete_game(&state, user).await.unwrap();
        assert_eq!(state.controller_count(), 0);
    }

    #[tokio::test]
    async fn draft_is_saved_then_cleared_by_a_new_game() {
        let state = state();
        let user = Uuid::new_v4();
        assert!(matches!(
            draft(&state, user).await,
            Err(ServiceError::NotFound(_))
        ));

        save_draft(
            &state,
            user,
            SaveDraftRequest {
                game_data: json!({ "courseName": "Augusta", "players": ["Ana"] }),
            },
        )
        .await
        .unwrap();
        assert_eq!(draft(&state, user).await.unwrap().game_data["courseName"], "Augusta");

        create_game(&state, user, create_request(9)).await.unwrap();
        assert!(draft(&state, user).await.is_err());

        save_draft(&state, user, SaveDraftRequest { game_data: json!({}) })
            .await
            .unwrap();
        clear_draft(&state, user).await.unwrap();
        assert!(draft(&state, user).await.is_err());
    }

    #[tokio::test]
    async fn par_can_be_set_before_any_stroke() {
        let state = state();
        let user = Uuid::new_v4();
        create_game(&state, user, create_request(2)).await.unwrap();

        let game = set_hole_par(&state, user, SetParRequest { par: 5 }).await.unwrap();
        assert_eq!(game.current_par, Some(5));
        assert_eq!(game.open_hole.unwrap().par, Some(5));
    }
}
