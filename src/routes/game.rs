use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::{
        draft::{DraftGameView, SaveDraftRequest},
        game::{
            AdvanceHoleRequest, AdvanceHoleResponse, CompleteGameResponse, CreateGameRequest,
            CreateGameResponse, GameSessionView, GameSummaryView, RecordStrokeRequest,
            SetParRequest, StrokeResponse, UndoResponse,
        },
    },
    error::AppError,
    routes::identity::UserId,
    services::game_service,
    state::SharedState,
};

/// Routes driving the caller's scramble round and history.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/active", get(active_game))
        .route("/games/active/resume", post(resume_game))
        .route("/games/active/strokes", post(record_stroke))
        .route("/games/active/strokes/last", delete(undo_last_stroke))
        .route("/games/active/par", put(set_hole_par))
        .route("/games/active/advance", post(advance_hole))
        .route("/games/active/complete", post(complete_game))
        .route("/games/history", get(game_history))
        .route(
            "/games/draft",
            get(get_draft).put(save_draft).delete(clear_draft),
        )
        .route("/games/{id}", get(game_details).delete(delete_game))
}

/// Start a new round for the caller.
#[utoipa::path(
    post,
    path = "/games",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    request_body = CreateGameRequest,
    responses(
        (status = 200, description = "Game created; `sync` tells whether it reached the store", body = CreateGameResponse),
        (status = 400, description = "Invalid setup"),
        (status = 409, description = "Another game is still in progress")
    )
)]
pub async fn create_game(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<CreateGameResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        game_service::create_game(&state, user_id, payload).await?,
    ))
}

/// Current state of the caller's round.
#[utoipa::path(
    get,
    path = "/games/active",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Round in progress", body = GameSessionView),
        (status = 404, description = "No round in progress")
    )
)]
pub async fn active_game(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<GameSessionView>, AppError> {
    Ok(Json(game_service::active_game(&state, user_id).await?))
}

/// Reload the caller's latest unfinished round from the store.
#[utoipa::path(
    post,
    path = "/games/active/resume",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Round resumed", body = GameSessionView),
        (status = 404, description = "No unfinished round stored"),
        (status = 409, description = "A round is already in progress")
    )
)]
pub async fn resume_game(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<GameSessionView>, AppError> {
    Ok(Json(game_service::resume_game(&state, user_id).await?))
}

/// Record a stroke played with a player's ball on the current hole.
#[utoipa::path(
    post,
    path = "/games/active/strokes",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    request_body = RecordStrokeRequest,
    responses(
        (status = 200, description = "Stroke recorded", body = StrokeResponse),
        (status = 409, description = "No open hole or unknown player")
    )
)]
pub async fn record_stroke(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Json(payload): Json<RecordStrokeRequest>,
) -> Result<Json<StrokeResponse>, AppError> {
    Ok(Json(
        game_service::record_stroke(&state, user_id, payload).await?,
    ))
}

/// Remove the latest stroke of the current hole.
#[utoipa::path(
    delete,
    path = "/games/active/strokes/last",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Stroke removed, or nothing to undo", body = UndoResponse),
        (status = 409, description = "No round in progress")
    )
)]
pub async fn undo_last_stroke(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<UndoResponse>, AppError> {
    Ok(Json(game_service::undo_last_stroke(&state, user_id).await?))
}

/// Assign par to the current hole.
#[utoipa::path(
    put,
    path = "/games/active/par",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    request_body = SetParRequest,
    responses(
        (status = 200, description = "Par assigned", body = GameSessionView),
        (status = 400, description = "Invalid par"),
        (status = 409, description = "No open hole")
    )
)]
pub async fn set_hole_par(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Json(payload): Json<SetParRequest>,
) -> Result<Json<GameSessionView>, AppError> {
    payload.validate()?;
    Ok(Json(
        game_service::set_hole_par(&state, user_id, payload).await?,
    ))
}

/// Finalize the current hole and move to the next one.
#[utoipa::path(
    post,
    path = "/games/active/advance",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    request_body = AdvanceHoleRequest,
    responses(
        (status = 200, description = "Hole finalized", body = AdvanceHoleResponse),
        (status = 400, description = "No strokes or no par for the hole"),
        (status = 409, description = "Every hole is already finalized")
    )
)]
pub async fn advance_hole(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Json(payload): Json<AdvanceHoleRequest>,
) -> Result<Json<AdvanceHoleResponse>, AppError> {
    payload.validate()?;
    Ok(Json(
        game_service::advance_hole(&state, user_id, payload).await?,
    ))
}

/// Commit the finished round and return its scorecard.
#[utoipa::path(
    post,
    path = "/games/active/complete",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Round completed; `sync` is `queued` when the store was unreachable", body = CompleteGameResponse),
        (status = 409, description = "Holes are still open")
    )
)]
pub async fn complete_game(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<CompleteGameResponse>, AppError> {
    Ok(Json(game_service::complete_game(&state, user_id).await?))
}

/// Most recent completed rounds of the caller.
#[utoipa::path(
    get,
    path = "/games/history",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Completed rounds, newest first", body = [GameSummaryView]),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn game_history(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<Vec<GameSummaryView>>, AppError> {
    Ok(Json(game_service::history(&state, user_id).await?))
}

/// Scorecard of one of the caller's rounds.
#[utoipa::path(
    get,
    path = "/games/{id}",
    tag = "games",
    params(
        ("x-user-id" = Uuid, Header, description = "Account of the caller"),
        ("id" = Uuid, Path, description = "Identifier of the game")
    ),
    responses(
        (status = 200, description = "Scorecard of the game", body = GameSummaryView),
        (status = 404, description = "No such game for this user"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn game_details(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<Json<GameSummaryView>, AppError> {
    Ok(Json(game_service::game_details(&state, user_id, id).await?))
}

/// Saved setup form of the caller.
#[utoipa::path(
    get,
    path = "/games/draft",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 200, description = "Saved draft", body = DraftGameView),
        (status = 404, description = "No draft saved")
    )
)]
pub async fn get_draft(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<Json<DraftGameView>, AppError> {
    Ok(Json(game_service::draft(&state, user_id).await?))
}

/// Save the caller's setup form, replacing the previous one.
#[utoipa::path(
    put,
    path = "/games/draft",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "Draft saved", body = DraftGameView),
        (status = 400, description = "Draft is not an object or too large"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn save_draft(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Json(payload): Json<SaveDraftRequest>,
) -> Result<Json<DraftGameView>, AppError> {
    payload.validate()?;
    Ok(Json(
        game_service::save_draft(&state, user_id, payload).await?,
    ))
}

/// Drop the caller's setup form.
#[utoipa::path(
    delete,
    path = "/games/draft",
    tag = "games",
    params(("x-user-id" = Uuid, Header, description = "Account of the caller")),
    responses(
        (status = 204, description = "Draft cleared"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn clear_draft(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
) -> Result<StatusCode, AppError> {
    game_service::clear_draft(&state, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the caller's rounds.
#[utoipa::path(
    delete,
    path = "/games/{id}",
    tag = "games",
    params(
        ("x-user-id" = Uuid, Header, description = "Account of the caller"),
        ("id" = Uuid, Path, description = "Identifier of the game to delete")
    ),
    responses(
        (status = 204, description = "Game deleted"),
        (status = 404, description = "No such game for this user"),
        (status = 503, description = "Store unavailable")
    )
)]
pub async fn delete_game(
    State(state): State<SharedState>,
    UserId(user_id): UserId,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    game_service::delete_game(&state, user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
