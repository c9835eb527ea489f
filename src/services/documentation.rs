use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Scramble Eggs Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::game::create_game,
        crate::routes::game::active_game,
        crate::routes::game::resume_game,
        crate::routes::game::record_stroke,
        crate::routes::game::undo_last_stroke,
        crate::routes::game::set_hole_par,
        crate::routes::game::advance_hole,
        crate::routes::game::complete_game,
        crate::routes::game::game_history,
        crate::routes::game::game_details,
        crate::routes::game::delete_game,
        crate::routes::game::get_draft,
        crate::routes::game::save_draft,
        crate::routes::game::clear_draft,
        crate::routes::course::search_courses,
        crate::routes::course::course_details,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::CreateGameRequest,
            crate::dto::game::PlayerInput,
            crate::dto::game::RecordStrokeRequest,
            crate::dto::game::SetParRequest,
            crate::dto::game::AdvanceHoleRequest,
            crate::dto::game::SyncReport,
            crate::dto::game::GameSessionView,
            crate::dto::game::PlayerView,
            crate::dto::game::HoleView,
            crate::dto::game::StrokeView,
            crate::dto::game::CreateGameResponse,
            crate::dto::game::StrokeResponse,
            crate::dto::game::UndoResponse,
            crate::dto::game::AdvanceHoleResponse,
            crate::dto::game::CompleteGameResponse,
            crate::dto::game::GameSummaryView,
            crate::dto::game::HoleResultView,
            crate::dto::game::ContributionView,
            crate::dto::draft::SaveDraftRequest,
            crate::dto::draft::DraftGameView,
            crate::dto::course::CourseCandidateView,
            crate::dto::course::CourseDetailsView,
            crate::dto::course::CourseHoleView,
            crate::dao::models::GameStatus,
            crate::dao::models::PlayerKind,
            crate::state::game::ScoreLabel,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "games", description = "Scramble rounds of the calling user"),
        (name = "courses", description = "Golf course lookup"),
    )
)]
pub struct ApiDoc;
