use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};

use crate::{
    dto::course::{CourseCandidateView, CourseDetailsView, CourseSearchQuery},
    error::AppError,
    services::course_service,
    state::SharedState,
};

/// Course lookup routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/courses/search", get(search_courses))
        .route("/courses/{id}", get(course_details))
}

/// Search golf courses by name; lookup failures yield an empty list.
#[utoipa::path(
    get,
    path = "/courses/search",
    tag = "courses",
    params(CourseSearchQuery),
    responses((status = 200, description = "Matching courses", body = [CourseCandidateView]))
)]
pub async fn search_courses(
    State(state): State<SharedState>,
    Query(params): Query<CourseSearchQuery>,
) -> Json<Vec<CourseCandidateView>> {
    let courses = course_service::search_courses(&state, &params.query).await;
    Json(courses.into_iter().map(Into::into).collect())
}

/// Hole layout of a course for its preferred tee.
#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = i64, Path, description = "Catalog identifier of the course")),
    responses(
        (status = 200, description = "Course layout", body = CourseDetailsView),
        (status = 404, description = "Unknown course or lookup unavailable")
    )
)]
pub async fn course_details(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
) -> Result<Json<CourseDetailsView>, AppError> {
    course_service::course_details(&state, id)
        .await
        .map(|details| Json(details.into()))
        .ok_or_else(|| AppError::NotFound(format!("course `{id}` not found")))
}
