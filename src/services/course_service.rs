//! Best-effort course lookup: any failure degrades to "no course selected".

use tracing::{debug, warn};

use crate::{
    dao::models::{CourseCandidate, CourseDetails},
    dto::validation::validate_par,
    state::SharedState,
};

/// Queries shorter than this return nothing without calling the catalog.
pub const MIN_QUERY_LEN: usize = 3;

/// Search the catalog; empty when lookup is disabled, the query is too short or the call fails.
pub async fn search_courses(state: &SharedState, query: &str) -> Vec<CourseCandidate> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }
    let Some(catalog) = state.courses() else {
        debug!("course lookup disabled");
        return Vec::new();
    };

    match catalog.search_courses(query.to_string()).await {
        Ok(courses) => courses,
        Err(err) => {
            warn!(%query, error = %err, "course search failed");
            Vec::new()
        }
    }
}

/// Hole layout of a course; `None` when unknown, lookup is disabled or the call fails.
pub async fn course_details(state: &SharedState, course_id: i64) -> Option<CourseDetails> {
    let catalog = state.courses()?;
    match catalog.course_details(course_id).await {
        Ok(details) => details,
        Err(err) => {
            warn!(course_id, error = %err, "course details lookup failed");
            None
        }
    }
}

/// Per-hole pars of a course, usable for a round of `total_holes` (or of the
/// course's own length when `None`). Layouts of the wrong length or with
/// out-of-range pars are ignored.
pub async fn planned_pars(
    state: &SharedState,
    course_id: i64,
    total_holes: Option<u8>,
) -> Option<Vec<u8>> {
    let details = course_details(state, course_id).await?;
    let pars = details.hole_pars();
    if pars.is_empty() {
        return None;
    }

    let expected = total_holes.map_or(pars.len(), usize::from);
    if pars.len() != expected {
        debug!(course_id, expected, holes = pars.len(), "course layout does not match the round");
        return None;
    }
    if let Some(bad) = pars.iter().copied().find(|par| validate_par(*par).is_err()) {
        warn!(course_id, par = bad, "course reports an invalid par; ignoring its layout");
        return None;
    }
    Some(pars)
}
