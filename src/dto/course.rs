use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dao::models::{CourseCandidate, CourseDetails, CourseHole};

/// Query string of the course search route.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CourseSearchQuery {
    /// Free text; fewer than three characters yields no results.
    pub query: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseCandidateView {
    pub id: i64,
    pub course_name: String,
    pub club_name: Option<String>,
    pub location: Option<String>,
}

impl From<CourseCandidate> for CourseCandidateView {
    fn from(candidate: CourseCandidate) -> Self {
        Self {
            id: candidate.id,
            course_name: candidate.course_name,
            club_name: candidate.club_name,
            location: candidate.location,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CourseHoleView {
    pub number: u8,
    pub par: u8,
    pub yardage: Option<u32>,
    pub handicap: Option<u8>,
}

impl From<CourseHole> for CourseHoleView {
    fn from(hole: CourseHole) -> Self {
        Self {
            number: hole.number,
            par: hole.par,
            yardage: hole.yardage,
            handicap: hole.handicap,
        }
    }
}

/// Hole layout of a course for its preferred tee.
#[derive(Debug, Serialize, ToSchema)]
pub struct CourseDetailsView {
    pub id: i64,
    pub course_name: String,
    pub tee_name: Option<String>,
    pub par_total: Option<u32>,
    /// Per-hole pars in playing order, ready to pass as `hole_pars` when creating a game.
    pub hole_pars: Vec<u8>,
    pub holes: Vec<CourseHoleView>,
}

impl From<CourseDetails> for CourseDetailsView {
    fn from(details: CourseDetails) -> Self {
        Self {
            hole_pars: details.hole_pars(),
            id: details.id,
            course_name: details.course_name,
            tee_name: details.tee_name,
            par_total: details.par_total,
            holes: details.holes.into_iter().map(Into::into).collect(),
        }
    }
}
