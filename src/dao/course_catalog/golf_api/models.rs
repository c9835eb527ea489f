use serde::Deserialize;

use crate::dao::models::{CourseCandidate, CourseDetails, CourseHole};

/// Holes in a regulation round, preferred when several tees are offered.
const REGULATION_HOLES: u32 = 18;

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub courses: Vec<ApiCourse>,
}

#[derive(Debug, Deserialize)]
pub struct DetailsResponse {
    pub course: Option<ApiCourse>,
}

#[derive(Debug, Deserialize)]
pub struct ApiCourse {
    pub id: i64,
    #[serde(default)]
    pub club_name: Option<String>,
    #[serde(default)]
    pub course_name: Option<String>,
    #[serde(default)]
    pub location: Option<ApiLocation>,
    #[serde(default)]
    pub tees: Option<ApiTees>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiLocation {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApiTees {
    #[serde(default)]
    pub male: Vec<ApiTee>,
    #[serde(default)]
    pub female: Vec<ApiTee>,
}

#[derive(Debug, Deserialize)]
pub struct ApiTee {
    pub tee_name: Option<String>,
    pub par_total: Option<u32>,
    pub number_of_holes: Option<u32>,
    #[serde(default)]
    pub holes: Vec<ApiHole>,
}

#[derive(Debug, Deserialize)]
pub struct ApiHole {
    pub par: u8,
    pub yardage: Option<u32>,
    pub handicap: Option<u8>,
}

impl ApiCourse {
    fn display_name(&self) -> String {
        self.course_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.club_name.clone())
            .unwrap_or_else(|| format!("Course {}", self.id))
    }

    /// Resolve the hole layout from the preferred tee, if the course publishes one.
    pub fn into_details(self) -> Option<CourseDetails> {
        let course_name = self.display_name();
        let tees = self.tees?;
        let all_tees: Vec<ApiTee> = tees.male.into_iter().chain(tees.female).collect();

        let index = all_tees
            .iter()
            .position(|tee| tee.number_of_holes == Some(REGULATION_HOLES))
            .unwrap_or(0);
        let tee = all_tees.into_iter().nth(index)?;
        if tee.holes.is_empty() {
            return None;
        }

        let holes = tee
            .holes
            .into_iter()
            .enumerate()
            .map(|(index, hole)| CourseHole {
                number: (index + 1) as u8,
                par: hole.par,
                yardage: hole.yardage,
                handicap: hole.handicap,
            })
            .collect();

        Some(CourseDetails {
            id: self.id,
            course_name,
            tee_name: tee.tee_name,
            par_total: tee.par_total,
            holes,
        })
    }
}

impl From<ApiCourse> for CourseCandidate {
    fn from(course: ApiCourse) -> Self {
        let course_name = course.display_name();
        let club_name = course.club_name.filter(|club| *club != course_name);
        let location = course.location.and_then(|location| {
            let parts: Vec<String> = [location.city, location.state, location.country]
                .into_iter()
                .flatten()
                .filter(|part| !part.trim().is_empty())
                .collect();
            if parts.is_empty() {
                location.address
            } else {
                Some(parts.join(", "))
            }
        });

        Self {
            id: course.id,
            course_name,
            club_name,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn holes(pars: &[u8]) -> serde_json::Value {
        json!(pars
            .iter()
            .map(|par| json!({ "par": par, "yardage": 350, "handicap": 1 }))
            .collect::<Vec<_>>())
    }

    #[test]
    fn prefers_eighteen_hole_tee_across_genders() {
        let payload = json!({
            "course": {
                "id": 7,
                "club_name": "Harbor Club",
                "course_name": "Harbor",
                "tees": {
                    "male": [
                        { "tee_name": "Short", "par_total": 27, "number_of_holes": 9, "holes": holes(&[3; 9]) }
                    ],
                    "female": [
                        { "tee_name": "Red", "par_total": 72, "number_of_holes": 18, "holes": holes(&[4; 18]) }
                    ]
                }
            }
        });

        let response: DetailsResponse = serde_json::from_value(payload).unwrap();
        let details = response.course.unwrap().into_details().unwrap();
        assert_eq!(details.tee_name.as_deref(), Some("Red"));
        assert_eq!(details.holes.len(), 18);
        assert_eq!(details.holes[17].number, 18);
        assert_eq!(details.hole_pars().iter().map(|par| u32::from(*par)).sum::<u32>(), 72);
    }

    #[test]
    fn falls_back_to_first_tee() {
        let payload = json!({
            "id": 3,
            "course_name": "Pitch",
            "tees": { "male": [ { "tee_name": "White", "number_of_holes": 9, "holes": holes(&[3, 4, 5]) } ] }
        });
        let course: ApiCourse = serde_json::from_value(payload).unwrap();
        let details = course.into_details().unwrap();
        assert_eq!(details.tee_name.as_deref(), Some("White"));
        assert_eq!(details.hole_pars(), vec![3, 4, 5]);
    }

    #[test]
    fn tee_without_holes_yields_no_details() {
        let payload = json!({
            "id": 4,
            "course_name": "Empty",
            "tees": { "male": [ { "tee_name": "Blue", "number_of_holes": 18, "holes": [] } ] }
        });
        let course: ApiCourse = serde_json::from_value(payload).unwrap();
        assert!(course.into_details().is_none());
    }

    #[test]
    fn candidate_joins_location_parts() {
        let payload = json!({
            "id": 9,
            "club_name": "Pine Club",
            "course_name": "Pine Valley",
            "location": { "address": "1 Main St", "city": "Pine", "state": "NJ", "country": "United States" }
        });
        let course: ApiCourse = serde_json::from_value(payload).unwrap();
        let candidate = CourseCandidate::from(course);
        assert_eq!(candidate.location.as_deref(), Some("Pine, NJ, United States"));
        assert_eq!(candidate.club_name.as_deref(), Some("Pine Club"));
    }
}
