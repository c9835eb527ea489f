pub mod golf_api;

use crate::dao::models::{CourseCandidate, CourseDetails};
use crate::dao::storage::StorageResult;
use futures::future::BoxFuture;

/// Lookup of golf courses and their per-hole pars.
pub trait CourseCatalog: Send + Sync {
    /// Courses whose name matches `query`.
    fn search_courses(&self, query: String) -> BoxFuture<'static, StorageResult<Vec<CourseCandidate>>>;
    /// Hole layout of one course for its preferred tee; `None` when unknown.
    fn course_details(&self, course_id: i64) -> BoxFuture<'static, StorageResult<Option<CourseDetails>>>;
}
