use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::dao::{
    course_catalog::CourseCatalog,
    models::{CourseCandidate, CourseDetails},
    storage::StorageResult,
};

use super::{
    config::GolfApiConfig,
    error::{GolfApiError, GolfApiResult},
    models::{DetailsResponse, SearchResponse},
};

/// [`CourseCatalog`] backed by the public golf course API.
#[derive(Clone)]
pub struct GolfApiCatalog {
    client: Client,
    base_url: Arc<str>,
    authorization: Arc<str>,
}

impl GolfApiCatalog {
    /// Build a client for the configured endpoint.
    pub fn new(config: GolfApiConfig) -> GolfApiResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| GolfApiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            authorization: Arc::from(format!("Key {}", config.api_key)),
        })
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, &str)]) -> GolfApiResult<Option<T>>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", self.authorization.as_ref())
            .query(query)
            .send()
            .await
            .map_err(|source| GolfApiError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                response.json::<T>().await.map(Some).map_err(|source| {
                    GolfApiError::DecodeResponse {
                        path: path.to_string(),
                        source,
                    }
                })
            }
            other => Err(GolfApiError::RequestStatus {
                path: path.to_string(),
                status: other,
            }),
        }
    }
}

impl CourseCatalog for GolfApiCatalog {
    fn search_courses(&self, query: String) -> BoxFuture<'static, StorageResult<Vec<CourseCandidate>>> {
        let catalog = self.clone();
        Box::pin(async move {
            let response = catalog
                .get_json::<SearchResponse>("search", &[("search_query", query.as_str())])
                .await?;
            let courses: Vec<CourseCandidate> = response
                .map(|body| body.courses.into_iter().map(Into::into).collect())
                .unwrap_or_default();
            debug!(%query, hits = courses.len(), "course search finished");
            Ok(courses)
        })
    }

    fn course_details(&self, course_id: i64) -> BoxFuture<'static, StorageResult<Option<CourseDetails>>> {
        let catalog = self.clone();
        Box::pin(async move {
            let path = format!("courses/{course_id}");
            let response = catalog.get_json::<DetailsResponse>(&path, &[]).await?;
            Ok(response
                .and_then(|body| body.course)
                .and_then(|course| course.into_details()))
        })
    }
}
