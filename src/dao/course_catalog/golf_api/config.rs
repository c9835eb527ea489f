use super::error::{GolfApiError, GolfApiResult};

const DEFAULT_BASE_URL: &str = "https://api.golfcourseapi.com/v1";

/// Connection settings for the golf course API.
#[derive(Debug, Clone)]
pub struct GolfApiConfig {
    pub base_url: String,
    pub api_key: String,
}

impl GolfApiConfig {
    /// Configuration pointing at the public endpoint.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Override the endpoint (staging, local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read `GOLF_API_KEY` and the optional `GOLF_API_BASE_URL`.
    pub fn from_env() -> GolfApiResult<Self> {
        let api_key = std::env::var("GOLF_API_KEY")
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or(GolfApiError::MissingEnvVar {
                var: "GOLF_API_KEY",
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GOLF_API_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }
}
