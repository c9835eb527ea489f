use super::error::{RestDaoError, RestResult};

/// Runtime configuration describing how to reach the hosted Postgres REST API.
#[derive(Debug, Clone)]
pub struct RestConfig {
    pub base_url: String,
    pub api_key: String,
    pub access_token: Option<String>,
}

impl RestConfig {
    /// Construct a configuration from the project URL and its public API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            access_token: None,
        }
    }

    /// Use a service or user token as bearer instead of the API key.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> RestResult<Self> {
        let base_url = std::env::var("SUPABASE_URL").map_err(|_| RestDaoError::MissingEnvVar {
            var: "SUPABASE_URL",
        })?;
        let api_key = std::env::var("SUPABASE_ANON_KEY").map_err(|_| {
            RestDaoError::MissingEnvVar {
                var: "SUPABASE_ANON_KEY",
            }
        })?;

        let mut config = Self::new(base_url, api_key);

        if let Some(token) = std::env::var("SUPABASE_SERVICE_TOKEN")
            .ok()
            .filter(|token| !token.is_empty())
        {
            config = config.with_access_token(token);
        }

        Ok(config)
    }

    /// Token sent in the `Authorization: Bearer` header.
    pub fn bearer(&self) -> &str {
        self.access_token.as_deref().unwrap_or(&self.api_key)
    }
}
