//! PostgREST client configuration.

use std::time::Duration;

use secrecy::SecretString;

use crate::config::BackendConfig;

/// Connection settings for the PostgREST API.
#[derive(Debug, Clone)]
pub struct PostgrestConfig {
    /// REST root, e.g. `https://abcdefgh.supabase.co/rest/v1`.
    pub(super) rest_url: String,

    /// Public anonymous key, sent as `apikey` and as the fallback bearer.
    pub(super) anon_key: SecretString,

    /// Schema selected with `Accept-Profile`.
    pub(super) schema: String,

    pub(super) request_timeout: Duration,
}

impl PostgrestConfig {
    /// Create a configuration for a project URL (without `/rest/v1`).
    pub fn new(project_url: impl AsRef<str>, anon_key: impl Into<String>) -> Self {
        Self {
            rest_url: format!("{}/rest/v1", project_url.as_ref().trim_end_matches('/')),
            anon_key: SecretString::new(anon_key.into()),
            schema: "public".to_string(),
            request_timeout: Duration::from_secs(10),
        }
    }

    /// Select a non-default schema.
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// REST root URL.
    pub fn rest_url(&self) -> &str {
        &self.rest_url
    }
}

impl From<&BackendConfig> for PostgrestConfig {
    fn from(config: &BackendConfig) -> Self {
        Self {
            rest_url: config.rest_url(),
            anon_key: config.anon_key.clone(),
            schema: config.schema.clone(),
            request_timeout: config.request_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_appends_rest_root() {
        let config = PostgrestConfig::new("http://localhost:54321/", "anon");
        assert_eq!(config.rest_url(), "http://localhost:54321/rest/v1");
        assert_eq!(config.schema, "public");
    }

    #[test]
    fn from_backend_config_copies_settings() {
        let backend = BackendConfig {
            url: "https://abcdefgh.supabase.co".to_string(),
            anon_key: SecretString::new("anon".to_string()),
            schema: "billing".to_string(),
            request_timeout_secs: 5,
        };

        let config = PostgrestConfig::from(&backend);
        assert_eq!(config.rest_url(), "https://abcdefgh.supabase.co/rest/v1");
        assert_eq!(config.schema, "billing");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }
}
