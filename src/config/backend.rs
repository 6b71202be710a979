//! Backend configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Backend-as-a-service configuration (PostgREST endpoint)
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Project URL, e.g. `https://abcdefgh.supabase.co`
    pub url: String,

    /// Public anonymous API key, sent as the `apikey` header
    pub anon_key: SecretString,

    /// Database schema exposed through the REST API
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

impl BackendConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// REST root, `{url}/rest/v1`
    pub fn rest_url(&self) -> String {
        format!("{}/rest/v1", self.url.trim_end_matches('/'))
    }

    /// Validate backend configuration
    ///
    /// Plain HTTP is only accepted for local development hosts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("BACKEND__URL"));
        }
        if self.anon_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("BACKEND__ANON_KEY"));
        }

        let url = reqwest::Url::parse(&self.url).map_err(|_| ValidationError::InvalidBackendUrl)?;
        match url.scheme() {
            "https" => {}
            "http" if is_local_host(url.host_str()) => {}
            "http" => return Err(ValidationError::BackendUrlMustBeHttps),
            _ => return Err(ValidationError::InvalidBackendUrl),
        }

        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.schema.is_empty()
            || !self
                .schema
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(ValidationError::InvalidSchema);
        }

        Ok(())
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: SecretString::new(String::new()),
            schema: default_schema(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

fn is_local_host(host: Option<&str>) -> bool {
    matches!(host, Some("localhost") | Some("127.0.0.1") | Some("[::1]"))
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> BackendConfig {
        BackendConfig {
            url: "https://abcdefgh.supabase.co".to_string(),
            anon_key: SecretString::new("anon-key".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_backend_config_defaults() {
        let config = BackendConfig::default();
        assert_eq!(config.schema, "public");
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_rest_url_trims_trailing_slash() {
        let config = BackendConfig {
            url: "https://abcdefgh.supabase.co/".to_string(),
            ..valid_config()
        };
        assert_eq!(config.rest_url(), "https://abcdefgh.supabase.co/rest/v1");
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_url() {
        let config = BackendConfig {
            url: String::new(),
            ..valid_config()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BACKEND__URL"))
        );
    }

    #[test]
    fn test_validation_missing_anon_key() {
        let config = BackendConfig {
            anon_key: SecretString::new(String::new()),
            ..valid_config()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("BACKEND__ANON_KEY"))
        );
    }

    #[test]
    fn test_validation_http_only_for_localhost() {
        let local = BackendConfig {
            url: "http://localhost:54321".to_string(),
            ..valid_config()
        };
        assert!(local.validate().is_ok());

        let remote = BackendConfig {
            url: "http://abcdefgh.supabase.co".to_string(),
            ..valid_config()
        };
        assert_eq!(remote.validate(), Err(ValidationError::BackendUrlMustBeHttps));
    }

    #[test]
    fn test_validation_rejects_garbage_url() {
        let config = BackendConfig {
            url: "not a url".to_string(),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidBackendUrl));
    }

    #[test]
    fn test_validation_timeout_bounds() {
        let zero = BackendConfig {
            request_timeout_secs: 0,
            ..valid_config()
        };
        assert_eq!(zero.validate(), Err(ValidationError::InvalidTimeout));

        let huge = BackendConfig {
            request_timeout_secs: 301,
            ..valid_config()
        };
        assert_eq!(huge.validate(), Err(ValidationError::InvalidTimeout));
    }

    #[test]
    fn test_validation_schema_name() {
        let config = BackendConfig {
            schema: "public; drop".to_string(),
            ..valid_config()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidSchema));
    }
}
