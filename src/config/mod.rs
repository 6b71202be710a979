//! Runtime configuration.
//!
//! Settings come from `USER_CONTEXT`-prefixed environment variables, with
//! `__` separating nested keys. A `.env` file in the working directory is
//! read first when present.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `USER_CONTEXT__BACKEND__URL` | required |
//! | `USER_CONTEXT__BACKEND__ANON_KEY` | required |
//! | `USER_CONTEXT__BACKEND__SCHEMA` | `public` |
//! | `USER_CONTEXT__BACKEND__REQUEST_TIMEOUT_SECS` | `10` |
//! | `USER_CONTEXT__LOG_LEVEL` | `info` |
//!
//! ```no_run
//! use user_context::config::AppConfig;
//!
//! let config = AppConfig::load_validated()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod backend;
mod error;

pub use backend::BackendConfig;
pub use error::{ConfigError, ValidationError};

use std::collections::HashMap;

use serde::Deserialize;

const ENV_PREFIX: &str = "USER_CONTEXT";
const ENV_SEPARATOR: &str = "__";

/// All settings of the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub backend: BackendConfig,

    /// Tracing filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl AppConfig {
    /// Reads `.env` (if any) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_environment(environment())
    }

    /// [`load`](Self::load) followed by [`validate`](Self::validate).
    pub fn load_validated() -> Result<Self, ConfigError> {
        Self::load()?.validated()
    }

    /// Returns the configuration if it passes validation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        self.validate()?;
        Ok(self)
    }

    /// Builds the configuration from explicit `USER_CONTEXT__*` pairs
    /// instead of the process environment.
    pub fn from_vars<K, V>(vars: impl IntoIterator<Item = (K, V)>) -> Result<Self, ConfigError>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self::from_environment(environment().source(Some(vars)))
    }

    fn from_environment(source: config::Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(config)
    }

    /// Checks values that deserialize fine but cannot work.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.backend.validate()
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX).separator(ENV_SEPARATOR)
}

fn default_log_level() -> String {
    "info".to_string()
}
