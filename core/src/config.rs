use serde::{Deserialize, Serialize};

use crate::errors::{ConfigError, DEFAULT_HTTP_ERROR};

/// Environment variable holding the documentation site's domain.
pub const DOCS_DOMAIN_ENV: &str = "DOCS_DOMAIN_NAME";

/// Environment variable holding a YAML [`HandlerConfig`].
pub const HANDLER_CONFIG_ENV: &str = "GREETER_CONFIG";

/// Source of settings that are looked up on every response build.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigProvider: Send + Sync {
    /// Domain used for the CORS origin, if one is configured.
    fn docs_domain(&self) -> Option<String>;
}

/// Reads the process environment on each call, so a changed
/// `DOCS_DOMAIN_NAME` is picked up by the next response.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvConfig;

impl ConfigProvider for EnvConfig {
    fn docs_domain(&self) -> Option<String> {
        std::env::var(DOCS_DOMAIN_ENV).ok()
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticConfig {
    docs_domain: Option<String>,
}

impl StaticConfig {
    pub fn new(docs_domain: impl Into<String>) -> Self {
        Self {
            docs_domain: Some(docs_domain.into()),
        }
    }

    pub fn unset() -> Self {
        Self::default()
    }
}

impl ConfigProvider for StaticConfig {
    fn docs_domain(&self) -> Option<String> {
        self.docs_domain.clone()
    }
}

/// Per-deployment settings of one handler.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HandlerConfig {
    /// Word placed in front of the name, e.g. `Hello`.
    pub greeting: String,
    /// Body message for failures outside the error taxonomy.
    #[serde(default = "default_error_message")]
    pub default_error_message: String,
}

fn default_error_message() -> String {
    DEFAULT_HTTP_ERROR.to_string()
}

impl HandlerConfig {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
            default_error_message: default_error_message(),
        }
    }

    pub fn hello() -> Self {
        Self::new("Hello")
    }

    pub fn goodbye() -> Self {
        Self::new("Goodbye")
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            origin: path.to_string(),
            error: Box::new(e),
        })?;
        Self::parse(path, &content)
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let config_str = std::env::var(HANDLER_CONFIG_ENV).map_err(|_| ConfigError::MissingField {
            field: HANDLER_CONFIG_ENV.to_string(),
        })?;
        Self::parse(HANDLER_CONFIG_ENV, &config_str)
    }

    /// Uses `GREETER_CONFIG` when it is set, otherwise `fallback`.
    pub fn from_env_or(fallback: HandlerConfig) -> Result<Self, ConfigError> {
        if std::env::var_os(HANDLER_CONFIG_ENV).is_none() {
            return Ok(fallback);
        }
        Self::from_env()
    }

    fn parse(origin: &str, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::LoadFailed {
            origin: origin.to_string(),
            error: Box::new(e),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.greeting.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "Greeting cannot be empty".to_string(),
            });
        }
        if self.default_error_message.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "Default error message cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
