//! Configuration management for the `VanEdu` admin API

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix, e.g. `VANEDU_SERVER__PORT=9000`
pub const ENV_PREFIX: &str = "VANEDU";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,

    /// API behaviour: CORS, page sizes, timeouts
    pub api: ApiConfig,

    /// Admin credential configuration
    pub auth: AuthConfig,

    /// In-memory data source configuration
    pub data: DataConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Enable CORS
    pub enable_cors: bool,

    /// CORS allowed origins
    pub cors_origins: Vec<String>,

    /// Page size used when a list request has no `limit`
    pub default_page_size: u32,

    /// Largest accepted `limit`
    pub max_page_size: u32,

    /// Request timeout in seconds
    pub request_timeout: u64,
}

/// Admin credentials checked by the login endpoint.
///
/// A single configured pair stands in for a real credential service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Admin login email
    pub admin_email: String,

    /// Admin login password
    pub admin_password: String,

    /// Display name returned on successful login
    pub admin_name: String,
}

/// Data source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    /// Load the built-in sample records at startup
    pub seed: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level or `EnvFilter` directive
    pub level: String,

    /// Log format (json or text)
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enable_cors: true,
            cors_origins: vec!["*".to_string()],
            default_page_size: 10,
            max_page_size: 100,
            request_timeout: 30,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_email: "admin@vanedu.com".to_string(),
            admin_password: "admin123".to_string(),
            admin_name: "Admin User".to_string(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from an optional file and the environment
    ///
    /// Without an explicit path, `config.{toml,yaml,json}` in the working
    /// directory is read when present.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file is missing, a source cannot be
    /// parsed, or the merged values fail [`Config::validate`].
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config: Self = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api.cors_origins")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that serde cannot express
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error describing the first invalid value.
    pub fn validate(&self) -> crate::Result<()> {
        let fail = |message: &str| {
            Err(crate::Error::Configuration {
                message: message.to_string(),
            })
        };

        if self.server.port == 0 {
            return fail("server.port must be greater than 0");
        }
        if self.api.max_page_size == 0 {
            return fail("api.max_page_size must be greater than 0");
        }
        if self.api.default_page_size == 0 || self.api.default_page_size > self.api.max_page_size
        {
            return fail("api.default_page_size must be between 1 and api.max_page_size");
        }
        if self.api.request_timeout == 0 {
            return fail("api.request_timeout must be greater than 0");
        }
        if self.auth.admin_email.trim().is_empty() || self.auth.admin_password.is_empty() {
            return fail("auth.admin_email and auth.admin_password must be set");
        }
        Ok(())
    }
}
