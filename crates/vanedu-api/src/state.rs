//! Application state shared by every handler

use crate::auth::{ConfiguredCredentials, CredentialVerifier};
use std::sync::Arc;
use std::time::{Duration, Instant};
use vanedu_core::{Config, context_error, context_error::Result};
use vanedu_store::Store;

/// Configuration, data source and credential verifier for one server
#[derive(Debug, Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Config,

    /// Resource repositories
    pub store: Store,

    /// Login credential checks
    pub credentials: Arc<dyn CredentialVerifier>,

    /// When the state was built
    pub started_at: Instant,
}

impl AppState {
    /// Build state with the configured admin credentials
    #[must_use]
    pub fn new(config: Config, store: Store) -> Self {
        let credentials = Arc::new(ConfiguredCredentials::from_config(&config.auth));

        Self {
            config,
            store,
            credentials,
            started_at: Instant::now(),
        }
    }

    /// Swap in a different credential verifier
    #[must_use]
    pub fn with_credentials(mut self, credentials: Arc<dyn CredentialVerifier>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Time since the state was built
    #[must_use]
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Check the configuration before serving
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid configuration value.
    pub fn validate(&self) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| context_error!("Invalid configuration: {}", e))
    }
}
