//! Admin credential checks

use async_trait::async_trait;
use std::fmt;
use vanedu_core::config::AuthConfig;
use vanedu_core::{AuthUser, Error, Result, Role};

/// Checks login credentials and resolves the signed-in admin
#[async_trait]
pub trait CredentialVerifier: Send + Sync + fmt::Debug {
    /// Resolve the admin profile for an email/password pair
    ///
    /// # Errors
    ///
    /// Returns [`Error::Authentication`] when the pair is rejected.
    async fn verify(&self, email: &str, password: &str) -> Result<AuthUser>;
}

/// Accepts the single admin account from configuration.
///
/// Stands in for a real credential service; passwords are compared in
/// plain text.
#[derive(Clone)]
pub struct ConfiguredCredentials {
    email: String,
    password: String,
    name: String,
}

impl ConfiguredCredentials {
    /// Verifier for the configured admin account
    #[must_use]
    pub fn from_config(auth: &AuthConfig) -> Self {
        Self {
            email: auth.admin_email.trim().to_lowercase(),
            password: auth.admin_password.clone(),
            name: auth.admin_name.clone(),
        }
    }
}

impl fmt::Debug for ConfiguredCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfiguredCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .finish()
    }
}

#[async_trait]
impl CredentialVerifier for ConfiguredCredentials {
    async fn verify(&self, email: &str, password: &str) -> Result<AuthUser> {
        if email.trim().to_lowercase() != self.email || password != self.password {
            return Err(Error::Authentication("Invalid credentials".to_string()));
        }

        Ok(AuthUser {
            id: "admin".to_string(),
            name: self.name.clone(),
            email: self.email.clone(),
            role: Role::Admin,
            avatar: None,
        })
    }
}
