//! Credential Storage
//! Mission: Verify login credentials against salted bcrypt hashes

use crate::auth::models::CredentialCheck;
use anyhow::{Context, Result};
use bcrypt::{hash, verify};
use tracing::{info, warn};

pub const DEFAULT_ADMIN_USERNAME: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Source of truth for login credentials.
///
/// The router only sees this trait, so more users can be added later
/// without touching the login handler.
pub trait CredentialProvider: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> CredentialCheck;
}

/// A single credential fixed at process start
pub struct StaticCredentials {
    username: String,
    password_hash: String,
}

impl StaticCredentials {
    /// Hash `password` once and keep it for the lifetime of the process
    pub fn new(username: &str, password: &str, cost: u32) -> Result<Self> {
        let password_hash = hash(password, cost).context("Failed to hash password")?;
        Ok(Self {
            username: username.to_string(),
            password_hash,
        })
    }

    /// The built-in admin account
    pub fn admin_default(cost: u32) -> Result<Self> {
        let creds = Self::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD, cost)?;
        info!("🔐 Admin credential ready (username: {})", creds.username);
        warn!("⚠️  Built-in admin password is in use, do not expose this service publicly");
        Ok(creds)
    }

    #[cfg(test)]
    fn username(&self) -> &str {
        &self.username
    }
}

impl CredentialProvider for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> CredentialCheck {
        if username != self.username {
            return CredentialCheck::UnknownUsername;
        }

        match verify(password, &self.password_hash) {
            Ok(true) => CredentialCheck::Valid,
            Ok(false) => CredentialCheck::WrongPassword,
            Err(e) => {
                warn!("Password hash verification failed: {}", e);
                CredentialCheck::WrongPassword
            }
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}
