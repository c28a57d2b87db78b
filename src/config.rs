//! Runtime configuration
//!
//! Values come from CLI flags or the environment (a `.env` file is loaded
//! first by the binary).

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};
use tracing::warn;

use crate::auth::credentials::DEFAULT_BCRYPT_COST;

/// Signing secret used when `JWT_SECRET` is unset outside production.
/// Anyone who knows it can mint tokens.
pub const INSECURE_DEV_JWT_SECRET: &str = "dev_secret_key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "tender-server")]
#[command(about = "Tender CRUD backend with JWT-protected endpoints")]
pub struct Config {
    /// Port to listen on (all interfaces)
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Location of the tender document store (SQLite file)
    #[arg(long, env = "DATABASE_PATH")]
    pub database_path: String,

    /// Secret used to sign bearer tokens
    #[arg(long, env = "JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: Option<String>,

    /// Deployment environment; production refuses to start without JWT_SECRET
    #[arg(long, env = "APP_ENV", value_enum, default_value_t = Environment::Development)]
    pub app_env: Environment,

    /// bcrypt cost for hashing the admin credential at startup
    #[arg(long, env = "BCRYPT_COST", default_value_t = DEFAULT_BCRYPT_COST)]
    pub bcrypt_cost: u32,
}

impl Config {
    /// Resolve the token signing secret.
    ///
    /// Production requires an explicit, non-empty secret. Development falls
    /// back to [`INSECURE_DEV_JWT_SECRET`] and says so.
    pub fn resolve_jwt_secret(&self) -> Result<String> {
        match self.jwt_secret.as_deref().map(str::trim) {
            Some(secret) if !secret.is_empty() => Ok(secret.to_string()),
            _ if self.app_env == Environment::Production => {
                bail!("JWT_SECRET must be set when APP_ENV=production")
            }
            _ => {
                warn!("⚠️  JWT_SECRET not set, using insecure development secret");
                Ok(INSECURE_DEV_JWT_SECRET.to_string())
            }
        }
    }
}
