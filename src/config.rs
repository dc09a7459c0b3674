//! Application configuration management.
//!
//! This module handles loading configuration from environment variables.
//! It uses the `envy` crate to deserialize environment variables into a type-safe struct.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `ADMIN_ROLE_ID` (required): platform role that grants privileged commands
/// - `DATABASE_URL` (optional): PostgreSQL connection string; without it the
///   credential store is kept in memory
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
/// - `API_KEY` (optional): shared secret for `/api/checkKey`; generated at
///   startup when not set
/// - `CONSOLE` (optional): `true` to read bot commands from stdin
/// - `CONSOLE_USER_ID` / `CONSOLE_ROLES` (optional): identity and
///   comma-separated roles of the console actor
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub admin_role_id: String,

    #[serde(default)]
    pub database_url: Option<String>,

    #[serde(default = "default_port")]
    pub server_port: u16,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub console: bool,

    #[serde(default = "default_console_user")]
    pub console_user_id: String,

    #[serde(default)]
    pub console_roles: Vec<String>,
}

/// Default port if SERVER_PORT environment variable is not set.
fn default_port() -> u16 {
    3000
}

fn default_console_user() -> String {
    "console".to_string()
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `ADMIN_ROLE_ID` is missing
    /// - Environment variable values cannot be parsed into expected types
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        // Field names are converted: admin_role_id -> ADMIN_ROLE_ID
        let mut config = envy::from_env::<Config>()?;

        // An empty API_KEY is the same as an unset one
        if config.api_key.as_deref().is_some_and(str::is_empty) {
            config.api_key = None;
        }

        Ok(config)
    }
}
