//! Environment-driven database configuration.

use super::DEFAULT_DATABASE;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

const URI_VAR: &str = "CHAT_SERVICE_MONGODB_URI";
const DATABASE_VAR: &str = "CHAT_SERVICE_DATABASE";
const APP_NAME_VAR: &str = "CHAT_SERVICE_APP_NAME";
const SELECTION_TIMEOUT_VAR: &str = "CHAT_SERVICE_SERVER_SELECTION_TIMEOUT_MS";

/// Connection settings for the document database.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DatabaseConfig {
    /// `MongoDB` connection string.
    pub uri: String,
    /// Database holding the chat, membership, and user collections.
    #[serde(default = "default_database_name")]
    pub database_name: String,
    /// Application name reported to the server, if any.
    #[serde(default)]
    pub app_name: Option<String>,
    /// Upper bound on server selection before an operation fails.
    #[serde(default, with = "optional_millis")]
    pub server_selection_timeout: Option<Duration>,
}

/// Errors raised while loading [`DatabaseConfig`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DatabaseConfigError {
    /// A required variable is not set.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed.
    #[error("invalid value '{value}' for {name}")]
    Invalid {
        /// Variable name.
        name: &'static str,
        /// Raw value found.
        value: String,
    },
}

impl DatabaseConfig {
    /// Creates a configuration for `uri` using the default database.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            database_name: default_database_name(),
            app_name: None,
            server_selection_timeout: None,
        }
    }

    /// Loads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseConfigError`] when the connection string is missing
    /// or a numeric setting does not parse.
    pub fn from_env() -> Result<Self, DatabaseConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through a variable lookup function.
    ///
    /// Blank values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns [`DatabaseConfigError`] when the connection string is missing
    /// or a numeric setting does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DatabaseConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let uri = read(URI_VAR).ok_or(DatabaseConfigError::Missing(URI_VAR))?;
        let database_name = read(DATABASE_VAR).unwrap_or_else(default_database_name);
        let app_name = read(APP_NAME_VAR);
        let server_selection_timeout = read(SELECTION_TIMEOUT_VAR)
            .map(|raw| {
                raw.trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|_| DatabaseConfigError::Invalid {
                        name: SELECTION_TIMEOUT_VAR,
                        value: raw,
                    })
            })
            .transpose()?;

        Ok(Self {
            uri,
            database_name,
            app_name,
            server_selection_timeout,
        })
    }
}

fn default_database_name() -> String {
    DEFAULT_DATABASE.to_owned()
}

mod optional_millis {
    use serde::{Deserialize, Deserializer};
    use std::time::Duration;

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}
