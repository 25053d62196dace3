//! Client bootstrap for the document database.

use super::DatabaseConfig;
use mongodb::{Client, bson::doc, options::ClientOptions};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while connecting to the database.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    /// The connection string or client options were rejected.
    #[error("invalid client options: {0}")]
    Options(Arc<mongodb::error::Error>),

    /// The server did not answer the initial ping.
    #[error("database ping failed: {0}")]
    Ping(Arc<mongodb::error::Error>),
}

/// Builds a client from `config` and pings the configured database.
///
/// # Errors
///
/// Returns [`ConnectError::Options`] for an unusable connection string and
/// [`ConnectError::Ping`] when the server cannot be reached.
pub async fn connect(config: &DatabaseConfig) -> Result<Client, ConnectError> {
    let mut options = ClientOptions::parse(config.uri.as_str())
        .await
        .map_err(|err| ConnectError::Options(Arc::new(err)))?;
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }
    if let Some(timeout) = config.server_selection_timeout {
        options.server_selection_timeout = Some(timeout);
    }

    let client =
        Client::with_options(options).map_err(|err| ConnectError::Options(Arc::new(err)))?;
    client
        .database(&config.database_name)
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|err| ConnectError::Ping(Arc::new(err)))?;

    tracing::info!(database = %config.database_name, "connected to document database");
    Ok(client)
}
