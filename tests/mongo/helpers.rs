//! Shared helpers for `MongoDB` integration tests.
//!
//! Tests run only when `CHAT_SERVICE_TEST_MONGODB_URI` points at a replica
//! set; transactions are unavailable on standalone servers. Each test gets
//! its own database, dropped when the [`TestDatabase`] guard is released.

use std::sync::Arc;

use chatstore::{
    chat::{adapters::mongo::MongoChatStore, services::ChatRepositoryService},
    database::{DatabaseConfig, connect},
    user::adapters::mongo::MongoUserRepository,
};
use mockable::DefaultClock;
use mongodb::Client;
use uuid::Uuid;

/// Environment variable naming the test server.
pub const TEST_URI_VAR: &str = "CHAT_SERVICE_TEST_MONGODB_URI";

/// Chat service wired to a `MongoDB` store.
pub type MongoChatService = ChatRepositoryService<MongoChatStore, DefaultClock>;

/// A uniquely named database for one test.
pub struct TestDatabase {
    client: Client,
    name: String,
}

impl TestDatabase {
    /// Connects to the test server, or returns `None` when none is configured.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured server cannot be reached.
    pub async fn connect() -> Result<Option<Self>, eyre::Report> {
        let Ok(uri) = std::env::var(TEST_URI_VAR) else {
            return Ok(None);
        };
        let name = format!("chatstore_test_{}", Uuid::new_v4().simple());
        let mut config = DatabaseConfig::new(uri);
        config.database_name.clone_from(&name);
        let client = connect(&config).await?;
        Ok(Some(Self { client, name }))
    }

    /// Builds an indexed chat store and a service over it.
    ///
    /// # Errors
    ///
    /// Returns an error if index creation fails.
    pub async fn chat_service(&self) -> Result<(MongoChatStore, MongoChatService), eyre::Report> {
        let store = MongoChatStore::new(self.client.clone(), &self.name);
        store.ensure_indexes().await?;
        let service = ChatRepositoryService::new(Arc::new(store.clone()), Arc::new(DefaultClock));
        Ok((store, service))
    }

    /// Builds an indexed user repository.
    ///
    /// # Errors
    ///
    /// Returns an error if index creation fails.
    pub async fn users(&self) -> Result<MongoUserRepository, eyre::Report> {
        let repository = MongoUserRepository::new(&self.client, &self.name);
        repository.ensure_indexes().await?;
        Ok(repository)
    }

    /// Drops the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the drop command fails.
    pub async fn cleanup(self) -> Result<(), eyre::Report> {
        self.client.database(&self.name).drop().await?;
        Ok(())
    }
}
