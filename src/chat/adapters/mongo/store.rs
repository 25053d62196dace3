//! [`ChatStore`] over a `MongoDB` replica set.

use super::documents::{ChatDocument, MembershipDocument};
use super::errors::classify;
use super::filter::{chat_query, membership_key};
use crate::chat::domain::{Chat, ChatFilter, ChatId, ChatMembership};
use crate::chat::ports::{
    ChatStore, ChatStoreSession, ReadConcernLevel, SessionSettings, StoreError, StoreResult,
    TransactionSettings, WriteAcknowledgement,
};
use crate::user::domain::UserId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mongodb::bson::{Document, doc};
use mongodb::options::{
    Acknowledgment, IndexOptions, ReadConcern, ReturnDocument, SessionOptions,
    TransactionOptions, UpdateModifications, WriteConcern,
};
use mongodb::{Client, ClientSession, Collection, Cursor, IndexModel};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tracing::debug;

/// Chat store backed by the `chat` and `chats_users` collections.
///
/// Transactions require the server to run as a replica set or sharded
/// cluster.
#[derive(Debug, Clone)]
pub struct MongoChatStore {
    client: Client,
    chats: Collection<ChatDocument>,
    memberships: Collection<MembershipDocument>,
}

impl MongoChatStore {
    /// Creates a store over `database` using an already connected client.
    #[must_use]
    pub fn new(client: Client, database: &str) -> Self {
        let db = client.database(database);
        Self {
            chats: db.collection(ChatDocument::COLLECTION),
            memberships: db.collection(MembershipDocument::COLLECTION),
            client,
        }
    }

    /// Creates the unique indexes the store relies on.
    ///
    /// Chat ids and membership ids are unique, and a user holds at most one
    /// membership per chat. Index creation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns the classified driver error when index creation fails.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        self.chats
            .create_index(unique_index(doc! { "id": 1 }))
            .await
            .map_err(classify)?;
        self.chats
            .create_index(IndexModel::builder().keys(doc! { "owner_id": 1 }).build())
            .await
            .map_err(classify)?;
        self.memberships
            .create_index(unique_index(doc! { "id": 1 }))
            .await
            .map_err(classify)?;
        self.memberships
            .create_index(unique_index(doc! { "chat_id": 1, "user_id": 1 }))
            .await
            .map_err(classify)?;
        debug!("chat indexes ensured");
        Ok(())
    }

    async fn update_membership(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        update: impl Into<UpdateModifications>,
    ) -> StoreResult<Option<ChatMembership>> {
        self.memberships
            .find_one_and_update(membership_key(chat_id, user_id), update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(classify)?
            .map(ChatMembership::try_from)
            .transpose()
    }
}

fn unique_index(keys: Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

fn read_concern(level: ReadConcernLevel) -> ReadConcern {
    match level {
        ReadConcernLevel::Local => ReadConcern::local(),
        ReadConcernLevel::Majority => ReadConcern::majority(),
        ReadConcernLevel::Snapshot => ReadConcern::snapshot(),
    }
}

fn write_concern(ack: WriteAcknowledgement) -> WriteConcern {
    match ack {
        WriteAcknowledgement::Majority => WriteConcern::majority(),
        WriteAcknowledgement::Nodes(count) => WriteConcern::from(Acknowledgment::Nodes(count)),
    }
}

fn transaction_options(settings: &TransactionSettings) -> TransactionOptions {
    TransactionOptions::builder()
        .read_concern(read_concern(settings.read_concern))
        .write_concern(write_concern(settings.write_concern))
        .max_commit_time(settings.max_commit_time)
        .build()
}

/// Drains a cursor, keeping iteration faults apart from query faults.
async fn drain_cursor<D, T>(mut cursor: Cursor<D>) -> StoreResult<Vec<T>>
where
    D: DeserializeOwned + Send + Sync,
    T: TryFrom<D, Error = StoreError>,
{
    let mut items = Vec::new();
    while cursor.advance().await.map_err(StoreError::cursor)? {
        let document = cursor.deserialize_current().map_err(StoreError::cursor)?;
        items.push(T::try_from(document)?);
    }
    Ok(items)
}

#[async_trait]
impl ChatStore for MongoChatStore {
    async fn start_session(
        &self,
        settings: &SessionSettings,
    ) -> StoreResult<Box<dyn ChatStoreSession>> {
        let options = SessionOptions::builder()
            .default_transaction_options(
                TransactionOptions::builder()
                    .read_concern(read_concern(settings.read_concern))
                    .build(),
            )
            .build();

        let session = self
            .client
            .start_session()
            .with_options(options)
            .await
            .map_err(classify)?;
        Ok(Box::new(MongoChatSession {
            session,
            chats: self.chats.clone(),
            memberships: self.memberships.clone(),
            commit: CommitState::NotAttempted,
        }))
    }

    async fn find_chat(&self, filter: &ChatFilter) -> StoreResult<Option<Chat>> {
        self.chats
            .find_one(chat_query(filter))
            .await
            .map_err(classify)?
            .map(Chat::try_from)
            .transpose()
    }

    async fn find_chats(&self, filter: &ChatFilter) -> StoreResult<Vec<Chat>> {
        let cursor = self
            .chats
            .find(chat_query(filter))
            .await
            .map_err(classify)?;
        drain_cursor(cursor).await
    }

    async fn find_membership(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
    ) -> StoreResult<Option<ChatMembership>> {
        self.memberships
            .find_one(membership_key(chat_id, user_id))
            .await
            .map_err(classify)?
            .map(ChatMembership::try_from)
            .transpose()
    }

    async fn find_memberships(&self, chat_id: ChatId) -> StoreResult<Vec<ChatMembership>> {
        let cursor = self
            .memberships
            .find(doc! { "chat_id": chat_id.to_string() })
            .await
            .map_err(classify)?;
        drain_cursor(cursor).await
    }

    async fn advance_read_watermark(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>> {
        let update = doc! { "$max": { "max_read_date": at.timestamp_millis() } };
        self.update_membership(chat_id, user_id, update).await
    }

    async fn narrow_window(
        &self,
        chat_id: ChatId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> StoreResult<Option<ChatMembership>> {
        let pipeline = vec![doc! {
            "$set": {
                "end_message_id": {
                    "$min": [
                        "$end_message_id",
                        { "$max": [at.timestamp_millis(), "$start_message_id"] },
                    ],
                },
            },
        }];
        self.update_membership(chat_id, user_id, pipeline).await
    }

    async fn delete_membership(&self, chat_id: ChatId, user_id: &UserId) -> StoreResult<bool> {
        let result = self
            .memberships
            .delete_one(membership_key(chat_id, user_id))
            .await
            .map_err(classify)?;
        Ok(result.deleted_count > 0)
    }
}

/// Outcome of the last commit attempt on a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommitState {
    NotAttempted,
    Failed,
    OutcomeUnknown,
}

/// What an abort request has to do after a commit attempt.
#[derive(Debug)]
enum AbortStep {
    /// Ask the server to roll back.
    ServerAbort,
    /// The server already discarded the transaction.
    AlreadyDiscarded,
    /// Rolling back cannot be promised.
    Refuse(StoreError),
}

impl CommitState {
    /// State recorded after a commit attempt failed with `err`.
    const fn after_failed_commit(err: &StoreError) -> Self {
        if matches!(err, StoreError::CommitOutcomeUnknown(_)) {
            Self::OutcomeUnknown
        } else {
            Self::Failed
        }
    }

    fn abort_step(self) -> AbortStep {
        match self {
            Self::NotAttempted => AbortStep::ServerAbort,
            // The server discards a transaction whose commit was rejected.
            Self::Failed => AbortStep::AlreadyDiscarded,
            Self::OutcomeUnknown => AbortStep::Refuse(StoreError::CommitOutcomeUnknown(Arc::new(
                std::io::Error::other("commit may have been applied; abort is not possible"),
            ))),
        }
    }
}

struct MongoChatSession {
    session: ClientSession,
    chats: Collection<ChatDocument>,
    memberships: Collection<MembershipDocument>,
    commit: CommitState,
}

#[async_trait]
impl ChatStoreSession for MongoChatSession {
    async fn start_transaction(&mut self, settings: &TransactionSettings) -> StoreResult<()> {
        self.commit = CommitState::NotAttempted;
        self.session
            .start_transaction()
            .with_options(transaction_options(settings))
            .await
            .map_err(classify)
    }

    async fn insert_chat(&mut self, chat: &Chat) -> StoreResult<()> {
        self.chats
            .insert_one(ChatDocument::from(chat))
            .session(&mut self.session)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn insert_memberships(&mut self, memberships: &[ChatMembership]) -> StoreResult<()> {
        let documents: Vec<MembershipDocument> =
            memberships.iter().map(MembershipDocument::from).collect();
        self.memberships
            .insert_many(documents)
            .session(&mut self.session)
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn commit_transaction(&mut self) -> StoreResult<()> {
        let outcome = self.session.commit_transaction().await.map_err(classify);
        if let Err(err) = &outcome {
            self.commit = CommitState::after_failed_commit(err);
        }
        outcome
    }

    async fn abort_transaction(&mut self) -> StoreResult<()> {
        match self.commit.abort_step() {
            AbortStep::ServerAbort => self.session.abort_transaction().await.map_err(classify),
            AbortStep::AlreadyDiscarded => Ok(()),
            AbortStep::Refuse(err) => Err(err),
        }
    }
}
