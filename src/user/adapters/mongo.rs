//! `MongoDB` repository for user accounts.

use crate::database::USER_COLLECTION;
use crate::user::{
    domain::{User, UserClause, UserCriteria, UserFilter, UserId},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use mongodb::bson::{Document, doc};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, IndexModel};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    id: String,
    #[serde(default)]
    firstname: String,
    #[serde(default)]
    lastname: String,
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
}

impl UserDocument {
    fn from_user(user: &User, id: &UserId) -> Self {
        Self {
            id: id.as_str().to_owned(),
            firstname: user.first_name().to_owned(),
            lastname: user.last_name().to_owned(),
            username: user.username().to_owned(),
            email: user.email().to_owned(),
        }
    }

    fn into_user(self) -> UserRepositoryResult<User> {
        let id = UserId::new(self.id).map_err(UserRepositoryError::internal)?;
        Ok(User::new(self.username, self.email)
            .with_id(id)
            .with_names(self.firstname, self.lastname))
    }
}

fn user_query(filter: &UserFilter) -> Document {
    let mut clauses: Vec<Document> = filter
        .clauses()
        .iter()
        .map(|clause| match clause {
            UserClause::Id(id) => doc! { "id": id.as_str() },
            UserClause::Username(username) => doc! { "username": username },
            UserClause::Email(email) => doc! { "email": email },
        })
        .collect();
    if clauses.len() == 1
        && let Some(only) = clauses.pop()
    {
        return only;
    }
    doc! { "$or": clauses }
}

/// User repository backed by the `user` collection.
#[derive(Debug, Clone)]
pub struct MongoUserRepository {
    users: Collection<UserDocument>,
}

impl MongoUserRepository {
    /// Creates a repository over `database` using an already connected
    /// client.
    #[must_use]
    pub fn new(client: &Client, database: &str) -> Self {
        Self {
            users: client.database(database).collection(USER_COLLECTION),
        }
    }

    /// Creates the unique index on user identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`UserRepositoryError::Internal`] when index creation fails.
    pub async fn ensure_indexes(&self) -> UserRepositoryResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.users
            .create_index(index)
            .await
            .map_err(UserRepositoryError::internal)?;
        Ok(())
    }

    async fn exists_matching(&self, query: Document) -> UserRepositoryResult<bool> {
        let found = self
            .users
            .find_one(query)
            .await
            .map_err(UserRepositoryError::internal)?;
        Ok(found.is_some())
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn create(&self, user: User) -> UserRepositoryResult<User> {
        user.validate_email()?;
        let stored = user.ensure_id();
        let id = stored.id().ok_or_else(|| {
            UserRepositoryError::InvalidArgument("user identifier is required".to_owned())
        })?;
        self.users
            .insert_one(UserDocument::from_user(&stored, id))
            .await
            .map_err(UserRepositoryError::internal)?;
        Ok(stored)
    }

    async fn find(&self, criteria: UserCriteria) -> UserRepositoryResult<User> {
        let filter = criteria
            .into_filter()
            .ok_or(UserRepositoryError::CannotFind)?;
        self.users
            .find_one(user_query(&filter))
            .await
            .map_err(UserRepositoryError::internal)?
            .ok_or(UserRepositoryError::NotFound)?
            .into_user()
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let id = user.id().ok_or_else(|| {
            UserRepositoryError::InvalidArgument("user identifier is required".to_owned())
        })?;
        let document = UserDocument::from_user(user, id);
        self.users
            .update_one(
                doc! { "id": id.as_str() },
                doc! { "$set": {
                    "firstname": document.firstname,
                    "lastname": document.lastname,
                    "username": document.username,
                    "email": document.email,
                } },
            )
            .upsert(true)
            .await
            .map_err(UserRepositoryError::internal)?;
        Ok(())
    }

    async fn exists(&self, id: &str) -> UserRepositoryResult<bool> {
        let wanted = UserId::new(id)?;
        self.exists_matching(doc! { "id": wanted.as_str() }).await
    }

    async fn exists_username(&self, username: &str) -> UserRepositoryResult<bool> {
        if username.trim().is_empty() {
            return Err(UserRepositoryError::InvalidArgument(
                "username must not be empty".to_owned(),
            ));
        }
        self.exists_matching(doc! { "username": username }).await
    }
}
