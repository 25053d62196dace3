//! Translation of [`ChatFilter`] into query documents.

use crate::chat::domain::{ChatClause, ChatFilter, ChatId};
use crate::user::domain::UserId;
use mongodb::bson::{Document, doc};

/// Builds the query document for a chat filter.
///
/// A single clause is emitted bare; several are wrapped in `$and`.
pub(super) fn chat_query(filter: &ChatFilter) -> Document {
    let mut clauses: Vec<Document> = filter.clauses().iter().map(clause_query).collect();
    if clauses.len() == 1
        && let Some(only) = clauses.pop()
    {
        return only;
    }
    doc! { "$and": clauses }
}

fn clause_query(clause: &ChatClause) -> Document {
    match clause {
        ChatClause::Id(id) => doc! { "id": id.to_string() },
        ChatClause::Owner(owner) => doc! { "owner_id": owner.as_str() },
        ChatClause::ContainsAll(users) => {
            let ids: Vec<&str> = users.iter().map(UserId::as_str).collect();
            doc! { "participants": { "$all": ids } }
        }
        ChatClause::Kind(kind) => doc! { "type": kind.as_str() },
        ChatClause::AnyOf(clauses) => {
            let nested: Vec<Document> = clauses.iter().map(clause_query).collect();
            doc! { "$or": nested }
        }
    }
}

/// Query document addressing one membership.
pub(super) fn membership_key(chat_id: ChatId, user_id: &UserId) -> Document {
    doc! { "chat_id": chat_id.to_string(), "user_id": user_id.as_str() }
}
