//! Domain model for user accounts.
//!
//! The user domain owns the identifier type shared with chats and the
//! disjunctive lookup criteria used by user search.

mod criteria;
mod error;
mod ids;
mod user;

pub use criteria::{UserClause, UserCriteria, UserFilter};
pub use error::UserDomainError;
pub use ids::UserId;
pub use user::User;
