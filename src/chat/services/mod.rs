//! Application services for chat creation and lookup.

mod repository;
mod settings;
mod transaction;

pub use repository::ChatRepositoryService;
pub use settings::ChatRepositorySettings;
pub use transaction::TransactionCoordinator;
