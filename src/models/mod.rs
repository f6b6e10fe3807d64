pub mod document;
pub mod enums;
pub mod notification;
pub mod process;
pub mod profile;
pub mod transaction;

pub use document::{DocumentRecord, NewDocument};
pub use enums::{DocumentStatus, NotificationKind, OperationKind, TransactionKind};
pub use notification::{NewNotification, NotificationRecord};
pub use process::{NewProcess, Process};
pub use profile::UserProfile;
pub use transaction::{NewTransaction, Transaction};

/// Errors while mapping backend rows into model types.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("Invalid value '{value}' for {field}")]
    InvalidEnum { field: String, value: String },
}
