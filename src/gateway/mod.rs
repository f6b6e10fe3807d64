//! Remote data gateway: the seam between the client core and the backend.
//!
//! All persistence, authentication, file storage and row-level authorization
//! live on the other side of these traits. `supabase::SupabaseGateway` is the
//! production implementation; `mock::MockGateway` backs the test suites.

pub mod mock;
pub mod supabase;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::NavixError;
use crate::models::{
    DocumentRecord, NewDocument, NewNotification, NewProcess, NewTransaction, NotificationRecord,
    Process, UserProfile,
};

pub use mock::MockGateway;
pub use supabase::SupabaseGateway;

/// The authenticated identity behind the current session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Session-based identity service.
#[async_trait]
pub trait Identity: Send + Sync {
    /// The current user, or `None` when no session is active.
    async fn current_user(&self) -> Result<Option<AuthUser>, NavixError>;

    /// Password sign-in. Establishes the session used by every other call.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, NavixError>;

    /// Drop the active session.
    async fn sign_out(&self) -> Result<(), NavixError>;
}

/// Typed reads and writes over the backend's record tables. Every table
/// enforces owner-only row access keyed by the auth identity.
#[async_trait]
pub trait Records: Send + Sync {
    async fn insert_process(&self, new: &NewProcess) -> Result<Process, NavixError>;

    /// Bulk insert; all rows land or the call fails as a whole.
    async fn insert_documents(&self, new: &[NewDocument]) -> Result<(), NavixError>;

    async fn insert_notification(&self, new: &NewNotification) -> Result<(), NavixError>;

    async fn insert_transaction(&self, new: &NewTransaction) -> Result<(), NavixError>;

    async fn list_processes(&self, user_id: Uuid) -> Result<Vec<Process>, NavixError>;

    /// Newest first.
    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, NavixError>;

    /// Newest first.
    async fn list_notifications(&self, user_id: Uuid)
        -> Result<Vec<NotificationRecord>, NavixError>;

    async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, NavixError>;

    async fn update_balance(&self, user_id: Uuid, balance: f64) -> Result<(), NavixError>;
}

/// Binary object store for uploaded files.
#[async_trait]
pub trait Objects: Send + Sync {
    /// Upload raw bytes under `key`. Keys are `{user_id}/{timestamp}_{name}`.
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<(), NavixError>;

    /// Time-limited signed URL for reading an object.
    async fn signed_url(&self, key: &str, expires_in_secs: u64) -> Result<String, NavixError>;
}

/// The full gateway surface. Blanket-implemented for anything providing
/// all three concerns.
pub trait Gateway: Identity + Records + Objects {}

impl<T: Identity + Records + Objects> Gateway for T {}
