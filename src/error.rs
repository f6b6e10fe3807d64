//! Error taxonomy for every remote operation the client core performs.
//!
//! The backend rejects unauthorized rows with a generic permission error;
//! `classify_*` rewrites the known row-security signatures into an
//! operator-actionable message instead of echoing the raw backend text.

use crate::config::ConfigError;

/// Backend error code emitted when a row-security policy rejects a write.
const RLS_ERROR_CODE: &str = "42501";

/// Substring present in the backend's row-security rejection messages.
const RLS_ERROR_NEEDLE: &str = "row-level security";

/// Errors surfaced by the client core.
#[derive(Debug, thiserror::Error)]
pub enum NavixError {
    /// No authenticated user session; the operation requires one.
    #[error("No authenticated user session")]
    AuthRequired,

    /// A row or object access rule rejected the call.
    #[error("Permission denied: {hint}")]
    PermissionDenied { hint: String },

    /// A record insert or update was rejected for a non-permission reason.
    #[error("Remote write failed: {0}")]
    RemoteWriteFailure(String),

    /// The object store rejected an upload.
    #[error("Upload failed: {0}")]
    UploadFailure(String),

    /// The advisory text service could not produce a response.
    /// Never shown to the user as an error; callers degrade to fallback text.
    #[error("Advisory service unavailable: {0}")]
    AdvisoryUnavailable(String),

    /// A finish request is already in flight for this wizard session.
    #[error("A commit is already in progress for this wizard session")]
    CommitInProgress,

    /// Finish was invoked before the wizard reached the summary step.
    #[error("Finish is only available from the summary step")]
    FinishUnavailable,

    /// The wallet balance would go negative.
    #[error("Insufficient balance")]
    InsufficientBalance,

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network-level failure before the backend produced a response.
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Whether a backend rejection matches the known row-security signatures.
fn is_rls_rejection(code: Option<&str>, message: &str) -> bool {
    code == Some(RLS_ERROR_CODE) || message.contains(RLS_ERROR_NEEDLE)
}

impl NavixError {
    /// Classify a rejected table write. Row-security rejections become
    /// `PermissionDenied` pointing at the missing policy setup.
    pub(crate) fn classify_table_write(table: &str, code: Option<&str>, message: &str) -> Self {
        if is_rls_rejection(code, message) {
            Self::PermissionDenied {
                hint: format!(
                    "write to '{table}' rejected by row security; \
                     the owner access policies for the Navix tables have not been created"
                ),
            }
        } else {
            Self::RemoteWriteFailure(format!("{table}: {message}"))
        }
    }

    /// Classify a rejected table read.
    pub(crate) fn classify_table_read(table: &str, code: Option<&str>, message: &str) -> Self {
        if is_rls_rejection(code, message) {
            Self::PermissionDenied {
                hint: format!(
                    "read from '{table}' rejected by row security; \
                     the owner access policies for the Navix tables have not been created"
                ),
            }
        } else {
            Self::RemoteWriteFailure(format!("{table}: {message}"))
        }
    }

    /// Classify a rejected object-store write. Row-security rejections become
    /// `PermissionDenied` pointing at the missing bucket policies.
    pub(crate) fn classify_storage_write(code: Option<&str>, message: &str) -> Self {
        if is_rls_rejection(code, message) {
            Self::PermissionDenied {
                hint: format!(
                    "upload to bucket '{}' rejected by row security; \
                     the storage policies for the bucket have not been created",
                    crate::config::STORAGE_BUCKET
                ),
            }
        } else {
            Self::UploadFailure(message.to_string())
        }
    }
}
