//! Document center: the user's persisted documents, standalone uploads
//! outside any process, and signed-URL retrieval for viewing.

use chrono::Utc;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::config::SIGNED_URL_EXPIRY_SECS;
use crate::error::NavixError;
use crate::gateway::{Identity, Objects, Records};
use crate::models::enums::DocumentStatus;
use crate::models::{DocumentRecord, NewDocument};

/// Full-name sanitizer for standalone uploads: strip diacritics, then
/// replace everything outside `[A-Za-z0-9.-]` with underscores. Unlike the
/// wizard's extension sanitizer, dots and dashes survive.
pub(crate) fn sanitize_file_name(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The user's documents, newest first.
pub async fn list<G: Identity + Records>(
    gateway: &G,
) -> Result<Vec<DocumentRecord>, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;
    gateway.list_documents(user.id).await
}

/// Upload a file outside any process: object first, then the metadata row
/// with no process reference and status `Pendente`. The document name is
/// the file name's stem. Returns the object key.
pub async fn upload<G: Identity + Records + Objects>(
    gateway: &G,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<String, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;

    let ext = match file_name.rsplit('.').next() {
        Some("") | None => "FILE",
        Some(ext) => ext,
    };
    let stem = file_name.split('.').next().unwrap_or(file_name);
    let clean = sanitize_file_name(file_name);
    let key = format!("{}/{}_{clean}", user.id, Utc::now().timestamp_millis());

    gateway.upload(&key, bytes).await?;

    gateway
        .insert_documents(&[NewDocument {
            user_id: user.id,
            process_id: None,
            name: stem.to_string(),
            kind: ext.to_string(),
            status: DocumentStatus::Pending,
            url: key.clone(),
            date: Utc::now(),
        }])
        .await?;

    tracing::info!(key = %key, "Standalone document uploaded");
    Ok(key)
}

/// Signed URL for viewing a stored document. Returns `None` for legacy
/// seed rows whose url carries no object path.
pub async fn open_url<G: Objects>(
    gateway: &G,
    path: &str,
) -> Result<Option<String>, NavixError> {
    if !path.contains('/') {
        return Ok(None);
    }
    let url = gateway.signed_url(path, SIGNED_URL_EXPIRY_SECS).await?;
    Ok(Some(url))
}
