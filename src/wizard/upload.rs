//! Document staging: upload a file to the object store and record it in the
//! draft. The staged collection is only touched after the upload succeeds,
//! so a failed attempt leaves the draft exactly as it was.

use chrono::Utc;
use rand::Rng;
use unicode_normalization::UnicodeNormalization;

use crate::error::NavixError;
use crate::gateway::{Identity, Objects};
use crate::models::enums::DocumentStatus;

use super::draft::{DocumentSlot, StagedDocument, WizardDraft};

const BYTES_PER_MB: f64 = 1_048_576.0;

/// Strip diacritics (NFD decomposition), then every character outside
/// `[A-Za-z0-9]`.
pub(crate) fn sanitize_extension(raw: &str) -> String {
    raw.nfd().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Extension of a file name; `pdf` when the name carries none.
pub(crate) fn raw_extension(file_name: &str) -> &str {
    match file_name.rsplit('.').next() {
        Some("") | None => "pdf",
        Some(ext) => ext,
    }
}

/// Remote object key: `{user_id}/{epoch_ms}_{slot}.{ext}`.
pub(crate) fn object_key(
    user_id: &str,
    timestamp_ms: i64,
    slot: DocumentSlot,
    ext: &str,
) -> String {
    format!("{user_id}/{timestamp_ms}_{}.{ext}", slot.key_segment())
}

/// Random base-36 token, the staged-document id.
fn base36_token(len: usize) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Attach a file to `slot`: resolve the identity, upload the raw bytes
/// under a sanitized object key, then stage the resulting record in the
/// draft (replacing any earlier attachment for the same slot).
///
/// Nothing here serializes concurrent attachments; the draft's `&mut`
/// receiver is the single-writer discipline.
pub async fn attach_file<G: Identity + Objects>(
    gateway: &G,
    draft: &mut WizardDraft,
    slot: DocumentSlot,
    file_name: &str,
    bytes: Vec<u8>,
) -> Result<StagedDocument, NavixError> {
    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;

    let ext = sanitize_extension(raw_extension(file_name));
    let byte_len = bytes.len();
    let key = object_key(
        &user.id.to_string(),
        Utc::now().timestamp_millis(),
        slot,
        &ext,
    );

    gateway.upload(&key, bytes).await?;

    let doc = StagedDocument {
        id: base36_token(9),
        slot,
        kind: if ext.is_empty() { "PDF".into() } else { ext },
        date: Utc::now().format("%Y-%m-%d").to_string(),
        status: DocumentStatus::Sent,
        url: key,
        size: format!("{:.2} MB", byte_len as f64 / BYTES_PER_MB),
    };
    draft.stage(doc.clone());

    tracing::info!(slot = %slot, key = %doc.url, size = %doc.size, "Document staged");
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockGateway;
    use crate::models::enums::OperationKind;
    use uuid::Uuid;

    #[test]
    fn extension_sanitization_strips_diacritics_then_symbols() {
        assert_eq!(sanitize_extension("pdf"), "pdf");
        assert_eq!(sanitize_extension("PDF"), "PDF");
        assert_eq!(sanitize_extension("p-d f!"), "pdf");
        // "é" decomposes to "e" + combining mark; the mark is dropped.
        assert_eq!(sanitize_extension("pdé"), "pde");
        assert_eq!(sanitize_extension("###"), "");
    }

    #[test]
    fn missing_extension_defaults_to_pdf() {
        assert_eq!(raw_extension("scan"), "scan");
        assert_eq!(raw_extension("scan."), "pdf");
        assert_eq!(raw_extension("invoice.final.pdf"), "pdf");
    }

    #[test]
    fn object_key_shape() {
        let key = object_key("u1", 1700000000000, DocumentSlot::CommercialInvoice, "pdf");
        assert_eq!(key, "u1/1700000000000_Commercial_Invoice.pdf");
    }

    #[tokio::test]
    async fn attach_uploads_and_stages() {
        let user_id = Uuid::new_v4();
        let gateway = MockGateway::signed_in(user_id);
        let mut draft = WizardDraft::new(OperationKind::Export);

        let doc = attach_file(
            &gateway,
            &mut draft,
            DocumentSlot::PackingList,
            "lista de carga.pdf",
            vec![0u8; 2 * 1_048_576],
        )
        .await
        .unwrap();

        assert_eq!(doc.kind, "pdf");
        assert_eq!(doc.size, "2.00 MB");
        assert_eq!(doc.status, DocumentStatus::Sent);
        assert!(doc.url.starts_with(&format!("{user_id}/")));
        assert!(doc.url.ends_with("_Packing_List.pdf"));
        assert_eq!(doc.id.len(), 9);

        assert_eq!(draft.staged().len(), 1);
        assert_eq!(gateway.uploaded_keys(), vec![doc.url.clone()]);
    }

    #[tokio::test]
    async fn attach_without_session_fails_and_stages_nothing() {
        let gateway = MockGateway::new();
        let mut draft = WizardDraft::new(OperationKind::Import);

        let result = attach_file(
            &gateway,
            &mut draft,
            DocumentSlot::BillOfLading,
            "bl.pdf",
            vec![1, 2, 3],
        )
        .await;

        assert!(matches!(result, Err(NavixError::AuthRequired)));
        assert!(draft.staged().is_empty());
        assert_eq!(gateway.upload_call_count(), 0);
    }

    #[tokio::test]
    async fn failed_upload_leaves_draft_unchanged() {
        let gateway = MockGateway::signed_in(Uuid::new_v4());
        gateway.fail_uploads();
        let mut draft = WizardDraft::new(OperationKind::Import);

        let result = attach_file(
            &gateway,
            &mut draft,
            DocumentSlot::CommercialInvoice,
            "fatura.pdf",
            vec![1, 2, 3],
        )
        .await;

        assert!(matches!(result, Err(NavixError::UploadFailure(_))));
        assert!(draft.staged().is_empty());
    }

    #[tokio::test]
    async fn reattaching_a_slot_replaces_the_staged_entry() {
        let gateway = MockGateway::signed_in(Uuid::new_v4());
        let mut draft = WizardDraft::new(OperationKind::Export);

        let first = attach_file(
            &gateway,
            &mut draft,
            DocumentSlot::CommercialInvoice,
            "v1.pdf",
            vec![0u8; 100],
        )
        .await
        .unwrap();
        let second = attach_file(
            &gateway,
            &mut draft,
            DocumentSlot::CommercialInvoice,
            "v2.png",
            vec![0u8; 200],
        )
        .await
        .unwrap();

        assert_eq!(draft.staged().len(), 1);
        assert_eq!(draft.staged()[0].id, second.id);
        assert_ne!(first.id, second.id);
        assert_eq!(draft.staged()[0].kind, "png");
        // Both uploads happened; the first object is simply orphaned.
        assert_eq!(gateway.uploaded_keys().len(), 2);
    }
}
