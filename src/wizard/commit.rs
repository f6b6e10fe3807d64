//! The finish sequence: turn a draft into persisted records.
//!
//! Three writes, in order, with no cross-step atomicity: the process row,
//! the document metadata rows, the notification. A failure before the
//! process insert aborts everything; a failure after it degrades to a
//! warning on the receipt, because the process already exists and is not
//! rolled back.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use rand::Rng;

use crate::error::NavixError;
use crate::gateway::{Identity, Records};
use crate::models::enums::{DocumentStatus, NotificationKind, OperationKind};
use crate::models::process::{INITIAL_PROGRESS, STATUS_UNDER_REVIEW};
use crate::models::{NewDocument, NewNotification, NewProcess, Process};

use super::draft::WizardDraft;

/// Human-readable process code: `IMP-###`/`EXP-###` with a uniform-random
/// suffix in [0, 999]. Collisions are possible and not checked; the code
/// is a display handle, not an identifier.
pub fn generate_process_code(kind: OperationKind) -> String {
    let suffix = rand::thread_rng().gen_range(0..1000);
    format!("{}-{}", kind.code_prefix(), suffix)
}

/// Single-flight guard for one wizard session. A second finish invoked
/// while one is in flight is rejected instead of double-submitting.
#[derive(Debug, Default)]
pub struct CommitGate {
    in_flight: AtomicBool,
}

impl CommitGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn begin(&self) -> Result<CommitPermit<'_>, NavixError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(NavixError::CommitInProgress);
        }
        Ok(CommitPermit { gate: self })
    }
}

/// Held for the duration of one finish attempt; releases the gate on drop.
#[derive(Debug)]
struct CommitPermit<'a> {
    gate: &'a CommitGate,
}

impl Drop for CommitPermit<'_> {
    fn drop(&mut self) {
        self.gate.in_flight.store(false, Ordering::SeqCst);
    }
}

/// A commit step that failed after the process row was already persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitWarning {
    /// The process exists, but its document metadata was not written.
    DocumentMetadataFailed(String),
    /// The process exists, but no notification was emitted.
    NotificationFailed(String),
}

/// Outcome of a successful finish. `warnings` is non-empty on partial
/// success; the caller decides whether to log and continue or to show them.
#[derive(Debug)]
pub struct CommitReceipt {
    pub process: Process,
    pub documents_committed: usize,
    pub warnings: Vec<CommitWarning>,
}

/// Execute the finish sequence for `draft`.
pub async fn finish<G: Identity + Records>(
    gateway: &G,
    gate: &CommitGate,
    draft: &WizardDraft,
) -> Result<CommitReceipt, NavixError> {
    let _permit = gate.begin()?;

    let user = gateway
        .current_user()
        .await?
        .ok_or(NavixError::AuthRequired)?;

    let code = generate_process_code(draft.operation);
    let process = gateway
        .insert_process(&NewProcess {
            user_id: user.id,
            kind: draft.operation,
            code: code.clone(),
            product: draft.product_name.clone(),
            origin: draft.origin_country.clone(),
            destination: draft.destination_country.clone(),
            status: STATUS_UNDER_REVIEW.into(),
            progress: INITIAL_PROGRESS,
        })
        .await?;

    let mut warnings = Vec::new();
    let mut documents_committed = 0;

    if !draft.staged().is_empty() {
        let now = Utc::now();
        let rows: Vec<NewDocument> = draft
            .staged()
            .iter()
            .map(|doc| NewDocument {
                user_id: user.id,
                process_id: Some(process.id),
                name: doc.slot.as_str().to_string(),
                kind: doc.kind.clone(),
                status: DocumentStatus::Pending,
                url: doc.url.clone(),
                date: now,
            })
            .collect();

        match gateway.insert_documents(&rows).await {
            Ok(()) => documents_committed = rows.len(),
            Err(e) => {
                // The process row is already committed; this is partial
                // success, not a failure of the whole sequence.
                tracing::warn!(process_id = %process.id, error = %e, "Document metadata insert failed");
                warnings.push(CommitWarning::DocumentMetadataFailed(e.to_string()));
            }
        }
    }

    let notification = NewNotification {
        user_id: user.id,
        title: "Novo Processo Criado".into(),
        message: format!(
            "O processo {code} de {} foi iniciado com sucesso.",
            draft.product_name
        ),
        kind: NotificationKind::Success,
    };
    if let Err(e) = gateway.insert_notification(&notification).await {
        tracing::warn!(process_id = %process.id, error = %e, "Notification insert failed");
        warnings.push(CommitWarning::NotificationFailed(e.to_string()));
    }

    tracing::info!(
        process_id = %process.id,
        code = %process.code,
        documents = documents_committed,
        warnings = warnings.len(),
        "Process registered"
    );

    Ok(CommitReceipt {
        process,
        documents_committed,
        warnings,
    })
}
