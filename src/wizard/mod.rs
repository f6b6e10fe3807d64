//! Process registration wizard: the 4-step flow that collects operation
//! metadata, stages document uploads, shows a static financial estimate and
//! commits the draft into persisted records.

pub mod commit;
pub mod draft;
pub mod step;
pub mod upload;

pub use commit::{finish, generate_process_code, CommitGate, CommitReceipt, CommitWarning};
pub use draft::{DocumentSlot, StagedDocument, WizardDraft};
pub use step::WizardStep;
pub use upload::attach_file;

use crate::advisory::{self, AdvisoryClient};
use crate::error::NavixError;
use crate::gateway::{Identity, Objects, Records};
use crate::models::enums::OperationKind;

/// The read-only figures shown on the estimate step. Static for now;
/// quoting is a backend concern this client does not own.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinancialEstimate {
    pub cargo_value: f64,
    pub international_freight: f64,
    pub estimated_taxes: f64,
}

impl FinancialEstimate {
    pub fn standard() -> Self {
        Self {
            cargo_value: 10_000.0,
            international_freight: 1_200.0,
            estimated_taxes: 850.0,
        }
    }

    pub fn total(&self) -> f64 {
        self.cargo_value + self.international_freight + self.estimated_taxes
    }
}

/// One in-progress wizard session: the current step, the draft it owns,
/// and the single-flight commit gate. Dropped (draft and all) when the
/// user navigates away or the commit succeeds.
pub struct WizardSession {
    step: WizardStep,
    draft: WizardDraft,
    gate: CommitGate,
}

impl WizardSession {
    pub fn new(operation: OperationKind) -> Self {
        Self {
            step: WizardStep::FIRST,
            draft: WizardDraft::new(operation),
            gate: CommitGate::new(),
        }
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn next(&mut self) {
        self.step = self.step.next();
    }

    pub fn back(&mut self) {
        self.step = self.step.back();
    }

    pub fn draft(&self) -> &WizardDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut WizardDraft {
        &mut self.draft
    }

    /// Fetch classification advice for the draft's product and cache it.
    /// A draft with no product name is left untouched, as is the cache
    /// when nothing new was produced.
    pub async fn request_advisory(&mut self, client: &dyn AdvisoryClient) -> Option<&str> {
        if let Some(text) =
            advisory::classification_advice(client, &self.draft.product_name).await
        {
            self.draft.advisory = Some(text);
        }
        self.draft.advisory.as_deref()
    }

    /// Stage a file for one of the required document slots.
    pub async fn attach<G: Identity + Objects>(
        &mut self,
        gateway: &G,
        slot: DocumentSlot,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<StagedDocument, NavixError> {
        upload::attach_file(gateway, &mut self.draft, slot, file_name, bytes).await
    }

    /// Commit the draft. Only available from the summary step; a second
    /// call while one is in flight is rejected with `CommitInProgress`.
    /// On success the caller is expected to drop the session.
    pub async fn finish<G: Identity + Records>(
        &self,
        gateway: &G,
    ) -> Result<CommitReceipt, NavixError> {
        if !self.step.is_final() {
            return Err(NavixError::FinishUnavailable);
        }
        commit::finish(gateway, &self.gate, &self.draft).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisory::MockAdvisoryClient;
    use crate::gateway::MockGateway;
    use uuid::Uuid;

    #[test]
    fn standard_estimate_totals() {
        let estimate = FinancialEstimate::standard();
        assert_eq!(estimate.total(), 12_050.0);
    }

    #[test]
    fn session_starts_at_details() {
        let session = WizardSession::new(OperationKind::Import);
        assert_eq!(session.step(), WizardStep::Details);
        assert_eq!(session.draft().operation, OperationKind::Import);
    }

    #[tokio::test]
    async fn finish_is_rejected_before_summary() {
        let gateway = MockGateway::signed_in(Uuid::new_v4());
        let session = WizardSession::new(OperationKind::Export);
        let result = session.finish(&gateway).await;
        assert!(matches!(result, Err(NavixError::FinishUnavailable)));
        assert!(gateway.process_rows().is_empty());
    }

    #[tokio::test]
    async fn full_session_flow() {
        let gateway = MockGateway::signed_in(Uuid::new_v4());
        let mut session = WizardSession::new(OperationKind::Export);

        session.draft_mut().product_name = "Coffee".into();
        session.draft_mut().origin_country = "BR".into();
        session.draft_mut().destination_country = "US".into();
        session.next();

        session
            .attach(
                &gateway,
                DocumentSlot::CommercialInvoice,
                "fatura.pdf",
                vec![0u8; 512],
            )
            .await
            .unwrap();
        session.next();
        session.next();
        assert!(session.step().is_final());

        let receipt = session.finish(&gateway).await.unwrap();
        assert!(receipt.warnings.is_empty());
        assert_eq!(receipt.documents_committed, 1);
        assert_eq!(gateway.document_rows().len(), 1);
    }

    #[tokio::test]
    async fn advisory_is_cached_on_the_draft() {
        let client = MockAdvisoryClient::replying("0901.21.00 é o código mais provável.");
        let mut session = WizardSession::new(OperationKind::Export);
        session.draft_mut().product_name = "Coffee".into();

        let advice = session.request_advisory(&client).await;
        assert_eq!(advice, Some("0901.21.00 é o código mais provável."));
        assert_eq!(
            session.draft().advisory.as_deref(),
            Some("0901.21.00 é o código mais provável.")
        );
    }

    #[tokio::test]
    async fn advisory_with_empty_product_leaves_cache_alone() {
        let client = MockAdvisoryClient::replying("should never be fetched");
        let mut session = WizardSession::new(OperationKind::Export);
        session.draft_mut().advisory = Some("previous advice".into());

        let advice = session.request_advisory(&client).await;
        assert_eq!(advice, Some("previous advice"));
        assert_eq!(client.call_count(), 0);
    }
}
