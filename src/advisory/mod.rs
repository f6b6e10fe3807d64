//! Advisory text service: generative suggestions for tariff classification.
//!
//! Strictly best-effort: the wizard must never block or fail on this path.
//! Every failure degrades to a fixed fallback string; callers only ever see
//! text, never an error.

pub mod gemini;
pub mod prompts;

use async_trait::async_trait;

use crate::error::NavixError;

pub use gemini::GeminiClient;

/// Shown when the service fails in any way (network, quota, malformed
/// response). The user is told to seek a human instead.
pub const CLASSIFICATION_FALLBACK: &str =
    "Consulte um despachante para validação técnica da NCM.";

/// Shown when the service responds but produces no text.
pub const EMPTY_RESPONSE_NOTICE: &str = "Não foi possível gerar a análise.";

/// Fallback for the document-summary call.
pub const DOCUMENT_SUMMARY_FALLBACK: &str = "Erro ao analisar documentos.";

/// One-shot text generation. No streaming, no conversation state.
#[async_trait]
pub trait AdvisoryClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, NavixError>;
}

/// Classification-code suggestions and risk notes for a product.
///
/// Empty product name is a no-op: no request is issued and `None` is
/// returned so the caller leaves any cached advisory untouched.
pub async fn classification_advice(
    client: &dyn AdvisoryClient,
    product_name: &str,
) -> Option<String> {
    if product_name.is_empty() {
        return None;
    }
    match client.generate(&prompts::classification_prompt(product_name)).await {
        Ok(text) if !text.is_empty() => Some(text),
        Ok(_) => Some(EMPTY_RESPONSE_NOTICE.to_string()),
        Err(e) => {
            tracing::debug!(error = %e, "Advisory call failed, degrading to fallback");
            Some(CLASSIFICATION_FALLBACK.to_string())
        }
    }
}

/// One-sentence gap summary for a set of attached document names.
pub async fn missing_documents_summary(
    client: &dyn AdvisoryClient,
    doc_names: &[String],
) -> String {
    match client.generate(&prompts::document_summary_prompt(doc_names)).await {
        Ok(text) => text,
        Err(e) => {
            tracing::debug!(error = %e, "Document summary call failed, degrading to fallback");
            DOCUMENT_SUMMARY_FALLBACK.to_string()
        }
    }
}

/// Scriptable advisory client for tests: canned responses or injected
/// failure, with a call counter.
pub struct MockAdvisoryClient {
    response: Result<String, String>,
    calls: std::sync::atomic::AtomicUsize,
}

impl MockAdvisoryClient {
    pub fn replying(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            response: Err(reason.to_string()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[async_trait]
impl AdvisoryClient for MockAdvisoryClient {
    async fn generate(&self, _prompt: &str) -> Result<String, NavixError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(reason) => Err(NavixError::AdvisoryUnavailable(reason.clone())),
        }
    }
}
