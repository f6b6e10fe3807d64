use serde::{Deserialize, Serialize};

use async_trait::async_trait;

use crate::config::ConfigError;
use crate::error::NavixError;

use super::AdvisoryClient;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for classification advice.
pub const CLASSIFICATION_MODEL: &str = "gemini-3-pro-preview";

/// Model used for the document-summary call.
pub const SUMMARY_MODEL: &str = "gemini-3-flash-preview";

/// HTTP client for the generative endpoint. One request per call, no
/// streaming, no conversation state retained between calls.
pub struct GeminiClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            base_url: GEMINI_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Read the key from `NAVIX_ADVISORY_API_KEY`.
    pub fn from_env(model: &str) -> Result<Self, NavixError> {
        let api_key = std::env::var("NAVIX_ADVISORY_API_KEY")
            .map_err(|_| ConfigError::MissingVar("NAVIX_ADVISORY_API_KEY"))?;
        Ok(Self::new(&api_key, model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Request body for `models/{model}:generateContent`
#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response body from `models/{model}:generateContent`
#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait]
impl AdvisoryClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, NavixError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(|e| NavixError::AdvisoryUnavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NavixError::AdvisoryUnavailable(format!(
                "HTTP {status}: {body}"
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| NavixError::AdvisoryUnavailable(e.to_string()))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_text_concatenates_parts() {
        let raw = serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "NCM 0901.21.00" }, { "text": " — café torrado" }] }
            }]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .map(|c| {
                c.content
                    .parts
                    .into_iter()
                    .map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();
        assert_eq!(text, "NCM 0901.21.00 — café torrado");
    }

    #[test]
    fn empty_candidates_yield_empty_text() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.candidates.is_empty());
    }

    #[test]
    fn client_satisfies_advisory_trait() {
        fn _accepts_advisory<C: AdvisoryClient>(_c: &C) {}
        let _: fn(&GeminiClient) = _accepts_advisory;
    }
}
