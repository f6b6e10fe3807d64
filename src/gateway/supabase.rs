//! REST implementation of the remote data gateway.
//!
//! Speaks the backend's three surfaces: password-grant auth (`/auth/v1`),
//! record tables (`/rest/v1`, owner-filtered), and the object store
//! (`/storage/v1`, single bucket). The bearer session lives in an `RwLock`
//! and is never held across a suspension point. No timeouts are imposed
//! here; the transport's defaults apply.

use std::sync::RwLock;

use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use async_trait::async_trait;

use crate::config::{GatewayConfig, STORAGE_BUCKET};
use crate::error::NavixError;
use crate::models::{
    DocumentRecord, NewDocument, NewNotification, NewProcess, NewTransaction, NotificationRecord,
    Process, UserProfile,
};

use super::{AuthUser, Identity, Objects, Records};

// ═══════════════════════════════════════════════════════════
// Session & wire types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone)]
struct AuthSession {
    access_token: String,
    user: AuthUser,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    user: TokenUser,
}

#[derive(Deserialize)]
struct TokenUser {
    id: Uuid,
    email: String,
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

/// A non-2xx backend response, reduced to the fields the error taxonomy
/// classifies on.
#[derive(Debug)]
struct RemoteRejection {
    code: Option<String>,
    message: String,
}

/// Parse a rejection body. The three backend surfaces use different error
/// envelopes (`message`/`code`, `msg`, `error_description`), so this reads
/// whichever is present and falls back to the HTTP status line.
fn parse_rejection(status: reqwest::StatusCode, body: &str) -> RemoteRejection {
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or(serde_json::Value::Null);
    let code = parsed
        .get("code")
        .and_then(|v| v.as_str())
        .map(String::from);
    let message = ["message", "msg", "error_description", "error"]
        .iter()
        .find_map(|k| parsed.get(*k).and_then(|v| v.as_str()))
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {status}"));
    RemoteRejection { code, message }
}

// ═══════════════════════════════════════════════════════════
// Gateway
// ═══════════════════════════════════════════════════════════

/// Production gateway over the backend's REST surface.
pub struct SupabaseGateway {
    config: GatewayConfig,
    client: reqwest::Client,
    session: RwLock<Option<AuthSession>>,
}

impl SupabaseGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            session: RwLock::new(None),
        }
    }

    /// Build from `NAVIX_BACKEND_URL` / `NAVIX_BACKEND_ANON_KEY`.
    pub fn from_env() -> Result<Self, NavixError> {
        Ok(Self::new(GatewayConfig::from_env()?))
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.config.base_url)
    }

    fn storage_url(&self, path: &str) -> String {
        format!("{}/storage/v1/{path}", self.config.base_url)
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.config.base_url)
    }

    /// Bearer value for authorized calls: the session token when signed in,
    /// the publishable key otherwise.
    fn bearer(&self) -> String {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.access_token.clone()))
            .unwrap_or_else(|| self.config.anon_key.clone())
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.config.anon_key.as_str())
            .bearer_auth(self.bearer())
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, NavixError> {
        req.send()
            .await
            .map_err(|e| NavixError::Transport(e.to_string()))
    }

    /// Drain a failed table response into a classified error.
    async fn table_rejection(
        resp: reqwest::Response,
        table: &str,
        write: bool,
    ) -> NavixError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let rejection = parse_rejection(status, &body);
        if write {
            NavixError::classify_table_write(table, rejection.code.as_deref(), &rejection.message)
        } else {
            NavixError::classify_table_read(table, rejection.code.as_deref(), &rejection.message)
        }
    }

    /// POST one or more rows into a table, discarding the representation.
    async fn insert_rows<T: serde::Serialize + ?Sized>(
        &self,
        table: &str,
        rows: &T,
    ) -> Result<(), NavixError> {
        let resp = self
            .send(
                self.authed(self.client.post(self.rest_url(table)))
                    .header("Prefer", "return=minimal")
                    .json(rows),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(Self::table_rejection(resp, table, true).await);
        }
        Ok(())
    }

    async fn select_rows<T: serde::de::DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, NavixError> {
        let resp = self
            .send(self.authed(self.client.get(self.rest_url(table)).query(query)))
            .await?;
        if !resp.status().is_success() {
            return Err(Self::table_rejection(resp, table, false).await);
        }
        resp.json::<Vec<T>>()
            .await
            .map_err(|e| NavixError::Transport(format!("{table}: {e}")))
    }
}

/// Join a backend-relative signed path onto the storage base.
fn absolute_signed_url(base_url: &str, relative: &str) -> String {
    format!(
        "{}/storage/v1/{}",
        base_url,
        relative.trim_start_matches('/')
    )
}

#[async_trait]
impl Identity for SupabaseGateway {
    async fn current_user(&self) -> Result<Option<AuthUser>, NavixError> {
        Ok(self
            .session
            .read()
            .ok()
            .and_then(|guard| guard.as_ref().map(|s| s.user.clone())))
    }

    /// Password grant. A rejected grant leaves no active identity, so it
    /// surfaces as `AuthRequired`; the backend's own message is logged.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, NavixError> {
        let resp = self
            .send(
                self.client
                    .post(self.auth_url("token"))
                    .query(&[("grant_type", "password")])
                    .header("apikey", self.config.anon_key.as_str())
                    .json(&json!({ "email": email, "password": password })),
            )
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let rejection = parse_rejection(status, &body);
            tracing::debug!(message = %rejection.message, "Sign-in rejected");
            return Err(NavixError::AuthRequired);
        }

        let token: TokenResponse = resp
            .json()
            .await
            .map_err(|e| NavixError::Transport(e.to_string()))?;
        let user = AuthUser {
            id: token.user.id,
            email: token.user.email,
        };
        if let Ok(mut guard) = self.session.write() {
            *guard = Some(AuthSession {
                access_token: token.access_token,
                user: user.clone(),
            });
        }
        tracing::info!(user_id = %user.id, "Signed in");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), NavixError> {
        let token = self
            .session
            .read()
            .ok()
            .and_then(|g| g.as_ref().map(|s| s.access_token.clone()));

        // Drop the local session first; the remote revocation is best-effort.
        if let Ok(mut guard) = self.session.write() {
            *guard = None;
        }

        if let Some(token) = token {
            let result = self
                .client
                .post(self.auth_url("logout"))
                .header("apikey", self.config.anon_key.as_str())
                .bearer_auth(token)
                .send()
                .await;
            if let Err(e) = result {
                tracing::debug!(error = %e, "Remote sign-out failed after local session drop");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Records for SupabaseGateway {
    async fn insert_process(&self, new: &NewProcess) -> Result<Process, NavixError> {
        let resp = self
            .send(
                self.authed(self.client.post(self.rest_url("processes")))
                    .header("Prefer", "return=representation")
                    .json(&[new]),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(Self::table_rejection(resp, "processes", true).await);
        }
        let mut rows: Vec<Process> = resp
            .json()
            .await
            .map_err(|e| NavixError::Transport(format!("processes: {e}")))?;
        rows.pop()
            .ok_or_else(|| NavixError::RemoteWriteFailure("processes: empty insert response".into()))
    }

    async fn insert_documents(&self, new: &[NewDocument]) -> Result<(), NavixError> {
        self.insert_rows("documents", new).await
    }

    async fn insert_notification(&self, new: &NewNotification) -> Result<(), NavixError> {
        self.insert_rows("notifications", &[new]).await
    }

    async fn insert_transaction(&self, new: &NewTransaction) -> Result<(), NavixError> {
        self.insert_rows("transactions", &[new]).await
    }

    async fn list_processes(&self, user_id: Uuid) -> Result<Vec<Process>, NavixError> {
        self.select_rows(
            "processes",
            &[
                ("select", "*".into()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, NavixError> {
        self.select_rows(
            "documents",
            &[
                ("select", "*".into()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "date.desc".into()),
            ],
        )
        .await
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationRecord>, NavixError> {
        self.select_rows(
            "notifications",
            &[
                ("select", "*".into()),
                ("user_id", format!("eq.{user_id}")),
                ("order", "created_at.desc".into()),
            ],
        )
        .await
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, NavixError> {
        let mut rows: Vec<UserProfile> = self
            .select_rows(
                "profiles",
                &[("select", "*".into()), ("id", format!("eq.{user_id}"))],
            )
            .await?;
        rows.pop()
            .ok_or_else(|| NavixError::RemoteWriteFailure("profiles: no row for user".into()))
    }

    async fn update_balance(&self, user_id: Uuid, balance: f64) -> Result<(), NavixError> {
        let resp = self
            .send(
                self.authed(
                    self.client
                        .patch(self.rest_url("profiles"))
                        .query(&[("id", format!("eq.{user_id}"))]),
                )
                .json(&json!({ "balance": balance })),
            )
            .await?;
        if !resp.status().is_success() {
            return Err(Self::table_rejection(resp, "profiles", true).await);
        }
        Ok(())
    }
}

#[async_trait]
impl Objects for SupabaseGateway {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<(), NavixError> {
        let content_type = mime_guess::from_path(key).first_or_octet_stream();
        let url = self.storage_url(&format!("object/{STORAGE_BUCKET}/{key}"));
        let resp = self
            .send(
                self.authed(self.client.post(url))
                    .header("Content-Type", content_type.as_ref())
                    .body(bytes),
            )
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let rejection = parse_rejection(status, &body);
            return Err(NavixError::classify_storage_write(
                rejection.code.as_deref(),
                &rejection.message,
            ));
        }
        tracing::debug!(key, "Object uploaded");
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in_secs: u64) -> Result<String, NavixError> {
        let url = self.storage_url(&format!("object/sign/{STORAGE_BUCKET}/{key}"));
        let resp = self
            .send(
                self.authed(self.client.post(url))
                    .json(&json!({ "expiresIn": expires_in_secs })),
            )
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let rejection = parse_rejection(status, &body);
            return Err(NavixError::classify_storage_write(
                rejection.code.as_deref(),
                &rejection.message,
            ));
        }
        let signed: SignedUrlResponse = resp
            .json()
            .await
            .map_err(|e| NavixError::Transport(e.to_string()))?;
        Ok(absolute_signed_url(&self.config.base_url, &signed.signed_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gateway() -> SupabaseGateway {
        SupabaseGateway::new(GatewayConfig::new("https://example.supabase.co", "anon-key"))
    }

    #[test]
    fn bearer_falls_back_to_anon_key() {
        let gw = gateway();
        assert_eq!(gw.bearer(), "anon-key");
    }

    #[tokio::test]
    async fn current_user_is_none_without_session() {
        let gw = gateway();
        assert!(gw.current_user().await.unwrap().is_none());
    }

    #[test]
    fn url_builders() {
        let gw = gateway();
        assert_eq!(
            gw.rest_url("processes"),
            "https://example.supabase.co/rest/v1/processes"
        );
        assert_eq!(
            gw.storage_url("object/navix/u1/f.pdf"),
            "https://example.supabase.co/storage/v1/object/navix/u1/f.pdf"
        );
        assert_eq!(
            gw.auth_url("token"),
            "https://example.supabase.co/auth/v1/token"
        );
    }

    #[test]
    fn rejection_parses_postgrest_envelope() {
        let r = parse_rejection(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"code":"42501","message":"new row violates row-level security policy"}"#,
        );
        assert_eq!(r.code.as_deref(), Some("42501"));
        assert!(r.message.contains("row-level security"));
    }

    #[test]
    fn rejection_parses_auth_envelope() {
        let r = parse_rejection(
            reqwest::StatusCode::BAD_REQUEST,
            r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#,
        );
        assert_eq!(r.message, "Invalid login credentials");
    }

    #[test]
    fn rejection_falls_back_to_status_line() {
        let r = parse_rejection(reqwest::StatusCode::BAD_GATEWAY, "upstream down");
        assert!(r.message.contains("502"));
        assert!(r.code.is_none());
    }

    #[test]
    fn signed_url_joins_relative_path() {
        let url = absolute_signed_url(
            "https://example.supabase.co",
            "/object/sign/navix/u1/f.pdf?token=abc",
        );
        assert_eq!(
            url,
            "https://example.supabase.co/storage/v1/object/sign/navix/u1/f.pdf?token=abc"
        );
    }
}
