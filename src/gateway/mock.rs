//! In-memory gateway for tests.
//!
//! Plays the role the backend plays in production: holds table rows and
//! object keys in `Mutex`ed vectors, with per-concern failure injection so
//! the partial-write paths of the commit sequence can be exercised.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::error::NavixError;
use crate::models::{
    DocumentRecord, NewDocument, NewNotification, NewProcess, NewTransaction, NotificationRecord,
    Process, Transaction, UserProfile,
};

use super::{AuthUser, Identity, Objects, Records};

#[derive(Default)]
pub struct MockGateway {
    user: Mutex<Option<AuthUser>>,
    processes: Mutex<Vec<Process>>,
    documents: Mutex<Vec<DocumentRecord>>,
    notifications: Mutex<Vec<NotificationRecord>>,
    transactions: Mutex<Vec<Transaction>>,
    profiles: Mutex<Vec<UserProfile>>,
    objects: Mutex<Vec<String>>,
    upload_calls: AtomicUsize,
    fail_processes: AtomicBool,
    fail_documents: AtomicBool,
    fail_notifications: AtomicBool,
    fail_transactions: AtomicBool,
    fail_uploads: AtomicBool,
}

fn locked<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

impl MockGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway with an active session for `user_id`.
    pub fn signed_in(user_id: Uuid) -> Self {
        let gw = Self::new();
        *locked(&gw.user) = Some(AuthUser {
            id: user_id,
            email: format!("{user_id}@example.com"),
        });
        gw
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        locked(&self.profiles).push(profile);
        self
    }

    // ── Failure injection ───────────────────────────────────

    pub fn fail_process_inserts(&self) {
        self.fail_processes.store(true, Ordering::SeqCst);
    }

    pub fn fail_document_inserts(&self) {
        self.fail_documents.store(true, Ordering::SeqCst);
    }

    pub fn fail_notification_inserts(&self) {
        self.fail_notifications.store(true, Ordering::SeqCst);
    }

    pub fn fail_transaction_inserts(&self) {
        self.fail_transactions.store(true, Ordering::SeqCst);
    }

    pub fn fail_uploads(&self) {
        self.fail_uploads.store(true, Ordering::SeqCst);
    }

    // ── State inspection ────────────────────────────────────

    pub fn process_rows(&self) -> Vec<Process> {
        locked(&self.processes).clone()
    }

    pub fn document_rows(&self) -> Vec<DocumentRecord> {
        locked(&self.documents).clone()
    }

    pub fn notification_rows(&self) -> Vec<NotificationRecord> {
        locked(&self.notifications).clone()
    }

    pub fn transaction_rows(&self) -> Vec<Transaction> {
        locked(&self.transactions).clone()
    }

    pub fn profile_rows(&self) -> Vec<UserProfile> {
        locked(&self.profiles).clone()
    }

    pub fn uploaded_keys(&self) -> Vec<String> {
        locked(&self.objects).clone()
    }

    pub fn upload_call_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Identity for MockGateway {
    async fn current_user(&self) -> Result<Option<AuthUser>, NavixError> {
        Ok(locked(&self.user).clone())
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<AuthUser, NavixError> {
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: email.to_string(),
        };
        *locked(&self.user) = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), NavixError> {
        *locked(&self.user) = None;
        Ok(())
    }
}

#[async_trait]
impl Records for MockGateway {
    async fn insert_process(&self, new: &NewProcess) -> Result<Process, NavixError> {
        if self.fail_processes.load(Ordering::SeqCst) {
            return Err(NavixError::RemoteWriteFailure("processes: injected".into()));
        }
        let process = Process {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            kind: new.kind,
            code: new.code.clone(),
            product: new.product.clone(),
            origin: new.origin.clone(),
            destination: new.destination.clone(),
            status: new.status.clone(),
            progress: new.progress,
            created_at: Some(Utc::now()),
        };
        locked(&self.processes).push(process.clone());
        Ok(process)
    }

    async fn insert_documents(&self, new: &[NewDocument]) -> Result<(), NavixError> {
        if self.fail_documents.load(Ordering::SeqCst) {
            return Err(NavixError::RemoteWriteFailure("documents: injected".into()));
        }
        let mut rows = locked(&self.documents);
        for doc in new {
            rows.push(DocumentRecord {
                id: Uuid::new_v4(),
                user_id: doc.user_id,
                process_id: doc.process_id,
                name: doc.name.clone(),
                kind: doc.kind.clone(),
                status: doc.status.as_str().to_string(),
                url: Some(doc.url.clone()),
                date: doc.date,
            });
        }
        Ok(())
    }

    async fn insert_notification(&self, new: &NewNotification) -> Result<(), NavixError> {
        if self.fail_notifications.load(Ordering::SeqCst) {
            return Err(NavixError::RemoteWriteFailure(
                "notifications: injected".into(),
            ));
        }
        locked(&self.notifications).push(NotificationRecord {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            title: new.title.clone(),
            message: new.message.clone(),
            kind: new.kind,
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn insert_transaction(&self, new: &NewTransaction) -> Result<(), NavixError> {
        if self.fail_transactions.load(Ordering::SeqCst) {
            return Err(NavixError::RemoteWriteFailure(
                "transactions: injected".into(),
            ));
        }
        locked(&self.transactions).push(Transaction {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            description: new.description.clone(),
            amount: new.amount,
            kind: new.kind,
            category: new.category.clone(),
            created_at: Some(Utc::now()),
        });
        Ok(())
    }

    async fn list_processes(&self, user_id: Uuid) -> Result<Vec<Process>, NavixError> {
        Ok(locked(&self.processes)
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_documents(&self, user_id: Uuid) -> Result<Vec<DocumentRecord>, NavixError> {
        let mut rows: Vec<DocumentRecord> = locked(&self.documents)
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(rows)
    }

    async fn list_notifications(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<NotificationRecord>, NavixError> {
        let mut rows: Vec<NotificationRecord> = locked(&self.notifications)
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<UserProfile, NavixError> {
        locked(&self.profiles)
            .iter()
            .find(|p| p.id == user_id)
            .cloned()
            .ok_or_else(|| NavixError::RemoteWriteFailure("profiles: no row for user".into()))
    }

    async fn update_balance(&self, user_id: Uuid, balance: f64) -> Result<(), NavixError> {
        let mut profiles = locked(&self.profiles);
        match profiles.iter_mut().find(|p| p.id == user_id) {
            Some(profile) => {
                profile.balance = balance;
                Ok(())
            }
            None => Err(NavixError::RemoteWriteFailure(
                "profiles: no row for user".into(),
            )),
        }
    }
}

#[async_trait]
impl Objects for MockGateway {
    async fn upload(&self, key: &str, _bytes: Vec<u8>) -> Result<(), NavixError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(NavixError::UploadFailure("injected".into()));
        }
        locked(&self.objects).push(key.to_string());
        Ok(())
    }

    async fn signed_url(&self, key: &str, expires_in_secs: u64) -> Result<String, NavixError> {
        Ok(format!(
            "https://mock.storage/{key}?expires={expires_in_secs}"
        ))
    }
}
