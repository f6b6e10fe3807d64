use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::OperationKind;

/// Status every new process starts in. The column is free text; downstream
/// operators move processes through their own status vocabulary.
pub const STATUS_UNDER_REVIEW: &str = "Em análise";

/// Progress percentage assigned at registration.
pub const INITIAL_PROGRESS: u8 = 10;

/// One customs operation, as stored in the `processes` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Process {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    /// Human-readable code (`IMP-###`/`EXP-###`). Not guaranteed unique.
    pub code: String,
    pub product: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub progress: u8,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for the `processes` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewProcess {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: OperationKind,
    pub code: String,
    pub product: String,
    pub origin: String,
    pub destination: String,
    pub status: String,
    pub progress: u8,
}
