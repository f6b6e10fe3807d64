use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account profile row. Keyed by the auth identity id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub email: String,
    #[serde(default)]
    pub company_name: Option<String>,
    pub balance: f64,
}
