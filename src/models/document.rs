use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::DocumentStatus;

/// One persisted document, as stored in the `documents` table.
///
/// `process_id` is `None` for documents uploaded outside a process
/// (the standalone documents screen). The record never points back from
/// the process side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(default)]
    pub process_id: Option<Uuid>,
    pub name: String,
    /// File extension type, free text (e.g. "pdf").
    #[serde(rename = "type")]
    pub kind: String,
    pub status: String,
    /// Object-store path, `{user_id}/{timestamp}_{name}`. Legacy seed rows
    /// may carry values without the path separator.
    #[serde(default)]
    pub url: Option<String>,
    pub date: DateTime<Utc>,
}

/// Insert payload for the `documents` table.
#[derive(Debug, Clone, Serialize)]
pub struct NewDocument {
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_id: Option<Uuid>,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub status: DocumentStatus,
    pub url: String,
    pub date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_wire_shape() {
        let new = NewDocument {
            user_id: Uuid::nil(),
            process_id: None,
            name: "Commercial Invoice".into(),
            kind: "pdf".into(),
            status: DocumentStatus::Pending,
            url: "u1/123_Commercial_Invoice.pdf".into(),
            date: Utc::now(),
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["status"], "Pendente");
        // Standalone uploads omit the process reference entirely.
        assert!(json.get("process_id").is_none());
    }

    #[test]
    fn process_scoped_document_carries_reference() {
        let pid = Uuid::new_v4();
        let new = NewDocument {
            user_id: Uuid::nil(),
            process_id: Some(pid),
            name: "Packing List".into(),
            kind: "pdf".into(),
            status: DocumentStatus::Pending,
            url: "u1/123_Packing_List.pdf".into(),
            date: Utc::now(),
        };
        let json = serde_json::to_value(&new).unwrap();
        assert_eq!(json["process_id"], pid.to_string());
    }
}
