use serde::{Deserialize, Serialize};

use crate::models::enums::{DocumentStatus, OperationKind};

/// The fixed set of document kinds a process registration asks for,
/// in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentSlot {
    CommercialInvoice,
    PackingList,
    BillOfLading,
}

impl DocumentSlot {
    /// All required slots, in the order the upload step lists them.
    pub fn all() -> &'static [DocumentSlot] {
        &[
            Self::CommercialInvoice,
            Self::PackingList,
            Self::BillOfLading,
        ]
    }

    /// Display name, also the persisted document name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CommercialInvoice => "Commercial Invoice",
            Self::PackingList => "Packing List",
            Self::BillOfLading => "Bill of Lading",
        }
    }

    /// Slot name with spaces replaced for use inside object keys.
    pub fn key_segment(&self) -> String {
        self.as_str().replace(' ', "_")
    }
}

impl std::fmt::Display for DocumentSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A file already uploaded to the object store during this wizard session,
/// not yet linked to a persisted process. Promoted to a document record at
/// commit; simply forgotten if the wizard is abandoned (the uploaded object
/// is not rolled back).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StagedDocument {
    /// Random base-36 token; only used to key UI lists.
    pub id: String,
    pub slot: DocumentSlot,
    /// File extension type (e.g. "pdf").
    pub kind: String,
    /// Display date of the attachment.
    pub date: String,
    /// Fixed to `Sent` while staged.
    pub status: DocumentStatus,
    /// Object-store path the bytes were uploaded under.
    pub url: String,
    /// Human-readable size, e.g. "1.24 MB".
    pub size: String,
}

/// The in-progress state of one wizard session. Never persisted itself;
/// only the records derived from it at commit are. One draft per session,
/// single writer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardDraft {
    pub operation: OperationKind,
    pub origin_country: String,
    pub destination_country: String,
    pub product_name: String,
    /// Fiscal classification code (NCM), free text.
    pub fiscal_code: String,
    staged: Vec<StagedDocument>,
    /// Cached advisory text, if any was fetched this session.
    pub advisory: Option<String>,
}

impl WizardDraft {
    pub fn new(operation: OperationKind) -> Self {
        Self {
            operation,
            origin_country: String::new(),
            destination_country: String::new(),
            product_name: String::new(),
            fiscal_code: String::new(),
            staged: Vec::new(),
            advisory: None,
        }
    }

    pub fn staged(&self) -> &[StagedDocument] {
        &self.staged
    }

    /// Stage a document, replacing any earlier attachment for the same
    /// slot. Last write wins per slot.
    pub fn stage(&mut self, doc: StagedDocument) {
        self.staged.retain(|d| d.slot != doc.slot);
        self.staged.push(doc);
    }

    pub fn is_staged(&self, slot: DocumentSlot) -> bool {
        self.staged.iter().any(|d| d.slot == slot)
    }
}
