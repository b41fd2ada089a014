//! Uploaded document domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Processing state of an uploaded document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    /// Awaiting the external AI classification result
    Processing,
    Completed,
    Failed,
}

impl ProcessingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingStatus::Processing => "processing",
            ProcessingStatus::Completed => "completed",
            ProcessingStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "processing" => Some(ProcessingStatus::Processing),
            "completed" => Some(ProcessingStatus::Completed),
            "failed" => Some(ProcessingStatus::Failed),
            _ => None,
        }
    }
}

/// Creditor fields extracted from a document by the classification step
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExtractedCreditor {
    pub sender_name: String,
    pub sender_address: Option<String>,
    pub sender_email: Option<String>,
    pub reference_number: Option<String>,
    pub claim_amount: Option<f64>,
    /// Set when the sender is a representative (lawyer, collection agency)
    /// acting for the actual creditor
    #[serde(default)]
    pub is_representative: bool,
    pub actual_creditor: Option<String>,
}

/// Outcome of the external AI classification step
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Classification {
    pub is_creditor_document: bool,
    /// Confidence score in `0.0..=1.0`
    pub confidence: f64,
    pub manual_review_required: bool,
    pub extracted: Option<ExtractedCreditor>,
    pub classified_at: DateTime<Utc>,
}

/// An uploaded creditor document belonging to exactly one client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Document {
    pub id: String,
    pub client_id: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub processing_status: ProcessingStatus,
    pub classification: Option<Classification>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
