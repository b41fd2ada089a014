//! Document registration and AI classification results
//!
//! Documents are registered at upload time and classified asynchronously by
//! an external AI step that calls back with the result. Confident creditor
//! classifications automatically create a pending creditor record; everything
//! else is queued for manual review.

use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::repository::{ClientRepository, CreditorRepository, DocumentRepository};
use crate::db::DbError;
use crate::model::{
    AmountSource, Classification, Creditor, CreditorStatus, Document, ExtractedCreditor,
    ProcessingStatus,
};

/// Classifications below this confidence always go to manual review
const REVIEW_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Claim amount used when a creditor document carries no readable amount
const FALLBACK_CLAIM_AMOUNT: f64 = 100.0;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("document is already classified")]
    AlreadyClassified,

    #[error("document has no classification to correct")]
    NotClassified,

    #[error("{0}")]
    Validation(String),
}

/// Classification callback payload from the AI processing step
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClassificationResult {
    pub success: bool,
    #[serde(default)]
    pub is_creditor_document: bool,
    #[serde(default)]
    pub confidence: f64,
    pub extracted: Option<ExtractedCreditor>,
}

/// Manual correction of a reviewed classification
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClassificationCorrection {
    pub is_creditor_document: bool,
    pub extracted: Option<ExtractedCreditor>,
}

/// Build a creditor record from a confident creditor classification.
///
/// Returns `None` when the document is not a creditor document, still needs
/// manual review, or no sender name was extracted. A missing claim amount
/// falls back to a nominal value flagged as such.
pub fn creditor_from_classification(
    document: &Document,
    classification: &Classification,
) -> Option<Creditor> {
    if !classification.is_creditor_document || classification.manual_review_required {
        return None;
    }
    let extracted = classification.extracted.as_ref()?;
    if extracted.sender_name.trim().is_empty() {
        return None;
    }

    let (claim_amount, amount_source) = match extracted.claim_amount {
        Some(amount) if amount > 0.0 => (amount, AmountSource::Extracted),
        _ => (FALLBACK_CLAIM_AMOUNT, AmountSource::Fallback),
    };

    let now = Utc::now();
    Some(Creditor {
        id: Uuid::new_v4().to_string(),
        client_id: document.client_id.clone(),
        sender_name: extracted.sender_name.clone(),
        sender_address: extracted.sender_address.clone(),
        sender_email: extracted.sender_email.clone(),
        reference_number: extracted.reference_number.clone(),
        claim_amount,
        current_debt_amount: None,
        amount_source,
        status: CreditorStatus::Pending,
        is_representative: extracted.is_representative,
        actual_creditor: extracted.actual_creditor.clone(),
        source_document_id: Some(document.id.clone()),
        response_text: None,
        response_received_at: None,
        created_at: now,
        updated_at: now,
    })
}

pub struct DocumentService {
    clients: ClientRepository,
    documents: DocumentRepository,
    creditors: CreditorRepository,
}

impl DocumentService {
    pub fn new(
        clients: ClientRepository,
        documents: DocumentRepository,
        creditors: CreditorRepository,
    ) -> Self {
        Self {
            clients,
            documents,
            creditors,
        }
    }

    /// Register an uploaded document; classification happens asynchronously
    pub async fn register_upload(
        &self,
        client_ref: &str,
        filename: &str,
        content_type: Option<String>,
        size_bytes: Option<i64>,
    ) -> Result<Document, DocumentError> {
        if filename.trim().is_empty() {
            return Err(DocumentError::Validation("filename must not be empty".into()));
        }
        let client = self.clients.get(client_ref).await?;

        let now = Utc::now();
        let document = Document {
            id: Uuid::new_v4().to_string(),
            client_id: client.id,
            filename: filename.to_string(),
            content_type,
            size_bytes,
            processing_status: ProcessingStatus::Processing,
            classification: None,
            uploaded_at: now,
            updated_at: now,
        };
        self.documents.insert(&document).await?;

        tracing::info!(
            document_id = %document.id,
            client_id = %document.client_id,
            filename = %document.filename,
            "Document registered"
        );
        Ok(document)
    }

    pub async fn get(&self, document_id: &str) -> Result<Document, DocumentError> {
        Ok(self.documents.get(document_id).await?)
    }

    pub async fn list_for_client(&self, client_ref: &str) -> Result<Vec<Document>, DocumentError> {
        let client = self.clients.get(client_ref).await?;
        Ok(self.documents.list_by_client(&client.id).await?)
    }

    /// Apply the AI classification callback.
    ///
    /// A failed classification marks the document failed. A successful one
    /// stores the result and, when confident, derives a pending creditor.
    pub async fn apply_classification(
        &self,
        document_id: &str,
        result: ClassificationResult,
    ) -> Result<Document, DocumentError> {
        let document = self.documents.get(document_id).await?;
        if document.classification.is_some() {
            return Err(DocumentError::AlreadyClassified);
        }

        if !result.success {
            self.documents
                .set_status(document_id, ProcessingStatus::Failed)
                .await?;
            tracing::warn!(document_id, "Document classification failed");
            return self.get(document_id).await;
        }

        let manual_review_required =
            !result.is_creditor_document || result.confidence < REVIEW_CONFIDENCE_THRESHOLD;

        let classification = Classification {
            is_creditor_document: result.is_creditor_document,
            confidence: result.confidence,
            manual_review_required,
            extracted: result.extracted,
            classified_at: Utc::now(),
        };
        self.documents
            .set_classification(document_id, &classification)
            .await?;

        if let Some(creditor) = creditor_from_classification(&document, &classification) {
            self.creditors.insert(&creditor).await?;
            tracing::info!(
                document_id,
                creditor_id = %creditor.id,
                sender = %creditor.sender_name,
                "Creditor derived from document"
            );
        }

        tracing::info!(
            document_id,
            is_creditor = classification.is_creditor_document,
            confidence = classification.confidence,
            manual_review = classification.manual_review_required,
            "Document classified"
        );
        self.get(document_id).await
    }

    /// Apply a manual review correction, clearing the review flag
    pub async fn correct_classification(
        &self,
        document_id: &str,
        correction: ClassificationCorrection,
        reviewed_by: &str,
    ) -> Result<Document, DocumentError> {
        let document = self.documents.get(document_id).await?;
        let previous = document
            .classification
            .as_ref()
            .ok_or(DocumentError::NotClassified)?;

        let classification = Classification {
            is_creditor_document: correction.is_creditor_document,
            confidence: 1.0,
            manual_review_required: false,
            extracted: correction.extracted.or_else(|| previous.extracted.clone()),
            classified_at: Utc::now(),
        };
        self.documents
            .set_classification(document_id, &classification)
            .await?;

        // The review decision may turn a non-creditor document into a
        // creditor one; derive the record now
        if previous.manual_review_required {
            if let Some(creditor) = creditor_from_classification(&document, &classification) {
                self.creditors.insert(&creditor).await?;
            }
        }

        tracing::info!(document_id, reviewed_by, "Classification corrected");
        self.get(document_id).await
    }

    pub async fn delete(&self, document_id: &str) -> Result<(), DocumentError> {
        self.documents.delete(document_id).await?;
        tracing::info!(document_id, "Document deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document() -> Document {
        let now = Utc::now();
        Document {
            id: "doc-1".to_string(),
            client_id: "client-1".to_string(),
            filename: "forderung.pdf".to_string(),
            content_type: Some("application/pdf".to_string()),
            size_bytes: Some(52_000),
            processing_status: ProcessingStatus::Processing,
            classification: None,
            uploaded_at: now,
            updated_at: now,
        }
    }

    fn classification(extracted: Option<ExtractedCreditor>) -> Classification {
        Classification {
            is_creditor_document: true,
            confidence: 0.95,
            manual_review_required: false,
            extracted,
            classified_at: Utc::now(),
        }
    }

    fn extracted(name: &str, amount: Option<f64>) -> ExtractedCreditor {
        ExtractedCreditor {
            sender_name: name.to_string(),
            sender_address: Some("Musterstr. 1, 10115 Berlin".to_string()),
            sender_email: None,
            reference_number: Some("AZ-2025-117".to_string()),
            claim_amount: amount,
            is_representative: false,
            actual_creditor: None,
        }
    }

    #[test]
    fn confident_creditor_document_yields_creditor() {
        let creditor =
            creditor_from_classification(&document(), &classification(Some(extracted("Sparkasse", Some(1234.56)))))
                .unwrap();

        assert_eq!(creditor.client_id, "client-1");
        assert_eq!(creditor.sender_name, "Sparkasse");
        assert_eq!(creditor.claim_amount, 1234.56);
        assert_eq!(creditor.amount_source, AmountSource::Extracted);
        assert_eq!(creditor.status, CreditorStatus::Pending);
        assert_eq!(creditor.source_document_id.as_deref(), Some("doc-1"));
    }

    #[test]
    fn missing_amount_uses_fallback() {
        let creditor =
            creditor_from_classification(&document(), &classification(Some(extracted("Telekom", None))))
                .unwrap();

        assert_eq!(creditor.claim_amount, FALLBACK_CLAIM_AMOUNT);
        assert_eq!(creditor.amount_source, AmountSource::Fallback);
    }

    #[test]
    fn manual_review_blocks_creditor_creation() {
        let mut c = classification(Some(extracted("Sparkasse", Some(100.0))));
        c.manual_review_required = true;
        assert!(creditor_from_classification(&document(), &c).is_none());
    }

    #[test]
    fn non_creditor_document_yields_nothing() {
        let mut c = classification(Some(extracted("Sparkasse", Some(100.0))));
        c.is_creditor_document = false;
        assert!(creditor_from_classification(&document(), &c).is_none());
    }

    #[test]
    fn missing_sender_name_yields_nothing() {
        assert!(creditor_from_classification(&document(), &classification(None)).is_none());
        assert!(
            creditor_from_classification(&document(), &classification(Some(extracted("  ", None))))
                .is_none()
        );
    }
}
