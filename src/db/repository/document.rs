//! Repository for uploaded document operations

use sqlx::PgPool;

use super::super::models::DocumentRow;
use super::super::DbError;
use crate::model::{Classification, Document, ProcessingStatus};

/// Repository for document operations
#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new document
    pub async fn insert(&self, document: &Document) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO documents (
                id, client_id, filename, content_type, size_bytes,
                processing_status, classification, uploaded_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $8)
            "#,
        )
        .bind(&document.id)
        .bind(&document.client_id)
        .bind(&document.filename)
        .bind(&document.content_type)
        .bind(document.size_bytes)
        .bind(document.processing_status.as_str())
        .bind(document.uploaded_at)
        .bind(document.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %document.id, "Inserted document");
        Ok(())
    }

    /// Get a document by ID
    pub async fn get(&self, id: &str) -> Result<Document, DbError> {
        let row: DocumentRow = sqlx::query_as("SELECT * FROM documents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List all documents of a client, newest first
    pub async fn list_by_client(&self, client_id: &str) -> Result<Vec<Document>, DbError> {
        let rows: Vec<DocumentRow> = sqlx::query_as(
            "SELECT * FROM documents WHERE client_id = $1 ORDER BY uploaded_at DESC",
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Set the processing status without touching the classification
    pub async fn set_status(&self, id: &str, status: ProcessingStatus) -> Result<(), DbError> {
        let result = sqlx::query(
            "UPDATE documents SET processing_status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Store a classification result and mark the document completed
    pub async fn set_classification(
        &self,
        id: &str,
        classification: &Classification,
    ) -> Result<(), DbError> {
        let classification_json = serde_json::to_value(classification)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE documents SET
                processing_status = $2,
                classification = $3,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(ProcessingStatus::Completed.as_str())
        .bind(&classification_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Delete a document by ID
    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }
}
