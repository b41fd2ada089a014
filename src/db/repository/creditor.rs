//! Repository for creditor claim operations

use sqlx::PgPool;

use super::super::models::CreditorRow;
use super::super::DbError;
use crate::model::Creditor;

/// Repository for creditor operations
#[derive(Clone)]
pub struct CreditorRepository {
    pool: PgPool,
}

impl CreditorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new creditor
    pub async fn insert(&self, creditor: &Creditor) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO creditors (
                id, client_id, sender_name, sender_address, sender_email,
                reference_number, claim_amount, current_debt_amount,
                amount_source, status, is_representative, actual_creditor,
                source_document_id, response_text, response_received_at,
                created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
            "#,
        )
        .bind(&creditor.id)
        .bind(&creditor.client_id)
        .bind(&creditor.sender_name)
        .bind(&creditor.sender_address)
        .bind(&creditor.sender_email)
        .bind(&creditor.reference_number)
        .bind(creditor.claim_amount)
        .bind(creditor.current_debt_amount)
        .bind(creditor.amount_source.as_str())
        .bind(creditor.status.as_str())
        .bind(creditor.is_representative)
        .bind(&creditor.actual_creditor)
        .bind(&creditor.source_document_id)
        .bind(&creditor.response_text)
        .bind(creditor.response_received_at)
        .bind(creditor.created_at)
        .bind(creditor.updated_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!(id = %creditor.id, "Inserted creditor");
        Ok(())
    }

    /// Get a creditor by ID
    pub async fn get(&self, id: &str) -> Result<Creditor, DbError> {
        let row: CreditorRow = sqlx::query_as("SELECT * FROM creditors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List all creditors of a client, largest claim first
    pub async fn list_by_client(&self, client_id: &str) -> Result<Vec<Creditor>, DbError> {
        let rows: Vec<CreditorRow> = sqlx::query_as(
            r#"
            SELECT * FROM creditors
            WHERE client_id = $1
            ORDER BY COALESCE(current_debt_amount, claim_amount) DESC, sender_name ASC
            "#,
        )
        .bind(client_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Update all mutable columns of a creditor
    pub async fn update(&self, creditor: &Creditor) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE creditors SET
                sender_name = $2,
                sender_address = $3,
                sender_email = $4,
                reference_number = $5,
                claim_amount = $6,
                current_debt_amount = $7,
                amount_source = $8,
                status = $9,
                is_representative = $10,
                actual_creditor = $11,
                response_text = $12,
                response_received_at = $13,
                updated_at = $14
            WHERE id = $1
            "#,
        )
        .bind(&creditor.id)
        .bind(&creditor.sender_name)
        .bind(&creditor.sender_address)
        .bind(&creditor.sender_email)
        .bind(&creditor.reference_number)
        .bind(creditor.claim_amount)
        .bind(creditor.current_debt_amount)
        .bind(creditor.amount_source.as_str())
        .bind(creditor.status.as_str())
        .bind(creditor.is_representative)
        .bind(&creditor.actual_creditor)
        .bind(&creditor.response_text)
        .bind(creditor.response_received_at)
        .bind(creditor.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(creditor.id.clone()));
        }
        Ok(())
    }

    /// Delete a creditor by ID
    pub async fn delete(&self, id: &str) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM creditors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Sum of effective claim amounts for one client
    pub async fn total_claims(&self, client_id: &str) -> Result<f64, DbError> {
        let total: f64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(COALESCE(current_debt_amount, claim_amount)), 0)
            FROM creditors WHERE client_id = $1
            "#,
        )
        .bind(client_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}
