//! Repository for client case file operations

use sqlx::PgPool;

use super::super::models::{
    ClientRow, ClientStats, ListClientsQuery, PaginatedClients, StatusCount,
};
use super::super::{map_insert_error, DbError};
use crate::model::{Client, FinancialData, SettlementPlan, StatusHistoryEntry, WorkflowStatus};

const DEFAULT_PAGE_SIZE: u32 = 20;

/// Clamp pagination inputs and compute the row offset.
///
/// The offset is computed in u64 so absurd page numbers cannot overflow.
fn page_bounds(page: Option<u32>, page_size: Option<u32>) -> (u32, u32, u64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).min(100);
    let offset = (page as u64 - 1) * page_size as u64;
    (page, page_size, offset)
}

/// Repository for client operations
#[derive(Clone)]
pub struct ClientRepository {
    pool: PgPool,
}

impl ClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new client
    pub async fn insert(&self, client: &Client) -> Result<(), DbError> {
        let status_history = serde_json::to_value(&client.status_history)
            .map_err(|e| DbError::Serialization(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, aktenzeichen, first_name, last_name, email, phone, address,
                workflow_status, first_payment_received, financial_data,
                settlement_plan, status_history, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NULL, NULL, $10, $11, $12)
            "#,
        )
        .bind(&client.id)
        .bind(&client.aktenzeichen)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.workflow_status.as_str())
        .bind(client.first_payment_received)
        .bind(&status_history)
        .bind(client.created_at)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &client.aktenzeichen))?;

        tracing::debug!(id = %client.id, "Inserted client");
        Ok(())
    }

    /// Get a client by id or aktenzeichen
    pub async fn get(&self, client_ref: &str) -> Result<Client, DbError> {
        let row: ClientRow = sqlx::query_as(
            r#"
            SELECT * FROM clients WHERE id = $1 OR aktenzeichen = $1
            "#,
        )
        .bind(client_ref)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(client_ref.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List clients with pagination and filters
    pub async fn list(&self, query: &ListClientsQuery) -> Result<PaginatedClients, DbError> {
        let (page, page_size, offset) = page_bounds(query.page, query.page_size);

        // Build dynamic query
        let mut conditions = Vec::new();
        let mut params: Vec<String> = Vec::new();

        if let Some(ref status) = query.status {
            params.push(status.clone());
            conditions.push(format!("workflow_status = ${}", params.len()));
        }

        if let Some(ref search) = query.search {
            params.push(format!("%{}%", search));
            let n = params.len();
            conditions.push(format!(
                "(first_name ILIKE ${n} OR last_name ILIKE ${n} OR email ILIKE ${n} OR aktenzeichen ILIKE ${n})"
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        // Get total count
        let count_query = format!("SELECT COUNT(*) as count FROM clients {}", where_clause);

        let total_count: i64 = {
            let mut q = sqlx::query_scalar(&count_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_one(&self.pool).await?
        };

        // Get clients
        let select_query = format!(
            r#"
            SELECT * FROM clients
            {}
            ORDER BY created_at DESC
            LIMIT {} OFFSET {}
            "#,
            where_clause, page_size, offset
        );

        let rows: Vec<ClientRow> = {
            let mut q = sqlx::query_as(&select_query);
            for param in &params {
                q = q.bind(param);
            }
            q.fetch_all(&self.pool).await?
        };

        let clients: Vec<Client> = rows
            .into_iter()
            .filter_map(|row| row.into_domain().ok())
            .collect();

        let total_pages = ((total_count as f64) / (page_size as f64)).ceil() as u32;

        Ok(PaginatedClients {
            clients,
            page,
            page_size,
            total_count,
            total_pages,
        })
    }

    /// Update the profile columns of a client
    pub async fn update_profile(&self, client: &Client) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE clients SET
                first_name = $2,
                last_name = $3,
                email = $4,
                phone = $5,
                address = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(&client.id)
        .bind(&client.first_name)
        .bind(&client.last_name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(&client.address)
        .bind(client.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(client.id.clone()));
        }
        Ok(())
    }

    /// Change the workflow status and append the history entry atomically
    pub async fn update_status(
        &self,
        id: &str,
        status: WorkflowStatus,
        entry: &StatusHistoryEntry,
    ) -> Result<(), DbError> {
        let entry_json =
            serde_json::to_value(entry).map_err(|e| DbError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                workflow_status = $2,
                status_history = status_history || $3::jsonb,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(&entry_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Record the first payment and move the case to admin review
    pub async fn mark_payment(&self, id: &str, entry: &StatusHistoryEntry) -> Result<(), DbError> {
        let entry_json =
            serde_json::to_value(entry).map_err(|e| DbError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                first_payment_received = TRUE,
                workflow_status = $2,
                status_history = status_history || $3::jsonb,
                updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(WorkflowStatus::AdminReview.as_str())
        .bind(&entry_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Store the calculated financial data
    pub async fn set_financial_data(
        &self,
        id: &str,
        financial: &FinancialData,
    ) -> Result<(), DbError> {
        let financial_json =
            serde_json::to_value(financial).map_err(|e| DbError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE clients SET financial_data = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&financial_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Store the generated settlement plan
    pub async fn set_settlement_plan(
        &self,
        id: &str,
        plan: &SettlementPlan,
    ) -> Result<(), DbError> {
        let plan_json =
            serde_json::to_value(plan).map_err(|e| DbError::Serialization(e.to_string()))?;

        let result = sqlx::query(
            "UPDATE clients SET settlement_plan = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(&plan_json)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Dashboard statistics across all clients, documents and creditors
    pub async fn stats(&self) -> Result<ClientStats, DbError> {
        let total_clients: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clients")
            .fetch_one(&self.pool)
            .await?;

        let status_rows: Vec<(String, i64)> = sqlx::query_as(
            "SELECT workflow_status, COUNT(*) FROM clients GROUP BY workflow_status",
        )
        .fetch_all(&self.pool)
        .await?;

        let total_documents: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents")
            .fetch_one(&self.pool)
            .await?;

        let total_creditors: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM creditors")
            .fetch_one(&self.pool)
            .await?;

        let total_debt: f64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(COALESCE(current_debt_amount, claim_amount)), 0) FROM creditors",
        )
        .fetch_one(&self.pool)
        .await?;

        let by_status = status_rows
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();

        Ok(ClientStats {
            total_clients,
            by_status,
            total_documents,
            total_creditors,
            total_debt,
        })
    }

    /// Delete all clients; documents and creditors cascade.
    /// Returns the number of clients removed.
    pub async fn delete_all(&self) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM clients").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_defaults_and_caps() {
        assert_eq!(page_bounds(None, None), (1, DEFAULT_PAGE_SIZE, 0));
        assert_eq!(page_bounds(Some(0), Some(500)), (1, 100, 0));
        assert_eq!(page_bounds(Some(3), Some(50)), (3, 50, 100));
    }

    #[test]
    fn page_bounds_survives_huge_page_numbers() {
        let (page, page_size, offset) = page_bounds(Some(u32::MAX), Some(100));
        assert_eq!(page, u32::MAX);
        assert_eq!(offset, (u32::MAX as u64 - 1) * page_size as u64);
    }
}
