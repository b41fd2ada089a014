//! Database models for clients, documents, creditors and agents

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::model::{
    Agent, AgentRole, AmountSource, Classification, Client, Creditor, CreditorStatus, Document,
    FinancialData, ProcessingStatus, SettlementPlan, StatusHistoryEntry, WorkflowStatus,
};

/// Database representation of a client case file
#[derive(Debug, Clone, FromRow)]
pub struct ClientRow {
    pub id: String,
    pub aktenzeichen: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub workflow_status: String,
    pub first_payment_received: bool,
    pub financial_data: Option<serde_json::Value>,
    pub settlement_plan: Option<serde_json::Value>,
    pub status_history: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClientRow {
    /// Convert database row to domain model
    pub fn into_domain(self) -> Result<Client, String> {
        let workflow_status = WorkflowStatus::parse(&self.workflow_status)
            .ok_or_else(|| format!("Unknown workflow status: {}", self.workflow_status))?;

        let financial_data: Option<FinancialData> = match self.financial_data {
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| format!("Invalid financial data: {}", e))?,
            ),
            None => None,
        };

        let settlement_plan: Option<SettlementPlan> = match self.settlement_plan {
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| format!("Invalid settlement plan: {}", e))?,
            ),
            None => None,
        };

        let status_history: Vec<StatusHistoryEntry> = serde_json::from_value(self.status_history)
            .map_err(|e| format!("Invalid status history: {}", e))?;

        Ok(Client {
            id: self.id,
            aktenzeichen: self.aktenzeichen,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            workflow_status,
            first_payment_received: self.first_payment_received,
            financial_data,
            settlement_plan,
            status_history,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database representation of an uploaded document
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: String,
    pub client_id: String,
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
    pub processing_status: String,
    pub classification: Option<serde_json::Value>,
    pub uploaded_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    pub fn into_domain(self) -> Result<Document, String> {
        let processing_status = ProcessingStatus::parse(&self.processing_status)
            .ok_or_else(|| format!("Unknown processing status: {}", self.processing_status))?;

        let classification: Option<Classification> = match self.classification {
            Some(value) => Some(
                serde_json::from_value(value)
                    .map_err(|e| format!("Invalid classification: {}", e))?,
            ),
            None => None,
        };

        Ok(Document {
            id: self.id,
            client_id: self.client_id,
            filename: self.filename,
            content_type: self.content_type,
            size_bytes: self.size_bytes,
            processing_status,
            classification,
            uploaded_at: self.uploaded_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database representation of a creditor claim
#[derive(Debug, Clone, FromRow)]
pub struct CreditorRow {
    pub id: String,
    pub client_id: String,
    pub sender_name: String,
    pub sender_address: Option<String>,
    pub sender_email: Option<String>,
    pub reference_number: Option<String>,
    pub claim_amount: f64,
    pub current_debt_amount: Option<f64>,
    pub amount_source: String,
    pub status: String,
    pub is_representative: bool,
    pub actual_creditor: Option<String>,
    pub source_document_id: Option<String>,
    pub response_text: Option<String>,
    pub response_received_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CreditorRow {
    pub fn into_domain(self) -> Result<Creditor, String> {
        let amount_source = AmountSource::parse(&self.amount_source)
            .ok_or_else(|| format!("Unknown amount source: {}", self.amount_source))?;
        let status = CreditorStatus::parse(&self.status)
            .ok_or_else(|| format!("Unknown creditor status: {}", self.status))?;

        Ok(Creditor {
            id: self.id,
            client_id: self.client_id,
            sender_name: self.sender_name,
            sender_address: self.sender_address,
            sender_email: self.sender_email,
            reference_number: self.reference_number,
            claim_amount: self.claim_amount,
            current_debt_amount: self.current_debt_amount,
            amount_source,
            status,
            is_representative: self.is_representative,
            actual_creditor: self.actual_creditor,
            source_document_id: self.source_document_id,
            response_text: self.response_text,
            response_received_at: self.response_received_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Database representation of an agent account
#[derive(Debug, Clone, FromRow)]
pub struct AgentRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AgentRow {
    pub fn into_domain(self) -> Result<Agent, String> {
        let role = AgentRole::parse(&self.role)
            .ok_or_else(|| format!("Unknown agent role: {}", self.role))?;

        Ok(Agent {
            id: self.id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            role,
            is_active: self.is_active,
            last_login: self.last_login,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// Query parameters for listing clients
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
pub struct ListClientsQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
    /// Filter by workflow status
    pub status: Option<String>,
    /// Case-insensitive match on name, email or aktenzeichen
    pub search: Option<String>,
}

/// Paginated response for clients
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedClients {
    pub clients: Vec<Client>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: i64,
    pub total_pages: u32,
}

/// Client count for one workflow status
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

/// Dashboard statistics across the whole case load
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientStats {
    pub total_clients: i64,
    pub by_status: Vec<StatusCount>,
    pub total_documents: i64,
    pub total_creditors: i64,
    /// Sum of effective claim amounts across all creditors
    pub total_debt: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client_row() -> ClientRow {
        ClientRow {
            id: "client-1".to_string(),
            aktenzeichen: "MAND-2025-001".to_string(),
            first_name: "Max".to_string(),
            last_name: "Mustermann".to_string(),
            email: "max@example.de".to_string(),
            phone: None,
            address: None,
            workflow_status: "created".to_string(),
            first_payment_received: false,
            financial_data: None,
            settlement_plan: None,
            status_history: json!([]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn client_row_converts() {
        let client = client_row().into_domain().unwrap();
        assert_eq!(client.workflow_status, WorkflowStatus::Created);
        assert!(client.financial_data.is_none());
        assert!(client.status_history.is_empty());
    }

    #[test]
    fn client_row_rejects_unknown_status() {
        let mut row = client_row();
        row.workflow_status = "frobnicated".to_string();
        assert!(row.into_domain().is_err());
    }

    #[test]
    fn client_row_parses_financial_data() {
        let mut row = client_row();
        row.financial_data = Some(json!({
            "monthly_net_income": 2500.0,
            "marital_status": "ledig",
            "number_of_children": 0,
            "garnishable_amount": 661.50,
            "recommended_plan_type": "quotenplan",
            "calculated_at": "2025-08-01T10:00:00Z"
        }));

        let client = row.into_domain().unwrap();
        let financial = client.financial_data.unwrap();
        assert_eq!(financial.garnishable_amount, 661.50);
    }

    #[test]
    fn creditor_row_rejects_unknown_source() {
        let row = CreditorRow {
            id: "c-1".to_string(),
            client_id: "client-1".to_string(),
            sender_name: "Sparkasse".to_string(),
            sender_address: None,
            sender_email: None,
            reference_number: None,
            claim_amount: 100.0,
            current_debt_amount: None,
            amount_source: "telepathy".to_string(),
            status: "pending".to_string(),
            is_representative: false,
            actual_creditor: None,
            source_document_id: None,
            response_text: None,
            response_received_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(row.into_domain().is_err());
    }
}
