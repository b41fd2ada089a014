//! Creditor claim management

use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::repository::{ClientRepository, CreditorRepository};
use crate::db::DbError;
use crate::model::{AmountSource, Creditor, CreditorStatus};
use crate::service::garnishment::round_cents;

#[derive(Debug, thiserror::Error)]
pub enum CreditorError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewCreditor {
    pub sender_name: String,
    pub sender_address: Option<String>,
    pub sender_email: Option<String>,
    pub reference_number: Option<String>,
    pub claim_amount: f64,
    #[serde(default)]
    pub is_representative: bool,
    pub actual_creditor: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreditorUpdate {
    pub sender_name: Option<String>,
    pub sender_address: Option<String>,
    pub sender_email: Option<String>,
    pub reference_number: Option<String>,
    pub claim_amount: Option<f64>,
    pub status: Option<CreditorStatus>,
}

/// Creditor response to a contact letter
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreditorResponse {
    pub response_text: Option<String>,
    /// Debt amount the creditor confirms as outstanding
    pub current_debt_amount: f64,
}

pub struct CreditorService {
    clients: ClientRepository,
    creditors: CreditorRepository,
}

impl CreditorService {
    pub fn new(clients: ClientRepository, creditors: CreditorRepository) -> Self {
        Self { clients, creditors }
    }

    /// Manually add a creditor; admin-entered claims are confirmed from the
    /// start
    pub async fn add_manual(
        &self,
        client_ref: &str,
        input: NewCreditor,
    ) -> Result<Creditor, CreditorError> {
        if input.sender_name.trim().is_empty() {
            return Err(CreditorError::Validation("creditor name must not be empty".into()));
        }
        if !input.claim_amount.is_finite() || input.claim_amount < 0.0 {
            return Err(CreditorError::Validation(format!(
                "invalid claim amount: {}",
                input.claim_amount
            )));
        }
        let client = self.clients.get(client_ref).await?;

        let now = Utc::now();
        let creditor = Creditor {
            id: Uuid::new_v4().to_string(),
            client_id: client.id,
            sender_name: input.sender_name.trim().to_string(),
            sender_address: input.sender_address,
            sender_email: input.sender_email,
            reference_number: input.reference_number,
            claim_amount: round_cents(input.claim_amount),
            current_debt_amount: None,
            amount_source: AmountSource::ManualEntry,
            status: CreditorStatus::Confirmed,
            is_representative: input.is_representative,
            actual_creditor: input.actual_creditor,
            source_document_id: None,
            response_text: None,
            response_received_at: None,
            created_at: now,
            updated_at: now,
        };
        self.creditors.insert(&creditor).await?;

        tracing::info!(
            creditor_id = %creditor.id,
            client_id = %creditor.client_id,
            sender = %creditor.sender_name,
            amount = creditor.claim_amount,
            "Creditor added manually"
        );
        Ok(creditor)
    }

    pub async fn list_for_client(&self, client_ref: &str) -> Result<Vec<Creditor>, CreditorError> {
        let client = self.clients.get(client_ref).await?;
        Ok(self.creditors.list_by_client(&client.id).await?)
    }

    pub async fn update(
        &self,
        creditor_id: &str,
        update: CreditorUpdate,
    ) -> Result<Creditor, CreditorError> {
        let mut creditor = self.creditors.get(creditor_id).await?;

        if let Some(sender_name) = update.sender_name {
            if sender_name.trim().is_empty() {
                return Err(CreditorError::Validation("creditor name must not be empty".into()));
            }
            creditor.sender_name = sender_name.trim().to_string();
        }
        if let Some(sender_address) = update.sender_address {
            creditor.sender_address = Some(sender_address);
        }
        if let Some(sender_email) = update.sender_email {
            creditor.sender_email = Some(sender_email);
        }
        if let Some(reference_number) = update.reference_number {
            creditor.reference_number = Some(reference_number);
        }
        if let Some(claim_amount) = update.claim_amount {
            if !claim_amount.is_finite() || claim_amount < 0.0 {
                return Err(CreditorError::Validation(format!(
                    "invalid claim amount: {claim_amount}"
                )));
            }
            creditor.claim_amount = round_cents(claim_amount);
            creditor.amount_source = AmountSource::ManualEntry;
        }
        if let Some(status) = update.status {
            creditor.status = status;
        }
        creditor.updated_at = Utc::now();

        self.creditors.update(&creditor).await?;
        Ok(creditor)
    }

    /// Record a creditor's response; the confirmed amount takes precedence
    /// over the originally recorded claim
    pub async fn record_response(
        &self,
        creditor_id: &str,
        response: CreditorResponse,
    ) -> Result<Creditor, CreditorError> {
        if !response.current_debt_amount.is_finite() || response.current_debt_amount < 0.0 {
            return Err(CreditorError::Validation(format!(
                "invalid debt amount: {}",
                response.current_debt_amount
            )));
        }

        let mut creditor = self.creditors.get(creditor_id).await?;
        creditor.current_debt_amount = Some(round_cents(response.current_debt_amount));
        creditor.amount_source = AmountSource::CreditorResponse;
        creditor.status = CreditorStatus::Responded;
        creditor.response_text = response.response_text;
        creditor.response_received_at = Some(Utc::now());
        creditor.updated_at = Utc::now();

        self.creditors.update(&creditor).await?;

        tracing::info!(
            creditor_id = %creditor.id,
            confirmed_amount = response.current_debt_amount,
            "Creditor response recorded"
        );
        Ok(creditor)
    }

    pub async fn delete(&self, creditor_id: &str) -> Result<(), CreditorError> {
        self.creditors.delete(creditor_id).await?;
        tracing::info!(creditor_id, "Creditor deleted");
        Ok(())
    }

    /// Sum of effective claim amounts for a client
    pub async fn total_debt(&self, client_ref: &str) -> Result<f64, CreditorError> {
        let client = self.clients.get(client_ref).await?;
        Ok(round_cents(self.creditors.total_claims(&client.id).await?))
    }
}
