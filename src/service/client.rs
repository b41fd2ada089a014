//! Client case file lifecycle

use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::models::{ClientStats, ListClientsQuery, PaginatedClients};
use crate::db::repository::ClientRepository;
use crate::db::DbError;
use crate::model::{Client, StatusHistoryEntry, WorkflowStatus};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("{0}")]
    Validation(String),

    #[error("aktenzeichen already in use: {0}")]
    DuplicateAktenzeichen(String),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewClient {
    pub aktenzeichen: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ClientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

pub struct ClientService {
    clients: ClientRepository,
}

impl ClientService {
    pub fn new(clients: ClientRepository) -> Self {
        Self { clients }
    }

    pub async fn create(&self, input: NewClient, created_by: &str) -> Result<Client, ClientError> {
        let aktenzeichen = input.aktenzeichen.trim();
        if aktenzeichen.is_empty() {
            return Err(ClientError::Validation("aktenzeichen must not be empty".into()));
        }
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(ClientError::Validation("first and last name are required".into()));
        }
        if !input.email.contains('@') {
            return Err(ClientError::Validation(format!(
                "invalid email address: {}",
                input.email
            )));
        }

        let now = Utc::now();
        let client = Client {
            id: Uuid::new_v4().to_string(),
            aktenzeichen: aktenzeichen.to_string(),
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone,
            address: input.address,
            workflow_status: WorkflowStatus::Created,
            first_payment_received: false,
            financial_data: None,
            settlement_plan: None,
            status_history: vec![StatusHistoryEntry {
                id: Uuid::new_v4().to_string(),
                status: WorkflowStatus::Created.as_str().to_string(),
                changed_by: created_by.to_string(),
                metadata: None,
                created_at: now,
            }],
            created_at: now,
            updated_at: now,
        };

        match self.clients.insert(&client).await {
            Ok(()) => {}
            Err(DbError::Conflict(_)) => {
                return Err(ClientError::DuplicateAktenzeichen(client.aktenzeichen))
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            client_id = %client.id,
            aktenzeichen = %client.aktenzeichen,
            "Client created"
        );
        Ok(client)
    }

    /// Look up by id or aktenzeichen
    pub async fn get(&self, client_ref: &str) -> Result<Client, ClientError> {
        Ok(self.clients.get(client_ref).await?)
    }

    pub async fn list(&self, query: ListClientsQuery) -> Result<PaginatedClients, ClientError> {
        Ok(self.clients.list(&query).await?)
    }

    pub async fn update_profile(
        &self,
        client_ref: &str,
        update: ClientUpdate,
    ) -> Result<Client, ClientError> {
        let mut client = self.clients.get(client_ref).await?;

        if let Some(first_name) = update.first_name {
            client.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            client.last_name = last_name;
        }
        if let Some(email) = update.email {
            if !email.contains('@') {
                return Err(ClientError::Validation(format!("invalid email address: {email}")));
            }
            client.email = email.trim().to_lowercase();
        }
        if let Some(phone) = update.phone {
            client.phone = Some(phone);
        }
        if let Some(address) = update.address {
            client.address = Some(address);
        }
        client.updated_at = Utc::now();

        self.clients.update_profile(&client).await?;
        Ok(client)
    }

    /// Move a client to a new workflow status, recording who did it
    pub async fn change_status(
        &self,
        client_ref: &str,
        status: WorkflowStatus,
        changed_by: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<Client, ClientError> {
        let mut client = self.clients.get(client_ref).await?;

        let entry = StatusHistoryEntry {
            id: Uuid::new_v4().to_string(),
            status: status.as_str().to_string(),
            changed_by: changed_by.to_string(),
            metadata,
            created_at: Utc::now(),
        };
        self.clients.update_status(&client.id, status, &entry).await?;

        tracing::info!(
            client_id = %client.id,
            from = client.workflow_status.as_str(),
            to = status.as_str(),
            changed_by,
            "Workflow status changed"
        );

        client.workflow_status = status;
        client.status_history.push(entry);
        client.updated_at = Utc::now();
        Ok(client)
    }

    /// Record the first instalment and move the case into admin review
    pub async fn mark_payment(&self, client_ref: &str, changed_by: &str) -> Result<Client, ClientError> {
        let client = self.clients.get(client_ref).await?;
        if client.first_payment_received {
            return Err(ClientError::Validation("first payment already recorded".into()));
        }

        let entry = StatusHistoryEntry {
            id: Uuid::new_v4().to_string(),
            status: WorkflowStatus::AdminReview.as_str().to_string(),
            changed_by: changed_by.to_string(),
            metadata: Some(json!({ "first_payment_received": true })),
            created_at: Utc::now(),
        };
        self.clients.mark_payment(&client.id, &entry).await?;

        tracing::info!(client_id = %client.id, aktenzeichen = %client.aktenzeichen, "First payment recorded");
        self.get(&client.id).await
    }

    pub async fn stats(&self) -> Result<ClientStats, ClientError> {
        Ok(self.clients.stats().await?)
    }

    /// Wipe all case data. Intended for test and staging environments only.
    pub async fn clear_database(&self) -> Result<u64, ClientError> {
        let removed = self.clients.delete_all().await?;
        tracing::warn!(removed, "Database cleared");
        Ok(removed)
    }
}
