//! Agent account management and credential checks

use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::db::repository::AgentRepository;
use crate::db::DbError;
use crate::model::{Agent, AgentRole};

/// Matches the hashing cost used for stored agent credentials
const BCRYPT_COST: u32 = 12;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("Database error: {0}")]
    Db(#[from] DbError),

    #[error("password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),

    #[error("invalid username or password")]
    InvalidCredentials,

    #[error("account is deactivated")]
    Inactive,

    #[error("{0}")]
    Validation(String),
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewAgent {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub role: AgentRole,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AgentUpdate {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<AgentRole>,
    pub is_active: Option<bool>,
    /// Replaces the stored password when present
    pub password: Option<String>,
}

pub struct AgentService {
    agents: AgentRepository,
}

impl AgentService {
    pub fn new(agents: AgentRepository) -> Self {
        Self { agents }
    }

    pub async fn create(&self, input: NewAgent) -> Result<Agent, AgentError> {
        let username = input.username.trim();
        if username.is_empty() {
            return Err(AgentError::Validation("username must not be empty".into()));
        }
        if input.password.len() < 8 {
            return Err(AgentError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        let now = Utc::now();
        let agent = Agent {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            email: input.email,
            password_hash: bcrypt::hash(&input.password, BCRYPT_COST)?,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            is_active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };

        self.agents.insert(&agent).await?;
        tracing::info!(agent_id = %agent.id, username = %agent.username, "Agent created");
        Ok(agent)
    }

    /// Verify credentials and record the login time
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Agent, AgentError> {
        let agent = match self.agents.find_by_username(username).await {
            Ok(agent) => agent,
            // Uniform error so usernames cannot be probed
            Err(DbError::NotFound(_)) => return Err(AgentError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !bcrypt::verify(password, &agent.password_hash)? {
            return Err(AgentError::InvalidCredentials);
        }
        if !agent.is_active {
            return Err(AgentError::Inactive);
        }

        self.agents.touch_login(&agent.id).await?;
        tracing::info!(agent_id = %agent.id, username = %agent.username, "Agent logged in");
        Ok(agent)
    }

    pub async fn list(&self) -> Result<Vec<Agent>, AgentError> {
        Ok(self.agents.list().await?)
    }

    pub async fn get(&self, id: &str) -> Result<Agent, AgentError> {
        Ok(self.agents.get(id).await?)
    }

    pub async fn update(&self, id: &str, update: AgentUpdate) -> Result<Agent, AgentError> {
        let mut agent = self.agents.get(id).await?;

        if let Some(email) = update.email {
            agent.email = email;
        }
        if let Some(first_name) = update.first_name {
            agent.first_name = first_name;
        }
        if let Some(last_name) = update.last_name {
            agent.last_name = last_name;
        }
        if let Some(role) = update.role {
            agent.role = role;
        }
        if let Some(is_active) = update.is_active {
            agent.is_active = is_active;
        }
        if let Some(password) = update.password {
            if password.len() < 8 {
                return Err(AgentError::Validation(
                    "password must be at least 8 characters".into(),
                ));
            }
            agent.password_hash = bcrypt::hash(&password, BCRYPT_COST)?;
        }
        agent.updated_at = Utc::now();

        self.agents.update(&agent).await?;
        Ok(agent)
    }

    /// Accounts are deactivated rather than deleted so audit trails keep
    /// their author
    pub async fn deactivate(&self, id: &str) -> Result<(), AgentError> {
        self.agents.deactivate(id).await?;
        tracing::info!(agent_id = %id, "Agent deactivated");
        Ok(())
    }
}
