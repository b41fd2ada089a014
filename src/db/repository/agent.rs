//! Repository for agent account operations

use sqlx::PgPool;

use super::super::models::AgentRow;
use super::super::{map_insert_error, DbError};
use crate::model::Agent;

/// Repository for agent operations
#[derive(Clone)]
pub struct AgentRepository {
    pool: PgPool,
}

impl AgentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new agent
    pub async fn insert(&self, agent: &Agent) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO agents (
                id, username, email, password_hash, first_name, last_name,
                role, is_active, last_login, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(&agent.id)
        .bind(&agent.username)
        .bind(&agent.email)
        .bind(&agent.password_hash)
        .bind(&agent.first_name)
        .bind(&agent.last_name)
        .bind(agent.role.as_str())
        .bind(agent.is_active)
        .bind(agent.last_login)
        .bind(agent.created_at)
        .bind(agent.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, &agent.username))?;

        tracing::debug!(id = %agent.id, "Inserted agent");
        Ok(())
    }

    /// Get an agent by ID
    pub async fn get(&self, id: &str) -> Result<Agent, DbError> {
        let row: AgentRow = sqlx::query_as("SELECT * FROM agents WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(id.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// Find an agent by username
    pub async fn find_by_username(&self, username: &str) -> Result<Agent, DbError> {
        let row: AgentRow = sqlx::query_as("SELECT * FROM agents WHERE username = $1")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound(username.to_string()))?;

        row.into_domain().map_err(DbError::Serialization)
    }

    /// List all agents
    pub async fn list(&self) -> Result<Vec<Agent>, DbError> {
        let rows: Vec<AgentRow> = sqlx::query_as("SELECT * FROM agents ORDER BY username ASC")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| row.into_domain().map_err(DbError::Serialization))
            .collect()
    }

    /// Update all mutable columns of an agent
    pub async fn update(&self, agent: &Agent) -> Result<(), DbError> {
        let result = sqlx::query(
            r#"
            UPDATE agents SET
                email = $2,
                password_hash = $3,
                first_name = $4,
                last_name = $5,
                role = $6,
                is_active = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(&agent.id)
        .bind(&agent.email)
        .bind(&agent.password_hash)
        .bind(&agent.first_name)
        .bind(&agent.last_name)
        .bind(agent.role.as_str())
        .bind(agent.is_active)
        .bind(agent.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(agent.id.clone()));
        }
        Ok(())
    }

    /// Deactivate an agent account
    pub async fn deactivate(&self, id: &str) -> Result<(), DbError> {
        let result =
            sqlx::query("UPDATE agents SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound(id.to_string()));
        }
        Ok(())
    }

    /// Record a successful login
    pub async fn touch_login(&self, id: &str) -> Result<(), DbError> {
        sqlx::query("UPDATE agents SET last_login = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
