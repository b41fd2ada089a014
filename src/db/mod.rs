//! Database module for PostgreSQL persistence

pub mod models;
pub mod repository;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::env;

// Environment variable names
const ENV_POSTGRES_HOST: &str = "PORTAL_POSTGRES_HOST";
const ENV_POSTGRES_PORT: &str = "PORTAL_POSTGRES_PORT";
const ENV_POSTGRES_USER: &str = "PORTAL_POSTGRES_USER";
const ENV_POSTGRES_PASSWORD: &str = "PORTAL_POSTGRES_PASSWORD";
const ENV_POSTGRES_DB: &str = "PORTAL_POSTGRES_DB";

// Default values
const DEFAULT_POSTGRES_HOST: &str = "127.0.0.1";
const DEFAULT_POSTGRES_PORT: &str = "5432";
const DEFAULT_POSTGRES_USER: &str = "portal";
const DEFAULT_POSTGRES_PASSWORD: &str = "portal";
const DEFAULT_POSTGRES_DB: &str = "portal";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Unique constraint violated: {0}")]
    Conflict(String),
}

/// Map an insert error to `Conflict` on a unique violation
pub(crate) fn map_insert_error(e: sqlx::Error, what: &str) -> DbError {
    let is_unique_violation = e
        .as_database_error()
        .and_then(|db| db.code())
        .map(|code| code == "23505")
        .unwrap_or(false);

    if is_unique_violation {
        DbError::Conflict(what.to_string())
    } else {
        DbError::Connection(e)
    }
}

/// Create a new database connection pool
pub async fn create_pool() -> Result<PgPool, DbError> {
    let host = env::var(ENV_POSTGRES_HOST).unwrap_or_else(|_| DEFAULT_POSTGRES_HOST.to_string());
    let port = env::var(ENV_POSTGRES_PORT).unwrap_or_else(|_| DEFAULT_POSTGRES_PORT.to_string());
    let user = env::var(ENV_POSTGRES_USER).unwrap_or_else(|_| DEFAULT_POSTGRES_USER.to_string());
    let password =
        env::var(ENV_POSTGRES_PASSWORD).unwrap_or_else(|_| DEFAULT_POSTGRES_PASSWORD.to_string());
    let database = env::var(ENV_POSTGRES_DB).unwrap_or_else(|_| DEFAULT_POSTGRES_DB.to_string());

    let database_url = format!(
        "postgres://{}:{}@{}:{}/{}",
        user, password, host, port, database
    );

    tracing::debug!(host = %host, port = %port, database = %database, "Connecting to PostgreSQL");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await?;

    tracing::info!(host = %host, port = %port, "PostgreSQL connection established");

    Ok(pool)
}

/// Initialize database schema
pub async fn init_schema(pool: &PgPool) -> Result<(), DbError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS clients (
            id VARCHAR(64) PRIMARY KEY,
            aktenzeichen VARCHAR(64) NOT NULL UNIQUE,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT,
            address TEXT,
            workflow_status VARCHAR(32) NOT NULL,
            first_payment_received BOOLEAN NOT NULL DEFAULT FALSE,
            financial_data JSONB,
            settlement_plan JSONB,
            status_history JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id VARCHAR(64) PRIMARY KEY,
            client_id VARCHAR(64) NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            filename TEXT NOT NULL,
            content_type VARCHAR(100),
            size_bytes BIGINT,
            processing_status VARCHAR(32) NOT NULL,
            classification JSONB,
            uploaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS creditors (
            id VARCHAR(64) PRIMARY KEY,
            client_id VARCHAR(64) NOT NULL REFERENCES clients(id) ON DELETE CASCADE,
            sender_name TEXT NOT NULL,
            sender_address TEXT,
            sender_email TEXT,
            reference_number TEXT,
            claim_amount DOUBLE PRECISION NOT NULL,
            current_debt_amount DOUBLE PRECISION,
            amount_source VARCHAR(32) NOT NULL,
            status VARCHAR(32) NOT NULL,
            is_representative BOOLEAN NOT NULL DEFAULT FALSE,
            actual_creditor TEXT,
            source_document_id VARCHAR(64),
            response_text TEXT,
            response_received_at TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS agents (
            id VARCHAR(64) PRIMARY KEY,
            username VARCHAR(64) NOT NULL UNIQUE,
            email TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            role VARCHAR(32) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            last_login TIMESTAMPTZ,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes separately
    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_clients_workflow_status ON clients(workflow_status)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_client_id ON documents(client_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_creditors_client_id ON creditors(client_id)")
        .execute(pool)
        .await?;

    tracing::info!("Database schema initialized");

    Ok(())
}
