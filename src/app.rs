//! Application state and service initialization
//!
//! This module centralizes all service initialization and dependency injection,
//! making it easier to manage the application lifecycle and test services.

use actix_web::web;
use sqlx::PgPool;

use crate::db::repository::{
    AgentRepository, ClientRepository, CreditorRepository, DocumentRepository,
};
use crate::model::Config;
use crate::service::{
    AgentService, ClientService, CreditorService, DocumentService, SettlementService, TokenService,
};

/// Application state containing all services and shared resources
///
/// This struct centralizes service initialization and makes it easy to inject
/// dependencies into Actix-web handlers. The `HttpServer` factory closure
/// clones it per worker, so it must stay cheaply cloneable.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: web::Data<PgPool>,
    pub config: web::Data<Config>,
    pub tokens: web::Data<TokenService>,
    pub clients: web::Data<ClientService>,
    pub documents: web::Data<DocumentService>,
    pub creditors: web::Data<CreditorService>,
    pub settlements: web::Data<SettlementService>,
    pub agents: web::Data<AgentService>,
}

impl AppState {
    /// Initialize the database and build the service dependency graph
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let db_pool = crate::db::create_pool()
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        crate::db::init_schema(&db_pool)
            .await
            .map_err(|e| AppError::DatabaseInit(e.to_string()))?;

        Ok(Self::with_pool(db_pool, config))
    }

    /// Build the service graph on an existing pool
    pub fn with_pool(db_pool: PgPool, config: Config) -> Self {
        let client_repo = ClientRepository::new(db_pool.clone());
        let document_repo = DocumentRepository::new(db_pool.clone());
        let creditor_repo = CreditorRepository::new(db_pool.clone());
        let agent_repo = AgentRepository::new(db_pool.clone());

        let tokens = TokenService::new(&config.jwt_secret);
        let clients = ClientService::new(client_repo.clone());
        let documents = DocumentService::new(
            client_repo.clone(),
            document_repo,
            creditor_repo.clone(),
        );
        let creditors = CreditorService::new(client_repo.clone(), creditor_repo.clone());
        let settlements = SettlementService::new(
            client_repo,
            creditor_repo,
            config.settlement.quotenplan_threshold,
        );
        let agents = AgentService::new(agent_repo);

        Self {
            db_pool: web::Data::new(db_pool),
            config: web::Data::new(config),
            tokens: web::Data::new(tokens),
            clients: web::Data::new(clients),
            documents: web::Data::new(documents),
            creditors: web::Data::new(creditors),
            settlements: web::Data::new(settlements),
            agents: web::Data::new(agents),
        }
    }

    /// Register shared state and all routes on an Actix app
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.db_pool.clone())
            .app_data(self.config.clone())
            .app_data(self.tokens.clone())
            .app_data(self.clients.clone())
            .app_data(self.documents.clone())
            .app_data(self.creditors.clone())
            .app_data(self.settlements.clone())
            .app_data(self.agents.clone())
            .configure(crate::api::auth::configure)
            .configure(crate::api::agent::configure)
            .configure(crate::api::client::configure)
            .configure(crate::api::document::configure)
            .configure(crate::api::creditor::configure)
            .configure(crate::api::financial::configure)
            .configure(crate::api::health::configure)
            .configure(crate::api::openapi::configure);
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum AppError {
    /// Database initialization failed
    #[error("Database initialization failed: {0}")]
    DatabaseInit(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    // HttpServer requires the factory closure (and therefore the captured
    // state) to be Clone
    #[test]
    fn state_is_cloneable_for_server_factory() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
