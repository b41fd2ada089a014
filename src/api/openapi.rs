//! OpenAPI specification endpoints

use actix_web::{get, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::api::error::ApiError;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mandanten Portal Admin API",
        description = "Insolvency case file management: clients, documents, creditors and settlement plans"
    ),
    paths(
        crate::api::auth::admin_login,
        crate::api::auth::agent_login,
        crate::api::agent::create_agent,
        crate::api::agent::list_agents,
        crate::api::agent::get_agent,
        crate::api::agent::update_agent,
        crate::api::agent::deactivate_agent,
        crate::api::client::create_client,
        crate::api::client::list_clients,
        crate::api::client::get_client,
        crate::api::client::update_client,
        crate::api::client::change_status,
        crate::api::client::mark_payment,
        crate::api::client::stats,
        crate::api::client::clear_database,
        crate::api::document::register_upload,
        crate::api::document::list_documents,
        crate::api::document::get_document,
        crate::api::document::apply_classification,
        crate::api::document::correct_classification,
        crate::api::document::delete_document,
        crate::api::creditor::add_creditor,
        crate::api::creditor::list_creditors,
        crate::api::creditor::update_creditor,
        crate::api::creditor::record_response,
        crate::api::creditor::delete_creditor,
        crate::api::financial::calculate_garnishment,
        crate::api::financial::financial_overview,
        crate::api::financial::generate_settlement_plan,
        crate::api::financial::get_settlement_plan,
        crate::api::financial::restructuring_analysis,
        crate::api::health::liveness,
        crate::api::health::readiness,
    ),
    components(schemas(
        crate::api::error::ErrorResponse,
        crate::api::auth::AdminLoginRequest,
        crate::api::auth::AgentLoginRequest,
        crate::api::auth::AdminLoginResponse,
        crate::api::auth::AgentLoginResponse,
        crate::api::client::StatusChangeRequest,
        crate::api::document::RegisterUploadRequest,
        crate::api::financial::FinancialDataRequest,
        crate::api::financial::GarnishmentResponse,
        crate::api::financial::FinancialOverview,
        crate::api::health::HealthStatus,
        crate::api::health::ReadinessStatus,
        crate::api::health::DependencyHealth,
        crate::db::models::PaginatedClients,
        crate::db::models::ClientStats,
        crate::db::models::StatusCount,
        crate::model::Agent,
        crate::model::AgentRole,
        crate::model::Client,
        crate::model::WorkflowStatus,
        crate::model::MaritalStatus,
        crate::model::FinancialData,
        crate::model::StatusHistoryEntry,
        crate::model::Document,
        crate::model::ProcessingStatus,
        crate::model::Classification,
        crate::model::ExtractedCreditor,
        crate::model::Creditor,
        crate::model::CreditorStatus,
        crate::model::AmountSource,
        crate::model::SettlementPlan,
        crate::model::PlanRow,
        crate::model::PlanType,
        crate::service::agent::NewAgent,
        crate::service::agent::AgentUpdate,
        crate::service::client::NewClient,
        crate::service::client::ClientUpdate,
        crate::service::creditor::NewCreditor,
        crate::service::creditor::CreditorUpdate,
        crate::service::creditor::CreditorResponse,
        crate::service::document::ClassificationResult,
        crate::service::document::ClassificationCorrection,
        crate::service::garnishment::GarnishmentResult,
        crate::service::settlement::RestructuringAnalysis,
        crate::service::settlement::Projections,
        crate::service::settlement::QualityChecks,
    )),
    tags(
        (name = "auth", description = "Login endpoints"),
        (name = "agents", description = "Agent account administration"),
        (name = "clients", description = "Client case files"),
        (name = "documents", description = "Uploaded documents and classification"),
        (name = "creditors", description = "Creditor claims"),
        (name = "financial", description = "Garnishment and settlement plans"),
        (name = "health", description = "Health probes")
    )
)]
pub struct ApiDoc;

/// Serve OpenAPI JSON specification
#[get("/openapi.json")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Serve OpenAPI YAML specification
#[get("/openapi.yaml")]
pub async fn openapi_yaml() -> Result<HttpResponse, ApiError> {
    let yaml = ApiDoc::openapi()
        .to_yaml()
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(HttpResponse::Ok().content_type("text/yaml").body(yaml))
}

/// Configure OpenAPI routes
pub fn configure(cfg: &mut actix_web::web::ServiceConfig) {
    cfg.service(openapi_json).service(openapi_yaml);
}
