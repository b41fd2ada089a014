//! REST API endpoints for garnishment, settlement plans and analyses

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::model::{Client, FinancialData, SettlementPlan};
use crate::service::garnishment::GarnishmentResult;
use crate::service::settlement::FinancialInput;
use crate::service::{ClientService, CreditorService, SettlementService};

/// Financial data for a garnishment calculation
#[derive(Debug, Deserialize, ToSchema)]
pub struct FinancialDataRequest {
    pub monthly_net_income: f64,
    /// One of ledig, verheiratet, geschieden, verwitwet
    pub marital_status: String,
    pub number_of_children: u32,
}

impl From<FinancialDataRequest> for FinancialInput {
    fn from(body: FinancialDataRequest) -> Self {
        FinancialInput {
            monthly_net_income: body.monthly_net_income,
            marital_status: body.marital_status,
            number_of_children: body.number_of_children,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GarnishmentResponse {
    pub garnishment: GarnishmentResult,
    pub client: Client,
}

/// Financial position of a client at a glance
#[derive(Debug, Serialize, ToSchema)]
pub struct FinancialOverview {
    pub client_id: String,
    pub aktenzeichen: String,
    pub financial_data: Option<FinancialData>,
    pub creditor_count: usize,
    pub total_debt: f64,
    pub settlement_plan: Option<SettlementPlan>,
}

/// Calculate garnishable income and store it as the client's financial data
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/garnishment",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = FinancialDataRequest,
    responses(
        (status = 200, description = "Financial data saved", body = GarnishmentResponse),
        (status = 400, description = "Invalid financial data", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "financial"
)]
#[post("/api/admin/clients/{id}/garnishment")]
pub async fn calculate_garnishment(
    service: web::Data<SettlementService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<FinancialDataRequest>,
) -> Result<HttpResponse, ApiError> {
    let (client, garnishment) = service
        .save_financial_data(&path.into_inner(), body.into_inner().into())
        .await?;
    Ok(HttpResponse::Ok().json(GarnishmentResponse { garnishment, client }))
}

/// Financial overview for a client
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}/financial-overview",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Overview retrieved", body = FinancialOverview),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "financial"
)]
#[get("/api/admin/clients/{id}/financial-overview")]
pub async fn financial_overview(
    clients: web::Data<ClientService>,
    creditors: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let client = clients.get(&path.into_inner()).await?;
    let claims = creditors.list_for_client(&client.id).await?;
    let total_debt = creditors.total_debt(&client.id).await?;

    Ok(HttpResponse::Ok().json(FinancialOverview {
        client_id: client.id,
        aktenzeichen: client.aktenzeichen,
        financial_data: client.financial_data,
        creditor_count: claims.len(),
        total_debt,
        settlement_plan: client.settlement_plan,
    }))
}

/// Generate a settlement plan from the stored financial data and creditors
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/settlement-plan",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Plan generated", body = crate::model::SettlementPlan),
        (status = 400, description = "Missing financial data or creditors", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "financial"
)]
#[post("/api/admin/clients/{id}/settlement-plan")]
pub async fn generate_settlement_plan(
    service: web::Data<SettlementService>,
    user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let plan = service.generate_plan(&path.into_inner(), &user.0.sub).await?;
    Ok(HttpResponse::Ok().json(plan))
}

/// Get the stored settlement plan
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}/settlement-plan",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Plan retrieved", body = crate::model::SettlementPlan),
        (status = 404, description = "No plan generated yet", body = crate::api::error::ErrorResponse)
    ),
    tag = "financial"
)]
#[get("/api/admin/clients/{id}/settlement-plan")]
pub async fn get_settlement_plan(
    clients: web::Data<ClientService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let client_ref = path.into_inner();
    let client = clients.get(&client_ref).await?;
    let plan = client
        .settlement_plan
        .ok_or_else(|| ApiError::NotFound(format!("no settlement plan for {}", client_ref)))?;
    Ok(HttpResponse::Ok().json(plan))
}

/// Restructuring analysis with 36-month projections.
///
/// Uses the stored financial data unless an override is supplied.
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/restructuring-analysis",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = Option<FinancialDataRequest>,
    responses(
        (status = 200, description = "Analysis computed", body = crate::service::settlement::RestructuringAnalysis),
        (status = 400, description = "Missing financial data or creditors", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "financial"
)]
#[post("/api/admin/clients/{id}/restructuring-analysis")]
pub async fn restructuring_analysis(
    service: web::Data<SettlementService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: Option<web::Json<FinancialDataRequest>>,
) -> Result<HttpResponse, ApiError> {
    let input = body.map(|b| b.into_inner().into());
    let analysis = service.analysis(&path.into_inner(), input).await?;
    Ok(HttpResponse::Ok().json(analysis))
}

/// Configure financial routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(calculate_garnishment)
        .service(financial_overview)
        .service(generate_settlement_plan)
        .service(get_settlement_plan)
        .service(restructuring_analysis);
}
