//! REST API endpoints for client case files

use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::db::models::ListClientsQuery;
use crate::model::WorkflowStatus;
use crate::service::client::{ClientUpdate, NewClient};
use crate::service::ClientService;

/// Workflow status change request
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusChangeRequest {
    pub status: String,
    pub metadata: Option<serde_json::Value>,
}

/// Create a new client case file
#[utoipa::path(
    post,
    path = "/api/admin/clients",
    request_body = NewClient,
    responses(
        (status = 201, description = "Client created", body = crate::model::Client),
        (status = 400, description = "Validation error", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Aktenzeichen already in use", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[post("/api/admin/clients")]
pub async fn create_client(
    service: web::Data<ClientService>,
    user: AdminUser,
    body: web::Json<NewClient>,
) -> Result<HttpResponse, ApiError> {
    let client = service.create(body.into_inner(), &user.0.sub).await?;
    Ok(HttpResponse::Created().json(client))
}

/// List clients with pagination and filters
#[utoipa::path(
    get,
    path = "/api/admin/clients",
    params(ListClientsQuery),
    responses(
        (status = 200, description = "Clients retrieved", body = crate::db::models::PaginatedClients)
    ),
    tag = "clients"
)]
#[get("/api/admin/clients")]
pub async fn list_clients(
    service: web::Data<ClientService>,
    _user: AdminUser,
    query: web::Query<ListClientsQuery>,
) -> Result<HttpResponse, ApiError> {
    let page = service.list(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Get a client by id or aktenzeichen
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Client retrieved", body = crate::model::Client),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[get("/api/admin/clients/{id}")]
pub async fn get_client(
    service: web::Data<ClientService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let client = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// Update a client's profile fields
#[utoipa::path(
    patch,
    path = "/api/admin/clients/{id}",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = ClientUpdate,
    responses(
        (status = 200, description = "Client updated", body = crate::model::Client),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[patch("/api/admin/clients/{id}")]
pub async fn update_client(
    service: web::Data<ClientService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<ClientUpdate>,
) -> Result<HttpResponse, ApiError> {
    let client = service
        .update_profile(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(client))
}

/// Move a client to a new workflow status
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/status",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = crate::model::Client),
        (status = 400, description = "Unknown status", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[post("/api/admin/clients/{id}/status")]
pub async fn change_status(
    service: web::Data<ClientService>,
    user: AdminUser,
    path: web::Path<String>,
    body: web::Json<StatusChangeRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let status = WorkflowStatus::parse(&body.status)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown workflow status: {}", body.status)))?;

    let client = service
        .change_status(&path.into_inner(), status, &user.0.sub, body.metadata)
        .await?;
    Ok(HttpResponse::Ok().json(client))
}

/// Record the client's first payment
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/payment",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Payment recorded", body = crate::model::Client),
        (status = 400, description = "Payment already recorded", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[post("/api/admin/clients/{id}/payment")]
pub async fn mark_payment(
    service: web::Data<ClientService>,
    user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let client = service.mark_payment(&path.into_inner(), &user.0.sub).await?;
    Ok(HttpResponse::Ok().json(client))
}

/// Dashboard statistics
#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Statistics retrieved", body = crate::db::models::ClientStats)
    ),
    tag = "clients"
)]
#[get("/api/admin/stats")]
pub async fn stats(
    service: web::Data<ClientService>,
    _user: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let stats = service.stats().await?;
    Ok(HttpResponse::Ok().json(stats))
}

/// Remove all case data
#[utoipa::path(
    delete,
    path = "/api/admin/clear-database",
    responses(
        (status = 200, description = "Database cleared"),
        (status = 403, description = "Admin access required", body = crate::api::error::ErrorResponse)
    ),
    tag = "clients"
)]
#[delete("/api/admin/clear-database")]
pub async fn clear_database(
    service: web::Data<ClientService>,
    _user: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let removed = service.clear_database().await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "removed_clients": removed })))
}

/// Configure client routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_client)
        .service(list_clients)
        .service(get_client)
        .service(update_client)
        .service(change_status)
        .service(mark_payment)
        .service(stats)
        .service(clear_database);
}
