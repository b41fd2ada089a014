//! REST API endpoints for creditor claims

use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::service::creditor::{CreditorResponse, CreditorUpdate, NewCreditor};
use crate::service::CreditorService;

/// Manually add a creditor to a client
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/creditors",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = NewCreditor,
    responses(
        (status = 201, description = "Creditor added", body = crate::model::Creditor),
        (status = 400, description = "Validation error", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "creditors"
)]
#[post("/api/admin/clients/{id}/creditors")]
pub async fn add_creditor(
    service: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<NewCreditor>,
) -> Result<HttpResponse, ApiError> {
    let creditor = service.add_manual(&path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Created().json(creditor))
}

/// List a client's creditors
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}/creditors",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Creditors retrieved", body = [crate::model::Creditor]),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "creditors"
)]
#[get("/api/admin/clients/{id}/creditors")]
pub async fn list_creditors(
    service: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let creditors = service.list_for_client(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(creditors))
}

/// Update a creditor
#[utoipa::path(
    patch,
    path = "/api/admin/creditors/{id}",
    params(("id" = String, Path, description = "Creditor ID")),
    request_body = CreditorUpdate,
    responses(
        (status = 200, description = "Creditor updated", body = crate::model::Creditor),
        (status = 404, description = "Creditor not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "creditors"
)]
#[patch("/api/admin/creditors/{id}")]
pub async fn update_creditor(
    service: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<CreditorUpdate>,
) -> Result<HttpResponse, ApiError> {
    let creditor = service.update(&path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(creditor))
}

/// Record a creditor's response with the confirmed debt amount
#[utoipa::path(
    post,
    path = "/api/admin/creditors/{id}/response",
    params(("id" = String, Path, description = "Creditor ID")),
    request_body = CreditorResponse,
    responses(
        (status = 200, description = "Response recorded", body = crate::model::Creditor),
        (status = 400, description = "Invalid debt amount", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Creditor not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "creditors"
)]
#[post("/api/admin/creditors/{id}/response")]
pub async fn record_response(
    service: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<CreditorResponse>,
) -> Result<HttpResponse, ApiError> {
    let creditor = service
        .record_response(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(creditor))
}

/// Delete a creditor
#[utoipa::path(
    delete,
    path = "/api/admin/creditors/{id}",
    params(("id" = String, Path, description = "Creditor ID")),
    responses(
        (status = 204, description = "Creditor deleted"),
        (status = 404, description = "Creditor not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "creditors"
)]
#[delete("/api/admin/creditors/{id}")]
pub async fn delete_creditor(
    service: web::Data<CreditorService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure creditor routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(add_creditor)
        .service(list_creditors)
        .service(update_creditor)
        .service(record_response)
        .service(delete_creditor);
}
