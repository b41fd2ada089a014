//! REST API endpoints for uploaded documents and their classification

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::service::document::{ClassificationCorrection, ClassificationResult};
use crate::service::DocumentService;

/// Upload registration request; file contents are stored elsewhere
#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterUploadRequest {
    pub filename: String,
    pub content_type: Option<String>,
    pub size_bytes: Option<i64>,
}

/// Register an uploaded document for a client
#[utoipa::path(
    post,
    path = "/api/admin/clients/{id}/documents",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    request_body = RegisterUploadRequest,
    responses(
        (status = 201, description = "Document registered", body = crate::model::Document),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[post("/api/admin/clients/{id}/documents")]
pub async fn register_upload(
    service: web::Data<DocumentService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<RegisterUploadRequest>,
) -> Result<HttpResponse, ApiError> {
    let body = body.into_inner();
    let document = service
        .register_upload(&path.into_inner(), &body.filename, body.content_type, body.size_bytes)
        .await?;
    Ok(HttpResponse::Created().json(document))
}

/// List a client's documents
#[utoipa::path(
    get,
    path = "/api/admin/clients/{id}/documents",
    params(("id" = String, Path, description = "Client id or aktenzeichen")),
    responses(
        (status = 200, description = "Documents retrieved", body = [crate::model::Document]),
        (status = 404, description = "Client not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/api/admin/clients/{id}/documents")]
pub async fn list_documents(
    service: web::Data<DocumentService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let documents = service.list_for_client(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(documents))
}

/// Get a document by ID
#[utoipa::path(
    get,
    path = "/api/admin/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 200, description = "Document retrieved", body = crate::model::Document),
        (status = 404, description = "Document not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[get("/api/admin/documents/{id}")]
pub async fn get_document(
    service: web::Data<DocumentService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let document = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Classification callback from the AI processing step
#[utoipa::path(
    post,
    path = "/api/admin/documents/{id}/classification",
    params(("id" = String, Path, description = "Document ID")),
    request_body = ClassificationResult,
    responses(
        (status = 200, description = "Classification stored", body = crate::model::Document),
        (status = 404, description = "Document not found", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Document already classified", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[post("/api/admin/documents/{id}/classification")]
pub async fn apply_classification(
    service: web::Data<DocumentService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<ClassificationResult>,
) -> Result<HttpResponse, ApiError> {
    let document = service
        .apply_classification(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Manual review correction of a classification
#[utoipa::path(
    post,
    path = "/api/admin/documents/{id}/correction",
    params(("id" = String, Path, description = "Document ID")),
    request_body = ClassificationCorrection,
    responses(
        (status = 200, description = "Classification corrected", body = crate::model::Document),
        (status = 400, description = "Document not yet classified", body = crate::api::error::ErrorResponse),
        (status = 404, description = "Document not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[post("/api/admin/documents/{id}/correction")]
pub async fn correct_classification(
    service: web::Data<DocumentService>,
    user: AdminUser,
    path: web::Path<String>,
    body: web::Json<ClassificationCorrection>,
) -> Result<HttpResponse, ApiError> {
    let document = service
        .correct_classification(&path.into_inner(), body.into_inner(), &user.0.sub)
        .await?;
    Ok(HttpResponse::Ok().json(document))
}

/// Delete a document
#[utoipa::path(
    delete,
    path = "/api/admin/documents/{id}",
    params(("id" = String, Path, description = "Document ID")),
    responses(
        (status = 204, description = "Document deleted"),
        (status = 404, description = "Document not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "documents"
)]
#[delete("/api/admin/documents/{id}")]
pub async fn delete_document(
    service: web::Data<DocumentService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    service.delete(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure document routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(register_upload)
        .service(list_documents)
        .service(get_document)
        .service(apply_classification)
        .service(correct_classification)
        .service(delete_document);
}
