//! REST API endpoints for agent account administration

use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::api::auth::AdminUser;
use crate::api::error::ApiError;
use crate::service::agent::{AgentUpdate, NewAgent};
use crate::service::AgentService;

/// Create a new agent account
#[utoipa::path(
    post,
    path = "/api/admin/agents",
    request_body = NewAgent,
    responses(
        (status = 201, description = "Agent created", body = crate::model::Agent),
        (status = 400, description = "Validation error", body = crate::api::error::ErrorResponse),
        (status = 409, description = "Username already taken", body = crate::api::error::ErrorResponse)
    ),
    tag = "agents"
)]
#[post("/api/admin/agents")]
pub async fn create_agent(
    service: web::Data<AgentService>,
    _user: AdminUser,
    body: web::Json<NewAgent>,
) -> Result<HttpResponse, ApiError> {
    let agent = service.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(agent))
}

/// List all agents
#[utoipa::path(
    get,
    path = "/api/admin/agents",
    responses(
        (status = 200, description = "Agents retrieved", body = [crate::model::Agent])
    ),
    tag = "agents"
)]
#[get("/api/admin/agents")]
pub async fn list_agents(
    service: web::Data<AgentService>,
    _user: AdminUser,
) -> Result<HttpResponse, ApiError> {
    let agents = service.list().await?;
    Ok(HttpResponse::Ok().json(agents))
}

/// Get an agent by ID
#[utoipa::path(
    get,
    path = "/api/admin/agents/{id}",
    params(("id" = String, Path, description = "Agent ID")),
    responses(
        (status = 200, description = "Agent retrieved", body = crate::model::Agent),
        (status = 404, description = "Agent not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "agents"
)]
#[get("/api/admin/agents/{id}")]
pub async fn get_agent(
    service: web::Data<AgentService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let agent = service.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(agent))
}

/// Update an agent account
#[utoipa::path(
    patch,
    path = "/api/admin/agents/{id}",
    params(("id" = String, Path, description = "Agent ID")),
    request_body = AgentUpdate,
    responses(
        (status = 200, description = "Agent updated", body = crate::model::Agent),
        (status = 404, description = "Agent not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "agents"
)]
#[patch("/api/admin/agents/{id}")]
pub async fn update_agent(
    service: web::Data<AgentService>,
    _user: AdminUser,
    path: web::Path<String>,
    body: web::Json<AgentUpdate>,
) -> Result<HttpResponse, ApiError> {
    let agent = service.update(&path.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(agent))
}

/// Deactivate an agent account
#[utoipa::path(
    delete,
    path = "/api/admin/agents/{id}",
    params(("id" = String, Path, description = "Agent ID")),
    responses(
        (status = 204, description = "Agent deactivated"),
        (status = 404, description = "Agent not found", body = crate::api::error::ErrorResponse)
    ),
    tag = "agents"
)]
#[delete("/api/admin/agents/{id}")]
pub async fn deactivate_agent(
    service: web::Data<AgentService>,
    _user: AdminUser,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    service.deactivate(&path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure agent routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_agent)
        .service(list_agents)
        .service(get_agent)
        .service(update_agent)
        .service(deactivate_agent);
}
