//! Login endpoints and request authentication extractors

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{post, web, FromRequest, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::error::ApiError;
use crate::model::{Agent, Config};
use crate::service::auth::Claims;
use crate::service::{AgentService, TokenService};

/// Admin login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AdminLoginRequest {
    pub email: String,
    pub password: String,
}

/// Agent login request
#[derive(Debug, Deserialize, ToSchema)]
pub struct AgentLoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminLoginResponse {
    pub token: String,
    pub role: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AgentLoginResponse {
    pub token: String,
    pub role: String,
    pub agent: Agent,
}

/// Administrator login with the configured credentials
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = AdminLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[post("/api/admin/login")]
pub async fn admin_login(
    config: web::Data<Config>,
    tokens: web::Data<TokenService>,
    body: web::Json<AdminLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    if body.email != config.admin_email || body.password != config.admin_password {
        tracing::warn!(email = %body.email, "Rejected admin login");
        return Err(ApiError::Unauthorized("invalid email or password".to_string()));
    }

    let token = tokens.issue_admin(&body.email)?;
    tracing::info!(email = %body.email, "Admin logged in");

    Ok(HttpResponse::Ok().json(AdminLoginResponse {
        token,
        role: crate::service::auth::ROLE_ADMIN.to_string(),
    }))
}

/// Agent login with username and password
#[utoipa::path(
    post,
    path = "/api/agents/login",
    request_body = AgentLoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AgentLoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::api::error::ErrorResponse),
        (status = 403, description = "Account deactivated", body = crate::api::error::ErrorResponse)
    ),
    tag = "auth"
)]
#[post("/api/agents/login")]
pub async fn agent_login(
    agents: web::Data<AgentService>,
    tokens: web::Data<TokenService>,
    body: web::Json<AgentLoginRequest>,
) -> Result<HttpResponse, ApiError> {
    let agent = agents.authenticate(&body.username, &body.password).await?;
    let token = tokens.issue_agent(&agent)?;

    Ok(HttpResponse::Ok().json(AgentLoginResponse {
        token,
        role: crate::service::auth::ROLE_AGENT.to_string(),
        agent,
    }))
}

fn claims_from_request(req: &HttpRequest) -> Result<Claims, ApiError> {
    let tokens = req
        .app_data::<web::Data<TokenService>>()
        .ok_or_else(|| ApiError::Internal("token service not configured".to_string()))?;

    let header = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing Authorization header".to_string()))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("expected Bearer token".to_string()))?;

    Ok(tokens.verify(token)?)
}

/// Extractor requiring an admin session.
///
/// Agent tokens are rejected with 403; the admin route surface is not
/// available to agent sessions.
pub struct AdminUser(pub Claims);

impl FromRequest for AdminUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).and_then(|claims| {
            if claims.is_admin() {
                Ok(AdminUser(claims))
            } else {
                Err(ApiError::Forbidden("admin access required".to_string()))
            }
        }))
    }
}

/// Configure auth routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(admin_login).service(agent_login);
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Utc;

    use crate::model::AgentRole;

    fn agent() -> Agent {
        Agent {
            id: "agent-1".to_string(),
            username: "mmeyer".to_string(),
            email: "m.meyer@example.de".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Meyer".to_string(),
            role: AgentRole::Agent,
            is_active: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request_with(tokens: TokenService, token: &str) -> HttpRequest {
        TestRequest::default()
            .app_data(web::Data::new(tokens))
            .insert_header(("Authorization", format!("Bearer {token}")))
            .to_http_request()
    }

    #[actix_web::test]
    async fn admin_token_passes_admin_guard() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue_admin("admin@example.de").unwrap();
        let req = request_with(tokens, &token);

        let user = AdminUser::from_request(&req, &mut Payload::None)
            .await
            .unwrap();
        assert!(user.0.is_admin());
        assert_eq!(user.0.sub, "admin@example.de");
    }

    #[actix_web::test]
    async fn agent_token_rejected_by_admin_guard() {
        let tokens = TokenService::new("test-secret");
        let token = tokens.issue_agent(&agent()).unwrap();
        let req = request_with(tokens, &token);

        let result = AdminUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Forbidden(_))));
    }

    #[actix_web::test]
    async fn missing_header_is_unauthorized() {
        let tokens = TokenService::new("test-secret");
        let req = TestRequest::default()
            .app_data(web::Data::new(tokens))
            .to_http_request();

        let result = AdminUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }

    #[actix_web::test]
    async fn garbled_token_is_unauthorized() {
        let tokens = TokenService::new("test-secret");
        let req = request_with(tokens, "not-a-jwt");

        let result = AdminUser::from_request(&req, &mut Payload::None).await;
        assert!(matches!(result, Err(ApiError::Unauthorized(_))));
    }
}
