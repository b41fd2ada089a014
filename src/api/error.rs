//! Unified API error handling
//!
//! This module provides a consistent error response format across all API endpoints.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

/// Standard error response format
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type/code
    pub error: String,
    /// Human-readable error message
    pub message: String,
    /// Unique request ID for tracing
    pub request_id: String,
}

/// Unified API error type
///
/// All API endpoints should return `Result<T, ApiError>` for consistent error handling.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Client not found (404)
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Document not found (404)
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    /// Creditor not found (404)
    #[error("Creditor not found: {0}")]
    CreditorNotFound(String),

    /// Agent not found (404)
    #[error("Agent not found: {0}")]
    AgentNotFound(String),

    /// Bad request / validation error (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but not allowed (403)
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Conflicting state (409)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database error (500)
    #[error("Database error: {0}")]
    Database(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)
            | ApiError::ClientNotFound(_)
            | ApiError::DocumentNotFound(_)
            | ApiError::CreditorNotFound(_)
            | ApiError::AgentNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error_type = match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::ClientNotFound(_) => "client_not_found",
            ApiError::DocumentNotFound(_) => "document_not_found",
            ApiError::CreditorNotFound(_) => "creditor_not_found",
            ApiError::AgentNotFound(_) => "agent_not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Unauthorized(_) => "unauthorized",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::Conflict(_) => "conflict",
            ApiError::Internal(_) => "internal_error",
            ApiError::Database(_) => "database_error",
        };

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        HttpResponse::build(status).json(ErrorResponse {
            error: error_type.to_string(),
            message: self.to_string(),
            request_id: Uuid::new_v4().to_string(),
        })
    }
}

// ============================================================================
// From conversions for service errors
// ============================================================================

impl From<crate::db::DbError> for ApiError {
    fn from(err: crate::db::DbError) -> Self {
        match err {
            crate::db::DbError::NotFound(id) => ApiError::NotFound(id),
            crate::db::DbError::Conflict(what) => ApiError::Conflict(what),
            _ => ApiError::Database(err.to_string()),
        }
    }
}

impl From<crate::service::ClientError> for ApiError {
    fn from(err: crate::service::ClientError) -> Self {
        use crate::service::ClientError;
        match err {
            ClientError::Db(crate::db::DbError::NotFound(id)) => ApiError::ClientNotFound(id),
            ClientError::Db(e) => e.into(),
            ClientError::Validation(msg) => ApiError::BadRequest(msg),
            ClientError::DuplicateAktenzeichen(az) => {
                ApiError::Conflict(format!("aktenzeichen already in use: {}", az))
            }
        }
    }
}

impl From<crate::service::DocumentError> for ApiError {
    fn from(err: crate::service::DocumentError) -> Self {
        use crate::service::DocumentError;
        match err {
            DocumentError::Db(crate::db::DbError::NotFound(id)) => ApiError::DocumentNotFound(id),
            DocumentError::Db(e) => e.into(),
            DocumentError::AlreadyClassified => {
                ApiError::Conflict("document is already classified".to_string())
            }
            DocumentError::NotClassified => {
                ApiError::BadRequest("document has no classification to correct".to_string())
            }
            DocumentError::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<crate::service::CreditorError> for ApiError {
    fn from(err: crate::service::CreditorError) -> Self {
        use crate::service::CreditorError;
        match err {
            CreditorError::Db(crate::db::DbError::NotFound(id)) => ApiError::CreditorNotFound(id),
            CreditorError::Db(e) => e.into(),
            CreditorError::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<crate::service::SettlementError> for ApiError {
    fn from(err: crate::service::SettlementError) -> Self {
        use crate::service::SettlementError;
        match err {
            SettlementError::Db(crate::db::DbError::NotFound(id)) => ApiError::ClientNotFound(id),
            SettlementError::Db(e) => e.into(),
            SettlementError::Garnishment(e) => ApiError::BadRequest(e.to_string()),
            SettlementError::NoCreditors => {
                ApiError::BadRequest("client has no creditors to distribute over".to_string())
            }
            SettlementError::MissingFinancialData => {
                ApiError::BadRequest("no financial data on file for client".to_string())
            }
        }
    }
}

impl From<crate::service::AgentError> for ApiError {
    fn from(err: crate::service::AgentError) -> Self {
        use crate::service::AgentError;
        match err {
            AgentError::Db(crate::db::DbError::NotFound(id)) => ApiError::AgentNotFound(id),
            AgentError::Db(e) => e.into(),
            AgentError::Hash(e) => ApiError::Internal(e.to_string()),
            AgentError::InvalidCredentials => {
                ApiError::Unauthorized("invalid username or password".to_string())
            }
            AgentError::Inactive => ApiError::Forbidden("account is deactivated".to_string()),
            AgentError::Validation(msg) => ApiError::BadRequest(msg),
        }
    }
}

impl From<crate::service::AuthError> for ApiError {
    fn from(err: crate::service::AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbError;
    use crate::service::SettlementError;

    #[test]
    fn settlement_validation_errors_map_to_bad_request() {
        let e: ApiError = SettlementError::NoCreditors.into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(e, ApiError::BadRequest(_)));

        let e: ApiError = SettlementError::MissingFinancialData.into();
        assert_eq!(e.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(e, ApiError::BadRequest(_)));
    }

    #[test]
    fn missing_client_maps_to_not_found() {
        let e: ApiError = SettlementError::Db(DbError::NotFound("MAND-1".into())).into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
        assert!(matches!(e, ApiError::ClientNotFound(_)));
    }

    #[test]
    fn duplicate_aktenzeichen_maps_to_conflict() {
        let e: ApiError =
            crate::service::ClientError::DuplicateAktenzeichen("MAND-1".into()).into();
        assert_eq!(e.status_code(), StatusCode::CONFLICT);
    }
}
