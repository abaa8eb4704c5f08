use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::DbError;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Upstream error: {0}")]
    Upstream(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type HubResult<T> = Result<T, HubError>;

impl HubError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            HubError::NotFound(_) => StatusCode::NOT_FOUND,
            HubError::InvalidRequest(_) | HubError::Conflict(_) => StatusCode::BAD_REQUEST,
            HubError::Forbidden(_) => StatusCode::FORBIDDEN,
            HubError::Upstream(_) => StatusCode::BAD_GATEWAY,
            HubError::DatabaseError(_) | HubError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err_msg = match self {
            HubError::NotFound(msg)
            | HubError::InvalidRequest(msg)
            | HubError::Conflict(msg)
            | HubError::Forbidden(msg) => msg,
            HubError::Upstream(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                "Upstream service unavailable".to_string()
            }
            HubError::DatabaseError(msg) | HubError::InternalError(msg) => {
                // Detail stays in the server log
                tracing::error!("Request failed: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": err_msg
        }));

        (status, body).into_response()
    }
}

// DbError to HubError conversion implementation
impl From<DbError> for HubError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionError(msg) | DbError::QueryError(msg) => {
                HubError::DatabaseError(msg)
            }
            DbError::Conflict(msg) => HubError::Conflict(msg),
            DbError::NotFound(msg) => HubError::NotFound(msg),
        }
    }
}

// Malformed bodies get the same error shape as validation failures
impl From<JsonRejection> for HubError {
    fn from(rejection: JsonRejection) -> Self {
        HubError::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for HubError {
    fn from(rejection: QueryRejection) -> Self {
        HubError::InvalidRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            HubError::InvalidRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(HubError::Conflict("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(HubError::Forbidden("x".into()).status_code(), StatusCode::FORBIDDEN);
        assert_eq!(HubError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(HubError::Upstream("x".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            HubError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_db_error_conversion() {
        let conflict: HubError = DbError::Conflict("dup".into()).into();
        assert!(matches!(conflict, HubError::Conflict(msg) if msg == "dup"));

        let query: HubError = DbError::QueryError("boom".into()).into();
        assert!(matches!(query, HubError::DatabaseError(_)));
    }

    #[test]
    fn test_internal_detail_is_hidden() {
        let response = HubError::DatabaseError("password=hunter2".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
