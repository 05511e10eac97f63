use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use async_graphql::ErrorExtensions;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Empty candidate pool: {0}")]
    EmptyPool(String),

    #[error("Submission mismatch: {0}")]
    SubmissionMismatch(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl AppError {
    fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::EmptyPool(_) => "EMPTY_POOL",
            AppError::SubmissionMismatch(_) => "SUBMISSION_MISMATCH",
            AppError::Conflict(_) => "CONFLICT",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Caller-input problems. Everything else comes from infrastructure.
    pub fn is_rejected_request(&self) -> bool {
        !matches!(
            self,
            AppError::DatabaseError(_) | AppError::InternalError(_)
        )
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::EmptyPool(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::SubmissionMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Infrastructure details stay in the logs
        let error = if self.is_rejected_request() {
            log::warn!("Rejected request: {}", self);
            self.to_string()
        } else {
            log::error!("Request failed: {}", self);
            "Internal server error".to_string()
        };

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error,
            code: self.status_code().as_u16(),
        })
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}
impl From<mongodb::bson::ser::Error> for AppError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        AppError::InternalError(format!("BSON serialization error: {}", err))
    }
}
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}
impl From<async_graphql::Error> for AppError {
    fn from(err: async_graphql::Error) -> Self {
        AppError::InternalError(err.message)
    }
}
impl ErrorExtensions for AppError {
    fn extend(&self) -> async_graphql::Error {
        async_graphql::Error::new(self.to_string()).extend_with(|_err, e| {
            e.set("code", self.error_code());
        })
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(
            AppError::NotFound("test".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::ValidationError("test".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EmptyPool("test".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::SubmissionMismatch("test".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Conflict("test".into()).status_code(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_error_messages() {
        let err = AppError::SubmissionMismatch("expected 3 answers, got 2".into());
        assert_eq!(
            err.to_string(),
            "Submission mismatch: expected 3 answers, got 2"
        );
    }

    #[test]
    fn test_infrastructure_errors_are_not_rejections() {
        assert!(AppError::EmptyPool("x".into()).is_rejected_request());
        assert!(AppError::ValidationError("x".into()).is_rejected_request());
        assert!(!AppError::DatabaseError("x".into()).is_rejected_request());
        assert!(!AppError::InternalError("x".into()).is_rejected_request());
    }

    #[actix_web::test]
    async fn test_error_response_hides_infrastructure_details() {
        let resp = AppError::DatabaseError("connection refused to 10.0.0.5".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = actix_web::body::to_bytes(resp.into_body())
            .await
            .expect("body should read");
        let body = String::from_utf8_lossy(&body);
        assert!(!body.contains("10.0.0.5"));
        assert!(body.contains("Internal server error"));

        let resp = AppError::EmptyPool("course-1 has no snippets".into()).error_response();
        let body = actix_web::body::to_bytes(resp.into_body())
            .await
            .expect("body should read");
        assert!(String::from_utf8_lossy(&body).contains("course-1 has no snippets"));
    }

    #[test]
    fn test_graphql_extension_carries_code() {
        let err = AppError::EmptyPool("course-1".into()).extend();
        let code = err
            .extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .cloned();
        assert_eq!(
            code,
            Some(async_graphql::Value::from("EMPTY_POOL"))
        );
    }
}
