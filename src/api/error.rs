//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::assessment::ANALYSIS_FAILED_MESSAGE;
use crate::auth::LoginError;
use crate::core_state::CoreError;
use crate::forms::FormError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Login rejected: {0}")]
    LoginRejected(String),
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Analysis failed")]
    AnalysisFailed,
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "AUTH_REQUIRED",
                "Authentication required".to_string(),
            ),
            ApiError::NotFound(detail) => (StatusCode::NOT_FOUND, "NOT_FOUND", detail.clone()),
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::LoginRejected(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LOGIN_REJECTED",
                detail.clone(),
            ),
            ApiError::Validation(detail) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_FAILED",
                detail.clone(),
            ),
            ApiError::Conflict(detail) => (StatusCode::CONFLICT, "CONFLICT", detail.clone()),
            ApiError::AnalysisFailed => (
                StatusCode::BAD_GATEWAY,
                "ANALYSIS_FAILED",
                ANALYSIS_FAILED_MESSAGE.to_string(),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };
        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::NotAuthenticated => ApiError::Unauthorized,
            CoreError::Login(
                e @ (LoginError::EmptyCredentials | LoginError::PasswordTooShort),
            ) => ApiError::LoginRejected(e.to_string()),
            CoreError::Login(e) => ApiError::Internal(e.to_string()),
            CoreError::Form(e) => ApiError::Validation(e.to_string()),
            CoreError::Chat(e) => ApiError::BadRequest(e.to_string()),
            CoreError::ChatCleared => ApiError::Conflict(CoreError::ChatCleared.to_string()),
            // Cause already logged by the assessment service
            CoreError::Analysis(_) => ApiError::AnalysisFailed,
            CoreError::LockPoisoned => ApiError::Internal("lock poisoned".into()),
            CoreError::ModelSetup(e) => ApiError::Internal(e.to_string()),
            CoreError::Storage(e) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<FormError> for ApiError {
    fn from(err: FormError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{AnalysisError, ModelError, Operation};
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let body = to_bytes(response.into_body(), 4096).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn unauthorized_returns_401() {
        let response = ApiError::Unauthorized.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "AUTH_REQUIRED");
    }

    #[tokio::test]
    async fn not_found_returns_404() {
        let response = ApiError::NotFound("Unknown persona: extreme".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_returns_500_without_detail() {
        let response = ApiError::Internal("something broke".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn analysis_failure_returns_502_with_normalized_message() {
        let core = CoreError::Analysis(AnalysisError::new(
            Operation::ClaimFraud,
            ModelError::Status {
                status: 500,
                body: "upstream detail".into(),
            },
        ));
        let response = ApiError::from(core).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "ANALYSIS_FAILED");
        assert_eq!(json["error"]["message"], ANALYSIS_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn short_password_returns_422_with_inline_message() {
        let api_err: ApiError = CoreError::Login(LoginError::PasswordTooShort).into();
        let response = api_err.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let json = body_json(response).await;
        assert_eq!(json["error"]["message"], "Password must be at least 6 characters");
    }

    #[tokio::test]
    async fn missing_fields_return_422() {
        let api_err: ApiError = CoreError::Form(FormError::MissingRequired(vec!["age"])).into();
        assert_eq!(api_err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn core_error_not_authenticated_maps_to_401() {
        let api_err: ApiError = CoreError::NotAuthenticated.into();
        assert_eq!(api_err.into_response().status(), StatusCode::UNAUTHORIZED);
    }
}
