/// Error types for blog-service
///
/// Every handler returns `Result<HttpResponse>`; errors are turned into JSON
/// bodies of the form `{"error": ..., "status": ...}`. A failed ownership check
/// is the exception: it becomes a `303 See Other` pointing at the canonical
/// read view instead of an error page.
use crate::policy::PolicyError;
use actix_web::{error::ResponseError, http::header, http::StatusCode, HttpResponse};
use thiserror::Error;

/// Result type for blog-service operations
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Redirect to the given location
    #[error("See other: {0}")]
    Redirect(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Map a policy failure on a post (or one of its comments) to the response
    /// the client sees.
    pub fn from_policy(err: PolicyError, post_id: uuid::Uuid) -> Self {
        match err {
            PolicyError::NotVisible => AppError::NotFound("Post not found".to_string()),
            PolicyError::NotOwner => AppError::Redirect(post_location(post_id)),
        }
    }
}

/// Canonical read view of a post.
pub fn post_location(post_id: uuid::Uuid) -> String {
    format!("/api/v1/posts/{}", post_id)
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Redirect(_) => StatusCode::SEE_OTHER,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        if let AppError::Redirect(location) = self {
            return HttpResponse::build(status)
                .insert_header((header::LOCATION, location.as_str()))
                .finish();
        }

        // Driver errors stay in the logs
        let error_msg = match self {
            AppError::Database(err) => {
                tracing::error!(error = %err, "database error");
                "Database error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(status).json(serde_json::json!({
            "error": error_msg,
            "status": status.as_u16(),
        }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
