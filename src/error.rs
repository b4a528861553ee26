use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("missing required field `{0}`")]
    InvalidRequest(&'static str),

    #[error("question is locked after {wrong_count} wrong answers")]
    AlreadyLocked { wrong_count: i64 },

    #[error("admin credential rejected")]
    Forbidden,

    #[error("attempt store failure: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for AttemptError {
    fn into_response(self) -> Response {
        match self {
            Self::InvalidRequest(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "missing_fields" })),
            )
                .into_response(),
            Self::AlreadyLocked { wrong_count } => (
                StatusCode::LOCKED,
                Json(json!({ "error": "locked", "wrong_count": wrong_count })),
            )
                .into_response(),
            Self::Forbidden => {
                (StatusCode::FORBIDDEN, Json(json!({ "error": "forbidden" }))).into_response()
            }
            Self::Store(e) => {
                tracing::error!(error = %e, "attempt store failure");
                db_error()
            }
        }
    }
}

/// Errors from the read-only answer key lookups.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0} is required")]
    MissingParam(&'static str),

    #[error("{0} must be a number")]
    NotANumber(&'static str),

    #[error("answer key query failed: {0}")]
    Store(#[from] sqlx::Error),
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingParam(_) | Self::NotANumber(_) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": self.to_string() })),
            )
                .into_response(),
            Self::Store(e) => {
                tracing::error!(error = %e, "answer key query failed");
                db_error()
            }
        }
    }
}

fn db_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "db_error" })),
    )
        .into_response()
}
