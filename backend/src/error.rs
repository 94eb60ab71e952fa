use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::quota::{PlanParseError, QuotaGate, ResourceKind, UsageVerdict};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("store error: {0}")]
    Store(#[from] anyhow::Error),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("{} quota reached ({} of {:?})", .kind.as_str(), .verdict.count, .verdict.limit.as_limit())]
    QuotaExceeded {
        kind: ResourceKind,
        verdict: UsageVerdict,
    },
}

impl From<PlanParseError> for AppError {
    fn from(err: PlanParseError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::QuotaExceeded { kind, verdict } => {
                tracing::debug!(kind = kind.as_str(), count = verdict.count, "quota exceeded");
                let body = json!({
                    "error": "quota_exceeded",
                    "kind": kind,
                    "gate": QuotaGate::from_verdict(&verdict),
                    "count": verdict.count,
                    "limit": verdict.limit,
                    "is_limit_reached": verdict.is_limit_reached,
                });
                (StatusCode::PAYMENT_REQUIRED, Json(body)).into_response()
            }
            other => {
                let status = match other {
                    AppError::NotFound => StatusCode::NOT_FOUND,
                    AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
                    AppError::Store(_) | AppError::QuotaExceeded { .. } => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                if status.is_server_error() {
                    tracing::error!(error = ?other);
                } else {
                    tracing::debug!(error = %other);
                }
                (status, other.to_string()).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
