//! Request handlers: thin wrappers around the orchestrator and the
//! startup-time ticket cache.

use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

use crate::errors::TriageError;
use crate::orchestrator::TriageOutcome;
use crate::server::state::AppState;
use crate::types::ClassifiedTicket;

#[derive(Debug, Deserialize)]
pub struct Query {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// GET / - liveness
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok",
        service: "helpdesk-triage",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health
pub async fn health() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "healthy",
        service: "helpdesk-triage",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /api/tickets - the cached classified sample tickets
pub async fn get_tickets(State(state): State<Arc<AppState>>) -> Json<Vec<ClassifiedTicket>> {
    Json(state.tickets.clone())
}

/// POST /api/classify_answer - triage one free-text question
pub async fn classify_answer(
    State(state): State<Arc<AppState>>,
    Json(query): Json<Query>,
) -> Result<Json<TriageOutcome>, ApiError> {
    let text = query.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("text cannot be empty".to_string()));
    }

    let outcome = state.orchestrator.handle(text).await?;
    Ok(Json(outcome))
}

/// Error response mapping. Classifier failures never reach here (they are
/// absorbed into the fallback labels); what remains is either a bad request
/// or an infrastructure failure.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Upstream(String),
    Internal(String),
}

impl From<TriageError> for ApiError {
    fn from(err: TriageError) -> Self {
        match err {
            TriageError::IndexUnavailable(_)
            | TriageError::Generation(_)
            | TriageError::Provider(_) => ApiError::Upstream(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Upstream(message) => {
                error!(%message, "upstream failure");
                (StatusCode::BAD_GATEWAY, message)
            }
            ApiError::Internal(message) => {
                error!(%message, "internal failure");
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };

        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infrastructure_errors_map_to_bad_gateway() {
        let err: ApiError = TriageError::IndexUnavailable("down".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));

        let err: ApiError = TriageError::Generation("boom".to_string()).into();
        assert!(matches!(err, ApiError::Upstream(_)));
    }

    #[test]
    fn test_other_errors_map_to_internal() {
        let err: ApiError = TriageError::Config("bad".to_string()).into();
        assert!(matches!(err, ApiError::Internal(_)));
    }
}
