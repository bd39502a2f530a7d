//! REST API handlers for campaign runs and operational endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use campaign_agents::WorkflowEngine;
use campaign_core::types::CampaignState;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};
use utoipa::ToSchema;

/// Shared application state for REST handlers.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<WorkflowEngine>,
    pub node_id: String,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(engine: Arc<WorkflowEngine>, node_id: impl Into<String>) -> Self {
        Self {
            engine,
            node_id: node_id.into(),
            start_time: Instant::now(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RunCampaignRequest {
    /// Free-text campaign goal.
    #[serde(default)]
    pub intent_brief: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn with_status(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(ErrorResponse {
                error: error.into(),
            }),
        )
            .into_response()
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub node_id: String,
    pub uptime_secs: u64,
}

const BRIEF_REQUIRED: &str = "intent_brief is required";

/// POST /api/run-campaign: run the full workflow for one brief.
#[utoipa::path(
    post,
    path = "/api/run-campaign",
    tag = "Campaigns",
    request_body = RunCampaignRequest,
    responses(
        (status = 200, description = "Final campaign state", body = CampaignState),
        (status = 400, description = "Missing intent_brief", body = ErrorResponse),
        (status = 500, description = "Workflow failure", body = ErrorResponse),
    )
)]
pub async fn run_campaign(
    State(state): State<AppState>,
    payload: Result<Json<RunCampaignRequest>, JsonRejection>,
) -> Response {
    metrics::counter!("api.requests", "endpoint" => "run_campaign").increment(1);

    let brief = match payload {
        Ok(Json(RunCampaignRequest {
            intent_brief: Some(brief),
        })) if !brief.trim().is_empty() => brief,
        Ok(_) => {
            warn!("Campaign request without intent_brief");
            metrics::counter!("api.validation_errors").increment(1);
            return ErrorResponse::with_status(StatusCode::BAD_REQUEST, BRIEF_REQUIRED);
        }
        Err(rejection) => {
            warn!(error = %rejection, "Unreadable campaign request body");
            metrics::counter!("api.validation_errors").increment(1);
            return ErrorResponse::with_status(StatusCode::BAD_REQUEST, BRIEF_REQUIRED);
        }
    };

    match state.engine.run(&brief).await {
        Ok(final_state) => {
            info!(
                segments = final_state.audience_segments.len(),
                content = final_state.content.len(),
                "Campaign request served"
            );
            (StatusCode::OK, Json(final_state)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Campaign workflow failed");
            metrics::counter!("api.errors").increment(1);
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/hello: liveness message for the frontend.
#[utoipa::path(
    get,
    path = "/api/hello",
    tag = "Operations",
    responses((status = 200, description = "Backend is up", body = MessageResponse))
)]
pub async fn hello() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Backend is running!".to_string(),
    })
}

/// GET /: service banner.
#[utoipa::path(
    get,
    path = "/",
    tag = "Operations",
    responses((status = 200, description = "Service banner", body = StatusResponse))
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Campaign Manager Backend API".to_string(),
        status: "active".to_string(),
    })
}

/// GET /health: Health check endpoint.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Operations",
    responses((status = 200, description = "Node health", body = HealthResponse))
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        node_id: state.node_id.clone(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// GET /ready: Readiness probe.
///
/// The workflow engine is built before the router exists, so a serving node
/// is always ready.
#[utoipa::path(
    get,
    path = "/ready",
    tag = "Operations",
    responses((status = 200, description = "Ready to accept traffic"))
)]
pub async fn readiness() -> StatusCode {
    StatusCode::OK
}

/// GET /live: Liveness probe.
#[utoipa::path(
    get,
    path = "/live",
    tag = "Operations",
    responses((status = 200, description = "Process is alive"))
)]
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
