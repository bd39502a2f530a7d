//! OpenAPI specification and Swagger UI configuration.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Campaign Manager API",
        version = "0.1.0",
        description = "Turns a free-text campaign brief into audience segments, per-segment email or banner content and a pending review task.",
        license(name = "MIT"),
    ),
    tags(
        (name = "Campaigns", description = "Campaign workflow runs"),
        (name = "Operations", description = "Banner, health, readiness, and liveness probes"),
    ),
    paths(
        crate::rest::run_campaign,
        crate::rest::hello,
        crate::rest::root,
        crate::rest::health_check,
        crate::rest::readiness,
        crate::rest::liveness,
    ),
    components(schemas(
        campaign_core::types::CampaignState,
        campaign_core::types::ContentPiece,
        campaign_core::types::Channel,
        campaign_core::types::ReviewTask,
        campaign_core::types::ReviewStatus,
        crate::rest::RunCampaignRequest,
        crate::rest::ErrorResponse,
        crate::rest::MessageResponse,
        crate::rest::StatusResponse,
        crate::rest::HealthResponse,
    ))
)]
pub struct ApiDoc;
