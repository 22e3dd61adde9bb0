mod config;

use std::any::Any;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Json, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::error;
use waypoint_agents::ConciergePipeline;
use waypoint_core::{ConversationTurn, PipelineError};
use waypoint_geo::GoogleMapsClient;
use waypoint_llm::OllamaBackend;
use waypoint_observability::{AppMetrics, MetricsSnapshot};

pub use config::{RuntimeConfig, DEFAULT_BIND};

pub type Pipeline = ConciergePipeline<OllamaBackend, GoogleMapsClient>;

#[derive(Clone)]
pub struct ApiState {
    pub pipeline: Arc<Pipeline>,
    pub metrics: Arc<AppMetrics>,
    pub maps_key_configured: bool,
    pub allowed_origins: Arc<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SendMessageRequest {
    prompt: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp_utc: String,
    metrics: MetricsSnapshot,
    capabilities: HealthCapabilities,
}

#[derive(Debug, Serialize)]
struct HealthCapabilities {
    maps_key_configured: bool,
    model: String,
}

pub async fn build_app() -> Result<Router> {
    build_app_with_config(RuntimeConfig::from_env()).await
}

pub async fn build_app_with_config(config: RuntimeConfig) -> Result<Router> {
    let metrics = AppMetrics::shared();

    let backend = Arc::new(
        OllamaBackend::new(config.ollama).context("failed to build generative backend client")?,
    );
    let gateway =
        GoogleMapsClient::new(config.maps).context("failed to build Google Maps client")?;
    let maps_key_configured = gateway.has_api_key();

    let pipeline = Arc::new(ConciergePipeline::new(
        backend,
        Arc::new(gateway),
        metrics.clone(),
    ));

    let state = ApiState {
        pipeline,
        metrics,
        maps_key_configured,
        allowed_origins: Arc::new(config.allowed_origins),
    };

    Ok(build_router(state))
}

pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/send-message", post(send_message))
        .layer(build_cors_layer(&state.allowed_origins))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(RequestBodyLimitLayer::new(64 * 1024))
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let payload = HealthResponse {
        status: "ok",
        timestamp_utc: chrono::Utc::now().to_rfc3339(),
        metrics: state.metrics.snapshot(),
        capabilities: HealthCapabilities {
            maps_key_configured: state.maps_key_configured,
            model: state.pipeline.model_name().to_string(),
        },
    };
    (StatusCode::OK, Json(payload))
}

async fn send_message(
    State(state): State<ApiState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<Json<ConversationTurn>, ApiError> {
    let turn = state.pipeline.handle(&request.prompt).await?;
    Ok(Json(turn))
}

#[derive(Debug)]
pub struct ApiError(PipelineError);

impl From<PipelineError> for ApiError {
    fn from(error: PipelineError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PipelineError::Parse { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Failed to parse JSON from LLM.",
            ),
            PipelineError::Validation { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "LLM output failed intent validation.",
            ),
            PipelineError::Transport { .. } => (
                StatusCode::BAD_GATEWAY,
                "Failed to get response from generative backend.",
            ),
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "kind": self.0.kind(),
                "llm_raw": self.0.raw(),
                "reason": self.0.reason(),
            })),
        )
            .into_response()
    }
}

fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(serde_json::json!({
            "error": "internal_error",
            "message": "Unexpected server error."
        })),
    )
        .into_response()
}

fn build_cors_layer(allowed_origins: &Arc<Vec<String>>) -> CorsLayer {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect::<Vec<_>>();
    let origins = if origins.is_empty() {
        vec![HeaderValue::from_static("http://localhost:5500")]
    } else {
        origins
    };

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
