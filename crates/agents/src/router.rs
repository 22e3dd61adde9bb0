use std::sync::Arc;

use tracing::{info, warn};
use waypoint_core::{
    plan_route, GatewayResult, IntentRecord, PromptBuilder, RoutePlan, StatusMessage,
    GENERAL_REPLY_FAILED,
};
use waypoint_geo::GeoGateway;
use waypoint_llm::GenerativeBackend;
use waypoint_observability::AppMetrics;

pub struct IntentRouter<B, G> {
    backend: Arc<B>,
    gateway: Arc<G>,
    prompts: PromptBuilder,
    metrics: Arc<AppMetrics>,
}

impl<B, G> IntentRouter<B, G>
where
    B: GenerativeBackend,
    G: GeoGateway,
{
    pub fn new(backend: Arc<B>, gateway: Arc<G>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            backend,
            gateway,
            prompts: PromptBuilder::new(),
            metrics,
        }
    }

    pub async fn route(&self, record: &IntentRecord) -> GatewayResult {
        match plan_route(record) {
            RoutePlan::SearchPlaces { query } => {
                self.metrics.inc_gateway_call();
                let result = self.gateway.search_places(&query).await;
                log_gateway_outcome("search_places", &result);
                result
            }
            RoutePlan::Directions {
                origin,
                destination,
            } => {
                self.metrics.inc_gateway_call();
                let result = self.gateway.get_directions(&origin, &destination).await;
                log_gateway_outcome("get_directions", &result);
                result
            }
            RoutePlan::ScopeLimitedReply => self.scope_limited_reply(&record.raw_response).await,
            RoutePlan::Halt(status) => {
                info!(
                    intent = record.intent.as_str(),
                    status = %status.message,
                    "route halted before gateway"
                );
                GatewayResult::StatusMessage(status)
            }
        }
    }

    async fn scope_limited_reply(&self, message: &str) -> GatewayResult {
        let prompt = self.prompts.scope_limited_reply(message);

        self.metrics.inc_backend_call();
        match self.backend.complete(&prompt).await {
            Ok(text) => GatewayResult::StatusMessage(StatusMessage::new(text.trim())),
            Err(err) => {
                warn!(error = %err, "general reply call failed");
                GatewayResult::status(GENERAL_REPLY_FAILED)
            }
        }
    }
}

fn log_gateway_outcome(operation: &str, result: &GatewayResult) {
    match result.status_message() {
        Some(status) => warn!(operation, status, "gateway lookup degraded"),
        None => info!(operation, kind = result.kind(), "gateway lookup succeeded"),
    }
}
