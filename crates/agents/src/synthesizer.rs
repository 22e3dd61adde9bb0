use std::sync::Arc;

use tracing::warn;
use waypoint_core::{
    GatewayResult, IntentRecord, PromptBuilder, SynthesisCase, CANNED_REPLY, DEGRADED_REPLY,
};
use waypoint_llm::GenerativeBackend;
use waypoint_observability::AppMetrics;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizedReply {
    pub text: String,
    pub case: &'static str,
}

pub struct ResponseSynthesizer<B> {
    backend: Arc<B>,
    prompts: PromptBuilder,
    metrics: Arc<AppMetrics>,
}

impl<B> ResponseSynthesizer<B>
where
    B: GenerativeBackend,
{
    pub fn new(backend: Arc<B>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            backend,
            prompts: PromptBuilder::new(),
            metrics,
        }
    }

    pub async fn synthesize(&self, record: &IntentRecord, result: &GatewayResult) -> SynthesizedReply {
        let case = SynthesisCase::select(record, result);
        let text = self.render(case, record).await;
        SynthesizedReply {
            text,
            case: case.name(),
        }
    }

    async fn render(&self, case: SynthesisCase<'_>, record: &IntentRecord) -> String {
        let Some(prompt) = case.render_prompt(&self.prompts, record) else {
            self.metrics.inc_fallback();
            return CANNED_REPLY.to_string();
        };

        self.metrics.inc_backend_call();
        match self.backend.complete(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                self.metrics.inc_fallback();
                warn!(error = %err, case = case.name(), "synthesis call failed");
                DEGRADED_REPLY.to_string()
            }
        }
    }
}
