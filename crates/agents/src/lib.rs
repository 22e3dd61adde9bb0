mod extractor;
mod router;
mod synthesizer;
#[cfg(test)]
mod testing;

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, instrument};
use uuid::Uuid;
use waypoint_core::{ConversationTurn, IntentRecord, PipelineError, PromptBuilder};
use waypoint_geo::GeoGateway;
use waypoint_llm::GenerativeBackend;
use waypoint_observability::AppMetrics;

pub use extractor::IntentExtractor;
pub use router::IntentRouter;
pub use synthesizer::{ResponseSynthesizer, SynthesizedReply};

pub struct ConciergePipeline<B, G> {
    backend: Arc<B>,
    extractor: IntentExtractor<B>,
    router: IntentRouter<B, G>,
    synthesizer: ResponseSynthesizer<B>,
    metrics: Arc<AppMetrics>,
}

impl<B, G> ConciergePipeline<B, G>
where
    B: GenerativeBackend,
    G: GeoGateway,
{
    pub fn new(backend: Arc<B>, gateway: Arc<G>, metrics: Arc<AppMetrics>) -> Self {
        Self {
            extractor: IntentExtractor::new(backend.clone(), metrics.clone()),
            router: IntentRouter::new(backend.clone(), gateway, metrics.clone()),
            synthesizer: ResponseSynthesizer::new(backend.clone(), metrics.clone()),
            backend,
            metrics,
        }
    }

    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    pub fn prompts(&self) -> &PromptBuilder {
        self.extractor.prompts()
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    #[instrument(skip(self, message), fields(turn_id = %Uuid::new_v4()))]
    pub async fn handle(&self, message: &str) -> Result<ConversationTurn, PipelineError> {
        let started = Instant::now();
        self.metrics.inc_request();

        let outcome = self.run_turn(message).await;

        self.metrics.observe_latency(started.elapsed());
        if let Err(err) = &outcome {
            info!(
                kind = err.kind(),
                latency_ms = started.elapsed().as_millis() as u64,
                "turn rejected"
            );
        }
        outcome
    }

    pub async fn classify(&self, message: &str) -> Result<IntentRecord, PipelineError> {
        self.extractor.extract(message).await
    }

    async fn run_turn(&self, message: &str) -> Result<ConversationTurn, PipelineError> {
        let started = Instant::now();
        let record = self.extractor.extract(message).await?;
        let result = self.router.route(&record).await;
        let reply = self.synthesizer.synthesize(&record, &result).await;

        info!(
            intent = record.intent.as_str(),
            gateway_result = result.kind(),
            synthesis = reply.case,
            latency_ms = started.elapsed().as_millis() as u64,
            "turn handled"
        );

        Ok(ConversationTurn {
            intent_record: record,
            gateway_result: result,
            final_reply: reply.text,
        })
    }
}
