use std::sync::Arc;

use tracing::{debug, warn};
use waypoint_core::{parse_intent_record, IntentRecord, PipelineError, PromptBuilder};
use waypoint_llm::GenerativeBackend;
use waypoint_observability::AppMetrics;

pub struct IntentExtractor<B> {
    backend: Arc<B>,
    prompts: PromptBuilder,
    metrics: Arc<AppMetrics>,
}

impl<B> IntentExtractor<B>
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

    pub fn prompts(&self) -> &PromptBuilder {
        &self.prompts
    }

    pub async fn extract(&self, message: &str) -> Result<IntentRecord, PipelineError> {
        let prompt = self.prompts.classification(message);

        self.metrics.inc_backend_call();
        let raw = match self.backend.complete(&prompt).await {
            Ok(raw) => raw,
            Err(err) => {
                self.metrics.inc_classification_failure();
                warn!(error = %err, model = self.backend.model_name(), "classification call failed");
                return Err(PipelineError::Transport {
                    raw: err.partial_output().to_string(),
                    reason: err.to_string(),
                });
            }
        };
        debug!(raw = %raw, "classifier output");

        let record = parse_intent_record(&raw, message).map_err(|err| {
            self.metrics.inc_classification_failure();
            warn!(error = %err, "classifier output rejected");
            PipelineError::from(err)
        })?;

        if !record.origin_flag_consistent() {
            warn!(
                intent = record.intent.as_str(),
                "needs_origin set outside a direction request; ignoring it"
            );
        }

        Ok(record)
    }
}
