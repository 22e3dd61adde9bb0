mod ollama;
mod stream;

use std::time::Duration;

use thiserror::Error;

pub use ollama::{OllamaBackend, OllamaConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use stream::StreamAssembler;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("generative backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generative backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generative backend stream broke off: {source}")]
    Stream {
        partial: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("generative backend did not finish within {0:?}")]
    Timeout(Duration),
}

impl BackendError {
    pub fn partial_output(&self) -> &str {
        match self {
            Self::Stream { partial, .. } => partial,
            _ => "",
        }
    }
}

pub trait GenerativeBackend: Send + Sync {
    fn model_name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<String, BackendError>;
}
