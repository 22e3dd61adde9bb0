use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("classifier output is not valid JSON: {reason}")]
    Parse { raw: String, reason: String },

    #[error("classifier output violates the intent record schema: {reason}")]
    Validation { raw: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("generative backend unavailable: {reason}")]
    Transport { raw: String, reason: String },

    #[error("classifier output is not valid JSON: {reason}")]
    Parse { raw: String, reason: String },

    #[error("classifier output violates the intent record schema: {reason}")]
    Validation { raw: String, reason: String },
}

impl PipelineError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport_failure",
            Self::Parse { .. } => "parse_failure",
            Self::Validation { .. } => "validation_failure",
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            Self::Transport { raw, .. } | Self::Parse { raw, .. } | Self::Validation { raw, .. } => {
                raw
            }
        }
    }

    pub fn reason(&self) -> &str {
        match self {
            Self::Transport { reason, .. }
            | Self::Parse { reason, .. }
            | Self::Validation { reason, .. } => reason,
        }
    }
}

impl From<ExtractionError> for PipelineError {
    fn from(error: ExtractionError) -> Self {
        match error {
            ExtractionError::Parse { raw, reason } => Self::Parse { raw, reason },
            ExtractionError::Validation { raw, reason } => Self::Validation { raw, reason },
        }
    }
}
