pub mod error;
pub mod intent;
pub mod models;
pub mod prompt;
pub mod routing;
pub mod synthesis;

pub use error::{ExtractionError, PipelineError};
pub use intent::parse_intent_record;
pub use models::*;
pub use prompt::{PromptBuilder, INTENT_FIELD_ORDER};
pub use routing::{
    plan_route, DirectionState, RoutePlan, INCOMPLETE_DIRECTIONS_MESSAGE, NO_QUERY_MESSAGE,
    ORIGIN_NOT_FOUND_MESSAGE,
};
pub use synthesis::{SynthesisCase, CANNED_REPLY, DEGRADED_REPLY, GENERAL_REPLY_FAILED};
