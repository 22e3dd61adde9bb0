use crate::models::{DirectionInfo, GatewayResult, Intent, IntentRecord, Place};
use crate::prompt::PromptBuilder;

pub const CANNED_REPLY: &str = "Terima kasih! Aku bisa bantu cari tempat, arah, dan rekomendasi di sekitar kamu. Coba kasih tahu kamu mau cari apa ya 😊";
pub const DEGRADED_REPLY: &str = "Maaf, sistem sedang sibuk. Coba lagi sebentar ya.";
pub const GENERAL_REPLY_FAILED: &str = "Sorry, I couldn't respond naturally.";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynthesisCase<'a> {
    AskForOrigin,
    SummarizePlaces(&'a [Place]),
    DescribeRoute(&'a DirectionInfo),
    Canned,
}

impl<'a> SynthesisCase<'a> {
    pub fn select(record: &IntentRecord, result: &'a GatewayResult) -> Self {
        match (record.intent, result) {
            (Intent::DirectionRequest, _) if record.needs_origin => Self::AskForOrigin,
            (intent, GatewayResult::PlaceList(places))
                if intent.is_place_lookup() && !places.is_empty() =>
            {
                Self::SummarizePlaces(places)
            }
            (Intent::DirectionRequest, GatewayResult::DirectionInfo(directions))
                if !directions.summary.trim().is_empty() =>
            {
                Self::DescribeRoute(directions)
            }
            _ => Self::Canned,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::AskForOrigin => "ask_for_origin",
            Self::SummarizePlaces(_) => "summarize_places",
            Self::DescribeRoute(_) => "describe_route",
            Self::Canned => "canned",
        }
    }

    pub fn render_prompt(&self, prompts: &PromptBuilder, record: &IntentRecord) -> Option<String> {
        match self {
            Self::AskForOrigin => Some(prompts.ask_for_origin(record)),
            Self::SummarizePlaces(places) => Some(prompts.summarize_places(record, places)),
            Self::DescribeRoute(directions) => Some(prompts.describe_route(record, directions)),
            Self::Canned => None,
        }
    }
}
