use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_PLACE_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    StoreLocator,
    MapPlaceSearch,
    PlaceRecommendation,
    DirectionRequest,
    General,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::StoreLocator,
        Intent::MapPlaceSearch,
        Intent::PlaceRecommendation,
        Intent::DirectionRequest,
        Intent::General,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StoreLocator => "store_locator",
            Self::MapPlaceSearch => "map_place_search",
            Self::PlaceRecommendation => "place_recommendation",
            Self::DirectionRequest => "direction_request",
            Self::General => "general",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|intent| intent.as_str() == value.trim())
    }

    pub fn is_place_lookup(self) -> bool {
        matches!(
            self,
            Self::StoreLocator | Self::MapPlaceSearch | Self::PlaceRecommendation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentRecord {
    pub intent: Intent,
    pub query: String,
    pub store_name: String,
    pub location: String,
    pub address: String,
    pub origin: String,
    pub destination: String,
    pub raw_response: String,
    pub needs_origin: bool,
}

impl IntentRecord {
    pub fn new(intent: Intent, raw_response: impl Into<String>) -> Self {
        Self {
            intent,
            query: String::new(),
            store_name: String::new(),
            location: String::new(),
            address: String::new(),
            origin: String::new(),
            destination: String::new(),
            raw_response: raw_response.into(),
            needs_origin: false,
        }
    }

    pub fn awaits_origin(&self) -> bool {
        self.intent == Intent::DirectionRequest && self.needs_origin
    }

    pub fn origin_flag_consistent(&self) -> bool {
        !self.needs_origin || self.intent == Intent::DirectionRequest
    }

    pub fn effective_destination(&self) -> &str {
        let destination = self.destination.trim();
        if destination.is_empty() {
            self.store_name.trim()
        } else {
            destination
        }
    }

    /// A set query always carries the `" in "` joiner, even with no location.
    pub fn place_query(&self) -> Option<String> {
        let query = self.query.trim();
        let location = self.location.trim();

        match (query.is_empty(), location.is_empty()) {
            (false, false) => Some(format!("{query} in {location}")),
            (false, true) => Some(format!("{query} in")),
            (true, false) => Some(location.to_string()),
            (true, true) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub location: Option<Coordinates>,
    pub place_id: String,
    pub maps_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionInfo {
    pub summary: String,
    pub distance: String,
    pub duration: String,
    pub start_address: String,
    pub end_address: String,
    pub steps: Vec<RouteStep>,
    pub maps_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<Value>,
}

impl StatusMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            raw: None,
        }
    }

    pub fn with_raw(message: impl Into<String>, raw: Value) -> Self {
        Self {
            message: message.into(),
            raw: Some(raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GatewayResult {
    PlaceList(Vec<Place>),
    DirectionInfo(DirectionInfo),
    StatusMessage(StatusMessage),
}

impl GatewayResult {
    pub fn status(message: impl Into<String>) -> Self {
        Self::StatusMessage(StatusMessage::new(message))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::PlaceList(_) => "place_list",
            Self::DirectionInfo(_) => "direction_info",
            Self::StatusMessage(_) => "status_message",
        }
    }

    pub fn status_message(&self) -> Option<&str> {
        match self {
            Self::StatusMessage(status) => Some(status.message.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(rename = "llm_response")]
    pub intent_record: IntentRecord,
    #[serde(rename = "gmap_result")]
    pub gateway_result: GatewayResult,
    #[serde(rename = "response_followup")]
    pub final_reply: String,
}
