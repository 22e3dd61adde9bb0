use crate::models::{Intent, IntentRecord, StatusMessage};

pub const NO_QUERY_MESSAGE: &str = "No address or query provided";
pub const ORIGIN_NOT_FOUND_MESSAGE: &str = "Origin Info not Found";
pub const INCOMPLETE_DIRECTIONS_MESSAGE: &str = "Direction intent needs both origin and destination.";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DirectionState {
    #[default]
    Collecting,
    NeedsOrigin,
    Incomplete,
    Ready { origin: String, destination: String },
}

impl DirectionState {
    pub fn advance(self, record: &IntentRecord) -> Self {
        match self {
            Self::Collecting => {
                if record.needs_origin {
                    return Self::NeedsOrigin;
                }

                let origin = record.origin.trim();
                let destination = record.effective_destination();
                if origin.is_empty() || destination.is_empty() {
                    Self::Incomplete
                } else {
                    Self::Ready {
                        origin: origin.to_string(),
                        destination: destination.to_string(),
                    }
                }
            }
            settled => settled,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RoutePlan {
    SearchPlaces { query: String },
    Directions { origin: String, destination: String },
    ScopeLimitedReply,
    Halt(StatusMessage),
}

impl RoutePlan {
    pub fn uses_gateway(&self) -> bool {
        matches!(self, Self::SearchPlaces { .. } | Self::Directions { .. })
    }
}

pub fn plan_route(record: &IntentRecord) -> RoutePlan {
    match record.intent {
        Intent::StoreLocator | Intent::MapPlaceSearch | Intent::PlaceRecommendation => {
            match record.place_query() {
                Some(query) => RoutePlan::SearchPlaces { query },
                None => RoutePlan::Halt(StatusMessage::new(NO_QUERY_MESSAGE)),
            }
        }
        Intent::DirectionRequest => match DirectionState::default().advance(record) {
            DirectionState::Ready {
                origin,
                destination,
            } => RoutePlan::Directions {
                origin,
                destination,
            },
            DirectionState::NeedsOrigin => {
                RoutePlan::Halt(StatusMessage::new(ORIGIN_NOT_FOUND_MESSAGE))
            }
            DirectionState::Collecting | DirectionState::Incomplete => {
                RoutePlan::Halt(StatusMessage::new(INCOMPLETE_DIRECTIONS_MESSAGE))
            }
        },
        Intent::General => RoutePlan::ScopeLimitedReply,
    }
}
