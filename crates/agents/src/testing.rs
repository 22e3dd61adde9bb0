use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::Value;
use waypoint_core::{Coordinates, DirectionInfo, GatewayResult, Place};
use waypoint_geo::GeoGateway;
use waypoint_llm::{BackendError, GenerativeBackend};

#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<String, BackendError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn replying<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            replies: Mutex::new(replies.into_iter().map(|reply| Ok(reply.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_with_status(status: u16) -> Self {
        let backend = Self::default();
        backend.push_failure(status);
        backend
    }

    pub fn push_failure(&self, status: u16) {
        self.replies.lock().push_back(Err(BackendError::Status {
            status,
            body: "backend unavailable".to_string(),
        }));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

impl GenerativeBackend for ScriptedBackend {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String, BackendError> {
        self.prompts.lock().push(prompt.to_string());
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(String::new()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    Search(String),
    Directions { origin: String, destination: String },
}

pub struct RecordingGateway {
    places: GatewayResult,
    directions: GatewayResult,
    calls: Mutex<Vec<GatewayCall>>,
}

impl RecordingGateway {
    pub fn with_places(names: &[&str]) -> Self {
        Self {
            places: GatewayResult::PlaceList(names.iter().map(|name| place(name)).collect()),
            directions: GatewayResult::DirectionInfo(DirectionInfo {
                summary: "Jl. Ahmad Yani".to_string(),
                distance: "4.2 km".to_string(),
                duration: "12 mins".to_string(),
                start_address: "Galaxy, Bekasi".to_string(),
                end_address: "Lotte Mart, Bekasi".to_string(),
                steps: Vec::new(),
                maps_url: "https://www.google.com/maps/dir/?api=1&origin=Galaxy&destination=Lotte+Mart"
                    .to_string(),
            }),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }
}

impl GeoGateway for RecordingGateway {
    async fn search_places(&self, query: &str) -> GatewayResult {
        self.calls.lock().push(GatewayCall::Search(query.to_string()));
        self.places.clone()
    }

    async fn get_directions(&self, origin: &str, destination: &str) -> GatewayResult {
        self.calls.lock().push(GatewayCall::Directions {
            origin: origin.to_string(),
            destination: destination.to_string(),
        });
        self.directions.clone()
    }
}

pub fn place(name: &str) -> Place {
    Place {
        name: name.to_string(),
        address: format!("{name} street, Bekasi"),
        location: Some(Coordinates {
            lat: -6.24,
            lng: 106.99,
        }),
        place_id: format!("id-{name}"),
        maps_url: "https://www.google.com/maps/search/?api=1&query=-6.24,106.99".to_string(),
    }
}

pub fn classifier_output(fields: Value) -> String {
    let mut output = serde_json::json!({
        "intent": "general",
        "query": "",
        "store_name": "",
        "location": "",
        "address": "",
        "origin": "",
        "destination": "",
        "raw_response": "",
        "needs_origin": false
    });
    if let (Some(target), Value::Object(overrides)) = (output.as_object_mut(), fields) {
        target.extend(overrides);
    }
    output.to_string()
}
