use std::time::Duration;

use axum::Router;
use serde_json::{json, Value};
use waypoint_api::{build_app_with_config, RuntimeConfig};
use waypoint_geo::GoogleMapsConfig;
use waypoint_llm::OllamaConfig;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MAPS_KEY: &str = "test-key";

pub const CLASSIFICATION_MARKER: &str = "OUTPUT FORMAT (JSON only)";

pub fn ndjson(text: &str) -> String {
    let chars = text.chars().collect::<Vec<_>>();
    let mut lines = chars
        .chunks(7)
        .map(|chunk| {
            json!({ "response": chunk.iter().collect::<String>(), "done": false }).to_string()
        })
        .collect::<Vec<_>>();
    lines.push(json!({ "response": "", "done": true }).to_string());
    lines.join("\n") + "\n"
}

pub fn classifier_json(fields: Value) -> String {
    let mut output = json!({
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

pub async fn mount_completion(server: &MockServer, marker: &str, text: &str) {
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .and(body_string_contains(marker))
        .respond_with(ResponseTemplate::new(200).set_body_string(ndjson(text)))
        .mount(server)
        .await;
}

pub fn config(ollama: &MockServer, maps: &MockServer, api_key: Option<&str>) -> RuntimeConfig {
    RuntimeConfig {
        ollama: OllamaConfig {
            base_url: ollama.uri(),
            model: "mistral".to_string(),
            timeout: Duration::from_secs(5),
        },
        maps: GoogleMapsConfig {
            api_key: api_key.map(ToString::to_string),
            base_url: maps.uri(),
            timeout: Duration::from_secs(5),
            ..GoogleMapsConfig::default()
        },
        ..RuntimeConfig::default()
    }
}

pub async fn app(ollama: &MockServer, maps: &MockServer) -> Router {
    build_app_with_config(config(ollama, maps, Some(MAPS_KEY)))
        .await
        .expect("app should build")
}
