use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use tower::ServiceExt;
use waypoint_api::build_app_with_config;
use waypoint_core::{CANNED_REPLY, ORIGIN_NOT_FOUND_MESSAGE};
use waypoint_geo::MISSING_KEY_MESSAGE;
use waypoint_tests::{
    app, classifier_json, config, mount_completion, ndjson, CLASSIFICATION_MARKER, MAPS_KEY,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn send_message(prompt: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/send-message")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "prompt": prompt }).to_string()))
        .unwrap()
}

async fn json_body(response: Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn health_reports_model_and_maps_key() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;
    let app = build_app_with_config(config(&ollama, &maps, None))
        .await
        .expect("app should build");

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["capabilities"]["model"], "mistral");
    assert_eq!(body["capabilities"]["maps_key_configured"], false);
    assert_eq!(body["metrics"]["requests_total"], 0);
}

#[tokio::test]
async fn coffee_shop_search_returns_places_and_summary() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    mount_completion(
        &ollama,
        CLASSIFICATION_MARKER,
        &classifier_json(json!({
            "intent": "map_place_search",
            "query": "coffee shop",
            "location": "Bekasi",
            "raw_response": "coffee shop near Bekasi"
        })),
    )
    .await;
    mount_completion(
        &ollama,
        "Places retrieved from Google Maps",
        "  1. Kopi Kenangan - Jl. Ahmad Yani\n2. Janji Jiwa - Summarecon\nThanks!  ",
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/maps/api/place/textsearch/json"))
        .and(query_param("query", "coffee shop in Bekasi"))
        .and(query_param("key", MAPS_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "OK",
            "results": [
                {
                    "name": "Kopi Kenangan",
                    "formatted_address": "Jl. Ahmad Yani, Bekasi",
                    "geometry": { "location": { "lat": -6.24, "lng": 106.99 } },
                    "place_id": "kk-1"
                },
                {
                    "name": "Janji Jiwa",
                    "formatted_address": "Summarecon, Bekasi",
                    "geometry": { "location": { "lat": -6.22, "lng": 107.0 } },
                    "place_id": "jj-1"
                }
            ]
        })))
        .expect(1)
        .mount(&maps)
        .await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(send_message("coffee shop near Bekasi"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["llm_response"]["intent"], "map_place_search");
    assert_eq!(body["llm_response"]["raw_response"], "coffee shop near Bekasi");
    let places = body["gmap_result"].as_array().expect("place list");
    assert_eq!(places.len(), 2);
    assert_eq!(places[0]["name"], "Kopi Kenangan");
    assert_eq!(
        places[0]["maps_url"],
        "https://www.google.com/maps/search/?api=1&query=-6.24,106.99"
    );
    assert_eq!(
        body["response_followup"],
        "1. Kopi Kenangan - Jl. Ahmad Yani\n2. Janji Jiwa - Summarecon\nThanks!"
    );
}

#[tokio::test]
async fn vague_origin_asks_for_starting_point_without_maps_call() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    mount_completion(
        &ollama,
        CLASSIFICATION_MARKER,
        &classifier_json(json!({
            "intent": "direction_request",
            "store_name": "Lotte Mart",
            "destination": "Lotte Mart Bekasi",
            "needs_origin": true
        })),
    )
    .await;
    mount_completion(
        &ollama,
        "asking the user for their starting location",
        "Sure! Where are you starting from?",
    )
    .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&maps)
        .await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(send_message("directions from my place to Lotte Mart Bekasi"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["llm_response"]["needs_origin"], true);
    assert_eq!(body["gmap_result"]["message"], ORIGIN_NOT_FOUND_MESSAGE);
    assert_eq!(body["response_followup"], "Sure! Where are you starting from?");
}

#[tokio::test]
async fn backend_outage_maps_to_bad_gateway_payload() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&ollama)
        .await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(send_message("coffee shop near Bekasi"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to get response from generative backend.");
    assert_eq!(body["kind"], "transport_failure");
    assert_eq!(body["llm_raw"], "");
    assert!(body["reason"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn prose_classification_maps_to_parse_failure_payload() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    mount_completion(&ollama, CLASSIFICATION_MARKER, "Sure, you want coffee!").await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(send_message("coffee?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["error"], "Failed to parse JSON from LLM.");
    assert_eq!(body["kind"], "parse_failure");
    assert_eq!(body["llm_raw"], "Sure, you want coffee!");
}

#[tokio::test]
async fn unknown_intent_maps_to_validation_failure_payload() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    mount_completion(
        &ollama,
        CLASSIFICATION_MARKER,
        &classifier_json(json!({ "intent": "weather_report" })),
    )
    .await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(send_message("is it raining?"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "validation_failure");
}

#[tokio::test]
async fn missing_maps_key_degrades_to_canned_reply() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    mount_completion(
        &ollama,
        CLASSIFICATION_MARKER,
        &classifier_json(json!({ "intent": "store_locator", "store_name": "Indomaret", "query": "Indomaret" })),
    )
    .await;

    let app = build_app_with_config(config(&ollama, &maps, None))
        .await
        .expect("app should build");
    let response = app.oneshot(send_message("nearest Indomaret")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["gmap_result"]["message"], MISSING_KEY_MESSAGE);
    assert_eq!(body["response_followup"], CANNED_REPLY);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    let response = app(&ollama, &maps)
        .await
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "turn-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "turn-123"
    );
}

#[tokio::test]
async fn body_without_prompt_is_rejected() {
    let ollama = MockServer::start().await;
    let maps = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/send-message")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "text": "hi" }).to_string()))
        .unwrap();

    let response = app(&ollama, &maps).await.oneshot(request).await.unwrap();
    assert!(response.status().is_client_error());
}

#[test]
fn ndjson_fixture_splits_into_events() {
    let stream = ndjson("Halo dari Bekasi");
    let lines = stream.lines().collect::<Vec<_>>();
    assert!(lines.len() > 2);
    assert!(lines.last().unwrap().contains("\"done\":true"));
}
