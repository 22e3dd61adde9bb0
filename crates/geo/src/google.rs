use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{info, warn};
use waypoint_core::{
    Coordinates, DirectionInfo, GatewayResult, Place, RouteStep, StatusMessage, MAX_PLACE_RESULTS,
};

use crate::wire::{plain_instruction, text_of, DirectionsResponse, TextSearchResponse};
use crate::{
    GeoGateway, CONTACT_FAILED_MESSAGE, MISSING_KEY_MESSAGE, NO_RESULTS_MESSAGE, NO_ROUTE_MESSAGE,
};

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";
const TEXT_SEARCH_PATH: &str = "maps/api/place/textsearch/json";
const DIRECTIONS_PATH: &str = "maps/api/directions/json";

#[derive(Debug, Clone)]
pub struct GoogleMapsConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub max_results: usize,
}

impl Default for GoogleMapsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            max_results: MAX_PLACE_RESULTS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GoogleMapsClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    max_results: usize,
}

impl GoogleMapsClient {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(6))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key: config
                .api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            max_results: config.max_results.clamp(1, MAX_PLACE_RESULTS),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    async fn fetch(&self, path: &str, params: &[(&str, &str)]) -> Result<Value, StatusMessage> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|err| {
                warn!(error = %err, path, "google maps request failed");
                StatusMessage::new(CONTACT_FAILED_MESSAGE)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), path, "google maps returned non-success status");
            return Err(StatusMessage::new(CONTACT_FAILED_MESSAGE));
        }

        response.json::<Value>().await.map_err(|err| {
            warn!(error = %err, path, "google maps response was not JSON");
            StatusMessage::new(CONTACT_FAILED_MESSAGE)
        })
    }
}

impl GeoGateway for GoogleMapsClient {
    async fn search_places(&self, query: &str) -> GatewayResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return GatewayResult::status(MISSING_KEY_MESSAGE);
        };

        let body = match self
            .fetch(TEXT_SEARCH_PATH, &[("query", query), ("key", api_key)])
            .await
        {
            Ok(body) => body,
            Err(status) => return GatewayResult::StatusMessage(status),
        };

        let parsed = match serde_json::from_value::<TextSearchResponse>(body.clone()) {
            Ok(parsed) if parsed.status == "OK" && !parsed.results.is_empty() => parsed,
            _ => {
                return GatewayResult::StatusMessage(StatusMessage::with_raw(
                    NO_RESULTS_MESSAGE,
                    body,
                ))
            }
        };

        let places = parsed
            .results
            .into_iter()
            .take(self.max_results)
            .map(|item| {
                let location = item
                    .geometry
                    .and_then(|geometry| geometry.location)
                    .map(|point| Coordinates {
                        lat: point.lat,
                        lng: point.lng,
                    });

                Place {
                    name: item.name,
                    address: item.formatted_address,
                    maps_url: location.map(place_link).unwrap_or_default(),
                    location,
                    place_id: item.place_id,
                }
            })
            .collect::<Vec<_>>();

        info!(query, results = places.len(), "place search completed");
        GatewayResult::PlaceList(places)
    }

    async fn get_directions(&self, origin: &str, destination: &str) -> GatewayResult {
        let Some(api_key) = self.api_key.as_deref() else {
            return GatewayResult::status(MISSING_KEY_MESSAGE);
        };

        let body = match self
            .fetch(
                DIRECTIONS_PATH,
                &[
                    ("origin", origin),
                    ("destination", destination),
                    ("key", api_key),
                ],
            )
            .await
        {
            Ok(body) => body,
            Err(status) => return GatewayResult::StatusMessage(status),
        };

        let first_leg = serde_json::from_value::<DirectionsResponse>(body.clone())
            .ok()
            .filter(|parsed| parsed.status == "OK")
            .and_then(|parsed| parsed.routes.into_iter().next())
            .and_then(|route| {
                let summary = route.summary;
                route.legs.into_iter().next().map(|leg| (summary, leg))
            });

        let Some((summary, leg)) = first_leg else {
            return GatewayResult::StatusMessage(StatusMessage::with_raw(NO_ROUTE_MESSAGE, body));
        };

        let steps = leg
            .steps
            .iter()
            .map(|step| RouteStep {
                instruction: plain_instruction(&step.html_instructions),
                distance: text_of(&step.distance),
                duration: text_of(&step.duration),
            })
            .collect::<Vec<_>>();

        info!(origin, destination, steps = steps.len(), "directions lookup completed");
        GatewayResult::DirectionInfo(DirectionInfo {
            summary,
            distance: text_of(&leg.distance),
            duration: text_of(&leg.duration),
            start_address: leg.start_address,
            end_address: leg.end_address,
            steps,
            maps_url: directions_link(origin, destination),
        })
    }
}

pub fn place_link(location: Coordinates) -> String {
    format!(
        "https://www.google.com/maps/search/?api=1&query={},{}",
        location.lat, location.lng
    )
}

pub fn directions_link(origin: &str, destination: &str) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&origin={}&destination={}",
        encode_component(origin),
        encode_component(destination)
    )
}

fn encode_component(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}
