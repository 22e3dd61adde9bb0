mod google;
mod wire;

use waypoint_core::GatewayResult;

pub use google::{
    directions_link, place_link, GoogleMapsClient, GoogleMapsConfig, DEFAULT_BASE_URL,
};

pub const MISSING_KEY_MESSAGE: &str = "Missing Google Maps API Key";
pub const CONTACT_FAILED_MESSAGE: &str = "Failed to contact Google Maps";
pub const NO_RESULTS_MESSAGE: &str = "No results found";
pub const NO_ROUTE_MESSAGE: &str = "No route found";

/// Implementations fail soft: every failure comes back as a status message.
pub trait GeoGateway: Send + Sync {
    async fn search_places(&self, query: &str) -> GatewayResult;
    async fn get_directions(&self, origin: &str, destination: &str) -> GatewayResult;
}
