use std::env;
use std::time::Duration;

use waypoint_geo::GoogleMapsConfig;
use waypoint_llm::OllamaConfig;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_ORIGIN: &str = "http://localhost:5500";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub ollama: OllamaConfig,
    pub maps: GoogleMapsConfig,
    pub bind: String,
    pub allowed_origins: Vec<String>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            ollama: OllamaConfig::default(),
            maps: GoogleMapsConfig::default(),
            bind: DEFAULT_BIND.to_string(),
            allowed_origins: vec![DEFAULT_ORIGIN.to_string()],
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let ollama = OllamaConfig {
            base_url: non_empty_var("OLLAMA_BASE_URL").unwrap_or(defaults.ollama.base_url),
            model: non_empty_var("OLLAMA_MODEL").unwrap_or(defaults.ollama.model),
            timeout: seconds_or(
                non_empty_var("WAYPOINT_BACKEND_TIMEOUT_SECONDS"),
                defaults.ollama.timeout,
            ),
        };

        let maps = GoogleMapsConfig {
            api_key: non_empty_var("GOOGLE_MAPS_API_KEY"),
            base_url: non_empty_var("GOOGLE_MAPS_BASE_URL").unwrap_or(defaults.maps.base_url),
            timeout: seconds_or(
                non_empty_var("WAYPOINT_GATEWAY_TIMEOUT_SECONDS"),
                defaults.maps.timeout,
            ),
            ..defaults.maps
        };

        Self {
            ollama,
            maps,
            bind: non_empty_var("WAYPOINT_BIND").unwrap_or(defaults.bind),
            allowed_origins: parse_origins(non_empty_var("WAYPOINT_ALLOWED_ORIGINS")),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn seconds_or(value: Option<String>, fallback: Duration) -> Duration {
    value
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|seconds| *seconds > 0)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn parse_origins(value: Option<String>) -> Vec<String> {
    let origins = value
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        vec![DEFAULT_ORIGIN.to_string()]
    } else {
        origins
    }
}
