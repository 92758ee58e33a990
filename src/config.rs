use serde::{Deserialize, Serialize};
use std::env;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    pub openweather_weather_path: String,
    pub openweather_forecast_path: String,
    pub openweather_geocode_direct_path: String,
    pub default_city: String,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Config {
            // A missing key is not an error: the app runs on demo data instead.
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .ok()
                .filter(|key| !key.is_empty()),
            openweather_base_url: env::var("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            openweather_weather_path: env::var("OPENWEATHER_WEATHER_PATH")
                .unwrap_or_else(|_| "/data/2.5/weather".to_string()),
            openweather_forecast_path: env::var("OPENWEATHER_FORECAST_PATH")
                .unwrap_or_else(|_| "/data/2.5/forecast".to_string()),
            openweather_geocode_direct_path: env::var("OPENWEATHER_GEOCODE_DIRECT_PATH")
                .unwrap_or_else(|_| "/geo/1.0/direct".to_string()),
            default_city: env::var("ATMOSVIBE_DEFAULT_CITY")
                .unwrap_or_else(|_| "Moscow".to_string()),
            request_timeout_secs: env::var("ATMOSVIBE_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(10),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.openweather_api_key.is_some()
    }
}
