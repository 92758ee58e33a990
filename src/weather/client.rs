use super::types::*;
use crate::config::Config;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("weather request timed out")]
    Timeout,
    #[error("invalid API key")]
    InvalidApiKey,
    #[error("city not found: {0}")]
    CityNotFound(String),
    #[error("too many requests, please wait before refreshing")]
    RateLimited,
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("JSON parsing failed: {0}")]
    JsonParsing(#[from] serde_json::Error),
    #[error("API error: {0}")]
    Api(String),
}

pub struct OpenWeatherClient {
    client: Client,
    config: Config,
}

impl OpenWeatherClient {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent("AtmosVibe/1.0")
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    pub fn has_api_key(&self) -> bool {
        self.config.has_api_key()
    }

    pub async fn get_current(&self, city: &str) -> Result<CurrentResponse, WeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_weather_path
        );

        let response = self
            .get_json(&url, &[("q", city), ("units", "metric")], city)
            .await?;

        let current: CurrentResponse = serde_json::from_value(response)?;
        Ok(current)
    }

    pub async fn get_forecast(&self, city: &str) -> Result<ForecastResponse, WeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_forecast_path
        );

        let response = self
            .get_json(&url, &[("q", city), ("units", "metric")], city)
            .await?;

        let forecast: ForecastResponse = serde_json::from_value(response)?;
        Ok(forecast)
    }

    pub async fn geocode_direct(&self, query: &str) -> Result<Vec<GeocodeResponse>, WeatherError> {
        let url = format!(
            "{}{}",
            self.config.openweather_base_url, self.config.openweather_geocode_direct_path
        );

        let response = self
            .get_json(&url, &[("q", query), ("limit", "5")], query)
            .await?;

        let geocode: Vec<GeocodeResponse> = serde_json::from_value(response)?;
        Ok(geocode)
    }

    async fn get_json(
        &self,
        url: &str,
        params: &[(&str, &str)],
        target: &str,
    ) -> Result<Value, WeatherError> {
        let api_key = self.config.openweather_api_key.as_deref().unwrap_or_default();

        let response = self
            .client
            .get(url)
            .query(params)
            .query(&[("appid", api_key)])
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            reqwest::StatusCode::OK => {
                let json: Value = response.json().await.map_err(map_transport_error)?;
                Ok(json)
            }
            reqwest::StatusCode::UNAUTHORIZED => Err(WeatherError::InvalidApiKey),
            reqwest::StatusCode::NOT_FOUND => Err(WeatherError::CityNotFound(target.to_string())),
            reqwest::StatusCode::TOO_MANY_REQUESTS => Err(WeatherError::RateLimited),
            status => {
                let error_text = response.text().await.unwrap_or_default();
                Err(WeatherError::Api(format!("HTTP {}: {}", status, error_text)))
            }
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> WeatherError {
    if error.is_timeout() {
        WeatherError::Timeout
    } else {
        WeatherError::Request(error)
    }
}

// Convert provider wire data to the normalized records.
impl CurrentConditions {
    pub fn from_wire(data: &CurrentResponse, fallback_name: &str) -> Self {
        let main = data.main.as_ref();
        Self {
            location_name: data
                .name
                .clone()
                .unwrap_or_else(|| fallback_name.to_string()),
            // Current-conditions temperature is deliberately unrounded.
            temp_c: main.and_then(|m| m.temp).unwrap_or(0.0),
            feels_like_c: main.and_then(|m| m.feels_like).unwrap_or(0.0),
            humidity: main.and_then(|m| m.humidity).unwrap_or(0.0),
            pressure_hpa: main.and_then(|m| m.pressure).unwrap_or(0.0),
            wind_ms: data.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0),
            condition: data
                .weather
                .first()
                .and_then(|w| w.description.clone())
                .unwrap_or_else(|| MISSING_CONDITION.to_string()),
            rate_limited: false,
        }
    }
}

impl ForecastPoint {
    pub fn from_item(item: &ForecastItem, timezone_offset: i32) -> Self {
        let offset = FixedOffset::east_opt(timezone_offset).unwrap_or_else(|| Utc.fix());
        let local: DateTime<FixedOffset> = DateTime::<Utc>::from_timestamp(item.dt, 0)
            .unwrap_or_default()
            .with_timezone(&offset);

        Self {
            t: local.format("%H:%M").to_string(),
            v: item
                .main
                .as_ref()
                .and_then(|m| m.temp)
                .map(|t| t.round() as i64)
                .unwrap_or(0),
            rate_limited: false,
        }
    }
}

impl DetailedPoint {
    pub fn from_item(item: &ForecastItem) -> Self {
        let main = item.main.as_ref();
        Self {
            dt: item.dt,
            temp: main.and_then(|m| m.temp).map(f64::round).unwrap_or(0.0),
            condition: item
                .weather
                .first()
                .and_then(|w| w.description.clone())
                .unwrap_or_else(|| MISSING_CONDITION.to_string()),
            humidity: main.and_then(|m| m.humidity).unwrap_or(0.0),
            wind_ms: item.wind.as_ref().and_then(|w| w.speed).unwrap_or(0.0),
            pressure: main.and_then(|m| m.pressure).unwrap_or(0.0),
            rate_limited: false,
        }
    }
}
