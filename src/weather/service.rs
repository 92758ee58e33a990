use super::client::{OpenWeatherClient, WeatherError};
use super::types::*;
use super::{demo, geocode, CACHE_TTL_MS, DETAILED_POINTS, FORECAST_POINTS};
use crate::config::Config;
use crate::store::{CacheStore, KeyValueStore};

/// Mediates between the UI layer and the weather provider: applies the
/// per-city TTL cache, recovers from rate limiting by serving stale entries,
/// and synthesizes demo data when no API key is configured.
pub struct WeatherService<S> {
    client: OpenWeatherClient,
    cache: CacheStore<S>,
    config: Config,
}

impl<S: KeyValueStore> WeatherService<S> {
    pub fn new(config: Config, store: S) -> Self {
        Self {
            client: OpenWeatherClient::new(config.clone()),
            cache: CacheStore::new(store),
            config,
        }
    }

    fn city_name<'a>(&'a self, city: Option<&'a City>) -> &'a str {
        city.map(|c| c.name.as_str())
            .unwrap_or(&self.config.default_city)
    }

    fn fresh<T: serde::de::DeserializeOwned>(&self, key: &str, force: bool) -> Option<T> {
        if force {
            return None;
        }
        let entry = self.cache.get::<T>(key)?;
        let age = chrono::Utc::now().timestamp_millis() - entry.ts;
        if age < CACHE_TTL_MS {
            tracing::debug!(key, age_ms = age, "serving fresh cache entry");
            Some(entry.data)
        } else {
            None
        }
    }

    /// Current conditions for a city (default city when `None`).
    pub async fn current(
        &self,
        city: Option<&City>,
        force: bool,
    ) -> Result<CurrentConditions, WeatherError> {
        if !self.config.has_api_key() {
            return Ok(demo::current_conditions(city));
        }

        let name = self.city_name(city);
        let key = format!("current:{name}");

        if let Some(cached) = self.fresh::<CurrentConditions>(&key, force) {
            return Ok(cached);
        }

        // Kept around in case the provider answers 429 below.
        let stale = self.cache.get::<CurrentConditions>(&key);

        match self.client.get_current(name).await {
            Ok(data) => {
                let result = CurrentConditions::from_wire(&data, name);
                self.cache.set(&key, &result);
                Ok(result)
            }
            Err(WeatherError::RateLimited) => match stale {
                Some(entry) => {
                    tracing::warn!(city = name, "rate limited, serving cached current conditions");
                    let mut data = entry.data;
                    data.rate_limited = true;
                    Ok(data)
                }
                None => Err(WeatherError::RateLimited),
            },
            Err(err) => Err(err),
        }
    }

    /// Short forecast chart series: up to 16 points at 3-hour granularity.
    pub async fn forecast(
        &self,
        city: Option<&City>,
        force: bool,
    ) -> Result<Vec<ForecastPoint>, WeatherError> {
        if !self.config.has_api_key() {
            return Ok(demo::forecast());
        }

        let name = self.city_name(city);
        let key = format!("forecast:{name}");

        if let Some(cached) = self.fresh::<Vec<ForecastPoint>>(&key, force) {
            return Ok(cached);
        }

        let stale = self.cache.get::<Vec<ForecastPoint>>(&key);

        match self.client.get_forecast(name).await {
            Ok(data) => {
                let timezone_offset = data
                    .city
                    .as_ref()
                    .and_then(|c| c.timezone)
                    .unwrap_or_default();
                let result: Vec<ForecastPoint> = data
                    .list
                    .iter()
                    .take(FORECAST_POINTS)
                    .map(|item| ForecastPoint::from_item(item, timezone_offset))
                    .collect();
                self.cache.set(&key, &result);
                Ok(result)
            }
            Err(WeatherError::RateLimited) => match stale {
                Some(entry) => {
                    tracing::warn!(city = name, "rate limited, serving cached forecast");
                    let mut data = entry.data;
                    for point in &mut data {
                        point.rate_limited = true;
                    }
                    Ok(data)
                }
                None => Err(WeatherError::RateLimited),
            },
            Err(err) => Err(err),
        }
    }

    /// Detailed hourly view: the first 8 forecast rows, covering 24 hours.
    pub async fn detailed_forecast(
        &self,
        city: Option<&City>,
        force: bool,
    ) -> Result<Vec<DetailedPoint>, WeatherError> {
        if !self.config.has_api_key() {
            return Ok(demo::detailed_forecast());
        }

        let name = self.city_name(city);
        let key = format!("detailed:{name}");

        if let Some(cached) = self.fresh::<Vec<DetailedPoint>>(&key, force) {
            return Ok(cached);
        }

        let stale = self.cache.get::<Vec<DetailedPoint>>(&key);

        match self.client.get_forecast(name).await {
            Ok(data) => {
                let result: Vec<DetailedPoint> = data
                    .list
                    .iter()
                    .take(DETAILED_POINTS)
                    .map(DetailedPoint::from_item)
                    .collect();
                self.cache.set(&key, &result);
                Ok(result)
            }
            Err(WeatherError::RateLimited) => match stale {
                Some(entry) => {
                    tracing::warn!(city = name, "rate limited, serving cached detailed forecast");
                    let mut data = entry.data;
                    for point in &mut data {
                        point.rate_limited = true;
                    }
                    Ok(data)
                }
                None => Err(WeatherError::RateLimited),
            },
            Err(err) => Err(err),
        }
    }

    /// City autocomplete: the popular-city list filtered locally, falling
    /// back to provider geocoding when a key is configured. Best-effort.
    pub async fn search_cities(&self, query: &str) -> Vec<City> {
        geocode::search_cities(&self.client, query).await
    }

    /// Maintenance sweep of entries past the absolute expiry window.
    pub fn sweep_expired(&self) {
        self.cache.clear_expired();
    }
}
