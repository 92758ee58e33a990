use serde::{Deserialize, Serialize};

/// Placeholder shown when the provider omits the condition text.
pub const MISSING_CONDITION: &str = "—";

/// A searchable location. `None` at the call sites means "default city".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

// ---------------------------------------------------------------------------
// Normalized records returned to the UI layer. Internal code never touches
// raw provider field names outside this module and the client.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub location_name: String,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity: f64,
    pub pressure_hpa: f64,
    pub wind_ms: f64,
    pub condition: String,
    /// Set when the payload was served from a stale cache entry after the
    /// provider rate-limited us.
    #[serde(default)]
    pub rate_limited: bool,
}

/// One point of the short forecast chart: an "HH:MM" label and a whole-degree
/// temperature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub t: String,
    pub v: i64,
    #[serde(default)]
    pub rate_limited: bool,
}

/// One row of the 24-hour detailed forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailedPoint {
    pub dt: i64,
    pub temp: f64,
    pub condition: String,
    pub humidity: f64,
    pub wind_ms: f64,
    pub pressure: f64,
    #[serde(default)]
    pub rate_limited: bool,
}

// ---------------------------------------------------------------------------
// Provider wire types. Every field the normalization rules default is
// Option-typed so a sparse payload still deserializes.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub name: Option<String>,
    pub main: Option<CurrentMain>,
    pub wind: Option<WireWind>,
    #[serde(default)]
    pub weather: Vec<WireCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentMain {
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireWind {
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCondition {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
    pub city: Option<ForecastCity>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: Option<ForecastMain>,
    pub wind: Option<WireWind>,
    #[serde(default)]
    pub weather: Vec<WireCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastMain {
    pub temp: Option<f64>,
    pub humidity: Option<f64>,
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    pub name: Option<String>,
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodeResponse {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    pub state: Option<String>,
}
