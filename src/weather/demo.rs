//! Fixed datasets served when no API key is configured, so the dashboard is
//! always demonstrable without network access or provider credentials.

use super::types::{City, CurrentConditions, DetailedPoint, ForecastPoint};
use chrono::Utc;

pub const DEMO_LOCATION: &str = "Demo Mode";

/// Fixed current conditions. Deterministic: two calls with the same city
/// return identical values.
pub fn current_conditions(city: Option<&City>) -> CurrentConditions {
    CurrentConditions {
        location_name: city
            .map(|c| c.name.clone())
            .unwrap_or_else(|| DEMO_LOCATION.to_string()),
        temp_c: 15.0,
        feels_like_c: 13.0,
        humidity: 65.0,
        pressure_hpa: 1015.0,
        wind_ms: 4.2,
        condition: "clear".to_string(),
        rate_limited: false,
    }
}

/// Fixed 8-point chart series covering one day at 3-hour steps.
pub fn forecast() -> Vec<ForecastPoint> {
    [
        ("00:00", 12),
        ("03:00", 11),
        ("06:00", 13),
        ("09:00", 16),
        ("12:00", 20),
        ("15:00", 18),
        ("18:00", 15),
        ("21:00", 13),
    ]
    .iter()
    .map(|(t, v)| ForecastPoint {
        t: t.to_string(),
        v: *v,
        rate_limited: false,
    })
    .collect()
}

/// 24 consecutive hourly rows starting now. Temperature follows a smooth
/// oscillation rather than random noise so charts render a plausible curve;
/// the secondary fields carry a little jitter.
pub fn detailed_forecast() -> Vec<DetailedPoint> {
    let now = Utc::now().timestamp();

    (0..24)
        .map(|hour| {
            let temp = 15.0 + 8.0 * (hour as f64 / 4.0).sin();
            let condition = match hour % 3 {
                0 => "clear",
                1 => "cloudy",
                _ => "overcast",
            };

            DetailedPoint {
                dt: now + hour * 3600,
                temp,
                condition: condition.to_string(),
                humidity: 60.0 + 20.0 * fastrand::f64(),
                wind_ms: 2.0 + 6.0 * fastrand::f64(),
                pressure: 1010.0 + 10.0 * fastrand::f64(),
                rate_limited: false,
            }
        })
        .collect()
}
