//! Display helpers shared by the widgets.

use chrono::{DateTime, Utc};

pub fn format_temp_c(value: f64) -> String {
    if value.is_nan() {
        return "—".to_string();
    }
    format!("{}°C", value.round() as i64)
}

pub fn format_time_hhmm(timestamp: i64) -> String {
    match DateTime::<Utc>::from_timestamp(timestamp, 0) {
        Some(time) => time.format("%H:%M").to_string(),
        None => "—".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_temp_rounds() {
        assert_eq!(format_temp_c(15.7), "16°C");
        assert_eq!(format_temp_c(-0.4), "0°C");
        assert_eq!(format_temp_c(f64::NAN), "—");
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time_hhmm(0), "00:00");
        assert_eq!(format_time_hhmm(3 * 3600 + 5 * 60), "03:05");
    }
}
