use super::client::OpenWeatherClient;
use super::types::City;

/// The cities offered before the user has typed anything specific; the
/// autocomplete filters this list first and only then asks the provider.
const POPULAR_CITIES: &[(&str, &str, f64, f64)] = &[
    ("Moscow", "RU", 55.7558, 37.6173),
    ("Saint Petersburg", "RU", 59.9343, 30.3351),
    ("Novosibirsk", "RU", 55.0084, 82.9357),
    ("Yekaterinburg", "RU", 56.8389, 60.6057),
    ("Kazan", "RU", 55.8304, 49.0661),
    ("London", "GB", 51.5074, -0.1278),
    ("Paris", "FR", 48.8566, 2.3522),
    ("New York", "US", 40.7128, -74.006),
    ("Tokyo", "JP", 35.6762, 139.6503),
    ("Berlin", "DE", 52.52, 13.405),
];

pub fn filter_popular(query: &str) -> Vec<City> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    POPULAR_CITIES
        .iter()
        .filter(|(name, _, _, _)| name.to_lowercase().contains(&needle))
        .map(|(name, country, lat, lon)| City {
            name: name.to_string(),
            country: country.to_string(),
            lat: *lat,
            lon: *lon,
        })
        .collect()
}

/// Local matches first; provider geocoding only when the list comes up empty
/// and a key is configured. Geocoding failures are swallowed: autocomplete is
/// best-effort and must never surface an error.
pub async fn search_cities(client: &OpenWeatherClient, query: &str) -> Vec<City> {
    let matches = filter_popular(query);
    if !matches.is_empty() || !client.has_api_key() {
        return matches;
    }

    match client.geocode_direct(query).await {
        Ok(results) => results
            .into_iter()
            .map(|g| City {
                name: g.name,
                country: g.country,
                lat: g.lat,
                lon: g.lon,
            })
            .collect(),
        Err(err) => {
            tracing::debug!(query, %err, "geocoding lookup failed");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_is_case_insensitive() {
        let matches = filter_popular("mos");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Moscow");
        assert_eq!(matches[0].country, "RU");
    }

    #[test]
    fn test_filter_matches_substrings() {
        let matches = filter_popular("burg");
        let names: Vec<_> = matches.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Saint Petersburg", "Yekaterinburg"]);
    }

    #[test]
    fn test_empty_query_returns_nothing() {
        assert!(filter_popular("   ").is_empty());
    }
}
