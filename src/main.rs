use std::path::Path;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use atmosvibe_core::config::Config;
use atmosvibe_core::format::{format_temp_c, format_time_hhmm};
use atmosvibe_core::store::FileStore;
use atmosvibe_core::weather::service::WeatherService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "atmosvibe_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if !config.has_api_key() {
        tracing::info!("no OPENWEATHER_API_KEY configured, running in demo mode");
    }

    let cache_path = std::env::var("ATMOSVIBE_CACHE_FILE")
        .unwrap_or_else(|_| "atmosvibe_cache.json".to_string());
    let store = FileStore::open(Path::new(&cache_path));
    let service = WeatherService::new(config, store);

    // Maintenance sweep the original app runs on a timer.
    service.sweep_expired();

    let city = match std::env::args().nth(1) {
        Some(query) => {
            let matches = service.search_cities(&query).await;
            match matches.into_iter().next() {
                Some(city) => Some(city),
                None => {
                    tracing::warn!(query, "no matching city, using the default");
                    None
                }
            }
        }
        None => None,
    };

    let current = service.current(city.as_ref(), false).await?;
    println!(
        "{}: {} (feels like {}), {}",
        current.location_name,
        format_temp_c(current.temp_c),
        format_temp_c(current.feels_like_c),
        current.condition
    );
    println!(
        "humidity {}%  pressure {} hPa  wind {} m/s",
        current.humidity, current.pressure_hpa, current.wind_ms
    );
    if current.rate_limited {
        println!("(served from cache: provider rate limit)");
    }

    println!("\nForecast:");
    let forecast = service.forecast(city.as_ref(), false).await?;
    for point in &forecast {
        println!("  {}  {}", point.t, format_temp_c(point.v as f64));
    }

    println!("\nNext 24 hours:");
    let detailed = service.detailed_forecast(city.as_ref(), false).await?;
    for row in &detailed {
        println!(
            "  {}  {}  {}",
            format_time_hhmm(row.dt),
            format_temp_c(row.temp),
            row.condition
        );
    }

    Ok(())
}
