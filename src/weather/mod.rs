pub mod client;
pub mod demo;
pub mod geocode;
pub mod service;
pub mod types;

/// Read-time freshness window: a non-forced fetch reuses any cache entry
/// younger than this without hitting the network.
pub const CACHE_TTL_MS: i64 = 30 * 60 * 1000;

/// Short forecast chart length (5-day/3-hour feed, first 16 points).
pub const FORECAST_POINTS: usize = 16;

/// Detailed hourly view length: 8 three-hour rows, i.e. 24 hours.
pub const DETAILED_POINTS: usize = 8;
