use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Weather for one location, captured at the moment it was fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location_name: String,
    pub description: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
}

/// One point of the short-term forecast (3-hourly upstream).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub temperature_c: f64,
}

/// Pollutant concentrations in µg/m³.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub pm2_5: f64,
    pub pm10: f64,
    pub co: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsArticle {
    pub title: String,
    pub description: String,
    pub url: String,
}

/// A snapshot retained by the user, displayed independently of the
/// currently queried city. Identity is positional within the pinned list.
#[derive(Debug, Clone)]
pub struct PinnedEntry {
    pub snapshot: WeatherSnapshot,
}

/// Geocoded position, used only to chain into the air-quality call.
#[derive(Debug, Clone, Copy)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}
