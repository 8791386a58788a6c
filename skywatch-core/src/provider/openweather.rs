use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::ProviderError,
    model::{AirQualityReading, Coordinates, ForecastPoint, WeatherSnapshot},
};

use super::WeatherProvider;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const GEO_URL: &str = "https://api.openweathermap.org/geo/1.0";
const SERVICE: &str = "openweather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ProviderError> {
        let res = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport {
                service: SERVICE,
                source,
            })?;

        if !status.is_success() {
            return Err(ProviderError::status(SERVICE, status, &body));
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode {
            service: SERVICE,
            source,
        })
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwComponents {
    pm2_5: f64,
    pm10: f64,
    co: f64,
}

#[derive(Debug, Deserialize)]
struct OwPollutionEntry {
    components: OwComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionEntry>,
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    lat: f64,
    lon: f64,
}

fn description_of(weather: &[OwWeather]) -> String {
    weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn snapshot_from_current(parsed: OwCurrentResponse) -> WeatherSnapshot {
    let description = description_of(&parsed.weather);

    WeatherSnapshot {
        location_name: parsed.name,
        description,
        temperature_c: parsed.main.temp,
        humidity_pct: parsed.main.humidity,
    }
}

fn points_from_forecast(parsed: OwForecastResponse) -> Vec<ForecastPoint> {
    parsed
        .list
        .into_iter()
        .map(|entry| {
            let description = description_of(&entry.weather);
            let timestamp = unix_to_utc(entry.dt).unwrap_or_else(Utc::now);

            ForecastPoint {
                timestamp,
                description,
                temperature_c: entry.main.temp,
            }
        })
        .collect()
}

fn reading_from_pollution(parsed: OwPollutionResponse) -> Result<AirQualityReading, ProviderError> {
    let entry = parsed
        .list
        .first()
        .ok_or(ProviderError::Empty { service: SERVICE })?;

    Ok(AirQualityReading {
        pm2_5: entry.components.pm2_5,
        pm10: entry.components.pm10,
        co: entry.components.co,
    })
}

fn coordinates_from_matches(
    city: &str,
    matches: Vec<OwGeoEntry>,
) -> Result<Coordinates, ProviderError> {
    let first = matches.first().ok_or_else(|| ProviderError::NotFound {
        query: city.to_string(),
    })?;

    Ok(Coordinates {
        lat: first.lat,
        lon: first.lon,
    })
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherSnapshot, ProviderError> {
        let url = format!("{BASE_URL}/weather");

        let parsed: OwCurrentResponse = self
            .get_json(
                &url,
                &[
                    ("q", city),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        Ok(snapshot_from_current(parsed))
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastPoint>, ProviderError> {
        let url = format!("{BASE_URL}/forecast");

        let parsed: OwForecastResponse = self
            .get_json(
                &url,
                &[
                    ("q", city),
                    ("appid", self.api_key.as_str()),
                    ("units", "metric"),
                ],
            )
            .await?;

        Ok(points_from_forecast(parsed))
    }

    async fn air_quality(&self, lat: f64, lon: f64) -> Result<AirQualityReading, ProviderError> {
        let url = format!("{BASE_URL}/air_pollution");
        let lat = lat.to_string();
        let lon = lon.to_string();

        let parsed: OwPollutionResponse = self
            .get_json(
                &url,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                ],
            )
            .await?;

        reading_from_pollution(parsed)
    }

    async fn resolve_coordinates(&self, city: &str) -> Result<Coordinates, ProviderError> {
        let url = format!("{GEO_URL}/direct");

        let matches: Vec<OwGeoEntry> = self
            .get_json(
                &url,
                &[("q", city), ("limit", "1"), ("appid", self.api_key.as_str())],
            )
            .await?;

        coordinates_from_matches(city, matches)
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_payload_maps_to_snapshot() {
        let body = r#"{
            "name": "London",
            "weather": [{"description": "cloudy"}],
            "main": {"temp": 15.0, "humidity": 80}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let snapshot = snapshot_from_current(parsed);

        assert_eq!(snapshot.location_name, "London");
        assert_eq!(snapshot.description, "cloudy");
        assert_eq!(snapshot.temperature_c, 15.0);
        assert_eq!(snapshot.humidity_pct, 80);
    }

    #[test]
    fn missing_condition_falls_back_to_unknown() {
        let body = r#"{
            "name": "London",
            "weather": [],
            "main": {"temp": 15.0, "humidity": 80}
        }"#;

        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();
        let snapshot = snapshot_from_current(parsed);

        assert_eq!(snapshot.description, "Unknown");
    }

    #[test]
    fn forecast_payload_keeps_order() {
        let body = r#"{
            "list": [
                {"dt": 1700000000, "main": {"temp": 10.0, "humidity": 70}, "weather": [{"description": "rain"}]},
                {"dt": 1700010800, "main": {"temp": 12.5, "humidity": 65}, "weather": [{"description": "clear sky"}]}
            ]
        }"#;

        let parsed: OwForecastResponse = serde_json::from_str(body).unwrap();
        let points = points_from_forecast(parsed);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].description, "rain");
        assert_eq!(points[1].temperature_c, 12.5);
        assert!(points[0].timestamp < points[1].timestamp);
    }

    #[test]
    fn pollution_payload_maps_first_entry() {
        let body = r#"{
            "list": [
                {"components": {"pm2_5": 10.0, "pm10": 18.4, "co": 230.3, "no2": 12.0}}
            ]
        }"#;

        let parsed: OwPollutionResponse = serde_json::from_str(body).unwrap();
        let reading = reading_from_pollution(parsed).unwrap();

        assert_eq!(reading.pm2_5, 10.0);
        assert_eq!(reading.pm10, 18.4);
        assert_eq!(reading.co, 230.3);
    }

    #[test]
    fn empty_pollution_list_is_an_error() {
        let parsed: OwPollutionResponse = serde_json::from_str(r#"{"list": []}"#).unwrap();
        let err = reading_from_pollution(parsed).unwrap_err();
        assert!(matches!(err, ProviderError::Empty { .. }));
    }

    #[test]
    fn geocoder_match_yields_coordinates() {
        let matches: Vec<OwGeoEntry> =
            serde_json::from_str(r#"[{"lat": 51.5, "lon": -0.12, "name": "London"}]"#).unwrap();

        let coords = coordinates_from_matches("London", matches).unwrap();
        assert_eq!(coords.lat, 51.5);
        assert_eq!(coords.lon, -0.12);
    }

    #[test]
    fn geocoder_empty_result_is_not_found() {
        let err = coordinates_from_matches("Zzzzzz", Vec::new()).unwrap_err();
        match err {
            ProviderError::NotFound { query } => assert_eq!(query, "Zzzzzz"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}
