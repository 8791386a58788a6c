//! Dashboard state machine.
//!
//! The controller owns all view state and reacts to two independent input
//! channels: the city text and the news query text. Each channel separates
//! *issuing* a request (which bumps a generation counter and hands out a
//! ticket) from *applying* its settled result (which is discarded if the
//! ticket's generation is no longer current). A single logical control
//! thread can therefore interleave transitions freely: a slower, earlier
//! fetch that settles after a newer one never overwrites newer state.

use crate::{
    error::ProviderError,
    model::{AirQualityReading, ForecastPoint, NewsArticle, PinnedEntry, WeatherSnapshot},
    provider::{NewsProvider, WeatherProvider},
};

/// Upper bound on retained snapshots; a pin request beyond this is a no-op.
pub const MAX_PINNED: usize = 4;

/// Everything a front end needs to render.
///
/// The three weather fields always describe the same city and are only ever
/// replaced together.
#[derive(Debug, Default)]
pub struct DashboardState {
    pub city_input: String,
    pub current_weather: Option<WeatherSnapshot>,
    pub current_forecast: Option<Vec<ForecastPoint>>,
    pub current_air_quality: Option<AirQualityReading>,
    pub weather_error: bool,
    pub pinned: Vec<PinnedEntry>,
    pub news_query: String,
    pub news_articles: Vec<NewsArticle>,
}

/// Handle for one issued weather chain. Settling it is only meaningful
/// through [`DashboardController::apply_weather`].
#[derive(Debug, Clone)]
pub struct WeatherTicket {
    city: String,
    generation: u64,
}

/// Handle for one issued news fetch.
#[derive(Debug, Clone)]
pub struct NewsTicket {
    query: String,
    generation: u64,
}

/// Settled result of a full weather chain. All three parts are present, so
/// applying a bundle can never leave the view in a mixed old/new state.
#[derive(Debug, Clone)]
pub struct WeatherBundle {
    pub weather: WeatherSnapshot,
    pub forecast: Vec<ForecastPoint>,
    pub air_quality: AirQualityReading,
}

#[derive(Debug)]
pub struct DashboardController {
    weather: Box<dyn WeatherProvider>,
    news: Box<dyn NewsProvider>,
    state: DashboardState,
    weather_generation: u64,
    news_generation: u64,
}

impl DashboardController {
    pub fn new(weather: Box<dyn WeatherProvider>, news: Box<dyn NewsProvider>) -> Self {
        Self {
            weather,
            news,
            state: DashboardState::default(),
            weather_generation: 0,
            news_generation: 0,
        }
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    /// City input changed. An empty (or blank) input clears the weather view
    /// as a whole and returns no ticket; otherwise the caller gets a ticket
    /// to drive through [`fetch_weather`](Self::fetch_weather) and
    /// [`apply_weather`](Self::apply_weather).
    ///
    /// Either way the weather generation advances, so an in-flight chain for
    /// a previous input can no longer settle into state.
    pub fn city_changed(&mut self, city: &str) -> Option<WeatherTicket> {
        let trimmed = city.trim();
        self.state.city_input = trimmed.to_string();
        self.weather_generation += 1;

        if trimmed.is_empty() {
            self.state.current_weather = None;
            self.state.current_forecast = None;
            self.state.current_air_quality = None;
            self.state.weather_error = false;
            return None;
        }

        tracing::debug!(city = trimmed, generation = self.weather_generation, "issuing weather chain");

        Some(WeatherTicket {
            city: trimmed.to_string(),
            generation: self.weather_generation,
        })
    }

    /// Run the fetch chain for one ticket: geocoding first (air quality
    /// needs the coordinates), then current weather, forecast, and air
    /// quality together. Does not touch state.
    pub async fn fetch_weather(
        &self,
        ticket: &WeatherTicket,
    ) -> Result<WeatherBundle, ProviderError> {
        let coords = self.weather.resolve_coordinates(&ticket.city).await?;

        let (weather, forecast, air_quality) = tokio::try_join!(
            self.weather.current_weather(&ticket.city),
            self.weather.forecast(&ticket.city),
            self.weather.air_quality(coords.lat, coords.lon),
        )?;

        Ok(WeatherBundle {
            weather,
            forecast,
            air_quality,
        })
    }

    /// Settle a weather chain. Stale tickets are dropped. On success all
    /// three view fields are replaced together; on failure the previous view
    /// is kept and only the error flag is raised.
    pub fn apply_weather(
        &mut self,
        ticket: &WeatherTicket,
        outcome: Result<WeatherBundle, ProviderError>,
    ) {
        if ticket.generation != self.weather_generation {
            tracing::debug!(city = %ticket.city, "discarding stale weather result");
            return;
        }

        match outcome {
            Ok(bundle) => {
                self.state.current_weather = Some(bundle.weather);
                self.state.current_forecast = Some(bundle.forecast);
                self.state.current_air_quality = Some(bundle.air_quality);
                self.state.weather_error = false;
            }
            Err(err) => {
                tracing::debug!(city = %ticket.city, error = %err, "weather chain failed");
                self.state.weather_error = true;
            }
        }
    }

    /// News query changed. Always issues a fetch: an empty query means "top
    /// headlines", not "no query".
    pub fn news_query_changed(&mut self, query: &str) -> NewsTicket {
        self.state.news_query = query.trim().to_string();
        self.news_generation += 1;

        NewsTicket {
            query: self.state.news_query.clone(),
            generation: self.news_generation,
        }
    }

    pub async fn fetch_news(&self, ticket: &NewsTicket) -> Result<Vec<NewsArticle>, ProviderError> {
        if ticket.query.is_empty() {
            self.news.top_headlines().await
        } else {
            self.news.search(&ticket.query).await
        }
    }

    /// Settle a news fetch. Stale tickets are dropped. Failures keep the
    /// previous list on screen and only leave a trace in the log.
    pub fn apply_news(
        &mut self,
        ticket: &NewsTicket,
        outcome: Result<Vec<NewsArticle>, ProviderError>,
    ) {
        if ticket.generation != self.news_generation {
            tracing::debug!(query = %ticket.query, "discarding stale news result");
            return;
        }

        match outcome {
            Ok(articles) => self.state.news_articles = articles,
            Err(err) => {
                tracing::warn!(query = %ticket.query, error = %err, "news fetch failed, keeping previous list");
            }
        }
    }

    /// Pin the current weather snapshot. Returns whether the list changed;
    /// `false` (no current weather, or already at capacity) is a no-op, not
    /// an error.
    pub fn pin_current(&mut self) -> bool {
        if self.state.pinned.len() >= MAX_PINNED {
            return false;
        }

        let Some(snapshot) = self.state.current_weather.clone() else {
            return false;
        };

        self.state.pinned.push(PinnedEntry { snapshot });
        true
    }

    /// Remove the pinned entry at `index`; later entries shift down by one.
    /// Out-of-range indices are a no-op.
    pub fn remove_pinned(&mut self, index: usize) -> bool {
        if index >= self.state.pinned.len() {
            return false;
        }

        self.state.pinned.remove(index);
        true
    }

    /// Issue, fetch, and apply in one step, for callers that serialize their
    /// transitions anyway (the CLI loop).
    pub async fn submit_city(&mut self, city: &str) {
        if let Some(ticket) = self.city_changed(city) {
            let outcome = self.fetch_weather(&ticket).await;
            self.apply_weather(&ticket, outcome);
        }
    }

    pub async fn submit_news_query(&mut self, query: &str) {
        let ticket = self.news_query_changed(query);
        let outcome = self.fetch_news(&ticket).await;
        self.apply_news(&ticket, outcome);
    }

    /// Re-run both channels with their current inputs.
    pub async fn refresh(&mut self) {
        let city = self.state.city_input.clone();
        if !city.is_empty() {
            self.submit_city(&city).await;
        }

        let query = self.state.news_query.clone();
        self.submit_news_query(&query).await;
    }
}
