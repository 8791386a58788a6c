//! Renders dashboard state as plain terminal text.

use chrono::Local;
use skywatch_core::DashboardState;

/// Forecast points shown in the short-term block; the upstream list is
/// 3-hourly and longer.
const FORECAST_POINTS: usize = 5;

/// Headlines shown before the list is cut off.
const NEWS_ITEMS: usize = 10;

pub fn render(state: &DashboardState) {
    println!();
    render_weather(state);
    println!();
    render_news(state);
    println!();
    render_pinned(state);
    println!();
}

fn render_weather(state: &DashboardState) {
    println!("=== Weather ===");

    match &state.current_weather {
        Some(weather) => {
            println!("{}", weather.location_name);
            println!("  {}", weather.description);
            println!("  Temperature: {:.1}°C", weather.temperature_c);
            println!("  Humidity: {}%", weather.humidity_pct);
        }
        None if state.city_input.is_empty() => println!("Enter a city to see the weather."),
        None => {}
    }

    if state.weather_error {
        println!("Failed to fetch weather data for '{}'.", state.city_input);
    }

    if let Some(forecast) = &state.current_forecast {
        println!("--- 3-hour forecast ---");
        for point in forecast.iter().take(FORECAST_POINTS) {
            println!(
                "  {}  {:>6.1}°C  {}",
                point.timestamp.with_timezone(&Local).format("%a %H:%M"),
                point.temperature_c,
                point.description,
            );
        }
    }

    if let Some(air) = &state.current_air_quality {
        println!("--- Air quality ---");
        println!("  PM2.5: {} µg/m³", air.pm2_5);
        println!("  PM10:  {} µg/m³", air.pm10);
        println!("  CO:    {} µg/m³", air.co);
    }
}

fn render_news(state: &DashboardState) {
    if state.news_query.is_empty() {
        println!("=== News (top headlines) ===");
    } else {
        println!("=== News ({}) ===", state.news_query);
    }

    if state.news_articles.is_empty() {
        println!("No news available.");
        return;
    }

    for article in state.news_articles.iter().take(NEWS_ITEMS) {
        println!("* {}", article.title);
        if !article.description.is_empty() {
            println!("  {}", article.description);
        }
        println!("  {}", article.url);
    }

    if state.news_articles.len() > NEWS_ITEMS {
        println!(
            "  ... and {} more",
            state.news_articles.len() - NEWS_ITEMS
        );
    }
}

fn render_pinned(state: &DashboardState) {
    println!("=== Pinned locations ===");

    if state.pinned.is_empty() {
        println!("No pinned locations.");
        return;
    }

    for (i, entry) in state.pinned.iter().enumerate() {
        let snapshot = &entry.snapshot;
        println!(
            "{}: {}  {:.1}°C  {}%  {}",
            i + 1,
            snapshot.location_name,
            snapshot.temperature_c,
            snapshot.humidity_pct,
            snapshot.description,
        );
    }
}
