use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};

use skywatch_core::{
    Config, DashboardController, MAX_PINNED, ProviderId,
    provider::{news_provider_from_config, weather_provider_from_config},
};

use crate::view;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skywatch", version, about = "Weather and news dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "openweather" or "newsapi".
        provider: String,
    },

    /// Launch the interactive dashboard.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure { provider } => configure(&provider),
            Command::Dashboard => dashboard().await,
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let mut config = Config::load()?;
    config.upsert_provider_api_key(id, api_key);
    config.save()?;

    println!(
        "Saved API key for {id} to {}",
        Config::config_file_path()?.display()
    );

    Ok(())
}

const SET_CITY: &str = "Set city";
const SEARCH_NEWS: &str = "Search news";
const PIN: &str = "Pin current weather";
const REMOVE_PIN: &str = "Remove pinned entry";
const REFRESH: &str = "Refresh";
const QUIT: &str = "Quit";

async fn dashboard() -> anyhow::Result<()> {
    let config = Config::load()?;
    let weather = weather_provider_from_config(&config)?;
    let news = news_provider_from_config(&config)?;

    let mut controller = DashboardController::new(weather, news);

    // An empty search box means top headlines, so show those right away.
    controller.submit_news_query("").await;

    loop {
        view::render(controller.state());

        let choice = Select::new(
            "Action:",
            vec![SET_CITY, SEARCH_NEWS, PIN, REMOVE_PIN, REFRESH, QUIT],
        )
        .prompt()
        .context("Failed to read menu choice")?;

        match choice {
            SET_CITY => {
                let city = Text::new("City (empty to clear):")
                    .prompt()
                    .context("Failed to read city")?;
                controller.submit_city(&city).await;
            }
            SEARCH_NEWS => {
                let query = Text::new("News search (empty for top headlines):")
                    .prompt()
                    .context("Failed to read news query")?;
                controller.submit_news_query(&query).await;
            }
            PIN => {
                if !controller.pin_current() {
                    println!(
                        "Nothing pinned: you need a current city and fewer than {MAX_PINNED} pins."
                    );
                }
            }
            REMOVE_PIN => remove_pinned(&mut controller)?,
            REFRESH => controller.refresh().await,
            QUIT => break,
            _ => unreachable!("menu options are fixed"),
        }
    }

    Ok(())
}

fn remove_pinned(controller: &mut DashboardController) -> anyhow::Result<()> {
    let pinned = &controller.state().pinned;
    if pinned.is_empty() {
        println!("No pinned locations.");
        return Ok(());
    }

    let labels: Vec<String> = pinned
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                "{}: {} ({:.1}°C, {})",
                i + 1,
                entry.snapshot.location_name,
                entry.snapshot.temperature_c,
                entry.snapshot.description,
            )
        })
        .collect();

    let picked = Select::new("Remove which pin?", labels.clone())
        .prompt()
        .context("Failed to read pin choice")?;

    if let Some(index) = labels.iter().position(|label| *label == picked) {
        controller.remove_pinned(index);
    }

    Ok(())
}
