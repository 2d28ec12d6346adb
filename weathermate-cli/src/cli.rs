use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Select, Text};
use tracing::warn;

use weathermate_core::{
    CitySnapshot, Comparison, Config, FileHistory, HistoryEntry, HistoryStore, OpenWeatherClient,
    SunriseSunsetClient, Units, WeatherProvider, aggregate_daily,
};

use crate::render;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitsArg {
    Metric,
    Imperial,
}

impl From<UnitsArg> for Units {
    fn from(arg: UnitsArg) -> Self {
        match arg {
            UnitsArg::Metric => Units::Metric,
            UnitsArg::Imperial => Units::Imperial,
        }
    }
}

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathermate", version, about = "Weather lookup CLI")]
pub struct Cli {
    /// Unit system override for this invocation.
    #[arg(long, global = true, value_enum)]
    pub units: Option<UnitsArg>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively store the API key and preferences.
    Configure,

    /// Show current weather, air quality, sun times and the 5-day outlook.
    Show {
        /// City name; falls back to the configured default city.
        city: Option<String>,
    },

    /// Show the 5-day daily forecast.
    Forecast {
        city: Option<String>,

        /// Expand one day (YYYY-MM-DD) into its 3-hourly entries.
        #[arg(long)]
        hourly: Option<NaiveDate>,
    },

    /// Detailed air quality report for a city.
    Air { city: Option<String> },

    /// Sunrise, sunset and daylight length for a city.
    Sun { city: Option<String> },

    /// Recent recorded readings and temperature trend for a city.
    History {
        city: Option<String>,

        /// Maximum number of readings to show.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },

    /// Compare current weather across two or three cities.
    Compare {
        #[arg(num_args = 2..=3, required = true)]
        cities: Vec<String>,
    },

    /// Manage favorite cities.
    #[command(subcommand)]
    Favorite(FavoriteCommand),
}

#[derive(Debug, Subcommand)]
pub enum FavoriteCommand {
    Add { city: String },
    Remove { city: String },
    List,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = Config::load()?;
        let units = self.units.map(Units::from).unwrap_or(config.units);

        match self.command {
            Command::Configure => configure(config),
            Command::Show { city } => show(&config, units, city).await,
            Command::Forecast { city, hourly } => forecast(&config, units, city, hourly).await,
            Command::Air { city } => air(&config, city).await,
            Command::Sun { city } => sun(&config, city).await,
            Command::History { city, limit } => history(&config, units, city, limit),
            Command::Compare { cities } => compare(&config, units, cities).await,
            Command::Favorite(cmd) => favorite(&config, cmd),
        }
    }
}

fn resolve_city(config: &Config, city: Option<String>) -> Result<String> {
    city.or_else(|| config.default_city.clone()).context(
        "No city given and no default city configured.\n\
         Hint: pass a city name or run `weathermate configure`.",
    )
}

fn weather_client(config: &Config) -> Result<OpenWeatherClient> {
    let api_key = config.resolved_api_key()?;
    Ok(OpenWeatherClient::new(api_key, config.timeout())?)
}

fn open_history(config: &Config) -> Result<FileHistory> {
    Ok(FileHistory::open(Config::history_file_path()?, config.history_cap))
}

fn configure(mut config: Config) -> Result<()> {
    let api_key = Text::new("OpenWeather API key:")
        .with_initial_value(config.api_key.as_deref().unwrap_or(""))
        .prompt()?;

    let units = Select::new("Unit system:", vec!["metric", "imperial"]).prompt()?;

    let default_city = Text::new("Default city (leave empty for none):")
        .with_initial_value(config.default_city.as_deref().unwrap_or(""))
        .prompt()?;

    config.api_key = Some(api_key.trim().to_string()).filter(|k| !k.is_empty());
    config.units = units.parse().map_err(anyhow::Error::msg)?;
    config.default_city = Some(default_city.trim().to_string()).filter(|c| !c.is_empty());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn show(config: &Config, units: Units, city: Option<String>) -> Result<()> {
    let city = resolve_city(config, city)?;
    let client = weather_client(config)?;

    let reading = client.current_weather(&city, units).await?;

    // The extras degrade to "unavailable" instead of failing the lookup.
    let (air, sun) = match client.coordinates(&city).await {
        Ok(coords) => {
            let air = client.air_quality(coords).await.ok();
            let sun = match SunriseSunsetClient::new(config.timeout()) {
                Ok(sun_client) => sun_client.sun_times(coords).await.ok(),
                Err(_) => None,
            };
            (air, sun)
        }
        Err(e) => {
            warn!(error = %e, "could not resolve coordinates, skipping extras");
            (None, None)
        }
    };

    print!("{}", render::current(&reading, units, air.as_ref(), sun.as_ref()));

    match client.forecast(&city, units).await {
        Ok(entries) => print!("{}", render::forecast_summary(&aggregate_daily(entries), units)),
        Err(e) => println!("\nForecast unavailable: {e}"),
    }

    let mut store = open_history(config)?;
    store.record(
        &reading.city,
        HistoryEntry {
            recorded_at: Utc::now(),
            temperature: reading.temperature,
            condition: reading.condition.clone(),
        },
    )?;

    Ok(())
}

async fn forecast(
    config: &Config,
    units: Units,
    city: Option<String>,
    hourly: Option<NaiveDate>,
) -> Result<()> {
    let city = resolve_city(config, city)?;
    let client = weather_client(config)?;

    let entries = client.forecast(&city, units).await?;
    let days = aggregate_daily(entries);

    match hourly {
        Some(date) => match days.iter().find(|d| d.date == date) {
            Some(day) => print!("{}", render::forecast_hourly(day, units)),
            None => bail!("No forecast data for {date}"),
        },
        None => print!("{}", render::forecast_summary(&days, units)),
    }

    Ok(())
}

async fn air(config: &Config, city: Option<String>) -> Result<()> {
    let city = resolve_city(config, city)?;
    let client = weather_client(config)?;

    let coords = client.coordinates(&city).await?;
    let sample = client.air_quality(coords).await?;
    print!("{}", render::air_report(&city, &sample));
    Ok(())
}

async fn sun(config: &Config, city: Option<String>) -> Result<()> {
    let city = resolve_city(config, city)?;
    let client = weather_client(config)?;

    let coords = client.coordinates(&city).await?;
    let sun = SunriseSunsetClient::new(config.timeout())?.sun_times(coords).await?;
    print!("{}", render::sun_info(&city, &sun));
    Ok(())
}

fn history(config: &Config, units: Units, city: Option<String>, limit: usize) -> Result<()> {
    let city = resolve_city(config, city)?;
    let store = open_history(config)?;

    let entries = store.recent(&city, limit);
    if entries.is_empty() {
        println!("No readings recorded for {city} yet.");
        return Ok(());
    }

    print!("{}", render::history_report(&city, &entries, units));
    Ok(())
}

async fn compare(config: &Config, units: Units, cities: Vec<String>) -> Result<()> {
    let client = weather_client(config)?;

    let mut comparison = Comparison::new();
    for city in &cities {
        let reading = client
            .current_weather(city, units)
            .await
            .with_context(|| format!("Could not fetch weather for '{city}'"))?;

        let air_quality = match client.coordinates(city).await {
            Ok(coords) => client.air_quality(coords).await.ok(),
            Err(_) => None,
        };

        if !comparison.add(CitySnapshot { reading, air_quality }) {
            bail!("Comparison is limited to {} cities", weathermate_core::MAX_COMPARED_CITIES);
        }
    }

    print!("{}", render::comparison(&comparison, units));
    Ok(())
}

fn favorite(config: &Config, cmd: FavoriteCommand) -> Result<()> {
    let mut store = open_history(config)?;

    match cmd {
        FavoriteCommand::Add { city } => {
            weathermate_core::validate_city_name(&city)?;
            store.add_favorite(&city)?;
            println!("Added {city} to favorites.");
        }
        FavoriteCommand::Remove { city } => {
            store.remove_favorite(&city)?;
            println!("Removed {city} from favorites.");
        }
        FavoriteCommand::List => {
            let favorites = store.favorites();
            if favorites.is_empty() {
                println!("No favorite cities yet.");
            } else {
                for city in favorites {
                    println!("{city}");
                }
            }
        }
    }

    Ok(())
}
