//! Core library for the `weathermate` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeatherMap and Sunrise-Sunset clients behind a provider trait
//! - Structural validation of raw API responses
//! - Forecast aggregation into daily summaries
//! - The bounded search history / favorites store
//!
//! It is used by `weathermate-cli`, but can also be reused by other binaries
//! or services.

pub mod compare;
pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod provider;
pub mod validate;

pub use compare::{CitySnapshot, Comparison, MAX_COMPARED_CITIES};
pub use config::{API_KEY_ENV, Config};
pub use error::WeatherError;
pub use forecast::{FORECAST_DAYS, aggregate_daily};
pub use history::{DEFAULT_HISTORY_CAP, FileHistory, HistoryStore, MemoryHistory};
pub use model::{
    AirQualitySample, AqiLevel, Coordinates, ForecastDay, ForecastEntry, HistoryEntry,
    Pollutants, SunTimes, Units, WeatherReading,
};
pub use provider::{
    OpenWeatherClient, SunriseSunsetClient, WeatherProvider, validate_city_name,
};
pub use validate::ValidationError;
