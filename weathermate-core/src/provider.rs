use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::WeatherError;
use crate::model::{AirQualitySample, Coordinates, ForecastEntry, Units, WeatherReading};

pub mod openweather;
pub mod sunrise;

pub use openweather::OpenWeatherClient;
pub use sunrise::SunriseSunsetClient;

/// Abstraction over a weather backend.
///
/// The app ships one implementation ([`OpenWeatherClient`]); the seam exists
/// so another backend can be dropped in without touching aggregation or
/// rendering.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_weather(&self, city: &str, units: Units)
    -> Result<WeatherReading, WeatherError>;

    /// The raw 3-hourly entries of the 5-day forecast window.
    async fn forecast(&self, city: &str, units: Units)
    -> Result<Vec<ForecastEntry>, WeatherError>;

    async fn coordinates(&self, city: &str) -> Result<Coordinates, WeatherError>;

    async fn air_quality(&self, coords: Coordinates) -> Result<AirQualitySample, WeatherError>;
}

const MIN_CITY_NAME_LEN: usize = 2;
const MAX_CITY_NAME_LEN: usize = 100;

/// Check a city name before it goes anywhere near the network.
///
/// Allowed: letters, digits, spaces, hyphens, apostrophes, commas, periods.
/// The name must contain at least one letter and be at least half letters,
/// which also rules out purely numeric input.
pub fn validate_city_name(city: &str) -> Result<(), WeatherError> {
    let invalid = |reason: String| WeatherError::InvalidCity { reason };

    let trimmed = city.trim();
    if trimmed.is_empty() {
        return Err(invalid("city name cannot be empty".to_string()));
    }

    let len = city.chars().count();
    if len < MIN_CITY_NAME_LEN {
        return Err(invalid(format!(
            "city name must be at least {MIN_CITY_NAME_LEN} characters long"
        )));
    }
    if len > MAX_CITY_NAME_LEN {
        return Err(invalid(format!("city name is too long (max {MAX_CITY_NAME_LEN} characters)")));
    }

    let mut bad_chars: Vec<char> = city
        .chars()
        .filter(|c| !(c.is_alphabetic() || c.is_numeric() || " -',.".contains(*c)))
        .collect();
    bad_chars.dedup();
    if !bad_chars.is_empty() {
        let listed: String =
            bad_chars.iter().map(|c| format!("'{c}'")).collect::<Vec<_>>().join(", ");
        return Err(invalid(format!(
            "invalid characters detected: {listed} \
             (only letters, numbers, spaces, hyphens, apostrophes, commas and periods are allowed)"
        )));
    }

    let letters = city.chars().filter(|c| c.is_alphabetic()).count();
    if letters == 0 {
        return Err(invalid("city name must contain at least one letter".to_string()));
    }

    if letters * 2 < trimmed.chars().count() {
        return Err(invalid("city name contains too many special characters".to_string()));
    }

    Ok(())
}
