use thiserror::Error;

use crate::validate::ValidationError;

/// All failure kinds surfaced by the core library.
///
/// Every provider error is classified at the HTTP boundary; nothing is
/// retried automatically, the caller decides whether to ask again.
#[derive(Debug, Error)]
pub enum WeatherError {
    #[error(
        "No OpenWeather API key configured.\n\
         Hint: set the OPENWEATHER_API_KEY environment variable or run `weathermate configure`."
    )]
    MissingApiKey,

    #[error("Invalid city name: {reason}")]
    InvalidCity { reason: String },

    #[error("City '{city}' not found. Please check the spelling.")]
    CityNotFound { city: String },

    #[error("The weather service rejected the API key (HTTP 401)")]
    InvalidApiKey,

    #[error("Rate limit exceeded (HTTP 429); wait a moment and try again")]
    RateLimited,

    #[error("Weather API request failed with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl WeatherError {
    /// True when the underlying network error was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, WeatherError::Http(e) if e.is_timeout())
    }
}
