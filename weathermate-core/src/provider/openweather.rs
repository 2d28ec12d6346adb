use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use crate::error::WeatherError;
use crate::model::{AirQualitySample, Coordinates, ForecastEntry, Units, WeatherReading};
use crate::validate;

use super::{WeatherProvider, validate_city_name};

pub const WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";
pub const AIR_QUALITY_URL: &str = "https://api.openweathermap.org/data/2.5/air_pollution";

/// Client for the free-tier OpenWeatherMap endpoints: current weather,
/// 5-day/3-hour forecast and air pollution.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { api_key, http })
    }

    async fn get_json(
        &self,
        url: &str,
        query: &[(&str, &str)],
        city: Option<&str>,
    ) -> Result<Value, WeatherError> {
        let res = self.http.get(url).query(query).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, &body, city));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(
        &self,
        city: &str,
        units: Units,
    ) -> Result<WeatherReading, WeatherError> {
        validate_city_name(city)?;
        debug!(%city, %units, "fetching current weather");

        let body = self
            .get_json(
                WEATHER_URL,
                &[("q", city), ("appid", self.api_key.as_str()), ("units", units.api_value())],
                Some(city),
            )
            .await?;

        Ok(validate::current_weather(city, &body)?)
    }

    async fn forecast(&self, city: &str, units: Units) -> Result<Vec<ForecastEntry>, WeatherError> {
        validate_city_name(city)?;
        debug!(%city, %units, "fetching 5-day forecast");

        let body = self
            .get_json(
                FORECAST_URL,
                &[("q", city), ("appid", self.api_key.as_str()), ("units", units.api_value())],
                Some(city),
            )
            .await?;

        Ok(validate::forecast(&body)?)
    }

    async fn coordinates(&self, city: &str) -> Result<Coordinates, WeatherError> {
        validate_city_name(city)?;
        debug!(%city, "resolving coordinates");

        let body = self
            .get_json(WEATHER_URL, &[("q", city), ("appid", self.api_key.as_str())], Some(city))
            .await?;

        Ok(validate::coordinates(&body)?)
    }

    async fn air_quality(&self, coords: Coordinates) -> Result<AirQualitySample, WeatherError> {
        debug!(lat = coords.lat, lon = coords.lon, "fetching air quality");

        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();
        let body = self
            .get_json(
                AIR_QUALITY_URL,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("appid", self.api_key.as_str())],
                None,
            )
            .await?;

        Ok(validate::air_quality(&body)?)
    }
}

/// Map a non-success status to its error kind; 404 on a city lookup means
/// the city does not exist, which must stay distinct from network failures.
pub(crate) fn classify_status(status: StatusCode, body: &str, city: Option<&str>) -> WeatherError {
    match status.as_u16() {
        404 => WeatherError::CityNotFound { city: city.unwrap_or("<unknown>").to_string() },
        401 => WeatherError::InvalidApiKey,
        429 => WeatherError::RateLimited,
        s => WeatherError::Api { status: s, body: truncate_body(body) },
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_city_not_found() {
        let err = classify_status(
            StatusCode::NOT_FOUND,
            r#"{"cod":"404","message":"city not found"}"#,
            Some("Atlantis"),
        );
        match err {
            WeatherError::CityNotFound { city } => assert_eq!(city, "Atlantis"),
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[test]
    fn auth_and_rate_limit_have_their_own_kinds() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, "", None),
            WeatherError::InvalidApiKey
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, "", None),
            WeatherError::RateLimited
        ));
    }

    #[test]
    fn other_statuses_carry_status_and_body() {
        let err = classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom", Some("London"));
        match err {
            WeatherError::Api { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn city_not_found_is_not_a_network_error() {
        let err = classify_status(StatusCode::NOT_FOUND, "", Some("Atlantis"));
        assert!(!matches!(err, WeatherError::Http(_)));
        assert!(!err.is_timeout());
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        let truncated = truncate_body(&body);
        assert_eq!(truncated.chars().count(), 203);
        assert!(truncated.ends_with("..."));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let body = "й".repeat(300);
        let truncated = truncate_body(&body);
        assert!(truncated.ends_with("..."));
    }

    #[tokio::test]
    async fn invalid_city_fails_before_any_request() {
        let client =
            OpenWeatherClient::new("KEY".to_string(), Duration::from_secs(1)).unwrap();
        let err = client.current_weather("", Units::Metric).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidCity { .. }));
    }
}
