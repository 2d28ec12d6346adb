use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::WeatherError;
use crate::model::{Coordinates, SunTimes};
use crate::validate;

use super::openweather::classify_status;

pub const SUNRISE_SUNSET_URL: &str = "https://api.sunrise-sunset.org/json";

/// Client for the keyless Sunrise-Sunset.org API.
#[derive(Debug, Clone)]
pub struct SunriseSunsetClient {
    http: Client,
}

impl SunriseSunsetClient {
    pub fn new(timeout: Duration) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Sunrise and sunset instants for a location, in UTC.
    pub async fn sun_times(&self, coords: Coordinates) -> Result<SunTimes, WeatherError> {
        debug!(lat = coords.lat, lon = coords.lon, "fetching sunrise/sunset");

        let lat = coords.lat.to_string();
        let lng = coords.lon.to_string();
        let res = self
            .http
            .get(SUNRISE_SUNSET_URL)
            // formatted=0 switches the API to ISO-8601 timestamps.
            .query(&[("lat", lat.as_str()), ("lng", lng.as_str()), ("formatted", "0")])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            return Err(classify_status(status, &body, None));
        }

        let body: Value = serde_json::from_str(&body)?;
        Ok(validate::sun_times(&body)?)
    }
}
