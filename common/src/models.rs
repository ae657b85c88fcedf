use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

/// A validated lookup target: a non-blank city name plus an optional
/// ISO 3166-1 alpha-2 country code.
///
/// The `location()` string feeds both the upstream `q` parameter and the
/// cache key, so a given query always resolves to the same key.
#[derive(Debug, Clone)]
pub struct CityQuery {
    city: String,
    country_code: Option<String>,
}

impl CityQuery {
    pub fn new(city: impl Into<String>, country_code: Option<String>) -> Result<Self, AppError> {
        let city = city.into();
        if city.trim().is_empty() {
            return Err(AppError::validation("city query parameter is required"));
        }

        // A blank country code behaves as if it was never sent.
        let country_code = country_code.filter(|code| !code.trim().is_empty());

        Ok(Self { city, country_code })
    }

    /// `"City"` or `"City,CC"`, exactly as sent upstream.
    pub fn location(&self) -> String {
        match &self.country_code {
            Some(code) => format!("{},{}", self.city, code),
            None => self.city.clone(),
        }
    }
}

/// Current conditions block of [`WeatherResponse`].
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherDetail {
    pub description: String,
    pub icon: String,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    pub feels_like: f64,
    /// Relative humidity in percent.
    pub humidity: u32,
    /// Atmospheric pressure in hPa.
    pub pressure: u32,
    /// Wind speed in meters per second.
    pub wind_speed: f64,
    /// Cloud cover in percent.
    pub clouds: u32,
}

/// Current weather in the gateway's stable schema.
///
/// Field order is the wire order; cached entries re-serialize to the exact
/// bytes a fresh response would carry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherResponse {
    pub success: bool,
    pub city: String,
    pub country: String,
    pub weather: WeatherDetail,
    /// Unix timestamp (UTC seconds) of the observation.
    pub timestamp: i64,
    /// Offset from UTC in seconds.
    pub timezone: i32,
}

/// One 3-hour forecast slot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastItem {
    /// `YYYY-MM-DD`, the first token of the provider's `dt_txt`.
    pub date: String,
    /// `HH:MM:SS`, the second token of the provider's `dt_txt`.
    pub time: String,
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
    pub description: String,
    pub icon: String,
    pub wind_speed: f64,
    pub clouds: u32,
}

/// Five-day forecast in 3-hour steps. `forecast` keeps the provider's
/// chronological order untouched.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ForecastResponse {
    pub success: bool,
    pub city: String,
    pub country: String,
    pub forecast: Vec<ForecastItem>,
    pub timezone: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_joins_city_and_country_code() {
        let query = CityQuery::new("London", Some("GB".to_string())).unwrap();
        assert_eq!(query.location(), "London,GB");
    }

    #[test]
    fn location_without_country_code_is_just_the_city() {
        let query = CityQuery::new("London", None).unwrap();
        assert_eq!(query.location(), "London");
    }

    #[test]
    fn blank_city_is_rejected() {
        assert!(CityQuery::new("", None).is_err());
        assert!(CityQuery::new("   ", None).is_err());
    }

    #[test]
    fn blank_country_code_is_treated_as_absent() {
        let query = CityQuery::new("London", Some("  ".to_string())).unwrap();
        assert_eq!(query.location(), "London");
    }
}
