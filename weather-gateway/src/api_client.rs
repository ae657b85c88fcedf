use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::CityQuery;
use serde::Deserialize;
use tracing::{error, instrument};

/// Client for the OpenWeatherMap `/data/2.5` API.
///
/// Hands successful payloads back as-is; reshaping into the gateway schema
/// belongs to the service layer.
pub struct OpenWeatherClient {
    http_client: HttpClient,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: String, api_key: String, timeout_secs: u64) -> Self {
        Self {
            http_client: HttpClient::new(timeout_secs),
            base_url,
            api_key,
        }
    }

    /// GET `/weather`: current conditions for a city.
    #[instrument(skip(self), fields(location = %query.location()))]
    pub async fn fetch_current(&self, query: &CityQuery) -> Result<OpenWeatherCurrent, AppError> {
        self.request("/weather", query).await
    }

    /// GET `/forecast`: the 5-day forecast in 3-hour steps.
    #[instrument(skip(self), fields(location = %query.location()))]
    pub async fn fetch_forecast(&self, query: &CityQuery) -> Result<OpenWeatherForecast, AppError> {
        self.request("/forecast", query).await
    }

    async fn request<T>(&self, path: &str, query: &CityQuery) -> Result<T, AppError>
    where
        T: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let location = query.location();
        let params = [
            ("q", location.as_str()),
            ("appid", self.api_key.as_str()),
            ("units", "metric"),
        ];

        let response = self.http_client.get(&url, &params).await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            error!(status = status.as_u16(), body = %body, "OpenWeatherMap API error");
            return Err(AppError::upstream(
                status.as_u16(),
                provider_error_message(&body),
            ));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    message: Option<String>,
}

/// Pull the human-readable `message` out of a provider error body, with a
/// default for bodies that are not JSON or carry no message.
fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<ProviderError>(body)
        .ok()
        .and_then(|e| e.message)
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Raw `/weather` payload. Provider fields the gateway never surfaces are
/// simply not declared.
#[derive(Debug, Deserialize)]
pub struct OpenWeatherCurrent {
    pub name: String,
    pub sys: Sys,
    pub weather: Vec<WeatherCondition>,
    pub main: MainMetrics,
    pub wind: Wind,
    pub clouds: Clouds,
    pub dt: i64,
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    pub country: String,
}

#[derive(Debug, Deserialize)]
pub struct WeatherCondition {
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct MainMetrics {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: u32,
    pub pressure: u32,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Deserialize)]
pub struct Clouds {
    pub all: u32,
}

/// Raw `/forecast` payload.
#[derive(Debug, Deserialize)]
pub struct OpenWeatherForecast {
    pub city: ForecastCity,
    pub list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastCity {
    pub name: String,
    pub country: String,
    pub timezone: i32,
}

#[derive(Debug, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub dt_txt: String,
    pub main: MainMetrics,
    pub weather: Vec<WeatherCondition>,
    pub wind: Wind,
    pub clouds: Clouds,
}
