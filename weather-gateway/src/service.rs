use common::errors::AppError;
use common::models::{CityQuery, ForecastItem, ForecastResponse, WeatherDetail, WeatherResponse};
use tracing::{info, instrument};

use crate::api_client::{ForecastEntry, OpenWeatherClient, OpenWeatherCurrent, OpenWeatherForecast};
use crate::cache::ResponseCache;

const WEATHER_KEY_PREFIX: &str = "weather";
const FORECAST_KEY_PREFIX: &str = "forecast";

/// Cache-aside orchestration for both lookup kinds: build the key, try the
/// cache, fetch and reshape on a miss, then write back best-effort.
pub struct WeatherService {
    cache: ResponseCache,
    client: OpenWeatherClient,
}

impl WeatherService {
    pub fn new(cache: ResponseCache, client: OpenWeatherClient) -> Self {
        Self { cache, client }
    }

    #[instrument(skip(self), fields(location = %query.location()))]
    pub async fn current_weather(&self, query: &CityQuery) -> Result<WeatherResponse, AppError> {
        let key = cache_key(WEATHER_KEY_PREFIX, query);

        if let Some(cached) = self.cache.get::<WeatherResponse>(&key).await {
            info!(key = %key, "Serving current weather from cache");
            return Ok(cached);
        }

        info!(key = %key, "Fetching current weather from OpenWeatherMap");
        let raw = self.client.fetch_current(query).await?;
        let response = reshape_current(raw)?;

        // The response is already in hand; a failed write only logs.
        self.cache.set(&key, &response).await;

        Ok(response)
    }

    #[instrument(skip(self), fields(location = %query.location()))]
    pub async fn forecast(&self, query: &CityQuery) -> Result<ForecastResponse, AppError> {
        let key = cache_key(FORECAST_KEY_PREFIX, query);

        if let Some(cached) = self.cache.get::<ForecastResponse>(&key).await {
            info!(key = %key, "Serving forecast from cache");
            return Ok(cached);
        }

        info!(key = %key, "Fetching forecast from OpenWeatherMap");
        let raw = self.client.fetch_forecast(query).await?;
        let response = reshape_forecast(raw)?;

        self.cache.set(&key, &response).await;

        Ok(response)
    }
}

/// Same query, same key, at every call site.
fn cache_key(prefix: &str, query: &CityQuery) -> String {
    format!("{}:{}", prefix, query.location())
}

fn reshape_current(raw: OpenWeatherCurrent) -> Result<WeatherResponse, AppError> {
    let condition = raw
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| AppError::decode("current weather payload has no conditions"))?;

    Ok(WeatherResponse {
        success: true,
        city: raw.name,
        country: raw.sys.country,
        weather: WeatherDetail {
            description: condition.description,
            icon: condition.icon,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.speed,
            clouds: raw.clouds.all,
        },
        timestamp: raw.dt,
        timezone: raw.timezone,
    })
}

fn reshape_forecast(raw: OpenWeatherForecast) -> Result<ForecastResponse, AppError> {
    let forecast = raw
        .list
        .into_iter()
        .map(reshape_forecast_entry)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ForecastResponse {
        success: true,
        city: raw.city.name,
        country: raw.city.country,
        forecast,
        timezone: raw.city.timezone,
    })
}

fn reshape_forecast_entry(entry: ForecastEntry) -> Result<ForecastItem, AppError> {
    // dt_txt is "YYYY-MM-DD HH:MM:SS"; one split, date then time.
    let (date, time) = match entry.dt_txt.split_once(' ') {
        Some((date, time)) => (date.to_string(), time.to_string()),
        None => return Err(AppError::decode("forecast entry has a malformed dt_txt")),
    };

    let condition = entry
        .weather
        .into_iter()
        .next()
        .ok_or_else(|| AppError::decode("forecast entry has no conditions"))?;

    Ok(ForecastItem {
        date,
        time,
        timestamp: entry.dt,
        temperature: entry.main.temp,
        feels_like: entry.main.feels_like,
        humidity: entry.main.humidity,
        pressure: entry.main.pressure,
        description: condition.description,
        icon: condition.icon,
        wind_speed: entry.wind.speed,
        clouds: entry.clouds.all,
    })
}
