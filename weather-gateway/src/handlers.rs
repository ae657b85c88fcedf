use axum::{
    Router,
    extract::{Query, State},
    response::Json,
    routing::get,
};
use common::errors::AppError;
use common::models::{CityQuery, ForecastResponse, WeatherResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

use crate::service::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService>,
}

/// Raw query parameters. Everything is optional so a missing city produces
/// the uniform JSON error body instead of an extractor rejection.
#[derive(Debug, Deserialize)]
pub struct WeatherParams {
    city: Option<String>,
    #[serde(alias = "countryCode")]
    country_code: Option<String>,
}

impl WeatherParams {
    fn into_query(self) -> Result<CityQuery, AppError> {
        CityQuery::new(self.city.unwrap_or_default(), self.country_code)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .route("/forecast", get(get_forecast))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service liveness; no dependencies are checked")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[utoipa::path(
    get,
    path = "/weather",
    params(
        ("city" = String, Query, description = "City name"),
        ("country_code" = Option<String>, Query, description = "ISO 3166-1 alpha-2 country code")
    ),
    responses(
        (status = 200, description = "Current weather for the city", body = WeatherResponse),
        (status = 404, description = "City unknown to the weather provider"),
        (status = 422, description = "Missing or blank city parameter"),
        (status = 502, description = "Weather provider unreachable")
    ),
    tag = "weather"
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<WeatherResponse>, AppError> {
    let query = params.into_query()?;
    info!(location = %query.location(), "Weather request received");

    let response = state.service.current_weather(&query).await?;

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/forecast",
    params(
        ("city" = String, Query, description = "City name"),
        ("country_code" = Option<String>, Query, description = "ISO 3166-1 alpha-2 country code")
    ),
    responses(
        (status = 200, description = "5-day forecast in 3-hour steps", body = ForecastResponse),
        (status = 404, description = "City unknown to the weather provider"),
        (status = 422, description = "Missing or blank city parameter"),
        (status = 502, description = "Weather provider unreachable")
    ),
    tag = "weather"
)]
pub async fn get_forecast(
    State(state): State<AppState>,
    Query(params): Query<WeatherParams>,
) -> Result<Json<ForecastResponse>, AppError> {
    let query = params.into_query()?;
    info!(location = %query.location(), "Forecast request received");

    let response = state.service.forecast(&query).await?;

    Ok(Json(response))
}
