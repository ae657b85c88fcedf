use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{ForecastItem, ForecastResponse, WeatherDetail, WeatherResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_weather,
        handlers::get_forecast,
    ),
    components(schemas(
        WeatherResponse,
        WeatherDetail,
        ForecastResponse,
        ForecastItem,
    )),
    tags(
        (name = "weather", description = "Current weather and forecast lookups"),
    ),
)]
struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
