use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use common::tracing::init_tracing;
use weather_gateway::api_client::OpenWeatherClient;
use weather_gateway::cache::{CacheStore, NoopCache, RedisCache, ResponseCache};
use weather_gateway::config::Config;
use weather_gateway::handlers::{self, AppState};
use weather_gateway::openapi;
use weather_gateway::service::WeatherService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    init_tracing(&config.log_level);

    // A dead redis downgrades to direct upstream calls instead of blocking
    // startup.
    let store: Arc<dyn CacheStore> = match RedisCache::connect(&config.redis_url()).await {
        Ok(cache) => Arc::new(cache),
        Err(e) => {
            warn!(error = %e, "Redis unavailable, serving without cache");
            Arc::new(NoopCache)
        }
    };
    let cache = ResponseCache::new(store, config.cache_ttl_seconds);

    let client = OpenWeatherClient::new(
        config.openweather_api_url.clone(),
        config.openweather_api_key.clone(),
        config.upstream_timeout_seconds,
    );
    let service = Arc::new(WeatherService::new(cache, client));

    let app = handlers::router(AppState { service })
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.allowed_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Weather gateway starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Weather gateway stopped");
    Ok(())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.iter().any(|origin| origin == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring unparsable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
