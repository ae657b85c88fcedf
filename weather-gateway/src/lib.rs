//! Weather gateway: current conditions and 5-day forecasts proxied from
//! OpenWeatherMap behind a redis cache-aside layer.

pub mod api_client;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod openapi;
pub mod service;
