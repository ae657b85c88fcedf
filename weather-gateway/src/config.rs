use std::env;

/// Runtime configuration, read once at startup. Missing or unparsable
/// variables fall back to their defaults.
pub struct Config {
    pub port: u16,
    pub openweather_api_key: String,
    pub openweather_api_url: String,
    pub upstream_timeout_seconds: u64,
    pub redis_host: String,
    pub redis_port: u16,
    pub redis_password: Option<String>,
    pub redis_db: i64,
    pub cache_ttl_seconds: u64,
    pub allowed_origins: Vec<String>,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            openweather_api_key: env::var("OPENWEATHER_API_KEY")
                .unwrap_or_else(|_| "dummy_key".to_string()),
            openweather_api_url: env::var("OPENWEATHER_API_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
            redis_host: env::var("REDIS_HOST").unwrap_or_else(|_| "localhost".to_string()),
            redis_port: env::var("REDIS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(6379),
            redis_password: env::var("REDIS_PASSWORD").ok().filter(|p| !p.is_empty()),
            redis_db: env::var("REDIS_DB")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(0),
            cache_ttl_seconds: env::var("REDIS_CACHE_TTL")
                .ok()
                .and_then(|t| t.parse().ok())
                .unwrap_or(600), // 10 minutes default
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|origins| {
                    origins
                        .split(',')
                        .map(|origin| origin.trim().to_string())
                        .filter(|origin| !origin.is_empty())
                        .collect()
                })
                .unwrap_or_else(|_| vec!["*".to_string()]),
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }

    /// Connection URL for redis. The password is percent-encoded so reserved
    /// characters survive URL parsing.
    pub fn redis_url(&self) -> String {
        match &self.redis_password {
            Some(password) => format!(
                "redis://:{}@{}:{}/{}",
                urlencoding::encode(password),
                self.redis_host,
                self.redis_port,
                self.redis_db
            ),
            None => format!(
                "redis://{}:{}/{}",
                self.redis_host, self.redis_port, self.redis_db
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config {
            port: 8000,
            openweather_api_key: "dummy_key".to_string(),
            openweather_api_url: "https://api.openweathermap.org/data/2.5".to_string(),
            upstream_timeout_seconds: 10,
            redis_host: "localhost".to_string(),
            redis_port: 6379,
            redis_password: None,
            redis_db: 0,
            cache_ttl_seconds: 600,
            allowed_origins: vec!["*".to_string()],
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn redis_url_without_password() {
        let config = base_config();
        assert_eq!(config.redis_url(), "redis://localhost:6379/0");
    }

    #[test]
    fn redis_url_with_password() {
        let config = Config {
            redis_password: Some("hunter2".to_string()),
            ..base_config()
        };
        assert_eq!(config.redis_url(), "redis://:hunter2@localhost:6379/0");
    }

    #[test]
    fn redis_url_encodes_reserved_password_characters() {
        let config = Config {
            redis_password: Some("p@ss/word:1".to_string()),
            ..base_config()
        };
        assert_eq!(config.redis_url(), "redis://:p%40ss%2Fword%3A1@localhost:6379/0");
    }
}
