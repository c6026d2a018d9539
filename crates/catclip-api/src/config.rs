//! API configuration.

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Serve Prometheus metrics at /metrics
    pub metrics_enabled: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors_origins: vec!["*".to_string()],
            metrics_enabled: true,
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8000),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|_| vec!["*".to_string()]),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_from_env() {
        std::env::set_var("API_PORT", "9100");
        std::env::set_var("METRICS_ENABLED", "false");
        std::env::set_var("CORS_ORIGINS", "http://localhost:3000, https://cats.example");

        let config = ApiConfig::from_env();

        std::env::remove_var("API_PORT");
        std::env::remove_var("METRICS_ENABLED");
        std::env::remove_var("CORS_ORIGINS");

        assert_eq!(config.bind_addr(), "0.0.0.0:9100");
        assert!(!config.metrics_enabled);
        assert_eq!(config.cors_origins, vec!["http://localhost:3000", "https://cats.example"]);
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        std::env::remove_var("API_PORT");
        std::env::remove_var("METRICS_ENABLED");

        let config = ApiConfig::from_env();
        assert_eq!(config.port, 8000);
        assert!(config.metrics_enabled);
    }
}
