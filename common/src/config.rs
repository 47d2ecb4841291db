//! Application configuration.
//!
//! All settings come from environment variables so that the same binary runs
//! unchanged in containers and on App Service style hosts. Values are read
//! once at startup and treated as read-only afterwards.

/// Application configuration shared by all components.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Name of the service loading this configuration.
    pub service: String,

    /// Bind host for the HTTP listener.
    pub host: String,

    /// Bind port for the HTTP listener.
    pub port: u16,

    /// Connection string for the `northwind` database
    /// (`CONNECTION_STRINGS_NORTHWIND`). Server and database only; the
    /// credential is attached per request as an access token.
    pub northwind_url: String,

    /// Configured token-resource value (`CONNECTION_STRING_FOR_TOKEN`).
    /// Passed through to the token provider on every request.
    pub token_resource: String,
}

impl AppConfig {
    /// Loads configuration from the environment for the given service name.
    pub fn load_with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
            host: env_or("SERVER_HOST", "0.0.0.0"),
            port: std::env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            northwind_url: env_or("CONNECTION_STRINGS_NORTHWIND", ""),
            token_resource: env_or("CONNECTION_STRING_FOR_TOKEN", ""),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_env_is_unset() {
        let config = AppConfig::load_with_service("product-service");
        assert_eq!(config.service, "product-service");
        assert_eq!(config.host, "0.0.0.0");
    }
}
