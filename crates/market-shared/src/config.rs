//! Deployment configuration loaded from environment variables.
//!
//! All settings have defaults so the client can start with zero
//! configuration for local development.

/// Client deployment configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Deployment identifier that namespaces every document path
    /// (`artifacts/{app_id}/...`), so multiple deployments can share one
    /// store instance.
    /// Env: `MARKET_APP_ID`
    /// Default: `default-app-id`
    pub app_id: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_id: "default-app-id".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(id) = std::env::var("MARKET_APP_ID") {
            if !id.trim().is_empty() {
                config.app_id = id.trim().to_string();
            } else {
                tracing::warn!("Empty MARKET_APP_ID, using default");
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_app_id() {
        assert_eq!(AppConfig::default().app_id, "default-app-id");
    }

    // Env vars are process-global, so every MARKET_APP_ID case lives in one
    // test to keep the parallel runner away from them.
    #[test]
    fn env_app_id_overrides_default_and_blank_falls_back() {
        std::env::set_var("MARKET_APP_ID", " campus-prod ");
        assert_eq!(AppConfig::from_env().app_id, "campus-prod");

        std::env::set_var("MARKET_APP_ID", "   ");
        assert_eq!(AppConfig::from_env().app_id, "default-app-id");

        std::env::remove_var("MARKET_APP_ID");
        assert_eq!(AppConfig::from_env().app_id, "default-app-id");
    }
}
