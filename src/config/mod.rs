use std::env;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the hosted data platform (identity + store live under it).
    pub platform_url: String,
    /// Publishable API key sent with every platform request.
    pub platform_anon_key: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            platform_url: env::var("PLATFORM_URL")?,
            platform_anon_key: env::var("PLATFORM_ANON_KEY")?,
            host: env::var("BACKEND_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("BACKEND_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
        })
    }

    /// Base URL of the store's REST read API.
    pub fn store_url(&self) -> String {
        format!("{}/rest/v1", self.platform_url.trim_end_matches('/'))
    }

    /// Base URL of the identity provider.
    pub fn identity_url(&self) -> String {
        format!("{}/auth/v1", self.platform_url.trim_end_matches('/'))
    }
}
