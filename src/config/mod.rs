use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub routes: RouteConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub enable_request_logging: bool,
}

/// Navigation destinations used by the route guard when it denies access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    pub login_path: String,
    pub unauthorized_path: String,
    pub admin_prefix: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("PQS_API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("PQS_API_TIMEOUT_SECS") {
            self.api.timeout_secs = v.parse().unwrap_or(self.api.timeout_secs);
        }
        if let Ok(v) = env::var("PQS_API_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Route overrides
        if let Ok(v) = env::var("PQS_LOGIN_PATH") {
            self.routes.login_path = v;
        }
        if let Ok(v) = env::var("PQS_UNAUTHORIZED_PATH") {
            self.routes.unauthorized_path = v;
        }
        if let Ok(v) = env::var("PQS_ADMIN_PREFIX") {
            self.routes.admin_prefix = v;
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8080/api".to_string(),
                timeout_secs: 30,
                enable_request_logging: true,
            },
            routes: RouteConfig::defaults(),
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                base_url: "https://staging.pqs.example.com/api".to_string(),
                timeout_secs: 15,
                enable_request_logging: true,
            },
            routes: RouteConfig::defaults(),
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://pqs.example.com/api".to_string(),
                timeout_secs: 15,
                enable_request_logging: false,
            },
            routes: RouteConfig::defaults(),
        }
    }
}

impl RouteConfig {
    fn defaults() -> Self {
        Self {
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            admin_prefix: "/admin".to_string(),
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    // Load .env if present so embedders pick up PQS_API_BASE_URL etc.
    let _ = dotenvy::dotenv();
    AppConfig::from_env()
});

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
