//! Application configuration loaded from environment variables.

use std::env;

use nexthire_infra::{DatabaseConfig, JwtConfig};

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:5174";

/// Deployment environment, drives cookie attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub cors_origins: Vec<String>,
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = env::var("RUST_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Development);

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            environment,
            cors_origins: parse_origins(
                &env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
            ),
            database: Self::database_from_env(),
            jwt: JwtConfig::from_env(environment.is_production()),
        }
    }

    /// `MONGODB_URI` wins; otherwise `DB_USER`, `DB_PASS` and `DB_CLUSTER`
    /// build an Atlas connection string. `None` means in-memory storage.
    fn database_from_env() -> Option<DatabaseConfig> {
        let uri = env::var("MONGODB_URI").ok().or_else(|| {
            let user = env::var("DB_USER").ok()?;
            let password = env::var("DB_PASS").ok()?;
            let cluster = env::var("DB_CLUSTER").ok()?;
            Some(DatabaseConfig::atlas_uri(&user, &password, &cluster))
        })?;

        Some(DatabaseConfig {
            uri,
            database_name: env::var("DB_NAME").unwrap_or_else(|_| "nextHire".to_string()),
            max_pool_size: env::var("DB_MAX_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(100),
            min_pool_size: env::var("DB_MIN_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(10),
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}
