//! Application state - shared across all handlers.

use std::sync::Arc;

use nexthire_core::ports::{BidRepository, JobRepository, TokenService};
use nexthire_infra::{InMemoryBidRepository, InMemoryJobRepository, JwtTokenService};

#[cfg(feature = "mongodb")]
use nexthire_infra::{DatabaseConnection, MongoBidRepository, MongoJobRepository};

use crate::config::AppConfig;
use crate::middleware::auth::CookiePolicy;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub jobs: Arc<dyn JobRepository>,
    pub bids: Arc<dyn BidRepository>,
    pub tokens: Arc<dyn TokenService>,
    pub cookies: CookiePolicy,
    /// Backing store name reported by the health check.
    pub storage: &'static str,
}

/// Process-scoped resources released after the HTTP server stops.
#[derive(Default)]
pub struct Resources {
    #[cfg(feature = "mongodb")]
    connection: Option<DatabaseConnection>,
}

impl Resources {
    pub async fn shutdown(self) {
        #[cfg(feature = "mongodb")]
        if let Some(connection) = self.connection {
            connection.shutdown().await;
        }
    }
}

impl AppState {
    /// State backed by the in-memory repositories.
    pub fn in_memory(tokens: Arc<dyn TokenService>, cookies: CookiePolicy) -> Self {
        Self {
            jobs: Arc::new(InMemoryJobRepository::new()),
            bids: Arc::new(InMemoryBidRepository::new()),
            tokens,
            cookies,
            storage: "in-memory",
        }
    }

    #[cfg(feature = "mongodb")]
    pub fn mongodb(
        connection: &DatabaseConnection,
        tokens: Arc<dyn TokenService>,
        cookies: CookiePolicy,
    ) -> Self {
        let database = connection.database();
        Self {
            jobs: Arc::new(MongoJobRepository::new(database)),
            bids: Arc::new(MongoBidRepository::new(database)),
            tokens,
            cookies,
            storage: "mongodb",
        }
    }

    /// Build the application state with appropriate implementations.
    ///
    /// A configured database that cannot be reached is a startup error; no
    /// database configuration at all falls back to in-memory storage.
    pub async fn init(config: &AppConfig) -> anyhow::Result<(Self, Resources)> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        let cookies = CookiePolicy::for_environment(config.environment);

        #[cfg(feature = "mongodb")]
        let (state, resources) = match &config.database {
            Some(db_config) => {
                use anyhow::Context;

                let connection = DatabaseConnection::init(db_config)
                    .await
                    .context("failed to connect to MongoDB")?;
                let state = Self::mongodb(&connection, tokens, cookies);
                (
                    state,
                    Resources {
                        connection: Some(connection),
                    },
                )
            }
            None => {
                tracing::warn!(
                    "No database configured (MONGODB_URI or DB_USER/DB_PASS/DB_CLUSTER). Running in in-memory mode."
                );
                (Self::in_memory(tokens, cookies), Resources::default())
            }
        };

        #[cfg(not(feature = "mongodb"))]
        let (state, resources) = {
            if config.database.is_some() {
                tracing::warn!("Database configured but the mongodb feature is disabled");
            }
            tracing::info!("Running without mongodb feature - using in-memory repositories");
            (Self::in_memory(tokens, cookies), Resources::default())
        };

        tracing::info!(storage = state.storage, "Application state initialized");

        Ok((state, resources))
    }
}
