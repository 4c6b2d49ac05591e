use std::time::Duration;

use bson::{Document, doc};
use mongodb::options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Database, IndexModel};

use super::DatabaseConfig;
use super::mongo_repo::BIDS_COLLECTION;

/// Process-wide MongoDB client and the application database.
///
/// The client pools connections internally; clone [`Database`] handles out of
/// it freely and call [`DatabaseConnection::shutdown`] once the server stops.
pub struct DatabaseConnection {
    client: Client,
    database: Database,
}

impl DatabaseConnection {
    /// Connect, ping the deployment and make sure the indexes exist.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, mongodb::error::Error> {
        tracing::info!("Connecting to MongoDB...");

        let mut options = ClientOptions::parse(&config.uri).await?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.max_pool_size = Some(config.max_pool_size);
        options.min_pool_size = Some(config.min_pool_size);
        options.connect_timeout = Some(Duration::from_secs(10));
        options.app_name = Some("nexthire-api".to_string());

        let client = Client::with_options(options)?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        tracing::info!(
            database = %config.database_name,
            pool = config.max_pool_size,
            "MongoDB connected"
        );

        let database = client.database(&config.database_name);
        ensure_indexes(&database).await?;

        Ok(Self { client, database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Close pooled connections and wait for in-flight operations.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        tracing::info!("MongoDB connection closed");
    }
}

/// One bid per bidder and job, enforced by the store.
async fn ensure_indexes(database: &Database) -> Result<(), mongodb::error::Error> {
    let index = IndexModel::builder()
        .keys(doc! { "email": 1, "jobId": 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .name("bidder_job_unique".to_string())
                .build(),
        )
        .build();

    database
        .collection::<Document>(BIDS_COLLECTION)
        .create_index(index)
        .await?;

    tracing::debug!("Bid uniqueness index ensured");
    Ok(())
}
