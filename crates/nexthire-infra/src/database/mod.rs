//! Job and bid storage - MongoDB and in-memory fallback.

mod config;
mod memory;
mod object_id;

#[cfg(feature = "mongodb")]
mod connection;
#[cfg(feature = "mongodb")]
mod documents;
#[cfg(feature = "mongodb")]
mod mongo_repo;

pub use config::DatabaseConfig;
pub use memory::{InMemoryBidRepository, InMemoryJobRepository};

#[cfg(feature = "mongodb")]
pub use connection::DatabaseConnection;
#[cfg(feature = "mongodb")]
pub use mongo_repo::{BIDS_COLLECTION, JOBS_COLLECTION, MongoBidRepository, MongoJobRepository};
