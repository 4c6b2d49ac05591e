//! # NextHire Infrastructure
//!
//! Concrete implementations of the ports defined in `nexthire-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory repositories only
//! - `mongodb` - MongoDB repositories and connection management

pub mod auth;
pub mod database;

pub use auth::{JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryBidRepository, InMemoryJobRepository};

#[cfg(feature = "mongodb")]
pub use database::{DatabaseConnection, MongoBidRepository, MongoJobRepository};
