//! # NextHire Core
//!
//! The domain layer of the NextHire marketplace backend.
//! Jobs, bids and the ports the infrastructure layer implements for them.
//! This crate has no infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
