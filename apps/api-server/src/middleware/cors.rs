//! Origin restriction for browser clients.

use actix_cors::Cors;

/// CORS policy allowing credentialed requests from the configured origins only.
pub fn cors_policy(origins: &[String]) -> Cors {
    origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}
