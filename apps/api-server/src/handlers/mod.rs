//! HTTP handlers and route configuration.

mod auth;
mod bids;
mod health;
mod jobs;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error;

/// Configure all application routes.
///
/// Only `GET /jobs/{email}` requires a session; the remaining endpoints are public.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error))
        .app_data(web::QueryConfig::default().error_handler(error::query_error))
        .app_data(web::PathConfig::default().error_handler(error::path_error))
        // Liveness
        .route("/", web::get().to(health::index))
        .route("/health", web::get().to(health::health_check))
        // Session
        .route("/jwt", web::post().to(auth::issue_token))
        .route("/logout", web::get().to(auth::logout))
        // Jobs
        .route("/jobs", web::get().to(jobs::list_jobs))
        .route("/jobs/{email}", web::get().to(jobs::list_buyer_jobs))
        .route("/all-jobs", web::get().to(jobs::list_jobs_page))
        .route("/jobs-count", web::get().to(jobs::count_jobs))
        .route("/job", web::post().to(jobs::create_job))
        .service(
            web::resource("/job/{id}")
                .route(web::get().to(jobs::get_job))
                .route(web::put().to(jobs::upsert_job))
                .route(web::delete().to(jobs::delete_job)),
        )
        // Bids
        .route("/bid", web::post().to(bids::place_bid))
        .route("/bid/{id}", web::patch().to(bids::update_bid_status))
        .route("/my-bids/{email}", web::get().to(bids::list_my_bids))
        .route("/bid-requests/{email}", web::get().to(bids::list_bid_requests));
}
