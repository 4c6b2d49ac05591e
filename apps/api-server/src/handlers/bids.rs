//! Bid handlers.

use actix_web::{HttpResponse, web};

use nexthire_core::domain::{BidDraft, StatusUpdate};
use nexthire_core::error::RepoError;
use nexthire_shared::dto::{InsertAck, UpdateAck};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;
use crate::telemetry::mask_email;

fn duplicate_bid() -> AppError {
    AppError::Conflict("You have already placed a bid on this job".to_string())
}

/// POST /bid
pub async fn place_bid(
    state: web::Data<AppState>,
    body: web::Json<BidDraft>,
) -> AppResult<HttpResponse> {
    let draft = body.into_inner();

    if state
        .bids
        .find_by_bidder_and_job(&draft.email, &draft.job_id)
        .await?
        .is_some()
    {
        return Err(duplicate_bid());
    }

    let bidder = mask_email(&draft.email);
    let job_id = draft.job_id.clone();

    // The store rejects a concurrent duplicate that slipped past the lookup.
    match state.bids.insert(draft).await {
        Ok(outcome) => {
            tracing::info!(bid_id = %outcome.inserted_id, job_id = %job_id, bidder = %bidder, "Bid placed");
            Ok(HttpResponse::Ok().json(InsertAck::new(outcome.inserted_id)))
        }
        Err(RepoError::Constraint(_)) => Err(duplicate_bid()),
        Err(e) => Err(e.into()),
    }
}

/// GET /my-bids/{email}
pub async fn list_my_bids(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let bids = state.bids.find_by_bidder(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// GET /bid-requests/{email}
pub async fn list_bid_requests(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let bids = state.bids.find_by_buyer(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(bids))
}

/// PATCH /bid/{id}
pub async fn update_bid_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<StatusUpdate>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let update = body.into_inner();
    let outcome = state.bids.update_status(&id, update.status).await?;

    tracing::info!(bid_id = %id, status = %update.status, matched = outcome.matched_count, "Bid status updated");

    Ok(HttpResponse::Ok().json(UpdateAck::new(
        outcome.matched_count,
        outcome.modified_count,
        outcome.upserted_id,
    )))
}
