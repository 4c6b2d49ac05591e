//! Job posting handlers.

use actix_web::{HttpResponse, web};

use nexthire_core::domain::{JobDraft, JobQuery, SortOrder, normalize_category};
use nexthire_shared::dto::{
    CountResponse, DeleteAck, InsertAck, JobCountParams, JobListParams, UpdateAck,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;
use crate::telemetry::mask_email;

/// GET /jobs
pub async fn list_jobs(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let jobs = state.jobs.find_all().await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /all-jobs?size&page&filter&sort
pub async fn list_jobs_page(
    state: web::Data<AppState>,
    params: web::Query<JobListParams>,
) -> AppResult<HttpResponse> {
    let params = params.into_inner();
    let query = JobQuery::page(params.page, params.size)?
        .with_category(normalize_category(params.filter.as_deref()))
        .sorted(SortOrder::from_param(params.sort.as_deref()));

    let jobs = state.jobs.find_page(&query).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /jobs-count?filter
pub async fn count_jobs(
    state: web::Data<AppState>,
    params: web::Query<JobCountParams>,
) -> AppResult<HttpResponse> {
    let category = normalize_category(params.filter.as_deref());
    let count = state.jobs.count(category.as_deref()).await?;
    Ok(HttpResponse::Ok().json(CountResponse { count }))
}

/// GET /job/{id} - responds with `null` when the job does not exist.
pub async fn get_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let job = state.jobs.find_by_id(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// POST /job
pub async fn create_job(
    state: web::Data<AppState>,
    body: web::Json<JobDraft>,
) -> AppResult<HttpResponse> {
    let outcome = state.jobs.insert(body.into_inner()).await?;
    tracing::info!(job_id = %outcome.inserted_id, "Job created");
    Ok(HttpResponse::Ok().json(InsertAck::new(outcome.inserted_id)))
}

/// PUT /job/{id}
pub async fn upsert_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<JobDraft>,
) -> AppResult<HttpResponse> {
    let outcome = state
        .jobs
        .upsert(&path.into_inner(), body.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(UpdateAck::new(
        outcome.matched_count,
        outcome.modified_count,
        outcome.upserted_id,
    )))
}

/// DELETE /job/{id}
pub async fn delete_job(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let outcome = state.jobs.delete(&id).await?;
    tracing::info!(job_id = %id, deleted = outcome.deleted_count, "Job delete requested");
    Ok(HttpResponse::Ok().json(DeleteAck::new(outcome.deleted_count)))
}

/// GET /jobs/{email} - Protected route, scoped to the token's own email.
pub async fn list_buyer_jobs(
    identity: Identity,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let email = path.into_inner();
    if let Err(e) = identity.ensure_owner(&email) {
        tracing::warn!(
            token_email = %mask_email(&identity.email),
            path_email = %mask_email(&email),
            "Buyer job listing refused"
        );
        return Err(e);
    }

    let jobs = state.jobs.find_by_buyer(&email).await?;
    Ok(HttpResponse::Ok().json(jobs))
}
