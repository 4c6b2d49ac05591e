use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::cookie::{Cookie, time::Duration};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use nexthire_core::domain::{Bid, BidDraft, BidStatus};
use nexthire_core::error::RepoError;
use nexthire_core::ports::{BidRepository, InsertOutcome, UpdateOutcome};
use nexthire_infra::{InMemoryBidRepository, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::config::Environment;
use crate::middleware::auth::{CookiePolicy, TOKEN_COOKIE};
use crate::state::AppState;

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_routes),
        )
        .await
    };
}

const UNKNOWN_ID: &str = "65f0c0ffee0000000000abcd";

fn test_state() -> AppState {
    let tokens = Arc::new(JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        ..JwtConfig::default()
    }));
    AppState::in_memory(tokens, CookiePolicy::for_environment(Environment::Development))
}

/// Bid store that yields after the duplicate lookup, so concurrent requests
/// all pass the lookup before the first insert lands.
#[derive(Default)]
struct YieldingBids {
    inner: InMemoryBidRepository,
    insert_attempts: AtomicUsize,
}

#[async_trait]
impl BidRepository for YieldingBids {
    async fn find_by_bidder_and_job(
        &self,
        email: &str,
        job_id: &str,
    ) -> Result<Option<Bid>, RepoError> {
        let found = self.inner.find_by_bidder_and_job(email, job_id).await?;
        tokio::task::yield_now().await;
        Ok(found)
    }

    async fn find_by_bidder(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        self.inner.find_by_bidder(email).await
    }

    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        self.inner.find_by_buyer(email).await
    }

    async fn insert(&self, draft: BidDraft) -> Result<InsertOutcome, RepoError> {
        self.insert_attempts.fetch_add(1, Ordering::SeqCst);
        self.inner.insert(draft).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: BidStatus,
    ) -> Result<UpdateOutcome, RepoError> {
        self.inner.update_status(id, status).await
    }
}

fn job_body(title: &str, category: &str, deadline: &str, buyer: &str) -> Value {
    json!({
        "job_title": title,
        "description": format!("{title} for a small business"),
        "category": category,
        "deadline": deadline,
        "min_price": 100.0,
        "max_price": 400.0,
        "buyer": { "email": buyer, "name": "Buyer" }
    })
}

fn bid_body(email: &str, job_id: &str) -> Value {
    json!({
        "email": email,
        "jobId": job_id,
        "price": 250.0,
        "comment": "Can start tomorrow",
        "deadline": "2025-07-01",
        "job_title": "Landing page",
        "category": "Web Development",
        "status": "pending",
        "buyer": { "email": "buyer@example.com", "name": "Buyer" }
    })
}

#[actix_web::test]
async fn test_root_reports_running() {
    let app = init_app!(test_state());

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;

    assert_eq!(&body[..], b"NextHire Server Running");
}

#[actix_web::test]
async fn test_create_then_get_job() {
    let app = init_app!(test_state());
    let body = job_body("Landing page", "Web Development", "2025-06-01", "buyer@example.com");

    let req = test::TestRequest::post().uri("/job").set_json(&body).to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["acknowledged"], true);
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/job/{id}"))
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let mut expected = body;
    expected["_id"] = json!(id);
    assert_eq!(job, expected);
}

#[actix_web::test]
async fn test_job_extra_fields_round_trip() {
    let app = init_app!(test_state());
    let mut body = job_body("Landing page", "Web Development", "2025-06-01", "buyer@example.com");
    body["total_bids"] = json!(0);
    body["tags"] = json!(["react", "tailwind"]);

    let req = test::TestRequest::post().uri("/job").set_json(&body).to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/job/{id}"))
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;

    let mut expected = body;
    expected["_id"] = json!(id);
    assert_eq!(job, expected);
}

#[actix_web::test]
async fn test_get_job_with_malformed_id() {
    let app = init_app!(test_state());

    let req = test::TestRequest::get().uri("/job/not-an-id").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_create_job_with_missing_fields() {
    let app = init_app!(test_state());

    let req = test::TestRequest::post()
        .uri("/job")
        .set_json(json!({ "job_title": "No buyer" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_delete_missing_job_is_noop() {
    let app = init_app!(test_state());

    let req = test::TestRequest::delete()
        .uri(&format!("/job/{UNKNOWN_ID}"))
        .to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["deletedCount"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/job/{UNKNOWN_ID}"))
        .to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(&body[..], b"null");
}

#[actix_web::test]
async fn test_put_job_upserts() {
    let app = init_app!(test_state());

    let req = test::TestRequest::put()
        .uri(&format!("/job/{UNKNOWN_ID}"))
        .set_json(job_body("Created by PUT", "Web Development", "2025-06-01", "b@example.com"))
        .to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["upsertedId"], UNKNOWN_ID);
    assert_eq!(ack["matchedCount"], 0);

    let req = test::TestRequest::put()
        .uri(&format!("/job/{UNKNOWN_ID}"))
        .set_json(job_body("Renamed", "Web Development", "2025-06-01", "b@example.com"))
        .to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["upsertedId"], Value::Null);

    let req = test::TestRequest::get()
        .uri(&format!("/job/{UNKNOWN_ID}"))
        .to_request();
    let job: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(job["job_title"], "Renamed");
}

#[actix_web::test]
async fn test_pages_reconstruct_full_listing() {
    let app = init_app!(test_state());
    for i in 1..=7 {
        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(job_body(
                &format!("job {i}"),
                "Web Development",
                &format!("2025-06-{:02}", 10 - i),
                "buyer@example.com",
            ))
            .to_request();
        test::call_service(&app, req).await;
    }

    let mut paged = Vec::new();
    for page in 1..=3 {
        let req = test::TestRequest::get()
            .uri(&format!("/all-jobs?page={page}&size=3"))
            .to_request();
        let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(jobs.len() <= 3);
        paged.extend(jobs);
    }

    let req = test::TestRequest::get().uri("/jobs").to_request();
    let all: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(all.len(), 7);
    assert_eq!(paged, all);
}

#[actix_web::test]
async fn test_filter_matches_count() {
    let app = init_app!(test_state());
    for (title, category) in [
        ("a", "Web Development"),
        ("b", "Graphics Design"),
        ("c", "Web Development"),
        ("d", "Digital Marketing"),
    ] {
        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(job_body(title, category, "2025-06-01", "buyer@example.com"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let req = test::TestRequest::get()
        .uri("/all-jobs?page=1&size=10&filter=Web%20Development&sort=")
        .to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(jobs.iter().all(|job| job["category"] == "Web Development"));

    let req = test::TestRequest::get()
        .uri("/jobs-count?filter=Web%20Development")
        .to_request();
    let count: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count["count"], jobs.len() as u64);

    let req = test::TestRequest::get().uri("/jobs-count?filter=").to_request();
    let count: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(count["count"], 4);
}

#[actix_web::test]
async fn test_sort_by_deadline() {
    let app = init_app!(test_state());
    for deadline in ["2025-08-01", "2025-03-15", "2025-12-24", "2025-03-15"] {
        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(job_body("job", "Web Development", deadline, "buyer@example.com"))
            .to_request();
        test::call_service(&app, req).await;
    }

    let deadlines = |jobs: Vec<Value>| -> Vec<String> {
        jobs.iter()
            .map(|job| job["deadline"].as_str().unwrap().to_string())
            .collect()
    };

    let req = test::TestRequest::get().uri("/all-jobs?sort=asc").to_request();
    let asc = deadlines(test::call_and_read_body_json(&app, req).await);
    assert!(asc.windows(2).all(|w| w[0] <= w[1]));

    let req = test::TestRequest::get().uri("/all-jobs?sort=dsc").to_request();
    let desc = deadlines(test::call_and_read_body_json(&app, req).await);
    assert!(desc.windows(2).all(|w| w[0] >= w[1]));
}

#[actix_web::test]
async fn test_page_zero_rejected() {
    let app = init_app!(test_state());

    let req = test::TestRequest::get()
        .uri("/all-jobs?page=0&size=6")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_issue_token_sets_http_only_cookie() {
    let app = init_app!(test_state());

    let req = test::TestRequest::post()
        .uri("/jwt")
        .set_json(json!({ "email": "buyer@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == TOKEN_COOKIE)
        .unwrap();
    assert_eq!(cookie.http_only(), Some(true));
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.max_age(), Some(Duration::days(365)));

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "success": true }));
}

#[actix_web::test]
async fn test_logout_clears_cookie() {
    let app = init_app!(test_state());

    let req = test::TestRequest::get().uri("/logout").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let cookie = resp
        .response()
        .cookies()
        .find(|c| c.name() == TOKEN_COOKIE)
        .unwrap();
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[actix_web::test]
async fn test_buyer_jobs_require_token() {
    let app = init_app!(test_state());

    let req = test::TestRequest::get()
        .uri("/jobs/a@example.com")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/jobs/a@example.com")
        .cookie(Cookie::new(TOKEN_COOKIE, "forged.token.value"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_buyer_jobs_scoped_to_token_email() {
    let state = test_state();
    let app = init_app!(state.clone());
    for buyer in ["a@example.com", "b@example.com", "a@example.com"] {
        let req = test::TestRequest::post()
            .uri("/job")
            .set_json(job_body("job", "Web Development", "2025-06-01", buyer))
            .to_request();
        test::call_service(&app, req).await;
    }
    let token = state.tokens.generate_token("a@example.com").unwrap();

    let req = test::TestRequest::get()
        .uri("/jobs/b@example.com")
        .cookie(Cookie::new(TOKEN_COOKIE, token.clone()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/jobs/a@example.com")
        .cookie(Cookie::new(TOKEN_COOKIE, token))
        .to_request();
    let jobs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(jobs.len(), 2);
    assert!(jobs.iter().all(|job| job["buyer"]["email"] == "a@example.com"));
}

#[actix_web::test]
async fn test_duplicate_bid_conflicts() {
    let app = init_app!(test_state());
    let bid = bid_body("dev@example.com", UNKNOWN_ID);

    let req = test::TestRequest::post().uri("/bid").set_json(&bid).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post().uri("/bid").set_json(&bid).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/my-bids/dev@example.com")
        .to_request();
    let bids: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bids.len(), 1);
}

#[actix_web::test]
async fn test_minimal_bid_accepted() {
    let app = init_app!(test_state());
    let bid = json!({
        "email": "dev@example.com",
        "jobId": UNKNOWN_ID,
        "status": "pending",
        "buyer": { "email": "buyer@example.com" }
    });

    let req = test::TestRequest::post().uri("/bid").set_json(&bid).to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/my-bids/dev@example.com")
        .to_request();
    let bids: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let mut expected = bid;
    expected["_id"] = json!(id);
    assert_eq!(bids, vec![expected]);
}

#[actix_web::test]
async fn test_racing_bids_rejected_by_store() {
    let bids = Arc::new(YieldingBids::default());
    let state = AppState {
        bids: bids.clone(),
        ..test_state()
    };
    let app = init_app!(state);
    let bid = bid_body("dev@example.com", UNKNOWN_ID);

    let submissions = (0..5).map(|_| {
        let req = test::TestRequest::post().uri("/bid").set_json(&bid).to_request();
        test::call_service(&app, req)
    });
    let responses = futures::future::join_all(submissions).await;

    // Every request got past the lookup, so the store had to refuse four.
    assert_eq!(bids.insert_attempts.load(Ordering::SeqCst), 5);
    let statuses: Vec<StatusCode> = responses.iter().map(|resp| resp.status()).collect();
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::OK).count(),
        1
    );
    assert_eq!(
        statuses.iter().filter(|s| **s == StatusCode::CONFLICT).count(),
        4
    );
    assert_eq!(bids.inner.find_by_bidder("dev@example.com").await.unwrap().len(), 1);
}

#[actix_web::test]
async fn test_concurrent_duplicate_bids_store_one() {
    let app = init_app!(test_state());
    let bid = bid_body("dev@example.com", UNKNOWN_ID);

    let submissions = (0..5).map(|_| {
        let req = test::TestRequest::post().uri("/bid").set_json(&bid).to_request();
        test::call_service(&app, req)
    });
    let responses = futures::future::join_all(submissions).await;

    let created = responses
        .iter()
        .filter(|resp| resp.status() == StatusCode::OK)
        .count();
    let conflicts = responses
        .iter()
        .filter(|resp| resp.status() == StatusCode::CONFLICT)
        .count();
    assert_eq!((created, conflicts), (1, 4));

    let req = test::TestRequest::get()
        .uri("/my-bids/dev@example.com")
        .to_request();
    let bids: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(bids.len(), 1);
}

#[actix_web::test]
async fn test_update_bid_status_touches_only_target() {
    let app = init_app!(test_state());

    let mut ids = Vec::new();
    for bidder in ["one@example.com", "two@example.com"] {
        let req = test::TestRequest::post()
            .uri("/bid")
            .set_json(bid_body(bidder, UNKNOWN_ID))
            .to_request();
        let ack: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(ack["insertedId"].as_str().unwrap().to_string());
    }

    let req = test::TestRequest::get()
        .uri("/bid-requests/buyer@example.com")
        .to_request();
    let before: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/bid/{}", ids[0]))
        .set_json(json!({ "status": "in-progress" }))
        .to_request();
    let ack: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);

    let req = test::TestRequest::get()
        .uri("/bid-requests/buyer@example.com")
        .to_request();
    let after: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    assert_eq!(before.len(), after.len());
    for (old, new) in before.iter().zip(&after) {
        let mut expected = old.clone();
        if old["_id"] == ids[0].as_str() {
            expected["status"] = json!("in-progress");
        }
        assert_eq!(new, &expected);
    }
}

#[actix_web::test]
async fn test_update_bid_status_rejects_unknown_status() {
    let app = init_app!(test_state());

    let req = test::TestRequest::patch()
        .uri(&format!("/bid/{UNKNOWN_ID}"))
        .set_json(json!({ "status": "archived" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_update_bid_status_with_malformed_id() {
    let app = init_app!(test_state());

    let req = test::TestRequest::patch()
        .uri("/bid/xyz")
        .set_json(json!({ "status": "rejected" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
