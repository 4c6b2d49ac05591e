//! In-memory repositories - used when no database is configured and in tests.
//!
//! Identifiers are real ObjectIds so that id handling matches MongoDB,
//! and maps are keyed by the hex id, which keeps the default `_id` ordering.
//! Data is lost on process restart.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tokio::sync::RwLock;

use nexthire_core::domain::{Bid, BidDraft, BidStatus, Job, JobDraft, JobQuery, SortOrder};
use nexthire_core::error::RepoError;
use nexthire_core::ports::{
    BidRepository, DeleteOutcome, InsertOutcome, JobRepository, UpdateOutcome,
};

use super::object_id::parse_object_id;

/// In-memory job store.
#[derive(Default)]
pub struct InMemoryJobRepository {
    store: RwLock<BTreeMap<String, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn in_category(job: &Job, category: Option<&str>) -> bool {
    category.is_none_or(|c| job.category == c)
}

fn to_usize(value: u64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn find_all(&self) -> Result<Vec<Job>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().cloned().collect())
    }

    async fn find_page(&self, query: &JobQuery) -> Result<Vec<Job>, RepoError> {
        let store = self.store.read().await;
        let mut jobs: Vec<Job> = store
            .values()
            .filter(|job| in_category(job, query.category.as_deref()))
            .cloned()
            .collect();
        drop(store);

        // Stable sort keeps `_id` order between equal deadlines.
        if let Some(order) = query.sort {
            jobs.sort_by(|a, b| {
                let ordering: Ordering = a.deadline.cmp(&b.deadline);
                match order {
                    SortOrder::Ascending => ordering,
                    SortOrder::Descending => ordering.reverse(),
                }
            });
        }

        let limit = query.limit.map_or(usize::MAX, to_usize);
        Ok(jobs
            .into_iter()
            .skip(to_usize(query.skip))
            .take(limit)
            .collect())
    }

    async fn count(&self, category: Option<&str>) -> Result<u64, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().filter(|job| in_category(job, category)).count() as u64)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, RepoError> {
        let oid = parse_object_id(id)?;
        let store = self.store.read().await;
        Ok(store.get(&oid.to_hex()).cloned())
    }

    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Job>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|job| job.buyer.email == email)
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: JobDraft) -> Result<InsertOutcome, RepoError> {
        let id = ObjectId::new().to_hex();
        let mut store = self.store.write().await;
        store.insert(id.clone(), Job::from_draft(id.clone(), draft));
        Ok(InsertOutcome { inserted_id: id })
    }

    async fn upsert(&self, id: &str, draft: JobDraft) -> Result<UpdateOutcome, RepoError> {
        let id = parse_object_id(id)?.to_hex();
        let mut replacement = Job::from_draft(id.clone(), draft);

        let mut store = self.store.write().await;
        match store.get_mut(&id) {
            Some(existing) => {
                // `$set` semantics: stored fields the update does not name survive.
                let mut extra = existing.extra.clone();
                extra.append(&mut replacement.extra);
                replacement.extra = extra;

                let modified = u64::from(*existing != replacement);
                *existing = replacement;
                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: modified,
                    upserted_id: None,
                })
            }
            None => {
                store.insert(id.clone(), replacement);
                Ok(UpdateOutcome {
                    matched_count: 0,
                    modified_count: 0,
                    upserted_id: Some(id),
                })
            }
        }
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, RepoError> {
        let id = parse_object_id(id)?.to_hex();
        let mut store = self.store.write().await;
        let deleted = store.remove(&id).is_some();
        Ok(DeleteOutcome {
            deleted_count: u64::from(deleted),
        })
    }
}

/// In-memory bid store.
#[derive(Default)]
pub struct InMemoryBidRepository {
    store: RwLock<BTreeMap<String, Bid>>,
}

impl InMemoryBidRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BidRepository for InMemoryBidRepository {
    async fn find_by_bidder_and_job(
        &self,
        email: &str,
        job_id: &str,
    ) -> Result<Option<Bid>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|bid| bid.email == email && bid.job_id == job_id)
            .cloned())
    }

    async fn find_by_bidder(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|bid| bid.email == email)
            .cloned()
            .collect())
    }

    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .filter(|bid| bid.buyer.email == email)
            .cloned()
            .collect())
    }

    async fn insert(&self, draft: BidDraft) -> Result<InsertOutcome, RepoError> {
        // Check and insert under one write lock, mirroring the unique index.
        let mut store = self.store.write().await;
        if store
            .values()
            .any(|bid| bid.email == draft.email && bid.job_id == draft.job_id)
        {
            return Err(RepoError::Constraint(format!(
                "bid on job {} already exists for this bidder",
                draft.job_id
            )));
        }

        let id = ObjectId::new().to_hex();
        store.insert(id.clone(), Bid::from_draft(id.clone(), draft));
        Ok(InsertOutcome { inserted_id: id })
    }

    async fn update_status(
        &self,
        id: &str,
        status: BidStatus,
    ) -> Result<UpdateOutcome, RepoError> {
        let id = parse_object_id(id)?.to_hex();
        let mut store = self.store.write().await;

        let outcome = match store.get_mut(&id) {
            Some(bid) => {
                let modified = u64::from(bid.status != status);
                bid.status = status;
                UpdateOutcome {
                    matched_count: 1,
                    modified_count: modified,
                    upserted_id: None,
                }
            }
            None => UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
                upserted_id: None,
            },
        };

        Ok(outcome)
    }
}
