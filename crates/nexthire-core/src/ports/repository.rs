use async_trait::async_trait;

use crate::domain::{Bid, BidDraft, BidStatus, Job, JobDraft, JobQuery};
use crate::error::RepoError;

/// Result of a single-document insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted_id: String,
}

/// Result of a single-document update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
    /// Set when an upsert created the document.
    pub upserted_id: Option<String>,
}

/// Result of a single-document delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

/// Job postings store.
///
/// Identifiers are validated by the store; a malformed one yields
/// [`RepoError::InvalidId`].
#[async_trait]
pub trait JobRepository: Send + Sync {
    /// Every job, ordered by identifier.
    async fn find_all(&self) -> Result<Vec<Job>, RepoError>;

    /// Filtered, sorted window of jobs.
    async fn find_page(&self, query: &JobQuery) -> Result<Vec<Job>, RepoError>;

    /// Number of jobs in a category, or all jobs.
    async fn count(&self, category: Option<&str>) -> Result<u64, RepoError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, RepoError>;

    /// Jobs posted by the given buyer.
    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Job>, RepoError>;

    async fn insert(&self, draft: JobDraft) -> Result<InsertOutcome, RepoError>;

    /// Overwrite every field of the job, creating it when absent.
    async fn upsert(&self, id: &str, draft: JobDraft) -> Result<UpdateOutcome, RepoError>;

    /// Remove a job; deleting a missing job is not an error.
    async fn delete(&self, id: &str) -> Result<DeleteOutcome, RepoError>;
}

/// Bids store.
#[async_trait]
pub trait BidRepository: Send + Sync {
    /// The bid a freelancer placed on a job, if any.
    async fn find_by_bidder_and_job(
        &self,
        email: &str,
        job_id: &str,
    ) -> Result<Option<Bid>, RepoError>;

    /// Bids placed by a freelancer.
    async fn find_by_bidder(&self, email: &str) -> Result<Vec<Bid>, RepoError>;

    /// Bids received on a buyer's jobs.
    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Bid>, RepoError>;

    /// Insert a bid. Fails with [`RepoError::Constraint`] when the bidder
    /// already has a bid on the same job.
    async fn insert(&self, draft: BidDraft) -> Result<InsertOutcome, RepoError>;

    /// Change only the status of one bid.
    async fn update_status(&self, id: &str, status: BidStatus)
    -> Result<UpdateOutcome, RepoError>;
}
