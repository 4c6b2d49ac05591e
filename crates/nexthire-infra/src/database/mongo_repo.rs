//! MongoDB repository implementations.

use async_trait::async_trait;
use bson::{Bson, Document, doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::results::UpdateResult;
use mongodb::{Collection, Cursor, Database};

use nexthire_core::domain::{Bid, BidDraft, BidStatus, Job, JobDraft, JobQuery};
use nexthire_core::error::RepoError;
use nexthire_core::ports::{
    BidRepository, DeleteOutcome, InsertOutcome, JobRepository, UpdateOutcome,
};

use super::documents::{
    bid_from_document, category_filter, job_from_document, new_document, page_sort, set_fields,
};
use super::object_id::parse_object_id;

pub const JOBS_COLLECTION: &str = "jobs";
pub const BIDS_COLLECTION: &str = "bids";

const DUPLICATE_KEY: i32 = 11000;

fn db_error(err: MongoError) -> RepoError {
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. } | ErrorKind::Io(_) => {
            RepoError::Connection(err.to_string())
        }
        _ => RepoError::Query(err.to_string()),
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// Drain a cursor, skipping stored documents that no longer decode so one bad
/// record cannot take a whole listing down.
async fn collect<T>(
    cursor: Cursor<Document>,
    decode: fn(Document) -> Result<T, RepoError>,
) -> Result<Vec<T>, RepoError> {
    let documents: Vec<Document> = cursor.try_collect().await.map_err(db_error)?;
    Ok(documents
        .into_iter()
        .filter_map(|document| {
            let id = document.get("_id").map(ToString::to_string);
            decode(document)
                .inspect_err(|e| tracing::warn!(id = ?id, error = %e, "Skipping undecodable document"))
                .ok()
        })
        .collect())
}

fn update_outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_id: result
            .upserted_id
            .as_ref()
            .and_then(Bson::as_object_id)
            .map(|id| id.to_hex()),
    }
}

/// MongoDB job repository over the `jobs` collection.
pub struct MongoJobRepository {
    jobs: Collection<Document>,
}

impl MongoJobRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            jobs: database.collection(JOBS_COLLECTION),
        }
    }
}

#[async_trait]
impl JobRepository for MongoJobRepository {
    async fn find_all(&self) -> Result<Vec<Job>, RepoError> {
        let cursor = self
            .jobs
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        collect(cursor, job_from_document).await
    }

    async fn find_page(&self, query: &JobQuery) -> Result<Vec<Job>, RepoError> {
        tracing::debug!(
            category = ?query.category,
            sort = ?query.sort,
            skip = query.skip,
            limit = ?query.limit,
            "Listing jobs page"
        );

        let mut find = self
            .jobs
            .find(category_filter(query.category.as_deref()))
            .sort(page_sort(query.sort))
            .skip(query.skip);
        if let Some(limit) = query.limit {
            find = find.limit(i64::try_from(limit).unwrap_or(i64::MAX));
        }

        let cursor = find.await.map_err(db_error)?;
        collect(cursor, job_from_document).await
    }

    async fn count(&self, category: Option<&str>) -> Result<u64, RepoError> {
        self.jobs
            .count_documents(category_filter(category))
            .await
            .map_err(db_error)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Job>, RepoError> {
        let oid = parse_object_id(id)?;
        let result = self
            .jobs
            .find_one(doc! { "_id": oid })
            .await
            .map_err(db_error)?;

        result.map(job_from_document).transpose()
    }

    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Job>, RepoError> {
        let cursor = self
            .jobs
            .find(doc! { "buyer.email": email })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        collect(cursor, job_from_document).await
    }

    async fn insert(&self, draft: JobDraft) -> Result<InsertOutcome, RepoError> {
        let id = ObjectId::new();
        self.jobs
            .insert_one(new_document(id, &draft)?)
            .await
            .map_err(db_error)?;

        tracing::debug!(job_id = %id, "Job inserted");
        Ok(InsertOutcome {
            inserted_id: id.to_hex(),
        })
    }

    async fn upsert(&self, id: &str, draft: JobDraft) -> Result<UpdateOutcome, RepoError> {
        let oid = parse_object_id(id)?;
        let fields = set_fields(&draft)?;

        let result = self
            .jobs
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .upsert(true)
            .await
            .map_err(db_error)?;

        Ok(update_outcome(result))
    }

    async fn delete(&self, id: &str) -> Result<DeleteOutcome, RepoError> {
        let oid = parse_object_id(id)?;
        let result = self
            .jobs
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(db_error)?;

        Ok(DeleteOutcome {
            deleted_count: result.deleted_count,
        })
    }
}

/// MongoDB bid repository over the `bids` collection.
///
/// Relies on the unique `(email, jobId)` index created by
/// [`super::DatabaseConnection::init`].
pub struct MongoBidRepository {
    bids: Collection<Document>,
}

impl MongoBidRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            bids: database.collection(BIDS_COLLECTION),
        }
    }
}

#[async_trait]
impl BidRepository for MongoBidRepository {
    async fn find_by_bidder_and_job(
        &self,
        email: &str,
        job_id: &str,
    ) -> Result<Option<Bid>, RepoError> {
        let result = self
            .bids
            .find_one(doc! { "email": email, "jobId": job_id })
            .await
            .map_err(db_error)?;

        result.map(bid_from_document).transpose()
    }

    async fn find_by_bidder(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        let cursor = self
            .bids
            .find(doc! { "email": email })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        collect(cursor, bid_from_document).await
    }

    async fn find_by_buyer(&self, email: &str) -> Result<Vec<Bid>, RepoError> {
        let cursor = self
            .bids
            .find(doc! { "buyer.email": email })
            .sort(doc! { "_id": 1 })
            .await
            .map_err(db_error)?;
        collect(cursor, bid_from_document).await
    }

    async fn insert(&self, draft: BidDraft) -> Result<InsertOutcome, RepoError> {
        let id = ObjectId::new();
        let job_id = draft.job_id.clone();

        self.bids
            .insert_one(new_document(id, &draft)?)
            .await
            .map_err(|e| {
                if is_duplicate_key(&e) {
                    RepoError::Constraint(format!(
                        "bid on job {job_id} already exists for this bidder"
                    ))
                } else {
                    db_error(e)
                }
            })?;

        tracing::debug!(bid_id = %id, job_id = %job_id, "Bid inserted");
        Ok(InsertOutcome {
            inserted_id: id.to_hex(),
        })
    }

    async fn update_status(
        &self,
        id: &str,
        status: BidStatus,
    ) -> Result<UpdateOutcome, RepoError> {
        let oid = parse_object_id(id)?;
        let result = self
            .bids
            .update_one(
                doc! { "_id": oid },
                doc! { "$set": { "status": status.as_str() } },
            )
            .await
            .map_err(db_error)?;

        Ok(update_outcome(result))
    }
}
