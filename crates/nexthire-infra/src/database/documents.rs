//! BSON shapes of the `jobs` and `bids` collections.
//!
//! Documents are read and written through the domain drafts, so fields
//! outside the core schema survive and stored deadlines parse as leniently
//! as request bodies do.

use bson::{Bson, Document, doc, oid::ObjectId};
use serde::Serialize;
use serde::de::DeserializeOwned;

use nexthire_core::domain::{Bid, BidDraft, Job, JobDraft, SortOrder};
use nexthire_core::error::RepoError;

fn encode<T: Serialize>(draft: &T) -> Result<Document, RepoError> {
    let mut document = bson::to_document(draft).map_err(|e| RepoError::Query(e.to_string()))?;
    document.remove("_id");
    Ok(document)
}

/// Document written by an insert.
pub(crate) fn new_document<T: Serialize>(id: ObjectId, draft: &T) -> Result<Document, RepoError> {
    let mut document = doc! { "_id": id };
    document.extend(encode(draft)?);
    Ok(document)
}

/// Body of a `$set` update. `_id` is immutable and never part of it.
pub(crate) fn set_fields<T: Serialize>(draft: &T) -> Result<Document, RepoError> {
    encode(draft)
}

fn decode<T: DeserializeOwned>(mut document: Document) -> Result<(String, T), RepoError> {
    let id = match document.remove("_id") {
        Some(Bson::ObjectId(oid)) => oid.to_hex(),
        Some(Bson::String(id)) => id,
        Some(other) => return Err(RepoError::Query(format!("unsupported _id: {other}"))),
        None => return Err(RepoError::Query("document without _id".to_string())),
    };
    let draft = bson::from_document(document).map_err(|e| RepoError::Query(e.to_string()))?;
    Ok((id, draft))
}

pub(crate) fn job_from_document(document: Document) -> Result<Job, RepoError> {
    let (id, draft) = decode::<JobDraft>(document)?;
    Ok(Job::from_draft(id, draft))
}

pub(crate) fn bid_from_document(document: Document) -> Result<Bid, RepoError> {
    let (id, draft) = decode::<BidDraft>(document)?;
    Ok(Bid::from_draft(id, draft))
}

pub(crate) fn category_filter(category: Option<&str>) -> Document {
    match category {
        Some(category) => doc! { "category": category },
        None => doc! {},
    }
}

/// Deadline sort when requested, always followed by `_id` so pages are stable.
pub(crate) fn page_sort(sort: Option<SortOrder>) -> Document {
    match sort {
        Some(order) => doc! { "deadline": order.direction(), "_id": 1 },
        None => doc! { "_id": 1 },
    }
}
