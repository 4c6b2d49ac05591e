//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Request to issue a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// Query string of `GET /all-jobs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobListParams {
    pub size: Option<u64>,
    pub page: Option<u64>,
    pub filter: Option<String>,
    pub sort: Option<String>,
}

/// Query string of `GET /jobs-count`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobCountParams {
    pub filter: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Acknowledgement of an insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertAck {
    pub fn new(inserted_id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: inserted_id.into(),
        }
    }
}

/// Acknowledgement of an update or upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<String>,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64, upserted_id: Option<String>) -> Self {
        Self {
            acknowledged: true,
            matched_count,
            modified_count,
            upserted_id,
        }
    }
}

/// Acknowledgement of a delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}
