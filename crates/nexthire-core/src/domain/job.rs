use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Buyer, deadline};
use crate::error::DomainError;

/// Job payload as submitted by a buyer - everything but the identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobDraft {
    pub job_title: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "deadline::deserialize")]
    pub deadline: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub buyer: Buyer,
    /// Fields outside the core schema, stored as sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Job entity - a posting that freelancers bid on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub job_title: String,
    pub description: String,
    pub category: String,
    #[serde(deserialize_with = "deadline::deserialize")]
    pub deadline: NaiveDate,
    pub min_price: f64,
    pub max_price: f64,
    pub buyer: Buyer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Attach a store-generated identifier to a draft.
    ///
    /// A client-supplied `_id` never overrides the store's identifier.
    pub fn from_draft(id: String, mut draft: JobDraft) -> Self {
        draft.extra.remove("_id");
        Self {
            id,
            job_title: draft.job_title,
            description: draft.description,
            category: draft.category,
            deadline: draft.deadline,
            min_price: draft.min_price,
            max_price: draft.max_price,
            buyer: draft.buyer,
            extra: draft.extra,
        }
    }
}

/// Direction of the deadline sort on paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// `asc` sorts ascending, any other non-empty value descending.
    pub fn from_param(raw: Option<&str>) -> Option<Self> {
        match raw.map(str::trim) {
            None | Some("") => None,
            Some(value) if value.eq_ignore_ascii_case("asc") => Some(Self::Ascending),
            Some(_) => Some(Self::Descending),
        }
    }

    pub fn direction(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

/// An empty category filter means "all categories".
pub fn normalize_category(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

/// Filter, sort and window for the paginated job listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobQuery {
    pub category: Option<String>,
    pub sort: Option<SortOrder>,
    pub skip: u64,
    pub limit: Option<u64>,
}

impl JobQuery {
    /// Build the window from a 1-based page number and a page size.
    ///
    /// A missing page means the first page; a missing size means no limit.
    pub fn page(page: Option<u64>, size: Option<u64>) -> Result<Self, DomainError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(DomainError::Validation("page numbers start at 1".to_string()));
        }
        if size == Some(0) {
            return Err(DomainError::Validation(
                "page size must be at least 1".to_string(),
            ));
        }

        let skip = match size {
            Some(size) => (page - 1)
                .checked_mul(size)
                .ok_or_else(|| DomainError::Validation("page is out of range".to_string()))?,
            None => 0,
        };

        Ok(Self {
            category: None,
            sort: None,
            skip,
            limit: size,
        })
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }

    pub fn sorted(mut self, sort: Option<SortOrder>) -> Self {
        self.sort = sort;
        self
    }
}
