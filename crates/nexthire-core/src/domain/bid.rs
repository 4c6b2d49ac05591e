use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Buyer, deadline};

/// Lifecycle of a bid as managed by the job's buyer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BidStatus {
    #[default]
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "In Progress", alias = "in_progress")]
    InProgress,
    #[serde(alias = "Complete", alias = "Completed")]
    Completed,
    #[serde(alias = "Rejected")]
    Rejected,
}

impl BidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bid payload as submitted by a freelancer.
///
/// Only the bidder, the job and the buyer are required; everything else the
/// client sends is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BidDraft {
    /// Bidder email.
    pub email: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(
        default,
        deserialize_with = "deadline::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: BidStatus,
    /// Copy of the job's buyer at bidding time.
    pub buyer: Buyer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bid entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bid {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(
        default,
        deserialize_with = "deadline::deserialize_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub deadline: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub status: BidStatus,
    pub buyer: Buyer,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Bid {
    pub fn from_draft(id: String, mut draft: BidDraft) -> Self {
        draft.extra.remove("_id");
        Self {
            id,
            email: draft.email,
            job_id: draft.job_id,
            price: draft.price,
            comment: draft.comment,
            deadline: draft.deadline,
            job_title: draft.job_title,
            category: draft.category,
            status: draft.status,
            buyer: draft.buyer,
            extra: draft.extra,
        }
    }
}

/// Partial update applied by `PATCH /bid/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BidStatus,
}
