use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use ts_rs::TS;

/// Review lifecycle of a staging record. Records enter as `Pending` and only
/// leave the active review view once `Processed` or deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StagingStatus {
    Pending,
    Approved,
    Rejected,
    Processed,
}

impl StagingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StagingStatus::Pending => "Pending",
            StagingStatus::Approved => "Approved",
            StagingStatus::Rejected => "Rejected",
            StagingStatus::Processed => "Processed",
        }
    }
}

impl fmt::Display for StagingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown staging status: {0}")]
pub struct ParseStagingStatusError(pub String);

impl std::str::FromStr for StagingStatus {
    type Err = ParseStagingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(StagingStatus::Pending),
            "Approved" => Ok(StagingStatus::Approved),
            "Rejected" => Ok(StagingStatus::Rejected),
            "Processed" => Ok(StagingStatus::Processed),
            other => Err(ParseStagingStatusError(other.to_string())),
        }
    }
}

/// An unverified person record awaiting review, as ingested upstream.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StagingRecord {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub other_email: Option<String>,
    pub umail: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub status: StagingStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Renderable projection of a [`StagingRecord`]. All derived fields
/// (`full_name`, `record_link`, formatted `birth_date`) are recomputed on every
/// refresh and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StagingRecordView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub other_email: Option<String>,
    pub umail: Option<String>,
    pub phone: Option<String>,
    /// `YYYY-MM-DD`, or empty when the record carries no birth date.
    pub birth_date: String,
    pub record_link: String,
    pub status: StagingStatus,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct CreateStagingRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub secondary_email: Option<String>,
    pub other_email: Option<String>,
    pub umail: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct StagingRecordsResponse {
    pub records: Vec<StagingRecordView>,
}

/// One row of the status summary card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusCount {
    pub label: String,
    pub count: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct StatusCountsResponse {
    pub counts: Vec<StatusCount>,
}
