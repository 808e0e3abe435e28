use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::contact::ContactView;
use crate::notification::Notification;
use crate::staging::{StagingRecordView, StatusCount};

/// One entry of the status filter dropdown. The synthetic "All" option uses an
/// empty-string value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatusOption {
    pub label: String,
    pub value: String,
}

impl StatusOption {
    pub const ALL_VALUE: &'static str = "";

    pub fn all() -> Self {
        Self {
            label: "All".to_string(),
            value: Self::ALL_VALUE.to_string(),
        }
    }
}

/// Snapshot of the review engine handed to the presentation layer.
#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ReviewStateResponse {
    /// Staging records after the active status filter.
    pub staging_records: Vec<StagingRecordView>,
    pub contact_records: Vec<ContactView>,
    pub available_statuses: Vec<StatusOption>,
    /// Empty string when no filter is active.
    pub status_filter: String,
    pub selection: Vec<String>,
    pub status_counts: Vec<StatusCount>,
    /// Outcomes of the action that produced this snapshot, if any.
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct SelectionRequest {
    pub ids: Vec<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct FilterRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct DeleteRequest {
    /// The caller must have confirmed the delete with the user.
    pub confirmed: bool,
}
