use serde::{Deserialize, Serialize};

pub mod contact;
pub mod match_group;
pub mod notification;
pub mod review;
pub mod staging;

pub use contact::{Contact, ContactView, ContactsResponse};
pub use match_group::{MatchGroup, MatchGroupView, MatchGroupsResponse, MatchKind};
pub use notification::{Notification, Severity};
pub use review::{
    DeleteRequest, FilterRequest, ReviewStateResponse, SelectionRequest, StatusOption,
};
pub use staging::{
    CreateStagingRequest, ParseStagingStatusError, StagingRecord, StagingRecordView,
    StagingRecordsResponse, StagingStatus, StatusCount, StatusCountsResponse,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
