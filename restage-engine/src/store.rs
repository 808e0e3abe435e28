use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use shared_types::{MatchGroup, StagingRecord, StagingStatus};

/// External record-matching/store collaborator. The engine only ever talks to
/// the authoritative store through this trait; the match heuristics behind
/// `fetch_match_groups` are an upstream concern.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Current classification result: one group per staging record under
    /// review, with zero or more candidate contacts each.
    async fn fetch_match_groups(&self) -> Result<Vec<MatchGroup>>;

    /// All staging records regardless of group membership.
    async fn fetch_staging_records(&self) -> Result<Vec<StagingRecord>>;

    /// Record count per status label.
    async fn fetch_status_counts(&self) -> Result<HashMap<String, i64>>;

    /// Promote the given staging records: create authoritative contacts from
    /// them and mark the staging records `Processed`.
    async fn create_contacts(&self, records: &[StagingRecord]) -> Result<()>;

    async fn delete_staging_records(&self, ids: &[String]) -> Result<()>;

    async fn update_staging_status(&self, ids: &[String], status: StagingStatus) -> Result<()>;
}
