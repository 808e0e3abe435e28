use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

use restage_engine::RecordStore;
use shared_types::{MatchGroup, StagingRecord, StagingStatus};

use crate::database::{contacts, match_groups, staging, AsyncDbConnection};

/// Bridges the engine's store trait onto the SQLite database modules.
#[derive(Clone)]
pub struct SqliteRecordStore {
    conn: AsyncDbConnection,
}

impl SqliteRecordStore {
    pub fn new(conn: AsyncDbConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn fetch_match_groups(&self) -> Result<Vec<MatchGroup>> {
        match_groups::fetch_match_groups(self.conn.clone()).await
    }

    async fn fetch_staging_records(&self) -> Result<Vec<StagingRecord>> {
        staging::list_staging_records(self.conn.clone()).await
    }

    async fn fetch_status_counts(&self) -> Result<HashMap<String, i64>> {
        staging::status_counts(self.conn.clone()).await
    }

    async fn create_contacts(&self, records: &[StagingRecord]) -> Result<()> {
        contacts::promote_staging_records(self.conn.clone(), records).await
    }

    async fn delete_staging_records(&self, ids: &[String]) -> Result<()> {
        staging::delete_staging_records(self.conn.clone(), ids).await
    }

    async fn update_staging_status(&self, ids: &[String], status: StagingStatus) -> Result<()> {
        staging::update_status(self.conn.clone(), ids, status).await
    }
}
