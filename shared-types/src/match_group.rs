use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::contact::{Contact, ContactView};
use crate::staging::{StagingRecord, StagingRecordView};

/// Classification bucket assigned by the upstream matching process. The three
/// variants are structurally identical; only the reviewer's framing differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum MatchKind {
    ExactMatch,
    PotentialDuplicate,
    FalsePositive,
}

/// One staging record paired with its candidate authoritative matches, as
/// produced upstream. Immutable input within one fetch cycle; groups carry no
/// intrinsic identity across cycles.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchGroup {
    pub kind: MatchKind,
    pub staging_record: StagingRecord,
    pub matches: Vec<Contact>,
}

/// Renderable match group. `key` is synthesized from fetch-order index and is
/// only meaningful within the fetch cycle that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchGroupView {
    pub key: String,
    pub kind: MatchKind,
    pub staging_record: StagingRecordView,
    pub matches: Vec<ContactView>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct MatchGroupsResponse {
    pub groups: Vec<MatchGroupView>,
}
