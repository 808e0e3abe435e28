use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A confirmed person record in the system of record.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<chrono::NaiveDate>,
    /// Back-reference to the staging record this contact was promoted from,
    /// when known.
    pub staging_record_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Renderable projection of a [`Contact`], flattened out of its match group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ContactView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    /// `YYYY-MM-DD`, or empty when the contact carries no birth date.
    pub birth_date: String,
    pub record_link: String,
    pub staging_record_id: Option<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<ContactView>,
}
