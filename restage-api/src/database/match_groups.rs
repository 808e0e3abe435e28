use anyhow::Result;
use rusqlite::Connection;
use std::collections::HashSet;

use shared_types::{Contact, MatchGroup, MatchKind, StagingRecord, StagingStatus};

use crate::database::contacts::{row_to_contact, CONTACT_COLUMNS};
use crate::database::{staging, AsyncDbConnection};

/// Stand-in for the upstream matching service: buckets every staging record
/// still under review into exactly one match group using plain equality
/// joins. The heuristics here carry no invariants and are replaceable; the
/// engine only relies on the group shape.
///
/// Each contact is assigned to at most one group, first-assigned wins.
pub async fn fetch_match_groups(conn: AsyncDbConnection) -> Result<Vec<MatchGroup>> {
    let records = staging::list_active_staging_records(conn.clone()).await?;
    let conn = conn.lock().await;

    let mut used: HashSet<String> = HashSet::new();
    let mut groups = Vec::with_capacity(records.len());
    for record in records {
        groups.push(classify(&conn, record, &mut used)?);
    }

    groups.sort_by_key(|g| kind_rank(g.kind));
    Ok(groups)
}

fn classify(
    conn: &Connection,
    record: StagingRecord,
    used: &mut HashSet<String>,
) -> Result<MatchGroup> {
    if record.status == StagingStatus::Rejected {
        // The reviewer held this record; its remaining email matches are the
        // candidates they deemed not to be duplicates.
        let matches = take_unused(email_matches(conn, &record)?, used);
        return Ok(MatchGroup {
            kind: MatchKind::FalsePositive,
            staging_record: record,
            matches,
        });
    }

    let exact = take_unused(exact_matches(conn, &record)?, used);
    if !exact.is_empty() {
        return Ok(MatchGroup {
            kind: MatchKind::ExactMatch,
            staging_record: record,
            matches: exact,
        });
    }

    let potential = take_unused(potential_matches(conn, &record)?, used);
    Ok(MatchGroup {
        kind: MatchKind::PotentialDuplicate,
        staging_record: record,
        matches: potential,
    })
}

fn kind_rank(kind: MatchKind) -> u8 {
    match kind {
        MatchKind::ExactMatch => 0,
        MatchKind::PotentialDuplicate => 1,
        MatchKind::FalsePositive => 2,
    }
}

fn take_unused(contacts: Vec<Contact>, used: &mut HashSet<String>) -> Vec<Contact> {
    contacts
        .into_iter()
        .filter(|c| used.insert(c.id.clone()))
        .collect()
}

fn exact_matches(conn: &Connection, record: &StagingRecord) -> Result<Vec<Contact>> {
    let email = match &record.email {
        Some(email) => email,
        None => return Ok(Vec::new()),
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts
         WHERE lower(email) = lower(?)
           AND lower(first_name) = lower(?)
           AND lower(last_name) = lower(?)
         ORDER BY created_at, id",
        CONTACT_COLUMNS
    ))?;

    let contacts = stmt
        .query_map(
            rusqlite::params![email, &record.first_name, &record.last_name],
            row_to_contact,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

fn potential_matches(conn: &Connection, record: &StagingRecord) -> Result<Vec<Contact>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts
         WHERE lower(last_name) = lower(?1)
           AND ((?2 IS NOT NULL AND phone = ?2) OR lower(first_name) = lower(?3))
         ORDER BY created_at, id",
        CONTACT_COLUMNS
    ))?;

    let contacts = stmt
        .query_map(
            rusqlite::params![&record.last_name, record.phone.as_ref(), &record.first_name],
            row_to_contact,
        )?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

fn email_matches(conn: &Connection, record: &StagingRecord) -> Result<Vec<Contact>> {
    let email = match &record.email {
        Some(email) => email,
        None => return Ok(Vec::new()),
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts WHERE lower(email) = lower(?) ORDER BY created_at, id",
        CONTACT_COLUMNS
    ))?;

    let contacts = stmt
        .query_map([email], row_to_contact)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}
