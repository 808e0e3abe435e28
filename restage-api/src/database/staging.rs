use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::NaiveDate;
use shared_types::{CreateStagingRequest, StagingRecord, StagingStatus};
use std::collections::HashMap;

const STAGING_COLUMNS: &str = "id, first_name, last_name, email, secondary_email, other_email, \
     umail, phone, birth_date, status, created_at, updated_at";

pub(crate) fn row_to_staging(row: &rusqlite::Row<'_>) -> rusqlite::Result<StagingRecord> {
    let status_text: String = row.get(9)?;
    let status = status_text.parse::<StagingStatus>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(9, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let birth_date: Option<String> = row.get(8)?;

    Ok(StagingRecord {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        secondary_email: row.get(4)?,
        other_email: row.get(5)?,
        umail: row.get(6)?,
        phone: row.get(7)?,
        // Tolerate malformed stored dates rather than failing the whole row
        birth_date: birth_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        status,
        created_at: row.get(10)?,
        updated_at: row.get(11)?,
    })
}

pub async fn insert_staging_record(
    conn: AsyncDbConnection,
    request: &CreateStagingRequest,
) -> Result<StagingRecord> {
    let conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();
    let id = uuid::Uuid::new_v4().to_string();
    let birth_date = request.birth_date.map(|d| d.format("%Y-%m-%d").to_string());

    conn.execute(
        "INSERT INTO staging_records
         (id, first_name, last_name, email, secondary_email, other_email, umail, phone,
          birth_date, status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, 'Pending', ?, ?)",
        rusqlite::params![
            &id,
            &request.first_name,
            &request.last_name,
            request.email.as_ref(),
            request.secondary_email.as_ref(),
            request.other_email.as_ref(),
            request.umail.as_ref(),
            request.phone.as_ref(),
            birth_date.as_ref(),
            now,
            now
        ],
    )?;

    Ok(StagingRecord {
        id,
        first_name: request.first_name.clone(),
        last_name: request.last_name.clone(),
        email: request.email.clone(),
        secondary_email: request.secondary_email.clone(),
        other_email: request.other_email.clone(),
        umail: request.umail.clone(),
        phone: request.phone.clone(),
        birth_date: request.birth_date,
        status: StagingStatus::Pending,
        created_at: now,
        updated_at: now,
    })
}

pub async fn list_staging_records(conn: AsyncDbConnection) -> Result<Vec<StagingRecord>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM staging_records ORDER BY created_at, id",
        STAGING_COLUMNS
    ))?;

    let records = stmt
        .query_map([], row_to_staging)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

/// Staging records still under review, i.e. everything not yet `Processed`.
pub async fn list_active_staging_records(conn: AsyncDbConnection) -> Result<Vec<StagingRecord>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM staging_records WHERE status != 'Processed' ORDER BY created_at, id",
        STAGING_COLUMNS
    ))?;

    let records = stmt
        .query_map([], row_to_staging)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(records)
}

pub async fn status_counts(conn: AsyncDbConnection) -> Result<HashMap<String, i64>> {
    let conn = conn.lock().await;

    let mut stmt =
        conn.prepare("SELECT status, COUNT(*) FROM staging_records GROUP BY status")?;

    let counts = stmt
        .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
        .collect::<Result<HashMap<_, _>, _>>()?;

    Ok(counts)
}

pub async fn update_status(
    conn: AsyncDbConnection,
    ids: &[String],
    status: StagingStatus,
) -> Result<()> {
    let mut conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    for id in ids {
        tx.execute(
            "UPDATE staging_records SET status = ?, updated_at = ? WHERE id = ?",
            rusqlite::params![status.as_str(), now, id],
        )?;
    }
    tx.commit()?;

    Ok(())
}

pub async fn delete_staging_records(conn: AsyncDbConnection, ids: &[String]) -> Result<()> {
    let mut conn = conn.lock().await;

    let tx = conn.transaction()?;
    for id in ids {
        tx.execute("DELETE FROM staging_records WHERE id = ?", [id])?;
    }
    tx.commit()?;

    Ok(())
}
