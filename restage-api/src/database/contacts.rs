use crate::database::AsyncDbConnection;
use anyhow::Result;
use chrono::NaiveDate;
use shared_types::{Contact, StagingRecord};

pub(crate) const CONTACT_COLUMNS: &str =
    "id, first_name, last_name, email, phone, birth_date, staging_record_id, created_at, updated_at";

pub(crate) fn row_to_contact(row: &rusqlite::Row<'_>) -> rusqlite::Result<Contact> {
    let birth_date: Option<String> = row.get(5)?;

    Ok(Contact {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        birth_date: birth_date.and_then(|d| NaiveDate::parse_from_str(&d, "%Y-%m-%d").ok()),
        staging_record_id: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub async fn list_contacts(conn: AsyncDbConnection) -> Result<Vec<Contact>> {
    let conn = conn.lock().await;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM contacts ORDER BY created_at, id",
        CONTACT_COLUMNS
    ))?;

    let contacts = stmt
        .query_map([], row_to_contact)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Promote staging records: create one contact per record and mark the staging
/// record `Processed`, atomically. A failure anywhere rolls back the whole
/// batch so the caller never observes a half-promoted state.
pub async fn promote_staging_records(
    conn: AsyncDbConnection,
    records: &[StagingRecord],
) -> Result<()> {
    let mut conn = conn.lock().await;
    let now = chrono::Utc::now().timestamp();

    let tx = conn.transaction()?;
    for record in records {
        let contact_id = uuid::Uuid::new_v4().to_string();
        let birth_date = record.birth_date.map(|d| d.format("%Y-%m-%d").to_string());

        tx.execute(
            "INSERT INTO contacts
             (id, first_name, last_name, email, phone, birth_date, staging_record_id,
              created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            rusqlite::params![
                &contact_id,
                &record.first_name,
                &record.last_name,
                record.email.as_ref(),
                record.phone.as_ref(),
                birth_date.as_ref(),
                &record.id,
                now,
                now
            ],
        )?;

        tx.execute(
            "UPDATE staging_records SET status = 'Processed', updated_at = ? WHERE id = ?",
            rusqlite::params![now, &record.id],
        )?;
    }
    tx.commit()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::staging;
    use crate::database::Database;
    use shared_types::{CreateStagingRequest, StagingStatus};

    fn test_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    #[tokio::test]
    async fn test_promote_creates_contact_and_marks_processed() {
        let (_dir, db) = test_db();
        let conn = db.async_connection.clone();

        let record = staging::insert_staging_record(
            conn.clone(),
            &CreateStagingRequest {
                first_name: "Ada".to_string(),
                last_name: "Lovelace".to_string(),
                email: Some("ada@example.org".to_string()),
                secondary_email: None,
                other_email: None,
                umail: None,
                phone: None,
                birth_date: None,
            },
        )
        .await
        .unwrap();

        promote_staging_records(conn.clone(), &[record.clone()])
            .await
            .unwrap();

        let contacts = list_contacts(conn.clone()).await.unwrap();
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].first_name, "Ada");
        assert_eq!(contacts[0].staging_record_id.as_deref(), Some(record.id.as_str()));

        let records = staging::list_staging_records(conn).await.unwrap();
        assert_eq!(records[0].status, StagingStatus::Processed);
    }
}
