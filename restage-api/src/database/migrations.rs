use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Staging records as ingested upstream
    conn.execute(
        "CREATE TABLE IF NOT EXISTS staging_records (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT,
            secondary_email TEXT,
            other_email TEXT,
            umail TEXT,
            phone TEXT,
            birth_date TEXT,
            status TEXT NOT NULL DEFAULT 'Pending' CHECK (status IN ('Pending', 'Approved', 'Rejected', 'Processed')),
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Authoritative contacts
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            birth_date TEXT,
            staging_record_id TEXT,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (staging_record_id) REFERENCES staging_records (id) ON DELETE SET NULL
        )",
        [],
    )?;

    // Indexes for the classification queries
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_staging_records_status
            ON staging_records(status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_staging_records_email
            ON staging_records(email)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_email
            ON contacts(email)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_staging_record
            ON contacts(staging_record_id)",
        [],
    )?;

    Ok(())
}
