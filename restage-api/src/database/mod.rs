pub mod contacts;
pub mod match_groups;
pub mod migrations;
pub mod staging;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type DbConnection = Arc<Mutex<Connection>>;

#[derive(Clone)]
pub struct AsyncDbConnection {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl AsyncDbConnection {
    pub fn new(pool: Pool<SqliteConnectionManager>) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub async fn lock(&self) -> PooledConnection<SqliteConnectionManager> {
        self.pool
            .get()
            .expect("Failed to get DB connection from pool")
    }
}

pub struct Database {
    pub connection: DbConnection,
    pub async_connection: AsyncDbConnection,
}

impl Database {
    /// Create a new database connection and run migrations
    pub fn new(db_path: &Path) -> anyhow::Result<Self> {
        // Ensure directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create sync connection first and run migrations
        let sync_conn = Connection::open(db_path)?;
        let sync_mutex = Arc::new(Mutex::new(sync_conn));

        // Run migrations on sync connection before opening async connection
        {
            let conn = sync_mutex.lock().unwrap();
            migrations::run_migrations(&conn)?;
        }

        // Pooled connections will see the migrated schema
        let manager = SqliteConnectionManager::file(db_path).with_init(|conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });

        let pool = Pool::builder().max_size(8).build(manager)?;

        Ok(Database {
            connection: sync_mutex,
            async_connection: AsyncDbConnection::new(pool),
        })
    }
}

/// Returns the path to the restage database based on the operating system
pub fn get_db_path() -> anyhow::Result<PathBuf> {
    let data_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine local data directory"))?;

    Ok(data_dir.join("restage").join("restage.db"))
}

/// Initialize the database connection
pub fn initialize_database() -> anyhow::Result<Arc<Database>> {
    let db_path = get_db_path()?;

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db = Database::new(&db_path)?;
    Ok(Arc::new(db))
}
