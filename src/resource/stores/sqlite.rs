use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, Transaction};
use tracing::{debug, info};

use crate::resource::error::StoreError;
use crate::resource::store::{SnapshotRecorder, SnapshotStore};
use crate::resource::types::{FetchedResources, ResourceKey};

/// Schema migrations
/// Each version contains a list of SQL statements to execute
const MIGRATIONS: &[&[&str]] = &[
    // v1: lookup by app
    &["CREATE INDEX IF NOT EXISTS idx_snapshots_app_name ON snapshots(app_name)"],
];

/// Local store of the resources each app was last built from
pub struct SqliteSnapshotStore {
    conn: Mutex<Connection>,
}

impl SqliteSnapshotStore {
    pub fn new(db_path: &Path) -> Result<Self, StoreError> {
        info!("Initializing snapshot database at {:?}", db_path);

        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;

        let store = Self {
            conn: Mutex::new(conn),
        };

        store.create_schema()?;
        debug!("Snapshot database ready");

        Ok(store)
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Get current timestamp in milliseconds since UNIX epoch
    fn current_timestamp_ms() -> i64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default()
    }

    fn create_schema(&self) -> Result<(), StoreError> {
        let conn = self.lock_conn()?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                app_name TEXT NOT NULL,
                resource_key TEXT NOT NULL,
                updated_at INTEGER NOT NULL,
                UNIQUE(app_name, resource_key)
            )
            "#,
            [],
        )?;

        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS snapshot_values (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                snapshot_id INTEGER NOT NULL,
                position INTEGER NOT NULL,
                value TEXT NOT NULL,
                FOREIGN KEY (snapshot_id) REFERENCES snapshots(id) ON DELETE CASCADE,
                UNIQUE(snapshot_id, position)
            )
            "#,
            [],
        )?;

        Self::apply_migrations(&conn)
    }

    /// Apply pending migrations based on user_version pragma
    fn apply_migrations(conn: &Connection) -> Result<(), StoreError> {
        let current_version: i32 =
            conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

        for (i, statements) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                for sql in *statements {
                    conn.execute(sql, [])?;
                }
                debug!("Applied migration v{}", version);
            }
        }

        let target_version = MIGRATIONS.len() as i32;
        if target_version > current_version {
            conn.pragma_update(None, "user_version", target_version)?;
        }

        Ok(())
    }

    /// Recorded values for a key, `None` when the key was never recorded
    pub fn get_values(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Option<Vec<String>>, StoreError> {
        let conn = self.lock_conn()?;

        let snapshot_id: Option<i64> = conn
            .query_row(
                "SELECT id FROM snapshots WHERE app_name = ?1 AND resource_key = ?2",
                (app_name, key.as_str()),
                |row| row.get(0),
            )
            .optional()?;

        let Some(snapshot_id) = snapshot_id else {
            return Ok(None);
        };

        let mut stmt = conn.prepare(
            "SELECT value FROM snapshot_values WHERE snapshot_id = ?1 ORDER BY position",
        )?;
        let values = stmt
            .query_map([snapshot_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(Some(values))
    }

    /// Replace the values recorded for a key
    pub fn replace_values(
        &self,
        app_name: &str,
        key: ResourceKey,
        values: &[String],
    ) -> Result<(), StoreError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;
        Self::replace_values_in(&tx, app_name, key, values)?;
        tx.commit()?;
        Ok(())
    }

    fn replace_values_in(
        tx: &Transaction<'_>,
        app_name: &str,
        key: ResourceKey,
        values: &[String],
    ) -> Result<(), StoreError> {
        let snapshot_id: i64 = tx.query_row(
            r#"
            INSERT INTO snapshots (app_name, resource_key, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(app_name, resource_key) DO UPDATE SET updated_at = excluded.updated_at
            RETURNING id
            "#,
            (app_name, key.as_str(), Self::current_timestamp_ms()),
            |row| row.get(0),
        )?;

        tx.execute(
            "DELETE FROM snapshot_values WHERE snapshot_id = ?1",
            [snapshot_id],
        )?;

        let mut stmt = tx.prepare(
            "INSERT INTO snapshot_values (snapshot_id, position, value) VALUES (?1, ?2, ?3)",
        )?;
        for (position, value) in values.iter().enumerate() {
            stmt.execute((snapshot_id, position as i64, value))?;
        }

        Ok(())
    }

    fn app_exists(&self, app_name: &str) -> Result<bool, StoreError> {
        let conn = self.lock_conn()?;
        let exists = conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM snapshots WHERE app_name = ?1)",
            [app_name],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    fn lookup(&self, app_name: &str, key: ResourceKey) -> Result<Vec<String>, StoreError> {
        match self.get_values(app_name, key)? {
            Some(values) => Ok(values),
            None if self.app_exists(app_name)? => Err(StoreError::MissingKey {
                app: app_name.to_string(),
                key,
            }),
            None => Err(StoreError::MissingApp(app_name.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn last_versions(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key)
    }

    async fn last_sources(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key)
    }
}

#[async_trait::async_trait]
impl SnapshotRecorder for SqliteSnapshotStore {
    async fn record(&self, app_name: &str, resources: &FetchedResources) -> Result<(), StoreError> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction()?;

        for key in ResourceKey::ALL {
            Self::replace_values_in(&tx, app_name, key, &resources.values_for(key))?;
        }

        tx.commit()?;
        info!("Recorded resources for {}", app_name);
        Ok(())
    }
}
