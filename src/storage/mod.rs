//! SQLite-backed persistence for work types.
//!
//! ## Connection
//!
//! [`Storage`] owns exactly one `sqlx::SqliteConnection`. All operations take
//! `&mut self`, so only one caller can use the store at a time. The
//! connection is released by [`Storage::close`] or when the value is dropped.
//! If schema creation fails while opening, the connection is closed before
//! the error is returned.
//!
//! ## Schema
//!
//! A single table, created idempotently on open:
//!
//! ```text
//! WorkTypes (
//!     Id           INTEGER PRIMARY KEY AUTOINCREMENT,  -- internal only
//!     Name         TEXT UNIQUE NOT NULL,
//!     BasePay      REAL NOT NULL,
//!     BonusPercent REAL NOT NULL
//! )
//! ```
//!
//! The store enforces name uniqueness on its own; it is not linked to a
//! [`PayrollDepartment`](crate::department::PayrollDepartment).
//!
//! ## Bulk transfer
//!
//! [`Storage::import_from_file`] and [`Storage::export_to_file`] live in the
//! `transfer` submodule.

mod transfer;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteConnection};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::error::StorageResult;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS WorkTypes (
    Id INTEGER PRIMARY KEY AUTOINCREMENT,
    Name TEXT UNIQUE NOT NULL,
    BasePay REAL NOT NULL,
    BonusPercent REAL NOT NULL
)
"#;

/// A persisted work type row. The internal `Id` is never exposed.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkTypeRow {
    /// Unique name.
    pub name: String,
    /// Base pay.
    pub base_pay: f64,
    /// Bonus percentage.
    pub bonus_percent: f64,
}

impl From<(String, f64, f64)> for WorkTypeRow {
    fn from((name, base_pay, bonus_percent): (String, f64, f64)) -> Self {
        Self {
            name,
            base_pay,
            bonus_percent,
        }
    }
}

/// The work type store.
pub struct Storage {
    conn: SqliteConnection,
    export_byte_order_mark: bool,
}

impl Storage {
    /// Opens (or creates) the database at `path` with default settings.
    pub async fn open<P: AsRef<Path>>(path: P) -> StorageResult<Self> {
        Self::open_with_config(&StorageConfig::at(path.as_ref())).await
    }

    /// Opens the database described by `config` and makes sure the schema
    /// exists.
    pub async fn open_with_config(config: &StorageConfig) -> StorageResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(config.create_if_missing)
            .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .foreign_keys(true);

        info!(path = %config.path.display(), "Opening work type store");
        Self::connect(options, config.export_byte_order_mark).await
    }

    /// Opens a private in-memory database. Its contents vanish on close.
    pub async fn open_in_memory() -> StorageResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        Self::connect(options, true).await
    }

    async fn connect(
        options: SqliteConnectOptions,
        export_byte_order_mark: bool,
    ) -> StorageResult<Self> {
        let conn = options.connect().await?;
        let mut storage = Self {
            conn,
            export_byte_order_mark,
        };

        if let Err(e) = storage.initialize().await {
            warn!(error = %e, "Schema initialization failed; closing connection");
            if let Err(close_err) = storage.conn.close().await {
                warn!(error = %close_err, "Failed to close connection");
            }
            return Err(e);
        }

        Ok(storage)
    }

    /// Creates the work type table if it does not exist. Safe to call
    /// repeatedly.
    pub async fn initialize(&mut self) -> StorageResult<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&mut self.conn).await?;
        debug!("Work type schema ready");
        Ok(())
    }

    /// Returns every row ordered by name.
    pub async fn get_all(&mut self) -> StorageResult<Vec<WorkTypeRow>> {
        let rows: Vec<(String, f64, f64)> = sqlx::query_as(
            r#"
            SELECT Name, BasePay, BonusPercent
            FROM WorkTypes
            ORDER BY Name
            "#,
        )
        .fetch_all(&mut self.conn)
        .await?;

        Ok(rows.into_iter().map(WorkTypeRow::from).collect())
    }

    /// Returns the number of stored rows.
    pub async fn count(&mut self) -> StorageResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM WorkTypes")
            .fetch_one(&mut self.conn)
            .await?;
        Ok(count)
    }

    /// Deletes every row in a single statement.
    pub async fn clear_table(&mut self) -> StorageResult<()> {
        let result = sqlx::query("DELETE FROM WorkTypes")
            .execute(&mut self.conn)
            .await?;
        debug!(deleted = result.rows_affected(), "Cleared work type table");
        Ok(())
    }

    /// Inserts a row, or overwrites the row that already has this name.
    pub async fn insert_or_replace(
        &mut self,
        name: &str,
        base_pay: f64,
        bonus_percent: f64,
    ) -> StorageResult<()> {
        upsert(&mut self.conn, name, base_pay, bonus_percent).await
    }

    /// Releases the database connection.
    pub async fn close(self) -> StorageResult<()> {
        self.conn.close().await?;
        Ok(())
    }
}

async fn upsert(
    conn: &mut SqliteConnection,
    name: &str,
    base_pay: f64,
    bonus_percent: f64,
) -> StorageResult<()> {
    sqlx::query(
        r#"
        INSERT OR REPLACE INTO WorkTypes (Name, BasePay, BonusPercent)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(base_pay)
    .bind(bonus_percent)
    .execute(conn)
    .await?;

    Ok(())
}
