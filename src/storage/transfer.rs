//! Bulk import and export between the store and text files.

use std::path::Path;

use sqlx::Connection;
use sqlx::sqlite::SqliteConnection;
use tracing::{debug, info, warn};

use super::{Storage, upsert};
use crate::error::{StorageError, StorageResult};
use crate::interchange::{self, RecordError, UTF8_BOM};

impl Storage {
    /// Imports `name;basePay;bonusPercent` records from a text file.
    ///
    /// Blank lines and lines without exactly three fields are skipped.
    /// Records are upserted by name. All inserts run in one transaction: if a
    /// numeric field fails to parse, or the database rejects an insert, the
    /// transaction is rolled back and the table is left as it was.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// - [`StorageError::Io`] if the file cannot be read; nothing is changed
    /// - [`StorageError::InvalidNumber`] if a numeric field does not parse
    /// - [`StorageError::Database`] if the engine rejects a statement
    pub async fn import_from_file<P: AsRef<Path>>(&mut self, path: P) -> StorageResult<usize> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let mut tx = self.conn.begin().await?;
        let result = import_records(&mut *tx, interchange::strip_bom(&content)).await;
        match result {
            Ok(imported) => {
                tx.commit().await?;
                info!(path = %path.display(), imported, "Imported work types");
                Ok(imported)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Import failed; rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(path = %path.display(), error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    /// Exports every row, ordered by name, as `"name",basePay,bonusPercent`
    /// lines.
    ///
    /// The file starts with a UTF-8 byte-order mark unless the store was
    /// configured otherwise. Names are written verbatim inside the quotes.
    ///
    /// Returns the number of rows written.
    pub async fn export_to_file<P: AsRef<Path>>(&mut self, path: P) -> StorageResult<usize> {
        let path = path.as_ref();
        let rows = self.get_all().await?;

        let mut out = Vec::new();
        if self.export_byte_order_mark {
            out.extend_from_slice(&UTF8_BOM);
        }
        for row in &rows {
            let line = interchange::format_export_row(&row.name, row.base_pay, row.bonus_percent);
            out.extend_from_slice(line.as_bytes());
            out.push(b'\n');
        }

        tokio::fs::write(path, out)
            .await
            .map_err(|source| StorageError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!(path = %path.display(), exported = rows.len(), "Exported work types");
        Ok(rows.len())
    }
}

async fn import_records(conn: &mut SqliteConnection, content: &str) -> StorageResult<usize> {
    let mut imported = 0;

    for (number, line) in content.lines().enumerate() {
        let line_no = number + 1;
        let record = match interchange::parse_record(line) {
            None => continue,
            Some(Ok(record)) => record,
            Some(Err(RecordError::Malformed)) => {
                debug!(line = line_no, "Skipping malformed record");
                continue;
            }
            Some(Err(RecordError::InvalidNumber { value, .. })) => {
                return Err(StorageError::InvalidNumber {
                    line: line_no,
                    value,
                });
            }
        };

        upsert(conn, &record.name, record.base_pay, record.bonus_percent).await?;
        imported += 1;
    }

    Ok(imported)
}
