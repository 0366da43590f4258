//! Keeping a department and the store in step.
//!
//! The department and the store do not reference each other. A session
//! rebuilds its department from the store at startup and writes the whole
//! department back after every successful in-memory change.

use std::path::Path;

use tracing::info;

use crate::department::PayrollDepartment;
use crate::error::StorageResult;
use crate::storage::Storage;

/// Builds a department from every stored row.
///
/// Rows are added in the store's order (by name) through
/// [`PayrollDepartment::add_work_type`], so each one is validated exactly as
/// an interactive add would be. A row that fails validation aborts the load
/// with [`StorageError::Domain`](crate::error::StorageError::Domain).
pub async fn load_department(storage: &mut Storage) -> StorageResult<PayrollDepartment> {
    let rows = storage.get_all().await?;

    let mut department = PayrollDepartment::new();
    for row in &rows {
        department.add_work_type(&row.name, row.base_pay, row.bonus_percent)?;
    }

    info!(count = department.len(), "Loaded department from store");
    Ok(department)
}

/// Replaces the stored rows with the department's current entries.
///
/// This is a clear followed by one upsert per entry; it is not wrapped in a
/// transaction.
pub async fn save_department(
    storage: &mut Storage,
    department: &PayrollDepartment,
) -> StorageResult<()> {
    storage.clear_table().await?;
    for work_type in department {
        storage
            .insert_or_replace(
                work_type.name(),
                work_type.base_pay(),
                work_type.bonus_percent(),
            )
            .await?;
    }

    info!(count = department.len(), "Saved department to store");
    Ok(())
}

/// Imports a record file into the store and returns the resulting department.
///
/// With `clear_first`, the table is emptied before the import. The clear is a
/// separate statement, so a failed import after a clear leaves the table
/// empty.
pub async fn replace_from_import<P: AsRef<Path>>(
    storage: &mut Storage,
    path: P,
    clear_first: bool,
) -> StorageResult<PayrollDepartment> {
    if clear_first {
        storage.clear_table().await?;
    }
    storage.import_from_file(path).await?;
    load_department(storage).await
}
