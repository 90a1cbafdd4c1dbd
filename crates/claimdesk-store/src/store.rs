//! The storage seam between claim logic and whatever holds the tables.

use async_trait::async_trait;
use claimdesk_core::Table;

use crate::StoreError;

/// Access to named tables in the shared external store.
///
/// The store has last-writer-wins semantics: no locking or conditional
/// updates are offered, matching the hosted spreadsheet it stands in for.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Full contents of a table, header included.
    async fn read_table(&self, table: &str) -> Result<Table, StoreError>;

    /// Append one data row to an existing table.
    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<(), StoreError>;

    /// Overwrite a single cell of a data row (0-based, header excluded).
    /// Short rows are padded so the target cell exists.
    async fn set_cell(
        &self,
        table: &str,
        row: usize,
        col: usize,
        value: String,
    ) -> Result<(), StoreError>;

    /// Create the table with the given header if it does not exist yet.
    /// Returns `true` when the table was created by this call.
    async fn ensure_table(&self, table: &str, header: Vec<String>) -> Result<bool, StoreError>;
}
