//! In-memory implementation of [`TableStore`].
//!
//! Holds every table in a `HashMap` behind an `RwLock`. All state is lost
//! on drop; used for tests and for wiring the handler without a network.

use std::collections::HashMap;

use async_trait::async_trait;
use claimdesk_core::Table;
use tokio::sync::RwLock;

use crate::{StoreError, TableStore};

/// In-memory table store.
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Table>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Seed a table wholesale, replacing any existing contents.
    pub async fn insert_table(&self, name: &str, table: Table) {
        let mut tables = self.tables.write().await;
        tables.insert(name.to_string(), table);
    }

    /// Whether a table exists at all.
    pub async fn has_table(&self, name: &str) -> bool {
        let tables = self.tables.read().await;
        tables.contains_key(name)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn read_table(&self, table: &str) -> Result<Table, StoreError> {
        let tables = self.tables.read().await;
        tables
            .get(table)
            .cloned()
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))
    }

    async fn append_row(&self, table: &str, row: Vec<String>) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        t.rows.push(row);
        Ok(())
    }

    async fn set_cell(
        &self,
        table: &str,
        row: usize,
        col: usize,
        value: String,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let t = tables
            .get_mut(table)
            .ok_or_else(|| StoreError::TableNotFound(table.to_string()))?;
        let r = t.rows.get_mut(row).ok_or(StoreError::RowOutOfRange {
            table: table.to_string(),
            row,
        })?;
        if r.len() <= col {
            r.resize(col + 1, String::new());
        }
        r[col] = value;
        Ok(())
    }

    async fn ensure_table(&self, table: &str, header: Vec<String>) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.contains_key(table) {
            return Ok(false);
        }
        tables.insert(table.to_string(), Table::new(header, Vec::new()));
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn read_missing_table_errors() {
        let store = MemoryStore::new();
        let err = store.read_table("Data Tapes").await.unwrap_err();
        assert_eq!(err, StoreError::TableNotFound("Data Tapes".into()));
    }

    #[tokio::test]
    async fn insert_then_read() {
        let store = MemoryStore::new();
        let table = Table::new(vec!["TAPE".into()], vec![vec!["T-01".into()]]);
        store.insert_table("Data Tapes", table.clone()).await;
        assert_eq!(store.read_table("Data Tapes").await.unwrap(), table);
    }

    #[tokio::test]
    async fn append_adds_one_row() {
        let store = MemoryStore::new();
        store
            .insert_table("Claimed", Table::new(vec!["A".into()], Vec::new()))
            .await;
        store
            .append_row("Claimed", vec!["x".into()])
            .await
            .unwrap();
        let t = store.read_table("Claimed").await.unwrap();
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell(0, 0), "x");
    }

    #[tokio::test]
    async fn set_cell_pads_short_rows() {
        let store = MemoryStore::new();
        store
            .insert_table(
                "Data Tapes",
                Table::new(
                    vec!["TAPE".into(), "FACTION".into()],
                    vec![vec!["T-01".into()]],
                ),
            )
            .await;
        store
            .set_cell("Data Tapes", 0, 1, "Ravens".into())
            .await
            .unwrap();
        let t = store.read_table("Data Tapes").await.unwrap();
        assert_eq!(t.cell(0, 1), "Ravens");
    }

    #[tokio::test]
    async fn set_cell_out_of_range_errors() {
        let store = MemoryStore::new();
        store
            .insert_table("Data Tapes", Table::new(vec!["TAPE".into()], Vec::new()))
            .await;
        let err = store
            .set_cell("Data Tapes", 3, 0, "x".into())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::RowOutOfRange {
                table: "Data Tapes".into(),
                row: 3
            }
        );
    }

    #[tokio::test]
    async fn ensure_table_creates_once() {
        let store = MemoryStore::new();
        let created = store
            .ensure_table("Claimed", vec!["Data Tape".into()])
            .await
            .unwrap();
        assert!(created);
        let again = store
            .ensure_table("Claimed", vec!["Data Tape".into()])
            .await
            .unwrap();
        assert!(!again);
        assert!(store.has_table("Claimed").await);
    }
}
