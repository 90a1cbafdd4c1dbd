use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("row {row} out of range for table {table:?}")]
    RowOutOfRange { table: String, row: usize },

    #[error("{0}")]
    Schema(#[from] claimdesk_core::SchemaError),
}
