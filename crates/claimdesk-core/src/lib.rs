pub mod claim;
pub mod config;
pub mod schema;
pub mod table;

pub use claim::{ClaimRecord, ComboKey, Submission};
pub use config::{FormConfig, StoreConfig};
pub use schema::{SchemaError, TableSchema};
pub use table::Table;
