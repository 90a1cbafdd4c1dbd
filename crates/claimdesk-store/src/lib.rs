//! Storage layer: the table store seam, inventory reads, and the claim log.

mod error;
pub use error::StoreError;

mod store;
pub use store::TableStore;

mod memory;
pub use memory::MemoryStore;

pub mod inventory;
pub use inventory::{MarkOutcome, available_names, mark_claimed};

pub mod ledger;
pub use ledger::{ClaimRecorder, DuplicateDetector};
