//! Inventory reads and claim marking against a single inventory table.

use claimdesk_core::{Table, TableSchema};
use tracing::{info, warn};

use crate::{StoreError, TableStore};

/// Outcome of a [`mark_claimed`] call.
///
/// Lookup misses are warnings, not errors: the affected mutation is
/// skipped and the submission handler carries on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkOutcome {
    /// The row's faction cell was set.
    Marked { row: usize },
    /// No row with that name exists in the table.
    ItemNotFound,
    /// The table has no faction column to write to.
    NoFactionColumn,
}

/// Ordered names of rows still available to claim.
///
/// A row counts when its name cell is non-empty and its faction cell is
/// empty — or unconditionally when the table has no faction column.
pub fn available_names(table: &Table, schema: &TableSchema) -> Vec<String> {
    let names: Vec<String> = (0..table.len())
        .filter_map(|row| {
            let name = table.cell(row, schema.name_col);
            if name.is_empty() {
                return None;
            }
            let claimed = schema
                .faction_col
                .is_some_and(|col| !table.cell(row, col).is_empty());
            (!claimed).then(|| name.to_string())
        })
        .collect();
    info!(count = names.len(), "collected available inventory names");
    names
}

/// Set the faction cell of the row named `item`, claiming it.
///
/// First row with an exact name match wins. A missing row or a missing
/// faction column is logged and skipped.
pub async fn mark_claimed<S: TableStore>(
    store: &S,
    table_name: &str,
    schema: &TableSchema,
    item: &str,
    faction: &str,
) -> Result<MarkOutcome, StoreError> {
    let table = store.read_table(table_name).await?;
    let Some(row) = (0..table.len()).find(|&r| table.cell(r, schema.name_col) == item) else {
        warn!(table = table_name, item, "item not found, not marked");
        return Ok(MarkOutcome::ItemNotFound);
    };
    let Some(faction_col) = schema.faction_col else {
        warn!(table = table_name, item, "no faction column, not marked");
        return Ok(MarkOutcome::NoFactionColumn);
    };
    store
        .set_cell(table_name, row, faction_col, faction.to_string())
        .await?;
    info!(table = table_name, item, faction, "marked item claimed");
    Ok(MarkOutcome::Marked { row })
}
