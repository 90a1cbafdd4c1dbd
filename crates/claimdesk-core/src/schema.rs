//! Column mapping for inventory tables.
//!
//! The upstream sheets identify columns only by header text: the name
//! column is whichever header contains a marker token ("TAPE", "DECODER"),
//! and the claimant column is headed "FACTION" in any case. The mapping is
//! derived once per table and validated up front, rather than re-scanned
//! from raw headers on every read.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no header containing {marker:?} in table {table:?}")]
    NameColumnNotFound { table: String, marker: String },
}

/// Validated column roles for one inventory table.
///
/// `faction_col` is `None` when the table has no FACTION column, in which
/// case every named row counts as unclaimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    pub name_col: usize,
    pub faction_col: Option<usize>,
}

impl TableSchema {
    /// Explicit mapping from known column indices.
    pub fn new(name_col: usize, faction_col: Option<usize>) -> Self {
        Self {
            name_col,
            faction_col,
        }
    }

    /// Derive the mapping from a header row.
    ///
    /// When several headers contain the marker the last match wins.
    /// A missing name column is a configuration error; a missing FACTION
    /// column is not.
    pub fn detect(table: &str, header: &[String], marker: &str) -> Result<Self, SchemaError> {
        let name_col = header
            .iter()
            .rposition(|h| h.contains(marker))
            .ok_or_else(|| SchemaError::NameColumnNotFound {
                table: table.to_string(),
                marker: marker.to_string(),
            })?;
        let faction_col = header.iter().rposition(|h| h.eq_ignore_ascii_case("FACTION"));
        Ok(Self {
            name_col,
            faction_col,
        })
    }
}
