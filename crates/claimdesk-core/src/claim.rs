//! Submission and claim types shared across the workspace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One form response, extracted by field title.
///
/// Immutable once created; a field the respondent left blank (or that the
/// form does not carry) is the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub tape: String,
    pub decoder: String,
    pub faction: String,
    pub email: String,
}

impl Submission {
    /// The (tape, decoder) combination this submission claims.
    pub fn combo(&self) -> ComboKey {
        ComboKey {
            tape: self.tape.clone(),
            decoder: self.decoder.clone(),
        }
    }
}

/// A (tape, decoder) pair — the unit of duplicate detection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComboKey {
    pub tape: String,
    pub decoder: String,
}

/// One appended row of the claim log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub tape: String,
    pub decoder: String,
    pub faction: String,
    pub claimed_at: DateTime<Utc>,
}

impl ClaimRecord {
    pub fn new(submission: &Submission, claimed_at: DateTime<Utc>) -> Self {
        Self {
            tape: submission.tape.clone(),
            decoder: submission.decoder.clone(),
            faction: submission.faction.clone(),
            claimed_at,
        }
    }

    pub fn combo(&self) -> ComboKey {
        ComboKey {
            tape: self.tape.clone(),
            decoder: self.decoder.clone(),
        }
    }

    /// Encode as a log-table row: `[tape, decoder, faction, rfc3339]`.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.tape.clone(),
            self.decoder.clone(),
            self.faction.clone(),
            self.claimed_at.to_rfc3339(),
        ]
    }

    /// Decode a log-table row. `None` when the timestamp cell does not
    /// parse — callers skip such rows rather than fail the whole load.
    pub fn from_row(row: &[String]) -> Option<Self> {
        let claimed_at = DateTime::parse_from_rfc3339(row.get(3)?.as_str())
            .ok()?
            .with_timezone(&Utc);
        Some(Self {
            tape: row.first()?.clone(),
            decoder: row.get(1)?.clone(),
            faction: row.get(2)?.clone(),
            claimed_at,
        })
    }
}
