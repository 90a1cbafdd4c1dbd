//! The claim log and its duplicate index.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{DateTime, Utc};
use claimdesk_core::{ClaimRecord, ComboKey, FormConfig, StoreConfig, Submission, Table};
use tracing::{info, warn};

use crate::{StoreError, TableStore};

/// Appends one row to the claim log per submission.
///
/// Deliberately not idempotent: recording the same submission twice
/// appends two identical rows. Callers are responsible for at-most-once
/// invocation per form response.
pub struct ClaimRecorder {
    table: String,
    header: Vec<String>,
}

impl ClaimRecorder {
    /// The log header reuses the form's field titles for the two name
    /// columns, matching the sheet the original operators read.
    pub fn new(store: &StoreConfig, form: &FormConfig) -> Self {
        Self {
            table: store.claims_table.clone(),
            header: vec![
                form.tape_field.clone(),
                form.decoder_field.clone(),
                "Faction".into(),
                "Claimed At".into(),
            ],
        }
    }

    /// Append one claim row, creating the log table on first use.
    pub async fn record<S: TableStore>(
        &self,
        store: &S,
        submission: &Submission,
        claimed_at: DateTime<Utc>,
    ) -> Result<ClaimRecord, StoreError> {
        let created = store
            .ensure_table(&self.table, self.header.clone())
            .await?;
        if created {
            info!(table = %self.table, "created claim log table");
        }
        let record = ClaimRecord::new(submission, claimed_at);
        store.append_row(&self.table, record.to_row()).await?;
        info!(
            tape = %record.tape,
            decoder = %record.decoder,
            faction = %record.faction,
            "recorded claim"
        );
        Ok(record)
    }
}

/// Advisory duplicate detection over the claim history.
///
/// Keeps a map from each (tape, decoder) combination to its earliest
/// claimant, so checking a new submission is a single lookup instead of a
/// scan of the full log. Detection never blocks or undoes a claim.
#[derive(Default)]
pub struct DuplicateDetector {
    earliest: HashMap<ComboKey, ClaimRecord>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the index from an existing log table, in row order.
    ///
    /// The first record seen for a combination stays its earliest
    /// claimant. Rows whose timestamp cell does not parse are skipped.
    pub fn load(&mut self, log: &Table) {
        self.earliest.clear();
        let mut skipped = 0usize;
        for row in &log.rows {
            match ClaimRecord::from_row(row) {
                Some(record) => {
                    self.earliest.entry(record.combo()).or_insert(record);
                }
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            warn!(skipped, "skipped unparseable claim log rows");
        }
        info!(combos = self.earliest.len(), "loaded duplicate index");
    }

    /// Check a new submission against everything recorded strictly
    /// before it, then register it.
    ///
    /// Returns the earliest prior claimant of the same combination, or
    /// `None` when this submission is the first to claim it.
    pub fn observe(
        &mut self,
        submission: &Submission,
        claimed_at: DateTime<Utc>,
    ) -> Option<ClaimRecord> {
        match self.earliest.entry(submission.combo()) {
            Entry::Occupied(entry) => Some(entry.get().clone()),
            Entry::Vacant(entry) => {
                entry.insert(ClaimRecord::new(submission, claimed_at));
                None
            }
        }
    }

    /// Number of distinct combinations claimed so far.
    pub fn len(&self) -> usize {
        self.earliest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.earliest.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::TimeZone;

    fn submission(tape: &str, decoder: &str, faction: &str, email: &str) -> Submission {
        Submission {
            tape: tape.into(),
            decoder: decoder.into(),
            faction: faction.into(),
            email: email.into(),
        }
    }

    fn at(minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, minute, 0).unwrap()
    }

    fn recorder() -> ClaimRecorder {
        ClaimRecorder::new(&StoreConfig::default(), &FormConfig::default())
    }

    #[tokio::test]
    async fn record_creates_log_with_header() {
        let store = MemoryStore::new();
        recorder()
            .record(&store, &submission("A", "B", "F1", "e1"), at(0))
            .await
            .unwrap();

        let log = store.read_table("Claimed").await.unwrap();
        assert_eq!(
            log.header,
            vec!["Data Tape", "Decoder", "Faction", "Claimed At"]
        );
        assert_eq!(log.len(), 1);
        assert_eq!(log.cell(0, 0), "A");
        assert_eq!(log.cell(0, 2), "F1");
    }

    #[tokio::test]
    async fn recording_twice_appends_two_rows() {
        // Append-only and not idempotent: the same submission recorded
        // twice yields two identical rows.
        let store = MemoryStore::new();
        let sub = submission("A", "B", "F1", "e1");
        recorder().record(&store, &sub, at(0)).await.unwrap();
        recorder().record(&store, &sub, at(0)).await.unwrap();

        let log = store.read_table("Claimed").await.unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log.rows[0], log.rows[1]);
    }

    #[test]
    fn first_claim_is_not_a_duplicate() {
        let mut detector = DuplicateDetector::new();
        assert_eq!(detector.observe(&submission("A", "B", "F1", "e1"), at(0)), None);
        assert_eq!(detector.len(), 1);
    }

    #[test]
    fn repeat_combo_reports_earliest_claimant() {
        let mut detector = DuplicateDetector::new();
        detector.observe(&submission("A", "B", "F1", "e1"), at(0));
        let prior = detector
            .observe(&submission("A", "B", "F2", "e2"), at(5))
            .expect("duplicate expected");
        assert_eq!(prior.faction, "F1");
        assert_eq!(prior.claimed_at, at(0));
    }

    #[test]
    fn third_claim_still_reports_the_first() {
        let mut detector = DuplicateDetector::new();
        detector.observe(&submission("A", "B", "F1", "e1"), at(0));
        detector.observe(&submission("A", "B", "F2", "e2"), at(5));
        let prior = detector
            .observe(&submission("A", "B", "F3", "e3"), at(9))
            .expect("duplicate expected");
        assert_eq!(prior.faction, "F1");
    }

    #[test]
    fn different_combo_is_not_a_duplicate() {
        let mut detector = DuplicateDetector::new();
        detector.observe(&submission("A", "B", "F1", "e1"), at(0));
        assert_eq!(detector.observe(&submission("C", "D", "F2", ""), at(5)), None);
        // Same tape with a different decoder is a distinct combination.
        assert_eq!(detector.observe(&submission("A", "D", "F3", "e3"), at(6)), None);
    }

    #[test]
    fn load_keeps_first_record_per_combo_and_skips_bad_rows() {
        let log = Table::new(
            vec![
                "Data Tape".into(),
                "Decoder".into(),
                "Faction".into(),
                "Claimed At".into(),
            ],
            vec![
                vec!["A".into(), "B".into(), "F1".into(), at(0).to_rfc3339()],
                vec!["A".into(), "B".into(), "F2".into(), at(5).to_rfc3339()],
                vec!["C".into(), "D".into(), "F3".into(), "not-a-time".into()],
            ],
        );
        let mut detector = DuplicateDetector::new();
        detector.load(&log);

        assert_eq!(detector.len(), 1);
        let prior = detector
            .observe(&submission("A", "B", "F4", "e4"), at(9))
            .expect("duplicate expected");
        assert_eq!(prior.faction, "F1");
        // The unparseable row was dropped, so its combo reads as fresh.
        assert_eq!(detector.observe(&submission("C", "D", "F5", "e5"), at(9)), None);
    }

    #[tokio::test]
    async fn reload_from_recorded_rows_roundtrips() {
        let store = MemoryStore::new();
        let rec = recorder();
        rec.record(&store, &submission("A", "B", "F1", "e1"), at(0))
            .await
            .unwrap();
        rec.record(&store, &submission("C", "D", "F2", "e2"), at(1))
            .await
            .unwrap();

        let mut detector = DuplicateDetector::new();
        detector.load(&store.read_table("Claimed").await.unwrap());
        assert_eq!(detector.len(), 2);
        let prior = detector
            .observe(&submission("C", "D", "F9", "e9"), at(7))
            .expect("duplicate expected");
        assert_eq!(prior.faction, "F2");
    }
}
