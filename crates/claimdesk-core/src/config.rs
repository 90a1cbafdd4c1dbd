//! Injected configuration for the external store and form.
//!
//! The identifiers live in configuration passed to each component at
//! construction, so tests can point everything at in-memory fakes.

/// Names of the backing tables and the header markers used to locate the
/// name column in each inventory table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub tapes_table: String,
    pub decoders_table: String,
    pub claims_table: String,
    pub tape_marker: String,
    pub decoder_marker: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            tapes_table: "Data Tapes".into(),
            decoders_table: "Decoders".into(),
            claims_table: "Claimed".into(),
            tape_marker: "TAPE".into(),
            decoder_marker: "DECODER".into(),
        }
    }
}

/// Exact titles of the form fields consumed by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    pub tape_field: String,
    pub decoder_field: String,
    pub email_field: String,
    pub faction_field: String,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            tape_field: "Data Tape".into(),
            decoder_field: "Decoder".into(),
            email_field: "Contact Email".into(),
            faction_field: "Faction Name".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_carry_original_titles() {
        let store = StoreConfig::default();
        assert_eq!(store.tapes_table, "Data Tapes");
        assert_eq!(store.claims_table, "Claimed");

        let form = FormConfig::default();
        assert_eq!(form.tape_field, "Data Tape");
        assert_eq!(form.faction_field, "Faction Name");
    }
}
