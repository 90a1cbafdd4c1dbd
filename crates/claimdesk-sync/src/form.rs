//! The form seam: field discovery, choice replacement, response reading.

use async_trait::async_trait;
use claimdesk_core::{FormConfig, Submission};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// A required field is missing or has the wrong kind. This is a setup
    /// problem, not something to recover from at runtime.
    #[error("no {kind:?} field titled {title:?} in form")]
    FieldNotFound { title: String, kind: FieldKind },
}

/// Input kinds the handler cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Dropdown whose choices are set from the inventory.
    List,
    /// Free text.
    Text,
}

/// One field of the external form, identified by its exact title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub title: String,
    pub kind: FieldKind,
}

/// Access to the externally hosted form.
#[async_trait]
pub trait FormBackend: Send + Sync {
    /// All fields of the form, in form order.
    async fn fields(&self) -> Vec<FormField>;

    /// Replace the selectable choices of the list field with this title.
    async fn set_list_choices(&self, title: &str, choices: Vec<String>) -> Result<(), FormError>;
}

/// Push the available-name lists into the form's two dropdowns.
///
/// Both fields are located before either is touched, so a missing field
/// fails the sync without half-updating the form.
pub async fn sync_choices<F: FormBackend>(
    form: &F,
    config: &FormConfig,
    tapes: Vec<String>,
    decoders: Vec<String>,
) -> Result<(), FormError> {
    let fields = form.fields().await;
    for title in [&config.tape_field, &config.decoder_field] {
        let found = fields
            .iter()
            .any(|f| f.kind == FieldKind::List && f.title == *title);
        if !found {
            return Err(FormError::FieldNotFound {
                title: title.clone(),
                kind: FieldKind::List,
            });
        }
    }

    info!(
        tapes = tapes.len(),
        decoders = decoders.len(),
        "syncing form choices"
    );
    form.set_list_choices(&config.tape_field, tapes).await?;
    form.set_list_choices(&config.decoder_field, decoders).await?;
    Ok(())
}

/// One form response: `(field title, answer)` pairs in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormResponse {
    pub answers: Vec<(String, String)>,
}

impl FormResponse {
    pub fn new(answers: Vec<(String, String)>) -> Self {
        Self { answers }
    }

    fn answer(&self, title: &str) -> String {
        self.answers
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, v)| v.clone())
            .unwrap_or_default()
    }

    /// Extract a submission using the configured field titles. Fields the
    /// response does not carry read as empty strings.
    pub fn to_submission(&self, config: &FormConfig) -> Submission {
        Submission {
            tape: self.answer(&config.tape_field),
            decoder: self.answer(&config.decoder_field),
            faction: self.answer(&config.faction_field),
            email: self.answer(&config.email_field),
        }
    }
}

/// In-memory form for tests and offline wiring.
pub struct MemoryForm {
    fields: Vec<FormField>,
    choices: RwLock<Vec<(String, Vec<String>)>>,
}

impl MemoryForm {
    pub fn new(fields: Vec<FormField>) -> Self {
        Self {
            fields,
            choices: RwLock::new(Vec::new()),
        }
    }

    /// A form with the four standard fields for the given config.
    pub fn standard(config: &FormConfig) -> Self {
        Self::new(vec![
            FormField {
                title: config.tape_field.clone(),
                kind: FieldKind::List,
            },
            FormField {
                title: config.decoder_field.clone(),
                kind: FieldKind::List,
            },
            FormField {
                title: config.email_field.clone(),
                kind: FieldKind::Text,
            },
            FormField {
                title: config.faction_field.clone(),
                kind: FieldKind::Text,
            },
        ])
    }

    /// Current choices of a list field, if any have been set.
    pub async fn list_choices(&self, title: &str) -> Option<Vec<String>> {
        let choices = self.choices.read().await;
        choices
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, c)| c.clone())
    }
}

#[async_trait]
impl FormBackend for MemoryForm {
    async fn fields(&self) -> Vec<FormField> {
        self.fields.clone()
    }

    async fn set_list_choices(&self, title: &str, new: Vec<String>) -> Result<(), FormError> {
        let is_list = self
            .fields
            .iter()
            .any(|f| f.kind == FieldKind::List && f.title == title);
        if !is_list {
            return Err(FormError::FieldNotFound {
                title: title.to_string(),
                kind: FieldKind::List,
            });
        }
        let mut choices = self.choices.write().await;
        if let Some(slot) = choices.iter_mut().find(|(t, _)| t == title) {
            slot.1 = new;
        } else {
            choices.push((title.to_string(), new));
        }
        Ok(())
    }
}
