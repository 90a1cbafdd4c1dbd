//! Submission orchestration: one handler invocation per form response.
//!
//! Each response runs to completion before the next is processed. The
//! flow is record → duplicate check → notify, with an optional claims
//! variant that also marks the inventory rows and re-syncs the form
//! dropdowns. Failures after the log append are not rolled back.

use chrono::{DateTime, Utc};
use claimdesk_core::{ClaimRecord, FormConfig, SchemaError, StoreConfig, Submission, TableSchema};
use claimdesk_store::{
    ClaimRecorder, DuplicateDetector, StoreError, TableStore, available_names, mark_claimed,
};
use claimdesk_sync::{
    DuplicateNotice, FormBackend, FormError, FormResponse, Notifier, NotifyError, sync_choices,
};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("handler used before setup")]
    NotSetUp,
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Form(#[from] FormError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// The two observed intake variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerOptions {
    /// When set, a handled submission also writes the claimant into both
    /// inventory rows and re-syncs the form choices, so claimed items
    /// stop being offered. When clear, claims are only logged and
    /// duplicate notices sent.
    pub mark_claimed: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self { mark_claimed: true }
    }
}

/// Terminal state of one handled submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No notice went out — either the combination was fresh, or it was a
    /// duplicate but the submitter left no email address.
    Done { duplicate: Option<ClaimRecord> },
    /// Duplicate combination; the submitter was notified.
    Notified { prior: ClaimRecord },
}

/// Validated table schemas, derived once during setup.
struct Schemas {
    tapes: TableSchema,
    decoders: TableSchema,
}

/// Orchestrates intake against an injected store, form, and notifier.
pub struct SubmissionHandler<S, F, N> {
    store_cfg: StoreConfig,
    form_cfg: FormConfig,
    options: HandlerOptions,
    store: S,
    form: F,
    notifier: N,
    recorder: ClaimRecorder,
    detector: DuplicateDetector,
    schemas: Option<Schemas>,
}

impl<S, F, N> SubmissionHandler<S, F, N>
where
    S: TableStore,
    F: FormBackend,
    N: Notifier,
{
    pub fn new(
        store_cfg: StoreConfig,
        form_cfg: FormConfig,
        options: HandlerOptions,
        store: S,
        form: F,
        notifier: N,
    ) -> Self {
        let recorder = ClaimRecorder::new(&store_cfg, &form_cfg);
        Self {
            store_cfg,
            form_cfg,
            options,
            store,
            form,
            notifier,
            recorder,
            detector: DuplicateDetector::new(),
            schemas: None,
        }
    }

    /// One-time setup: validate the inventory schemas, push the available
    /// names into the form dropdowns, and rebuild the duplicate index
    /// from any existing claim log.
    pub async fn setup(&mut self) -> Result<(), HandlerError> {
        let tapes_table = self.store.read_table(&self.store_cfg.tapes_table).await?;
        let decoders_table = self
            .store
            .read_table(&self.store_cfg.decoders_table)
            .await?;
        let schemas = Schemas {
            tapes: TableSchema::detect(
                &self.store_cfg.tapes_table,
                &tapes_table.header,
                &self.store_cfg.tape_marker,
            )?,
            decoders: TableSchema::detect(
                &self.store_cfg.decoders_table,
                &decoders_table.header,
                &self.store_cfg.decoder_marker,
            )?,
        };

        sync_choices(
            &self.form,
            &self.form_cfg,
            available_names(&tapes_table, &schemas.tapes),
            available_names(&decoders_table, &schemas.decoders),
        )
        .await?;

        match self.store.read_table(&self.store_cfg.claims_table).await {
            Ok(log) => self.detector.load(&log),
            Err(StoreError::TableNotFound(_)) => {
                info!("no claim log yet, starting with an empty duplicate index");
            }
            Err(err) => return Err(err.into()),
        }

        self.schemas = Some(schemas);
        info!("setup complete");
        Ok(())
    }

    /// Handle one form response at the current time.
    pub async fn handle(&mut self, response: &FormResponse) -> Result<Outcome, HandlerError> {
        self.handle_at(response, Utc::now()).await
    }

    /// Handle one form response with an explicit submission time.
    pub async fn handle_at(
        &mut self,
        response: &FormResponse,
        at: DateTime<Utc>,
    ) -> Result<Outcome, HandlerError> {
        if self.schemas.is_none() {
            return Err(HandlerError::NotSetUp);
        }

        let submission = response.to_submission(&self.form_cfg);
        info!(
            tape = %submission.tape,
            decoder = %submission.decoder,
            faction = %submission.faction,
            "new submission"
        );

        // Recorded. From here on, nothing rolls this row back.
        self.recorder.record(&self.store, &submission, at).await?;

        // Checked.
        let duplicate = self.detector.observe(&submission, at);

        // Notified, unless there is nobody to notify.
        let outcome = match duplicate {
            Some(prior) if !submission.email.is_empty() => {
                let notice = DuplicateNotice::new(&submission, &prior).to_notice();
                self.notifier.send(&notice).await?;
                info!(to = %notice.to, "duplicate notice sent");
                Outcome::Notified { prior }
            }
            Some(prior) => {
                info!("duplicate found but submission has no email, skipping notice");
                Outcome::Done {
                    duplicate: Some(prior),
                }
            }
            None => Outcome::Done { duplicate: None },
        };

        if self.options.mark_claimed {
            self.mark_and_resync(&submission).await?;
        }

        Ok(outcome)
    }

    /// Claims variant: write the claimant into both inventory rows
    /// (lookup misses are logged and skipped), then re-sync the form so
    /// claimed items disappear from the dropdowns.
    async fn mark_and_resync(&self, submission: &Submission) -> Result<(), HandlerError> {
        let schemas = self.schemas.as_ref().ok_or(HandlerError::NotSetUp)?;

        mark_claimed(
            &self.store,
            &self.store_cfg.tapes_table,
            &schemas.tapes,
            &submission.tape,
            &submission.faction,
        )
        .await?;
        mark_claimed(
            &self.store,
            &self.store_cfg.decoders_table,
            &schemas.decoders,
            &submission.decoder,
            &submission.faction,
        )
        .await?;

        let tapes_table = self.store.read_table(&self.store_cfg.tapes_table).await?;
        let decoders_table = self
            .store
            .read_table(&self.store_cfg.decoders_table)
            .await?;
        sync_choices(
            &self.form,
            &self.form_cfg,
            available_names(&tapes_table, &schemas.tapes),
            available_names(&decoders_table, &schemas.decoders),
        )
        .await?;
        Ok(())
    }

    /// Top-level event boundary: handle the response, log any failure,
    /// and swallow it. No retry — the submission stays recorded if the
    /// append succeeded before the failure.
    pub async fn handle_event(&mut self, response: &FormResponse) {
        match self.handle(response).await {
            Ok(Outcome::Notified { prior }) => {
                info!(prior_faction = %prior.faction, "submission handled, duplicate notified");
            }
            Ok(Outcome::Done { duplicate }) => {
                info!(duplicate = duplicate.is_some(), "submission handled");
            }
            Err(err) => {
                error!(error = %err, "submission handling failed");
            }
        }
    }
}
