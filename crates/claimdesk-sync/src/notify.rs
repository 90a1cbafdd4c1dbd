//! Duplicate-claim notices and the delivery seam.

use async_trait::async_trait;
use claimdesk_core::{ClaimRecord, Submission};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notice has no recipient")]
    NoRecipient,
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// A plain-text message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers notices. Delivery failures are the implementation's to
/// report; nothing here retries.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError>;
}

/// The notice sent to a submitter whose (tape, decoder) combination was
/// already claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateNotice {
    pub faction: String,
    pub email: String,
    pub tape: String,
    pub decoder: String,
}

impl DuplicateNotice {
    pub fn new(submission: &Submission, prior: &ClaimRecord) -> Self {
        Self {
            faction: submission.faction.clone(),
            email: submission.email.clone(),
            tape: prior.tape.clone(),
            decoder: prior.decoder.clone(),
        }
    }

    /// Render as a deliverable notice.
    pub fn to_notice(&self) -> Notice {
        Notice {
            to: self.email.clone(),
            subject: format!("Duplicate claim: {} + {}", self.tape, self.decoder),
            body: format!(
                "Hello {},\n\n\
                 The combination you submitted has already been claimed:\n\n\
                 Data Tape: {}\n\
                 Decoder: {}\n\n\
                 Please pick a different combination and submit again.\n",
                self.faction, self.tape, self.decoder
            ),
        }
    }
}

/// Notifier that records everything it is asked to send.
#[derive(Default)]
pub struct MemoryNotifier {
    sent: RwLock<Vec<Notice>>,
}

impl MemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notice> {
        self.sent.read().await.clone()
    }
}

#[async_trait]
impl Notifier for MemoryNotifier {
    async fn send(&self, notice: &Notice) -> Result<(), NotifyError> {
        if notice.to.is_empty() {
            return Err(NotifyError::NoRecipient);
        }
        info!(to = %notice.to, subject = %notice.subject, "recorded notice");
        let mut sent = self.sent.write().await;
        sent.push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn notice() -> DuplicateNotice {
        let submission = Submission {
            tape: "T-01".into(),
            decoder: "D-07".into(),
            faction: "Owls".into(),
            email: "owls@example.org".into(),
        };
        let prior = ClaimRecord {
            tape: "T-01".into(),
            decoder: "D-07".into(),
            faction: "Ravens".into(),
            claimed_at: Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0).unwrap(),
        };
        DuplicateNotice::new(&submission, &prior)
    }

    #[test]
    fn body_names_faction_tape_and_decoder() {
        let rendered = notice().to_notice();
        assert_eq!(rendered.to, "owls@example.org");
        assert!(rendered.body.contains("Owls"));
        assert!(rendered.body.contains("Data Tape: T-01"));
        assert!(rendered.body.contains("Decoder: D-07"));
    }

    #[tokio::test]
    async fn memory_notifier_records_sends() {
        let notifier = MemoryNotifier::new();
        notifier.send(&notice().to_notice()).await.unwrap();
        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "owls@example.org");
    }

    #[tokio::test]
    async fn empty_recipient_is_rejected() {
        let notifier = MemoryNotifier::new();
        let mut n = notice().to_notice();
        n.to.clear();
        assert_eq!(notifier.send(&n).await, Err(NotifyError::NoRecipient));
        assert!(notifier.sent().await.is_empty());
    }
}
