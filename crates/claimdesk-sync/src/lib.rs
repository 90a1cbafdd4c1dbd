//! Outbound integrations: form choice sync, inventory feed, notifications.

pub mod form;
pub use form::{FieldKind, FormBackend, FormError, FormField, FormResponse, MemoryForm, sync_choices};

pub mod http;
pub use http::{FeedClient, SyncError};

pub mod notify;
pub use notify::{DuplicateNotice, MemoryNotifier, Notice, Notifier, NotifyError};
