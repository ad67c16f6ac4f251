use crate::domain::WaitlistEntry;
use crate::notification::WaitlistNotifier;
use crate::store::{StoreError, WaitlistStore};
use crate::telemetry::DetachedTask;
use crate::utils::error_chain_fmt;
use std::sync::Arc;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "This email is already on the waitlist.";
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

#[derive(thiserror::Error)]
pub enum SubmissionError {
    #[error("{}", DUPLICATE_EMAIL_MESSAGE)]
    DuplicateEmail,
    #[error("{0}")]
    PersistenceError(String),
    #[error("{}", SERVER_ERROR_MESSAGE)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubmissionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl From<StoreError> for SubmissionError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::DuplicateEmail => Self::DuplicateEmail,
            StoreError::Rejected(message) => Self::PersistenceError(message),
            StoreError::Unavailable(e) => Self::UnexpectedError(e),
        }
    }
}

/// Stores waitlist entries and triggers their confirmation email.
pub struct WaitlistService {
    store: Arc<dyn WaitlistStore>,
    notifier: WaitlistNotifier,
}

impl WaitlistService {
    pub fn new(store: Arc<dyn WaitlistStore>, notifier: WaitlistNotifier) -> Self {
        Self { store, notifier }
    }

    /// Persists `entry`, then hands the confirmation email to a detached task.
    ///
    /// The outcome only reflects the insert. The returned handle may be dropped,
    /// the email goes out (or fails) on its own either way.
    #[tracing::instrument(
        name = "Adding a new waitlist entry",
        skip(self, entry),
        fields(
            waitlist_email = ?entry.email,
            waitlist_name = ?entry.name
        )
    )]
    pub async fn submit(&self, entry: &WaitlistEntry) -> Result<DetachedTask, SubmissionError> {
        self.store.insert(entry).await?;
        tracing::info!("New waitlist entry has been saved");
        Ok(self
            .notifier
            .dispatch_detached(entry.name.clone(), entry.email.clone()))
    }
}
