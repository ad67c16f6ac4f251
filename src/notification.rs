use crate::domain::{CONFIRMATION_SUBJECT, ConfirmationEmail};
use crate::email_client::EmailSender;
use crate::telemetry::{DetachedTask, spawn_detached_in_span};
use std::sync::Arc;

pub struct ApplicationBaseUrl(pub String);

/// Sends the waitlist confirmation email. Delivery is best effort: failures
/// are logged and go no further.
#[derive(Clone)]
pub struct WaitlistNotifier {
    email_client: Arc<dyn EmailSender>,
    base_url: Arc<str>,
}

impl WaitlistNotifier {
    pub fn new(email_client: Arc<dyn EmailSender>, base_url: ApplicationBaseUrl) -> Self {
        Self {
            email_client,
            base_url: base_url.0.into(),
        }
    }

    pub fn dispatch_detached(&self, name: Option<String>, email: Option<String>) -> DetachedTask {
        let notifier = self.clone();
        spawn_detached_in_span(async move {
            notifier.notify(name.as_deref(), email.as_deref()).await;
        })
    }

    #[tracing::instrument(
        name = "Send a waitlist confirmation email",
        skip_all,
        fields(recipient_email = ?email, recipient_name = ?name)
    )]
    pub async fn notify(&self, name: Option<&str>, email: Option<&str>) {
        let Some(email) = email else {
            tracing::warn!("Skipping the confirmation email, the entry has no address");
            return;
        };
        let message = ConfirmationEmail::render(name, &self.base_url);
        match self
            .email_client
            .send_email(
                email,
                CONFIRMATION_SUBJECT,
                &message.html_body,
                &message.text_body,
            )
            .await
        {
            Ok(()) => tracing::info!("Confirmation email sent"),
            Err(e) => tracing::warn!(
                error.cause_chain = ?e,
                "Failed to send the confirmation email"
            ),
        }
    }
}
