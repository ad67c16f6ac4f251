use crate::configuration::{EmailClientSettings, SmtpTls};
use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use secrecy::ExposeSecret;

#[derive(thiserror::Error, Debug)]
pub enum NotificationError {
    #[error("invalid email address: {0}")]
    InvalidAddress(#[from] lettre::address::AddressError),
    #[error("failed to build the message")]
    Build(#[from] lettre::error::Error),
    #[error("SMTP error")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Anything able to deliver a rendered email to a single recipient.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), NotificationError>;
}

pub struct SmtpEmailClient {
    sender: Mailbox,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpEmailClient {
    pub fn new(
        settings: &EmailClientSettings,
        sender: Mailbox,
    ) -> Result<SmtpEmailClient, NotificationError> {
        let builder = match settings.tls {
            SmtpTls::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            }
            SmtpTls::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(&settings.host)?,
            SmtpTls::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&settings.host)
            }
        };
        let mut builder = builder
            .port(settings.port)
            .timeout(Some(settings.timeout()));
        if let Some((user, password)) = settings.credentials() {
            builder = builder.credentials(Credentials::new(
                user,
                password.expose_secret().to_string(),
            ));
        }

        Ok(SmtpEmailClient {
            sender,
            transport: builder.build(),
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailClient {
    #[tracing::instrument(name = "Sending an email over SMTP", skip_all)]
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), NotificationError> {
        let message = build_message(
            &self.sender,
            recipient,
            subject,
            html_content,
            text_content,
        )?;
        self.transport.send(message).await?;
        Ok(())
    }
}

pub fn build_message(
    sender: &Mailbox,
    recipient: &str,
    subject: &str,
    html_content: &str,
    text_content: &str,
) -> Result<Message, NotificationError> {
    let recipient: Mailbox = recipient.parse()?;
    let message = Message::builder()
        .from(sender.clone())
        .to(recipient)
        .subject(subject)
        .multipart(MultiPart::alternative_plain_html(
            text_content.to_string(),
            html_content.to_string(),
        ))?;
    Ok(message)
}
