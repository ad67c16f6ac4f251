use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use waitlist::configuration::ApplicationSettings;
use waitlist::email_client::{EmailSender, NotificationError};
use waitlist::startup::Application;
use waitlist::store::{InMemoryWaitlistStore, WaitlistStore};
use waitlist::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub recipient: String,
    pub subject: String,
    pub html_body: String,
    pub text_body: String,
}

#[derive(Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<SentEmail>>,
}

impl RecordingEmailSender {
    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send_email(
        &self,
        recipient: &str,
        subject: &str,
        html_content: &str,
        text_content: &str,
    ) -> Result<(), NotificationError> {
        self.sent.lock().unwrap().push(SentEmail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            html_body: html_content.to_string(),
            text_body: text_content.to_string(),
        });
        Ok(())
    }
}

pub struct FailingEmailSender;

#[async_trait]
impl EmailSender for FailingEmailSender {
    async fn send_email(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_content: &str,
        _text_content: &str,
    ) -> Result<(), NotificationError> {
        Err("undeliverable".parse::<lettre::Address>().unwrap_err().into())
    }
}

/// Never completes a send until `release` is notified.
#[derive(Default)]
pub struct StalledEmailSender {
    pub release: Notify,
}

#[async_trait]
impl EmailSender for StalledEmailSender {
    async fn send_email(
        &self,
        _recipient: &str,
        _subject: &str,
        _html_content: &str,
        _text_content: &str,
    ) -> Result<(), NotificationError> {
        self.release.notified().await;
        Ok(())
    }
}

pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_waitlist(&self, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(format!("{}/waitlist", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_waitlist_raw(&self, body: &'static str) -> reqwest::Response {
        self.api_client
            .post(format!("{}/waitlist", &self.address))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

fn test_settings() -> ApplicationSettings {
    ApplicationSettings {
        host: "127.0.0.1".to_string(),
        port: 0,
        base_url: "https://workdistroapp.com".to_string(),
    }
}

pub async fn spawn_app() -> (TestApp, Arc<InMemoryWaitlistStore>, Arc<RecordingEmailSender>) {
    let store = Arc::new(InMemoryWaitlistStore::new());
    let email_sender = Arc::new(RecordingEmailSender::default());
    let app = spawn_app_with(store.clone(), email_sender.clone()).await;
    (app, store, email_sender)
}

pub async fn spawn_app_with(
    store: Arc<dyn WaitlistStore>,
    email_sender: Arc<dyn EmailSender>,
) -> TestApp {
    Lazy::force(&TRACING);

    let application = Application::build_with(test_settings(), store, email_sender)
        .expect("Failed to build application.");
    let port = application.port();
    let _ = actix_web::rt::spawn(application.run_until_stop());

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        api_client: reqwest::Client::new(),
    }
}

/// Polls until `count` emails went out, the sends run detached from the request.
pub async fn wait_for_emails(sender: &RecordingEmailSender, count: usize) -> Vec<SentEmail> {
    for _ in 0..100 {
        let sent = sender.sent();
        if sent.len() >= count {
            return sent;
        }
        actix_web::rt::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "Expected {} emails, {} were sent",
        count,
        sender.sent().len()
    );
}
