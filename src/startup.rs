use crate::configuration::{ApplicationSettings, Settings};
use crate::email_client::{EmailSender, SmtpEmailClient};
use crate::notification::{ApplicationBaseUrl, WaitlistNotifier};
use crate::routes;
use crate::store::{PostgresWaitlistStore, WaitlistStore, get_connection_pool};
use crate::submission::WaitlistService;
use actix_web::{App, HttpServer, dev::Server, web};
use anyhow::Context;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    /// Wires the PostgreSQL store and the SMTP client described by `configuration`.
    pub fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database)?;
        let store = Arc::new(PostgresWaitlistStore::new(connection_pool));

        let sender = configuration.email_client.sender()?;
        let email_client = SmtpEmailClient::new(&configuration.email_client, sender)
            .context("Failed to build the SMTP client")?;

        Self::build_with(configuration.application, store, Arc::new(email_client))
    }

    pub fn build_with(
        configuration: ApplicationSettings,
        store: Arc<dyn WaitlistStore>,
        email_client: Arc<dyn EmailSender>,
    ) -> Result<Self, anyhow::Error> {
        let address = format!("{}:{}", configuration.host, configuration.port);
        let listener =
            TcpListener::bind(&address).with_context(|| format!("Failed to bind {address}"))?;
        let port = listener.local_addr()?.port();

        let notifier =
            WaitlistNotifier::new(email_client, ApplicationBaseUrl(configuration.base_url));
        let service = WaitlistService::new(store, notifier);
        let server = run(listener, service)?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stop(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, service: WaitlistService) -> Result<Server, std::io::Error> {
    let service = web::Data::new(service);
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(routes::json_config())
            .service(routes::health_check)
            .service(routes::join_waitlist)
            .app_data(service.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
