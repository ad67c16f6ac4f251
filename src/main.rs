use anyhow::Context;
use waitlist::configuration::get_configuration;
use waitlist::startup::Application;
use waitlist::telemetry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::get_subscriber("info".to_string(), std::io::stdout);
    telemetry::init_subscriber(subscriber);

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let application = Application::build(configuration)?;
    tracing::info!(port = application.port(), "Waitlist service listening");
    application.run_until_stop().await?;
    Ok(())
}
