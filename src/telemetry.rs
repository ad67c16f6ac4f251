use std::future::Future;
use tokio::task::JoinHandle;
use tracing::{Instrument, Subscriber};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Composes the layers into a subscriber. `RUST_LOG` wins over `env_filter`.
pub fn get_subscriber<Sink>(
    env_filter: String,
    sink: Sink,
) -> impl Subscriber + Send + Sync + 'static
where
    Sink: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(env_filter));
    let formatting_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(false)
        .with_writer(sink);
    tracing_subscriber::registry()
        .with(env_filter)
        .with(formatting_layer)
}

/// Registers the subscriber as global default and redirects `log` records to it.
/// Must be called once.
pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync + 'static) {
    subscriber.init();
}

/// Handle on a unit of work whose outcome the spawner does not wait for.
///
/// Dropping it detaches the task, it keeps running to completion.
#[derive(Debug)]
#[must_use = "drop the handle explicitly to make the detachment visible"]
pub struct DetachedTask(JoinHandle<()>);

impl DetachedTask {
    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    /// Waits for the task. Panics inside it are swallowed like any other failure.
    pub async fn join(self) {
        if let Err(e) = self.0.await {
            tracing::warn!(error = %e, "A detached task did not run to completion");
        }
    }
}

/// Spawns `future` on the runtime, carrying the current span along.
pub fn spawn_detached_in_span<F>(future: F) -> DetachedTask
where
    F: Future<Output = ()> + Send + 'static,
{
    let current_span = tracing::Span::current();
    DetachedTask(tokio::spawn(future.instrument(current_span)))
}
