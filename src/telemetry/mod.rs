//! Logging setup and span helpers.

use std::future::Future;

use tracing::Instrument;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{Config, LogFormat};

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
pub fn init(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Run `fut` inside a span named after the operation.
pub async fn traced<F, T>(operation: &'static str, fut: F) -> T
where
    F: Future<Output = T>,
{
    fut.instrument(tracing::info_span!("op", name = operation))
        .await
}

/// Synchronous counterpart of [`traced`].
pub fn traced_sync<F, T>(operation: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let _span = tracing::info_span!("op", name = operation).entered();
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_traced_passes_output_through() {
        let value = traced("answer", async { 41 + 1 }).await;
        assert_eq!(value, 42);
    }

    #[test]
    fn test_traced_sync_passes_output_through() {
        let value: Result<&str, ()> = traced_sync("greet", || Ok("hi"));
        assert_eq!(value, Ok("hi"));
    }
}
