use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_error::ErrorLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::config::{Logging, LoggingStyle};

#[derive(Debug, Error)]
#[error("Failed to initialize tracing")]
pub struct TracingInitError;

pub fn init(config: &Logging) -> Result<(), TracingInitError> {
    let console = match config.style {
        LoggingStyle::Compact => fmt::layer().compact().boxed(),
        LoggingStyle::Full => fmt::layer().boxed(),
        LoggingStyle::Json => fmt::layer().json().boxed(),
    };

    tracing_subscriber::registry()
        .with(make_env_filter(config.targets.as_deref()))
        .with(console)
        .with(ErrorLayer::default())
        .try_init()
        .change_context(TracingInitError)
        .attach_printable("already initialized tracing")?;

    if std::env::var("RUST_LOG").is_ok() && config.targets.is_some() {
        tracing::warn!(
            "Both `RUST_LOG` and `VENUEHUB_LOGGING_TARGETS` are set, `RUST_LOG` takes precedence"
        );
    }

    Ok(())
}

/// Installs a test writer subscriber. Calling it more than once is fine.
pub fn init_for_tests() {
    tracing_subscriber::registry()
        .with(make_env_filter(None))
        .with(fmt::layer().with_test_writer())
        .with(ErrorLayer::default())
        .try_init()
        .ok();
}

fn make_env_filter(targets: Option<&str>) -> EnvFilter {
    let default_level = if cfg!(debug_assertions) {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };

    let targets = std::env::var("RUST_LOG")
        .ok()
        .or_else(|| targets.map(str::to_string))
        .unwrap_or_default();

    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(targets)
}
