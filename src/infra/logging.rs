//! Structured logging setup.
//!
//! JSON output in production, human-readable output everywhere else.
//! Verbosity comes from `RUST_LOG`.

use std::env;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const DEFAULT_FILTER: &str = "stock_manager=info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `LOG_FORMAT` wins; otherwise JSON when `ENVIRONMENT` is production.
    pub fn from_env() -> Self {
        Self::resolve(
            env::var("LOG_FORMAT").ok().as_deref(),
            env::var("ENVIRONMENT").ok().as_deref(),
        )
    }

    fn resolve(format: Option<&str>, environment: Option<&str>) -> Self {
        match format.map(|f| f.trim().to_ascii_lowercase()).as_deref() {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ => match environment {
                Some("production") | Some("prod") => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
        }
    }
}

/// Installs the global subscriber. Calling it again is a no-op, so tests
/// and binaries can both call it.
pub fn init() {
    init_with(LogFormat::from_env());
}

pub fn init_with(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let layer = match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Pretty => fmt::layer().with_target(true).boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init();
}
