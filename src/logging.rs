//! Diagnostic output setup.
//!
//! Library code only emits `tracing` events. Binaries that want to see them
//! call [`init`] once at startup, or install their own subscriber.

use crate::config::LoggingConfig;
use crate::error::{PushqError, PushqResult};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Install a global fmt subscriber built from `config`.
///
/// `RUST_LOG` takes precedence over `config.level` when set. Fails if a
/// global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> PushqResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from_level(config.level.into()).into())
    });

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.include_targets);

    let result = if config.json_format {
        builder.json().try_init()
    } else {
        builder.with_ansi(config.colored).try_init()
    };

    result.map_err(|e| PushqError::Logging {
        message: e.to_string(),
    })
}
