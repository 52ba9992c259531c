//! Logging setup for the application.

use crate::config::{AppConfig, GlobalLogLevel};
use env_logger::{Builder, Env};
use log::LevelFilter;

impl From<GlobalLogLevel> for LevelFilter {
    fn from(level: GlobalLogLevel) -> Self {
        match level {
            GlobalLogLevel::Trace => Self::Trace,
            GlobalLogLevel::Debug => Self::Debug,
            GlobalLogLevel::Info => Self::Info,
            GlobalLogLevel::Warn => Self::Warn,
            GlobalLogLevel::Error => Self::Error,
        }
    }
}

/// Initializes the logger from the application settings.
///
/// When `RUST_LOG` is set it decides every filter, so single modules such as
/// `tile_core::runner` can be traced. Otherwise `config.log_level` applies to
/// everything.
pub fn init_logger(config: &AppConfig) {
    let env = Env::default().filter("RUST_LOG");
    let mut builder = Builder::from_env(env);

    if std::env::var_os("RUST_LOG").is_none() {
        builder.filter_level(config.log_level.into());
    }

    // A second initialization (e.g. from tests) keeps the first logger.
    if builder.try_init().is_err() {
        return;
    }

    log::debug!("Logger initialized with global log level: {:?}", config.log_level);
}
