//! Logging setup
//!
//! Console output (pretty or JSON) plus optional daily rotating files for
//! UI shells that want a local diagnostic trail of subscription and store
//! failures.

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, prelude::*};

use crate::ClientConfig;

/// Initialize logging
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug"); `RUST_LOG` wins when set
/// * `json_format` - JSON console output
/// * `log_dir` - Optional directory for daily rotating `client` log files
///
/// # Examples
/// ```no_run
/// bistro_client::logger::init_logger("debug", false, None)?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn init_logger(level: &str, json_format: bool, log_dir: Option<&str>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let file_layer = match log_dir {
        Some(dir) => {
            let log_dir = Path::new(dir);
            fs::create_dir_all(log_dir)?;
            let appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "client");
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_ansi(false)
                    .with_writer(std::sync::Mutex::new(appender))
                    .boxed(),
            )
        }
        None => None,
    };

    subscriber
        .with(console_layer)
        .with(file_layer)
        .try_init()?;
    Ok(())
}

/// Initialize logging from a [`ClientConfig`]
pub fn init_from_config(config: &ClientConfig) -> anyhow::Result<()> {
    init_logger(&config.log_level, config.log_json, config.log_dir.as_deref())
}
