use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;

const LOG_FILE_PREFIX: &str = "formguard.log";

static INIT: OnceCell<()> = OnceCell::new();
static GUARD: OnceCell<tracing_appender::non_blocking::WorkerGuard> = OnceCell::new();

pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    INIT.get_or_try_init::<_, anyhow::Error>(|| {
        let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        let env_filter = build_filter(rust_log.as_deref(), &config.level);

        // stdout carries the verdict JSON
        let console_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(true)
            .with_ansi(true);

        let file_layer = match &config.logs_dir {
            Some(dir) => {
                prepare_logs_dir(dir)?;
                let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let _ = GUARD.set(guard);
                Some(
                    fmt::layer()
                        .with_writer(writer)
                        .with_target(true)
                        .with_ansi(false),
                )
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()?;

        match &config.logs_dir {
            Some(dir) => tracing::debug!(logs = %dir.display(), "tracing initialized"),
            None => tracing::debug!("tracing initialized without a log file"),
        }
        Ok(())
    })?;
    Ok(())
}

// RUST_LOG wins over LOG_LEVEL; anything unparsable falls back to info.
fn build_filter(rust_log: Option<&str>, level: &str) -> EnvFilter {
    rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn prepare_logs_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    let metadata = fs::metadata(dir)
        .with_context(|| format!("failed to inspect log directory {}", dir.display()))?;
    anyhow::ensure!(
        !metadata.permissions().readonly(),
        "log directory {} is read-only",
        dir.display()
    );
    Ok(())
}
