use std::{path::PathBuf, time::Duration};

use thiserror::Error;
use url::Url;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub form_config_path: PathBuf,
    pub debug: bool,
    pub akismet: AkismetConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct AkismetConfig {
    pub api_key: Option<String>,
    pub blog_url: Option<Url>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub logs_dir: Option<PathBuf>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("failed to read form configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed form configuration {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
