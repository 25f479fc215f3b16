use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use url::Url;

use super::env::{AkismetConfig, AppConfig, ConfigError, LoggingConfig};
use super::form::FormConfig;

pub fn load_config() -> Result<AppConfig, ConfigError> {
    AppConfig::from_env()
}

pub fn load_form_config(path: &Path) -> Result<FormConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(target: "config", path = %path.display(), "form configuration loaded");
    Ok(config)
}

impl AppConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let form_config_path = env::var("FORM_CONFIG")
            .unwrap_or_else(|_| "form.json".to_string())
            .into();

        let debug = match env::var("FORM_DEBUG") {
            Ok(value) => parse_flag("FORM_DEBUG", &value)?,
            Err(_) => false,
        };

        let blog_url = match env::var("AKISMET_BLOG_URL").ok().filter(|v| !v.is_empty()) {
            Some(value) => Some(Url::parse(&value).map_err(|_| ConfigError::Invalid {
                key: "AKISMET_BLOG_URL",
                value,
            })?),
            None => None,
        };

        let akismet = AkismetConfig {
            api_key: env::var("AKISMET_API_KEY").ok().filter(|v| !v.is_empty()),
            blog_url,
            timeout: Duration::from_millis(
                env::var("AKISMET_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(5_000),
            ),
        };

        let logging = LoggingConfig {
            level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            logs_dir: logs_dir(env::var("LOGS_DIR").ok()),
        };

        Ok(Self {
            form_config_path,
            debug,
            akismet,
            logging,
        })
    }
}

// unset means "logs"; set but empty turns the log file off
fn logs_dir(value: Option<String>) -> Option<PathBuf> {
    match value {
        None => Some(PathBuf::from("logs")),
        Some(dir) if dir.trim().is_empty() => None,
        Some(dir) => Some(PathBuf::from(dir)),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid {
            key,
            value: value.to_string(),
        }),
    }
}
