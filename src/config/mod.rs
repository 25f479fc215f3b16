pub mod env;
pub mod form;
mod loader;

pub use env::{AkismetConfig, AppConfig, ConfigError, LoggingConfig};
pub use form::{FormConfig, ReputationConfig};
pub use loader::{load_config, load_form_config};
