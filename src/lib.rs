pub mod akismet;
pub mod classifier;
pub mod config;
pub mod domain;
pub mod filters;
pub mod infrastructure;
pub mod rules;

pub use classifier::{ClassifierOptions, SpamClassifier};
pub use config::FormConfig;
pub use domain::{FieldValue, FormSubmission, RawParams, Submission, TriggeredFilter, Verdict};
pub use filters::{OracleError, ReputationOracle};
pub use rules::{KeywordRuleEngine, RuleSpec};
