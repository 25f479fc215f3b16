use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::{FieldValue, FormSubmission};

pub const DEBUG_SPAM_MESSAGE: &str = "Spam filter has been triggered";
pub const GENERIC_SPAM_MESSAGE: &str = "Unable to process form submission";

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("reputation service request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("reputation service rejected the API key")]
    InvalidKey,
    #[error("unexpected reputation service response {body:?}")]
    UnexpectedResponse {
        body: String,
        debug_help: Option<String>,
    },
    #[error("reputation service did not answer within {0:?}")]
    Timeout(Duration),
    #[error("no reputation service is configured")]
    Unavailable,
}

#[allow(async_fn_in_trait)]
pub trait ReputationOracle {
    async fn is_spam(&self, author: &str, email: &str, content: &str) -> Result<bool, OracleError>;
}

impl<O: ReputationOracle> ReputationOracle for Option<O> {
    async fn is_spam(&self, author: &str, email: &str, content: &str) -> Result<bool, OracleError> {
        match self {
            Some(oracle) => oracle.is_spam(author, email, content).await,
            None => Err(OracleError::Unavailable),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReputationSelectors {
    pub author_field: String,
    pub email_field: String,
    pub content_field: String,
}

impl ReputationSelectors {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.split(',').map(|part| part.trim().to_string());
        Self {
            author_field: parts.next().unwrap_or_default(),
            email_field: parts.next().unwrap_or_default(),
            content_field: parts.next().unwrap_or_default(),
        }
    }
}

pub struct ReputationFilter<'a, O> {
    oracle: &'a O,
    timeout: Duration,
    debug: bool,
}

impl<'a, O> ReputationFilter<'a, O>
where
    O: ReputationOracle,
{
    pub fn new(oracle: &'a O, timeout: Duration, debug: bool) -> Self {
        Self {
            oracle,
            timeout,
            debug,
        }
    }

    /// Returns `true` only on an explicit spam answer, in which case a
    /// form-level error is attached.
    pub async fn evaluate<S>(&self, submission: &mut S, selectors: &ReputationSelectors) -> bool
    where
        S: FormSubmission + ?Sized,
    {
        let author = declared_value(submission, &selectors.author_field);
        let email = declared_value(submission, &selectors.email_field);
        let content = declared_value(submission, &selectors.content_field);

        let outcome = tokio::time::timeout(
            self.timeout,
            self.oracle.is_spam(&author, &email, &content),
        )
        .await
        .unwrap_or_else(|_| Err(OracleError::Timeout(self.timeout)));

        match outcome {
            Ok(true) => {
                info!(target: "akismet", "reputation service flagged submission as spam");
                let message = if self.debug {
                    DEBUG_SPAM_MESSAGE
                } else {
                    GENERIC_SPAM_MESSAGE
                };
                submission.add_error(message);
                true
            }
            Ok(false) => {
                debug!(target: "akismet", "reputation service accepted submission");
                false
            }
            Err(err) => {
                warn!(
                    target: "akismet",
                    error = %err,
                    "reputation check failed; treating submission as not spam"
                );
                false
            }
        }
    }
}

fn declared_value<S>(submission: &S, name: &str) -> String
where
    S: FormSubmission + ?Sized,
{
    if name.is_empty() {
        return String::new();
    }
    match submission.field_value(name) {
        Some(FieldValue::Scalar(value)) => value.clone(),
        Some(FieldValue::Multi(values)) => values.join("\n"),
        None => String::new(),
    }
}
