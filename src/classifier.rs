use std::time::Duration;

use tracing::{debug, info};

use crate::{
    config::FormConfig,
    domain::{FormSubmission, TriggeredFilter, Verdict},
    filters::{ReputationFilter, ReputationOracle, TuringTestFilter},
    rules::KeywordRuleEngine,
};

#[derive(Debug, Clone)]
pub struct ClassifierOptions {
    pub debug: bool,
    pub oracle_timeout: Duration,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            debug: false,
            oracle_timeout: Duration::from_secs(5),
        }
    }
}

pub struct SpamClassifier<O> {
    oracle: O,
    options: ClassifierOptions,
}

impl<O> SpamClassifier<O>
where
    O: ReputationOracle,
{
    pub fn new(oracle: O, options: ClassifierOptions) -> Self {
        Self { oracle, options }
    }

    pub async fn classify<S>(&self, submission: &mut S, config: &FormConfig) -> Verdict
    where
        S: FormSubmission + ?Sized,
    {
        let verdict = self.run_filters(submission, config).await;
        if verdict.is_spam {
            info!(
                target: "classifier",
                filter = %verdict.triggered_filter,
                "submission classified as spam"
            );
        } else {
            debug!(target: "classifier", "submission passed all filters");
        }
        verdict
    }

    async fn run_filters<S>(&self, submission: &mut S, config: &FormConfig) -> Verdict
    where
        S: FormSubmission + ?Sized,
    {
        if !config.turing_test.is_empty()
            && TuringTestFilter::evaluate(submission, &config.turing_test)
        {
            return Verdict::spam(TriggeredFilter::TuringTest);
        }

        if !config.spam_words.is_empty()
            && KeywordRuleEngine::evaluate(&*submission, &config.spam_words)
        {
            return Verdict::spam(TriggeredFilter::Keywords);
        }

        if let Some(reputation) = config.reputation() {
            if submission.error_count() > 0 {
                debug!(
                    target: "classifier",
                    errors = submission.error_count(),
                    "submission already invalid; skipping reputation check"
                );
            } else {
                let filter = ReputationFilter::new(
                    &self.oracle,
                    self.options.oracle_timeout,
                    self.options.debug,
                );
                if filter.evaluate(submission, &reputation.selectors).await {
                    return Verdict::spam(TriggeredFilter::Akismet);
                }
            }
        }

        Verdict::ham()
    }
}
