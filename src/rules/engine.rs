use tracing::{debug, info, warn};

use crate::domain::FormSubmission;

use super::{matcher::Matcher, parser::RuleSpec, resolver::FieldResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Qualified,
    Global,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch {
    pub rule: String,
    pub pass: Pass,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordRuleEngine;

impl KeywordRuleEngine {
    pub fn evaluate<S, R>(submission: &S, rules: &[R]) -> bool
    where
        S: FormSubmission + ?Sized,
        R: AsRef<str>,
    {
        Self::find_match(submission, rules).is_some()
    }

    /// Returns the first rule that matches. Every qualified rule is tried,
    /// in configured order, before any global rule.
    pub fn find_match<S, R>(submission: &S, rules: &[R]) -> Option<RuleMatch>
    where
        S: FormSubmission + ?Sized,
        R: AsRef<str>,
    {
        let resolver = FieldResolver::new(submission, submission.raw_params());

        let hit = rules
            .iter()
            .map(|rule| rule.as_ref())
            .filter(|line| line.contains('='))
            .find(|line| qualified_rule_matches(&resolver, line))
            .map(|line| RuleMatch {
                rule: line.to_string(),
                pass: Pass::Qualified,
            })
            .or_else(|| {
                rules
                    .iter()
                    .map(|rule| rule.as_ref())
                    .filter(|line| !line.contains('='))
                    .find(|line| global_rule_matches(&resolver, line))
                    .map(|line| RuleMatch {
                        rule: line.to_string(),
                        pass: Pass::Global,
                    })
            });

        if let Some(hit) = &hit {
            info!(
                target: "rules",
                rule = %hit.rule.trim(),
                pass = ?hit.pass,
                "keyword rule triggered"
            );
        }
        hit
    }
}

fn qualified_rule_matches<S>(resolver: &FieldResolver<'_, S>, line: &str) -> bool
where
    S: FormSubmission + ?Sized,
{
    let Some(rule) = RuleSpec::parse(line) else {
        return false;
    };
    if rule.keyword.is_empty() {
        debug!(target: "rules", rule = %line.trim(), "skipping rule with empty keyword");
        return false;
    }
    let matcher = match Matcher::compile(&rule) {
        Ok(matcher) => matcher,
        Err(err) => {
            warn!(target: "rules", error = %err, rule = %line.trim(), "skipping unusable rule");
            return false;
        }
    };

    let values = resolver.resolve(rule.field_selector.as_deref().unwrap_or_default());
    if values.is_empty() {
        return false;
    }
    let matched = values.iter().any(|value| matcher.is_match(value));
    if matched != rule.negate {
        debug!(
            target: "rules",
            field = rule.field_selector.as_deref().unwrap_or_default(),
            operator = %rule.operator,
            negate = rule.negate,
            "qualified rule matched"
        );
        return true;
    }
    false
}

fn global_rule_matches<S>(resolver: &FieldResolver<'_, S>, line: &str) -> bool
where
    S: FormSubmission + ?Sized,
{
    let Some(rule) = RuleSpec::parse(line) else {
        return false;
    };
    let needle = rule.keyword.to_lowercase();
    resolver
        .raw()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
}
