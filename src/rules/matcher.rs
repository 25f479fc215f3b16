use regex::{Regex, RegexBuilder};
use thiserror::Error;

use super::parser::{Operator, RuleSpec};

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("keyword {keyword:?} could not be compiled into a word pattern: {source}")]
    Pattern {
        keyword: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone)]
pub enum Matcher {
    Word(Regex),
    Substring(String),
    Prefix(String),
    Suffix(String),
    Exact(String),
}

impl Matcher {
    pub fn compile(rule: &RuleSpec) -> Result<Self, RuleError> {
        let keyword = rule.keyword.to_lowercase();
        let matcher = match rule.operator {
            Operator::ContainsWord => Matcher::Word(word_regex(&rule.keyword, false)?),
            Operator::ContainsWordStrict => Matcher::Word(word_regex(&rule.keyword, true)?),
            Operator::ContainsSubstring => Matcher::Substring(keyword),
            Operator::StartsWith => Matcher::Prefix(keyword),
            Operator::EndsWith => Matcher::Suffix(keyword),
            Operator::Equals => Matcher::Exact(keyword),
        };
        Ok(matcher)
    }

    pub fn is_match(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Matcher::Word(re) => re.is_match(value),
            Matcher::Substring(keyword) => value.to_lowercase().contains(keyword.as_str()),
            Matcher::Prefix(keyword) => value.to_lowercase().starts_with(keyword.as_str()),
            Matcher::Suffix(keyword) => value.to_lowercase().ends_with(keyword.as_str()),
            Matcher::Exact(keyword) => value.to_lowercase() == *keyword,
        }
    }
}

pub fn word_pattern(keyword: &str, strict: bool) -> String {
    let mut pattern = String::from(r"\b");
    pattern.push_str(&regex::escape(keyword).replace(' ', r"\s+"));
    if strict {
        pattern.push_str(r"\b");
    }
    pattern
}

fn word_regex(keyword: &str, strict: bool) -> Result<Regex, RuleError> {
    RegexBuilder::new(&word_pattern(keyword, strict))
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
        .map_err(|source| RuleError::Pattern {
            keyword: keyword.to_string(),
            source,
        })
}
