use std::collections::BTreeMap;

use serde::Deserialize;

use crate::filters::ReputationSelectors;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub turing_test: BTreeMap<String, String>,
    #[serde(default, deserialize_with = "rule_lines")]
    pub spam_words: Vec<String>,
    #[serde(default)]
    pub akismet: Option<String>,
    #[serde(default)]
    pub akismet_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReputationConfig {
    pub selectors: ReputationSelectors,
    pub api_key: String,
}

impl FormConfig {
    pub fn reputation(&self) -> Option<ReputationConfig> {
        let selectors = self.akismet.as_deref().map(str::trim).filter(|s| !s.is_empty())?;
        let api_key = self.akismet_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        Some(ReputationConfig {
            selectors: ReputationSelectors::parse(selectors),
            api_key: api_key.to_string(),
        })
    }

    pub fn with_default_akismet_key(mut self, key: Option<&str>) -> Self {
        let missing = self
            .akismet_key
            .as_deref()
            .map_or(true, |existing| existing.trim().is_empty());
        if missing {
            self.akismet_key = key.map(str::to_string);
        }
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RuleLines {
    List(Vec<String>),
    Text(String),
}

fn rule_lines<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match RuleLines::deserialize(deserializer)? {
        RuleLines::List(lines) => lines,
        RuleLines::Text(text) => text.lines().map(str::to_string).collect(),
    })
}
