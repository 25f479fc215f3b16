use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum TriggeredFilter {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "turingTest")]
    TuringTest,
    #[serde(rename = "keywords")]
    Keywords,
    #[serde(rename = "akismet")]
    Akismet,
}

impl TriggeredFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            TriggeredFilter::None => "",
            TriggeredFilter::TuringTest => "turingTest",
            TriggeredFilter::Keywords => "keywords",
            TriggeredFilter::Akismet => "akismet",
        }
    }
}

impl fmt::Display for TriggeredFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Verdict {
    pub is_spam: bool,
    pub triggered_filter: TriggeredFilter,
}

impl Verdict {
    pub fn ham() -> Self {
        Self::default()
    }

    pub fn spam(filter: TriggeredFilter) -> Self {
        Self {
            is_spam: true,
            triggered_filter: filter,
        }
    }
}
