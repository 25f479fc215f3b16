use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Operator {
    ContainsWord,
    ContainsWordStrict,
    #[default]
    ContainsSubstring,
    StartsWith,
    EndsWith,
    Equals,
}

impl Operator {
    // bare `=` last: every other token contains it
    pub const DETECTION_ORDER: [Operator; 6] = [
        Operator::ContainsWord,
        Operator::ContainsWordStrict,
        Operator::ContainsSubstring,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::Equals,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Operator::ContainsWord => "*=",
            Operator::ContainsWordStrict => "~=",
            Operator::ContainsSubstring => "%=",
            Operator::StartsWith => "^=",
            Operator::EndsWith => "$=",
            Operator::Equals => "=",
        }
    }

    /// Splits `text` on the first occurrence of the highest-priority token it
    /// contains. `None` means the text has no `=` at all.
    pub fn split(text: &str) -> Option<(Operator, &str, &str)> {
        Self::DETECTION_ORDER.into_iter().find_map(|op| {
            text.split_once(op.token())
                .map(|(field, keyword)| (op, field, keyword))
        })
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSpec {
    pub operator: Operator,
    // None: global keyword rule. Some(""): operator rule over every raw parameter.
    pub field_selector: Option<String>,
    pub negate: bool,
    pub keyword: String,
}

impl RuleSpec {
    pub fn parse(raw: &str) -> Option<RuleSpec> {
        let text = collapse_whitespace(raw);
        if text.is_empty() {
            return None;
        }
        let Some((operator, field_part, keyword)) = Operator::split(&text) else {
            return Some(RuleSpec::global(text));
        };

        let mut field = field_part.trim().to_string();
        let mut negate = false;
        if field.contains('!') {
            negate = true;
            field = field.replace('!', "").trim().to_string();
        }

        Some(RuleSpec {
            operator,
            field_selector: Some(field),
            negate,
            keyword: keyword.trim().to_string(),
        })
    }

    pub fn global(keyword: impl Into<String>) -> RuleSpec {
        RuleSpec {
            operator: Operator::default(),
            field_selector: None,
            negate: false,
            keyword: keyword.into(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.field_selector.is_none()
    }
}

fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
