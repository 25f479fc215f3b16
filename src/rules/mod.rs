pub mod engine;
pub mod matcher;
pub mod parser;
pub mod resolver;

pub use engine::{KeywordRuleEngine, Pass, RuleMatch};
pub use matcher::{Matcher, RuleError};
pub use parser::{Operator, RuleSpec};
pub use resolver::FieldResolver;
