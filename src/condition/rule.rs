use crate::flow::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The declarative condition language, a tagged union keyed by `op`.
///
/// Rules read fields out of the answer context and reduce to a boolean.
/// This is the canonical AST the default [`RuleInterpreter`] walks; callers
/// with their own rule format implement [`ConditionEvaluator`] instead and
/// never construct these.
///
/// [`RuleInterpreter`]: crate::condition::RuleInterpreter
/// [`ConditionEvaluator`]: crate::condition::ConditionEvaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ConditionRule {
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    GreaterThan { field: String, value: Value },
    GreaterThanOrEqual { field: String, value: Value },
    LessThan { field: String, value: Value },
    LessThanOrEqual { field: String, value: Value },

    /// True when the field is present in the context and not null.
    IsAnswered { field: String },

    /// True when every sub-rule is true. Empty is vacuously true.
    All { rules: Vec<ConditionRule> },
    /// True when at least one sub-rule is true. Empty is false.
    Any { rules: Vec<ConditionRule> },
    Not { rule: Box<ConditionRule> },
}

impl ConditionRule {
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionRule::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn not_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionRule::NotEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn greater_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionRule::GreaterThan {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn less_than(field: impl Into<String>, value: impl Into<Value>) -> Self {
        ConditionRule::LessThan {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn is_answered(field: impl Into<String>) -> Self {
        ConditionRule::IsAnswered {
            field: field.into(),
        }
    }
}

impl fmt::Display for ConditionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionRule::Equals { field, value } => write!(f, "${} == {}", field, value),
            ConditionRule::NotEquals { field, value } => write!(f, "${} != {}", field, value),
            ConditionRule::GreaterThan { field, value } => write!(f, "${} > {}", field, value),
            ConditionRule::GreaterThanOrEqual { field, value } => {
                write!(f, "${} >= {}", field, value)
            }
            ConditionRule::LessThan { field, value } => write!(f, "${} < {}", field, value),
            ConditionRule::LessThanOrEqual { field, value } => {
                write!(f, "${} <= {}", field, value)
            }
            ConditionRule::IsAnswered { field } => write!(f, "answered(${})", field),
            ConditionRule::All { rules } => {
                write!(f, "all(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                write!(f, ")")
            }
            ConditionRule::Any { rules } => {
                write!(f, "any(")?;
                for (i, rule) in rules.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", rule)?;
                }
                write!(f, ")")
            }
            ConditionRule::Not { rule } => write!(f, "not({})", rule),
        }
    }
}
