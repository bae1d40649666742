//! The pluggable condition-evaluation seam.
//!
//! Traversal never interprets rules itself; it asks a [`ConditionEvaluator`]
//! whether a rule is met under the current answer context. The default
//! [`RuleInterpreter`] walks the built-in [`ConditionRule`] AST, but any
//! rule language can be substituted behind the trait.

mod interpreter;
mod rule;

pub use interpreter::RuleInterpreter;
pub use rule::ConditionRule;

use crate::flow::AnswerContext;

/// The `{result, error?}` shape every evaluation produces.
///
/// An evaluation error is *not* a traversal failure: the outcome fails open
/// to `met = false` and the message is retained for diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct EvalOutcome {
    pub met: bool,
    pub error: Option<String>,
}

impl EvalOutcome {
    pub fn met(met: bool) -> Self {
        Self { met, error: None }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            met: false,
            error: Some(message.into()),
        }
    }
}

/// A predicate-over-context capability.
///
/// Implementations must be total: they report problems through
/// [`EvalOutcome::error`] rather than panicking or returning `Result`, so a
/// malformed rule can never abort a traversal.
pub trait ConditionEvaluator {
    fn evaluate(&self, rule: &ConditionRule, context: &AnswerContext) -> EvalOutcome;
}
