use super::{ConditionEvaluator, ConditionRule, EvalOutcome};
use crate::flow::{AnswerContext, Value};

/// The default evaluator: a direct recursive walk of the [`ConditionRule`] AST.
///
/// Lookup semantics: a field missing from the context reads as [`Value::Null`],
/// so `equals(field, Null)` doubles as an "unanswered" test. Ordered
/// comparisons require numbers on both sides; anything else is an error
/// outcome, never a panic.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleInterpreter;

impl RuleInterpreter {
    pub fn new() -> Self {
        Self
    }

    fn lookup<'a>(&self, context: &'a AnswerContext, field: &str) -> &'a Value {
        context.get(field).unwrap_or(&Value::Null)
    }

    fn compare_ordered<F>(
        &self,
        context: &AnswerContext,
        field: &str,
        value: &Value,
        op_symbol: &str,
        op: F,
    ) -> EvalOutcome
    where
        F: Fn(f64, f64) -> bool,
    {
        let actual = self.lookup(context, field);
        match (actual.as_number(), value.as_number()) {
            (Some(lhs), Some(rhs)) => EvalOutcome::met(op(lhs, rhs)),
            _ => EvalOutcome::failed(format!(
                "cannot apply '{}' to ${} = {} against {}",
                op_symbol, field, actual, value
            )),
        }
    }
}

impl ConditionEvaluator for RuleInterpreter {
    fn evaluate(&self, rule: &ConditionRule, context: &AnswerContext) -> EvalOutcome {
        match rule {
            ConditionRule::Equals { field, value } => {
                EvalOutcome::met(self.lookup(context, field) == value)
            }
            ConditionRule::NotEquals { field, value } => {
                EvalOutcome::met(self.lookup(context, field) != value)
            }
            ConditionRule::GreaterThan { field, value } => {
                self.compare_ordered(context, field, value, ">", |a, b| a > b)
            }
            ConditionRule::GreaterThanOrEqual { field, value } => {
                self.compare_ordered(context, field, value, ">=", |a, b| a >= b)
            }
            ConditionRule::LessThan { field, value } => {
                self.compare_ordered(context, field, value, "<", |a, b| a < b)
            }
            ConditionRule::LessThanOrEqual { field, value } => {
                self.compare_ordered(context, field, value, "<=", |a, b| a <= b)
            }
            ConditionRule::IsAnswered { field } => {
                EvalOutcome::met(context.get(field).is_some_and(|v| !v.is_null()))
            }
            ConditionRule::All { rules } => {
                for sub in rules {
                    let outcome = self.evaluate(sub, context);
                    if outcome.error.is_some() {
                        return EvalOutcome {
                            met: false,
                            error: outcome.error,
                        };
                    }
                    if !outcome.met {
                        return EvalOutcome::met(false);
                    }
                }
                EvalOutcome::met(true)
            }
            ConditionRule::Any { rules } => {
                for sub in rules {
                    let outcome = self.evaluate(sub, context);
                    if outcome.error.is_some() {
                        return EvalOutcome {
                            met: false,
                            error: outcome.error,
                        };
                    }
                    if outcome.met {
                        return EvalOutcome::met(true);
                    }
                }
                EvalOutcome::met(false)
            }
            ConditionRule::Not { rule } => {
                let outcome = self.evaluate(rule, context);
                // An errored sub-rule poisons the negation rather than
                // inverting into a spurious `true`.
                if outcome.error.is_some() {
                    return EvalOutcome {
                        met: false,
                        error: outcome.error,
                    };
                }
                EvalOutcome::met(!outcome.met)
            }
        }
    }
}
