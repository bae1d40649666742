//! Skip rules: conditions that remove questions from the active path.
//!
//! Orthogonal to branches — branches choose *where* navigation goes, skip
//! rules declare *which* otherwise-reachable questions to omit no matter
//! which path reaches them.

use crate::condition::{ConditionEvaluator, ConditionRule};
use crate::flow::AnswerContext;
use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One declarative skip rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkipRule {
    pub id: String,
    pub question_ids: Vec<String>,
    pub condition: ConditionRule,
    #[serde(default)]
    pub priority: i32,
}

impl SkipRule {
    pub fn new(
        id: impl Into<String>,
        question_ids: impl IntoIterator<Item = impl Into<String>>,
        condition: ConditionRule,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            question_ids: question_ids.into_iter().map(Into::into).collect(),
            condition,
            priority,
        }
    }
}

/// Holds the rule set and computes the skip set from the current context.
///
/// Rules are kept stably sorted by descending priority. The skip set is the
/// union of `question_ids` over every rule whose condition is currently met;
/// it is recomputed from scratch on every query, never cached across answers.
#[derive(Debug, Clone, Default)]
pub struct SkipLogicManager {
    rules: Vec<SkipRule>,
}

impl SkipLogicManager {
    pub fn new(mut rules: Vec<SkipRule>) -> Self {
        rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
        Self { rules }
    }

    pub fn add_rule(&mut self, rule: SkipRule) {
        self.rules.push(rule);
        self.rules.sort_by_key(|rule| std::cmp::Reverse(rule.priority));
    }

    /// Removes a rule by id, returning it if present.
    pub fn remove_rule(&mut self, rule_id: &str) -> Option<SkipRule> {
        let position = self.rules.iter().position(|rule| rule.id == rule_id)?;
        Some(self.rules.remove(position))
    }

    /// Rules in evaluation order (descending priority).
    pub fn rules(&self) -> &[SkipRule] {
        &self.rules
    }

    /// The union of question ids over every currently-met rule.
    pub fn questions_to_skip(
        &self,
        evaluator: &dyn ConditionEvaluator,
        context: &AnswerContext,
    ) -> AHashSet<String> {
        let mut skip_set = AHashSet::new();
        for rule in &self.rules {
            let outcome = evaluator.evaluate(&rule.condition, context);
            if let Some(message) = &outcome.error {
                warn!(rule_id = %rule.id, error = %message, "skip rule evaluation failed, rule not applied");
            }
            if outcome.met {
                skip_set.extend(rule.question_ids.iter().cloned());
            }
        }
        skip_set
    }

    pub fn should_skip_question(
        &self,
        evaluator: &dyn ConditionEvaluator,
        context: &AnswerContext,
        question_id: &str,
    ) -> bool {
        self.questions_to_skip(evaluator, context)
            .contains(question_id)
    }
}
