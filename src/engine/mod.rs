//! Stateless, condition-gated traversal primitives over a [`Flow`].
//!
//! The engine owns the graph and the condition evaluator but no session
//! state: the answer context is passed into every call and no history is
//! kept. Directional, undo-capable navigation is layered on top by
//! [`NavigationManager`](crate::navigation::NavigationManager).

mod validation;

pub use validation::{LinkKind, ValidationIssue, ValidationReport};

use crate::condition::{ConditionEvaluator, ConditionRule, RuleInterpreter};
use crate::error::NavigationError;
use crate::flow::{AnswerContext, Flow, FlowNode, Question};
use itertools::{Either, Itertools};
use tracing::warn;

/// The successful half of a navigation step.
///
/// A terminal landing is a success with `target_node_id: None`, not an error.
/// `questions_skipped` is `Some` only when at least one question was elided;
/// its presence, not its emptiness, is the caller's skip signal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationOutcome {
    pub target_node_id: Option<String>,
    pub previous_node_id: Option<String>,
    pub branch_taken: bool,
    pub branch_id: Option<String>,
    pub questions_skipped: Option<Vec<String>>,
}

impl NavigationOutcome {
    /// The landed-on node, if the step produced one.
    pub fn target(&self) -> Option<&str> {
        self.target_node_id.as_deref()
    }
}

/// Graph + condition traversal, one call at a time.
pub struct FlowEngine {
    flow: Flow,
    evaluator: Box<dyn ConditionEvaluator>,
}

impl FlowEngine {
    /// Creates an engine with the built-in [`RuleInterpreter`].
    pub fn new(flow: Flow) -> Self {
        Self::with_evaluator(flow, Box::new(RuleInterpreter::new()))
    }

    /// Creates an engine with a custom condition evaluator.
    pub fn with_evaluator(flow: Flow, evaluator: Box<dyn ConditionEvaluator>) -> Self {
        Self { flow, evaluator }
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn evaluator(&self) -> &dyn ConditionEvaluator {
        self.evaluator.as_ref()
    }

    /// Evaluates a rule, downgrading evaluator errors to "not met".
    ///
    /// The error message is logged and dropped; a malformed condition must
    /// never abort a traversal.
    pub fn condition_met(&self, rule: &ConditionRule, context: &AnswerContext) -> bool {
        let outcome = self.evaluator.evaluate(rule, context);
        if let Some(message) = &outcome.error {
            warn!(rule = %rule, error = %message, "condition evaluation failed, treating as not met");
        }
        outcome.met
    }

    /// A question with no `show_if` is always shown.
    pub fn should_show(&self, question: &Question, context: &AnswerContext) -> bool {
        match &question.show_if {
            None => true,
            Some(rule) => self.condition_met(rule, context),
        }
    }

    /// Resolves the next node from `node_id` under the current context.
    ///
    /// Branches are tried in descending priority (declaration order on
    /// ties); the first met condition wins. Otherwise the default link is
    /// followed. A terminal node yields `Ok` with no target.
    pub fn find_next_node(
        &self,
        node_id: &str,
        context: &AnswerContext,
    ) -> Result<NavigationOutcome, NavigationError> {
        let node = self
            .flow
            .get(node_id)
            .ok_or_else(|| NavigationError::NodeNotFound(node_id.to_string()))?;

        if node.is_terminal {
            return Ok(NavigationOutcome {
                previous_node_id: Some(node.id.clone()),
                ..NavigationOutcome::default()
            });
        }

        for branch in node.branches_by_priority() {
            if self.condition_met(&branch.condition, context) {
                return Ok(NavigationOutcome {
                    target_node_id: Some(branch.target_id.clone()),
                    previous_node_id: Some(node.id.clone()),
                    branch_taken: true,
                    branch_id: Some(branch.id.clone()),
                    questions_skipped: None,
                });
            }
        }

        match &node.default_next_id {
            Some(next_id) => Ok(NavigationOutcome {
                target_node_id: Some(next_id.clone()),
                previous_node_id: Some(node.id.clone()),
                branch_taken: false,
                branch_id: None,
                questions_skipped: None,
            }),
            None => Err(NavigationError::NoNextNode(node_id.to_string())),
        }
    }

    /// Follows the static `default_previous_id` link.
    ///
    /// This cannot reconstruct which branches or skips led to `node_id`;
    /// the navigation manager only falls back to it when its history has
    /// nothing better to offer.
    pub fn navigate_previous(&self, node_id: &str) -> Result<String, NavigationError> {
        let node = self
            .flow
            .get(node_id)
            .ok_or_else(|| NavigationError::NodeNotFound(node_id.to_string()))?;
        node.default_previous_id
            .clone()
            .ok_or_else(|| NavigationError::NoPreviousNode(node_id.to_string()))
    }

    /// An explicit detour primitive: existence check only, no conditions.
    pub fn jump_to_node(&self, node_id: &str) -> Result<&FlowNode, NavigationError> {
        self.flow
            .get(node_id)
            .ok_or_else(|| NavigationError::NodeNotFound(node_id.to_string()))
    }

    /// All questions currently passing `should_show`, in declaration order.
    /// Recomputed on every call; visibility is never cached.
    pub fn visible_questions(&self, context: &AnswerContext) -> Vec<&Question> {
        self.partition_questions(context).0
    }

    /// All questions currently hidden by their `show_if` condition.
    pub fn skipped_questions(&self, context: &AnswerContext) -> Vec<&Question> {
        self.partition_questions(context).1
    }

    fn partition_questions(&self, context: &AnswerContext) -> (Vec<&Question>, Vec<&Question>) {
        self.flow.nodes().iter().partition_map(|node| {
            if self.should_show(&node.question, context) {
                Either::Left(&node.question)
            } else {
                Either::Right(&node.question)
            }
        })
    }

    /// Structural validation, intended at flow load time.
    ///
    /// The report is advisory: traversal never consults it.
    pub fn validate(&self) -> ValidationReport {
        validation::validate_flow(&self.flow)
    }
}
