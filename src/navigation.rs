//! Directional, skip-aware, undo-capable navigation.
//!
//! The manager layers two things on the stateless engine: the skip set,
//! recomputed fresh before every forward step, and the history stack, which
//! records exactly which nodes were shown so that going back undoes
//! precisely what going forward did — something the graph's static previous
//! links cannot reconstruct after branches and skips.

use crate::engine::{FlowEngine, NavigationOutcome};
use crate::error::NavigationError;
use crate::flow::AnswerContext;
use crate::skip::SkipLogicManager;
use tracing::debug;

pub struct NavigationManager {
    engine: FlowEngine,
    skip: SkipLogicManager,
    history: Vec<String>,
}

impl NavigationManager {
    /// Seeds the history with the flow's start node.
    pub fn new(engine: FlowEngine, skip: SkipLogicManager) -> Self {
        let history = vec![engine.flow().start_node_id().to_string()];
        Self {
            engine,
            skip,
            history,
        }
    }

    /// Reconstructs a manager from a persisted history.
    ///
    /// Used on session resume; the history is taken as-is after a minimal
    /// sanity check so that backward navigation replays the original walk.
    pub fn with_history(
        engine: FlowEngine,
        skip: SkipLogicManager,
        history: Vec<String>,
    ) -> Result<Self, NavigationError> {
        if history.is_empty() {
            return Err(NavigationError::FlowNotInitialized(
                "persisted history is empty".to_string(),
            ));
        }
        if history[0] != engine.flow().start_node_id() {
            return Err(NavigationError::FlowNotInitialized(format!(
                "persisted history starts at '{}', flow starts at '{}'",
                history[0],
                engine.flow().start_node_id()
            )));
        }
        Ok(Self {
            engine,
            skip,
            history,
        })
    }

    pub fn engine(&self) -> &FlowEngine {
        &self.engine
    }

    pub fn skip_manager(&self) -> &SkipLogicManager {
        &self.skip
    }

    pub fn skip_manager_mut(&mut self) -> &mut SkipLogicManager {
        &mut self.skip
    }

    /// The visited-node stack. `history[0]` is always the start node and the
    /// last entry is the current node outside of a transition.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Advances from `current_id`, eliding every landing that is either in
    /// the skip set or hidden by its `show_if` condition.
    ///
    /// The skip set is recomputed from the context on every call — the
    /// context may have changed since the previous step. The elision loop is
    /// capped at the node count: exceeding the cap means the skip
    /// configuration and the links form a cycle, which is a flow-authoring
    /// bug surfaced as [`NavigationError::SkipLoopDetected`], not as an
    /// ordinary dead end.
    pub fn navigate_forward(
        &mut self,
        current_id: &str,
        context: &AnswerContext,
    ) -> Result<NavigationOutcome, NavigationError> {
        let skip_set = self.skip.questions_to_skip(self.engine.evaluator(), context);

        let mut outcome = self.engine.find_next_node(current_id, context)?;
        let mut skipped: Vec<String> = Vec::new();
        let hop_limit = self.engine.flow().len();

        loop {
            let Some(target_id) = outcome.target().map(str::to_owned) else {
                break;
            };
            let node = self
                .engine
                .flow()
                .get(&target_id)
                .ok_or_else(|| NavigationError::NodeNotFound(target_id.clone()))?;
            let elide = skip_set.contains(&node.question.id)
                || !self.engine.should_show(&node.question, context);
            if !elide {
                break;
            }
            if skipped.len() >= hop_limit {
                return Err(NavigationError::SkipLoopDetected {
                    start_node_id: current_id.to_string(),
                    limit: hop_limit,
                });
            }
            debug!(node_id = %target_id, "eliding skipped question during forward navigation");
            skipped.push(node.question.id.clone());
            outcome = self.engine.find_next_node(&target_id, context)?;
        }

        if self.history.last().map(String::as_str) != Some(current_id) {
            self.history.push(current_id.to_string());
        }
        if let Some(target_id) = outcome.target()
            && target_id != current_id
        {
            self.history.push(target_id.to_string());
        }

        outcome.questions_skipped = if skipped.is_empty() {
            None
        } else {
            Some(skipped)
        };
        Ok(outcome)
    }

    /// Steps back to the previously *shown* node.
    ///
    /// History takes precedence over the graph's static previous link; the
    /// static link is a best-effort last resort that cannot know which
    /// branches or skips were taken on the way here.
    pub fn navigate_backward(
        &mut self,
        current_id: &str,
    ) -> Result<NavigationOutcome, NavigationError> {
        // Normal case: current is the top of the stack.
        if self.history.len() > 1 && self.history.last().map(String::as_str) == Some(current_id) {
            self.history.pop();
            // History is non-empty after the pop by the length guard.
            let target = self.history[self.history.len() - 1].clone();
            return Ok(backward_outcome(target, current_id));
        }

        // Caller drifted (external jump, stale current): rewind to where
        // current last appeared and return the entry before it.
        if let Some(position) = self.history.iter().rposition(|id| id == current_id)
            && position >= 1
        {
            debug!(
                node_id = %current_id,
                dropped = self.history.len() - position,
                "history drift detected, truncating to last occurrence"
            );
            self.history.truncate(position);
            let target = self.history[position - 1].clone();
            return Ok(backward_outcome(target, current_id));
        }

        // Last resort: the static link. Best effort — if current is not in
        // history at all the stack is left untouched.
        let target = self.engine.navigate_previous(current_id)?;
        if let Some(position) = self.history.iter().rposition(|id| id == current_id)
            && position >= 1
        {
            self.history.truncate(position);
        }
        Ok(backward_outcome(target, current_id))
    }

    /// An explicit detour: existence-checked, condition-blind, and appended
    /// to history — a jump is a detour, never a correction, so nothing is
    /// trimmed.
    pub fn jump_to(&mut self, node_id: &str) -> Result<NavigationOutcome, NavigationError> {
        let node = self.engine.jump_to_node(node_id)?;
        let target = node.id.clone();
        if self.history.last() != Some(&target) {
            self.history.push(target.clone());
        }
        Ok(NavigationOutcome {
            target_node_id: Some(target),
            ..NavigationOutcome::default()
        })
    }

    pub fn can_go_back(&self) -> bool {
        self.history.len() > 1
    }

    /// Whether a forward step from `current_id` would land on a concrete
    /// node. A terminal landing counts as "cannot go forward".
    pub fn can_go_forward(&self, current_id: &str, context: &AnswerContext) -> bool {
        self.engine
            .find_next_node(current_id, context)
            .map(|outcome| outcome.target().is_some())
            .unwrap_or(false)
    }
}

fn backward_outcome(target: String, current_id: &str) -> NavigationOutcome {
    NavigationOutcome {
        target_node_id: Some(target),
        previous_node_id: Some(current_id.to_string()),
        ..NavigationOutcome::default()
    }
}
