//! The exposed session surface: one object per active questionnaire.
//!
//! A [`FlowSession`] bundles the navigation manager, the answer context, the
//! caller-driven status map, checkpoints and the time tracker behind thin
//! wrappers. It is an explicit handle owned by the hosting application —
//! never a process-wide singleton — so any number of sessions can run
//! independently.

mod checkpoint;
mod timing;

pub use checkpoint::{Checkpoint, CheckpointManager};
pub use timing::TimeTracker;

use crate::engine::{FlowEngine, NavigationOutcome, ValidationReport};
use crate::error::NavigationError;
use crate::flow::{AnswerContext, Flow, Value};
use crate::navigation::NavigationManager;
use crate::progress::{ProgressCalculator, ProgressMetrics, QuestionStatus};
use crate::skip::SkipLogicManager;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The caller-owned persisted layout. Managers are never serialized; on
/// resume they are reconstructed fresh from this snapshot and the flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: String,
    pub flow_id: String,
    pub current_node_id: String,
    pub history: Vec<String>,
    pub answers: Vec<(String, Value)>,
}

pub struct FlowSession {
    session_id: String,
    current_node_id: String,
    navigation: NavigationManager,
    context: AnswerContext,
    statuses: AHashMap<String, QuestionStatus>,
    progress: ProgressCalculator,
    checkpoints: CheckpointManager,
    timer: TimeTracker,
}

impl std::fmt::Debug for FlowSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlowSession")
            .field("session_id", &self.session_id)
            .field("current_node_id", &self.current_node_id)
            .field("context", &self.context)
            .field("statuses", &self.statuses)
            .field("checkpoints", &self.checkpoints)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

impl FlowSession {
    /// Starts a session at the flow's start node: every question `pending`
    /// except the start node's (`current`), empty context, history seeded
    /// with the start node.
    pub fn start(flow: Flow, session_id: impl Into<String>) -> Self {
        Self::start_with(FlowEngine::new(flow), SkipLogicManager::default(), session_id)
    }

    /// Starts a session with a custom engine (evaluator) and skip rules.
    pub fn start_with(
        engine: FlowEngine,
        skip: SkipLogicManager,
        session_id: impl Into<String>,
    ) -> Self {
        let current_node_id = engine.flow().start_node_id().to_string();
        let statuses = initial_statuses(&engine, &current_node_id);
        let mut timer = TimeTracker::start();
        timer.enter_question(current_node_id.clone());
        Self {
            session_id: session_id.into(),
            current_node_id,
            navigation: NavigationManager::new(engine, skip),
            context: AnswerContext::new(),
            statuses,
            progress: ProgressCalculator::default(),
            checkpoints: CheckpointManager::default(),
            timer,
        }
    }

    /// Reconstructs a session from a persisted snapshot.
    ///
    /// Answered statuses are rebuilt from the snapshot's answers: a question
    /// whose field has a value in the context counts as answered.
    pub fn resume(flow: Flow, snapshot: SessionSnapshot) -> Result<Self, NavigationError> {
        Self::resume_with(FlowEngine::new(flow), SkipLogicManager::default(), snapshot)
    }

    pub fn resume_with(
        engine: FlowEngine,
        skip: SkipLogicManager,
        snapshot: SessionSnapshot,
    ) -> Result<Self, NavigationError> {
        if engine.flow().id() != snapshot.flow_id {
            return Err(NavigationError::FlowNotInitialized(format!(
                "snapshot belongs to flow '{}', not '{}'",
                snapshot.flow_id,
                engine.flow().id()
            )));
        }
        if !engine.flow().contains(&snapshot.current_node_id) {
            return Err(NavigationError::NodeNotFound(snapshot.current_node_id));
        }

        let context = AnswerContext::from_pairs(snapshot.answers);
        let mut statuses = AHashMap::with_capacity(engine.flow().len());
        for node in engine.flow().nodes() {
            let status = if node.id == snapshot.current_node_id {
                QuestionStatus::Current
            } else if context.contains(&node.question.field_name) {
                QuestionStatus::Answered
            } else {
                QuestionStatus::Pending
            };
            statuses.insert(node.question.id.clone(), status);
        }

        let navigation = NavigationManager::with_history(engine, skip, snapshot.history)?;
        let mut timer = TimeTracker::start();
        timer.enter_question(snapshot.current_node_id.clone());
        Ok(Self {
            session_id: snapshot.session_id,
            current_node_id: snapshot.current_node_id,
            navigation,
            context,
            statuses,
            progress: ProgressCalculator::default(),
            checkpoints: CheckpointManager::default(),
            timer,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn current_node_id(&self) -> &str {
        &self.current_node_id
    }

    pub fn context(&self) -> &AnswerContext {
        &self.context
    }

    pub fn history(&self) -> &[String] {
        self.navigation.history()
    }

    pub fn engine(&self) -> &FlowEngine {
        self.navigation.engine()
    }

    pub fn skip_manager_mut(&mut self) -> &mut SkipLogicManager {
        self.navigation.skip_manager_mut()
    }

    pub fn statuses(&self) -> &AHashMap<String, QuestionStatus> {
        &self.statuses
    }

    /// Records an answer in the context. This is the *only* effect: status
    /// transitions stay with the caller via [`set_status`](Self::set_status).
    pub fn answer_question(&mut self, field_name: &str, value: impl Into<Value>) {
        self.context.set(field_name, value);
    }

    /// Removes an answer from the context.
    pub fn clear_answer(&mut self, field_name: &str) -> Option<Value> {
        self.context.remove(field_name)
    }

    /// The caller-driven status transition.
    pub fn set_status(&mut self, question_id: impl Into<String>, status: QuestionStatus) {
        self.statuses.insert(question_id.into(), status);
    }

    /// Advances to the next visible question.
    pub fn next(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let current = self.current_node_id.clone();
        let outcome = self.navigation.navigate_forward(&current, &self.context)?;
        self.land(&outcome);
        Ok(outcome)
    }

    /// Steps back to the previously shown question.
    pub fn previous(&mut self) -> Result<NavigationOutcome, NavigationError> {
        let current = self.current_node_id.clone();
        let outcome = self.navigation.navigate_backward(&current)?;
        self.land(&outcome);
        Ok(outcome)
    }

    /// Detours to an arbitrary node, bypassing conditions.
    pub fn jump_to(&mut self, node_id: &str) -> Result<NavigationOutcome, NavigationError> {
        let outcome = self.navigation.jump_to(node_id)?;
        self.land(&outcome);
        Ok(outcome)
    }

    pub fn can_go_back(&self) -> bool {
        self.navigation.can_go_back()
    }

    pub fn can_go_forward(&self) -> bool {
        self.navigation
            .can_go_forward(&self.current_node_id, &self.context)
    }

    /// Structural validation of the underlying flow, intended at load time.
    pub fn validate_flow(&self) -> ValidationReport {
        self.navigation.engine().validate()
    }

    pub fn progress(&self) -> ProgressMetrics {
        self.progress
            .calculate(self.navigation.engine(), &self.statuses, &self.context)
    }

    pub fn section_progress(&self, question_ids: &[String]) -> ProgressMetrics {
        self.progress.section_progress(
            self.navigation.engine(),
            &self.statuses,
            &self.context,
            question_ids,
        )
    }

    pub fn is_complete(&self, require_all_required: bool) -> bool {
        self.progress.is_flow_complete(
            self.navigation.engine(),
            &self.statuses,
            &self.context,
            require_all_required,
        )
    }

    pub fn save_checkpoint(&mut self, name: impl Into<String>, description: Option<String>) {
        let node_id = self.current_node_id.clone();
        self.checkpoints
            .save(name, description, node_id, &self.context);
    }

    pub fn restore_checkpoint(&self, name: &str) -> Option<Checkpoint> {
        self.checkpoints.restore(name)
    }

    pub fn checkpoint_manager(&self) -> &CheckpointManager {
        &self.checkpoints
    }

    pub fn pause(&mut self) {
        self.timer.pause();
    }

    pub fn resume_timer(&mut self) {
        self.timer.resume();
    }

    pub fn elapsed(&self) -> Duration {
        self.timer.elapsed()
    }

    pub fn time_on_question(&self, question_id: &str) -> Duration {
        self.timer.time_on_question(question_id)
    }

    /// Exports the caller-owned persisted layout.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id.clone(),
            flow_id: self.navigation.engine().flow().id().to_string(),
            current_node_id: self.current_node_id.clone(),
            history: self.navigation.history().to_vec(),
            answers: self.context.to_pairs(),
        }
    }

    /// Moves the session's notion of "current" after a successful step.
    ///
    /// Only the `current` marker is maintained here: the old node's status
    /// reverts to pending *if the caller never transitioned it*, and the
    /// landing node is only marked current when still pending, so explicit
    /// `answered`/`skipped` transitions are never clobbered.
    fn land(&mut self, outcome: &NavigationOutcome) {
        let Some(target) = outcome.target() else {
            return;
        };
        if target == self.current_node_id {
            return;
        }

        if let Some(node) = self.navigation.engine().flow().get(&self.current_node_id)
            && self.statuses.get(&node.question.id) == Some(&QuestionStatus::Current)
        {
            self.statuses
                .insert(node.question.id.clone(), QuestionStatus::Pending);
        }
        if let Some(node) = self.navigation.engine().flow().get(target) {
            let entry = self
                .statuses
                .entry(node.question.id.clone())
                .or_insert(QuestionStatus::Pending);
            if *entry == QuestionStatus::Pending {
                *entry = QuestionStatus::Current;
            }
        }

        self.current_node_id = target.to_string();
        self.timer.enter_question(target.to_string());
    }
}

fn initial_statuses(engine: &FlowEngine, start_node_id: &str) -> AHashMap<String, QuestionStatus> {
    engine
        .flow()
        .nodes()
        .iter()
        .map(|node| {
            let status = if node.id == start_node_id {
                QuestionStatus::Current
            } else {
                QuestionStatus::Pending
            };
            (node.question.id.clone(), status)
        })
        .collect()
}
