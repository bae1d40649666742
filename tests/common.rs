//! Common test utilities for building flows and status maps.
use keiro::prelude::*;

/// Builds a branch-free chain with default next/previous links, no terminal.
///
/// Each node's question id and field name equal the node id.
#[allow(dead_code)]
pub fn linear_flow(ids: &[&str]) -> Flow {
    let nodes = ids
        .iter()
        .enumerate()
        .map(|(i, id)| {
            let mut node = FlowNode::new(*id, *id);
            if i + 1 < ids.len() {
                node = node.next(ids[i + 1]);
            }
            if i > 0 {
                node = node.previous(ids[i - 1]);
            }
            node
        })
        .collect();
    Flow::new("linear", ids[0], nodes).expect("linear flow ids must be unique")
}

/// The income scenario:
/// `start(next=income) -> income(next=end, branch[income>5000 -> high])`,
/// with `end` and `high` terminal.
#[allow(dead_code)]
pub fn income_flow() -> Flow {
    Flow::new(
        "income-flow",
        "start",
        vec![
            FlowNode::new("start", "householdSize").next("income"),
            FlowNode::new("income", "income").next("end").branch(Branch::new(
                "high-income",
                "high",
                ConditionRule::greater_than("income", 5000.0),
                10,
            )),
            FlowNode::new("end", "confirmed").terminal(),
            FlowNode::new("high", "highIncomeNotes").terminal(),
        ],
    )
    .expect("income flow ids must be unique")
}

/// A context with a single field set.
#[allow(dead_code)]
pub fn context_with(field: &str, value: impl Into<Value>) -> AnswerContext {
    let mut context = AnswerContext::new();
    context.set(field, value);
    context
}

/// A status map from `(question_id, status)` pairs.
#[allow(dead_code)]
pub fn status_map(pairs: &[(&str, QuestionStatus)]) -> AHashMap<String, QuestionStatus> {
    pairs
        .iter()
        .map(|(id, status)| (id.to_string(), *status))
        .collect()
}

/// A navigation manager over a flow with no skip rules.
#[allow(dead_code)]
pub fn manager(flow: Flow) -> NavigationManager {
    NavigationManager::new(FlowEngine::new(flow), SkipLogicManager::default())
}

/// A navigation manager with the given skip rules.
#[allow(dead_code)]
pub fn manager_with_rules(flow: Flow, rules: Vec<SkipRule>) -> NavigationManager {
    NavigationManager::new(FlowEngine::new(flow), SkipLogicManager::new(rules))
}
