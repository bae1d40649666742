use crate::flow::Flow;
use ahash::{AHashMap, AHashSet};
use itertools::Itertools;
use std::collections::VecDeque;
use thiserror::Error;

/// Which link on a node a structural issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    DefaultNext,
    DefaultPrevious,
    Branch,
}

impl std::fmt::Display for LinkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkKind::DefaultNext => write!(f, "default next link"),
            LinkKind::DefaultPrevious => write!(f, "default previous link"),
            LinkKind::Branch => write!(f, "branch target"),
        }
    }
}

/// A single structural finding. Whether it is an error or a warning is the
/// report's classification, not the issue's.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    #[error("Start node '{0}' does not exist in the flow")]
    MissingStartNode(String),

    #[error("Node '{node_id}': {kind} points to missing node '{target_id}'")]
    DanglingLink {
        node_id: String,
        target_id: String,
        kind: LinkKind,
    },

    #[error("Node '{0}': question has an empty field name")]
    MissingFieldName(String),

    #[error("Node '{0}' is unreachable from the start node")]
    UnreachableNode(String),

    #[error("Cycle detected: {}", path.iter().join(" -> "))]
    CycleDetected { path: Vec<String> },
}

/// The outcome of structural validation.
///
/// Errors mark the flow invalid; warnings (orphan nodes) do not. Nothing in
/// the report ever gates runtime traversal.
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    /// The cycles found, if any, each as its minimal node path.
    pub fn cycles(&self) -> impl Iterator<Item = &[String]> {
        self.errors.iter().filter_map(|issue| match issue {
            ValidationIssue::CycleDetected { path } => Some(path.as_slice()),
            _ => None,
        })
    }
}

/// Runs every structural check over the flow.
pub(super) fn validate_flow(flow: &Flow) -> ValidationReport {
    let mut report = ValidationReport::default();

    if !flow.contains(flow.start_node_id()) {
        report
            .errors
            .push(ValidationIssue::MissingStartNode(flow.start_node_id().to_string()));
    }

    check_links(flow, &mut report);
    check_reachability(flow, &mut report);
    detect_cycles(flow, &mut report);

    report
}

/// Every link and branch target must resolve, and every question needs a
/// field name for its answer to land under.
fn check_links(flow: &Flow, report: &mut ValidationReport) {
    for node in flow.nodes() {
        if node.question.field_name.is_empty() {
            report
                .errors
                .push(ValidationIssue::MissingFieldName(node.id.clone()));
        }

        let links = [
            (node.default_next_id.as_deref(), LinkKind::DefaultNext),
            (node.default_previous_id.as_deref(), LinkKind::DefaultPrevious),
        ];
        for (target, kind) in links {
            if let Some(target_id) = target
                && !flow.contains(target_id)
            {
                report.errors.push(ValidationIssue::DanglingLink {
                    node_id: node.id.clone(),
                    target_id: target_id.to_string(),
                    kind,
                });
            }
        }
        for branch in &node.branches {
            if !flow.contains(&branch.target_id) {
                report.errors.push(ValidationIssue::DanglingLink {
                    node_id: node.id.clone(),
                    target_id: branch.target_id.clone(),
                    kind: LinkKind::Branch,
                });
            }
        }
    }
}

/// BFS from the start node over default + branch edges. Unreached nodes are
/// orphans: suspicious, but not invalid.
fn check_reachability(flow: &Flow, report: &mut ValidationReport) {
    if !flow.contains(flow.start_node_id()) {
        return;
    }

    let mut reached: AHashSet<&str> = AHashSet::with_capacity(flow.len());
    let mut queue = VecDeque::new();
    reached.insert(flow.start_node_id());
    queue.push_back(flow.start_node_id());

    while let Some(node_id) = queue.pop_front() {
        let Some(node) = flow.get(node_id) else {
            continue;
        };
        for target in node.outgoing_targets() {
            if flow.contains(target) && reached.insert(target) {
                queue.push_back(target);
            }
        }
    }

    for node in flow.nodes() {
        if !reached.contains(node.id.as_str()) {
            report
                .warnings
                .push(ValidationIssue::UnreachableNode(node.id.clone()));
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Colored DFS over default + branch edges. Structural: any condition is
/// assumed satisfiable, so a gray revisit is always reported. The recorded
/// path is the minimal cycle, from the revisited node to the top of the
/// stack.
fn detect_cycles(flow: &Flow, report: &mut ValidationReport) {
    let mut colors: AHashMap<&str, Color> = flow
        .nodes()
        .iter()
        .map(|node| (node.id.as_str(), Color::White))
        .collect();
    let mut stack: Vec<&str> = Vec::new();

    for node in flow.nodes() {
        if colors.get(node.id.as_str()) == Some(&Color::White) {
            visit(flow, node.id.as_str(), &mut colors, &mut stack, report);
        }
    }
}

fn visit<'a>(
    flow: &'a Flow,
    node_id: &'a str,
    colors: &mut AHashMap<&'a str, Color>,
    stack: &mut Vec<&'a str>,
    report: &mut ValidationReport,
) {
    colors.insert(node_id, Color::Gray);
    stack.push(node_id);

    if let Some(node) = flow.get(node_id) {
        for target in node.outgoing_targets() {
            // Dangling targets are check_links' finding, not a cycle.
            if !flow.contains(target) {
                continue;
            }
            match colors.get(target) {
                Some(Color::White) => {
                    visit(flow, target, colors, stack, report);
                }
                Some(Color::Gray) => {
                    if let Some(position) = stack.iter().position(|&n| n == target) {
                        report.errors.push(ValidationIssue::CycleDetected {
                            path: stack[position..].iter().map(|n| n.to_string()).collect(),
                        });
                    }
                }
                _ => {}
            }
        }
    }

    stack.pop();
    colors.insert(node_id, Color::Black);
}
