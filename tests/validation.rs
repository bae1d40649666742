//! Structural validation: dangling links, reachability, cycles.
mod common;
use common::*;
use keiro::prelude::*;

fn validate(flow: Flow) -> ValidationReport {
    FlowEngine::new(flow).validate()
}

#[test]
fn well_formed_flow_is_valid() {
    let report = validate(income_flow());
    assert!(report.is_valid());
    assert!(report.errors().is_empty());
    assert!(report.warnings().is_empty());
}

#[test]
fn missing_start_node_is_an_error() {
    let flow = Flow::new("f", "ghost", vec![FlowNode::new("a", "a")]).expect("flow");
    let report = validate(flow);
    assert!(!report.is_valid());
    assert!(
        report
            .errors()
            .contains(&ValidationIssue::MissingStartNode("ghost".to_string()))
    );
}

#[test]
fn dangling_default_link_is_an_error() {
    let flow = Flow::new("f", "a", vec![FlowNode::new("a", "a").next("ghost")]).expect("flow");
    let report = validate(flow);
    assert!(!report.is_valid());
    assert!(report.errors().iter().any(|issue| matches!(
        issue,
        ValidationIssue::DanglingLink { node_id, target_id, kind: LinkKind::DefaultNext }
            if node_id == "a" && target_id == "ghost"
    )));
}

#[test]
fn dangling_branch_target_is_an_error() {
    let flow = Flow::new(
        "f",
        "a",
        vec![
            FlowNode::new("a", "a")
                .next("b")
                .branch(Branch::new("br", "ghost", ConditionRule::is_answered("x"), 0)),
            FlowNode::new("b", "b").terminal(),
        ],
    )
    .expect("flow");
    let report = validate(flow);
    assert!(!report.is_valid());
    assert!(report.errors().iter().any(|issue| matches!(
        issue,
        ValidationIssue::DanglingLink { kind: LinkKind::Branch, .. }
    )));
}

#[test]
fn empty_field_name_is_an_error() {
    let flow = Flow::new("f", "a", vec![FlowNode::new("a", "")]).expect("flow");
    let report = validate(flow);
    assert!(!report.is_valid());
    assert!(
        report
            .errors()
            .contains(&ValidationIssue::MissingFieldName("a".to_string()))
    );
}

#[test]
fn orphan_node_is_a_warning_not_an_error() {
    let flow = Flow::new(
        "f",
        "a",
        vec![
            FlowNode::new("a", "a").next("b"),
            FlowNode::new("b", "b").terminal(),
            FlowNode::new("orphan", "orphan").terminal(),
        ],
    )
    .expect("flow");
    let report = validate(flow);
    assert!(report.is_valid());
    assert_eq!(
        report.warnings(),
        &[ValidationIssue::UnreachableNode("orphan".to_string())]
    );
}

#[test]
fn two_node_cycle_reports_exactly_one_cycle() {
    let flow = Flow::new(
        "f",
        "a",
        vec![
            FlowNode::new("a", "a").next("b"),
            FlowNode::new("b", "b").next("a"),
        ],
    )
    .expect("flow");
    let report = validate(flow);
    assert!(!report.is_valid());

    let cycles: Vec<&[String]> = report.cycles().collect();
    assert_eq!(cycles.len(), 1);
    let mut members: Vec<&str> = cycles[0].iter().map(String::as_str).collect();
    members.sort_unstable();
    assert_eq!(members, ["a", "b"]);
}

#[test]
fn self_loop_is_a_cycle() {
    let flow = Flow::new("f", "a", vec![FlowNode::new("a", "a").next("a")]).expect("flow");
    let report = validate(flow);
    let cycles: Vec<&[String]> = report.cycles().collect();
    assert_eq!(cycles.len(), 1);
    assert_eq!(cycles[0], ["a".to_string()]);
}

#[test]
fn branch_only_cycle_is_detected_structurally() {
    // The branch condition could never be true at runtime; validation
    // assumes any condition is satisfiable.
    let flow = Flow::new(
        "f",
        "a",
        vec![
            FlowNode::new("a", "a").next("b"),
            FlowNode::new("b", "b")
                .branch(Branch::new("back", "a", ConditionRule::is_answered("never"), 0)),
        ],
    )
    .expect("flow");
    let report = validate(flow);
    assert_eq!(report.cycles().count(), 1);
}

#[test]
fn duplicate_node_ids_are_rejected_at_construction() {
    let err = Flow::new(
        "f",
        "a",
        vec![FlowNode::new("a", "a"), FlowNode::new("a", "other")],
    )
    .expect_err("duplicates must fail");
    assert_eq!(err, FlowError::DuplicateNodeId("a".to_string()));
}
