//! Navigation manager behavior: forward skips, backward history replay,
//! jumps, and the skip-loop cap.
mod common;
use common::*;
use keiro::prelude::*;

#[test]
fn forward_then_backward_returns_to_origin() {
    let mut nav = manager(linear_flow(&["a", "b", "c"]));
    let context = AnswerContext::new();
    let history_before = nav.history().len();

    let forward = nav.navigate_forward("a", &context).expect("forward failed");
    assert_eq!(forward.target(), Some("b"));

    let backward = nav.navigate_backward("b").expect("backward failed");
    assert_eq!(backward.target(), Some("a"));
    assert_eq!(nav.history().len(), history_before);
}

#[test]
fn three_forward_three_backward() {
    let mut nav = manager(linear_flow(&["q1", "q2", "q3", "q4"]));
    let context = AnswerContext::new();

    for expected in ["q2", "q3", "q4"] {
        let current = nav.history().last().cloned().expect("history never empty");
        let step = nav.navigate_forward(&current, &context).expect("forward failed");
        assert_eq!(step.target(), Some(expected));
    }

    let mut landings = Vec::new();
    for _ in 0..3 {
        let current = nav.history().last().cloned().expect("history never empty");
        let step = nav.navigate_backward(&current).expect("backward failed");
        landings.push(step.target().expect("backward must land").to_string());
    }

    assert_eq!(landings, vec!["q3", "q2", "q1"]);
    assert_eq!(nav.history().len(), 1);
    assert_eq!(nav.history()[0], "q1");
}

#[test]
fn history_starts_at_start_node() {
    let nav = manager(income_flow());
    assert_eq!(nav.history(), ["start"]);
    assert!(!nav.can_go_back());
}

#[test]
fn branch_wins_over_default_when_met() {
    let mut nav = manager(income_flow());
    let context = context_with("income", 6000.0);

    let step = nav.navigate_forward("income", &context).expect("forward failed");
    assert!(step.branch_taken);
    assert_eq!(step.branch_id.as_deref(), Some("high-income"));
    assert_eq!(step.target(), Some("high"));
}

#[test]
fn default_link_taken_when_no_branch_met() {
    let mut nav = manager(income_flow());
    let context = context_with("income", 1000.0);

    let step = nav.navigate_forward("income", &context).expect("forward failed");
    assert!(!step.branch_taken);
    assert_eq!(step.branch_id, None);
    assert_eq!(step.target(), Some("end"));
}

#[test]
fn highest_priority_branch_wins_among_simultaneously_true() {
    let flow = Flow::new(
        "branchy",
        "a",
        vec![
            FlowNode::new("a", "a")
                .next("b")
                .branch(Branch::new("low", "c", ConditionRule::is_answered("x"), 1))
                .branch(Branch::new("high", "d", ConditionRule::is_answered("x"), 5)),
            FlowNode::new("b", "b").terminal(),
            FlowNode::new("c", "c").terminal(),
            FlowNode::new("d", "d").terminal(),
        ],
    )
    .expect("flow");
    let mut nav = manager(flow);
    let context = context_with("x", 1.0);

    let step = nav.navigate_forward("a", &context).expect("forward failed");
    assert_eq!(step.branch_id.as_deref(), Some("high"));
    assert_eq!(step.target(), Some("d"));
}

#[test]
fn equal_priority_resolves_by_declaration_order() {
    let flow = Flow::new(
        "tied",
        "a",
        vec![
            FlowNode::new("a", "a")
                .next("b")
                .branch(Branch::new("first", "c", ConditionRule::is_answered("x"), 3))
                .branch(Branch::new("second", "d", ConditionRule::is_answered("x"), 3)),
            FlowNode::new("b", "b").terminal(),
            FlowNode::new("c", "c").terminal(),
            FlowNode::new("d", "d").terminal(),
        ],
    )
    .expect("flow");
    let mut nav = manager(flow);
    let context = context_with("x", 1.0);

    let step = nav.navigate_forward("a", &context).expect("forward failed");
    assert_eq!(step.branch_id.as_deref(), Some("first"));
}

#[test]
fn skip_rule_elides_question() {
    let rules = vec![SkipRule::new(
        "no-children",
        ["q2"],
        ConditionRule::equals("hasChildren", false),
        0,
    )];
    let mut nav = manager_with_rules(linear_flow(&["q1", "q2", "q3"]), rules);
    let context = context_with("hasChildren", false);

    let step = nav.navigate_forward("q1", &context).expect("forward failed");
    assert_eq!(step.target(), Some("q3"));
    assert_eq!(step.questions_skipped, Some(vec!["q2".to_string()]));
}

#[test]
fn questions_skipped_is_absent_when_nothing_was_elided() {
    let mut nav = manager(linear_flow(&["q1", "q2"]));
    let context = AnswerContext::new();

    let step = nav.navigate_forward("q1", &context).expect("forward failed");
    assert_eq!(step.questions_skipped, None);
}

#[test]
fn hidden_question_is_elided_like_a_skip() {
    let flow = Flow::new(
        "hidden",
        "q1",
        vec![
            FlowNode::new("q1", "q1").next("q2"),
            FlowNode::new("q2", "q2")
                .next("q3")
                .with_question(
                    Question::new("q2", "q2").show_if(ConditionRule::equals("hasPets", true)),
                ),
            FlowNode::new("q3", "q3").terminal(),
        ],
    )
    .expect("flow");
    let mut nav = manager(flow);
    let context = context_with("hasPets", false);

    let step = nav.navigate_forward("q1", &context).expect("forward failed");
    assert_eq!(step.target(), Some("q3"));
    assert_eq!(step.questions_skipped, Some(vec!["q2".to_string()]));
}

#[test]
fn terminal_node_is_success_with_no_target() {
    let mut nav = manager(income_flow());
    let context = AnswerContext::new();

    let step = nav.navigate_forward("end", &context).expect("terminal is not an error");
    assert_eq!(step.target(), None);
    assert!(!nav.can_go_forward("end", &context));
}

#[test]
fn dead_end_is_no_next_node() {
    let flow = Flow::new(
        "dead-end",
        "a",
        vec![FlowNode::new("a", "a")],
    )
    .expect("flow");
    let mut nav = manager(flow);
    let context = AnswerContext::new();

    let err = nav.navigate_forward("a", &context).expect_err("no link must fail");
    assert_eq!(err, NavigationError::NoNextNode("a".to_string()));
}

#[test]
fn unknown_node_is_node_not_found() {
    let mut nav = manager(income_flow());
    let context = AnswerContext::new();

    let err = nav.navigate_forward("ghost", &context).expect_err("must fail");
    assert_eq!(err, NavigationError::NodeNotFound("ghost".to_string()));
}

#[test]
fn cyclic_skip_configuration_is_a_distinct_failure() {
    // b and c link to each other and both are skipped: the forward walk from
    // a can never land.
    let flow = Flow::new(
        "skip-cycle",
        "a",
        vec![
            FlowNode::new("a", "a").next("b"),
            FlowNode::new("b", "b").next("c"),
            FlowNode::new("c", "c").next("b"),
        ],
    )
    .expect("flow");
    let rules = vec![SkipRule::new(
        "always",
        ["b", "c"],
        ConditionRule::equals("anything", Value::Null),
        0,
    )];
    let mut nav = manager_with_rules(flow, rules);
    let context = AnswerContext::new();

    let err = nav.navigate_forward("a", &context).expect_err("must detect the loop");
    assert!(matches!(err, NavigationError::SkipLoopDetected { .. }));
}

#[test]
fn jump_appends_to_history_and_never_trims() {
    let mut nav = manager(linear_flow(&["q1", "q2", "q3"]));
    let context = AnswerContext::new();

    nav.navigate_forward("q1", &context).expect("forward failed");
    nav.jump_to("q3").expect("jump failed");
    assert_eq!(nav.history(), ["q1", "q2", "q3"]);

    nav.jump_to("q1").expect("jump failed");
    assert_eq!(nav.history(), ["q1", "q2", "q3", "q1"]);
}

#[test]
fn backward_after_drift_truncates_to_last_occurrence() {
    let mut nav = manager(linear_flow(&["q1", "q2", "q3", "q4"]));
    let context = AnswerContext::new();

    nav.navigate_forward("q1", &context).expect("forward failed");
    nav.navigate_forward("q2", &context).expect("forward failed");
    // History is [q1, q2, q3]. The caller drifted back to q2 without telling
    // the manager.
    let step = nav.navigate_backward("q2").expect("backward failed");
    assert_eq!(step.target(), Some("q1"));
    assert_eq!(nav.history(), ["q1"]);
}

#[test]
fn backward_falls_back_to_static_link_when_history_is_cold() {
    let mut nav = manager(linear_flow(&["q1", "q2", "q3"]));

    // q3 was never visited through this manager, so only its static
    // previous link can answer.
    let step = nav.navigate_backward("q3").expect("fallback failed");
    assert_eq!(step.target(), Some("q2"));
    // q3 is nowhere in history: the stack is left untouched.
    assert_eq!(nav.history(), ["q1"]);
}

#[test]
fn backward_at_start_fails() {
    let mut nav = manager(linear_flow(&["q1", "q2"]));
    let err = nav.navigate_backward("q1").expect_err("start has no previous");
    assert_eq!(err, NavigationError::NoPreviousNode("q1".to_string()));
}

#[test]
fn can_go_forward_reflects_links_and_terminality() {
    let nav = manager(income_flow());
    let context = AnswerContext::new();

    assert!(nav.can_go_forward("start", &context));
    assert!(!nav.can_go_forward("end", &context));
    assert!(!nav.can_go_forward("ghost", &context));
}

#[test]
fn skip_set_is_recomputed_from_fresh_context() {
    let rules = vec![SkipRule::new(
        "no-children",
        ["q2"],
        ConditionRule::equals("hasChildren", false),
        0,
    )];
    let mut nav = manager_with_rules(linear_flow(&["q1", "q2", "q3"]), rules);

    // First pass: rule met, q2 elided.
    let context = context_with("hasChildren", false);
    let step = nav.navigate_forward("q1", &context).expect("forward failed");
    assert_eq!(step.target(), Some("q3"));

    // The answer changed; the same step now lands on q2.
    let context = context_with("hasChildren", true);
    let step = nav.navigate_forward("q1", &context).expect("forward failed");
    assert_eq!(step.target(), Some("q2"));
}
