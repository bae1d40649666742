//! # Keiro - Questionnaire Flow Traversal and Navigation Engine
//!
//! **Keiro** drives multi-step eligibility questionnaires: given a graph of
//! questions, an accumulating answer context, and declarative
//! show/branch/skip conditions, it decides which question appears next,
//! supports going back to exactly the previously shown question, and computes
//! live completion metrics.
//!
//! ## Core Workflow
//!
//! The engine is rendering-agnostic. It operates on an id-indexed [`Flow`]
//! graph and a flat answer context; input widgets, question text, and
//! persistence all stay with the hosting application. The primary workflow:
//!
//! 1.  **Build a Flow**: assemble [`FlowNode`]s (with default links,
//!     prioritized [`Branch`]es, and `show_if` conditions) into a [`Flow`].
//! 2.  **Validate**: run structural validation once at load time — dangling
//!     links and cycles are errors, orphan nodes are warnings.
//! 3.  **Start a session**: [`FlowSession::start`] seeds the status map and
//!     the history stack.
//! 4.  **Navigate**: record answers, then `next()` / `previous()` /
//!     `jump_to()`. Forward steps elide skipped and hidden questions;
//!     backward steps replay the history, not the graph's static links.
//!
//! [`Flow`]: crate::flow::Flow
//! [`FlowNode`]: crate::flow::FlowNode
//! [`Branch`]: crate::flow::Branch
//! [`FlowSession::start`]: crate::session::FlowSession::start
//!
//! ## Quick Start
//!
//! ```rust
//! use keiro::prelude::*;
//!
//! fn main() -> Result<()> {
//!     // A three-question flow with one conditional branch.
//!     let flow = Flow::new(
//!         "eligibility",
//!         "start",
//!         vec![
//!             FlowNode::new("start", "state").next("income"),
//!             FlowNode::new("income", "income").next("end").branch(Branch::new(
//!                 "high-income",
//!                 "review",
//!                 ConditionRule::greater_than("income", 5000.0),
//!                 10,
//!             )),
//!             FlowNode::new("review", "reviewNotes").next("end"),
//!             FlowNode::new("end", "confirmed").terminal(),
//!         ],
//!     )?;
//!
//!     let report = FlowEngine::new(flow.clone()).validate();
//!     assert!(report.is_valid());
//!
//!     let mut session = FlowSession::start(flow, "demo-session");
//!     assert_eq!(session.current_node_id(), "start");
//!
//!     session.answer_question("state", "CA");
//!     session.set_status("start", QuestionStatus::Answered);
//!     session.next()?;
//!
//!     session.answer_question("income", 6000.0);
//!     session.set_status("income", QuestionStatus::Answered);
//!     let step = session.next()?;
//!
//!     // The high-income branch overrode the default link.
//!     assert!(step.branch_taken);
//!     assert_eq!(step.target(), Some("review"));
//!
//!     let metrics = session.progress();
//!     println!("{} of {} questions answered", metrics.answered, metrics.total);
//!     Ok(())
//! }
//! ```

pub mod condition;
pub mod engine;
pub mod error;
pub mod flow;
pub mod navigation;
pub mod prelude;
pub mod progress;
pub mod session;
pub mod skip;
