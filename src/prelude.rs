//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types from the keiro crate so that one
//! import brings in the whole working surface.
//!
//! # Example
//!
//! ```rust,no_run
//! use keiro::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/flow.json")?;
//! let flow: Flow = serde_json::from_str(&json)?;
//!
//! let report = FlowEngine::new(flow.clone()).validate();
//! assert!(report.is_valid());
//!
//! let mut session = FlowSession::start(flow, "session-1");
//! session.answer_question("income", 4200.0);
//! let step = session.next()?;
//! println!("landed on {:?}", step.target());
//! # Ok(())
//! # }
//! ```

// Graph model and answer context
pub use crate::flow::{AnswerContext, Branch, Flow, FlowDefinition, FlowNode, Question, Value};

// Condition evaluation
pub use crate::condition::{ConditionEvaluator, ConditionRule, EvalOutcome, RuleInterpreter};

// Traversal and navigation
pub use crate::engine::{
    FlowEngine, LinkKind, NavigationOutcome, ValidationIssue, ValidationReport,
};
pub use crate::navigation::NavigationManager;
pub use crate::skip::{SkipLogicManager, SkipRule};

// Progress metrics
pub use crate::progress::{ProgressCalculator, ProgressMetrics, QuestionStatus};

// Session surface
pub use crate::session::{
    Checkpoint, CheckpointManager, FlowSession, SessionSnapshot, TimeTracker,
};

// Error types
pub use crate::error::{FlowError, NavigationError};

// Collections commonly used with this crate
pub use ahash::{AHashMap, AHashSet};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
