//! The flow graph model: nodes, links, branches, and the answer context.

mod context;
mod definition;
mod node;

pub use context::{AnswerContext, Value};
pub use definition::{Flow, FlowDefinition};
pub use node::{Branch, FlowNode, Question};
