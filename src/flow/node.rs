use crate::condition::ConditionRule;
use serde::{Deserialize, Serialize};

/// The question payload carried by a node.
///
/// The engine only ever reads `id`, `field_name`, `required` and `show_if`;
/// everything else (labels, widget hints, help text, ...) rides along in
/// `extra` and passes through untouched for the rendering layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub field_name: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_if: Option<ConditionRule>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Question {
    pub fn new(id: impl Into<String>, field_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            field_name: field_name.into(),
            required: false,
            show_if: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn show_if(mut self, condition: ConditionRule) -> Self {
        self.show_if = Some(condition);
        self
    }
}

/// A prioritized conditional edge that overrides the default next link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Branch {
    pub id: String,
    pub target_id: String,
    pub condition: ConditionRule,
    #[serde(default)]
    pub priority: i32,
}

impl Branch {
    pub fn new(
        id: impl Into<String>,
        target_id: impl Into<String>,
        condition: ConditionRule,
        priority: i32,
    ) -> Self {
        Self {
            id: id.into(),
            target_id: target_id.into(),
            condition,
            priority,
        }
    }
}

/// One question's position in the flow graph.
///
/// All links are expressed as node ids; the [`Flow`](super::Flow) arena
/// resolves them, so nodes never hold references to each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowNode {
    pub id: String,
    pub question: Question,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_next_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_previous_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub branches: Vec<Branch>,
    #[serde(default)]
    pub is_terminal: bool,
}

impl FlowNode {
    /// Creates a node whose question id matches the node id, the common case.
    pub fn new(id: impl Into<String>, field_name: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            question: Question::new(id.clone(), field_name),
            id,
            default_next_id: None,
            default_previous_id: None,
            branches: Vec::new(),
            is_terminal: false,
        }
    }

    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.default_next_id = Some(id.into());
        self
    }

    pub fn previous(mut self, id: impl Into<String>) -> Self {
        self.default_previous_id = Some(id.into());
        self
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branches.push(branch);
        self
    }

    pub fn terminal(mut self) -> Self {
        self.is_terminal = true;
        self
    }

    pub fn with_question(mut self, question: Question) -> Self {
        self.question = question;
        self
    }

    /// Branches in evaluation order: descending priority, declaration order
    /// on ties (stable sort).
    pub fn branches_by_priority(&self) -> Vec<&Branch> {
        let mut ordered: Vec<&Branch> = self.branches.iter().collect();
        ordered.sort_by_key(|b| std::cmp::Reverse(b.priority));
        ordered
    }

    /// Every outgoing link target, default first, then branches as declared.
    pub fn outgoing_targets(&self) -> impl Iterator<Item = &str> {
        self.default_next_id
            .as_deref()
            .into_iter()
            .chain(self.branches.iter().map(|b| b.target_id.as_str()))
    }
}
