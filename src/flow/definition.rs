use super::FlowNode;
use crate::error::FlowError;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// The serialized shape of a flow: an id, a start node, and a node list.
///
/// This is what flow authoring tools produce and what the CLI loads; it is
/// converted into the indexed [`Flow`] arena before any traversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowDefinition {
    pub id: String,
    pub start_node_id: String,
    pub nodes: Vec<FlowNode>,
}

/// The directed question graph for one questionnaire, as an id-indexed arena.
///
/// Nodes are stored in declaration order and addressed by id; every link in
/// the graph is an id, so cyclic references are representable without any
/// ownership gymnastics. Construction only enforces id uniqueness — dangling
/// links and unreachable nodes are the province of
/// [`FlowEngine::validate`](crate::engine::FlowEngine::validate), which runs
/// at load time rather than on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "FlowDefinition", into = "FlowDefinition")]
pub struct Flow {
    id: String,
    start_node_id: String,
    nodes: Vec<FlowNode>,
    index: AHashMap<String, usize>,
}

impl Flow {
    pub fn new(
        id: impl Into<String>,
        start_node_id: impl Into<String>,
        nodes: Vec<FlowNode>,
    ) -> Result<Self, FlowError> {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            if index.insert(node.id.clone(), position).is_some() {
                return Err(FlowError::DuplicateNodeId(node.id.clone()));
            }
        }
        Ok(Self {
            id: id.into(),
            start_node_id: start_node_id.into(),
            nodes,
            index,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn start_node_id(&self) -> &str {
        &self.start_node_id
    }

    pub fn get(&self, node_id: &str) -> Option<&FlowNode> {
        self.index.get(node_id).map(|&position| &self.nodes[position])
    }

    pub fn contains(&self, node_id: &str) -> bool {
        self.index.contains_key(node_id)
    }

    /// All nodes in declaration order.
    pub fn nodes(&self) -> &[FlowNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl TryFrom<FlowDefinition> for Flow {
    type Error = FlowError;

    fn try_from(definition: FlowDefinition) -> Result<Self, Self::Error> {
        Flow::new(definition.id, definition.start_node_id, definition.nodes)
    }
}

impl From<Flow> for FlowDefinition {
    fn from(flow: Flow) -> Self {
        FlowDefinition {
            id: flow.id,
            start_node_id: flow.start_node_id,
            nodes: flow.nodes,
        }
    }
}
