use crate::flow::{AnswerContext, Value};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::SystemTime;

/// A named snapshot of the answers at a point in the flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub node_id: String,
    pub answers: AHashMap<String, Value>,
    pub created_at: SystemTime,
}

/// An append-only, FIFO-capped checkpoint list.
///
/// When the cap is reached the oldest entry is evicted. Restoring hands out
/// a clone of the stored snapshot, never the live entry, so a restored
/// checkpoint can be mutated freely without corrupting the list.
#[derive(Debug, Clone)]
pub struct CheckpointManager {
    max_checkpoints: usize,
    checkpoints: VecDeque<Checkpoint>,
}

impl Default for CheckpointManager {
    fn default() -> Self {
        Self::new(50)
    }
}

impl CheckpointManager {
    /// A cap of zero is clamped to one; a manager that can hold nothing
    /// cannot honor append-only semantics.
    pub fn new(max_checkpoints: usize) -> Self {
        Self {
            max_checkpoints: max_checkpoints.max(1),
            checkpoints: VecDeque::new(),
        }
    }

    pub fn max_checkpoints(&self) -> usize {
        self.max_checkpoints
    }

    /// Snapshots the context and appends, evicting the oldest entries past
    /// the cap.
    pub fn save(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
        node_id: impl Into<String>,
        context: &AnswerContext,
    ) {
        while self.checkpoints.len() >= self.max_checkpoints {
            self.checkpoints.pop_front();
        }
        self.checkpoints.push_back(Checkpoint {
            name: name.into(),
            description,
            node_id: node_id.into(),
            answers: context.to_pairs().into_iter().collect(),
            created_at: SystemTime::now(),
        });
    }

    /// Returns a copy of the newest checkpoint with the given name.
    pub fn restore(&self, name: &str) -> Option<Checkpoint> {
        self.checkpoints
            .iter()
            .rev()
            .find(|checkpoint| checkpoint.name == name)
            .cloned()
    }

    pub fn latest(&self) -> Option<&Checkpoint> {
        self.checkpoints.back()
    }

    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }

    /// All checkpoints, oldest first.
    pub fn checkpoints(&self) -> impl Iterator<Item = &Checkpoint> {
        self.checkpoints.iter()
    }
}
