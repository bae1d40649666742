use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An answer value stored in the context.
///
/// Questionnaire answers are deliberately coarse: numbers, booleans, free
/// text, or "no answer". Condition rules compare against these directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    Null,
}

impl Value {
    /// Returns the numeric payload, if this value is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => write!(f, "{}", s),
            Value::Null => write!(f, "null"),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// The flat `field_name -> value` map that drives all condition evaluation.
///
/// The context is mutated only through explicit calls and is never cleared
/// automatically; an answer to a question that later leaves the active path
/// stays in the map until the caller removes it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerContext {
    fields: AHashMap<String, Value>,
}

impl AnswerContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets (or overwrites) a single field.
    pub fn set(&mut self, field_name: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field_name.into(), value.into());
    }

    pub fn get(&self, field_name: &str) -> Option<&Value> {
        self.fields.get(field_name)
    }

    /// Removes a field, returning its previous value.
    pub fn remove(&mut self, field_name: &str) -> Option<Value> {
        self.fields.remove(field_name)
    }

    pub fn contains(&self, field_name: &str) -> bool {
        self.fields.contains_key(field_name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    /// Rebuilds a context from persisted `(field, value)` pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, Value)>) -> Self {
        Self {
            fields: pairs.into_iter().collect(),
        }
    }

    /// Exports the context as `(field, value)` pairs for persistence.
    pub fn to_pairs(&self) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
