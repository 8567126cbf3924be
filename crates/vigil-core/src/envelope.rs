use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A raw, shape-unknown log record from an upstream producer.
///
/// Envelopes arrive in several shapes: a plain object with a free-text
/// `msg`, a search-engine hit nesting everything under `_source`, or a bare
/// string. The wrapper keeps the value opaque and offers path probing for
/// the fields the pipeline cares about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawLogEnvelope(pub Value);

impl RawLogEnvelope {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Resolve a dotted path against the envelope. A literal key wins over
    /// path traversal, so flat producers using keys like `rule.description`
    /// still resolve.
    pub fn path(&self, path: &str) -> Option<&Value> {
        lookup_path(&self.0, path)
    }

    /// Scalar at a dotted path, rendered as a string. Arrays and objects
    /// yield `None` here; the extraction layer joins those itself.
    pub fn str_at(&self, path: &str) -> Option<String> {
        self.path(path).and_then(scalar_to_string)
    }

    /// First non-empty scalar among candidate paths.
    pub fn first_str(&self, candidates: &[&str]) -> Option<String> {
        candidates.iter().find_map(|p| {
            self.str_at(p).filter(|s| !s.is_empty())
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl From<Value> for RawLogEnvelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// Dotted-path lookup on a JSON value. Tries the whole path as a literal
/// key first, then descends segment by segment.
pub fn lookup_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    if let Some(obj) = value.as_object() {
        if let Some(v) = obj.get(path) {
            return Some(v);
        }
    }
    let mut current = value;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Render a scalar JSON value as display text. Empty strings stay empty;
/// null, arrays and objects yield `None`.
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
