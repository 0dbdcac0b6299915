use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable row identifier. The server hands out numeric ids today, but the
/// contract only promises "number or string".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for RowId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowId::Number(n) => write!(f, "{}", n),
            RowId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl RowId {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RowId::Number),
            Value::String(s) => Some(RowId::Text(s.clone())),
            _ => None,
        }
    }
}

/// A dynamic row as returned by the remote API.
///
/// The server owns the shape; the client only relies on `id` and the
/// soft-delete flag `eliminado`, everything else is looked up by column key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Map<String, Value>);

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Resolve a dotted column key (`"estado.nombre"`) by walking nested
    /// objects. A missing intermediate segment yields `None`, never an error.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.0.get(first)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        match current {
            Value::Null => None,
            other => Some(other),
        }
    }

    pub fn id(&self) -> Option<RowId> {
        self.0.get("id").and_then(RowId::from_value)
    }

    /// Soft-delete flag. Purely cosmetic: flagged rows stay listed and their
    /// actions stay reachable, only the presentation is muted.
    pub fn eliminado(&self) -> bool {
        self.0.get("eliminado").and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Row {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Row> for Value {
    fn from(row: Row) -> Self {
        Value::Object(row.0)
    }
}
