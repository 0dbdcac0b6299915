use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::schema::CrudSchema;
use crate::table::row::Row;

/// Ephemeral create/edit/view form state: a partial row plus per-field
/// validation messages. Created when a modal opens, discarded on save,
/// cancel or close.
#[derive(Debug, Clone, Default)]
pub struct Draft {
    fields: Map<String, Value>,
    errors: HashMap<String, String>,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed from an existing row (edit/view).
    pub fn from_row(row: &Row) -> Self {
        Self { fields: row.fields().clone(), errors: HashMap::new() }
    }

    /// Update one field and clear that field's error. Errors for other
    /// fields stay until the next submit re-validates everything.
    pub fn set_field(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.errors.remove(&key);
        self.fields.insert(key, value);
    }

    /// Resolve a column key against the draft: flat entry first (form
    /// inputs write flat keys), then dotted traversal for rows seeded from
    /// the server.
    pub fn value_of(&self, key: &str) -> Option<&Value> {
        if let Some(value) = self.fields.get(key) {
            return match value {
                Value::Null => None,
                other => Some(other),
            };
        }
        if key.contains('.') {
            let mut segments = key.split('.');
            let first = segments.next()?;
            let mut current = self.fields.get(first)?;
            for segment in segments {
                current = current.as_object()?.get(segment)?;
            }
            return match current {
                Value::Null => None,
                other => Some(other),
            };
        }
        None
    }

    pub fn error_for(&self, key: &str) -> Option<&str> {
        self.errors.get(key).map(String::as_str)
    }

    pub fn errors(&self) -> &HashMap<String, String> {
        &self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate every non-identifier column of the schema. Each blank field
    /// gets exactly one message; returns true when the draft may be saved.
    pub fn validate(&mut self, schema: &CrudSchema) -> bool {
        let mut errors = HashMap::new();
        for column in schema.editable_columns() {
            if !self.field_is_present(&column.key) {
                errors.insert(
                    column.key.clone(),
                    format!("El campo {} es obligatorio", column.label),
                );
            }
        }
        let valid = errors.is_empty();
        self.errors = errors;
        valid
    }

    fn field_is_present(&self, key: &str) -> bool {
        match self.value_of(key) {
            None => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Request body: only the fields the form actually populated.
    pub fn body(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn clear(&mut self) {
        self.fields.clear();
        self.errors.clear();
    }
}
