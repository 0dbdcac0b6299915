use serde::{Deserialize, Serialize};

/// Rendering hint for a table column.
///
/// The tag is a closed sum - the cell renderer dispatches on it instead of
/// comparing ad hoc strings. Unknown hints in declarative input fail to
/// deserialize rather than silently degrading to text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    #[default]
    Text,
    Date,
    Color,
}

/// One column of a CRUD screen.
///
/// `key` must resolve to a field of the row entity; dotted paths walk nested
/// objects (e.g. `"estado.nombre"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub key: String,
    pub label: String,
    #[serde(default, rename = "type")]
    pub kind: ColumnKind,
}

impl Column {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self { key: key.into(), label: label.into(), kind: ColumnKind::Text }
    }

    pub fn with_kind(key: impl Into<String>, label: impl Into<String>, kind: ColumnKind) -> Self {
        Self { key: key.into(), label: label.into(), kind }
    }

    /// The identifier column is exempt from required-field validation.
    pub fn is_identifier(&self) -> bool {
        self.key == "id"
    }
}

/// Declarative description of one CRUD screen.
///
/// `tabla` and `accion` name the grant required to reach the screen; the
/// remaining fields drive the generic table controller against `endpoint`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrudSchema {
    pub titulo: String,
    pub endpoint: String,
    pub tabla: String,
    pub accion: String,
    pub columns: Vec<Column>,
}

impl CrudSchema {
    /// Columns subject to required-field validation on submit.
    pub fn editable_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_identifier())
    }
}

/// Ordered, immutable list of CRUD screens.
///
/// Built once at startup and consumed by route generation; never mutated
/// afterwards.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: Vec<CrudSchema>,
}

impl SchemaRegistry {
    pub fn new(schemas: Vec<CrudSchema>) -> Self {
        Self { schemas }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CrudSchema> {
        self.schemas.iter()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// Look up a schema by its logical resource name.
    pub fn by_tabla(&self, tabla: &str) -> Option<&CrudSchema> {
        self.schemas.iter().find(|s| s.tabla == tabla)
    }
}
