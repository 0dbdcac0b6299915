use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::schema::{Column, ColumnKind};
use crate::table::row::Row;

/// Placeholder shown for absent or null cell values.
pub const FALLBACK_TEXT: &str = "Sin Valor";

/// Fixed numeric day/month/year + hour:minute display format.
const DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Render instruction for one table cell. The embedding front end decides
/// what a "swatch" looks like; this layer only dispatches on the column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellRender {
    Text(String),
    Swatch { color: String, label: String },
}

impl CellRender {
    /// Flattened textual form, convenient for assertions and plain output.
    pub fn as_text(&self) -> &str {
        match self {
            CellRender::Text(s) => s,
            CellRender::Swatch { label, .. } => label,
        }
    }
}

/// Resolve `column.key` on `row` and produce its render instruction.
pub fn render_cell(column: &Column, row: &Row) -> CellRender {
    let value = row.lookup(&column.key);

    match column.kind {
        ColumnKind::Color => match value {
            Some(v) => {
                let color = value_text(v);
                CellRender::Swatch { label: color.clone(), color }
            }
            None => CellRender::Text(FALLBACK_TEXT.to_string()),
        },
        ColumnKind::Date => match value {
            Some(v) => CellRender::Text(render_date(v)),
            None => CellRender::Text(FALLBACK_TEXT.to_string()),
        },
        ColumnKind::Text => match value {
            Some(v) => CellRender::Text(value_text(v)),
            None => CellRender::Text(FALLBACK_TEXT.to_string()),
        },
    }
}

/// Raw value as display text. Strings render unquoted; anything else falls
/// back to its JSON form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse a raw timestamp value and format it; unparseable values render as
/// their raw text so the user still sees something.
fn render_date(value: &Value) -> String {
    match parse_timestamp(value) {
        Some(dt) => dt.format(DATE_FORMAT).to_string(),
        None => value_text(value),
    }
}

fn parse_timestamp(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => {
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc).naive_utc());
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().and_then(|d| d.and_hms_opt(0, 0, 0))
        }
        // Numeric timestamps arrive as epoch milliseconds
        Value::Number(n) => {
            n.as_i64().and_then(|ms| DateTime::from_timestamp_millis(ms)).map(|dt| dt.naive_utc())
        }
        _ => None,
    }
}
