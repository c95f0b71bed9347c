//! Result classification and rendering.
//!
//! Execution results are classified by runtime value kind, in priority
//! order: text is returned verbatim; finite numbers render as canonical
//! decimal text; date values render as `#<textual form>#`; booleans render
//! with the configured labels; anything else (nil, NaN, non-finite numbers,
//! plain tables, functions) is "no result" — a normal outcome, not an error.

use mlua::{Table, Value};

use crate::settings::RenderSettings;

/// Marker key identifying a value produced by the sandbox `Date` constructor.
/// Holds the canonical textual form used for rendering.
pub(crate) const DATETIME_MARKER: &str = "__datetime";

pub(crate) fn classify(value: &Value, render: &RenderSettings) -> mlua::Result<Option<String>> {
    match value {
        Value::String(s) => Ok(Some(s.to_str()?.to_string())),
        Value::Integer(i) => Ok(Some(i.to_string())),
        Value::Number(n) => Ok(render_number(*n)),
        Value::Table(t) => render_datetime(t),
        Value::Boolean(b) => Ok(Some(if *b {
            render.true_label.clone()
        } else {
            render.false_label.clone()
        })),
        _ => Ok(None),
    }
}

/// Canonical decimal text: shortest round-trip form, no exponent for the
/// value ranges the catalog produces, no negative zero.
fn render_number(n: f64) -> Option<String> {
    if !n.is_finite() {
        return None;
    }
    if n == 0.0 {
        return Some("0".to_string());
    }
    Some(format!("{n}"))
}

fn render_datetime(table: &Table) -> mlua::Result<Option<String>> {
    let marker: Option<String> = table.get(DATETIME_MARKER)?;
    Ok(marker.map(|text| format!("#{text}#")))
}
