//! Sandboxed execution of generated Lua expressions.
//!
//! Each evaluation runs in a fresh LuaJIT state loaded with only the `math`
//! and `string` stdlib subsets; loading and introspection globals are
//! shadowed out before execution. This is best-effort containment, not a
//! trust boundary — generated code from untrusted users must not be run
//! under this design.

mod classify;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use mlua::{Function, Lua, LuaOptions, StdLib, Value};
use thiserror::Error;

use crate::settings::RenderSettings;
use classify::{classify, DATETIME_MARKER};

/// Errors that can occur while executing generated code. These are recovered
/// locally and downgraded to "no result"; they never cross the public
/// boundary.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("lua error: {0}")]
    Lua(#[from] mlua::Error),
}

/// Execute generated code and render its classified result.
///
/// Never raises: execution faults and non-representable values both collapse
/// to `None`, with faults logged at diagnostic level only.
pub fn evaluate(code: &str) -> Option<String> {
    evaluate_with(code, &RenderSettings::default())
}

/// `evaluate` with custom boolean render labels.
pub fn evaluate_with(code: &str, render: &RenderSettings) -> Option<String> {
    match run(code, render) {
        Ok(result) => result,
        Err(err) => {
            tracing::debug!(error = %err, "expression evaluation failed");
            None
        }
    }
}

/// Execute generated code in a constrained scope and classify the result.
pub(crate) fn run(code: &str, render: &RenderSettings) -> Result<Option<String>, EvalError> {
    let code = code.trim();
    if code.is_empty() {
        return Ok(None);
    }
    let lua = sandbox()?;
    let value: Value = lua.load(code).set_name("expression").eval()?;
    Ok(classify(&value, render)?)
}

fn sandbox() -> mlua::Result<Lua> {
    let lua = Lua::new_with(StdLib::MATH | StdLib::STRING, LuaOptions::default())?;
    {
        let globals = lua.globals();
        for name in [
            "collectgarbage",
            "dofile",
            "load",
            "loadfile",
            "loadstring",
            "require",
            "rawequal",
            "rawget",
            "rawset",
            "getmetatable",
            "setmetatable",
        ] {
            globals.set(name, Value::Nil)?;
        }
        globals.set("True", true)?;
        globals.set("False", false)?;
        globals.set("Date", date_constructor(&lua)?)?;
    }
    Ok(lua)
}

/// The `Date` constructor injected into the sandbox. Parses
/// `YYYY-MM-DD[ HH:MM:SS[.mmm]]` and returns a table carrying the calendar
/// fields read by the date accessor functions plus the render marker.
fn date_constructor(lua: &Lua) -> mlua::Result<Function> {
    lua.create_function(|lua, text: String| {
        let text = text.trim();
        let (stamp, rendered) = parse_datetime(text).ok_or_else(|| {
            mlua::Error::external(format!("invalid date literal: {text:?}"))
        })?;
        let table = lua.create_table()?;
        table.set(DATETIME_MARKER, rendered)?;
        table.set("year", stamp.year())?;
        table.set("month", stamp.month())?;
        table.set("day", stamp.day())?;
        table.set("hour", stamp.hour())?;
        table.set("min", stamp.minute())?;
        table.set("sec", stamp.second())?;
        Ok(table)
    })
}

fn parse_datetime(text: &str) -> Option<(NaiveDateTime, String)> {
    if let Ok(stamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        let rendered = if stamp.nanosecond() == 0 {
            stamp.format("%Y-%m-%d %H:%M:%S").to_string()
        } else {
            stamp.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
        };
        return Some((stamp, rendered));
    }
    let date = NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()?;
    Some((date.and_time(NaiveTime::MIN), date.format("%Y-%m-%d").to_string()))
}
