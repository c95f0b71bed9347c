//! Transpiler and live evaluator for the OutSystems expression language.
//!
//! A fixed catalog of built-in functions emulates the OutSystems expression
//! syntax. Source text is rewritten call site by call site into Lua
//! ([`transpile`]), executed in a sandboxed LuaJIT state ([`evaluate`]), and
//! the result rendered by runtime value kind. Snippets referencing
//! time-volatile functions ([`is_volatile`]) are re-evaluated on a periodic
//! timer by a [`Session`].
//!
//! ```
//! use osexpr::{evaluate, outsystems, transpile};
//!
//! let code = transpile(outsystems(), "Abs(-10.89)");
//! assert_eq!(code, "math.abs(-10.89)");
//! assert_eq!(evaluate(&code), Some("10.89".to_string()));
//! ```

mod eval;
mod session;
mod settings;
mod transpile;
mod types;

pub use eval::{evaluate, evaluate_with, EvalError};
pub use session::{Session, SessionId, SessionPhase, SessionStore};
pub use settings::{discover_settings, load_settings, RefreshSettings, RenderSettings, Settings};
pub use transpile::{is_volatile, transpile};
pub use types::{
    outsystems, ArgList, FunctionSpec, GenRule, KeywordSpec, LanguageSpec, ParameterSpec, ValueKind,
};

/// All catalog functions of `lang` in declaration order.
pub fn list_functions(lang: &LanguageSpec) -> &[FunctionSpec] {
    lang.functions()
}

/// Catalog functions grouped by their `group` label for documentation
/// display. Ungrouped entries are excluded but remain matchable by the
/// transpiler.
pub fn grouped_functions(lang: &LanguageSpec) -> Vec<(&'static str, Vec<&FunctionSpec>)> {
    lang.grouped()
}
