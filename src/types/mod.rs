//! Core data model: value kinds, function descriptors, and language
//! descriptors.

mod builtins;
mod function;
mod language;

pub use builtins::outsystems;
pub use function::{ArgList, FunctionSpec, GenRule, ParameterSpec, ValueKind};
pub use language::{KeywordSpec, LanguageSpec};
