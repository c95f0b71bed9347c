//! Function definition types for the expression catalog.
//!
//! This module provides `FunctionSpec`, the full description of one built-in
//! function: its signature and documentation (surfaced by hosting editors) and
//! its code-generation rule, a pure function from raw call-site argument
//! fragments to a Lua expression string.

/// Value kinds in the expression language's type vocabulary.
///
/// These describe declared parameter and return kinds for documentation and
/// default selection; no static type checking is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Decimal,
    Integer,
    Boolean,
    Date,
    DateTime,
    /// Any kind; used by polymorphic entries such as `If`.
    Generic,
}

impl ValueKind {
    /// The neutral Lua literal substituted for an absent argument of this kind.
    pub fn neutral_default(self) -> &'static str {
        match self {
            ValueKind::Text => "\"\"",
            ValueKind::Decimal | ValueKind::Integer => "0",
            ValueKind::Boolean => "false",
            ValueKind::Date | ValueKind::DateTime => "Date(\"1900-01-01\")",
            ValueKind::Generic => "nil",
        }
    }
}

/// One declared parameter of a catalog function. Position is significant.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Parameter name as shown in documentation (e.g., "n").
    pub name: &'static str,
    /// Declared value kind.
    pub kind: ValueKind,
    /// Optional human-readable description.
    pub description: Option<&'static str>,
    /// Whether the parameter must be supplied at the call site.
    pub mandatory: bool,
    /// Documented default literal for optional parameters.
    pub default: Option<&'static str>,
}

/// Raw argument fragments captured at one call site.
///
/// Fragments are unparsed source text between top-level commas, already
/// trimmed. Accessors supply the kind-appropriate neutral default when a
/// position is absent or empty, so every generation rule is total over
/// "argument present or absent".
pub struct ArgList<'a> {
    fragments: &'a [String],
}

impl<'a> ArgList<'a> {
    pub fn new(fragments: &'a [String]) -> Self {
        Self { fragments }
    }

    /// The raw fragment at `index`, if present and non-empty.
    pub fn raw(&self, index: usize) -> Option<&'a str> {
        self.fragments
            .get(index)
            .map(String::as_str)
            .filter(|f| !f.is_empty())
    }

    /// Numeric argument, defaulting to `0`.
    pub fn num(&self, index: usize) -> &'a str {
        self.raw(index)
            .unwrap_or(ValueKind::Decimal.neutral_default())
    }

    /// Text argument, defaulting to the empty Lua string literal.
    pub fn text(&self, index: usize) -> &'a str {
        self.raw(index).unwrap_or(ValueKind::Text.neutral_default())
    }

    /// Boolean argument, defaulting to `false`.
    pub fn boolean(&self, index: usize) -> &'a str {
        self.raw(index)
            .unwrap_or(ValueKind::Boolean.neutral_default())
    }

    /// Date or date-time argument, defaulting to the null date.
    pub fn date(&self, index: usize) -> &'a str {
        self.raw(index).unwrap_or(ValueKind::Date.neutral_default())
    }

    /// Argument of any kind, defaulting to `nil`.
    pub fn any(&self, index: usize) -> &'a str {
        self.raw(index)
            .unwrap_or(ValueKind::Generic.neutral_default())
    }

    /// Whether the fragment at `index` is the literal `True` token.
    ///
    /// Generation rules branch on this for optional flag parameters (e.g.,
    /// `Index`'s `searchFromEnd`), matching how the original catalog compared
    /// the raw fragment text rather than evaluating it.
    pub fn is_true(&self, index: usize) -> bool {
        self.raw(index)
            .is_some_and(|f| f.eq_ignore_ascii_case("true"))
    }

    /// Number of fragments supplied at the call site.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// A code-generation rule: raw argument fragments in, Lua expression out.
///
/// Rules never evaluate user text; they only compose it into a larger
/// expression string. Plain function pointers keep the catalog a closed,
/// auditable table rather than open-ended dynamic dispatch.
pub type GenRule = fn(&ArgList) -> String;

/// Definition of one catalog function: signature, documentation, and
/// code-generation rule.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
    /// Function name; the case-sensitive, whole-word match token.
    pub label: &'static str,
    /// Description of what the function does. May span several paragraphs.
    pub description: &'static str,
    /// Documentation group. Ungrouped entries are excluded from the grouped
    /// view but still matched by the transpiler.
    pub group: Option<&'static str>,
    /// Ordered parameter declarations.
    pub parameters: Vec<ParameterSpec>,
    /// Declared return kind.
    pub returns: ValueKind,
    /// Informal `Label(args) = expected` example strings. Every example must
    /// hold under result classification; the test suite executes them all.
    pub examples: Vec<&'static str>,
    /// Whether the function's value changes over time independent of its
    /// arguments, requiring periodic re-evaluation of any source that
    /// references it.
    pub volatile: bool,
    /// The code-generation rule.
    pub rule: GenRule,
}

impl FunctionSpec {
    /// Run the generation rule over raw call-site fragments.
    pub fn generate(&self, fragments: &[String]) -> String {
        (self.rule)(&ArgList::new(fragments))
    }

    /// Display signature, e.g. `Index(t, search, startIndex)`.
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.parameters.iter().map(|p| p.name).collect();
        format!("{}({})", self.label, params.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frags(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_for_absent_positions() {
        let fragments = frags(&["1"]);
        let args = ArgList::new(&fragments);
        assert_eq!(args.raw(0), Some("1"));
        assert_eq!(args.raw(1), None);
        assert_eq!(args.num(1), "0");
        assert_eq!(args.text(1), "\"\"");
        assert_eq!(args.boolean(1), "false");
        assert_eq!(args.any(1), "nil");
    }

    #[test]
    fn empty_fragment_counts_as_absent() {
        let fragments = frags(&["", "2"]);
        let args = ArgList::new(&fragments);
        assert_eq!(args.raw(0), None);
        assert_eq!(args.num(0), "0");
        assert_eq!(args.raw(1), Some("2"));
    }

    #[test]
    fn accessor_defaults_come_from_value_kinds() {
        let empty: Vec<String> = vec![];
        let args = ArgList::new(&empty);
        assert_eq!(args.num(0), ValueKind::Decimal.neutral_default());
        assert_eq!(args.text(0), ValueKind::Text.neutral_default());
        assert_eq!(args.boolean(0), ValueKind::Boolean.neutral_default());
        assert_eq!(args.date(0), ValueKind::Date.neutral_default());
        assert_eq!(args.any(0), ValueKind::Generic.neutral_default());
    }

    #[test]
    fn is_true_matches_source_token() {
        let fragments = frags(&["True", "true", "False", "1"]);
        let args = ArgList::new(&fragments);
        assert!(args.is_true(0));
        assert!(args.is_true(1));
        assert!(!args.is_true(2));
        assert!(!args.is_true(3));
        assert!(!args.is_true(9));
    }

    #[test]
    fn signature_lists_parameter_names() {
        let spec = FunctionSpec {
            label: "Mod",
            description: "remainder",
            group: Some("Math"),
            parameters: vec![
                ParameterSpec {
                    name: "n",
                    kind: ValueKind::Decimal,
                    description: None,
                    mandatory: true,
                    default: None,
                },
                ParameterSpec {
                    name: "m",
                    kind: ValueKind::Decimal,
                    description: None,
                    mandatory: true,
                    default: None,
                },
            ],
            returns: ValueKind::Decimal,
            examples: vec![],
            volatile: false,
            rule: |a| format!("({} % {})", a.num(0), a.num(1)),
        };
        assert_eq!(spec.signature(), "Mod(n, m)");
        assert_eq!(spec.generate(&frags(&["10", "3"])), "(10 % 3)");
    }
}
