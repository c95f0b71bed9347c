//! Call-site transpilation from expression source text to Lua.
//!
//! The transpiler is a scan-and-replace rewriter, not a parser: each catalog
//! function is applied once, in declaration order, over the accumulating
//! result string. Unmatched text passes through unchanged and must already be
//! valid Lua expression syntax (literals, operators, parentheses,
//! identifiers). Argument spans are matched non-greedily up to the first
//! closing parenthesis, so deeply nested calls can be mis-split; this
//! replicates the reference behavior rather than silently fixing it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::types::LanguageSpec;

/// `#...#` date and date-time literals, e.g. `#2015-05-21 22:20:30#`. The
/// payload must start with a `YYYY-MM-DD` shape so that stray `#` characters
/// in generated code (e.g. the `&#39;` entity emitted by `EncodeHtml`) are
/// not mistaken for literals.
static DATETIME_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#\s*(\d{4}-\d{2}-\d{2}[^#\n]*?)\s*#").unwrap());

/// Rewrite `source` into Lua by replacing recognized function calls with
/// their generated expressions. Pure and deterministic, except for rules
/// that intentionally embed wall-clock text (`CurrDate`, `CurrDateTime`).
pub fn transpile(lang: &LanguageSpec, source: &str) -> String {
    let mut result = source.to_string();
    for (func, matcher) in lang.matchers() {
        result = matcher
            .replace_all(&result, |caps: &Captures| {
                let fragments = split_arguments(&caps[1]);
                func.generate(&fragments)
            })
            .into_owned();
    }
    // Date literals are rewritten after the function passes so that a
    // literal inside a call's argument span is still paren-free when the
    // non-balancing matcher captures it.
    rewrite_date_literals(&result)
}

/// Rewrite `#...#` date literals outside double-quoted spans into `Date(..)`
/// constructor calls. Quoted spans are skipped with the same `""` escape rule
/// as `split_arguments`, plus Lua's `\"` for quotes inside already-generated
/// string literals, so a date-shaped `#...#` inside a Text literal passes
/// through untouched.
fn rewrite_date_literals(code: &str) -> String {
    let bytes = code.as_bytes();
    let mut out = String::with_capacity(code.len());
    let mut in_string = false;
    let mut copied = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'"' if in_string && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'"' => {
                in_string = !in_string;
                i += 1;
            }
            b'\\' if in_string && bytes.get(i + 1) == Some(&b'"') => i += 2,
            b'#' if !in_string => {
                match DATETIME_LITERAL.captures_at(code, i) {
                    Some(caps) if caps.get(0).is_some_and(|m| m.start() == i) => {
                        let whole = caps.get(0).map(|m| m.end()).unwrap_or(i + 1);
                        out.push_str(&code[copied..i]);
                        out.push_str("Date(\"");
                        out.push_str(&caps[1]);
                        out.push_str("\")");
                        i = whole;
                        copied = i;
                    }
                    _ => i += 1,
                }
            }
            _ => i += 1,
        }
    }
    out.push_str(&code[copied..]);
    out
}

/// Whether `source` contains a whole-word reference to any catalog function
/// flagged as time-volatile. Governs the session refresh timer.
pub fn is_volatile(lang: &LanguageSpec, source: &str) -> bool {
    lang.volatile_pattern()
        .is_some_and(|pattern| pattern.is_match(source))
}

/// Split a captured argument span on top-level commas.
///
/// Commas inside double-quoted Text literals (where `""` escapes a quote)
/// and inside nested parentheses do not split. Pieces are trimmed and empty
/// trailing pieces dropped, so omitted trailing optional arguments surface
/// as absent fragments.
fn split_arguments(span: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut depth = 0u32;
    let mut in_string = false;
    let mut chars = span.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_string => {
                if chars.peek() == Some(&'"') {
                    // "" is an escaped quote inside a Text literal
                    current.push('"');
                    current.push('"');
                    chars.next();
                } else {
                    in_string = false;
                    current.push('"');
                }
            }
            '"' => {
                in_string = true;
                current.push('"');
            }
            '(' if !in_string => {
                depth += 1;
                current.push('(');
            }
            ')' if !in_string => {
                depth = depth.saturating_sub(1);
                current.push(')');
            }
            ',' if !in_string && depth == 0 => {
                parts.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    parts.push(current.trim().to_string());

    while parts.last().is_some_and(|p| p.is_empty()) {
        parts.pop();
    }
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::outsystems;

    #[test]
    fn rewrites_simple_call() {
        assert_eq!(transpile(outsystems(), "Abs(-10.89)"), "math.abs(-10.89)");
    }

    #[test]
    fn rewrites_multiple_calls_of_one_label() {
        assert_eq!(
            transpile(outsystems(), "Abs(-1) + Abs(-2)"),
            "math.abs(-1) + math.abs(-2)"
        );
    }

    #[test]
    fn passes_unmatched_text_through() {
        assert_eq!(transpile(outsystems(), "1 + 2 * 3"), "1 + 2 * 3");
        assert_eq!(transpile(outsystems(), ""), "");
    }

    #[test]
    fn matching_is_whole_word() {
        // A function name must not match as a substring of another identifier.
        assert_eq!(transpile(outsystems(), "MyAbs(-1)"), "MyAbs(-1)");
        assert_eq!(transpile(outsystems(), "Concatenate(1)"), "Concatenate(1)");
    }

    #[test]
    fn matching_is_case_sensitive() {
        assert_eq!(transpile(outsystems(), "abs(-1)"), "abs(-1)");
    }

    #[test]
    fn commas_inside_strings_do_not_split() {
        assert_eq!(
            transpile(outsystems(), "Concat(\"a,b\", \"c\")"),
            "(tostring(\"a,b\") .. tostring(\"c\"))"
        );
    }

    #[test]
    fn escaped_quotes_do_not_end_the_literal() {
        assert_eq!(
            transpile(outsystems(), "Length(\"a\"\",b\")"),
            "string.len(\"a\"\",b\")"
        );
    }

    #[test]
    fn omitted_trailing_argument_uses_default() {
        assert_eq!(transpile(outsystems(), "Round(2.7)"), "math.floor(2.7 + 0.5)");
        assert_eq!(
            transpile(outsystems(), "Round(2.7, 1)"),
            "(math.floor(2.7 * 10 ^ (1) + 0.5) / 10 ^ (1))"
        );
        // An explicit trailing empty piece is dropped, not passed as "".
        assert_eq!(
            transpile(outsystems(), "Concat(\"a\",)"),
            "(tostring(\"a\") .. tostring(\"\"))"
        );
    }

    #[test]
    fn call_with_no_arguments_generates_defaults() {
        assert_eq!(
            transpile(outsystems(), "Concat()"),
            "(tostring(\"\") .. tostring(\"\"))"
        );
    }

    #[test]
    fn date_literals_become_constructor_calls() {
        assert_eq!(
            transpile(outsystems(), "#2015-07-14#"),
            "Date(\"2015-07-14\")"
        );
        assert_eq!(
            transpile(outsystems(), "Second(#2015-05-21 22:20:30#)"),
            "(Date(\"2015-05-21 22:20:30\")).sec"
        );
    }

    #[test]
    fn hash_signs_without_a_date_shape_are_left_alone() {
        assert_eq!(transpile(outsystems(), "\"#1 and #2\""), "\"#1 and #2\"");
        // EncodeHtml's generated code contains `&#39;`; two calls must not
        // have their `#` characters paired up into a bogus literal.
        let code = transpile(
            outsystems(),
            "Concat(EncodeHtml(\"a'\"), EncodeHtml(\"b'\"))",
        );
        assert!(!code.contains("Date("), "{code}");
    }

    #[test]
    fn date_shapes_inside_text_literals_are_left_alone() {
        assert_eq!(
            transpile(outsystems(), "\"#2015-07-14#\""),
            "\"#2015-07-14#\""
        );
        assert_eq!(
            transpile(outsystems(), "Length(\"#2015-07-14#\")"),
            "string.len(\"#2015-07-14#\")"
        );
        // An escaped quote does not end the span being skipped.
        assert_eq!(
            transpile(outsystems(), "\"a\"\"b #2015-07-14# c\""),
            "\"a\"\"b #2015-07-14# c\""
        );
        // Outside a literal the same shape is still rewritten.
        assert_eq!(
            transpile(outsystems(), "\"tag\" .. #2015-07-14#"),
            "\"tag\" .. Date(\"2015-07-14\")"
        );
    }

    #[test]
    fn accessor_over_constructor_survives_the_scanner() {
        // Year is declared before CurrDate, so the outer call is rewritten
        // first and the inner call is rewritten in a later pass.
        let code = transpile(outsystems(), "Year(CurrDate())");
        assert!(code.starts_with("(Date(\""), "{code}");
        assert!(code.ends_with("\").year)"), "{code}");
    }

    #[test]
    fn retranspiling_generated_code_is_identity() {
        for source in [
            "Abs(-10.89)",
            "Concat(\"First string\", \"last string\")",
            "If(True, 2.34, \"xpto\")",
            "Round(9.123456789, 5)",
            "Second(#2015-05-21 22:20:30#)",
        ] {
            let first = transpile(outsystems(), source);
            let second = transpile(outsystems(), &first);
            assert_eq!(first, second, "not idempotent for {source}");
        }
    }

    #[test]
    fn determinism_for_non_volatile_source() {
        let source = "Concat(\"a\", \"b\") + Abs(-1)";
        assert_eq!(
            transpile(outsystems(), source),
            transpile(outsystems(), source)
        );
    }

    #[test]
    fn volatility_requires_whole_word_reference() {
        let lang = outsystems();
        assert!(is_volatile(lang, "CurrDateTime()"));
        assert!(is_volatile(lang, "Second(CurrDateTime())"));
        assert!(!is_volatile(lang, "CurrDate()"));
        assert!(!is_volatile(lang, "MyCurrDateTime()"));
        assert!(!is_volatile(lang, ""));
    }

    #[test]
    fn split_respects_depth_and_trims() {
        assert_eq!(
            split_arguments("math.min(1, 2), 3"),
            vec!["math.min(1, 2)".to_string(), "3".to_string()]
        );
        assert_eq!(
            split_arguments(" 1 ,  2 "),
            vec!["1".to_string(), "2".to_string()]
        );
        assert!(split_arguments("").is_empty());
        assert!(split_arguments("  ").is_empty());
    }

    #[test]
    fn split_keeps_interior_empty_pieces() {
        // Only trailing empties are dropped; interior ones keep their
        // position so later arguments stay aligned.
        assert_eq!(
            split_arguments("1, , 3"),
            vec!["1".to_string(), String::new(), "3".to_string()]
        );
    }
}
