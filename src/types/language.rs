//! Language descriptors binding a function catalog, keyword list, and
//! comment token under one identifier.

use std::collections::HashMap;

use regex::Regex;

use super::function::FunctionSpec;

/// An editor keyword with its insertable snippet text.
///
/// Keywords are consumed only by presentation layers (completion, snippets);
/// the transpiler never interprets them.
#[derive(Debug, Clone)]
pub struct KeywordSpec {
    pub label: &'static str,
    pub insert_text: &'static str,
}

/// A named bundle of function catalog, keywords, and line-comment token.
///
/// Multiple languages may coexist; the transpiler is parameterized by which
/// one is active for a given snippet. Built once at startup and immutable
/// afterwards. Catalog order is significant: it determines match precedence
/// during transpilation.
#[derive(Debug)]
pub struct LanguageSpec {
    id: &'static str,
    functions: Vec<FunctionSpec>,
    keywords: Vec<KeywordSpec>,
    line_comment: &'static str,
    /// Label -> position in `functions`, for O(1) lookup.
    index: HashMap<&'static str, usize>,
    /// Call-site matcher per function, parallel to `functions`.
    matchers: Vec<Regex>,
    /// Whole-word matcher over all volatile labels, if any.
    volatile_pattern: Option<Regex>,
}

impl LanguageSpec {
    pub fn new(
        id: &'static str,
        functions: Vec<FunctionSpec>,
        keywords: Vec<KeywordSpec>,
        line_comment: &'static str,
    ) -> Self {
        let index = functions
            .iter()
            .enumerate()
            .map(|(i, f)| (f.label, i))
            .collect();
        let matchers = functions.iter().map(|f| call_pattern(f.label)).collect();
        let volatile_labels: Vec<String> = functions
            .iter()
            .filter(|f| f.volatile)
            .map(|f| regex::escape(f.label))
            .collect();
        let volatile_pattern = if volatile_labels.is_empty() {
            None
        } else {
            Some(Regex::new(&format!(r"\b(?:{})\b", volatile_labels.join("|"))).unwrap())
        };
        Self {
            id,
            functions,
            keywords,
            line_comment,
            index,
            matchers,
            volatile_pattern,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    /// All catalog functions in declaration (match-precedence) order.
    pub fn functions(&self) -> &[FunctionSpec] {
        &self.functions
    }

    pub fn keywords(&self) -> &[KeywordSpec] {
        &self.keywords
    }

    pub fn line_comment(&self) -> &'static str {
        self.line_comment
    }

    /// Look up a catalog function by its exact label.
    pub fn lookup(&self, label: &str) -> Option<&FunctionSpec> {
        self.index.get(label).map(|&i| &self.functions[i])
    }

    /// Catalog functions paired with their precompiled call-site matchers,
    /// in match-precedence order.
    pub(crate) fn matchers(&self) -> impl Iterator<Item = (&FunctionSpec, &Regex)> {
        self.functions.iter().zip(self.matchers.iter())
    }

    /// Whole-word matcher over the volatile function labels, if the catalog
    /// declares any.
    pub(crate) fn volatile_pattern(&self) -> Option<&Regex> {
        self.volatile_pattern.as_ref()
    }

    /// Functions grouped by their `group` label for documentation display.
    ///
    /// Groups appear in first-occurrence order and members keep catalog
    /// order. Ungrouped entries are excluded from this view but remain
    /// matchable by the transpiler.
    pub fn grouped(&self) -> Vec<(&'static str, Vec<&FunctionSpec>)> {
        let mut groups: Vec<(&'static str, Vec<&FunctionSpec>)> = Vec::new();
        for func in &self.functions {
            let Some(group) = func.group else { continue };
            match groups.iter_mut().find(|(g, _)| *g == group) {
                Some((_, members)) => members.push(func),
                None => groups.push((group, vec![func])),
            }
        }
        groups
    }
}

/// Whole-word call pattern: the label, optional whitespace, an opening
/// parenthesis, and an argument span matched up to the first closing
/// parenthesis. Parentheses are not balanced, so nested calls can be
/// mis-split; catalog ordering only partially mitigates this.
fn call_pattern(label: &str) -> Regex {
    Regex::new(&format!(r"\b{}\s*\(([^)]*)\)", regex::escape(label))).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::function::ValueKind;

    fn spec(label: &'static str, group: Option<&'static str>) -> FunctionSpec {
        FunctionSpec {
            label,
            description: "test entry",
            group,
            parameters: vec![],
            returns: ValueKind::Decimal,
            examples: vec![],
            volatile: false,
            rule: |_| "0".to_string(),
        }
    }

    fn lang() -> LanguageSpec {
        LanguageSpec::new(
            "test",
            vec![
                spec("Alpha", Some("Math")),
                spec("Beta", Some("Text")),
                spec("Gamma", Some("Math")),
                spec("Delta", None),
            ],
            vec![KeywordSpec {
                label: "True",
                insert_text: "True",
            }],
            "//",
        )
    }

    #[test]
    fn lookup_by_label() {
        let lang = lang();
        assert_eq!(lang.lookup("Beta").map(|f| f.label), Some("Beta"));
        assert!(lang.lookup("beta").is_none());
        assert!(lang.lookup("Missing").is_none());
    }

    #[test]
    fn functions_keep_declaration_order() {
        let lang = lang();
        let labels: Vec<_> = lang.functions().iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["Alpha", "Beta", "Gamma", "Delta"]);
    }

    #[test]
    fn grouped_preserves_order_and_skips_ungrouped() {
        let lang = lang();
        let grouped = lang.grouped();
        let summary: Vec<(_, Vec<_>)> = grouped
            .iter()
            .map(|(g, members)| (*g, members.iter().map(|f| f.label).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("Math", vec!["Alpha", "Gamma"]),
                ("Text", vec!["Beta"]),
            ]
        );
    }
}
