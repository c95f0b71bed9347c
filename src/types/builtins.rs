//! The OutSystems built-in function catalog.
//!
//! Each entry pairs the documented signature with a code-generation rule that
//! composes raw argument fragments into a Lua expression. Rules only ever
//! splice text; they never evaluate it. Correctness here is a data-entry
//! concern: every rule must produce well-formed Lua for every combination of
//! present and absent optional arguments, and every example string must hold
//! under result classification (the integration suite executes them all).
//!
//! Catalog order is match precedence for the transpiler. Date accessors are
//! declared before `CurrDate`/`CurrDateTime` so that `Year(CurrDate())`
//! survives the non-balancing call matcher.

use std::sync::LazyLock;

use chrono::Local;

use super::function::{FunctionSpec, ParameterSpec, ValueKind};
use super::language::{KeywordSpec, LanguageSpec};

fn req(name: &'static str, kind: ValueKind, description: &'static str) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        description: Some(description),
        mandatory: true,
        default: None,
    }
}

fn opt(
    name: &'static str,
    kind: ValueKind,
    description: &'static str,
    default: &'static str,
) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        description: Some(description),
        mandatory: false,
        default: Some(default),
    }
}

static OUTSYSTEMS: LazyLock<LanguageSpec> = LazyLock::new(|| {
    let functions = vec![
        // ==================== Math ====================
        FunctionSpec {
            label: "Abs",
            description: "Returns the absolute value (unsigned magnitude) of the decimal number 'n'.",
            group: Some("Math"),
            parameters: vec![req(
                "n",
                ValueKind::Decimal,
                "The number to extract the absolute value from.",
            )],
            returns: ValueKind::Decimal,
            examples: vec!["Abs(-10.89) = 10.89"],
            volatile: false,
            rule: |a| format!("math.abs({})", a.num(0)),
        },
        FunctionSpec {
            label: "Mod",
            description: "Returns the remainder of decimal division of 'n' by 'm'.",
            group: Some("Math"),
            parameters: vec![
                req("n", ValueKind::Decimal, "The dividend in the modulo operation."),
                req("m", ValueKind::Decimal, "The divisor in the modulo operation."),
            ],
            returns: ValueKind::Decimal,
            examples: vec!["Mod(10, 3) = 1", "Mod(4, 3.5) = 0.5"],
            volatile: false,
            rule: |a| format!("({} % {})", a.num(0), a.num(1)),
        },
        FunctionSpec {
            label: "Power",
            description: "Returns 'n' raised to the power of 'm'.",
            group: Some("Math"),
            parameters: vec![
                req("n", ValueKind::Decimal, "The base value."),
                req("m", ValueKind::Decimal, "The exponent value."),
            ],
            returns: ValueKind::Decimal,
            examples: vec!["Power(100, 2) = 10000", "Power(2, -2) = 0.25"],
            volatile: false,
            rule: |a| format!("(({}) ^ ({}))", a.num(0), a.num(1)),
        },
        FunctionSpec {
            label: "Round",
            description: "Returns the Decimal number 'n' rounded to a specific number of 'fractionalDigits'. \
                          Halves round away from zero for positive numbers.",
            group: Some("Math"),
            parameters: vec![
                req("n", ValueKind::Decimal, "The Decimal number to round."),
                opt(
                    "fractionalDigits",
                    ValueKind::Integer,
                    "The number of fractional digits that 'n' has to be rounded to.",
                    "0",
                ),
            ],
            returns: ValueKind::Decimal,
            examples: vec![
                "Round(-10.89) = -11",
                "Round(9.3) = 9",
                "Round(3.5) = 4",
                "Round(9.123456789, 5) = 9.12346",
            ],
            volatile: false,
            rule: |a| match a.raw(1) {
                Some(digits) => format!(
                    "(math.floor({n} * 10 ^ ({d}) + 0.5) / 10 ^ ({d}))",
                    n = a.num(0),
                    d = digits
                ),
                None => format!("math.floor({} + 0.5)", a.num(0)),
            },
        },
        FunctionSpec {
            label: "Sqrt",
            description: "Returns the square root of the Decimal number 'n'.",
            group: Some("Math"),
            parameters: vec![req(
                "n",
                ValueKind::Decimal,
                "The number to calculate the square root from.",
            )],
            returns: ValueKind::Decimal,
            examples: vec!["Sqrt(4) = 2", "Sqrt(2.25) = 1.5"],
            volatile: false,
            rule: |a| format!("math.sqrt({})", a.num(0)),
        },
        FunctionSpec {
            label: "Trunc",
            description: "Returns the Decimal number 'n' truncated to integer removing the decimal part of 'n'.",
            group: Some("Math"),
            parameters: vec![req("n", ValueKind::Decimal, "The number to truncate.")],
            returns: ValueKind::Decimal,
            examples: vec!["Trunc(-10.89) = -10", "Trunc(7.51) = 7"],
            volatile: false,
            rule: |a| format!("(math.modf({}))", a.num(0)),
        },
        // ==================== Numeric ====================
        FunctionSpec {
            label: "Max",
            description: "Returns the largest number of 'n' and 'm'.",
            group: Some("Numeric"),
            parameters: vec![
                req("n", ValueKind::Decimal, "The first number to compare."),
                req("m", ValueKind::Decimal, "The second number to compare."),
            ],
            returns: ValueKind::Decimal,
            examples: vec!["Max(-10.89, -2.3) = -2.3", "Max(10.89, 2.3) = 10.89"],
            volatile: false,
            rule: |a| format!("math.max({}, {})", a.num(0), a.num(1)),
        },
        FunctionSpec {
            label: "Min",
            description: "Returns the smallest number of 'n' and 'm'.",
            group: Some("Numeric"),
            parameters: vec![
                req("n", ValueKind::Decimal, "The first number to compare."),
                req("m", ValueKind::Decimal, "The second number to compare."),
            ],
            returns: ValueKind::Decimal,
            examples: vec!["Min(-10.89, -2.3) = -10.89", "Min(10.89, 2.3) = 2.3"],
            volatile: false,
            rule: |a| format!("math.min({}, {})", a.num(0), a.num(1)),
        },
        FunctionSpec {
            label: "Sign",
            description: "Returns -1 if 'n' is negative; 1 if 'n' is positive; 0 if 'n' is 0.",
            group: Some("Numeric"),
            parameters: vec![req(
                "n",
                ValueKind::Decimal,
                "The number from which to calculate the sign value.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Sign(-10.89) = -1", "Sign(2.3) = 1", "Sign(0.0) = 0"],
            volatile: false,
            rule: |a| {
                let n = a.num(0);
                format!("((({n}) > 0 and 1) or (({n}) < 0 and -1) or 0)")
            },
        },
        // ==================== Logic (ungrouped) ====================
        FunctionSpec {
            label: "If",
            description: "Returns 'trueValue' if 'condition' is True, otherwise returns 'falseValue'. \
                          Both branch expressions are part of the generated code.",
            group: None,
            parameters: vec![
                req("condition", ValueKind::Boolean, "The condition to test."),
                req("trueValue", ValueKind::Generic, "Value returned when the condition holds."),
                req("falseValue", ValueKind::Generic, "Value returned otherwise."),
            ],
            returns: ValueKind::Generic,
            examples: vec![
                "If(True, 2.34, \"xpto\") = 2.34",
                "If(False, 2.34, \"xpto\") = \"xpto\"",
            ],
            volatile: false,
            rule: |a| {
                format!(
                    "((function() if {} then return {} else return {} end end)())",
                    a.boolean(0),
                    a.any(1),
                    a.any(2)
                )
            },
        },
        // ==================== Text ====================
        FunctionSpec {
            label: "Chr",
            description: "Returns a single-character string corresponding to the 'c' character code.",
            group: Some("Text"),
            parameters: vec![req(
                "c",
                ValueKind::Integer,
                "The ASCII code value to be converted to a character.",
            )],
            returns: ValueKind::Text,
            examples: vec!["Chr(88) = \"X\""],
            volatile: false,
            rule: |a| format!("string.char({})", a.num(0)),
        },
        FunctionSpec {
            label: "Concat",
            description: "Returns the concatenation of two Texts: 't1' and 't2'.",
            group: Some("Text"),
            parameters: vec![
                req("t1", ValueKind::Text, "The first string."),
                req(
                    "t2",
                    ValueKind::Text,
                    "The string that will be appended to the first string in the output.",
                ),
            ],
            returns: ValueKind::Text,
            examples: vec![
                "Concat(\"First string\", \"last string\") = \"First stringlast string\"",
                "Concat(\"\", \"\") = \"\"",
            ],
            volatile: false,
            rule: |a| format!("(tostring({}) .. tostring({}))", a.text(0), a.text(1)),
        },
        FunctionSpec {
            label: "EncodeHtml",
            description: "Replaces special characters in a string so that you can use it in HTML literals. \
                          Use this function when using unescaped expressions that contain content provided by end-users.\n\
                          Warning: this only encodes strings for HTML literals; it does not protect against \
                          cross-site scripting or JavaScript injection on its own.",
            group: Some("Text"),
            parameters: vec![req("text", ValueKind::Text, "The Text to be encoded.")],
            returns: ValueKind::Text,
            examples: vec!["EncodeHtml(\"<>\") = \"&lt;&gt;\""],
            volatile: false,
            rule: |a| {
                format!(
                    "(string.gsub({}, \"[&<>\\\"'\\r\\n]\", {{ [\"&\"] = \"&amp;\", [\"<\"] = \"&lt;\", \
                     [\">\"] = \"&gt;\", [\"\\\"\"] = \"&quot;\", [\"'\"] = \"&#39;\", [\"\\r\"] = \"\", \
                     [\"\\n\"] = \"<br/>\" }}))",
                    a.text(0)
                )
            },
        },
        FunctionSpec {
            label: "EncodeJavaScript",
            description: "Replaces special characters in a string so that you can use it in JavaScript literals. \
                          Every character is rewritten to its hexadecimal escape form.",
            group: Some("Text"),
            parameters: vec![req("text", ValueKind::Text, "The Text to be encoded.")],
            returns: ValueKind::Text,
            examples: vec!["EncodeJavaScript(\"<>\") = \"\\x3c\\x3e\""],
            volatile: false,
            rule: |a| {
                format!(
                    "(string.gsub(tostring({}), \".\", function(c) return string.format(\"\\\\x%02x\", string.byte(c)) end))",
                    a.text(0)
                )
            },
        },
        FunctionSpec {
            label: "EncodeURL",
            description: "Replaces all non-alphanumeric characters in a string so that you can safely use it \
                          in URL parameter values, e.g. when dynamically building URLs to an external site.",
            group: Some("Text"),
            parameters: vec![req("text", ValueKind::Text, "The Text to be encoded.")],
            returns: ValueKind::Text,
            examples: vec![
                "EncodeURL(\" test\") = \"+test\"",
                "EncodeURL(\"<>\") = \"%3c%3e\"",
                "EncodeURL(\"1+2\") = \"1%2b2\"",
            ],
            volatile: false,
            rule: |a| {
                format!(
                    "(string.gsub({}, \"[^%w]\", function(c) if c == \" \" then return \"+\" end \
                     return string.format(\"%%%02x\", string.byte(c)) end))",
                    a.text(0)
                )
            },
        },
        FunctionSpec {
            label: "Index",
            description: "Returns the zero-based position in Text 't' where 'search' Text can be found. \
                          Returns -1 if 'search' is not found or if 'search' is empty.",
            group: Some("Text"),
            parameters: vec![
                req("t", ValueKind::Text, "The Text where the search Text can be found."),
                req("search", ValueKind::Text, "The Text string to be found."),
                opt(
                    "startIndex",
                    ValueKind::Integer,
                    "The zero-based index where the search starts.",
                    "0",
                ),
                opt(
                    "searchFromEnd",
                    ValueKind::Boolean,
                    "True to return the position of the last occurrence instead of the first.",
                    "False",
                ),
                opt(
                    "ignoreCase",
                    ValueKind::Boolean,
                    "True to treat lowercase and uppercase characters as equal.",
                    "False",
                ),
            ],
            returns: ValueKind::Integer,
            examples: vec![
                "Index(\"First string\", \"F\") = 0",
                "Index(\"First string\", \"st\") = 3",
                "Index(\"First string\", \"xx\") = -1",
                "Index(\"First string\", \"st\", 5) = 6",
                "Index(\"First string\", \"st\", 0, True) = 6",
                "Index(\"First string\", \"f\", 0, False, True) = 0",
                "Index(\"First string\", \"\") = -1",
            ],
            volatile: false,
            rule: |a| {
                let mut t = a.text(0).to_string();
                let mut search = a.text(1).to_string();
                let start = a.num(2);
                if a.is_true(4) {
                    t = format!("string.lower({t})");
                    search = format!("string.lower({search})");
                }
                if a.is_true(3) {
                    format!(
                        "((function() local t = {t} local s = {search} if s == \"\" then return -1 end \
                         local last = nil local i = string.find(t, s, 1, true) \
                         while i do last = i i = string.find(t, s, i + 1, true) end \
                         return (last or 0) - 1 end)())"
                    )
                } else {
                    format!(
                        "((function() local t = {t} local s = {search} if s == \"\" then return -1 end \
                         return (string.find(t, s, ({start}) + 1, true) or 0) - 1 end)())"
                    )
                }
            },
        },
        FunctionSpec {
            label: "Length",
            description: "Returns the number of characters in Text 't'.",
            group: Some("Text"),
            parameters: vec![req(
                "t",
                ValueKind::Text,
                "The Text to calculate the length of.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Length(\"First string\") = 12", "Length(\"\") = 0"],
            volatile: false,
            rule: |a| format!("string.len({})", a.text(0)),
        },
        FunctionSpec {
            label: "NewLine",
            description: "Returns a string containing the New Line (Return) character.",
            group: Some("Text"),
            parameters: vec![],
            returns: ValueKind::Text,
            examples: vec![],
            volatile: false,
            rule: |_| "\"\\r\\n\"".to_string(),
        },
        FunctionSpec {
            label: "Replace",
            description: "Returns Text 't' after replacing all occurrences of 'search' with 'replace'.",
            group: Some("Text"),
            parameters: vec![
                req("t", ValueKind::Text, "The Text to search in."),
                req("search", ValueKind::Text, "The Text to be replaced."),
                req("replace", ValueKind::Text, "The replacement Text."),
            ],
            returns: ValueKind::Text,
            examples: vec!["Replace(\"First string\", \"st\", \"xx\") = \"Firxx xxring\""],
            volatile: false,
            rule: |a| {
                format!(
                    "((function() local s = {search} if s == \"\" then return {t} end \
                     return (string.gsub({t}, (string.gsub(s, \"([^%w])\", \"%%%1\")), \
                     (string.gsub({replace}, \"%%\", \"%%%%\")))) end)())",
                    t = a.text(0),
                    search = a.text(1),
                    replace = a.text(2)
                )
            },
        },
        FunctionSpec {
            label: "Substr",
            description: "Returns a sub-string of 't' starting at the zero-based 'start' position \
                          with up to 'length' characters.",
            group: Some("Text"),
            parameters: vec![
                req("t", ValueKind::Text, "The Text to extract the sub-string from."),
                req("start", ValueKind::Integer, "The zero-based start position."),
                req("length", ValueKind::Integer, "The number of characters to extract."),
            ],
            returns: ValueKind::Text,
            examples: vec!["Substr(\"First string\", 6, 3) = \"str\""],
            volatile: false,
            rule: |a| {
                format!(
                    "string.sub({t}, ({s}) + 1, ({s}) + ({l}))",
                    t = a.text(0),
                    s = a.num(1),
                    l = a.num(2)
                )
            },
        },
        FunctionSpec {
            label: "ToLower",
            description: "Returns Text 't' with all characters converted to lowercase.",
            group: Some("Text"),
            parameters: vec![req("t", ValueKind::Text, "The Text to convert.")],
            returns: ValueKind::Text,
            examples: vec!["ToLower(\"First string\") = \"first string\""],
            volatile: false,
            rule: |a| format!("string.lower({})", a.text(0)),
        },
        FunctionSpec {
            label: "ToUpper",
            description: "Returns Text 't' with all characters converted to uppercase.",
            group: Some("Text"),
            parameters: vec![req("t", ValueKind::Text, "The Text to convert.")],
            returns: ValueKind::Text,
            examples: vec!["ToUpper(\"First string\") = \"FIRST STRING\""],
            volatile: false,
            rule: |a| format!("string.upper({})", a.text(0)),
        },
        FunctionSpec {
            label: "Trim",
            description: "Returns Text 't' without leading or trailing spaces.",
            group: Some("Text"),
            parameters: vec![req("t", ValueKind::Text, "The Text to trim.")],
            returns: ValueKind::Text,
            examples: vec!["Trim(\"  hello  \") = \"hello\""],
            volatile: false,
            rule: |a| format!("(string.gsub({}, \"^%s*(.-)%s*$\", \"%1\"))", a.text(0)),
        },
        FunctionSpec {
            label: "TrimEnd",
            description: "Returns Text 't' without trailing spaces.",
            group: Some("Text"),
            parameters: vec![req("t", ValueKind::Text, "The Text to trim.")],
            returns: ValueKind::Text,
            examples: vec!["TrimEnd(\"hello  \") = \"hello\""],
            volatile: false,
            rule: |a| format!("(string.gsub({}, \"%s+$\", \"\"))", a.text(0)),
        },
        FunctionSpec {
            label: "TrimStart",
            description: "Returns Text 't' without leading spaces.",
            group: Some("Text"),
            parameters: vec![req("t", ValueKind::Text, "The Text to trim.")],
            returns: ValueKind::Text,
            examples: vec!["TrimStart(\"  hello\") = \"hello\""],
            volatile: false,
            rule: |a| format!("(string.gsub({}, \"^%s+\", \"\"))", a.text(0)),
        },
        // ==================== Conversion ====================
        FunctionSpec {
            label: "BooleanToText",
            description: "Converts Boolean 'b' to Text, returning \"True\" or \"False\".",
            group: Some("Conversion"),
            parameters: vec![req("b", ValueKind::Boolean, "The Boolean to convert.")],
            returns: ValueKind::Text,
            examples: vec![
                "BooleanToText(True) = \"True\"",
                "BooleanToText(False) = \"False\"",
            ],
            volatile: false,
            rule: |a| format!("(({}) and \"True\" or \"False\")", a.boolean(0)),
        },
        FunctionSpec {
            label: "DecimalToText",
            description: "Converts Decimal 'n' to Text.",
            group: Some("Conversion"),
            parameters: vec![req("n", ValueKind::Decimal, "The Decimal to convert.")],
            returns: ValueKind::Text,
            examples: vec!["DecimalToText(10.89) = \"10.89\""],
            volatile: false,
            rule: |a| format!("tostring({})", a.num(0)),
        },
        FunctionSpec {
            label: "IntegerToText",
            description: "Converts Integer 'n' to Text.",
            group: Some("Conversion"),
            parameters: vec![req("n", ValueKind::Integer, "The Integer to convert.")],
            returns: ValueKind::Text,
            examples: vec!["IntegerToText(12) = \"12\""],
            volatile: false,
            rule: |a| format!("tostring({})", a.num(0)),
        },
        FunctionSpec {
            label: "TextToDecimal",
            description: "Converts Text 't' to a Decimal value. Returns 0 when 't' is not a valid number.",
            group: Some("Conversion"),
            parameters: vec![req("t", ValueKind::Text, "The Text to convert.")],
            returns: ValueKind::Decimal,
            examples: vec![
                "TextToDecimal(\"200.482\") = 200.482",
                "TextToDecimal(\"abc\") = 0",
            ],
            volatile: false,
            rule: |a| format!("(tonumber({}) or 0)", a.text(0)),
        },
        FunctionSpec {
            label: "TextToInteger",
            description: "Converts Text 't' to an Integer value. Returns 0 when 't' is not a valid number.",
            group: Some("Conversion"),
            parameters: vec![req("t", ValueKind::Text, "The Text to convert.")],
            returns: ValueKind::Integer,
            examples: vec![
                "TextToInteger(\"200\") = 200",
                "TextToInteger(\"abc\") = 0",
            ],
            volatile: false,
            rule: |a| format!("(math.floor(tonumber({}) or 0))", a.text(0)),
        },
        // ==================== Date and Time ====================
        FunctionSpec {
            label: "Day",
            description: "Returns the day of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the day from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Day(#2015-07-14#) = 14"],
            volatile: false,
            rule: |a| format!("({}).day", a.date(0)),
        },
        FunctionSpec {
            label: "Month",
            description: "Returns the month of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the month from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Month(#2015-07-14#) = 7"],
            volatile: false,
            rule: |a| format!("({}).month", a.date(0)),
        },
        FunctionSpec {
            label: "Year",
            description: "Returns the year of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the year from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Year(#2015-07-14#) = 2015"],
            volatile: false,
            rule: |a| format!("({}).year", a.date(0)),
        },
        FunctionSpec {
            label: "Hour",
            description: "Returns the hours of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the hours from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Hour(#2015-05-21 22:20:30#) = 22"],
            volatile: false,
            rule: |a| format!("({}).hour", a.date(0)),
        },
        FunctionSpec {
            label: "Minute",
            description: "Returns the minutes of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the minutes from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Minute(#2015-05-21 22:20:30#) = 20"],
            volatile: false,
            rule: |a| format!("({}).min", a.date(0)),
        },
        FunctionSpec {
            label: "Second",
            description: "Returns the seconds of 'dt'.",
            group: Some("Date and Time"),
            parameters: vec![req(
                "dt",
                ValueKind::DateTime,
                "The Date Time to extract the seconds from.",
            )],
            returns: ValueKind::Integer,
            examples: vec!["Second(#2015-05-21 22:20:30#) = 30"],
            volatile: false,
            rule: |a| format!("({}).sec", a.date(0)),
        },
        FunctionSpec {
            label: "CurrDate",
            description: "Returns the current date. The value is captured when the expression is \
                          transpiled, not when the generated code runs.",
            group: Some("Date and Time"),
            parameters: vec![],
            returns: ValueKind::Date,
            examples: vec![],
            volatile: false,
            rule: |_| format!("Date(\"{}\")", Local::now().format("%Y-%m-%d")),
        },
        FunctionSpec {
            label: "CurrDateTime",
            description: "Returns the current date and time, including milliseconds. The value is \
                          captured when the expression is transpiled; snippets referencing this \
                          function are re-transpiled and re-evaluated periodically.",
            group: Some("Date and Time"),
            parameters: vec![],
            returns: ValueKind::DateTime,
            examples: vec![],
            volatile: true,
            rule: |_| format!("Date(\"{}\")", Local::now().format("%Y-%m-%d %H:%M:%S%.3f")),
        },
    ];

    let keywords = vec![
        KeywordSpec {
            label: "True",
            insert_text: "True",
        },
        KeywordSpec {
            label: "False",
            insert_text: "False",
        },
        KeywordSpec {
            label: "If",
            insert_text: "If(${1},${2},${3})",
        },
    ];

    LanguageSpec::new("outsystems", functions, keywords, "//")
});

/// The OutSystems expression language descriptor, lazily initialized.
pub fn outsystems() -> &'static LanguageSpec {
    &OUTSYSTEMS
}
