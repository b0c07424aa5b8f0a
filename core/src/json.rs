//! Best-effort JSON canonicalization.
//!
//! Used both when importing a command's body and by the editor's beautify
//! action. Object key order is kept as written (serde_json is built with
//! `preserve_order`). Whole-valued floats print as integers (`1e3` and
//! `1000.0` both become `1000`) so a pasted body keeps its usual spelling.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Number, Value};

use crate::error::JsonError;

/// Indentation used when no configuration says otherwise.
pub const DEFAULT_INDENT: usize = 2;

/// Larger indents are clamped to this.
pub const MAX_INDENT: usize = 16;

/// Floats at or beyond this magnitude are left alone; below it every whole
/// value is exactly representable as an integer.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Parse `text` as JSON and re-serialize it with `DEFAULT_INDENT` spaces.
pub fn beautify(text: &str) -> Result<String, JsonError> {
    beautify_with_indent(text, DEFAULT_INDENT)
}

/// Parse `text` as JSON and re-serialize it with `indent` spaces per level,
/// at most `MAX_INDENT`.
pub fn beautify_with_indent(text: &str, indent: usize) -> Result<String, JsonError> {
    let mut value: Value =
        serde_json::from_str(text).map_err(|e| JsonError::Malformed(e.to_string()))?;
    integralize(&mut value);

    let indent = " ".repeat(indent.min(MAX_INDENT));
    let mut out = Vec::with_capacity(text.len() + 16);
    let mut ser = serde_json::Serializer::with_formatter(
        &mut out,
        PrettyFormatter::with_indent(indent.as_bytes()),
    );
    value
        .serialize(&mut ser)
        .map_err(|e| JsonError::Malformed(e.to_string()))?;

    String::from_utf8(out).map_err(|e| JsonError::Malformed(e.to_string()))
}

fn integralize(value: &mut Value) {
    match value {
        Value::Number(n) if n.is_f64() => {
            if let Some(f) = n.as_f64() {
                if f.fract() == 0.0 && f.abs() < MAX_EXACT_INTEGER {
                    *n = Number::from(f as i64);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(integralize),
        Value::Object(map) => map.values_mut().for_each(integralize),
        _ => {}
    }
}

/// Like `beautify`, but hands back the input unchanged when it is not JSON.
pub fn canonicalize_or_keep(text: &str, indent: usize) -> String {
    match beautify_with_indent(text, indent) {
        Ok(pretty) => pretty,
        Err(err) => {
            tracing::debug!(error = %err, "keeping body verbatim");
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_is_indented_with_two_spaces() {
        assert_eq!(beautify(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn beautify_is_a_fixed_point() {
        let once = beautify(r#"{"b":[1,2],"a":{"c":null}}"#).unwrap();
        let twice = beautify(&once).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn key_order_is_preserved() {
        let pretty = beautify(r#"{"z":1,"a":2}"#).unwrap();
        assert!(pretty.find("\"z\"").unwrap() < pretty.find("\"a\"").unwrap());
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = beautify("{bad json").unwrap_err();
        assert!(matches!(err, JsonError::Malformed(_)));
    }

    #[test]
    fn custom_indent() {
        assert_eq!(
            beautify_with_indent("[1]", 4).unwrap(),
            "[\n    1\n]"
        );
    }

    #[test]
    fn whole_floats_print_as_integers() {
        assert_eq!(
            beautify(r#"{"a":1.0,"b":1e3,"c":[-2.0,0.5],"d":1.5e300}"#).unwrap(),
            "{\n  \"a\": 1,\n  \"b\": 1000,\n  \"c\": [\n    -2,\n    0.5\n  ],\n  \"d\": 1.5e300\n}"
        );
    }

    #[test]
    fn indent_is_clamped() {
        assert_eq!(
            beautify_with_indent("[1]", usize::MAX).unwrap(),
            format!("[\n{}1\n]", " ".repeat(MAX_INDENT))
        );
    }

    #[test]
    fn canonicalize_keeps_non_json_verbatim() {
        assert_eq!(canonicalize_or_keep("a=1&b=2", 2), "a=1&b=2");
    }
}
