//! JSON text output.
//!
//! Renders a [`JsonNode`] either compactly (no insignificant whitespace) or
//! pretty-printed with a configurable indent. Object members are written in
//! map iteration order.

use crate::{JsonNode, Number};

/// Renders `node` without any insignificant whitespace.
///
/// # Examples
///
/// ```rust
/// use json_mapper::{json, writer};
///
/// let node = json!(["Juan Garcia", "Manuel Perez"]);
/// assert_eq!(writer::to_compact_string(&node), r#"["Juan Garcia","Manuel Perez"]"#);
/// ```
#[must_use]
pub fn to_compact_string(node: &JsonNode) -> String {
    // 256 bytes covers the typical small record without reallocating
    let mut output = String::with_capacity(256);
    write_compact(&mut output, node);
    output
}

/// Renders `node` with newlines and `indent` spaces per nesting level.
#[must_use]
pub fn to_pretty_string(node: &JsonNode, indent: usize) -> String {
    let mut output = String::with_capacity(256);
    write_pretty(&mut output, node, indent, 0);
    output
}

fn write_compact(output: &mut String, node: &JsonNode) {
    match node {
        JsonNode::Array(arr) => {
            output.push('[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                write_compact(output, elem);
            }
            output.push(']');
        }
        JsonNode::Object(obj) => {
            output.push('{');
            for (i, (key, value)) in obj.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                write_string(output, key);
                output.push(':');
                write_compact(output, value);
            }
            output.push('}');
        }
        scalar => write_scalar(output, scalar),
    }
}

fn write_pretty(output: &mut String, node: &JsonNode, indent: usize, level: usize) {
    match node {
        JsonNode::Array(arr) if !arr.is_empty() => {
            output.push('[');
            for (i, elem) in arr.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                write_newline(output, indent, level + 1);
                write_pretty(output, elem, indent, level + 1);
            }
            write_newline(output, indent, level);
            output.push(']');
        }
        JsonNode::Object(obj) if !obj.is_empty() => {
            output.push('{');
            for (i, (key, value)) in obj.iter().enumerate() {
                if i > 0 {
                    output.push(',');
                }
                write_newline(output, indent, level + 1);
                write_string(output, key);
                output.push_str(": ");
                write_pretty(output, value, indent, level + 1);
            }
            write_newline(output, indent, level);
            output.push('}');
        }
        JsonNode::Array(_) => output.push_str("[]"),
        JsonNode::Object(_) => output.push_str("{}"),
        scalar => write_scalar(output, scalar),
    }
}

#[inline]
fn write_newline(output: &mut String, indent: usize, level: usize) {
    output.push('\n');
    output.extend(std::iter::repeat(' ').take(indent * level));
}

fn write_scalar(output: &mut String, node: &JsonNode) {
    match node {
        JsonNode::Null => output.push_str("null"),
        JsonNode::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        JsonNode::Number(n) => write_number(output, n),
        JsonNode::String(s) => write_string(output, s),
        JsonNode::Array(_) | JsonNode::Object(_) => write_compact(output, node),
    }
}

#[inline]
fn write_number(output: &mut String, number: &Number) {
    output.push_str(&number.to_string());
}

/// Writes `s` as a quoted JSON string.
///
/// Quotes, backslashes and control characters are escaped; everything else,
/// including non-ASCII text, is written verbatim.
pub fn write_string(output: &mut String, s: &str) {
    output.push('"');
    for ch in s.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            c if (c as u32) < 0x20 => {
                output.push_str(&format!("\\u{:04x}", c as u32));
            }
            _ => output.push(ch),
        }
    }
    output.push('"');
}
