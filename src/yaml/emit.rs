//! Scalar quoting and small string-building helpers shared by every
//! document emitter (spec §4.2 "a detail worth fixing", §4.5 "Mapping
//! style is block for top-level and sequence-of-mappings, flow for short
//! string sets").

use std::collections::BTreeSet;

/// True when a scalar's first character could be confused with the start
/// of a YAML number (digit, `+`, `-`, or `.` followed by a digit) and so
/// must be double-quoted on emit (spec §4.2, §8 S6).
pub fn needs_numeric_quoting(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('+') | Some('-') => true,
        Some('.') => matches!(chars.next(), Some(c) if c.is_ascii_digit()),
        _ => false,
    }
}

/// True for the other classic reasons a plain scalar would be
/// misinterpreted: empty, boolean-looking, or containing a `: ` / `#`
/// sequence a plain scalar can't carry.
fn needs_quoting_for_safety(s: &str) -> bool {
    if s.is_empty() {
        return true;
    }
    matches!(
        s,
        "TRUE" | "FALSE" | "true" | "false" | "True" | "False" | "null" | "~" | "yes" | "no" | "Yes" | "No"
    ) || s.contains(": ")
        || s.ends_with(':')
        || s.contains(" #")
        || s.starts_with(' ')
        || s.ends_with(' ')
        || s.contains('\n')
}

fn escape_double_quoted(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Quotes `s` double-quoted when required, otherwise emits it plain.
pub fn quote_scalar(s: &str) -> String {
    if needs_numeric_quoting(s) || needs_quoting_for_safety(s) {
        format!("\"{}\"", escape_double_quoted(s))
    } else {
        s.to_owned()
    }
}

pub fn indent(level: usize) -> String {
    "  ".repeat(level)
}

/// Flow-style rendering of a short string set: `[a, b, c]`, `[]` when
/// empty.
pub fn flow_str_set(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        return "[]".to_owned();
    }
    let parts: Vec<_> = items.iter().map(|s| quote_scalar(s)).collect();
    format!("[{}]", parts.join(", "))
}

pub fn block_scalar_line(level: usize, key: &str, value: &str) -> String {
    format!("{}{}: {}\n", indent(level), key, quote_scalar(value))
}

pub fn block_raw_line(level: usize, key: &str, raw_value: &str) -> String {
    format!("{}{}: {}\n", indent(level), key, raw_value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s6_numeric_looking_stream_is_double_quoted() {
        assert_eq!(quote_scalar("5.30"), "\"5.30\"");
    }

    #[test]
    fn ordinary_identifiers_are_not_quoted() {
        assert_eq!(quote_scalar("latest"), "latest");
        assert_eq!(quote_scalar("bar"), "bar");
    }

    #[test]
    fn leading_sign_triggers_quoting() {
        assert!(needs_numeric_quoting("+1"));
        assert!(needs_numeric_quoting("-1"));
        assert!(needs_numeric_quoting(".5"));
        assert!(!needs_numeric_quoting(".foo"));
    }

    #[test]
    fn flow_set_is_empty_brackets_when_empty() {
        assert_eq!(flow_str_set(&BTreeSet::new()), "[]");
    }
}
