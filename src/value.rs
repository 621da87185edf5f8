//! The XMD value tree (spec §4.1, component C1).
//!
//! Arbitrary user metadata under the `xmd:` key round-trips through this
//! recursive, dynamically-typed value instead of being tied to any fixed
//! schema. Scalars are heuristically typed: only the exact spellings
//! `TRUE`/`FALSE` become booleans, everything else stays a string. Mapping
//! keys are sorted lexicographically on emit so repeated emits of the same
//! tree are byte-identical.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Null,
    Bool(bool),
    String(String),
    Map(BTreeMap<String, Value>),
    Seq(Vec<Value>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Builds a [`Value`] tree from a `serde_yaml::Value` subtree, applying
    /// the heuristic scalar typing described above.
    ///
    /// `serde_yaml` itself resolves plain (unquoted) scalars like `true`,
    /// `True`, `yes`, `no` to a native `Bool` before we ever see them,
    /// which loses whatever the document actually spelled. Since the only
    /// spelling this format treats as a boolean sentinel is the literal
    /// `TRUE`/`FALSE` text - and that only ever reaches us as a `String`,
    /// never as a `Bool`, because `serde_yaml` itself doesn't resolve
    /// uppercase spellings - a `serde_yaml::Value::Bool` here can never be
    /// that sentinel. Coercing it to `Value::Bool` would silently turn an
    /// ordinary `true`/`yes` into our reserved marker and round-trip it
    /// back out as `TRUE`; we fall back to its canonical string form
    /// instead, which at least never collides with the sentinel.
    pub fn from_yaml(value: &serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::String(if *b { "true" } else { "false" }.to_owned()),
            serde_yaml::Value::Number(n) => Value::String(n.to_string()),
            serde_yaml::Value::String(s) => match s.as_str() {
                "TRUE" => Value::Bool(true),
                "FALSE" => Value::Bool(false),
                _ => Value::String(s.clone()),
            },
            serde_yaml::Value::Sequence(seq) => {
                Value::Seq(seq.iter().map(Value::from_yaml).collect())
            }
            serde_yaml::Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map.iter() {
                    if let Some(key) = k.as_str() {
                        out.insert(key.to_owned(), Value::from_yaml(v));
                    }
                }
                Value::Map(out)
            }
            serde_yaml::Value::Tagged(t) => Value::from_yaml(&t.value),
        }
    }

    /// Emits this value as a YAML fragment at the given indentation (number
    /// of two-space levels), matching the block/flow rules of §4.5: short
    /// scalar sequences and the empty sequence use flow style, everything
    /// else uses block style.
    pub fn emit(&self, indent: usize) -> String {
        match self {
            Value::Null => "null".to_owned(),
            Value::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_owned(),
            Value::String(s) => crate::yaml::emit::quote_scalar(s),
            Value::Seq(items) => {
                if items.is_empty() {
                    "[]".to_owned()
                } else if items.iter().all(|v| matches!(v, Value::String(_) | Value::Bool(_))) {
                    let parts: Vec<_> = items.iter().map(|v| v.emit(0)).collect();
                    format!("[{}]", parts.join(", "))
                } else {
                    let pad = "  ".repeat(indent);
                    let mut out = String::new();
                    for item in items {
                        out.push_str(&format!("{}- {}\n", pad, item.emit(indent + 1)));
                    }
                    out.trim_end_matches('\n').to_owned()
                }
            }
            Value::Map(map) => {
                if map.is_empty() {
                    return "{}".to_owned();
                }
                let pad = "  ".repeat(indent);
                let mut out = String::new();
                for (k, v) in map.iter() {
                    match v {
                        Value::Map(m) if !m.is_empty() => {
                            out.push_str(&format!("{}{}:\n{}\n", pad, k, v.emit(indent + 1)));
                        }
                        Value::Seq(s) if !s.is_empty() && !s.iter().all(|v| matches!(v, Value::String(_) | Value::Bool(_))) => {
                            out.push_str(&format!("{}{}:\n{}\n", pad, k, v.emit(indent + 1)));
                        }
                        _ => {
                            out.push_str(&format!("{}{}: {}\n", pad, k, v.emit(indent + 1)));
                        }
                    }
                }
                out.trim_end_matches('\n').to_owned()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_typing_only_coerces_true_false() {
        let y: serde_yaml::Value = serde_yaml::from_str("TRUE").unwrap();
        assert_eq!(Value::from_yaml(&y), Value::Bool(true));
        let y: serde_yaml::Value = serde_yaml::from_str("\"5.30\"").unwrap();
        assert_eq!(Value::from_yaml(&y), Value::String("5.30".to_owned()));
        // serde_yaml resolves plain "yes"/"true" to a native bool before we
        // ever see it, which is not our TRUE/FALSE sentinel, so it comes
        // back as its canonical lowercase string instead of Value::Bool.
        let y: serde_yaml::Value = serde_yaml::from_str("yes").unwrap();
        assert_eq!(Value::from_yaml(&y), Value::String("true".to_owned()));
        let y: serde_yaml::Value = serde_yaml::from_str("true").unwrap();
        assert_eq!(Value::from_yaml(&y), Value::String("true".to_owned()));
        let y: serde_yaml::Value = serde_yaml::from_str("false").unwrap();
        assert_eq!(Value::from_yaml(&y), Value::String("false".to_owned()));
    }

    #[test]
    fn map_keys_sort_lexicographically_on_emit() {
        let mut m = BTreeMap::new();
        m.insert("zeta".to_owned(), Value::String("z".to_owned()));
        m.insert("alpha".to_owned(), Value::String("a".to_owned()));
        let v = Value::Map(m);
        let emitted = v.emit(0);
        let alpha_pos = emitted.find("alpha").unwrap();
        let zeta_pos = emitted.find("zeta").unwrap();
        assert!(alpha_pos < zeta_pos);
    }

    #[test]
    fn empty_sequence_emits_with_explicit_marker() {
        assert_eq!(Value::Seq(vec![]).emit(0), "[]");
    }
}
