//! Shared `serde_yaml::Value`-tree walking helpers (spec §4.5). The codec
//! parses each top-level document into a `serde_yaml::Value` (which already
//! gives us `serde_yaml::Deserializer`'s multi-document stream splitting)
//! and then walks that tree by hand the way a pull-parser would walk
//! events: this is the architecture decision recorded in SPEC_FULL.md §4.

use std::collections::BTreeSet;

use serde_yaml::{Mapping, Value as YValue};

use crate::error::{Error, Result, YamlErrorKind};
use crate::value::Value as Xmd;

pub fn as_mapping(v: &YValue) -> Result<&Mapping> {
    v.as_mapping().ok_or_else(|| {
        Error::yaml(YamlErrorKind::Parse, "expected a mapping".to_owned())
    })
}

pub fn get<'a>(map: &'a Mapping, key: &str) -> Option<&'a YValue> {
    map.get(YValue::String(key.to_owned()))
}

pub fn get_str(map: &Mapping, key: &str) -> Result<Option<String>> {
    match get(map, key) {
        None | Some(YValue::Null) => Ok(None),
        Some(YValue::String(s)) => Ok(Some(s.clone())),
        Some(YValue::Number(n)) => Ok(Some(n.to_string())),
        Some(YValue::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("field {:?} must be a scalar", key),
        )),
    }
}

pub fn require_str(map: &Mapping, key: &str) -> Result<String> {
    get_str(map, key)?.ok_or_else(|| {
        Error::yaml(
            YamlErrorKind::MissingRequired,
            format!("missing required field {:?}", key),
        )
    })
}

pub fn get_bool(map: &Mapping, key: &str) -> Result<Option<bool>> {
    match get(map, key) {
        None | Some(YValue::Null) => Ok(None),
        Some(YValue::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("field {:?} must be a boolean", key),
        )),
    }
}

/// Unsigned 64-bit scalars parse in base 10 only; negative values, overflow,
/// and trailing garbage each produce a `PARSE` error (spec §4.5
/// "Numeric parsing rules"), unless `allow_legacy_overflow` opts into
/// coercing the historical `18446744073709551615` sentinel to `u64::MAX`
/// wrap-around behaviour some old distro metadata relies on (spec §9 Open
/// Questions / SPEC_FULL §4 resolution).
pub fn parse_u64_scalar(value: &YValue, allow_legacy_overflow: bool) -> Result<u64> {
    match value {
        YValue::Number(n) => {
            if let Some(u) = n.as_u64() {
                return Ok(u);
            }
            if let Some(i) = n.as_i64() {
                if i == -1 && allow_legacy_overflow {
                    return Ok(u64::MAX);
                }
                return Err(Error::yaml(
                    YamlErrorKind::Parse,
                    format!("expected an unsigned 64-bit integer, got {}", i),
                ));
            }
            Err(Error::yaml(
                YamlErrorKind::Parse,
                "expected an unsigned 64-bit integer".to_owned(),
            ))
        }
        YValue::String(s) => parse_u64_str(s, allow_legacy_overflow),
        _ => Err(Error::yaml(
            YamlErrorKind::Parse,
            "expected an unsigned 64-bit integer scalar".to_owned(),
        )),
    }
}

pub fn parse_u64_str(s: &str, allow_legacy_overflow: bool) -> Result<u64> {
    if s == "18446744073709551615" && !allow_legacy_overflow {
        // Still a valid u64::MAX; base-10 parse handles it directly below.
    }
    if s.starts_with('-') {
        if allow_legacy_overflow && s == "-1" {
            return Ok(u64::MAX);
        }
        return Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("unsigned field cannot be negative: {:?}", s),
        ));
    }
    if !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("not a base-10 unsigned integer: {:?}", s),
        ));
    }
    s.parse::<u64>().map_err(|_| {
        Error::yaml(
            YamlErrorKind::Parse,
            format!("unsigned 64-bit integer out of range: {:?}", s),
        )
    })
}

pub fn require_u64(map: &Mapping, key: &str, allow_legacy_overflow: bool) -> Result<u64> {
    let v = get(map, key).ok_or_else(|| {
        Error::yaml(
            YamlErrorKind::MissingRequired,
            format!("missing required field {:?}", key),
        )
    })?;
    parse_u64_scalar(v, allow_legacy_overflow)
}

pub fn get_u64(map: &Mapping, key: &str, allow_legacy_overflow: bool) -> Result<Option<u64>> {
    match get(map, key) {
        None | Some(YValue::Null) => Ok(None),
        Some(v) => Ok(Some(parse_u64_scalar(v, allow_legacy_overflow)?)),
    }
}

pub fn get_i64(map: &Mapping, key: &str) -> Result<Option<i64>> {
    match get(map, key) {
        None | Some(YValue::Null) => Ok(None),
        Some(YValue::Number(n)) => n.as_i64().map(Some).ok_or_else(|| {
            Error::yaml(
                YamlErrorKind::Parse,
                format!("field {:?} is not a 64-bit integer", key),
            )
        }),
        Some(_) => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("field {:?} must be an integer", key),
        )),
    }
}

pub fn get_str_set(map: &Mapping, key: &str) -> Result<BTreeSet<String>> {
    match get(map, key) {
        None | Some(YValue::Null) => Ok(BTreeSet::new()),
        Some(YValue::Sequence(seq)) => {
            let mut out = BTreeSet::new();
            for item in seq {
                match item {
                    YValue::String(s) => {
                        out.insert(s.clone());
                    }
                    YValue::Number(n) => {
                        out.insert(n.to_string());
                    }
                    _ => {
                        return Err(Error::yaml(
                            YamlErrorKind::Parse,
                            format!("field {:?} must be a sequence of scalars", key),
                        ))
                    }
                }
            }
            Ok(out)
        }
        Some(_) => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("field {:?} must be a sequence", key),
        )),
    }
}

pub fn get_str_map(map: &Mapping, key: &str) -> Result<std::collections::BTreeMap<String, String>> {
    let mut out = std::collections::BTreeMap::new();
    match get(map, key) {
        None | Some(YValue::Null) => {}
        Some(YValue::Mapping(inner)) => {
            for (k, v) in inner {
                let k = k.as_str().ok_or_else(|| {
                    Error::yaml(YamlErrorKind::Parse, "mapping keys must be strings".to_owned())
                })?;
                let v = match v {
                    YValue::String(s) => s.clone(),
                    YValue::Number(n) => n.to_string(),
                    _ => {
                        return Err(Error::yaml(
                            YamlErrorKind::Parse,
                            format!("field {:?}.{:?} must be a scalar", key, k),
                        ))
                    }
                };
                out.insert(k.to_owned(), v);
            }
        }
        Some(_) => {
            return Err(Error::yaml(
                YamlErrorKind::Parse,
                format!("field {:?} must be a mapping", key),
            ))
        }
    }
    Ok(out)
}

/// Checks that every key in `map` is recognized. In strict mode an unknown
/// key is a hard `UNKNOWN_ATTR` error; otherwise it is silently skipped
/// (its subtree was already consumed by parsing the whole document into a
/// `serde_yaml::Value` up front, so nesting balance is never at risk -
/// spec §4.5 "Strict mode").
pub fn check_unknown_keys(map: &Mapping, known: &[&str], strict: bool) -> Result<()> {
    if !strict {
        return Ok(());
    }
    for (k, _) in map {
        if let Some(k) = k.as_str() {
            if !known.contains(&k) {
                return Err(Error::yaml(
                    YamlErrorKind::UnknownAttr,
                    format!("unrecognized key {:?}", k),
                ));
            }
        }
    }
    Ok(())
}

pub fn get_xmd(map: &Mapping, key: &str) -> Option<Xmd> {
    get(map, key).map(Xmd::from_yaml)
}
