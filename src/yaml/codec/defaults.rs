//! `modulemd-defaults` v1 codec (spec §8 S1). Grounded on
//! `modulemd-defaults-v1.c` in `original_source/`.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Mapping;

use crate::entities::defaults::{DefaultsV1, IntentOverlay};
use crate::error::{Error, Result, YamlErrorKind};
use crate::yaml::emit::{block_raw_line, flow_str_set, indent, quote_scalar};
use crate::yaml::parse::{self, as_mapping};
use crate::yaml::ParseOptions;

const KNOWN_TOP: &[&str] = &["module", "modified", "data"];
const KNOWN_DATA: &[&str] = &["stream", "profiles", "intents"];
const KNOWN_INTENT: &[&str] = &["stream", "profiles"];

fn parse_profile_defaults(map: &Mapping, options: &ParseOptions) -> Result<BTreeMap<String, BTreeSet<String>>> {
    let mut out = BTreeMap::new();
    if let Some(profiles_value) = parse::get(map, "profiles") {
        let profiles_map = as_mapping(profiles_value)?;
        for (stream_key, rpm_list) in profiles_map {
            let stream = stream_key.as_str().ok_or_else(|| {
                Error::yaml(YamlErrorKind::Parse, "profile stream keys must be strings".to_owned())
            })?;
            let rpms = match rpm_list {
                serde_yaml::Value::Sequence(seq) => {
                    let mut set = BTreeSet::new();
                    for item in seq {
                        if let Some(s) = item.as_str() {
                            set.insert(s.to_owned());
                        } else {
                            return Err(Error::yaml(
                                YamlErrorKind::Parse,
                                "profile name must be a string".to_owned(),
                            ));
                        }
                    }
                    set
                }
                _ => {
                    return Err(Error::yaml(
                        YamlErrorKind::Parse,
                        "profiles entry must be a sequence".to_owned(),
                    ))
                }
            };
            out.insert(stream.to_owned(), rpms);
        }
        let _ = options;
    }
    Ok(out)
}

pub fn parse_defaults(top: &Mapping, _version: u64, options: &ParseOptions) -> Result<DefaultsV1> {
    parse::check_unknown_keys(top, KNOWN_TOP, options.strict)?;

    let module_name = parse::require_str(top, "module")?;
    let modified = parse::get_u64(top, "modified", options.allow_legacy_u64_overflow)?.unwrap_or(0);

    let mut defaults = DefaultsV1::new(module_name);
    defaults.modified = modified;

    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "defaults document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;
    parse::check_unknown_keys(data, KNOWN_DATA, options.strict)?;

    if let Some(stream) = parse::get_str(data, "stream")? {
        defaults.set_default_stream(stream);
    }

    defaults.profile_defaults = parse_profile_defaults(data, options)?;

    if let Some(intents_value) = parse::get(data, "intents") {
        let intents_map = as_mapping(intents_value)?;
        for (intent_key, intent_value) in intents_map {
            let intent_name = intent_key.as_str().ok_or_else(|| {
                Error::yaml(YamlErrorKind::Parse, "intent names must be strings".to_owned())
            })?;
            let intent_map = as_mapping(intent_value)?;
            parse::check_unknown_keys(intent_map, KNOWN_INTENT, options.strict)?;

            let mut overlay = IntentOverlay::default();
            if let Some(stream) = parse::get_str(intent_map, "stream")? {
                overlay.set_default_stream(stream);
            }
            overlay.profile_defaults = parse_profile_defaults(intent_map, options)?;
            defaults.intents.insert(intent_name.to_owned(), overlay);
        }
    }

    defaults.validate()?;
    Ok(defaults)
}

fn emit_profile_defaults(level: usize, profiles: &BTreeMap<String, BTreeSet<String>>) -> String {
    let mut out = String::new();
    if profiles.is_empty() {
        return out;
    }
    out.push_str(&format!("{}profiles:\n", indent(level)));
    for (stream, rpms) in profiles {
        out.push_str(&block_raw_line(level + 1, &quote_scalar(stream), &flow_str_set(rpms)));
    }
    out
}

pub fn emit_defaults(defaults: &DefaultsV1) -> Result<String> {
    defaults.validate()?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd-defaults\n");
    out.push_str("version: 1\n");
    out.push_str(&block_raw_line(0, "module", &quote_scalar(&defaults.module_name)));
    out.push_str(&format!("modified: {}\n", defaults.modified));
    out.push_str("data:\n");

    let has_body = defaults.default_stream().is_some()
        || !defaults.profile_defaults.is_empty()
        || !defaults.intents.is_empty();
    if !has_body {
        out.push_str("  {}\n");
    } else {
        if let Some(stream) = defaults.default_stream() {
            out.push_str(&block_raw_line(1, "stream", &quote_scalar(stream)));
        }
        out.push_str(&emit_profile_defaults(1, &defaults.profile_defaults));
        if !defaults.intents.is_empty() {
            out.push_str("  intents:\n");
            for (name, overlay) in &defaults.intents {
                out.push_str(&block_raw_line(2, &quote_scalar(name), ""));
                if let Some(stream) = overlay.default_stream() {
                    out.push_str(&block_raw_line(3, "stream", &quote_scalar(stream)));
                }
                out.push_str(&emit_profile_defaults(3, &overlay.profile_defaults));
            }
        }
    }
    out.push_str("...\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::yaml::ParseOptions;

    fn parse_top(yaml: &str) -> Result<DefaultsV1> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        parse_defaults(top, 1, &ParseOptions::default())
    }

    #[test]
    fn s1_simple_round_trip() {
        let defaults = parse_top(
            r#"
module: foo
modified: 1
data:
  stream: latest
  profiles:
    latest: [bar, baz]
    libonly: []
"#,
        )
        .unwrap();

        assert_eq!(defaults.module_name, "foo");
        assert_eq!(defaults.default_stream(), Some("latest"));
        assert_eq!(
            defaults.profile_defaults.get("latest").unwrap(),
            &BTreeSet::from(["bar".to_owned(), "baz".to_owned()])
        );
        assert_eq!(defaults.profile_defaults.get("libonly").unwrap().len(), 0);

        let emitted = emit_defaults(&defaults).unwrap();
        let reparsed = parse_top(&emitted).unwrap();
        assert_eq!(reparsed, defaults);
    }

    #[test]
    fn missing_data_section_is_a_fatal_parse_error() {
        let err = parse_top(
            r#"
module: foo
modified: 1
"#,
        )
        .unwrap_err();
        assert_eq!(err.yaml_kind(), Some(YamlErrorKind::MissingRequired));
    }
}
