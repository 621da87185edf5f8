//! `modulemd-obsoletes` codec (spec §3.2, §4.7).

use serde_yaml::Mapping;

use crate::entities::Obsoletes;
use crate::error::{Error, Result, YamlErrorKind};
use crate::yaml::emit::{block_raw_line, block_scalar_line, quote_scalar};
use crate::yaml::parse::{self, as_mapping};
use crate::yaml::ParseOptions;

const KNOWN_TOP: &[&str] = &["modified", "module", "stream", "data"];
const KNOWN_DATA: &[&str] = &[
    "context",
    "message",
    "reset",
    "module_name",
    "module_stream",
    "eol_date",
];

pub fn parse_obsoletes(top: &Mapping, _version: u64, options: &ParseOptions) -> Result<Obsoletes> {
    parse::check_unknown_keys(top, KNOWN_TOP, options.strict)?;

    let module_name = parse::require_str(top, "module")?;
    let module_stream = parse::require_str(top, "stream")?;
    let modified = parse::get_u64(top, "modified", options.allow_legacy_u64_overflow)?.unwrap_or(0);

    let mut obsoletes = Obsoletes::new(module_name, module_stream);
    obsoletes.modified = modified;

    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "obsoletes document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;
    parse::check_unknown_keys(data, KNOWN_DATA, options.strict)?;

    obsoletes.context = parse::get_str(data, "context")?;
    obsoletes.message = parse::get_str(data, "message")?;
    obsoletes.reset = parse::get_bool(data, "reset")?.unwrap_or(false);
    obsoletes.obsoleted_by_module_name = parse::get_str(data, "module_name")?;
    obsoletes.obsoleted_by_module_stream = parse::get_str(data, "module_stream")?;
    if let Some(eol) = parse::get_str(data, "eol_date")? {
        obsoletes.eol_date = Some(crate::entities::ServiceLevel::parse_eol(&eol)?);
    }

    obsoletes.validate()?;
    Ok(obsoletes)
}

pub fn emit_obsoletes(obsoletes: &Obsoletes) -> Result<String> {
    obsoletes.validate()?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd-obsoletes\n");
    out.push_str("version: 1\n");
    out.push_str(&format!("modified: {}\n", obsoletes.modified));
    out.push_str(&block_raw_line(0, "module", &quote_scalar(&obsoletes.module_name)));
    out.push_str(&block_raw_line(0, "stream", &quote_scalar(&obsoletes.module_stream)));
    out.push_str("data:\n");
    if let Some(context) = &obsoletes.context {
        out.push_str(&block_scalar_line(1, "context", context));
    }
    if let Some(message) = &obsoletes.message {
        out.push_str(&block_scalar_line(1, "message", message));
    }
    out.push_str(&format!("  reset: {}\n", obsoletes.reset));
    if let Some(name) = &obsoletes.obsoleted_by_module_name {
        out.push_str(&block_scalar_line(1, "module_name", name));
    }
    if let Some(stream) = &obsoletes.obsoleted_by_module_stream {
        out.push_str(&block_scalar_line(1, "module_stream", stream));
    }
    if let Some(eol) = &obsoletes.eol_date {
        out.push_str(&block_scalar_line(
            1,
            "eol_date",
            &crate::entities::ServiceLevel::emit_eol(eol),
        ));
    }
    out.push_str("...\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_top(yaml: &str) -> Result<Obsoletes> {
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        parse_obsoletes(top, 1, &ParseOptions::default())
    }

    #[test]
    fn round_trips_obsoleted_by_another_stream() {
        let obsoletes = parse_top(
            r#"
modified: 1
module: foo
stream: "1"
data:
  context: c0ffee
  message: use the new stream instead
  module_name: foo
  module_stream: "2"
  eol_date: 2030-01-01
"#,
        )
        .unwrap();

        assert_eq!(obsoletes.obsoleted_by_module_stream.as_deref(), Some("2"));
        let emitted = emit_obsoletes(&obsoletes).unwrap();
        let reparsed = parse_top(&emitted).unwrap();
        assert_eq!(reparsed, obsoletes);
    }

    #[test]
    fn reset_defaults_to_false() {
        let obsoletes = parse_top(
            r#"
modified: 1
module: foo
stream: "1"
data: {}
"#,
        )
        .unwrap();
        assert!(!obsoletes.reset);
    }

    #[test]
    fn missing_data_section_is_a_fatal_parse_error() {
        let err = parse_top(
            r#"
modified: 1
module: foo
stream: "1"
"#,
        )
        .unwrap_err();
        assert_eq!(err.yaml_kind(), Some(YamlErrorKind::MissingRequired));
    }
}
