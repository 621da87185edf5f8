//! `modulemd-packager` v3 codec (spec §4.3, §4.4, component C5). Grounded
//! on `modulemd-packager-v3.c` / `modulemd-build-config.c` in
//! `original_source/`.

use serde_yaml::Mapping;

use crate::entities::Dependencies;
use crate::error::{Error, Result, YamlErrorKind};
use crate::stream::{BuildConfig, PackagerV3};
use crate::yaml::codec::stream::{
    emit_common_for_packager, parse_common_for_packager, parse_dependencies_into, emit_dependencies_for_packager,
};
use crate::yaml::emit::{block_raw_line, block_scalar_line, quote_scalar};
use crate::yaml::parse::{self, as_mapping};
use crate::yaml::ParseOptions;

const KNOWN_TOP_DATA: &[&str] = &[
    "name",
    "stream",
    "summary",
    "description",
    "license",
    "xmd",
    "profiles",
    "filter",
    "components",
    "servicelevels",
    "buildconfigs",
];
const KNOWN_BUILD_CONFIG: &[&str] = &["context", "platform", "dependencies", "buildopts"];

pub fn parse_packager(top: &Mapping, _version: u64, options: &ParseOptions) -> Result<PackagerV3> {
    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "packager document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;
    parse::check_unknown_keys(data, KNOWN_TOP_DATA, options.strict)?;

    let name = parse::require_str(data, "name")?;
    let stream = parse::require_str(data, "stream")?;
    let mut packager = PackagerV3::new(name, stream);
    parse_common_for_packager(data, options, &mut packager)?;

    if let Some(v) = parse::get(data, "buildconfigs") {
        let seq = v
            .as_sequence()
            .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "buildconfigs must be a sequence".to_owned()))?;
        for entry in seq {
            let entry_map = as_mapping(entry)?;
            parse::check_unknown_keys(entry_map, KNOWN_BUILD_CONFIG, options.strict)?;
            let context = parse::require_str(entry_map, "context")?;
            let platform = parse::require_str(entry_map, "platform")?;
            let mut dependencies = Dependencies::new();
            if let Some(dv) = parse::get(entry_map, "dependencies") {
                dependencies = parse_dependencies_into(as_mapping(dv)?)?;
            }
            let buildopts = parse_buildopts_entry(entry_map)?;
            packager.build_configs.push(BuildConfig {
                context,
                platform,
                dependencies,
                buildopts,
            });
        }
    }

    packager.validate()?;
    Ok(packager)
}

fn parse_buildopts_entry(entry_map: &Mapping) -> Result<Option<crate::entities::Buildopts>> {
    match parse::get(entry_map, "buildopts") {
        None => Ok(None),
        Some(v) => {
            let map = as_mapping(v)?;
            let mut bo = crate::entities::Buildopts::new();
            if let Some(rv) = parse::get(map, "rpms") {
                let rpms_map = as_mapping(rv)?;
                bo.rpm_macros = parse::get_str(rpms_map, "macros")?;
                bo.rpm_whitelist = parse::get_str_set(rpms_map, "whitelist")?;
            }
            bo.arches = parse::get_str_set(map, "arches")?;
            Ok(if bo.is_empty() { None } else { Some(bo) })
        }
    }
}

fn emit_buildopts_entry(buildopts: &Option<crate::entities::Buildopts>) -> String {
    let Some(bo) = buildopts else { return String::new() };
    if bo.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("      buildopts:\n");
    if bo.rpm_macros.is_some() || !bo.rpm_whitelist.is_empty() {
        out.push_str("        rpms:\n");
        if let Some(macros) = &bo.rpm_macros {
            out.push_str(&block_scalar_line(4, "macros", macros));
        }
        if !bo.rpm_whitelist.is_empty() {
            out.push_str(&block_raw_line(
                4,
                "whitelist",
                &crate::yaml::emit::flow_str_set(&bo.rpm_whitelist),
            ));
        }
    }
    if !bo.arches.is_empty() {
        out.push_str(&block_raw_line(3, "arches", &crate::yaml::emit::flow_str_set(&bo.arches)));
    }
    out
}

pub fn emit_packager(packager: &PackagerV3) -> Result<String> {
    packager.validate()?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd-packager\n");
    out.push_str("version: 3\n");
    out.push_str("data:\n");
    out.push_str(&block_scalar_line(1, "name", &packager.name));
    out.push_str(&block_scalar_line(1, "stream", &packager.stream));
    out.push_str(&emit_common_for_packager(packager));

    if !packager.build_configs.is_empty() {
        out.push_str("  buildconfigs:\n");
        for bc in &packager.build_configs {
            out.push_str(&block_raw_line(1, "- context", &quote_scalar(&bc.context)));
            out.push_str(&block_scalar_line(2, "platform", &bc.platform));
            out.push_str(&emit_dependencies_for_packager(&bc.dependencies));
            out.push_str(&emit_buildopts_entry(&bc.buildopts));
        }
    }
    out.push_str("...\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_packager_document_with_two_build_configs() {
        let yaml = r#"
document: modulemd-packager
version: 3
data:
  name: foo
  stream: latest
  summary: a module
  description: a module for testing
  license:
    module: [MIT]
  buildconfigs:
  - context: c1
    platform: el8
    dependencies:
      buildtime:
        platform: [el8]
      runtime:
        platform: [el8]
  - context: c2
    platform: el9
    dependencies:
      buildtime:
        platform: [el9]
      runtime:
        platform: [el9]
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        let packager = parse_packager(top, 3, &ParseOptions::default()).unwrap();
        assert_eq!(packager.build_configs.len(), 2);

        let emitted = emit_packager(&packager).unwrap();
        let value2: serde_yaml::Value = serde_yaml::from_str(&emitted).unwrap();
        let top2 = as_mapping(&value2).unwrap();
        let reparsed = parse_packager(top2, 3, &ParseOptions::default()).unwrap();
        assert_eq!(reparsed, packager);
    }

    #[test]
    fn duplicate_build_config_contexts_are_rejected() {
        let yaml = r#"
document: modulemd-packager
version: 3
data:
  name: foo
  stream: latest
  buildconfigs:
  - context: c1
    platform: el8
  - context: c1
    platform: el9
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        assert!(parse_packager(top, 3, &ParseOptions::default()).is_err());
    }
}
