//! Stream document codec (spec §4.3, component C5). Grounded on
//! `modulemd-module-stream-v1/v2/v3.c` in `original_source/` for field
//! names, and on `src/yaml/parse.rs` / `src/yaml/emit.rs` for the shared
//! tree-walking and emission idiom.

use std::collections::{BTreeMap, BTreeSet};

use serde_yaml::Mapping;

use crate::entities::{
    Buildopts, Dependencies, ModuleComponent, Profile, RpmComponent, ServiceLevel,
};
use crate::error::{Error, ErrorKind, Result, YamlErrorKind};
use crate::identity::StreamIdentity;
use crate::stream::common::StreamCommon;
use crate::stream::{ModuleStream, StreamV1, StreamV2, StreamV3};
use crate::value::Value;
use crate::yaml::emit::{block_raw_line, block_scalar_line, flow_str_set, indent, quote_scalar};
use crate::yaml::parse::{self, as_mapping};
use crate::yaml::ParseOptions;

const KNOWN_IDENTITY: &[&str] = &["name", "stream", "version", "context", "arch"];
const KNOWN_COMMON: &[&str] = &[
    "summary",
    "description",
    "license",
    "xmd",
    "profiles",
    "filter",
    "buildopts",
    "components",
    "artifacts",
    "servicelevels",
];

fn parse_identity(data: &Mapping, options: &ParseOptions) -> Result<StreamIdentity> {
    Ok(StreamIdentity {
        name: parse::get_str(data, "name")?,
        stream: parse::get_str(data, "stream")?,
        version: parse::get_u64(data, "version", options.allow_legacy_u64_overflow)?.unwrap_or(0),
        context: parse::get_str(data, "context")?,
        arch: parse::get_str(data, "arch")?,
    })
}

fn emit_identity(identity: &StreamIdentity) -> String {
    let mut out = String::new();
    if let Some(name) = &identity.name {
        out.push_str(&block_scalar_line(1, "name", name));
    }
    if let Some(stream) = &identity.stream {
        out.push_str(&block_scalar_line(1, "stream", stream));
    }
    out.push_str(&format!("  version: {}\n", identity.version));
    if let Some(context) = &identity.context {
        out.push_str(&block_scalar_line(1, "context", context));
    }
    if let Some(arch) = &identity.arch {
        out.push_str(&block_scalar_line(1, "arch", arch));
    }
    out
}

fn parse_license(data: &Mapping) -> Result<(BTreeSet<String>, BTreeSet<String>)> {
    match parse::get(data, "license") {
        None => Ok((BTreeSet::new(), BTreeSet::new())),
        Some(v) => {
            let map = as_mapping(v)?;
            Ok((parse::get_str_set(map, "module")?, parse::get_str_set(map, "content")?))
        }
    }
}

fn emit_license(module_licenses: &BTreeSet<String>, content_licenses: &BTreeSet<String>) -> String {
    if module_licenses.is_empty() && content_licenses.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("  license:\n");
    if !module_licenses.is_empty() {
        out.push_str(&block_raw_line(2, "module", &flow_str_set(module_licenses)));
    }
    if !content_licenses.is_empty() {
        out.push_str(&block_raw_line(2, "content", &flow_str_set(content_licenses)));
    }
    out
}

fn parse_profiles(data: &Mapping, allow_default: bool) -> Result<BTreeMap<String, Profile>> {
    let mut out = BTreeMap::new();
    if let Some(v) = parse::get(data, "profiles") {
        let map = as_mapping(v)?;
        for (name_key, profile_value) in map {
            let name = name_key
                .as_str()
                .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "profile names must be strings".to_owned()))?;
            let profile_map = as_mapping(profile_value)?;
            let mut profile = Profile::new(name);
            profile.description = parse::get_str(profile_map, "description")?;
            profile.rpms = parse::get_str_set(profile_map, "rpms")?;
            if let Some(default) = parse::get_bool(profile_map, "default")? {
                if !allow_default && default {
                    return Err(Error::general(
                        ErrorKind::Validate,
                        "per-profile default flags are only valid from v3 onward",
                    ));
                }
                profile.default = default;
            }
            out.insert(name.to_owned(), profile);
        }
    }
    Ok(out)
}

fn emit_profiles(profiles: &BTreeMap<String, Profile>, emit_default: bool) -> String {
    if profiles.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("  profiles:\n");
    for (name, profile) in profiles {
        out.push_str(&block_raw_line(2, &quote_scalar(name), ""));
        if let Some(description) = &profile.description {
            out.push_str(&block_scalar_line(3, "description", description));
        }
        out.push_str(&block_raw_line(3, "rpms", &flow_str_set(&profile.rpms)));
        if emit_default && profile.default {
            out.push_str("      default: TRUE\n");
        }
    }
    out
}

fn parse_components(data: &Mapping) -> Result<(BTreeMap<String, RpmComponent>, BTreeMap<String, ModuleComponent>)> {
    let mut rpms = BTreeMap::new();
    let mut modules = BTreeMap::new();
    if let Some(v) = parse::get(data, "components") {
        let components = as_mapping(v)?;
        if let Some(rpms_value) = parse::get(components, "rpms") {
            let rpms_map = as_mapping(rpms_value)?;
            for (key, entry_value) in rpms_map {
                let key = key
                    .as_str()
                    .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "component keys must be strings".to_owned()))?;
                let entry_map = as_mapping(entry_value)?;
                let mut c = RpmComponent::new(key);
                c.rationale = parse::get_str(entry_map, "rationale")?;
                c.repository = parse::get_str(entry_map, "repository")?;
                c.r#ref = parse::get_str(entry_map, "ref")?;
                c.cache = parse::get_str(entry_map, "cache")?;
                c.buildorder = parse::get_i64(entry_map, "buildorder")?.unwrap_or(0);
                c.arches = parse::get_str_set(entry_map, "arches")?;
                c.multilib_arches = parse::get_str_set(entry_map, "multilib_arches")?;
                c.buildroot = parse::get_bool(entry_map, "buildroot")?.unwrap_or(false);
                c.srpm_buildroot = parse::get_bool(entry_map, "srpm-buildroot")?.unwrap_or(false);
                rpms.insert(key.to_owned(), c);
            }
        }
        if let Some(modules_value) = parse::get(components, "modules") {
            let modules_map = as_mapping(modules_value)?;
            for (key, entry_value) in modules_map {
                let key = key
                    .as_str()
                    .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "component keys must be strings".to_owned()))?;
                let entry_map = as_mapping(entry_value)?;
                let mut c = ModuleComponent::new(key);
                c.rationale = parse::get_str(entry_map, "rationale")?;
                c.repository = parse::get_str(entry_map, "repository")?;
                c.r#ref = parse::get_str(entry_map, "ref")?;
                c.buildorder = parse::get_i64(entry_map, "buildorder")?.unwrap_or(0);
                modules.insert(key.to_owned(), c);
            }
        }
    }
    Ok((rpms, modules))
}

fn emit_components(rpms: &BTreeMap<String, RpmComponent>, modules: &BTreeMap<String, ModuleComponent>) -> String {
    if rpms.is_empty() && modules.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("  components:\n");
    if !rpms.is_empty() {
        out.push_str("    rpms:\n");
        for (key, c) in rpms {
            out.push_str(&block_raw_line(3, &quote_scalar(key), ""));
            if let Some(rationale) = &c.rationale {
                out.push_str(&block_scalar_line(4, "rationale", rationale));
            }
            if let Some(repository) = &c.repository {
                out.push_str(&block_scalar_line(4, "repository", repository));
            }
            if let Some(r) = &c.r#ref {
                out.push_str(&block_scalar_line(4, "ref", r));
            }
            if let Some(cache) = &c.cache {
                out.push_str(&block_scalar_line(4, "cache", cache));
            }
            out.push_str(&format!("{}buildorder: {}\n", indent(4), c.buildorder));
            if !c.arches.is_empty() {
                out.push_str(&block_raw_line(4, "arches", &flow_str_set(&c.arches)));
            }
            if !c.multilib_arches.is_empty() {
                out.push_str(&block_raw_line(4, "multilib_arches", &flow_str_set(&c.multilib_arches)));
            }
            out.push_str(&format!("{}buildroot: {}\n", indent(4), c.buildroot));
            out.push_str(&format!("{}srpm-buildroot: {}\n", indent(4), c.srpm_buildroot));
        }
    }
    if !modules.is_empty() {
        out.push_str("    modules:\n");
        for (key, c) in modules {
            out.push_str(&block_raw_line(3, &quote_scalar(key), ""));
            if let Some(rationale) = &c.rationale {
                out.push_str(&block_scalar_line(4, "rationale", rationale));
            }
            if let Some(repository) = &c.repository {
                out.push_str(&block_scalar_line(4, "repository", repository));
            }
            if let Some(r) = &c.r#ref {
                out.push_str(&block_scalar_line(4, "ref", r));
            }
            out.push_str(&format!("{}buildorder: {}\n", indent(4), c.buildorder));
        }
    }
    out
}

fn parse_buildopts(data: &Mapping) -> Result<Option<Buildopts>> {
    match parse::get(data, "buildopts") {
        None => Ok(None),
        Some(v) => {
            let map = as_mapping(v)?;
            let mut bo = Buildopts::new();
            if let Some(rpms_value) = parse::get(map, "rpms") {
                let rpms_map = as_mapping(rpms_value)?;
                bo.rpm_macros = parse::get_str(rpms_map, "macros")?;
                bo.rpm_whitelist = parse::get_str_set(rpms_map, "whitelist")?;
            }
            bo.arches = parse::get_str_set(map, "arches")?;
            Ok(if bo.is_empty() { None } else { Some(bo) })
        }
    }
}

fn emit_buildopts(buildopts: &Option<Buildopts>) -> String {
    let Some(bo) = buildopts else { return String::new() };
    if bo.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("  buildopts:\n");
    if bo.rpm_macros.is_some() || !bo.rpm_whitelist.is_empty() {
        out.push_str("    rpms:\n");
        if let Some(macros) = &bo.rpm_macros {
            out.push_str(&block_scalar_line(3, "macros", macros));
        }
        if !bo.rpm_whitelist.is_empty() {
            out.push_str(&block_raw_line(3, "whitelist", &flow_str_set(&bo.rpm_whitelist)));
        }
    }
    if !bo.arches.is_empty() {
        out.push_str(&block_raw_line(2, "arches", &flow_str_set(&bo.arches)));
    }
    out
}

fn parse_servicelevels(data: &Mapping) -> Result<BTreeMap<String, ServiceLevel>> {
    let mut out = BTreeMap::new();
    if let Some(v) = parse::get(data, "servicelevels") {
        let map = as_mapping(v)?;
        for (name_key, sl_value) in map {
            let name = name_key
                .as_str()
                .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "service level names must be strings".to_owned()))?;
            let sl_map = as_mapping(sl_value)?;
            let mut sl = ServiceLevel::new(name);
            if let Some(eol) = parse::get_str(sl_map, "eol")? {
                sl.eol = Some(ServiceLevel::parse_eol(&eol)?);
            }
            out.insert(name.to_owned(), sl);
        }
    }
    Ok(out)
}

fn emit_servicelevels(levels: &BTreeMap<String, ServiceLevel>) -> String {
    if levels.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("  servicelevels:\n");
    for (name, sl) in levels {
        out.push_str(&block_raw_line(2, &quote_scalar(name), ""));
        if let Some(eol) = &sl.eol {
            out.push_str(&block_scalar_line(3, "eol", &ServiceLevel::emit_eol(eol)));
        }
    }
    out
}

fn parse_filter(data: &Mapping) -> Result<BTreeSet<String>> {
    match parse::get(data, "filter") {
        None => Ok(BTreeSet::new()),
        Some(v) => parse::get_str_set(as_mapping(v)?, "rpms"),
    }
}

fn emit_filter(rpms: &BTreeSet<String>) -> String {
    if rpms.is_empty() {
        return String::new();
    }
    format!("  filter:\n{}", block_raw_line(2, "rpms", &flow_str_set(rpms)))
}

fn parse_artifacts(data: &Mapping) -> Result<BTreeSet<String>> {
    match parse::get(data, "artifacts") {
        None => Ok(BTreeSet::new()),
        Some(v) => parse::get_str_set(as_mapping(v)?, "rpms"),
    }
}

fn emit_artifacts(rpms: &BTreeSet<String>) -> String {
    if rpms.is_empty() {
        return String::new();
    }
    format!("  artifacts:\n{}", block_raw_line(2, "rpms", &flow_str_set(rpms)))
}

fn parse_common(data: &Mapping, options: &ParseOptions, allow_default_profile: bool) -> Result<StreamCommon> {
    let mut common = StreamCommon::new();
    common.identity = parse_identity(data, options)?;
    common.summary = parse::get_str(data, "summary")?;
    common.description = parse::get_str(data, "description")?;
    let (module_licenses, content_licenses) = parse_license(data)?;
    common.module_licenses = module_licenses;
    common.content_licenses = content_licenses;
    common.xmd = parse::get_xmd(data, "xmd");
    common.profiles = parse_profiles(data, allow_default_profile)?;
    let (rpm_components, module_components) = parse_components(data)?;
    common.rpm_components = rpm_components;
    common.module_components = module_components;
    common.servicelevels = parse_servicelevels(data)?;
    common.rpm_filter = parse_filter(data)?;
    common.rpm_artifacts = parse_artifacts(data)?;
    Ok(common)
}

fn emit_common(common: &StreamCommon, emit_default_profile: bool) -> String {
    let mut out = emit_identity(&common.identity);
    if let Some(summary) = &common.summary {
        out.push_str(&block_scalar_line(1, "summary", summary));
    }
    if let Some(description) = &common.description {
        out.push_str(&block_scalar_line(1, "description", description));
    }
    out.push_str(&emit_license(&common.module_licenses, &common.content_licenses));
    if let Some(xmd) = &common.xmd {
        out.push_str(&format!("  xmd:\n    {}\n", xmd.emit(2)));
    }
    out.push_str(&emit_profiles(&common.profiles, emit_default_profile));
    out.push_str(&emit_components(&common.rpm_components, &common.module_components));
    out.push_str(&emit_servicelevels(&common.servicelevels));
    out.push_str(&emit_filter(&common.rpm_filter));
    out.push_str(&emit_artifacts(&common.rpm_artifacts));
    out
}

fn parse_dependencies_block(map: &Mapping, buildtime_key: &str, runtime_key: &str) -> Result<Dependencies> {
    let mut deps = Dependencies::new();
    if let Some(v) = parse::get(map, buildtime_key) {
        let m = as_mapping(v)?;
        for (mod_key, streams) in m {
            let module = mod_key
                .as_str()
                .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "dependency module names must be strings".to_owned()))?;
            for stream in streams_from_value(streams)? {
                deps.add_buildtime_stream(module, stream);
            }
        }
    }
    if let Some(v) = parse::get(map, runtime_key) {
        let m = as_mapping(v)?;
        for (mod_key, streams) in m {
            let module = mod_key
                .as_str()
                .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "dependency module names must be strings".to_owned()))?;
            for stream in streams_from_value(streams)? {
                deps.add_runtime_stream(module, stream);
            }
        }
    }
    Ok(deps)
}

fn streams_from_value(value: &serde_yaml::Value) -> Result<Vec<String>> {
    match value {
        serde_yaml::Value::Sequence(seq) => seq
            .iter()
            .map(|v| {
                v.as_str().map(str::to_owned).ok_or_else(|| {
                    Error::yaml(YamlErrorKind::Parse, "dependency stream names must be strings".to_owned())
                })
            })
            .collect(),
        serde_yaml::Value::String(s) => Ok(vec![s.clone()]),
        _ => Err(Error::yaml(
            YamlErrorKind::Parse,
            "dependency streams must be a string or a sequence of strings".to_owned(),
        )),
    }
}

fn emit_dependencies_map(map: &BTreeMap<String, BTreeSet<String>>, key: &str, level: usize) -> String {
    if map.is_empty() {
        return String::new();
    }
    let mut out = format!("{}{}:\n", indent(level), key);
    for (module, streams) in map {
        out.push_str(&block_raw_line(level + 1, &quote_scalar(module), &flow_str_set(streams)));
    }
    out
}

pub fn parse_stream_v1(top: &Mapping, options: &ParseOptions) -> Result<StreamV1> {
    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "stream document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;

    let mut known = KNOWN_IDENTITY.to_vec();
    known.extend_from_slice(KNOWN_COMMON);
    known.extend_from_slice(&["requires", "buildrequires"]);
    parse::check_unknown_keys(data, &known, options.strict)?;

    let mut stream = StreamV1::new();
    stream.common = parse_common(data, options, false)?;
    if let Some(v) = parse::get(data, "requires") {
        stream.requires = flat_str_map(v)?;
    }
    if let Some(v) = parse::get(data, "buildrequires") {
        stream.buildrequires = flat_str_map(v)?;
    }
    stream.validate()?;
    Ok(stream)
}

fn flat_str_map(value: &serde_yaml::Value) -> Result<BTreeMap<String, String>> {
    let map = value
        .as_mapping()
        .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "expected a mapping of module to stream".to_owned()))?;
    let mut out = BTreeMap::new();
    for (k, v) in map {
        let k = k
            .as_str()
            .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "module names must be strings".to_owned()))?;
        let v = v
            .as_str()
            .ok_or_else(|| Error::yaml(YamlErrorKind::Parse, "stream names must be strings".to_owned()))?;
        out.insert(k.to_owned(), v.to_owned());
    }
    Ok(out)
}

pub fn emit_stream_v1(stream: &StreamV1) -> Result<String> {
    stream.validate()?;
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd\n");
    out.push_str("version: 1\n");
    out.push_str("data:\n");
    out.push_str(&emit_common(&stream.common, false));
    if !stream.buildrequires.is_empty() {
        out.push_str("  buildrequires:\n");
        for (m, s) in &stream.buildrequires {
            out.push_str(&block_scalar_line(2, m, s));
        }
    }
    if !stream.requires.is_empty() {
        out.push_str("  requires:\n");
        for (m, s) in &stream.requires {
            out.push_str(&block_scalar_line(2, m, s));
        }
    }
    out.push_str("...\n");
    Ok(out)
}

pub fn parse_stream_v2(top: &Mapping, options: &ParseOptions) -> Result<StreamV2> {
    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "stream document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;

    let mut known = KNOWN_IDENTITY.to_vec();
    known.extend_from_slice(KNOWN_COMMON);
    known.extend_from_slice(&["dependencies", "default_profiles"]);
    parse::check_unknown_keys(data, &known, options.strict)?;

    let mut stream = StreamV2::new();
    stream.common = parse_common(data, options, false)?;
    if let Some(v) = parse::get(data, "dependencies") {
        let seq = v.as_sequence().ok_or_else(|| {
            Error::yaml(YamlErrorKind::Parse, "v2 dependencies must be a sequence".to_owned())
        })?;
        for block in seq {
            let block_map = as_mapping(block)?;
            stream
                .dependencies
                .push(parse_dependencies_block(block_map, "buildrequires", "requires")?);
        }
    }
    stream.default_profiles = parse::get_str_set(data, "default_profiles")?;
    stream.validate()?;
    Ok(stream)
}

pub fn emit_stream_v2(stream: &StreamV2) -> Result<String> {
    stream.validate()?;
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd\n");
    out.push_str("version: 2\n");
    out.push_str("data:\n");
    out.push_str(&emit_common(&stream.common, false));
    if !stream.dependencies.is_empty() {
        out.push_str("  dependencies:\n");
        for deps in &stream.dependencies {
            let buildrequires = emit_dependencies_map(&deps.buildtime, "buildrequires", 2);
            let requires = emit_dependencies_map(&deps.runtime, "requires", 2);
            let mut lines: Vec<&str> = buildrequires.lines().chain(requires.lines()).collect();
            if lines.is_empty() {
                lines.push("buildrequires: {}");
            }
            for (i, line) in lines.iter().enumerate() {
                if i == 0 {
                    out.push_str(&format!("  - {}\n", line.trim_start()));
                } else {
                    out.push_str(&format!("{}\n", line));
                }
            }
        }
    }
    if !stream.default_profiles.is_empty() {
        out.push_str(&block_raw_line(1, "default_profiles", &flow_str_set(&stream.default_profiles)));
    }
    out.push_str("...\n");
    Ok(out)
}

pub fn parse_stream_v3(top: &Mapping, options: &ParseOptions) -> Result<StreamV3> {
    let data_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "stream document missing data".to_owned()))?;
    let data = as_mapping(data_value)?;

    let mut known = KNOWN_IDENTITY.to_vec();
    known.extend_from_slice(KNOWN_COMMON);
    known.extend_from_slice(&["dependencies", "static_context", "platform"]);
    parse::check_unknown_keys(data, &known, options.strict)?;

    let mut stream = StreamV3::new();
    stream.common = parse_common(data, options, true)?;
    stream.platform = parse::get_str(data, "platform")?;
    if let Some(v) = parse::get(data, "dependencies") {
        stream.dependencies = parse_dependencies_block(as_mapping(v)?, "buildtime", "runtime")?;
    }
    stream.static_context = parse::get_bool(data, "static_context")?.unwrap_or(false);
    stream.validate()?;
    Ok(stream)
}

pub fn emit_stream_v3(stream: &StreamV3) -> Result<String> {
    stream.validate()?;
    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd\n");
    out.push_str("version: 3\n");
    out.push_str("data:\n");
    out.push_str(&emit_common(&stream.common, true));
    if let Some(platform) = &stream.platform {
        out.push_str(&block_scalar_line(1, "platform", platform));
    }
    out.push_str(&emit_dependencies_map(&stream.dependencies.buildtime, "buildtime", 1));
    out.push_str(&emit_dependencies_map(&stream.dependencies.runtime, "runtime", 1));
    if stream.static_context {
        out.push_str("  static_context: TRUE\n");
    }
    out.push_str("...\n");
    Ok(out)
}

/// Parses the fields `PackagerV3` shares with `StreamCommon` directly onto
/// a packager document (which has no identity/artifacts fields of its
/// own - spec §4.3).
pub(crate) fn parse_common_for_packager(
    data: &Mapping,
    options: &ParseOptions,
    packager: &mut crate::stream::PackagerV3,
) -> Result<()> {
    packager.summary = parse::get_str(data, "summary")?;
    packager.description = parse::get_str(data, "description")?;
    let (module_licenses, content_licenses) = parse_license(data)?;
    packager.module_licenses = module_licenses;
    packager.content_licenses = content_licenses;
    packager.xmd = parse::get_xmd(data, "xmd");
    packager.profiles = parse_profiles(data, true)?;
    let (rpm_components, module_components) = parse_components(data)?;
    packager.rpm_components = rpm_components;
    packager.module_components = module_components;
    packager.servicelevels = parse_servicelevels(data)?;
    packager.rpm_filter = parse_filter(data)?;
    let _ = options;
    Ok(())
}

pub(crate) fn emit_common_for_packager(packager: &crate::stream::PackagerV3) -> String {
    let mut out = String::new();
    if let Some(summary) = &packager.summary {
        out.push_str(&block_scalar_line(1, "summary", summary));
    }
    if let Some(description) = &packager.description {
        out.push_str(&block_scalar_line(1, "description", description));
    }
    out.push_str(&emit_license(&packager.module_licenses, &packager.content_licenses));
    if let Some(xmd) = &packager.xmd {
        out.push_str(&format!("  xmd:\n    {}\n", xmd.emit(2)));
    }
    out.push_str(&emit_profiles(&packager.profiles, true));
    out.push_str(&emit_components(&packager.rpm_components, &packager.module_components));
    out.push_str(&emit_servicelevels(&packager.servicelevels));
    out.push_str(&emit_filter(&packager.rpm_filter));
    out
}

pub(crate) fn parse_dependencies_into(map: &Mapping) -> Result<Dependencies> {
    parse_dependencies_block(map, "buildtime", "runtime")
}

pub(crate) fn emit_dependencies_for_packager(deps: &Dependencies) -> String {
    if deps.buildtime.is_empty() && deps.runtime.is_empty() {
        return String::new();
    }
    let mut out = String::new();
    out.push_str("    dependencies:\n");
    out.push_str(&emit_dependencies_map(&deps.buildtime, "buildtime", 3));
    out.push_str(&emit_dependencies_map(&deps.runtime, "runtime", 3));
    out
}

pub fn parse_stream(top: &Mapping, version: u64, options: &ParseOptions) -> Result<ModuleStream> {
    match version {
        1 => Ok(ModuleStream::V1(parse_stream_v1(top, options)?)),
        2 => Ok(ModuleStream::V2(parse_stream_v2(top, options)?)),
        3 => Ok(ModuleStream::V3(parse_stream_v3(top, options)?)),
        other => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("unsupported modulemd stream version {}", other),
        )),
    }
}

pub fn emit_stream(stream: &ModuleStream) -> Result<String> {
    match stream {
        ModuleStream::V1(s) => emit_stream_v1(s),
        ModuleStream::V2(s) => emit_stream_v2(s),
        ModuleStream::V3(s) => emit_stream_v3(s),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_v1_parses_flat_requires_maps() {
        let yaml = r#"
document: modulemd
version: 1
data:
  name: foo
  stream: latest
  version: 1
  summary: a module
  description: a module for testing
  license:
    module: [MIT]
  requires:
    platform: el8
  buildrequires:
    platform: el8
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        let stream = parse_stream(top, 1, &ParseOptions::default()).unwrap();
        match stream {
            ModuleStream::V1(s) => {
                assert_eq!(s.requires.get("platform").map(String::as_str), Some("el8"));
            }
            _ => panic!("expected v1"),
        }
    }

    #[test]
    fn v2_round_trips_a_dependencies_block() {
        let yaml = r#"
document: modulemd
version: 2
data:
  name: foo
  stream: latest
  version: 1
  summary: a module
  description: a module for testing
  license:
    module: [MIT]
  dependencies:
  - buildrequires:
      platform: [el8]
    requires:
      platform: [el8]
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        let stream = parse_stream(top, 2, &ParseOptions::default()).unwrap();
        let emitted = emit_stream(&stream).unwrap();
        let value2: serde_yaml::Value = serde_yaml::from_str(&emitted).unwrap();
        let top2 = as_mapping(&value2).unwrap();
        let reparsed = parse_stream(top2, 2, &ParseOptions::default()).unwrap();
        assert_eq!(reparsed, stream);
    }

    #[test]
    fn v3_requires_platform_and_single_stream_deps() {
        let yaml = r#"
document: modulemd
version: 3
data:
  name: foo
  stream: latest
  version: 1
  context: c0ffee
  summary: a module
  description: a module for testing
  license:
    module: [MIT]
  platform: el8
  dependencies:
    buildtime:
      platform: [el8]
    runtime:
      platform: [el8]
"#;
        let value: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
        let top = as_mapping(&value).unwrap();
        let stream = parse_stream(top, 3, &ParseOptions::default()).unwrap();
        match stream {
            ModuleStream::V3(s) => assert_eq!(s.platform.as_deref(), Some("el8")),
            _ => panic!("expected v3"),
        }
    }
}
