//! `modulemd-translations` codec (spec §8). Grounded on
//! `modulemd-translation.c` / `modulemd-translation-entry.c` in
//! `original_source/`.

use serde_yaml::Mapping;

use crate::entities::{Translation, TranslationEntry};
use crate::error::{Error, Result, YamlErrorKind};
use crate::yaml::emit::{block_raw_line, indent, quote_scalar};
use crate::yaml::parse::{self, as_mapping};
use crate::yaml::ParseOptions;

const KNOWN_TOP: &[&str] = &["module", "stream", "modified", "data"];
const KNOWN_DATA: &[&str] = &["profiles", "summary", "description"];

pub fn parse_translation(top: &Mapping, _version: u64, options: &ParseOptions) -> Result<Translation> {
    parse::check_unknown_keys(top, KNOWN_TOP, options.strict)?;

    let module_name = parse::require_str(top, "module")?;
    let module_stream = parse::require_str(top, "stream")?;
    let modified = parse::get_u64(top, "modified", options.allow_legacy_u64_overflow)?.unwrap_or(0);

    let mut translation = Translation::new(module_name, module_stream);
    translation.modified = modified;

    let locales_value = parse::get(top, "data")
        .ok_or_else(|| Error::yaml(YamlErrorKind::MissingRequired, "translations document missing data".to_owned()))?;
    let locales_map = as_mapping(locales_value)?;
    for (locale_key, entry_value) in locales_map {
        let locale = locale_key.as_str().ok_or_else(|| {
            Error::yaml(YamlErrorKind::Parse, "locale keys must be strings".to_owned())
        })?;
        let entry_map = as_mapping(entry_value)?;
        parse::check_unknown_keys(entry_map, KNOWN_DATA, options.strict)?;

        let mut entry = TranslationEntry::new(locale);
        entry.summary = parse::get_str(entry_map, "summary")?;
        entry.description = parse::get_str(entry_map, "description")?;
        entry.profile_descriptions = parse::get_str_map(entry_map, "profiles")?;
        translation.set_entry(entry);
    }

    translation.validate()?;
    Ok(translation)
}

pub fn emit_translation(translation: &Translation) -> Result<String> {
    translation.validate()?;

    let mut out = String::new();
    out.push_str("---\n");
    out.push_str("document: modulemd-translations\n");
    out.push_str("version: 1\n");
    out.push_str(&block_raw_line(0, "module", &quote_scalar(&translation.module_name)));
    out.push_str(&block_raw_line(0, "stream", &quote_scalar(&translation.module_stream)));
    out.push_str(&format!("modified: {}\n", translation.modified));
    out.push_str("data:\n");

    let mut any = false;
    for entry in translation.entries() {
        any = true;
        out.push_str(&block_raw_line(1, &quote_scalar(entry.locale()), ""));
        if let Some(summary) = &entry.summary {
            out.push_str(&block_scalar_line(2, "summary", summary));
        }
        if let Some(description) = &entry.description {
            out.push_str(&block_scalar_line(2, "description", description));
        }
        if !entry.profile_descriptions.is_empty() {
            out.push_str(&format!("{}profiles:\n", indent(2)));
            for (profile, text) in &entry.profile_descriptions {
                out.push_str(&block_scalar_line(3, profile, text));
            }
        }
    }
    if !any {
        out.push_str("  {}\n");
    }
    out.push_str("...\n");
    Ok(out)
}

fn block_scalar_line(level: usize, key: &str, value: &str) -> String {
    crate::yaml::emit::block_scalar_line(level, key, value)
}
