//! The YAML codec (spec §4.5, component C5): multi-document stream
//! splitting, per-document-type dispatch, and emission.
//!
//! Each subdocument is parsed into a `serde_yaml::Value` tree (reusing
//! `serde_yaml`'s own multi-document deserializer for the outer split) and
//! then walked by hand through `yaml::parse`'s helpers - the architecture
//! decision recorded in SPEC_FULL.md §4, standing in for a hand-rolled
//! libyaml pull-parser.

pub mod codec;
pub mod diagnostics;
pub mod emit;
pub mod parse;
pub mod reader;
pub mod writer;

use serde_yaml::Mapping;

pub use diagnostics::{Document, SubdocumentInfo};
pub use reader::YamlReader;
pub use writer::YamlWriter;

use crate::error::{Error, ErrorKind, Result, YamlErrorKind};

/// Governs the lenience of a read. Defaults match upstream's historical
/// behaviour: non-strict, no legacy u64-overflow coercion (spec §9 Open
/// Questions / SPEC_FULL §4 resolution).
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Reject any key the target schema doesn't recognize with
    /// `UNKNOWN_ATTR` instead of silently ignoring it.
    pub strict: bool,
    /// Coerce the historical `-1`/`18446744073709551615` overflow sentinel
    /// to `u64::MAX` instead of rejecting it with a `PARSE` error.
    pub allow_legacy_u64_overflow: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strict: false,
            allow_legacy_u64_overflow: false,
        }
    }
}

/// Splits a multi-document YAML stream on bare `---`/`...` document
/// markers, preserving each subdocument's raw text for diagnostics (spec
/// §4.5, §7).
pub fn split_documents(input: &str) -> Vec<String> {
    let mut docs = Vec::new();
    let mut current = String::new();
    let mut has_content = false;

    for line in input.lines() {
        let trimmed = line.trim_end();
        if trimmed.trim() == "---" {
            if has_content {
                docs.push(std::mem::take(&mut current));
                has_content = false;
            }
            continue;
        }
        if trimmed.trim() == "..." {
            if has_content {
                docs.push(std::mem::take(&mut current));
                has_content = false;
            }
            continue;
        }
        current.push_str(line);
        current.push('\n');
        if !trimmed.trim().is_empty() {
            has_content = true;
        }
    }
    if has_content {
        docs.push(current);
    }
    docs
}

fn dispatch_document(value: &serde_yaml::Value, options: &ParseOptions) -> Result<Document> {
    let top = parse::as_mapping(value)?;
    let document_kind = parse::require_str(top, "document")?;
    let version = parse::require_u64(top, "version", options.allow_legacy_u64_overflow)?;

    match document_kind.as_str() {
        "modulemd" | "modulemd-stream" => {
            if document_kind == "modulemd" && version > 2 {
                // v3+ streams must use the unambiguous `modulemd-stream` name
                // (spec §4.3: `modulemd` is only a legal alias up to v2).
                return Err(Error::yaml(
                    YamlErrorKind::Parse,
                    "document type \"modulemd\" is only a legal stream alias up to mdversion 2".to_owned(),
                ));
            }
            Ok(Document::Stream(codec::stream::parse_stream(top, version, options)?))
        }
        "modulemd-defaults" => Ok(Document::Defaults(codec::defaults::parse_defaults(top, version, options)?)),
        "modulemd-translations" => Ok(Document::Translation(codec::translation::parse_translation(
            top, version, options,
        )?)),
        "modulemd-obsoletes" => Ok(Document::Obsoletes(codec::obsoletes::parse_obsoletes(top, version, options)?)),
        "modulemd-packager" => {
            if version < 2 {
                return Err(Error::yaml(
                    YamlErrorKind::Parse,
                    "modulemd-packager documents require mdversion 2 or greater".to_owned(),
                ));
            }
            Ok(Document::Packager(codec::packager::parse_packager(top, version, options)?))
        }
        other => Err(Error::yaml(
            YamlErrorKind::Parse,
            format!("unrecognized document type {:?}", other),
        )),
    }
}

/// Reads every subdocument in `bytes`, returning one [`SubdocumentInfo`]
/// per subdocument. A malformed subdocument never aborts the read; its
/// failure is attached to its own record and parsing continues with the
/// next one (spec §4.5, §7).
pub fn read_documents(bytes: &[u8], options: &ParseOptions) -> Result<Vec<SubdocumentInfo>> {
    let text = std::str::from_utf8(bytes).map_err(|err| {
        Error::yaml(YamlErrorKind::Parse, format!("input is not valid UTF-8: {}", err))
    })?;

    let mut out = Vec::new();
    for raw in split_documents(text) {
        let result = match serde_yaml::from_str::<serde_yaml::Value>(&raw) {
            Err(err) => Err(Error::yaml(YamlErrorKind::Unparseable, format!("malformed YAML: {}", err))),
            Ok(serde_yaml::Value::Null) => continue,
            Ok(value) => dispatch_document(&value, options),
        };
        out.push(SubdocumentInfo { result, raw_yaml: raw });
    }
    Ok(out)
}

/// Validates then emits `doc` as a complete `---`/`...`-delimited
/// subdocument. Validation failures never produce partial output (spec
/// §4.5).
pub fn emit_document(doc: &Document) -> Result<String> {
    match doc {
        Document::Stream(s) => codec::stream::emit_stream(s),
        Document::Defaults(d) => codec::defaults::emit_defaults(d),
        Document::Translation(t) => codec::translation::emit_translation(t),
        Document::Packager(p) => codec::packager::emit_packager(p),
        Document::Obsoletes(o) => codec::obsoletes::emit_obsoletes(o),
    }
}

/// Convenience used by the index's "compressed input" rejection rule: the
/// first two bytes of gzip, the four-byte xz magic, and zstd's magic are
/// all not valid starts of a UTF-8 YAML stream, so the gate is simply
/// "did UTF-8 decoding fail or did we see no document markers at all on a
/// binary-looking prefix" (spec §9 Open Questions / SPEC_FULL §4
/// resolution: refuse compressed input, don't try to sniff and
/// transparently decompress it).
pub fn looks_compressed(bytes: &[u8]) -> bool {
    matches!(
        bytes.get(0..2),
        Some([0x1f, 0x8b])
    ) || matches!(bytes.get(0..4), Some([0xfd, b'7', b'z', b'X']))
        || matches!(bytes.get(0..4), Some([0x28, 0xb5, 0x2f, 0xfd]))
}

pub(crate) fn reject_if_compressed(bytes: &[u8]) -> Result<()> {
    if looks_compressed(bytes) {
        return Err(Error::general(
            ErrorKind::Magic,
            "input looks like a compressed stream; decompress it before parsing",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_multi_document_stream() {
        let input = "---\ndocument: modulemd-defaults\nversion: 1\nmodule: foo\n...\n---\ndocument: modulemd-defaults\nversion: 1\nmodule: bar\n...\n";
        let docs = split_documents(input);
        assert_eq!(docs.len(), 2);
        assert!(docs[0].contains("foo"));
        assert!(docs[1].contains("bar"));
    }

    #[test]
    fn a_malformed_subdocument_does_not_abort_the_whole_read() {
        let input = "---\n: not valid : yaml : at : all\n...\n---\ndocument: modulemd-defaults\nversion: 1\nmodule: foo\nmodified: 1\ndata: {}\n...\n";
        let infos = read_documents(input.as_bytes(), &ParseOptions::default()).unwrap();
        assert_eq!(infos.len(), 2);
        assert!(!infos[0].is_ok());
        assert!(infos[1].is_ok());
    }

    #[test]
    fn modulemd_alias_is_rejected_past_mdversion_2() {
        let input = "---\ndocument: modulemd\nversion: 3\ndata:\n  name: foo\n...\n";
        let infos = read_documents(input.as_bytes(), &ParseOptions::default()).unwrap();
        assert!(!infos[0].is_ok());
    }

    #[test]
    fn gzip_magic_is_flagged_as_compressed() {
        assert!(looks_compressed(&[0x1f, 0x8b, 0x08, 0x00]));
        assert!(!looks_compressed(b"---\ndocument"));
    }
}
