//! Subdocument diagnostics (spec §4.5, component C6): each subdocument in a
//! multi-document stream returns either a typed document or an error, plus
//! the raw YAML that produced it, so a bad subdocument never aborts the
//! whole read.

use crate::entities::{DefaultsV1, Obsoletes, Translation};
use crate::error::Error;
use crate::stream::{ModuleStream, PackagerV3};

#[derive(Debug, Clone)]
pub enum Document {
    Stream(ModuleStream),
    Defaults(DefaultsV1),
    Translation(Translation),
    Packager(PackagerV3),
    Obsoletes(Obsoletes),
}

impl Document {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Document::Stream(_) => "modulemd-stream",
            Document::Defaults(_) => "modulemd-defaults",
            Document::Translation(_) => "modulemd-translations",
            Document::Packager(_) => "modulemd-packager",
            Document::Obsoletes(_) => "modulemd-obsoletes",
        }
    }
}

/// One subdocument's outcome plus the raw bytes that produced it (spec
/// §4.5, §7 "A parser error inside one subdocument is attached to that
/// subdocument's diagnostic record and parsing continues with the next
/// subdocument").
pub struct SubdocumentInfo {
    pub result: Result<Document, Error>,
    pub raw_yaml: String,
}

impl SubdocumentInfo {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}
