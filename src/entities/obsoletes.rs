//! `Obsoletes` — a record declaring a stream superseded (spec §3.2).
//! Grounded on the obsoletes handling sketched in
//! `modulemd-module-index.h` (no dedicated `.c` file was retrieved, so the
//! shape follows the defaults/translation sibling documents).

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Obsoletes {
    pub module_name: String,
    pub module_stream: String,
    pub context: Option<String>,
    /// Tie-breaking counter only; not a wall-clock timestamp.
    pub modified: u64,
    pub message: Option<String>,
    pub obsoleted_by_module_name: Option<String>,
    pub obsoleted_by_module_stream: Option<String>,
    pub eol_date: Option<chrono::NaiveDate>,
    /// Hides this record from normal lookup while it stays present in the
    /// aggregated per-module view (spec §3.2).
    pub reset: bool,
}

impl Obsoletes {
    pub fn new(module_name: impl Into<String>, module_stream: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            module_stream: module_stream.into(),
            context: None,
            modified: 0,
            message: None,
            obsoleted_by_module_name: None,
            obsoleted_by_module_stream: None,
            eol_date: None,
            reset: false,
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `(module, stream, context, modified)`, the key obsoletes merge by
    /// (spec §4.7).
    pub fn key(&self) -> (String, String, Option<String>, u64) {
        (
            self.module_name.clone(),
            self.module_stream.clone(),
            self.context.clone(),
            self.modified,
        )
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "obsoletes must have a non-empty module name",
            ));
        }
        if self.module_stream.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "obsoletes must have a non-empty module stream",
            ));
        }
        Ok(())
    }
}
