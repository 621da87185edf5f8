//! `Buildopts` — build-time package selection options (spec §3.2).
//! Grounded on `modulemd-buildopts.h` in `original_source/`.

use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Buildopts {
    /// Free-form string inserted verbatim into the RPM build macros.
    pub rpm_macros: Option<String>,
    pub rpm_whitelist: BTreeSet<String>,
    /// Empty means "all architectures".
    pub arches: BTreeSet<String>,
}

impl Buildopts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.rpm_macros.is_none() && self.rpm_whitelist.is_empty() && self.arches.is_empty()
    }
}
