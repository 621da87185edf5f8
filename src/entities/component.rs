//! Component entities: `RpmComponent` and `ModuleComponent` (spec §3.2).
//! Grounded on `modulemd-component-rpm.h` in `original_source/`.

use std::collections::BTreeSet;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmComponent {
    key: String,
    pub rationale: Option<String>,
    pub repository: Option<String>,
    pub r#ref: Option<String>,
    pub cache: Option<String>,
    pub buildorder: i64,
    /// Empty means "all architectures".
    pub arches: BTreeSet<String>,
    pub multilib_arches: BTreeSet<String>,
    /// v2+ only.
    pub buildroot: bool,
    /// v2+ only.
    pub srpm_buildroot: bool,
}

impl RpmComponent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rationale: None,
            repository: None,
            r#ref: None,
            cache: None,
            buildorder: 0,
            arches: BTreeSet::new(),
            multilib_arches: BTreeSet::new(),
            buildroot: false,
            srpm_buildroot: false,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "rpm component must have a non-empty key",
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleComponent {
    key: String,
    pub rationale: Option<String>,
    pub repository: Option<String>,
    pub r#ref: Option<String>,
    pub buildorder: i64,
}

impl ModuleComponent {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            rationale: None,
            repository: None,
            r#ref: None,
            buildorder: 0,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.key.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "module component must have a non-empty key",
            ));
        }
        Ok(())
    }
}
