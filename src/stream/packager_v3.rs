//! `PackagerV3` — the build-time authoring dialect introduced in v3 (spec
//! §4.3, §4.4). Grounded on `modulemd-build-config.h` in
//! `original_source/`: a packager document carries no fixed
//! version/context/arch of its own; instead each [`BuildConfig`] fans out
//! into one concrete stream during upgrade.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{Buildopts, Dependencies, ModuleComponent, Profile, RpmComponent, ServiceLevel};
use crate::error::{Error, ErrorKind, Result};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BuildConfig {
    pub context: String,
    pub platform: String,
    pub dependencies: Dependencies,
    pub buildopts: Option<Buildopts>,
}

impl BuildConfig {
    pub fn validate(&self) -> Result<()> {
        if self.context.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "build config must have a non-empty context",
            ));
        }
        if self.context.len() > crate::identity::V3_MAX_CONTEXT_LEN {
            return Err(Error::general(
                ErrorKind::Validate,
                format!(
                    "build config context {:?} exceeds the {}-character limit",
                    self.context,
                    crate::identity::V3_MAX_CONTEXT_LEN
                ),
            ));
        }
        if self.platform.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "build config must declare a platform",
            ));
        }
        self.dependencies.validate_single_stream_per_module()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackagerV3 {
    pub name: String,
    pub stream: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub module_licenses: BTreeSet<String>,
    pub content_licenses: BTreeSet<String>,
    pub rpm_components: BTreeMap<String, RpmComponent>,
    pub module_components: BTreeMap<String, ModuleComponent>,
    pub profiles: BTreeMap<String, Profile>,
    pub servicelevels: BTreeMap<String, ServiceLevel>,
    pub rpm_filter: BTreeSet<String>,
    pub xmd: Option<Value>,
    pub build_configs: Vec<BuildConfig>,
}

impl PackagerV3 {
    pub fn new(name: impl Into<String>, stream: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stream: stream.into(),
            ..Default::default()
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "packager document must have a non-empty name",
            ));
        }
        if self.stream.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "packager document must have a non-empty stream",
            ));
        }
        for bc in &self.build_configs {
            bc.validate()?;
        }
        let mut seen_contexts = BTreeSet::new();
        for bc in &self.build_configs {
            if !seen_contexts.insert(&bc.context) {
                return Err(Error::general(
                    ErrorKind::Validate,
                    format!("duplicate build config context {:?}", bc.context),
                ));
            }
        }
        Ok(())
    }
}
