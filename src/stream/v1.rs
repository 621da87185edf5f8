//! `ModuleStreamV1` (spec §4.3). Grounded on
//! `original_source/modulemd/v1/modulemd-module.c`, the only stream version
//! whose dependencies are flat `requires`/`buildrequires` maps of one
//! stream per module.

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind, Result};
use crate::identity::StreamIdentity;

use super::common::StreamCommon;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamV1 {
    pub common: StreamCommon,
    pub requires: BTreeMap<String, String>,
    pub buildrequires: BTreeMap<String, String>,
}

impl StreamV1 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> &StreamIdentity {
        &self.common.identity
    }

    pub fn identity_mut(&mut self) -> &mut StreamIdentity {
        &mut self.common.identity
    }

    pub fn get_nsvca(&self) -> Option<String> {
        self.common.identity.nsvca()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        self.common.identity.validate(false)?;
        for p in self.common.profiles.values() {
            p.validate()?;
        }
        for sl in self.common.servicelevels.values() {
            sl.validate()?;
        }
        for c in self.common.rpm_components.values() {
            c.validate()?;
        }
        for c in self.common.module_components.values() {
            c.validate()?;
        }
        if self.common.profiles.values().any(|p| p.default) {
            return Err(Error::general(
                ErrorKind::Validate,
                "per-profile default flags are only valid from v3 onward",
            ));
        }
        Ok(())
    }
}
