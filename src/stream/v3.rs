//! `ModuleStreamV3` (spec §4.3). Grounded on `modulemd-module-stream-v3.h`
//! in `original_source/`: `platform` is promoted to a first-class field,
//! each module dependency is restricted to exactly one stream, and
//! `static_context` marks `context` as informative only.

use crate::entities::Dependencies;
use crate::error::{Error, ErrorKind, Result};
use crate::identity::StreamIdentity;

use super::common::StreamCommon;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamV3 {
    pub common: StreamCommon,
    pub platform: Option<String>,
    pub dependencies: Dependencies,
    /// When set, `context` is informative only and must not be treated as
    /// a uniqueness component during solving (spec §4.3).
    pub static_context: bool,
}

impl StreamV3 {
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
        self.common.identity.validate(true)?;
        self.dependencies.validate_single_stream_per_module()?;
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
        if self.platform.is_none() {
            return Err(Error::general(
                ErrorKind::Validate,
                "v3 stream must declare a platform",
            ));
        }
        Ok(())
    }
}
