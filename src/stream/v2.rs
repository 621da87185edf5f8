//! `ModuleStreamV2` (spec §4.3). Grounded on `modulemd-module-stream-v2.h`
//! in `original_source/`. V2 is the canonical "stable" form: dependencies
//! are an array of [`Dependencies`] blocks, each of which may offer several
//! acceptable streams per module.

use std::collections::BTreeSet;

use crate::entities::Dependencies;
use crate::error::{Error, ErrorKind, Result};
use crate::identity::StreamIdentity;

use super::common::StreamCommon;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamV2 {
    pub common: StreamCommon,
    pub dependencies: Vec<Dependencies>,
    /// Profile names considered default for this stream. V2 has no
    /// per-`Profile` `default` flag (that arrives in v3); this is the
    /// stream-level equivalent (SPEC_FULL §4.3).
    pub default_profiles: BTreeSet<String>,
}

impl StreamV2 {
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
        if self.common.profiles.values().any(|p| p.default) {
            return Err(Error::general(
                ErrorKind::Validate,
                "per-profile default flags are only valid from v3 onward",
            ));
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
        Ok(())
    }

    /// Legal to upgrade to v3 iff there is exactly one `Dependencies` block
    /// whose buildtime set contains exactly one `platform` dependency with
    /// exactly one stream, and every other buildtime/runtime dependency
    /// also has exactly one stream (spec §4.4).
    pub fn can_upgrade_to_v3(&self) -> Result<&Dependencies> {
        if self.dependencies.len() != 1 {
            return Err(Error::general(
                ErrorKind::Upgrade,
                format!(
                    "v2 to v3 upgrade requires exactly one dependencies block, found {}",
                    self.dependencies.len()
                ),
            ));
        }
        let deps = &self.dependencies[0];
        let platform_streams = deps.buildtime.get("platform").ok_or_else(|| {
            Error::general(
                ErrorKind::Upgrade,
                "v2 to v3 upgrade requires a buildtime dependency on platform",
            )
        })?;
        if platform_streams.len() != 1 {
            return Err(Error::general(
                ErrorKind::Upgrade,
                "v2 to v3 upgrade requires exactly one platform stream",
            ));
        }
        deps.validate_single_stream_per_module()?;
        Ok(deps)
    }
}
