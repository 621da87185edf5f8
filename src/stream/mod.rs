//! Stream documents (spec §4.3, component C3) and the upgrade ladder
//! between them (spec §4.4, component C4).
//!
//! The source's derivable `ModuleStream` base class with three concrete
//! subclasses becomes a sum type here (spec §9): shared query methods
//! dispatch on the variant, while fields specific to one version live only
//! on that version's struct.

pub mod common;
pub mod packager_v3;
pub mod upgrade;
pub mod v1;
pub mod v2;
pub mod v3;

pub use packager_v3::{BuildConfig, PackagerV3};
pub use v1::StreamV1;
pub use v2::StreamV2;
pub use v3::StreamV3;

use std::collections::BTreeSet;

use crate::entities::{ModuleComponent, Profile, RpmComponent, ServiceLevel};
use crate::error::Result;
use crate::identity::StreamIdentity;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleStream {
    V1(StreamV1),
    V2(StreamV2),
    V3(StreamV3),
}

impl ModuleStream {
    pub fn identity(&self) -> &StreamIdentity {
        match self {
            ModuleStream::V1(s) => s.identity(),
            ModuleStream::V2(s) => s.identity(),
            ModuleStream::V3(s) => s.identity(),
        }
    }

    pub fn identity_mut(&mut self) -> &mut StreamIdentity {
        match self {
            ModuleStream::V1(s) => s.identity_mut(),
            ModuleStream::V2(s) => s.identity_mut(),
            ModuleStream::V3(s) => s.identity_mut(),
        }
    }

    pub fn mdversion(&self) -> u8 {
        match self {
            ModuleStream::V1(_) => 1,
            ModuleStream::V2(_) => 2,
            ModuleStream::V3(_) => 3,
        }
    }

    pub fn get_nsvca(&self) -> Option<String> {
        self.identity().nsvca()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModuleStream::V1(s) => s.validate(),
            ModuleStream::V2(s) => s.validate(),
            ModuleStream::V3(s) => s.validate(),
        }
    }

    pub fn summary(&self) -> Option<&str> {
        match self {
            ModuleStream::V1(s) => s.common.summary.as_deref(),
            ModuleStream::V2(s) => s.common.summary.as_deref(),
            ModuleStream::V3(s) => s.common.summary.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            ModuleStream::V1(s) => s.common.description.as_deref(),
            ModuleStream::V2(s) => s.common.description.as_deref(),
            ModuleStream::V3(s) => s.common.description.as_deref(),
        }
    }

    pub fn licenses(&self) -> (&BTreeSet<String>, &BTreeSet<String>) {
        match self {
            ModuleStream::V1(s) => s.common.licenses(),
            ModuleStream::V2(s) => s.common.licenses(),
            ModuleStream::V3(s) => s.common.licenses(),
        }
    }

    pub fn profiles(&self) -> impl Iterator<Item = &Profile> {
        match self {
            ModuleStream::V1(s) => s.common.profiles.values(),
            ModuleStream::V2(s) => s.common.profiles.values(),
            ModuleStream::V3(s) => s.common.profiles.values(),
        }
    }

    pub fn servicelevels(&self) -> impl Iterator<Item = &ServiceLevel> {
        match self {
            ModuleStream::V1(s) => s.common.servicelevels.values(),
            ModuleStream::V2(s) => s.common.servicelevels.values(),
            ModuleStream::V3(s) => s.common.servicelevels.values(),
        }
    }

    pub fn rpm_components(&self) -> impl Iterator<Item = &RpmComponent> {
        match self {
            ModuleStream::V1(s) => s.common.rpm_components.values(),
            ModuleStream::V2(s) => s.common.rpm_components.values(),
            ModuleStream::V3(s) => s.common.rpm_components.values(),
        }
    }

    pub fn module_components(&self) -> impl Iterator<Item = &ModuleComponent> {
        match self {
            ModuleStream::V1(s) => s.common.module_components.values(),
            ModuleStream::V2(s) => s.common.module_components.values(),
            ModuleStream::V3(s) => s.common.module_components.values(),
        }
    }

    pub fn rpm_artifacts(&self) -> &BTreeSet<String> {
        match self {
            ModuleStream::V1(s) => &s.common.rpm_artifacts,
            ModuleStream::V2(s) => &s.common.rpm_artifacts,
            ModuleStream::V3(s) => &s.common.rpm_artifacts,
        }
    }

    pub fn rpm_filter(&self) -> &BTreeSet<String> {
        match self {
            ModuleStream::V1(s) => &s.common.rpm_filter,
            ModuleStream::V2(s) => &s.common.rpm_filter,
            ModuleStream::V3(s) => &s.common.rpm_filter,
        }
    }

    pub fn xmd(&self) -> Option<&Value> {
        match self {
            ModuleStream::V1(s) => s.common.xmd.as_ref(),
            ModuleStream::V2(s) => s.common.xmd.as_ref(),
            ModuleStream::V3(s) => s.common.xmd.as_ref(),
        }
    }

    /// Flattened `(module, stream-choices)` view of dependencies, uniform
    /// across versions: v1's flat singleton maps, v2's array of blocks
    /// (streams unioned across blocks), and v3's single-stream map all
    /// collapse to the same shape for querying.
    pub fn buildtime_dependencies(&self) -> std::collections::BTreeMap<String, BTreeSet<String>> {
        match self {
            ModuleStream::V1(s) => s
                .buildrequires
                .iter()
                .map(|(m, st)| (m.clone(), BTreeSet::from([st.clone()])))
                .collect(),
            ModuleStream::V2(s) => {
                let mut out: std::collections::BTreeMap<String, BTreeSet<String>> =
                    std::collections::BTreeMap::new();
                for deps in &s.dependencies {
                    for (m, streams) in &deps.buildtime {
                        out.entry(m.clone()).or_default().extend(streams.clone());
                    }
                }
                out
            }
            ModuleStream::V3(s) => s.dependencies.buildtime.clone(),
        }
    }

    /// Upgrades this stream to `target` (1, 2 or 3), applying the ladder
    /// one rung at a time. Downgrades are rejected with `UPGRADE_ERROR`
    /// (spec §4.6).
    pub fn upgrade_to(&self, target: u8) -> Result<ModuleStream> {
        use crate::error::{Error, ErrorKind};

        let current = self.mdversion();
        if target < current {
            return Err(Error::general(
                ErrorKind::Upgrade,
                format!("cannot downgrade a v{} stream to v{}", current, target),
            ));
        }

        let mut stream = self.clone();
        while stream.mdversion() < target {
            stream = match stream {
                ModuleStream::V1(s) => ModuleStream::V2(upgrade::v1_to_v2(&s)),
                ModuleStream::V2(s) => ModuleStream::V3(upgrade::v2_to_v3(&s)?),
                ModuleStream::V3(_) => unreachable!("v3 is the ladder's top rung"),
            };
        }
        Ok(stream)
    }

    pub fn runtime_dependencies(&self) -> std::collections::BTreeMap<String, BTreeSet<String>> {
        match self {
            ModuleStream::V1(s) => s
                .requires
                .iter()
                .map(|(m, st)| (m.clone(), BTreeSet::from([st.clone()])))
                .collect(),
            ModuleStream::V2(s) => {
                let mut out: std::collections::BTreeMap<String, BTreeSet<String>> =
                    std::collections::BTreeMap::new();
                for deps in &s.dependencies {
                    for (m, streams) in &deps.runtime {
                        out.entry(m.clone()).or_default().extend(streams.clone());
                    }
                }
                out
            }
            ModuleStream::V3(s) => s.dependencies.runtime.clone(),
        }
    }
}
