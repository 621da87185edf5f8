//! Fields shared by every stream schema version (spec §9: "shared fields
//! ... factored into a `StreamIdentity` struct that each variant
//! contains"). `StreamCommon` extends that idea to the rest of the fields
//! every version carries.

use std::collections::{BTreeMap, BTreeSet};

use crate::entities::{ModuleComponent, Profile, RpmComponent, ServiceLevel};
use crate::identity::StreamIdentity;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamCommon {
    pub identity: StreamIdentity,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub module_licenses: BTreeSet<String>,
    pub content_licenses: BTreeSet<String>,
    pub rpm_components: BTreeMap<String, RpmComponent>,
    pub module_components: BTreeMap<String, ModuleComponent>,
    pub profiles: BTreeMap<String, Profile>,
    pub servicelevels: BTreeMap<String, ServiceLevel>,
    pub rpm_artifacts: BTreeSet<String>,
    pub rpm_filter: BTreeSet<String>,
    pub xmd: Option<Value>,
}

impl StreamCommon {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn licenses(&self) -> (&BTreeSet<String>, &BTreeSet<String>) {
        (&self.module_licenses, &self.content_licenses)
    }

    pub fn add_profile(&mut self, profile: Profile) {
        self.profiles.insert(profile.name().to_owned(), profile);
    }

    pub fn add_servicelevel(&mut self, sl: ServiceLevel) {
        self.servicelevels.insert(sl.name.clone(), sl);
    }

    pub fn add_rpm_component(&mut self, c: RpmComponent) {
        self.rpm_components.insert(c.key().to_owned(), c);
    }

    pub fn add_module_component(&mut self, c: ModuleComponent) {
        self.module_components.insert(c.key().to_owned(), c);
    }
}
