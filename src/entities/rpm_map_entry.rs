//! `RpmMapEntry` — `(name, epoch, version, release, arch)` identity for a
//! binary package, plus its canonical `nevra` string (spec §3.2, §8 S2).
//! Grounded on `modulemd-rpm-map-entry.c` in `original_source/`.

use crate::error::{Error, Result, YamlErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpmMapEntry {
    pub name: String,
    pub epoch: u64,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl RpmMapEntry {
    pub fn new(
        name: impl Into<String>,
        epoch: u64,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            epoch,
            version: version.into(),
            release: release.into(),
            arch: arch.into(),
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Recomputes `name-epoch:version-release.arch` from the current field
    /// values, rather than trusting a cached string (spec §3.3).
    pub fn nevra(&self) -> String {
        format!(
            "{}-{}:{}-{}.{}",
            self.name, self.epoch, self.version, self.release, self.arch
        )
    }

    /// Parses an entry given the five components plus the YAML document's
    /// `nevra` field, failing with `INCONSISTENT` if they disagree (spec
    /// §3.3, §8 S2).
    pub fn parse_with_nevra(
        name: String,
        epoch: u64,
        version: String,
        release: String,
        arch: String,
        nevra: &str,
    ) -> Result<Self> {
        let entry = Self::new(name, epoch, version, release, arch);
        let computed = entry.nevra();
        if computed != nevra {
            return Err(Error::yaml(
                YamlErrorKind::Inconsistent,
                format!(
                    "rpm-map nevra {:?} does not match assembled form {:?}",
                    nevra, computed
                ),
            ));
        }
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nevra_matches_assembled_form() {
        let e = RpmMapEntry::new("bar", 0, "1.23", "1.module_el8+1+abc", "x86_64");
        assert_eq!(e.nevra(), "bar-0:1.23-1.module_el8+1+abc.x86_64");
    }

    #[test]
    fn parse_with_nevra_rejects_mismatch() {
        let err = RpmMapEntry::parse_with_nevra(
            "bar".to_owned(),
            0,
            "1.23".to_owned(),
            "1.module_el8+1+abc".to_owned(),
            "x86_64".to_owned(),
            "bar-1:1.23-1.module_el8+1+abc.x86_64",
        )
        .unwrap_err();
        assert_eq!(err.yaml_kind(), Some(YamlErrorKind::Inconsistent));
    }

    #[test]
    fn parse_with_nevra_accepts_match() {
        let e = RpmMapEntry::parse_with_nevra(
            "bar".to_owned(),
            0,
            "1.23".to_owned(),
            "1.module_el8+1+abc".to_owned(),
            "x86_64".to_owned(),
            "bar-0:1.23-1.module_el8+1+abc.x86_64",
        )
        .unwrap();
        assert_eq!(e.name, "bar");
    }
}
