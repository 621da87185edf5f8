//! `Profile` — a named set of RPMs installed together (spec §3.2).
//! Grounded on `modulemd-profile.h` in `original_source/`.

use std::collections::BTreeSet;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    name: String,
    pub description: Option<String>,
    pub rpms: BTreeSet<String>,
    /// Valid in v3 profiles only; ignored (but preserved) elsewhere.
    pub default: bool,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            rpms: BTreeSet::new(),
            default: false,
        }
    }

    /// `name` is immutable once a profile is constructed.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "profile must have a non-empty name",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_is_independent() {
        let mut p = Profile::new("server");
        p.rpms.insert("bar".to_owned());
        let mut q = p.copy();
        q.rpms.insert("baz".to_owned());
        assert_eq!(p.rpms.len(), 1);
        assert_eq!(q.rpms.len(), 2);
    }
}
