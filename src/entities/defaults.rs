//! `DefaultsV1` — per-distribution default-stream/default-profile policy,
//! plus intent overlays (spec §3.2, §4.7). Grounded on
//! `modulemd-defaults-v1.c` in `original_source/`, in particular
//! `modulemd_defaults_v1_merge` and `modulemd_defaults_v1_merge_default_profiles`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, ErrorKind, Result};

/// Sentinel stored in place of a conflicting `default_stream`. Never
/// returned by [`DefaultsV1::default_stream`]; present only so the merge
/// poisoning rule (spec §3.3, §4.7) can be told apart from "never set".
const MERGE_CONFLICT: &str = "\0__modulemd_merge_conflict__";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IntentOverlay {
    default_stream: Option<String>,
    pub profile_defaults: BTreeMap<String, BTreeSet<String>>,
}

impl IntentOverlay {
    pub fn default_stream(&self) -> Option<&str> {
        self.default_stream
            .as_deref()
            .filter(|s| *s != MERGE_CONFLICT)
    }

    pub fn set_default_stream(&mut self, stream: impl Into<String>) {
        self.default_stream = Some(stream.into());
    }

    fn is_poisoned(&self) -> bool {
        self.default_stream.as_deref() == Some(MERGE_CONFLICT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultsV1 {
    pub module_name: String,
    /// Tie-breaking counter only; not a wall-clock timestamp.
    pub modified: u64,
    default_stream: Option<String>,
    pub profile_defaults: BTreeMap<String, BTreeSet<String>>,
    pub intents: BTreeMap<String, IntentOverlay>,
}

impl DefaultsV1 {
    pub fn new(module_name: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            modified: 0,
            default_stream: None,
            profile_defaults: BTreeMap::new(),
            intents: BTreeMap::new(),
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// `None` both when never set and when poisoned by a merge conflict
    /// (spec §3.3: "observable as no default stream").
    pub fn default_stream(&self) -> Option<&str> {
        self.default_stream
            .as_deref()
            .filter(|s| *s != MERGE_CONFLICT)
    }

    pub fn is_poisoned(&self) -> bool {
        self.default_stream.as_deref() == Some(MERGE_CONFLICT)
    }

    pub fn set_default_stream(&mut self, stream: impl Into<String>) {
        self.default_stream = Some(stream.into());
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "defaults must have a non-empty module name",
            ));
        }
        Ok(())
    }

    fn merge_profile_defaults(
        base: &BTreeMap<String, BTreeSet<String>>,
        from: &BTreeMap<String, BTreeSet<String>>,
        base_modified: u64,
        from_modified: u64,
        strict: bool,
    ) -> Result<BTreeMap<String, BTreeSet<String>>> {
        let mut merged = base.clone();
        for (stream, from_profiles) in from {
            match merged.get(stream) {
                None => {
                    merged.insert(stream.clone(), from_profiles.clone());
                }
                Some(base_profiles) if base_profiles == from_profiles => {}
                Some(_) if from_modified > base_modified => {
                    merged.insert(stream.clone(), from_profiles.clone());
                }
                Some(_) if from_modified < base_modified => {}
                Some(_) => {
                    // equal `modified`, disagreeing content: always an
                    // error, strict or not (spec §4.7).
                    return Err(Error::general(
                        ErrorKind::Validate,
                        format!(
                            "conflicting profile defaults for stream {:?} with equal modified={}",
                            stream, from_modified
                        ),
                    ));
                }
            }
        }
        let _ = strict;
        Ok(merged)
    }

    fn merge_default_stream(
        base: Option<&str>,
        from: Option<&str>,
        base_modified: u64,
        from_modified: u64,
        strict: bool,
    ) -> Result<Option<String>> {
        match (base, from) {
            (None, None) => Ok(None),
            (Some(b), None) => Ok(Some(b.to_owned())),
            (None, Some(f)) => Ok(Some(f.to_owned())),
            (Some(b), Some(f)) if b == f => Ok(Some(b.to_owned())),
            (Some(_), Some(_)) if from_modified > base_modified => Ok(Some(from.unwrap().to_owned())),
            (Some(_), Some(_)) if from_modified < base_modified => Ok(Some(base.unwrap().to_owned())),
            (Some(_), Some(_)) => {
                if strict {
                    Err(Error::general(
                        ErrorKind::Validate,
                        "conflicting default streams with equal modified",
                    ))
                } else {
                    Ok(Some(MERGE_CONFLICT.to_owned()))
                }
            }
        }
    }

    /// Merges `from` into `self` under the "same priority" tie-break rules
    /// of spec §4.7. Priority-differs overriding is the caller's (the
    /// merger's) responsibility; this only implements the equal-priority
    /// path.
    pub fn merge_same_priority(&self, from: &DefaultsV1, strict: bool) -> Result<DefaultsV1> {
        let mut merged = self.clone();

        merged.default_stream = Self::merge_default_stream(
            self.default_stream(),
            from.default_stream(),
            self.modified,
            from.modified,
            strict,
        )?;

        merged.profile_defaults = Self::merge_profile_defaults(
            &self.profile_defaults,
            &from.profile_defaults,
            self.modified,
            from.modified,
            strict,
        )?;

        for (intent_name, from_overlay) in &from.intents {
            let base_overlay = merged.intents.entry(intent_name.clone()).or_default();
            let new_default_stream = Self::merge_default_stream(
                base_overlay.default_stream(),
                from_overlay.default_stream(),
                self.modified,
                from.modified,
                strict,
            )?;
            let new_profiles = Self::merge_profile_defaults(
                &base_overlay.profile_defaults,
                &from_overlay.profile_defaults,
                self.modified,
                from.modified,
                strict,
            )?;
            let poisoned = new_default_stream.as_deref() == Some(MERGE_CONFLICT);
            *base_overlay = IntentOverlay {
                default_stream: new_default_stream,
                profile_defaults: new_profiles,
            };
            if poisoned {
                base_overlay.default_stream = Some(MERGE_CONFLICT.to_owned());
            }
        }

        merged.modified = self.modified.max(from.modified);
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s4_merge_with_different_modified_takes_higher() {
        let mut a = DefaultsV1::new("foo");
        a.modified = 100;
        a.set_default_stream("latest");

        let mut b = DefaultsV1::new("foo");
        b.modified = 200;
        b.set_default_stream("earliest");

        let merged = a.merge_same_priority(&b, false).unwrap();
        assert_eq!(merged.default_stream(), Some("earliest"));
        assert_eq!(merged.modified, 200);
    }

    #[test]
    fn s5_merge_conflict_poisons_non_strict() {
        let mut a = DefaultsV1::new("foo");
        a.modified = 100;
        a.set_default_stream("latest");

        let mut b = DefaultsV1::new("foo");
        b.modified = 100;
        b.set_default_stream("earliest");

        let merged = a.merge_same_priority(&b, false).unwrap();
        assert_eq!(merged.default_stream(), None);
        assert!(merged.is_poisoned());
    }

    #[test]
    fn s5_merge_conflict_is_error_in_strict_mode() {
        let mut a = DefaultsV1::new("foo");
        a.modified = 100;
        a.set_default_stream("latest");

        let mut b = DefaultsV1::new("foo");
        b.modified = 100;
        b.set_default_stream("earliest");

        let err = a.merge_same_priority(&b, true).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validate));
    }

    #[test]
    fn one_side_missing_default_stream_keeps_the_present_one() {
        let a = DefaultsV1::new("foo");
        let mut b = DefaultsV1::new("foo");
        b.set_default_stream("latest");

        let merged = a.merge_same_priority(&b, false).unwrap();
        assert_eq!(merged.default_stream(), Some("latest"));
    }

    #[test]
    fn profile_default_conflict_with_equal_modified_errors_regardless_of_strictness() {
        let mut a = DefaultsV1::new("foo");
        a.profile_defaults
            .insert("latest".to_owned(), BTreeSet::from(["bar".to_owned()]));
        let mut b = DefaultsV1::new("foo");
        b.profile_defaults
            .insert("latest".to_owned(), BTreeSet::from(["baz".to_owned()]));

        assert!(a.merge_same_priority(&b, false).is_err());
        assert!(a.merge_same_priority(&b, true).is_err());
    }
}
