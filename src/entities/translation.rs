//! `TranslationEntry` and `Translation` (spec §3.2). Grounded on
//! `modulemd-translation-entry.c` / `modulemd-translation.c` in
//! `original_source/`.
//!
//! An empty translated string is a deliberate "unset" marker, used during
//! merge to tombstone a previously-set field (spec §3.3, §4.7).

use std::collections::BTreeMap;

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationEntry {
    locale: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub profile_descriptions: BTreeMap<String, String>,
}

impl TranslationEntry {
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            summary: None,
            description: None,
            profile_descriptions: BTreeMap::new(),
        }
    }

    /// `locale` is immutable once an entry is constructed.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn validate(&self) -> Result<()> {
        if self.locale.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "translation entry must have a non-empty locale",
            ));
        }
        Ok(())
    }

    /// An empty string and an absent field are both "unset" for merge
    /// purposes (spec, SPEC_FULL §3 supplement).
    fn field_set(field: &Option<String>) -> bool {
        field.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Merges `from` into `self`, tombstoning any field `from` sets to the
    /// empty string.
    pub fn merge_from(&mut self, from: &TranslationEntry) {
        match &from.summary {
            Some(s) if s.is_empty() => self.summary = None,
            Some(_) => self.summary = from.summary.clone(),
            None => {}
        }
        match &from.description {
            Some(s) if s.is_empty() => self.description = None,
            Some(_) => self.description = from.description.clone(),
            None => {}
        }
        for (profile, text) in &from.profile_descriptions {
            if text.is_empty() {
                self.profile_descriptions.remove(profile);
            } else {
                self.profile_descriptions
                    .insert(profile.clone(), text.clone());
            }
        }
    }

    pub fn has_summary(&self) -> bool {
        Self::field_set(&self.summary)
    }

    pub fn has_description(&self) -> bool {
        Self::field_set(&self.description)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub module_name: String,
    pub module_stream: String,
    /// Tie-breaking counter only; not a wall-clock timestamp.
    pub modified: u64,
    entries: BTreeMap<String, TranslationEntry>,
}

impl Translation {
    pub fn new(module_name: impl Into<String>, module_stream: impl Into<String>) -> Self {
        Self {
            module_name: module_name.into(),
            module_stream: module_stream.into(),
            modified: 0,
            entries: BTreeMap::new(),
        }
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn set_entry(&mut self, entry: TranslationEntry) {
        self.entries.insert(entry.locale().to_owned(), entry);
    }

    pub fn entry(&self, locale: &str) -> Option<&TranslationEntry> {
        self.entries.get(locale)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TranslationEntry> {
        self.entries.values()
    }

    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    pub fn validate(&self) -> Result<()> {
        if self.module_name.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "translation must have a non-empty module name",
            ));
        }
        if self.module_stream.is_empty() {
            return Err(Error::general(
                ErrorKind::Validate,
                "translation must have a non-empty module stream",
            ));
        }
        for entry in self.entries.values() {
            entry.validate()?;
        }
        Ok(())
    }

    /// Merges `from` into `self` by the higher-`modified`-wins rule, folding
    /// in per-locale tombstones (spec §4.7).
    pub fn merge_from(&mut self, from: &Translation) {
        if from.modified < self.modified {
            return;
        }
        self.modified = from.modified;
        for entry in from.entries.values() {
            let merged = self
                .entries
                .entry(entry.locale().to_owned())
                .or_insert_with(|| TranslationEntry::new(entry.locale()));
            merged.merge_from(entry);
        }
    }
}
