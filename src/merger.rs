//! `IndexMerger` - priority-weighted N-way merge of multiple
//! [`ModuleIndex`]es into one (spec §4.7, component C9). Grounded on
//! `modulemd-module-index-merger.c` in `original_source/`.

use std::collections::BTreeMap;

use crate::entities::{DefaultsV1, Obsoletes, Translation};
use crate::error::{Error, ErrorKind, Result};
use crate::index::ModuleIndex;
use crate::stream::ModuleStream;

struct Source {
    index: ModuleIndex,
    priority: i32,
}

/// Consumes one or more prioritized [`ModuleIndex`]es and produces their
/// merge. A merger is spent after [`IndexMerger::resolve`] runs once
/// (spec §4.7: "the merger is single-use").
#[derive(Default)]
pub struct IndexMerger {
    sources: Vec<Source>,
    resolved: bool,
}

impl IndexMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `index` at `priority` (higher wins ties other than the
    /// equal-`modified` poisoning rule, which applies only within a single
    /// priority tier - spec §4.7).
    pub fn add_index(&mut self, index: ModuleIndex, priority: i32) -> Result<()> {
        if self.resolved {
            return Err(Error::general(
                ErrorKind::Validate,
                "this merger has already been resolved and cannot accept more sources",
            ));
        }
        self.sources.push(Source { index, priority });
        Ok(())
    }

    fn merge_streams(&self, merged: &mut ModuleIndex) -> Result<()> {
        let mut best: BTreeMap<String, (i32, ModuleStream)> = BTreeMap::new();
        for source in &self.sources {
            for name in source.index.get_module_names() {
                let Some(module) = source.index.get_module(name) else { continue };
                for stream in module.streams() {
                    let Some(nsvca) = stream.get_nsvca() else { continue };
                    match best.get(&nsvca) {
                        None => {
                            best.insert(nsvca, (source.priority, stream.clone()));
                        }
                        Some((prio, _)) if source.priority > *prio => {
                            best.insert(nsvca, (source.priority, stream.clone()));
                        }
                        // Equal or lower priority: last-insert-within-lower-tier
                        // never overrides a higher tier, and a same-priority
                        // repeat keeps whichever was seen first (spec §9 Open
                        // Questions / SPEC_FULL §4 resolution: "last insert
                        // wins" applies to `ModuleIndex::add_module_stream`
                        // directly, not to the merger's cross-source priority
                        // resolution).
                        _ => {}
                    }
                }
            }
        }
        for (_, (_, stream)) in best {
            merged.add_module_stream(stream)?;
        }
        Ok(())
    }

    fn merge_defaults(&self, merged: &mut ModuleIndex, strict: bool) -> Result<()> {
        let mut by_module: BTreeMap<String, (i32, DefaultsV1)> = BTreeMap::new();
        for source in &self.sources {
            for name in source.index.get_module_names() {
                let Some(module) = source.index.get_module(name) else { continue };
                let Some(defaults) = module.defaults() else { continue };
                match by_module.get(name) {
                    None => {
                        by_module.insert(name.to_owned(), (source.priority, defaults.clone()));
                    }
                    Some((prio, _)) if source.priority > *prio => {
                        by_module.insert(name.to_owned(), (source.priority, defaults.clone()));
                    }
                    Some((prio, existing)) if source.priority == *prio => {
                        let merged_defaults = existing.merge_same_priority(defaults, strict)?;
                        by_module.insert(name.to_owned(), (*prio, merged_defaults));
                    }
                    _ => {}
                }
            }
        }
        for (_, (_, defaults)) in by_module {
            merged.add_defaults(defaults)?;
        }
        Ok(())
    }

    fn merge_translations(&self, merged: &mut ModuleIndex) -> Result<()> {
        let mut by_key: BTreeMap<(String, String), Translation> = BTreeMap::new();
        for source in &self.sources {
            for name in source.index.get_module_names() {
                let Some(module) = source.index.get_module(name) else { continue };
                for stream_name in module.stream_names() {
                    let Some(translation) = module.translation(&stream_name) else { continue };
                    let key = (name.to_owned(), stream_name.clone());
                    by_key
                        .entry(key)
                        .and_modify(|existing| existing.merge_from(translation))
                        .or_insert_with(|| translation.clone());
                }
            }
        }
        for (_, translation) in by_key {
            merged.add_translation(translation)?;
        }
        Ok(())
    }

    fn merge_obsoletes(&self, merged: &mut ModuleIndex) -> Result<()> {
        let mut by_key: BTreeMap<(String, String, Option<String>, u64), Obsoletes> = BTreeMap::new();
        for source in &self.sources {
            for name in source.index.get_module_names() {
                let Some(module) = source.index.get_module(name) else { continue };
                for stream_name in module.stream_names() {
                    for obsoletes in module.active_obsoletes(&stream_name) {
                        by_key.entry(obsoletes.key()).or_insert_with(|| obsoletes.clone());
                    }
                }
            }
        }
        for (_, obsoletes) in by_key {
            merged.add_obsoletes(obsoletes)?;
        }
        Ok(())
    }

    /// Performs the merge, in non-strict mode, consuming this merger (spec
    /// §4.7: a conflicting default stream with equal `modified` poisons
    /// rather than errors by default).
    pub fn resolve(&mut self) -> Result<ModuleIndex> {
        self.resolve_with_strictness(false)
    }

    /// Performs the merge with non-strict equal-`modified` conflict
    /// handling for defaults (spec §4.7: conflicting default streams with
    /// equal `modified` poison rather than error).
    pub fn resolve_with_strictness(&mut self, strict: bool) -> Result<ModuleIndex> {
        if self.resolved {
            return Err(Error::general(
                ErrorKind::Validate,
                "this merger has already been resolved",
            ));
        }
        self.resolved = true;

        let mut merged = ModuleIndex::new();
        self.merge_streams(&mut merged)?;
        self.merge_defaults(&mut merged, strict)?;
        self.merge_translations(&mut merged)?;
        self.merge_obsoletes(&mut merged)?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StreamIdentity;
    use crate::stream::StreamV1;

    fn index_with_stream(name: &str, stream: &str) -> ModuleIndex {
        let mut index = ModuleIndex::new();
        let mut s = StreamV1::new();
        s.common.identity = StreamIdentity {
            name: Some(name.to_owned()),
            stream: Some(stream.to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        index.add_module_stream(ModuleStream::V1(s)).unwrap();
        index
    }

    #[test]
    fn higher_priority_source_wins_on_a_shared_nsvca() {
        let low = index_with_stream("foo", "latest");
        let high = index_with_stream("foo", "latest");
        let mut merger = IndexMerger::new();
        merger.add_index(low, 0).unwrap();
        merger.add_index(high, 10).unwrap();
        let merged = merger.resolve().unwrap();
        assert_eq!(merged.get_module("foo").unwrap().streams().count(), 1);
    }

    #[test]
    fn a_resolved_merger_cannot_be_reused() {
        let mut merger = IndexMerger::new();
        merger.add_index(ModuleIndex::new(), 0).unwrap();
        merger.resolve().unwrap();
        assert!(merger.add_index(ModuleIndex::new(), 0).is_err());
    }

    #[test]
    fn plain_resolve_poisons_rather_than_errors_on_a_default_stream_conflict() {
        use crate::entities::DefaultsV1;

        let mut a = index_with_stream("foo", "latest");
        let mut defaults_a = DefaultsV1::new("foo");
        defaults_a.modified = 100;
        defaults_a.set_default_stream("latest");
        a.add_defaults(defaults_a).unwrap();

        let mut b = index_with_stream("foo", "latest");
        let mut defaults_b = DefaultsV1::new("foo");
        defaults_b.modified = 100;
        defaults_b.set_default_stream("earliest");
        b.add_defaults(defaults_b).unwrap();

        let mut merger = IndexMerger::new();
        merger.add_index(a, 0).unwrap();
        merger.add_index(b, 0).unwrap();
        let merged = merger.resolve().unwrap();

        let defaults = merged.get_module("foo").unwrap().defaults().unwrap();
        assert_eq!(defaults.default_stream(), None);
        assert!(defaults.is_poisoned());
    }
}
