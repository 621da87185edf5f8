//! `ModuleIndex` - a collection of [`Module`]s assembled from one or more
//! YAML sources (spec §4.1, component C8). Grounded on
//! `modulemd-module-index.c` in `original_source/`.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use regex::Regex;

use crate::entities::{DefaultsV1, Obsoletes, Translation};
use crate::error::{Error, ErrorKind, Result};
use crate::module::Module;
use crate::stream::ModuleStream;
use crate::yaml::{self, Document, ParseOptions};

#[derive(Debug, Clone, Default)]
pub struct ModuleIndex {
    modules: BTreeMap<String, Module>,
    effective_stream_version: Option<u8>,
}

/// Module name, then stream name, then descending version, then context,
/// then architecture (spec §4.6).
fn nsvca_sort_key(s: &ModuleStream) -> (String, String, Reverse<u64>, String, String) {
    let id = s.identity();
    (
        id.name.clone().unwrap_or_default(),
        id.stream.clone().unwrap_or_default(),
        Reverse(id.version),
        id.context.clone().unwrap_or_default(),
        id.arch.clone().unwrap_or_default(),
    )
}

fn glob_to_regex(pattern: &str) -> Result<Regex> {
    let mut re = String::from("^");
    for c in pattern.chars() {
        match c {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            c if "\\.+()|[]{}^$".contains(c) => {
                re.push('\\');
                re.push(c);
            }
            c => re.push(c),
        }
    }
    re.push('$');
    Regex::new(&re).map_err(|err| {
        Error::general(ErrorKind::Validate, format!("invalid search pattern {:?}: {}", pattern, err))
    })
}

impl ModuleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    fn module_mut(&mut self, name: &str) -> &mut Module {
        self.modules
            .entry(name.to_owned())
            .or_insert_with(|| Module::new(name))
    }

    /// Adds `stream` to the index. The module name and stream name must
    /// both be non-empty (spec §4.1 invariant), and a stream with the same
    /// NSVCA already present is replaced, not merged. A stream whose
    /// mdversion is newer than the index's current effective stream
    /// version auto-upgrades the whole index to that mdversion first (spec
    /// §4.6); an older one is itself upgraded up to match before insertion.
    pub fn add_module_stream(&mut self, mut stream: ModuleStream) -> Result<()> {
        let identity = stream.identity().clone();
        let name = identity.name.clone().ok_or_else(|| {
            Error::general(ErrorKind::Validate, "module stream must have a non-empty name")
        })?;
        if name.is_empty() {
            return Err(Error::general(ErrorKind::Validate, "module stream must have a non-empty name"));
        }
        if identity.stream.as_deref().unwrap_or("").is_empty() {
            return Err(Error::general(ErrorKind::Validate, "module stream must have a non-empty stream"));
        }

        let incoming = stream.mdversion();
        match self.effective_stream_version {
            None => self.effective_stream_version = Some(incoming),
            Some(current) if incoming > current => {
                self.upgrade_streams(incoming)?;
            }
            Some(current) if incoming < current => {
                stream = stream.upgrade_to(current)?;
            }
            Some(_) => {}
        }

        self.module_mut(&name).add_stream(stream)
    }

    pub fn add_defaults(&mut self, defaults: DefaultsV1) -> Result<()> {
        let name = defaults.module_name.clone();
        self.module_mut(&name).set_defaults(defaults)
    }

    pub fn add_translation(&mut self, translation: Translation) -> Result<()> {
        let name = translation.module_name.clone();
        self.module_mut(&name).set_translation(translation)
    }

    pub fn add_obsoletes(&mut self, obsoletes: Obsoletes) -> Result<()> {
        let name = obsoletes.module_name.clone();
        self.module_mut(&name).add_obsoletes(obsoletes)
    }

    pub fn remove_module(&mut self, name: &str) -> Option<Module> {
        self.modules.remove(name)
    }

    pub fn get_module(&self, name: &str) -> Option<&Module> {
        self.modules.get(name)
    }

    pub fn get_module_names(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(|s| s.as_str())
    }

    /// The default stream for each module, optionally overridden by
    /// `intent` (spec §4.1).
    pub fn get_default_streams_by_module(&self, intent: Option<&str>) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        for (name, module) in &self.modules {
            let Some(defaults) = module.defaults() else { continue };
            let stream = intent
                .and_then(|i| defaults.intents.get(i))
                .and_then(|overlay| overlay.default_stream())
                .or_else(|| defaults.default_stream());
            if let Some(stream) = stream {
                out.insert(name.clone(), stream.to_owned());
            }
        }
        out
    }

    pub fn upgrade_streams(&mut self, target: u8) -> Result<()> {
        for module in self.modules.values_mut() {
            module.upgrade_streams(target)?;
        }
        self.effective_stream_version = Some(target);
        Ok(())
    }

    /// Defaults have no version ladder of their own (only one schema,
    /// `DefaultsV1`, exists); this is a no-op kept for API symmetry with
    /// `upgrade_streams` (spec §4.6).
    pub fn upgrade_defaults(&mut self, _target: u8) -> Result<()> {
        Ok(())
    }

    /// Every stream across every module matching a glob over its NSVCA,
    /// returned in deterministic NSVCA order (spec §4.1).
    pub fn search_streams_by_nsvca_glob(&self, pattern: &str) -> Result<Vec<&ModuleStream>> {
        let re = glob_to_regex(pattern)?;
        let mut matches: Vec<&ModuleStream> = self
            .modules
            .values()
            .flat_map(|m| m.streams())
            .filter(|s| s.get_nsvca().is_some_and(|n| re.is_match(&n)))
            .collect();
        matches.sort_by_key(|s| nsvca_sort_key(s));
        Ok(matches)
    }

    /// Streams matching the given optional filters, all of which must
    /// agree when present (spec §4.1).
    pub fn search_streams(
        &self,
        name: Option<&str>,
        stream: Option<&str>,
        version: Option<u64>,
        context: Option<&str>,
        arch: Option<&str>,
    ) -> Vec<&ModuleStream> {
        let mut matches: Vec<&ModuleStream> = self
            .modules
            .values()
            .flat_map(|m| m.streams())
            .filter(|s| {
                let id = s.identity();
                name.map_or(true, |n| id.name.as_deref() == Some(n))
                    && stream.map_or(true, |st| id.stream.as_deref() == Some(st))
                    && version.map_or(true, |v| id.version == v)
                    && context.map_or(true, |c| id.context.as_deref() == Some(c))
                    && arch.map_or(true, |a| id.arch.as_deref() == Some(a))
            })
            .collect();
        matches.sort_by_key(|s| nsvca_sort_key(s));
        matches
    }

    /// Every rpm-artifact NEVRA across every stream matching a glob (spec
    /// §3.2, §8 S2).
    pub fn search_rpms(&self, nevra_glob: &str) -> Result<BTreeSet<String>> {
        let re = glob_to_regex(nevra_glob)?;
        Ok(self
            .modules
            .values()
            .flat_map(|m| m.streams())
            .flat_map(|s| s.rpm_artifacts().iter())
            .filter(|nevra| re.is_match(nevra))
            .cloned()
            .collect())
    }

    fn ingest(&mut self, doc: Document) -> Result<()> {
        match doc {
            Document::Stream(s) => self.add_module_stream(s),
            Document::Defaults(d) => self.add_defaults(d),
            Document::Translation(t) => self.add_translation(t),
            Document::Obsoletes(o) => self.add_obsoletes(o),
            Document::Packager(_) => Err(Error::general(
                ErrorKind::NotImplemented,
                "packager documents must be upgraded to a concrete stream before being indexed",
            )),
        }
    }

    /// Reads every subdocument from `bytes` and merges the ones that parse
    /// successfully into this index; returns the diagnostics for all of
    /// them, including any that failed (spec §4.5, §7).
    pub fn update_from_yaml(&mut self, bytes: &[u8], options: &ParseOptions) -> Result<Vec<yaml::SubdocumentInfo>> {
        yaml::reject_if_compressed(bytes)?;
        let infos = yaml::read_documents(bytes, options)?;
        for info in &infos {
            if let Ok(doc) = &info.result {
                self.ingest(doc.clone())?;
            }
        }
        Ok(infos)
    }

    pub fn update_from_file(&mut self, path: &Path, options: &ParseOptions) -> Result<Vec<yaml::SubdocumentInfo>> {
        let bytes = fs::read(path)?;
        self.update_from_yaml(&bytes, options)
    }

    /// Emits every stream, defaults record, translation, and obsoletes
    /// record in this index as one multi-document YAML stream, modules in
    /// name order (spec §4.5).
    pub fn dump_to_yaml(&self) -> Result<String> {
        let mut out = String::new();
        for module in self.modules.values() {
            for stream in module.streams() {
                out.push_str(&yaml::emit_document(&Document::Stream(stream.clone()))?);
            }
            if let Some(defaults) = module.defaults() {
                out.push_str(&yaml::emit_document(&Document::Defaults(defaults.clone()))?);
            }
        }
        Ok(out)
    }

    pub fn dump_to_file(&self, path: &Path) -> Result<()> {
        let yaml = self.dump_to_yaml()?;
        fs::write(path, yaml)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StreamIdentity;
    use crate::stream::StreamV1;

    fn v1_stream(name: &str, stream: &str, arch: &str) -> ModuleStream {
        let mut s = StreamV1::new();
        s.common.identity = StreamIdentity {
            name: Some(name.to_owned()),
            stream: Some(stream.to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some(arch.to_owned()),
        };
        ModuleStream::V1(s)
    }

    #[test]
    fn search_by_nsvca_glob_matches_arch_wildcard() {
        let mut index = ModuleIndex::new();
        index.add_module_stream(v1_stream("foo", "latest", "x86_64")).unwrap();
        index.add_module_stream(v1_stream("foo", "latest", "aarch64")).unwrap();

        let matches = index.search_streams_by_nsvca_glob("foo:latest:1:c0ffee:*").unwrap();
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn search_streams_filters_on_every_present_field() {
        let mut index = ModuleIndex::new();
        index.add_module_stream(v1_stream("foo", "latest", "x86_64")).unwrap();
        index.add_module_stream(v1_stream("foo", "stable", "x86_64")).unwrap();

        let matches = index.search_streams(Some("foo"), Some("stable"), None, None, None);
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn empty_module_name_is_rejected() {
        let mut index = ModuleIndex::new();
        let mut s = StreamV1::new();
        s.common.identity.stream = Some("latest".to_owned());
        let err = index.add_module_stream(ModuleStream::V1(s)).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::Validate));
    }

    #[test]
    fn search_results_sort_by_descending_version() {
        let mut index = ModuleIndex::new();
        let mut low = StreamV1::new();
        low.common.identity = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("latest".to_owned()),
            version: 9,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        let mut high = StreamV1::new();
        high.common.identity = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("latest".to_owned()),
            version: 10,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        index.add_module_stream(ModuleStream::V1(low)).unwrap();
        index.add_module_stream(ModuleStream::V1(high)).unwrap();

        let matches = index.search_streams(Some("foo"), None, None, None, None);
        assert_eq!(matches[0].identity().version, 10);
        assert_eq!(matches[1].identity().version, 9);
    }

    #[test]
    fn inserting_a_newer_mdversion_stream_auto_upgrades_the_whole_index() {
        let mut index = ModuleIndex::new();
        index.add_module_stream(v1_stream("foo", "latest", "x86_64")).unwrap();

        let mut v2 = crate::stream::StreamV2::new();
        v2.common.identity = StreamIdentity {
            name: Some("bar".to_owned()),
            stream: Some("latest".to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        index.add_module_stream(ModuleStream::V2(v2)).unwrap();

        let foo_stream = index.get_module("foo").unwrap().streams().next().unwrap();
        assert_eq!(foo_stream.mdversion(), 2);
    }
}
