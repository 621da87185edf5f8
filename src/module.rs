//! `Module` - the streams, defaults, translations, and obsoletes records
//! belonging to one module name (spec §4.1, component C7). Grounded on
//! `modulemd-module.c` in `original_source/`, which plays the same
//! aggregating role inside a `ModuleIndex`.

use std::collections::BTreeMap;

use crate::entities::{DefaultsV1, Obsoletes, Translation};
use crate::error::{Error, ErrorKind, Result};
use crate::stream::ModuleStream;

#[derive(Debug, Clone, Default)]
pub struct Module {
    name: String,
    streams: BTreeMap<String, ModuleStream>,
    defaults: Option<DefaultsV1>,
    translations: BTreeMap<String, Translation>,
    obsoletes: Vec<Obsoletes>,
    effective_stream_version: Option<u8>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            streams: BTreeMap::new(),
            defaults: None,
            translations: BTreeMap::new(),
            obsoletes: Vec::new(),
            effective_stream_version: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Keyed by NSVCA; inserting an existing NSVCA replaces the prior
    /// entry (spec §4.1 invariant: "same NSVCA replaces"). A stream whose
    /// mdversion is newer than every stream already held auto-upgrades the
    /// whole module to that mdversion first (spec §4.6); a stream older
    /// than that is itself upgraded up to match before insertion, rather
    /// than being rejected.
    pub fn add_stream(&mut self, mut stream: ModuleStream) -> Result<()> {
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
        let nsvca = stream.get_nsvca().ok_or_else(|| {
            Error::general(
                ErrorKind::Validate,
                "module stream must have a complete NSVCA before being added to an index",
            )
        })?;
        self.streams.insert(nsvca, stream);
        Ok(())
    }

    pub fn streams(&self) -> impl Iterator<Item = &ModuleStream> {
        self.streams.values()
    }

    pub fn get_stream_by_nsvca(&self, nsvca: &str) -> Option<&ModuleStream> {
        self.streams.get(nsvca)
    }

    pub fn stream_names(&self) -> std::collections::BTreeSet<String> {
        self.streams
            .values()
            .filter_map(|s| s.identity().stream.clone())
            .collect()
    }

    pub fn defaults(&self) -> Option<&DefaultsV1> {
        self.defaults.as_ref()
    }

    pub fn set_defaults(&mut self, defaults: DefaultsV1) -> Result<()> {
        if defaults.module_name != self.name {
            return Err(Error::general(
                ErrorKind::Validate,
                format!(
                    "defaults for module {:?} cannot be attached to module {:?}",
                    defaults.module_name, self.name
                ),
            ));
        }
        self.defaults = Some(defaults);
        Ok(())
    }

    pub fn translation(&self, stream: &str) -> Option<&Translation> {
        self.translations.get(stream)
    }

    pub fn set_translation(&mut self, translation: Translation) -> Result<()> {
        if translation.module_name != self.name {
            return Err(Error::general(
                ErrorKind::Validate,
                format!(
                    "translation for module {:?} cannot be attached to module {:?}",
                    translation.module_name, self.name
                ),
            ));
        }
        match self.translations.get_mut(&translation.module_stream) {
            Some(existing) => existing.merge_from(&translation),
            None => {
                self.translations
                    .insert(translation.module_stream.clone(), translation);
            }
        }
        Ok(())
    }

    pub fn add_obsoletes(&mut self, obsoletes: Obsoletes) -> Result<()> {
        if obsoletes.module_name != self.name {
            return Err(Error::general(
                ErrorKind::Validate,
                format!(
                    "obsoletes for module {:?} cannot be attached to module {:?}",
                    obsoletes.module_name, self.name
                ),
            ));
        }
        self.obsoletes.push(obsoletes);
        Ok(())
    }

    /// Obsoletes records that apply to `stream` and are not marked `reset`
    /// (spec §3.2), most-recently-modified first.
    pub fn active_obsoletes(&self, stream: &str) -> Vec<&Obsoletes> {
        let mut matches: Vec<&Obsoletes> = self
            .obsoletes
            .iter()
            .filter(|o| o.module_stream == stream && !o.reset)
            .collect();
        matches.sort_by(|a, b| b.modified.cmp(&a.modified));
        matches
    }

    pub fn upgrade_streams(&mut self, target: u8) -> Result<()> {
        let mut upgraded = BTreeMap::new();
        for stream in self.streams.values() {
            let new_stream = stream.upgrade_to(target)?;
            let nsvca = new_stream.get_nsvca().ok_or_else(|| {
                Error::general(
                    ErrorKind::Validate,
                    "upgraded stream lost its NSVCA identity",
                )
            })?;
            upgraded.insert(nsvca, new_stream);
        }
        self.streams = upgraded;
        self.effective_stream_version = Some(target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::StreamIdentity;
    use crate::stream::StreamV1;

    fn v1_stream(name: &str, stream: &str) -> ModuleStream {
        let mut s = StreamV1::new();
        s.common.identity = StreamIdentity {
            name: Some(name.to_owned()),
            stream: Some(stream.to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        ModuleStream::V1(s)
    }

    #[test]
    fn inserting_the_same_nsvca_twice_replaces() {
        let mut module = Module::new("foo");
        module.add_stream(v1_stream("foo", "latest")).unwrap();
        assert_eq!(module.streams().count(), 1);
        module.add_stream(v1_stream("foo", "latest")).unwrap();
        assert_eq!(module.streams().count(), 1);
    }

    #[test]
    fn defaults_for_a_different_module_are_rejected() {
        let mut module = Module::new("foo");
        let other = DefaultsV1::new("bar");
        assert!(module.set_defaults(other).is_err());
    }

    #[test]
    fn inserting_a_newer_mdversion_stream_auto_upgrades_existing_streams() {
        let mut module = Module::new("foo");
        module.add_stream(v1_stream("foo", "latest")).unwrap();

        let mut v2 = crate::stream::StreamV2::new();
        v2.common.identity = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("stable".to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        module.add_stream(ModuleStream::V2(v2)).unwrap();

        assert!(module.streams().all(|s| s.mdversion() == 2));
    }

    #[test]
    fn inserting_an_older_mdversion_stream_upgrades_it_to_match() {
        let mut module = Module::new("foo");
        let mut v2 = crate::stream::StreamV2::new();
        v2.common.identity = StreamIdentity {
            name: Some("foo".to_owned()),
            stream: Some("stable".to_owned()),
            version: 1,
            context: Some("c0ffee".to_owned()),
            arch: Some("x86_64".to_owned()),
        };
        module.add_stream(ModuleStream::V2(v2)).unwrap();

        module.add_stream(v1_stream("foo", "latest")).unwrap();

        assert!(module.streams().all(|s| s.mdversion() == 2));
    }
}
