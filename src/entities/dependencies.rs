//! `Dependencies` — build-time and run-time module dependency sets
//! (spec §3.2, §4.3). Grounded on the `requires`/`buildrequires` handling in
//! `original_source/modulemd/v1/modulemd-module.c` and the v2/v3 schema
//! described in `modulemd-module-stream-v2.h` / `-v3.h`.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::{Error, ErrorKind, Result};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dependencies {
    pub buildtime: BTreeMap<String, BTreeSet<String>>,
    pub runtime: BTreeMap<String, BTreeSet<String>>,
}

impl Dependencies {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn add_buildtime_stream(&mut self, module: impl Into<String>, stream: impl Into<String>) {
        self.buildtime
            .entry(module.into())
            .or_default()
            .insert(stream.into());
    }

    pub fn add_runtime_stream(&mut self, module: impl Into<String>, stream: impl Into<String>) {
        self.runtime
            .entry(module.into())
            .or_default()
            .insert(stream.into());
    }

    /// v3 requires every dependency (buildtime and runtime) to name exactly
    /// one stream per module.
    pub fn validate_single_stream_per_module(&self) -> Result<()> {
        for (which, map) in [("buildtime", &self.buildtime), ("runtime", &self.runtime)] {
            for (module, streams) in map {
                if streams.len() != 1 {
                    return Err(Error::general(
                        ErrorKind::Validate,
                        format!(
                            "{} dependency on {:?} must name exactly one stream in v3, got {}",
                            which,
                            module,
                            streams.len()
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_stream_validation_catches_multi_stream() {
        let mut deps = Dependencies::new();
        deps.add_buildtime_stream("platform", "f29");
        deps.add_buildtime_stream("platform", "f30");
        assert!(deps.validate_single_stream_per_module().is_err());
    }
}
