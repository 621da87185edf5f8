//! The upgrade ladder (spec §4.4, component C4): total functions `V1→V2`,
//! `V2→V3`, `PackagerV3→{V2,V3}`. Every upgrade produces a *new* document;
//! the original is left untouched.

use crate::entities::Dependencies;
use crate::error::Result;

use super::common::StreamCommon;
use super::packager_v3::PackagerV3;
use super::v1::StreamV1;
use super::v2::StreamV2;
use super::v3::StreamV3;

/// Collapses the flat `requires`/`buildrequires` tables into a single
/// [`Dependencies`] block with singleton stream sets; all other fields
/// carry over verbatim (spec §4.4).
pub fn v1_to_v2(v1: &StreamV1) -> StreamV2 {
    let mut deps = Dependencies::new();
    for (module, stream) in &v1.requires {
        deps.add_runtime_stream(module.clone(), stream.clone());
    }
    for (module, stream) in &v1.buildrequires {
        deps.add_buildtime_stream(module.clone(), stream.clone());
    }

    StreamV2 {
        common: v1.common.clone(),
        dependencies: if deps.buildtime.is_empty() && deps.runtime.is_empty() {
            Vec::new()
        } else {
            vec![deps]
        },
        default_profiles: Default::default(),
    }
}

/// Legal only when the v2 stream has exactly one [`Dependencies`] block
/// whose buildtime set names exactly one `platform` stream, and every
/// other dependency names exactly one stream (spec §4.4). `context` is
/// preserved verbatim.
pub fn v2_to_v3(v2: &StreamV2) -> Result<StreamV3> {
    let deps = v2.can_upgrade_to_v3()?;

    let platform = deps
        .buildtime
        .get("platform")
        .and_then(|set| set.iter().next())
        .cloned();

    let mut dependencies = deps.clone();
    dependencies.buildtime.remove("platform");

    Ok(StreamV3 {
        common: StreamCommon {
            identity: v2.common.identity.clone(),
            summary: v2.common.summary.clone(),
            description: v2.common.description.clone(),
            module_licenses: v2.common.module_licenses.clone(),
            content_licenses: v2.common.content_licenses.clone(),
            rpm_components: v2.common.rpm_components.clone(),
            module_components: v2.common.module_components.clone(),
            profiles: v2.common.profiles.clone(),
            servicelevels: v2.common.servicelevels.clone(),
            rpm_artifacts: v2.common.rpm_artifacts.clone(),
            rpm_filter: v2.common.rpm_filter.clone(),
            xmd: v2.common.xmd.clone(),
        },
        platform,
        dependencies,
        static_context: false,
    })
}

fn packager_common(pkg: &PackagerV3) -> StreamCommon {
    StreamCommon {
        identity: crate::identity::StreamIdentity {
            name: Some(pkg.name.clone()),
            stream: Some(pkg.stream.clone()),
            version: 0,
            context: None,
            arch: None,
        },
        summary: pkg.summary.clone(),
        description: pkg.description.clone(),
        module_licenses: pkg.module_licenses.clone(),
        content_licenses: pkg.content_licenses.clone(),
        rpm_components: pkg.rpm_components.clone(),
        module_components: pkg.module_components.clone(),
        profiles: pkg.profiles.clone(),
        servicelevels: pkg.servicelevels.clone(),
        rpm_artifacts: Default::default(),
        rpm_filter: pkg.rpm_filter.clone(),
        xmd: pkg.xmd.clone(),
    }
}

/// For each [`super::BuildConfig`] in the packager, produces one
/// [`StreamV2`] copy with that config's context, platform and assembled
/// dependencies block (spec §4.4).
pub fn packager_v3_to_v2(pkg: &PackagerV3) -> Vec<StreamV2> {
    pkg.build_configs
        .iter()
        .map(|bc| {
            let mut common = packager_common(pkg);
            common.identity.context = Some(bc.context.clone());

            let mut deps = bc.dependencies.clone();
            deps.add_buildtime_stream("platform", bc.platform.clone());

            StreamV2 {
                common,
                dependencies: vec![deps],
                default_profiles: Default::default(),
            }
        })
        .collect()
}

/// Same fan-out as [`packager_v3_to_v2`], one [`StreamV3`] per
/// [`super::BuildConfig`] (spec §4.4).
pub fn packager_v3_to_v3(pkg: &PackagerV3) -> Vec<StreamV3> {
    pkg.build_configs
        .iter()
        .map(|bc| {
            let mut common = packager_common(pkg);
            common.identity.context = Some(bc.context.clone());

            StreamV3 {
                common,
                platform: Some(bc.platform.clone()),
                dependencies: bc.dependencies.clone(),
                static_context: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s3_v1_to_v2_collapses_flat_maps_into_one_dependencies_block() {
        let mut v1 = StreamV1::new();
        v1.requires.insert("platform".to_owned(), "f29".to_owned());
        v1.buildrequires
            .insert("buildtools".to_owned(), "v1".to_owned());

        let v2 = v1_to_v2(&v1);
        assert_eq!(v2.dependencies.len(), 1);
        let deps = &v2.dependencies[0];
        assert_eq!(
            deps.runtime.get("platform").unwrap().iter().next().unwrap(),
            "f29"
        );
        assert_eq!(
            deps.buildtime
                .get("buildtools")
                .unwrap()
                .iter()
                .next()
                .unwrap(),
            "v1"
        );
    }

    #[test]
    fn v2_to_v3_fails_without_exactly_one_dependencies_block() {
        let v2 = StreamV2::new();
        assert!(v2_to_v3(&v2).is_err());
    }

    #[test]
    fn v2_to_v3_promotes_platform_and_preserves_context() {
        let mut v2 = StreamV2::new();
        v2.common.identity.context = Some("c0ffee".to_owned());
        let mut deps = Dependencies::new();
        deps.add_buildtime_stream("platform", "f35");
        deps.add_runtime_stream("platform", "f35");
        v2.dependencies.push(deps);

        let v3 = v2_to_v3(&v2).unwrap();
        assert_eq!(v3.platform.as_deref(), Some("f35"));
        assert_eq!(v3.common.identity.context.as_deref(), Some("c0ffee"));
        assert!(!v3.dependencies.buildtime.contains_key("platform"));
    }

    #[test]
    fn packager_fan_out_produces_one_stream_per_build_config() {
        let mut pkg = PackagerV3::new("foo", "latest");
        pkg.build_configs.push(super::super::BuildConfig {
            context: "aaaaaaaaaa".to_owned(),
            platform: "f35".to_owned(),
            dependencies: Dependencies::new(),
            buildopts: None,
        });
        pkg.build_configs.push(super::super::BuildConfig {
            context: "bbbbbbbbbb".to_owned(),
            platform: "f36".to_owned(),
            dependencies: Dependencies::new(),
            buildopts: None,
        });

        let v2s = packager_v3_to_v2(&pkg);
        assert_eq!(v2s.len(), 2);
        assert_eq!(v2s[0].common.identity.context.as_deref(), Some("aaaaaaaaaa"));

        let v3s = packager_v3_to_v3(&pkg);
        assert_eq!(v3s.len(), 2);
        assert_eq!(v3s[1].platform.as_deref(), Some("f36"));
    }
}
