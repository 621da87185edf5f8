//! The concrete scenarios from spec §8 (S1-S6), exercised end to end
//! through the public `modulemd` crate surface rather than through any
//! one module's internals.

use modulemd::yaml::codec::{defaults, obsoletes, stream};
use modulemd::yaml::parse::as_mapping;
use modulemd::yaml::ParseOptions;
use modulemd::{Error, ErrorKind, YamlErrorKind};

fn parse_value(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).unwrap()
}

#[test]
fn s1_defaults_round_trip_byte_for_byte_on_reemit() {
    let value = parse_value(
        r#"
module: foo
modified: 0
data:
  stream: latest
  profiles:
    latest: [bar, baz]
    libonly: []
"#,
    );
    let top = as_mapping(&value).unwrap();
    let parsed = defaults::parse_defaults(top, 1, &ParseOptions::default()).unwrap();

    assert_eq!(parsed.module_name, "foo");
    assert_eq!(parsed.default_stream(), Some("latest"));
    assert_eq!(
        parsed.profile_defaults.get("latest").unwrap().len(),
        2
    );
    assert_eq!(parsed.profile_defaults.get("libonly").unwrap().len(), 0);

    let emitted_once = defaults::emit_defaults(&parsed).unwrap();
    let value2 = parse_value(&emitted_once);
    let top2 = as_mapping(&value2).unwrap();
    let reparsed = defaults::parse_defaults(top2, 1, &ParseOptions::default()).unwrap();
    let emitted_twice = defaults::emit_defaults(&reparsed).unwrap();
    assert_eq!(emitted_once, emitted_twice);
}

#[test]
fn s2_rpm_map_nevra_consistency() {
    use modulemd::entities::RpmMapEntry;

    let entry = RpmMapEntry::parse_with_nevra(
        "bar".to_owned(),
        0,
        "1.23".to_owned(),
        "1.module_el8+1+abc".to_owned(),
        "x86_64".to_owned(),
        "bar-0:1.23-1.module_el8+1+abc.x86_64",
    )
    .unwrap();
    assert_eq!(entry.name, "bar");

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
fn s3_v1_stream_upgraded_to_v2_collapses_into_one_dependencies_block() {
    let yaml = r#"
document: modulemd
version: 1
data:
  name: foo
  stream: latest
  version: 1
  summary: a module
  description: a module for testing
  license:
    module: [MIT]
  requires:
    platform: f29
  buildrequires:
    buildtools: v1
"#;
    let value = parse_value(yaml);
    let top = as_mapping(&value).unwrap();
    let v1 = stream::parse_stream(top, 1, &ParseOptions::default()).unwrap();

    let v2 = v1.upgrade_to(2).unwrap();
    let runtime = v2.runtime_dependencies();
    let buildtime = v2.buildtime_dependencies();
    assert_eq!(runtime.get("platform").unwrap().iter().next().unwrap(), "f29");
    assert_eq!(buildtime.get("buildtools").unwrap().iter().next().unwrap(), "v1");
}

#[test]
fn s4_merge_with_different_modified_takes_the_later_one() {
    use modulemd::entities::DefaultsV1;

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
fn s5_equal_modified_conflict_poisons_in_non_strict_mode_and_errors_in_strict_mode() {
    use modulemd::entities::DefaultsV1;

    let mut a = DefaultsV1::new("foo");
    a.modified = 100;
    a.set_default_stream("latest");

    let mut b = DefaultsV1::new("foo");
    b.modified = 100;
    b.set_default_stream("earliest");

    let merged = a.merge_same_priority(&b, false).unwrap();
    assert_eq!(merged.default_stream(), None);
    assert!(merged.is_poisoned());

    let err = a.merge_same_priority(&b, true).unwrap_err();
    assert_eq!(err.kind(), Some(ErrorKind::Validate));
}

#[test]
fn s6_a_numeric_looking_stream_name_is_double_quoted_on_emit() {
    let yaml = r#"
modified: 1
module: foo
stream: "1"
data: {}
"#;
    let value = parse_value(yaml);
    let top = as_mapping(&value).unwrap();
    let record = obsoletes::parse_obsoletes(top, 1, &ParseOptions::default()).unwrap();
    let emitted = obsoletes::emit_obsoletes(&record).unwrap();
    assert!(emitted.contains("stream: \"1\""));
}

#[test]
fn parse_error_carries_a_distinguishable_kind() {
    let err = Error::yaml(YamlErrorKind::Parse, "test");
    assert_eq!(err.yaml_kind(), Some(YamlErrorKind::Parse));
}
