//! The universal invariants from spec §8, exercised end to end through
//! the public `modulemd` crate surface.

use modulemd::entities::DefaultsV1;
use modulemd::identity::StreamIdentity;
use modulemd::stream::StreamV1;
use modulemd::{IndexMerger, ModuleIndex, ModuleStream};

fn v1_stream(name: &str, stream: &str) -> ModuleStream {
    let mut s = StreamV1::new();
    s.common.identity = StreamIdentity {
        name: Some(name.to_owned()),
        stream: Some(stream.to_owned()),
        version: 1,
        context: Some("c0ffee".to_owned()),
        arch: Some("x86_64".to_owned()),
    };
    s.common.summary = Some("a module".to_owned());
    s.common.description = Some("a module for testing".to_owned());
    s.requires.insert("platform".to_owned(), "f29".to_owned());
    s.buildrequires.insert("buildtools".to_owned(), "v1".to_owned());
    ModuleStream::V1(s)
}

/// 1. `parse(emit(D)) ≡ D` for valid `D`.
#[test]
fn round_trip_through_yaml_preserves_the_document() {
    use modulemd::yaml::codec::stream;
    use modulemd::yaml::parse::as_mapping;
    use modulemd::yaml::ParseOptions;

    let original = v1_stream("foo", "latest");
    let emitted = stream::emit_stream(&original).unwrap();
    let value: serde_yaml::Value = serde_yaml::from_str(&emitted).unwrap();
    let top = as_mapping(&value).unwrap();
    let reparsed = stream::parse_stream(top, 1, &ParseOptions::default()).unwrap();
    assert_eq!(reparsed, original);
}

/// 2. `copy(D) ≡ D`, and mutating the copy does not affect `D`.
#[test]
fn copying_a_stream_is_independent_of_the_original() {
    let original = v1_stream("foo", "latest");
    let mut copy = original.copy();
    assert_eq!(copy, original);

    copy.identity_mut().stream = Some("other".to_owned());
    assert_ne!(copy, original);
    assert_eq!(original.identity().stream.as_deref(), Some("latest"));
}

/// 3. `validate(D)` does not mutate `D` and is idempotent.
#[test]
fn validation_is_pure_and_idempotent() {
    let stream = v1_stream("foo", "latest");
    let before = stream.clone();
    stream.validate().unwrap();
    assert_eq!(stream, before);
    stream.validate().unwrap();
    assert_eq!(stream, before);
}

/// 4. Upgrading a v1 stream and emitting it equals emitting a hand-built
/// v2 stream with the same logical dependency content.
#[test]
fn upgrading_then_emitting_matches_a_hand_built_target_version() {
    use modulemd::stream::StreamV2;
    use modulemd::yaml::codec::stream;

    let v1 = v1_stream("foo", "latest");
    let upgraded = v1.upgrade_to(2).unwrap();

    let mut hand_built = StreamV2::new();
    hand_built.common.identity = StreamIdentity {
        name: Some("foo".to_owned()),
        stream: Some("latest".to_owned()),
        version: 1,
        context: Some("c0ffee".to_owned()),
        arch: Some("x86_64".to_owned()),
    };
    hand_built.common.summary = Some("a module".to_owned());
    hand_built.common.description = Some("a module for testing".to_owned());
    let mut block = modulemd::entities::Dependencies::default();
    block
        .runtime
        .insert("platform".to_owned(), std::collections::BTreeSet::from(["f29".to_owned()]));
    block
        .buildtime
        .insert("buildtools".to_owned(), std::collections::BTreeSet::from(["v1".to_owned()]));
    hand_built.dependencies.push(block);

    assert_eq!(stream::emit_stream(&upgraded).unwrap(), stream::emit_stream(&ModuleStream::V2(hand_built)).unwrap());
}

/// 5. For every `RpmMapEntry`, `nevra == "{name}-{epoch}:{version}-{release}.{arch}"`.
#[test]
fn rpm_map_entry_nevra_is_always_the_assembled_form() {
    use modulemd::entities::RpmMapEntry;

    let entry = RpmMapEntry::new("bar", 7, "1.0", "2.el9", "aarch64");
    assert_eq!(entry.nevra(), "bar-7:1.0-2.el9.aarch64");
}

/// 6. Every module and NSVCA appearing in any merger input appears in the
/// merge result.
#[test]
fn merge_result_contains_every_module_and_nsvca_from_every_input() {
    let mut a = ModuleIndex::new();
    a.add_module_stream(v1_stream("foo", "latest")).unwrap();
    let mut b = ModuleIndex::new();
    b.add_module_stream(v1_stream("bar", "latest")).unwrap();

    let mut merger = IndexMerger::new();
    merger.add_index(a, 0).unwrap();
    merger.add_index(b, 0).unwrap();
    let merged = merger.resolve().unwrap();

    assert!(merged.get_module("foo").unwrap().get_stream_by_nsvca("foo:latest:1:c0ffee:x86_64").is_some());
    assert!(merged.get_module("bar").unwrap().get_stream_by_nsvca("bar:latest:1:c0ffee:x86_64").is_some());
}

/// 7. With equal priority, identical defaults, and no conflicting
/// `modified`, `merge(A, B) ≡ merge(B, A)` up to set-equality of
/// non-conflicting streams.
#[test]
fn merge_is_commutative_for_non_conflicting_same_priority_sources() {
    let mut a = ModuleIndex::new();
    a.add_module_stream(v1_stream("foo", "latest")).unwrap();
    let mut defaults_a = DefaultsV1::new("foo");
    defaults_a.modified = 5;
    defaults_a.set_default_stream("latest");
    a.add_defaults(defaults_a).unwrap();

    let mut b = ModuleIndex::new();
    b.add_module_stream(v1_stream("bar", "stable")).unwrap();

    let mut merger_ab = IndexMerger::new();
    merger_ab.add_index(a.clone(), 0).unwrap();
    merger_ab.add_index(b.clone(), 0).unwrap();
    let merged_ab = merger_ab.resolve().unwrap();

    let mut merger_ba = IndexMerger::new();
    merger_ba.add_index(b, 0).unwrap();
    merger_ba.add_index(a, 0).unwrap();
    let merged_ba = merger_ba.resolve().unwrap();

    let names_ab: Vec<&str> = merged_ab.get_module_names().collect();
    let names_ba: Vec<&str> = merged_ba.get_module_names().collect();
    assert_eq!(names_ab, names_ba);

    assert_eq!(
        merged_ab.get_default_streams_by_module(None),
        merged_ba.get_default_streams_by_module(None)
    );
}
