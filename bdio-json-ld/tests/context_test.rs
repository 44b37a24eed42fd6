//! Context resolution through the public API

use bdio_json_ld::vocabulary::TermKind;
use bdio_json_ld::{
    spec_for_version, BdioOptions, Container, Context, DatatypeTag, Node, Registry,
    Specification, TermDefinition, Value,
};
use bdio_vocab::{class, data_property as dp, ns};
use pretty_assertions::assert_eq;
use serde_json::json;

// ============================================================================
// IRI expansion and compaction
// ============================================================================

#[test]
fn test_longest_prefix_wins() {
    for (first, second) in [
        (("a", "http://x.com/a"), ("ab", "http://x.com/ab")),
        (("ab", "http://x.com/ab"), ("a", "http://x.com/a")),
    ] {
        let context = Context::builder()
            .prefix(first.0, first.1)
            .prefix(second.0, second.1)
            .build()
            .unwrap();
        assert_eq!(context.compact_iri("http://x.com/ab/c"), "ab:/c");
        assert_eq!(context.expand_iri("ab:/c", false), "http://x.com/ab/c");
        assert_eq!(context.compact_iri("http://x.com/a/c"), "a:/c");
    }
}

#[test]
fn test_resolution_order() {
    let context = Context::builder()
        .base("http://example.com/base/")
        .prefix("ex", "http://example.com/ns#")
        .build()
        .unwrap();

    // keywords
    assert_eq!(context.expand_iri("@type", false), "@type");
    // short names
    assert_eq!(context.expand_iri("File", false), class::FILE);
    // prefixes
    assert_eq!(context.expand_iri("ex:thing", false), "http://example.com/ns#thing");
    assert_eq!(context.expand_iri("xsd:long", false), format!("{}long", ns::XSD));
    // relative references use the base only
    assert_eq!(context.expand_iri("foo", true), "http://example.com/base/foo");
    // vocabulary-relative references use the vocab only
    assert_eq!(context.expand_iri("foo", false), format!("{}foo", ns::BDIO));
    // absolute IRIs are untouched
    assert_eq!(context.expand_iri("urn:x:y", false), "urn:x:y");
}

#[test]
fn test_compaction_fallbacks() {
    let context = Context::builder().build().unwrap();
    assert_eq!(context.compact_iri(dp::PATH), "path");
    assert_eq!(context.compact_iri(&format!("{}unknownTerm", ns::BDIO)), "unknownTerm");
    assert_eq!(context.compact_iri("http://elsewhere.com/x"), "http://elsewhere.com/x");
}

#[test]
fn test_vocab_override() {
    let context = Context::builder()
        .vocab(Some("http://example.com/v#".to_string()))
        .build()
        .unwrap();
    assert_eq!(context.expand_iri("thing", false), "http://example.com/v#thing");

    let context = Context::builder().vocab(None).build().unwrap();
    assert_eq!(context.expand_iri("thing", false), "thing");
}

// ============================================================================
// Custom prefixes and definitions
// ============================================================================

#[test]
fn test_custom_prefix_round_trip() {
    let context = Context::builder()
        .prefix("ex", "http://example.com/ns/")
        .build()
        .unwrap();
    let node = Node::builder()
        .id("http://example.com/f")
        .type_(class::FILE)
        .put("http://example.com/ns/custom", "value")
        .build()
        .unwrap();

    let wire = context.compact(&context.expand(&node).unwrap()).unwrap();
    assert_eq!(
        wire,
        json!({"@id": "http://example.com/f", "@type": "File", "ex:custom": "value"})
    );
    assert_eq!(context.expand_to_node(&wire).unwrap(), node);
}

#[test]
fn test_custom_definition() {
    let mut count = TermDefinition::default_for(
        Registry::global()
            .intern("http://example.com/ns/count")
            .unwrap(),
    );
    count.kind = TermKind::Data(DatatypeTag::Long);
    count.datatype = DatatypeTag::Long;
    count.container = Container::Single;

    let context = Context::builder().define("count", count).build().unwrap();
    let node = Node::builder()
        .id("http://example.com/n")
        .put("http://example.com/ns/count", 5i64)
        .build()
        .unwrap();

    let wire = context.compact(&context.expand(&node).unwrap()).unwrap();
    assert_eq!(wire, json!({"@id": "http://example.com/n", "count": 5}));

    let decoded = context.expand_to_node(&json!({"count": "7"})).unwrap();
    assert_eq!(decoded.get("http://example.com/ns/count"), Some(&Value::Long(7)));
}

// ============================================================================
// Specification registry
// ============================================================================

#[test]
fn test_versions_in_order() {
    let versions: Vec<&str> = Specification::all().iter().map(|s| s.version()).collect();
    assert_eq!(versions, vec!["1.0.0", "1.1.0", "1.1.1", "2.0.0"]);
    assert!(Specification::baseline() < Specification::latest());
    assert_eq!(spec_for_version(None).unwrap().version(), "1.0.0");
    assert_eq!(spec_for_version(Some("")).unwrap().version(), "1.0.0");
}

#[test]
fn test_context_json_for_legacy_version() {
    let context = Context::for_reading(&BdioOptions::default()).unwrap();
    let json = context.to_json();
    assert_eq!(json["@vocab"], json!(ns::LEGACY));
    assert_eq!(json["checksum"]["@id"], json!(dp::FINGERPRINT));
    assert_eq!(json["checksum"]["@container"], json!("@set"));
    assert_eq!(json["spdx"], json!(ns::SPDX));
    assert!(json.get("fingerprint").is_none());
}
