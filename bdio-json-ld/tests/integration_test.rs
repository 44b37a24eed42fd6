//! End-to-end tests for encoding and decoding BDIO documents

mod support;

use bdio_json_ld::archive::Entry;
use bdio_json_ld::{
    decode, encode, estimate_weight, partition, BdioOptions, BdioReader, BdioWriter, CodecError,
    ComponentBuilder, ContentRange, ContentType, DependencyBuilder, Digest, FileBuilder,
    MetadataBuilder, Node, NoteBuilder, Products, Value,
};
use bdio_vocab::{class, data_property as dp, entry, ns, object_property as op};
use chrono::DateTime;
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};
use std::collections::BTreeSet;
use tracing::Level;

fn entries(payloads: &[JsonValue]) -> Vec<Entry> {
    payloads
        .iter()
        .enumerate()
        .map(|(i, payload)| {
            let name = if i == 0 {
                entry::HEADER.to_string()
            } else {
                entry::data_name(i - 1)
            };
            Entry::new(name, serde_json::to_vec(payload).unwrap())
        })
        .collect()
}

fn data_nodes(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .filter(|n| !n.has_type(class::BILL_OF_MATERIALS))
        .collect()
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_single_file_end_to_end() {
    let file = Node::builder()
        .id("foo")
        .type_(class::FILE)
        .put(dp::PATH, "./foo/bar")
        .put(dp::SIZE, 10i64)
        .build()
        .unwrap();

    let options = BdioOptions::default();
    let entries = encode([&file], &options).unwrap();
    let decoded = data_nodes(decode(entries, &options).unwrap());

    assert_eq!(decoded.len(), 1);
    let node = &decoded[0];
    assert_eq!(node.id(), Some("foo"));
    let types: BTreeSet<&str> = node.types().iter().map(|t| t.as_str()).collect();
    assert_eq!(types, BTreeSet::from([class::FILE]));
    assert_eq!(node.get(dp::PATH), Some(&Value::from("./foo/bar")));
    assert_eq!(node.get(dp::SIZE), Some(&Value::Long(10)));
}

#[test]
fn test_round_trip_typed_values() {
    let created = DateTime::parse_from_rfc3339("2020-02-03T04:05:06+01:00").unwrap();
    let file = FileBuilder::new()
        .id("http://example.com/files/a.txt")
        .path("./a.txt")
        .size(1024i64)
        .content_type(ContentType::new("text", "plain").unwrap())
        .fingerprint(Digest::new("sha1", "2fd4e1c67a2d28fced849ee1bb76e7391b93eb12").unwrap())
        .fingerprint(Digest::new("md5", "d41d8cd98f00b204e9800998ecf8427e").unwrap())
        .creation_date_time(created)
        .parent(Value::reference("http://example.com/files/"))
        .note(
            NoteBuilder::new()
                .range(ContentRange::bytes(0, 9, 1024).unwrap())
                .rights("Copyright 2020")
                .build()
                .unwrap(),
        )
        .note(
            NoteBuilder::new()
                .range(ContentRange::bytes(10, 19, 1024).unwrap())
                .build()
                .unwrap(),
        )
        .build()
        .unwrap();

    let dependency = DependencyBuilder::new()
        .depends_on(Value::reference("http://example.com/components/b"))
        .declared_by(Value::reference("http://example.com/files/a.txt"))
        .scope("compile")
        .build()
        .unwrap();
    let component = ComponentBuilder::new()
        .id("http://example.com/components/a")
        .name("a")
        .version("1.0")
        .resolver("maven/3.6.0".parse::<Products>().unwrap())
        .dependency(dependency)
        .build()
        .unwrap();

    let options = BdioOptions::default();
    let entries = encode([&file, &component], &options).unwrap();
    let decoded = data_nodes(decode(entries, &options).unwrap());
    assert_eq!(decoded, vec![file, component]);
}

#[test]
fn test_wire_form_is_compact() {
    let file = FileBuilder::new()
        .id("http://example.com/f")
        .path("./f")
        .size(3i64)
        .fingerprint(Digest::new("sha1", "abc").unwrap())
        .build()
        .unwrap();
    let entries = encode([&file], &BdioOptions::default()).unwrap();
    let wire: JsonValue = serde_json::from_slice(&entries[1].bytes).unwrap();
    assert_eq!(
        wire,
        json!([{
            "@id": "http://example.com/f",
            "@type": "File",
            "path": "./f",
            "size": 3,
            "fingerprint": "sha1:abc"
        }])
    );
}

#[test]
fn test_base_resolves_relative_ids() {
    let file = FileBuilder::new().id("foo").path("./foo").build().unwrap();
    let options = BdioOptions::default().with_base("http://example.com/root/");
    let entries = encode([&file], &options).unwrap();
    let decoded = data_nodes(decode(entries, &options).unwrap());
    assert_eq!(decoded[0].id(), Some("http://example.com/root/foo"));
}

#[test]
fn test_invalid_options() {
    let file = FileBuilder::new().id("foo").build().unwrap();

    let err = encode([&file], &BdioOptions::default().with_base("relative/path")).unwrap_err();
    assert!(matches!(err, CodecError::InvalidBase { .. }));

    let err = encode([&file], &BdioOptions::default().with_spec_version("3.0.0")).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedSpecVersion { ref version } if version == "3.0.0"));
}

#[test]
fn test_many_values_on_single_term_are_rejected() {
    let file = Node::builder()
        .id("http://example.com/f")
        .type_(class::FILE)
        .add(dp::PATH, "./a")
        .add(dp::PATH, "./b")
        .build()
        .unwrap();

    let err = encode([&file], &BdioOptions::default()).unwrap_err();
    assert!(matches!(err.root(), CodecError::InvalidNode { .. }));
    assert!(bdio_json_ld::view::validate(&file).is_err());
}

// ============================================================================
// Metadata and version migration
// ============================================================================

#[test]
fn test_metadata_header() {
    let metadata = MetadataBuilder::new()
        .id("urn:uuid:2c2dc27a-6f27-4bb6-b5b1-9e2e5e5a4c0d")
        .name("example")
        .creator("jdoe@build-01")
        .publisher("Scanner/2.1 (linux)".parse::<Products>().unwrap())
        .build()
        .unwrap();
    let mut writer = BdioWriter::new(Vec::new(), BdioOptions::default()).unwrap();
    writer.write_metadata(&metadata).unwrap();
    let entries = writer.finish().unwrap();

    assert_eq!(entries.len(), 1);
    let header: JsonValue = serde_json::from_slice(&entries[0].bytes).unwrap();
    assert_eq!(
        header,
        json!([{
            "@id": "urn:uuid:2c2dc27a-6f27-4bb6-b5b1-9e2e5e5a4c0d",
            "@type": "BillOfMaterials",
            "name": "example",
            "creator": "jdoe@build-01",
            "publisher": "Scanner/2.1 (linux)",
            "specVersion": "2.0.0"
        }])
    );
}

#[test]
fn test_migration_to_declared_version() {
    let entries = entries(&[
        json!([{"@id": "urn:bom", "@type": "BillOfMaterials", "specVersion": "1.1.0"}]),
        json!([{"@id": "f", "@type": "File", "checksum": "sha1:abc", "created": "2019-01-01T00:00:00Z"}]),
    ]);
    let mut reader = BdioReader::new(entries, &BdioOptions::default()).unwrap();
    assert_eq!(reader.context().spec_version(), "1.0.0");

    reader.read().unwrap().unwrap();
    assert_eq!(reader.context().spec_version(), "1.1.0");

    let file = reader.read().unwrap().unwrap();
    assert_eq!(
        file.get(dp::FINGERPRINT),
        Some(&Value::Collection(vec![Value::Digest(Digest::new("sha1", "abc").unwrap())]))
    );
    assert!(matches!(file.get(dp::CREATION_DATE_TIME), Some(Value::DateTime(_))));
    assert!(reader.read().unwrap().is_none());
}

#[test]
fn test_migration_to_1_0_0() {
    let entries = entries(&[
        json!([{"@type": "BillOfMaterials", "specVersion": "1.0.0"}]),
        json!([{"@id": "f", "@type": "File", "path": "./f"}]),
    ]);
    let options = BdioOptions::default().with_spec_version("2.0.0");
    let mut reader = BdioReader::new(entries, &options).unwrap();
    assert_eq!(reader.context().spec_version(), "2.0.0");

    reader.read().unwrap().unwrap();
    assert_eq!(reader.context().spec_version(), "1.0.0");
    let file = reader.read().unwrap().unwrap();
    assert_eq!(file.get(dp::PATH), Some(&Value::from("./f")));
}

#[test]
fn test_no_metadata_uses_baseline() {
    let entries = entries(&[json!([
        {"@id": "a", "@type": "File", "checksum": "sha1:abc"},
        {"@id": "b", "@type": "File", "fingerprint": "sha1:def"}
    ])]);
    let mut reader = BdioReader::new(entries, &BdioOptions::default()).unwrap();

    let a = reader.read().unwrap().unwrap();
    assert!(a.get(dp::FINGERPRINT).is_some());

    // 2.0.0 names mean nothing to the baseline
    let b = reader.read().unwrap().unwrap();
    assert!(b.get(dp::FINGERPRINT).is_none());
    assert_eq!(
        b.get(&format!("{}fingerprint", ns::LEGACY)),
        Some(&Value::from("sha1:def"))
    );

    assert!(reader.read().unwrap().is_none());
    assert_eq!(reader.context().spec_version(), "1.0.0");
}

#[test]
fn test_empty_version_is_baseline() {
    let entries = entries(&[
        json!([{"@type": "BillOfMaterials", "specVersion": ""}]),
        json!([{"@id": "a", "@type": "File", "checksum": "sha1:abc"}]),
    ]);
    let mut reader = BdioReader::new(entries, &BdioOptions::default()).unwrap();

    let metadata = reader.read().unwrap().unwrap();
    assert!(metadata.has_type(class::BILL_OF_MATERIALS));
    assert_eq!(reader.context().spec_version(), "1.0.0");

    let file = reader.read().unwrap().unwrap();
    assert_eq!(
        file.get(dp::FINGERPRINT),
        Some(&Value::Collection(vec![Value::from(Digest::new("sha1", "abc").unwrap())]))
    );
}

#[test]
fn test_late_version_node_is_not_retroactive() {
    let entries = entries(&[json!([
        {"@id": "a", "@type": "File", "lastModifiedDateTime": "2020-01-01T00:00:00Z"},
        {"@type": "BillOfMaterials", "specVersion": "2.0.0"},
        {"@id": "b", "@type": "File", "lastModifiedDateTime": "2020-01-01T00:00:00Z"}
    ])]);
    let nodes: Vec<Node> = BdioReader::new(entries, &BdioOptions::default())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert!(nodes[0].get(dp::LAST_MODIFIED_DATE_TIME).is_none());
    assert!(matches!(
        nodes[2].get(dp::LAST_MODIFIED_DATE_TIME),
        Some(Value::DateTime(_))
    ));
}

#[test]
fn test_legacy_document_round_trip() {
    let file = FileBuilder::new()
        .id("http://example.com/f")
        .path("./f")
        .fingerprint(Digest::new("sha1", "abc").unwrap())
        .build()
        .unwrap();
    let options = BdioOptions::default().with_spec_version("1.1.0");
    let entries = encode([&file], &options).unwrap();

    let wire: JsonValue = serde_json::from_slice(&entries[1].bytes).unwrap();
    assert_eq!(wire[0]["checksum"], json!("sha1:abc"));

    let decoded = data_nodes(decode(entries, &BdioOptions::default()).unwrap());
    assert_eq!(decoded, vec![file]);
}

// ============================================================================
// Partitioning
// ============================================================================

fn sample_nodes(count: usize) -> Vec<JsonValue> {
    (0..count)
        .map(|i| {
            json!({
                "@id": format!("http://example.com/{}", i),
                "@type": "File",
                "path": "x".repeat((i * 37) % 97),
                "size": i
            })
        })
        .collect()
}

#[test]
fn test_partition_properties() {
    let nodes = sample_nodes(200);
    for max_weight in [1, 10, 64, 200, 1000, 100_000] {
        let batches = partition(nodes.clone(), max_weight);

        let concatenated: Vec<JsonValue> = batches
            .iter()
            .flat_map(|batch| batch.nodes().iter().cloned())
            .collect();
        assert_eq!(concatenated, nodes, "max_weight {}", max_weight);

        for batch in &batches {
            assert!(!batch.is_empty());
            let weight: usize = batch.nodes().iter().map(estimate_weight).sum();
            assert_eq!(batch.weight(), weight);
            assert!(
                batch.weight() <= max_weight || batch.len() == 1,
                "batch of {} weighs {} > {}",
                batch.len(),
                batch.weight(),
                max_weight
            );
        }
    }
}

#[test]
fn test_partition_single_batch_when_everything_fits() {
    let nodes = sample_nodes(10);
    let batches = partition(nodes.clone(), usize::MAX);
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].nodes(), &nodes[..]);
}

#[test]
fn test_writer_entries_respect_limit() {
    let files: Vec<Node> = (0..100)
        .map(|i| {
            FileBuilder::new()
                .id(format!("http://example.com/{}", i))
                .path(format!("./{}", "y".repeat(i % 50)))
                .size(i as i64)
                .build()
                .unwrap()
        })
        .collect();
    let options = BdioOptions::default()
        .with_max_entry_weight(1024)
        .with_strict_entry_size(true);
    let entries = encode(&files, &options).unwrap();

    assert!(entries.len() > 2);
    assert_eq!(entries[0].name, entry::HEADER);
    for (i, e) in entries[1..].iter().enumerate() {
        assert_eq!(e.name, entry::data_name(i));
        assert!(e.bytes.len() <= 1024);
    }

    let decoded = data_nodes(decode(entries, &options).unwrap());
    assert_eq!(decoded, files);
}

// ============================================================================
// Datatypes
// ============================================================================

#[test]
fn test_digest_parse_format() {
    for (algorithm, value) in [("sha1", "abc123"), ("sha-256", "00ff"), ("md5", "a:b")] {
        let digest = Digest::new(algorithm, value).unwrap();
        assert_eq!(digest.to_string().parse::<Digest>().unwrap(), digest);
    }
    for invalid in ["abc", ":abc", "sha1:", ""] {
        assert!(invalid.parse::<Digest>().is_err(), "{:?}", invalid);
    }
}

#[test]
fn test_products_parse() {
    let products: Products = "foo/1.0 (bar) (gus)".parse().unwrap();
    let product = products.most_significant().unwrap();
    assert_eq!(product.name(), "foo");
    assert_eq!(product.version(), Some("1.0"));
    assert_eq!(product.comment(), Some("(bar) (gus)"));

    let products: Products = "foo bar".parse().unwrap();
    let names: Vec<&str> = products.iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["foo", "bar"]);
}

#[test]
fn test_invalid_scalar_is_located() {
    let entries = entries(&[json!([{"@id": "bad", "@type": "File", "checksum": "nocolon"}])]);
    let mut reader = BdioReader::new(entries, &BdioOptions::default()).unwrap();
    let err = reader.read().unwrap_err();
    match &err {
        CodecError::Located {
            node,
            term,
            spec_version,
            ..
        } => {
            assert_eq!(node.as_deref(), Some("bad"));
            assert_eq!(term, dp::FINGERPRINT);
            assert_eq!(spec_version, "1.0.0");
        }
        other => panic!("unexpected error {:?}", other),
    }
    assert!(matches!(err.root(), CodecError::InvalidInput { .. }));
}

#[test]
fn test_embedded_dependency_gets_range_type() {
    let dependency = Node::builder()
        .put(op::DEPENDS_ON, Value::reference("http://example.com/c"))
        .build()
        .unwrap();
    let component = ComponentBuilder::new()
        .id("http://example.com/a")
        .dependency(dependency)
        .build()
        .unwrap();
    let entries = encode([&component], &BdioOptions::default()).unwrap();
    let decoded = data_nodes(decode(entries, &BdioOptions::default()).unwrap());

    let dependencies = decoded[0].get(op::DEPENDENCY).unwrap().values();
    assert_eq!(dependencies.len(), 1);
    assert!(dependencies[0].as_node().unwrap().has_type(class::DEPENDENCY));
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_oversized_entry_is_logged() {
    let (store, _guard) = support::init_test_tracing();
    let big = FileBuilder::new()
        .id("big")
        .path("x".repeat(300))
        .build()
        .unwrap();
    let options = BdioOptions::default().with_max_entry_weight(200);
    let entries = encode([&big], &options).unwrap();
    assert_eq!(entries.len(), 2);

    let warning = store
        .find(Level::WARN, "entry exceeds the size limit")
        .unwrap();
    assert_eq!(warning.fields["entry"], "bdio-entry-00.jsonld");

    let finished = store.find(Level::INFO, "finished BDIO document").unwrap();
    assert_eq!(finished.fields["entries"], "1");
    assert_eq!(finished.fields["spec_version"], "2.0.0");
}

#[test]
fn test_unknown_datatype_is_logged() {
    let (store, _guard) = support::init_test_tracing();
    let entries = entries(&[json!([
        {"@id": "f", "@type": "File", "custom": {"@value": "x", "@type": "http://example.com/dt"}}
    ])]);
    let options = BdioOptions::default().with_spec_version("2.0.0");
    let nodes = decode(entries, &options).unwrap();
    assert_eq!(
        nodes[0].get(&format!("{}custom", ns::BDIO)),
        Some(&Value::from("x"))
    );

    let warning = store
        .find(Level::WARN, "unrecognized datatype, using default")
        .unwrap();
    assert_eq!(warning.fields["datatype"], "http://example.com/dt");
}
