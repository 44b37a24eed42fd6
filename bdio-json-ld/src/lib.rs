//! BDIO document codec
//!
//! This library reads and writes Black Duck I/O (BDIO) documents:
//! - Versioned vocabulary (specification registry, 1.0.0 through 2.0.0)
//! - Term/type interning and typed datatypes (digests, products, content ranges)
//! - JSON-LD expansion and compaction against a per-document context
//! - A streaming reader with version migration
//! - A weight-bounded writer producing named archive entries
//!
//! # Example
//!
//! ```
//! use bdio_json_ld::{decode, encode, BdioOptions, FileBuilder, Value};
//!
//! let file = FileBuilder::new()
//!     .id("foo")
//!     .path("./foo/bar")
//!     .size(10i64)
//!     .build()
//!     .unwrap();
//!
//! let options = BdioOptions::default();
//! let entries = encode([&file], &options).unwrap();
//! assert_eq!(entries[0].name, "bdio-header.jsonld");
//!
//! let nodes = decode(entries, &options).unwrap();
//! let decoded = nodes.iter().find(|n| n.id() == Some("foo")).unwrap();
//! assert_eq!(decoded.get(bdio_vocab::data_property::SIZE), Some(&Value::Long(10)));
//! ```

pub mod archive;
pub mod compact;
pub mod context;
pub mod datatype;
pub mod error;
pub mod expand;
pub mod ident;
pub mod iri;
pub mod keyword;
pub mod node;
pub mod options;
pub mod partition;
pub mod reader;
pub mod spec;
pub mod value;
pub mod view;
pub mod vocabulary;

pub use archive::{BdioWriter, Entry, EntrySink};
pub use compact::ContextCompactor;
pub use context::{Context, ContextBuilder};
pub use datatype::{
    ContentRange, ContentType, DatatypeHandler, DatatypeTag, Digest, MultiValuePolicy, Product,
    Products, ValueObjectMapper,
};
pub use error::{CodecError, Result};
pub use ident::{Identifier, Registry, Term, Type};
pub use keyword::Keyword;
pub use node::{Node, NodeBuilder};
pub use options::BdioOptions;
pub use partition::{Batch, Partitioner};
pub use reader::BdioReader;
pub use spec::{Container, Specification, TermDefinition};
pub use value::Value;
pub use view::{
    AnnotationBuilder, ComponentBuilder, ContainerBuilder, ContainerLayerBuilder,
    DependencyBuilder, FileBuilder, FileCollectionBuilder, LicenseBuilder, LicenseGroupBuilder,
    MetadataBuilder, NoteBuilder, ProjectBuilder,
    RepositoryBuilder, VersionBuilder, ViewBuilder, VulnerabilityBuilder,
};

use serde_json::Value as JsonValue;

/// Encode nodes as a complete BDIO document.
///
/// The first entry is always the header holding the metadata node; a
/// leading `BillOfMaterials` node is used as that metadata, otherwise an
/// anonymous one is generated.
pub fn encode<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    options: &BdioOptions,
) -> Result<Vec<Entry>> {
    archive::encode(nodes, options)
}

/// Decode every node of a BDIO document.
///
/// Reading starts with `options.spec_version` (the baseline by default)
/// and switches to the version declared by the metadata node.
pub fn decode(entries: Vec<Entry>, options: &BdioOptions) -> Result<Vec<Node>> {
    archive::decode(entries, options)
}

/// Look up a specification version; `None` selects the baseline.
///
/// # Example
/// ```
/// use bdio_json_ld::spec_for_version;
///
/// assert_eq!(spec_for_version(Some("1.1.0")).unwrap().version(), "1.1.0");
/// assert_eq!(spec_for_version(None).unwrap().version(), "1.0.0");
/// assert!(spec_for_version(Some("0.9")).is_err());
/// ```
pub fn spec_for_version(version: Option<&str>) -> Result<&'static Specification> {
    Specification::for_version(version)
}

/// Expand a node with the default writing context.
///
/// # Example
/// ```
/// use bdio_json_ld::{expand, Node};
/// use bdio_vocab::{class, data_property};
///
/// let node = Node::builder()
///     .id("http://example.com/foo")
///     .type_(class::FILE)
///     .put(data_property::PATH, "./foo")
///     .build()
///     .unwrap();
/// let expanded = expand(&node).unwrap();
/// assert_eq!(expanded["@type"][0], class::FILE);
/// ```
pub fn expand(node: &Node) -> Result<JsonValue> {
    Context::for_writing(&BdioOptions::default())?.expand(node)
}

/// Compact an expanded node with the default writing context.
pub fn compact(expanded: &JsonValue) -> Result<JsonValue> {
    Context::for_writing(&BdioOptions::default())?.compact(expanded)
}

/// Estimate the serialized size of a wire value.
///
/// # Example
/// ```
/// use bdio_json_ld::estimate_weight;
/// use serde_json::json;
///
/// assert_eq!(estimate_weight(&json!("abc")), 5);
/// ```
pub fn estimate_weight(value: &JsonValue) -> usize {
    partition::estimate_weight(value, 0)
}

/// Split wire nodes into batches of at most `max_weight`.
///
/// Order is preserved; a node heavier than `max_weight` forms a batch on
/// its own.
pub fn partition(nodes: impl IntoIterator<Item = JsonValue>, max_weight: usize) -> Vec<Batch> {
    partition::partition(nodes, max_weight)
}

/// Check if a wire value is a BDIO node map (an object with `@id` or
/// `@type`).
pub fn is_node_map(value: &JsonValue) -> bool {
    match value {
        JsonValue::Object(map) => map.contains_key("@id") || map.contains_key("@type"),
        _ => false,
    }
}
