//! The archive codec: nodes to named JSON-LD entries and back.
//!
//! A document is an ordered sequence of entries. The first is the header
//! (`bdio-header.jsonld`), a JSON array holding only the metadata node.
//! Data entries (`bdio-entry-00.jsonld`, `bdio-entry-01.jsonld`, ...)
//! follow, each a JSON array of compacted nodes sized by the
//! [`Partitioner`].

use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::node::Node;
use crate::options::BdioOptions;
use crate::partition::{Batch, Partitioner};
use crate::reader::BdioReader;
use bdio_vocab::{class, data_property, entry};
use serde_json::Value as JsonValue;

/// One named blob of an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Entry {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn is_header(&self) -> bool {
        self.name == entry::HEADER
    }
}

/// True for entry names carrying JSON-LD.
pub fn is_data_entry(name: &str) -> bool {
    name.ends_with(entry::EXTENSION)
}

/// Destination for the entries produced by a [`BdioWriter`].
pub trait EntrySink {
    fn write_entry(&mut self, entry: Entry) -> Result<()>;
}

impl EntrySink for Vec<Entry> {
    fn write_entry(&mut self, entry: Entry) -> Result<()> {
        self.push(entry);
        Ok(())
    }
}

/// Push-based archive writer.
///
/// Nodes are expanded and compacted with the writing context, then batched
/// so that each data entry stays within `max_entry_weight`. At most one
/// batch is held in memory.
///
/// The metadata node is written first: either explicitly through
/// [`write_metadata`](Self::write_metadata), implicitly when the first node
/// written is a `BillOfMaterials`, or as an anonymous default before the
/// first data node.
#[derive(Debug)]
pub struct BdioWriter<S> {
    sink: S,
    context: Context,
    options: BdioOptions,
    partitioner: Partitioner,
    header_written: bool,
    entries: usize,
    nodes: usize,
}

impl<S: EntrySink> BdioWriter<S> {
    pub fn new(sink: S, options: BdioOptions) -> Result<Self> {
        let context = Context::for_writing(&options)?;
        let partitioner =
            Partitioner::new(options.max_entry_weight).with_framing(entry::ENTRY_OVERHEAD, 1);
        Ok(Self {
            sink,
            context,
            options,
            partitioner,
            header_written: false,
            entries: 0,
            nodes: 0,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Write the header entry.
    ///
    /// The node gets the `BillOfMaterials` type, an anonymous identifier if
    /// it has none, and the `specVersion` of the writing context.
    pub fn write_metadata(&mut self, metadata: &Node) -> Result<()> {
        if self.header_written {
            return Err(CodecError::invalid_node(
                "metadata must be written before any other node",
            ));
        }
        let node = self.metadata_node(Some(metadata.clone()))?;
        self.write_header(&node)
    }

    /// Write one node, closing the current entry if it is full.
    pub fn write(&mut self, node: &Node) -> Result<()> {
        if !self.header_written {
            if node.has_type(class::BILL_OF_MATERIALS) {
                return self.write_metadata(node);
            }
            let node = self.metadata_node(None)?;
            self.write_header(&node)?;
        }

        let wire = self.context.compact(&self.context.expand(node)?)?;
        if let Some(batch) = self.partitioner.push(wire) {
            self.write_batch(batch)?;
        }
        self.nodes += 1;
        Ok(())
    }

    pub fn write_all<'a>(&mut self, nodes: impl IntoIterator<Item = &'a Node>) -> Result<()> {
        for node in nodes {
            self.write(node)?;
        }
        Ok(())
    }

    /// Close the current data entry even if it has room left.
    pub fn close_entry(&mut self) -> Result<()> {
        match self.partitioner.flush() {
            Some(batch) => self.write_batch(batch),
            None => Ok(()),
        }
    }

    /// Flush the last entry and return the sink.
    pub fn finish(mut self) -> Result<S> {
        if !self.header_written {
            let node = self.metadata_node(None)?;
            self.write_header(&node)?;
        }
        self.close_entry()?;
        tracing::info!(
            entries = self.entries,
            nodes = self.nodes,
            spec_version = self.context.spec_version(),
            "finished BDIO document"
        );
        Ok(self.sink)
    }

    fn metadata_node(&self, metadata: Option<Node>) -> Result<Node> {
        let (id, types, data) = match metadata {
            Some(node) => node.into_parts(),
            None => Default::default(),
        };
        let mut builder = Node::builder()
            .id(id.unwrap_or_else(Node::anonymous_id))
            .type_(class::BILL_OF_MATERIALS)
            .types(types.iter());
        for (term, value) in data {
            builder = builder.put(term, value);
        }
        builder
            .put(data_property::SPEC_VERSION, self.context.spec_version())
            .build()
    }

    fn write_header(&mut self, metadata: &Node) -> Result<()> {
        let wire = self.context.compact(&self.context.expand(metadata)?)?;
        let bytes = self.serialize(&JsonValue::Array(vec![wire]))?;
        self.check_size(entry::HEADER, bytes.len())?;
        self.sink.write_entry(Entry::new(entry::HEADER, bytes))?;
        self.header_written = true;
        Ok(())
    }

    fn write_batch(&mut self, batch: Batch) -> Result<()> {
        let name = entry::data_name(self.entries);
        let weight = batch.weight();
        let count = batch.len();
        let bytes = self.serialize(&JsonValue::Array(batch.into_nodes()))?;
        self.check_size(&name, bytes.len())?;
        tracing::debug!(entry = %name, nodes = count, weight, size = bytes.len(), "writing entry");
        self.sink.write_entry(Entry::new(name, bytes))?;
        self.entries += 1;
        Ok(())
    }

    fn serialize(&self, value: &JsonValue) -> Result<Vec<u8>> {
        Ok(if self.options.pretty {
            serde_json::to_vec_pretty(value)?
        } else {
            serde_json::to_vec(value)?
        })
    }

    fn check_size(&self, name: &str, size: usize) -> Result<()> {
        let max = self.options.max_entry_weight;
        if size <= max {
            return Ok(());
        }
        if self.options.strict_entry_size {
            return Err(CodecError::EntrySizeViolation {
                name: name.to_string(),
                estimated_size: size,
            });
        }
        tracing::warn!(entry = %name, size, max, "entry exceeds the size limit");
        Ok(())
    }
}

/// Encode nodes as a complete archive.
///
/// A leading `BillOfMaterials` node becomes the header; otherwise an
/// anonymous one is generated.
pub fn encode<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    options: &BdioOptions,
) -> Result<Vec<Entry>> {
    let mut writer = BdioWriter::new(Vec::new(), options.clone())?;
    writer.write_all(nodes)?;
    writer.finish()
}

/// Decode every node of an archive, metadata node included.
pub fn decode(entries: Vec<Entry>, options: &BdioOptions) -> Result<Vec<Node>> {
    BdioReader::new(entries, options)?.collect()
}

/// Encode nodes as the payload of a single entry.
pub fn encode_entry<'a>(
    nodes: impl IntoIterator<Item = &'a Node>,
    context: &Context,
) -> Result<Vec<u8>> {
    let wire = nodes
        .into_iter()
        .map(|node| context.compact(&context.expand(node)?))
        .collect::<Result<Vec<_>>>()?;
    Ok(serde_json::to_vec(&JsonValue::Array(wire))?)
}

/// Decode the payload of a single entry with a fixed context.
pub fn decode_entry(bytes: &[u8], context: &Context) -> Result<Vec<Node>> {
    match serde_json::from_slice::<JsonValue>(bytes)? {
        JsonValue::Array(items) => items
            .iter()
            .map(|item| context.expand_to_node(item))
            .collect(),
        other => Err(CodecError::malformed(format!(
            "malformed container: expected an array, found {}",
            other
        ))),
    }
}
