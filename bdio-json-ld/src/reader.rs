//! Pull-based decoding of BDIO entries.
//!
//! [`BdioReader`] walks the entries of a document in order and yields one
//! [`Node`] per element of each entry's top-level JSON array. Only one
//! decoded node is held at a time.

use crate::archive::{self, Entry};
use crate::context::Context;
use crate::error::{CodecError, Result};
use crate::node::Node;
use crate::options::BdioOptions;
use crate::spec::Specification;
use bdio_vocab::{class, data_property};
use serde_json::{Deserializer, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingArrayStart,
    ReadingNode,
    Done,
    Failed,
}

/// Cursor over the elements of one entry's top-level array.
#[derive(Debug)]
struct EntryCursor {
    name: String,
    bytes: Vec<u8>,
    pos: usize,
    first: bool,
}

impl EntryCursor {
    /// Consume the opening `[` of the entry.
    fn open(entry: Entry) -> Result<Self> {
        let mut cursor = Self {
            name: entry.name,
            bytes: entry.bytes,
            pos: 0,
            first: true,
        };
        cursor.skip_whitespace();
        if cursor.peek() != Some(b'[') {
            return Err(CodecError::malformed(format!(
                "malformed container: entry {} does not start with '['",
                cursor.name
            )));
        }
        cursor.pos += 1;
        Ok(cursor)
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b' ' | b'\t' | b'\n' | b'\r')) {
            self.pos += 1;
        }
    }

    /// The next element, or `None` once the closing `]` is consumed.
    fn next_value(&mut self) -> Result<Option<JsonValue>> {
        self.skip_whitespace();
        match self.peek() {
            Some(b']') => {
                self.pos += 1;
                self.skip_whitespace();
                if self.pos != self.bytes.len() {
                    return Err(CodecError::malformed(format!(
                        "trailing characters after the array in entry {} at byte {}",
                        self.name, self.pos
                    )));
                }
                return Ok(None);
            }
            None => {
                return Err(CodecError::malformed(format!(
                    "unterminated array in entry {}",
                    self.name
                )));
            }
            Some(b',') if !self.first => {
                self.pos += 1;
            }
            Some(other) if !self.first => {
                return Err(CodecError::malformed(format!(
                    "expected ',' or ']' in entry {} at byte {}, found {:?}",
                    self.name, self.pos, other as char
                )));
            }
            Some(_) => {}
        }
        self.first = false;

        let mut stream = Deserializer::from_slice(&self.bytes[self.pos..]).into_iter::<JsonValue>();
        match stream.next() {
            Some(Ok(value)) => {
                self.pos += stream.byte_offset();
                Ok(Some(value))
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(CodecError::malformed(format!(
                "unterminated array in entry {}",
                self.name
            ))),
        }
    }
}

/// Streaming reader over the entries of one document.
///
/// The reader starts with the configured version (the baseline by default).
/// When a `BillOfMaterials` node declaring a `specVersion` is read, the
/// reader switches to that version before decoding the node itself; nodes
/// already returned are not reinterpreted. Producers write the metadata
/// node first, so in practice the switch precedes all data.
///
/// ```
/// use bdio_json_ld::archive::Entry;
/// use bdio_json_ld::{BdioOptions, BdioReader};
///
/// let entries = vec![Entry::new(
///     "bdio-entry-00.jsonld",
///     r#"[{"@id": "foo", "@type": "File", "path": "./foo"}]"#,
/// )];
/// let mut reader = BdioReader::new(entries, &BdioOptions::default()).unwrap();
/// let node = reader.read().unwrap().unwrap();
/// assert_eq!(node.id(), Some("foo"));
/// assert!(reader.read().unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct BdioReader<I> {
    entries: I,
    cursor: Option<EntryCursor>,
    state: State,
    context: Context,
}

impl<I> BdioReader<I>
where
    I: Iterator<Item = Entry>,
{
    /// Open a reader and consume the opening delimiter of the first entry.
    ///
    /// Entries whose names do not end in `.jsonld` are skipped.
    pub fn new<T>(entries: T, options: &BdioOptions) -> Result<Self>
    where
        T: IntoIterator<Item = Entry, IntoIter = I>,
    {
        let mut reader = Self {
            entries: entries.into_iter(),
            cursor: None,
            state: State::AwaitingArrayStart,
            context: Context::for_reading(options)?,
        };
        reader.open_next()?;
        Ok(reader)
    }

    /// The active context; reflects any version switch made so far.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Decode the next node.
    ///
    /// Returns `Ok(None)` once every entry is exhausted, and keeps doing so
    /// on later calls. A decoding failure for a single node leaves the
    /// reader usable; a structural failure moves it to a failed state in
    /// which every call returns [`CodecError::ReaderFailed`].
    pub fn read(&mut self) -> Result<Option<Node>> {
        loop {
            match self.state {
                State::Done => return Ok(None),
                State::Failed => return Err(CodecError::ReaderFailed),
                State::AwaitingArrayStart => self.open_next()?,
                State::ReadingNode => {
                    let Some(cursor) = self.cursor.as_mut() else {
                        self.state = State::AwaitingArrayStart;
                        continue;
                    };
                    match cursor.next_value() {
                        Ok(Some(wire)) => return self.decode(&wire).map(Some),
                        Ok(None) => {
                            self.cursor = None;
                            self.state = State::AwaitingArrayStart;
                        }
                        Err(e) => {
                            self.state = State::Failed;
                            return Err(e);
                        }
                    }
                }
            }
        }
    }

    fn open_next(&mut self) -> Result<()> {
        for entry in self.entries.by_ref() {
            if !archive::is_data_entry(&entry.name) {
                tracing::debug!(entry = %entry.name, "skipping non JSON-LD entry");
                continue;
            }
            match EntryCursor::open(entry) {
                Ok(cursor) => {
                    self.cursor = Some(cursor);
                    self.state = State::ReadingNode;
                    return Ok(());
                }
                Err(e) => {
                    self.state = State::Failed;
                    return Err(e);
                }
            }
        }
        self.state = State::Done;
        Ok(())
    }

    fn decode(&mut self, wire: &JsonValue) -> Result<Node> {
        if let Some(version) = declared_version(&self.context, wire) {
            if version != self.context.spec_version() {
                match self.context.migrate(Some(version)) {
                    Ok(context) => self.context = context,
                    Err(e) => {
                        self.state = State::Failed;
                        return Err(e);
                    }
                }
            }
        }
        self.context.expand_to_node(wire)
    }
}

impl<I> Iterator for BdioReader<I>
where
    I: Iterator<Item = Entry>,
{
    type Item = Result<Node>;

    /// Ends after `Done`, and after yielding the error that failed the
    /// reader.
    fn next(&mut self) -> Option<Self::Item> {
        if self.state == State::Failed {
            return None;
        }
        self.read().transpose()
    }
}

/// The version a wire node declares, if it is a metadata node.
fn declared_version<'a>(context: &Context, wire: &'a JsonValue) -> Option<&'a str> {
    let map = wire.as_object()?;
    let is_metadata = match map.get("@type")? {
        JsonValue::Array(types) => types.iter().any(|t| is_metadata_type(context, t)),
        t => is_metadata_type(context, t),
    };
    if !is_metadata {
        return None;
    }
    map.iter()
        .find(|(key, _)| context.expand_iri(key, false) == data_property::SPEC_VERSION)
        .and_then(|(_, value)| match value {
            JsonValue::String(s) => Some(s.as_str()),
            JsonValue::Object(obj) => obj.get("@value").and_then(JsonValue::as_str),
            _ => None,
        })
}

fn is_metadata_type(context: &Context, wire_type: &JsonValue) -> bool {
    wire_type
        .as_str()
        .map(|t| context.expand_iri(t, false) == class::BILL_OF_MATERIALS)
        .unwrap_or(false)
}

/// The version declared by the metadata node of a document, without
/// decoding any data.
///
/// Only the first element of the first JSON-LD entry is inspected.
pub fn scan_spec_version(entries: &[Entry]) -> Result<Option<String>> {
    let Some(entry) = entries.iter().find(|e| archive::is_data_entry(&e.name)) else {
        return Ok(None);
    };
    let mut cursor = EntryCursor::open(entry.clone())?;
    let Some(first) = cursor.next_value()? else {
        return Ok(None);
    };
    let context = Context::for_reading(&BdioOptions::default())?;
    match declared_version(&context, &first) {
        Some(version) => {
            let spec = Specification::for_version(Some(version))?;
            Ok(Some(spec.version().to_string()))
        }
        None => Ok(None),
    }
}
