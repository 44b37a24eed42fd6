use crate::datatype::{ContentRange, ContentType, Digest, Products};
use crate::node::Node;
use chrono::{DateTime, FixedOffset};
use serde_json::Number;

/// A property value held by a [`Node`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Number(Number),
    Boolean(bool),
    Long(i64),
    DateTime(DateTime<FixedOffset>),
    Digest(Digest),
    Products(Products),
    ContentRange(ContentRange),
    ContentType(ContentType),
    /// The identifier of another node
    Reference(String),
    /// A node embedded in its parent (annotations, dependencies, notes)
    Node(Box<Node>),
    /// Multiple values of one property; the term's container decides whether
    /// order is significant
    Collection(Vec<Value>),
}

impl Value {
    pub fn reference(id: impl Into<String>) -> Self {
        Value::Reference(id.into())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self {
            Value::Long(n) => Some(*n),
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&str> {
        match self {
            Value::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Value::Node(node) => Some(node),
            _ => None,
        }
    }

    /// The elements of a collection, or the value itself.
    pub fn values(&self) -> &[Value] {
        match self {
            Value::Collection(values) => values,
            single => std::slice::from_ref(single),
        }
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, Value::Collection(_))
    }

    /// Short description used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String(_) => "string",
            Value::Number(_) => "number",
            Value::Boolean(_) => "boolean",
            Value::Long(_) => "long",
            Value::DateTime(_) => "date-time",
            Value::Digest(_) => "digest",
            Value::Products(_) => "products",
            Value::ContentRange(_) => "content range",
            Value::ContentType(_) => "content type",
            Value::Reference(_) => "reference",
            Value::Node(_) => "node",
            Value::Collection(_) => "collection",
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(dt: DateTime<FixedOffset>) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Digest> for Value {
    fn from(d: Digest) -> Self {
        Value::Digest(d)
    }
}

impl From<Products> for Value {
    fn from(p: Products) -> Self {
        Value::Products(p)
    }
}

impl From<ContentRange> for Value {
    fn from(r: ContentRange) -> Self {
        Value::ContentRange(r)
    }
}

impl From<ContentType> for Value {
    fn from(c: ContentType) -> Self {
        Value::ContentType(c)
    }
}

impl From<Node> for Value {
    fn from(node: Node) -> Self {
        Value::Node(Box::new(node))
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Value::Collection(values)
    }
}
