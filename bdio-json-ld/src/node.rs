use crate::error::Result;
use crate::ident::{Term, Type};
use crate::value::Value;
use bdio_vocab::{class, data_property};
use std::collections::{BTreeMap, BTreeSet};

/// A typed graph node.
///
/// Nodes are immutable once built; use [`NodeBuilder`] to construct them.
/// The data map is keyed by interned terms, so it can never contain the
/// reserved `@id`/`@type` keys.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Node {
    id: Option<String>,
    types: BTreeSet<Type>,
    data: BTreeMap<Term, Value>,
}

impl Node {
    pub fn builder() -> NodeBuilder {
        NodeBuilder::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn types(&self) -> &BTreeSet<Type> {
        &self.types
    }

    pub fn data(&self) -> &BTreeMap<Term, Value> {
        &self.data
    }

    /// Value of the term with the given full IRI.
    pub fn get(&self, term: &str) -> Option<&Value> {
        self.data.get(term)
    }

    pub fn has_type(&self, type_iri: &str) -> bool {
        self.types.contains(type_iri)
    }

    /// True for nodes without an identifier.
    pub fn is_anonymous(&self) -> bool {
        self.id.is_none()
    }

    /// A fresh, globally unique node identifier (`urn:uuid:...`).
    pub fn anonymous_id() -> String {
        format!("urn:uuid:{}", uuid::Uuid::new_v4())
    }

    /// Copy of this node with a different identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Node {
        self.id = Some(id.into());
        self
    }

    /// Copy of this node with additional types.
    pub fn with_types(mut self, types: impl IntoIterator<Item = Type>) -> Node {
        self.types.extend(types);
        self
    }

    /// This node, with a generated identifier if it had none.
    pub fn identified(self) -> Node {
        match self.id {
            Some(_) => self,
            None => self.with_id(Node::anonymous_id()),
        }
    }

    /// The version declared by a metadata node.
    ///
    /// Returns `None` unless the node is a `BillOfMaterials` carrying a
    /// string `specVersion`.
    pub fn declared_spec_version(&self) -> Option<&str> {
        if !self.has_type(class::BILL_OF_MATERIALS) {
            return None;
        }
        self.get(data_property::SPEC_VERSION).and_then(Value::as_str)
    }

    pub fn into_parts(self) -> (Option<String>, BTreeSet<Type>, BTreeMap<Term, Value>) {
        (self.id, self.types, self.data)
    }
}

/// Builder for [`Node`].
///
/// Types and terms are given as IRIs and interned on [`build`](Self::build),
/// which fails if any of them is not a valid identifier.
#[derive(Debug, Clone, Default)]
pub struct NodeBuilder {
    id: Option<String>,
    types: Vec<String>,
    data: Vec<(String, Value)>,
}

impl NodeBuilder {
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn type_(mut self, type_iri: impl AsRef<str>) -> Self {
        self.types.push(type_iri.as_ref().to_string());
        self
    }

    pub fn types<I, S>(mut self, type_iris: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.types
            .extend(type_iris.into_iter().map(|t| t.as_ref().to_string()));
        self
    }

    /// Set the value of a term, replacing any previous value.
    pub fn put(mut self, term: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let term = term.as_ref();
        let value = value.into();
        match self.data.iter_mut().find(|(t, _)| t == term) {
            Some(entry) => entry.1 = value,
            None => self.data.push((term.to_string(), value)),
        }
        self
    }

    /// Add a value to a term, turning an existing value into a collection.
    pub fn add(mut self, term: impl AsRef<str>, value: impl Into<Value>) -> Self {
        let term = term.as_ref();
        let value = value.into();
        match self.data.iter_mut().find(|(t, _)| t == term) {
            Some((_, Value::Collection(values))) => values.push(value),
            Some(entry) => {
                let previous = std::mem::replace(&mut entry.1, Value::Collection(Vec::new()));
                entry.1 = Value::Collection(vec![previous, value]);
            }
            None => self.data.push((term.to_string(), Value::Collection(vec![value]))),
        }
        self
    }

    /// Intern the collected identifiers and build the node.
    ///
    /// Empty collections are dropped.
    pub fn build(self) -> Result<Node> {
        let types = self
            .types
            .iter()
            .map(|t| Type::new(t))
            .collect::<Result<BTreeSet<_>>>()?;
        let mut data = BTreeMap::new();
        for (term, value) in self.data {
            if matches!(&value, Value::Collection(values) if values.is_empty()) {
                continue;
            }
            data.insert(Term::new(&term)?, value);
        }
        Ok(Node {
            id: self.id,
            types,
            data,
        })
    }
}
