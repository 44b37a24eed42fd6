//! Expansion: nodes to expanded wire maps, and wire maps (compact or
//! expanded) back to nodes.

use crate::context::Context;
use crate::datatype::mapper::{id_object, typed_value_object};
use crate::datatype::{DatatypeTag, MultiValuePolicy};
use crate::error::{CodecError, Result};
use crate::ident::Term;
use crate::keyword::Keyword;
use crate::node::Node;
use crate::spec::{Container, TermDefinition};
use crate::value::Value;
use crate::vocabulary::TermKind;
use serde_json::{Map, Value as JsonValue};

// ---------------------------------------------------------------------------
// Node → wire
// ---------------------------------------------------------------------------

/// Expand a node: `@id` resolved against the base, `@type` as an array of
/// type IRIs, and every data term keyed by its full IRI.
pub(crate) fn node(context: &Context, node: &Node) -> Result<JsonValue> {
    let mut out = Map::new();
    if let Some(id) = node.id() {
        out.insert(
            "@id".to_string(),
            JsonValue::String(context.expand_iri(id, true)),
        );
    }
    if !node.types().is_empty() {
        let types = node
            .types()
            .iter()
            .map(|t| JsonValue::String(t.to_string()))
            .collect();
        out.insert("@type".to_string(), JsonValue::Array(types));
    }
    for (term, value) in node.data() {
        let definition = context
            .definition_for(term.as_str())
            .cloned()
            .unwrap_or_else(|| TermDefinition::default_for(term.identifier().clone()));
        let expanded = self::value(context, &definition, value).map_err(|e| {
            e.located(node.id(), term.as_str(), context.spec_version())
        })?;
        out.insert(term.to_string(), expanded);
    }
    Ok(JsonValue::Object(out))
}

/// Expand the value of one term, shaped by the term's container.
fn value(context: &Context, definition: &TermDefinition, value: &Value) -> Result<JsonValue> {
    let items = value
        .values()
        .iter()
        .map(|v| element(context, definition, v))
        .collect::<Result<Vec<_>>>()?;

    Ok(match definition.container {
        Container::Single if items.len() > 1 => {
            return Err(CodecError::invalid_node(format!(
                "{} values for a single-valued term",
                items.len()
            )));
        }
        Container::Single if items.len() == 1 => items.into_iter().next().unwrap_or_default(),
        Container::List => {
            let mut list = Map::new();
            list.insert("@list".to_string(), JsonValue::Array(items));
            JsonValue::Object(list)
        }
        Container::Single | Container::Set | Container::Unknown => JsonValue::Array(items),
    })
}

fn element(context: &Context, definition: &TermDefinition, value: &Value) -> Result<JsonValue> {
    let relative = definition.kind != TermKind::Vocab;
    match value {
        Value::Node(embedded) if embedded.types().is_empty() => {
            let typed = embedded
                .as_ref()
                .clone()
                .with_types(definition.declared_types.iter().cloned());
            node(context, &typed)
        }
        Value::Node(embedded) => node(context, embedded),
        Value::Reference(id) => Ok(id_object(&context.expand_iri(id, relative))),
        Value::String(s) if definition.is_identifier() => {
            Ok(id_object(&context.expand_iri(s, relative)))
        }
        Value::Collection(values) => values
            .iter()
            .map(|v| element(context, definition, v))
            .collect::<Result<Vec<_>>>()
            .map(JsonValue::Array),
        scalar => {
            let tag = definition.datatype;
            if tag != DatatypeTag::Default && tag.handler().is_instance(scalar) {
                typed_value_object(tag, scalar)
            } else {
                context.mapper().to_value_object(scalar)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Wire → node
// ---------------------------------------------------------------------------

/// Decode a wire map into a node.
///
/// `@id` resolves against the base, `@type` values and keys against the
/// vocabulary. Bare scalars of typed terms are coerced with the term's
/// datatype.
pub(crate) fn to_node(context: &Context, wire: &JsonValue) -> Result<Node> {
    let map = wire.as_object().ok_or_else(|| {
        CodecError::malformed(format!("expected a node object, found {}", wire))
    })?;

    let mut builder = Node::builder();
    let id = match map.get("@id") {
        Some(JsonValue::String(id)) => Some(context.expand_iri(id, true)),
        Some(other) => return Err(CodecError::malformed(format!("invalid @id {}", other))),
        None => None,
    };
    if let Some(id) = &id {
        builder = builder.id(id.clone());
    }

    if let Some(types) = map.get("@type") {
        for t in as_items(types) {
            let t = t
                .as_str()
                .ok_or_else(|| CodecError::malformed(format!("invalid @type {}", t)))?;
            builder = builder.type_(context.expand_iri(t, false));
        }
    }

    for (key, wire_value) in map {
        if Keyword::is_keyword_like(key) || wire_value.is_null() {
            continue;
        }
        let term = Term::new(&context.expand_iri(key, false))?;
        let definition = context.term_definition(term.as_str())?;
        let decoded = field(context, &definition, wire_value)
            .map_err(|e| e.located(id.as_deref(), term.as_str(), context.spec_version()))?;
        if let Some(decoded) = decoded {
            builder = builder.put(&term, decoded);
        }
    }

    let node = builder.build()?;
    tracing::trace!(id = node.id(), types = node.types().len(), "decoded node");
    Ok(node)
}

/// Decode the wire value of one term, collected per the term's container.
fn field(
    context: &Context,
    definition: &TermDefinition,
    wire: &JsonValue,
) -> Result<Option<Value>> {
    let mut values = Vec::new();
    for item in as_items(wire) {
        if item.is_null() {
            continue;
        }
        values.push(field_element(context, definition, item)?);
    }
    Ok(match definition.container {
        Container::Single => MultiValuePolicy::First.collect(values),
        Container::List | Container::Set => MultiValuePolicy::Collect.collect(values),
        Container::Unknown => context.mapper().policy().collect(values),
    })
}

fn field_element(
    context: &Context,
    definition: &TermDefinition,
    item: &JsonValue,
) -> Result<Value> {
    let relative = definition.kind != TermKind::Vocab;
    match item {
        JsonValue::Object(map) if map.contains_key("@value") => {
            match map.get("@type").and_then(JsonValue::as_str) {
                Some(t) => {
                    let mut typed = map.clone();
                    typed.insert(
                        "@type".to_string(),
                        JsonValue::String(context.expand_iri(t, false)),
                    );
                    context.mapper().value_object(&typed)
                }
                None if definition.datatype != DatatypeTag::Default => definition
                    .datatype
                    .handler()
                    .deserialize(&map["@value"]),
                None => context.mapper().value_object(map),
            }
        }
        JsonValue::Object(map) if map.contains_key("@list") => {
            let values = as_items(item)
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| field_element(context, definition, v))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Collection(values))
        }
        JsonValue::Object(map) => match map.get("@id") {
            Some(JsonValue::String(id)) if map.len() == 1 => {
                Ok(Value::Reference(context.expand_iri(id, relative)))
            }
            _ => Ok(Value::from(to_node(context, item)?)),
        },
        JsonValue::Array(items) => {
            let values = items
                .iter()
                .filter(|v| !v.is_null())
                .map(|v| field_element(context, definition, v))
                .collect::<Result<Vec<_>>>()?;
            Ok(Value::Collection(values))
        }
        JsonValue::String(s) if definition.is_identifier() => {
            Ok(Value::Reference(context.expand_iri(s, relative)))
        }
        scalar if definition.datatype != DatatypeTag::Default => {
            definition.datatype.handler().deserialize(scalar)
        }
        scalar => context.mapper().from_field_value(scalar),
    }
}

/// Arrays and `@list` objects are unwrapped; anything else is one item.
fn as_items(value: &JsonValue) -> &[JsonValue] {
    match value {
        JsonValue::Array(items) => items,
        JsonValue::Object(map) => match map.get("@list") {
            Some(JsonValue::Array(items)) => items,
            _ => std::slice::from_ref(value),
        },
        _ => std::slice::from_ref(value),
    }
}
