//! Conversion between wire value objects (`{"@value": ..., "@type": ...}`,
//! `{"@id": ...}`, arrays) and native [`Value`]s.

use super::DatatypeTag;
use crate::error::{CodecError, Result};
use crate::keyword::Keyword;
use crate::value::Value;
use serde_json::{Map, Value as JsonValue};

/// How multiple decoded values for one field are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MultiValuePolicy {
    /// A single element unwraps to the bare value; anything else is a
    /// collection
    #[default]
    UnwrapSingle,
    /// Always produce a collection
    Collect,
    /// Keep only the first value
    First,
}

impl MultiValuePolicy {
    /// Apply the policy; `None` when there are no values.
    pub fn collect(self, mut values: Vec<Value>) -> Option<Value> {
        match self {
            _ if values.is_empty() => None,
            MultiValuePolicy::UnwrapSingle if values.len() == 1 => values.pop(),
            MultiValuePolicy::UnwrapSingle | MultiValuePolicy::Collect => {
                Some(Value::Collection(values))
            }
            MultiValuePolicy::First => values.into_iter().next(),
        }
    }
}

/// Maps wire values to native values and back using the built-in
/// datatype handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueObjectMapper {
    policy: MultiValuePolicy,
}

impl ValueObjectMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: MultiValuePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MultiValuePolicy {
        self.policy
    }

    /// Decode a wire value that contains no embedded nodes.
    pub fn from_field_value(&self, wire: &JsonValue) -> Result<Value> {
        self.from_field_value_with(wire, &mut |map| {
            Err(CodecError::unsupported_type(format!(
                "embedded node {} requires a context",
                JsonValue::Object(map.clone())
            )))
        })
    }

    /// Decode a wire value, handing embedded node objects to `embed`.
    pub fn from_field_value_with(
        &self,
        wire: &JsonValue,
        embed: &mut dyn FnMut(&Map<String, JsonValue>) -> Result<Value>,
    ) -> Result<Value> {
        match wire {
            JsonValue::Array(items) => {
                let values = items
                    .iter()
                    .filter(|item| !item.is_null())
                    .map(|item| self.from_field_value_with(item, embed))
                    .collect::<Result<Vec<_>>>()?;
                Ok(self
                    .policy
                    .collect(values)
                    .unwrap_or(Value::Collection(Vec::new())))
            }
            JsonValue::Object(map) => {
                if let Some(list) = map.get(Keyword::List.as_str()) {
                    let items = list.as_array().map(Vec::as_slice).unwrap_or_default();
                    let values = items
                        .iter()
                        .filter(|item| !item.is_null())
                        .map(|item| self.from_field_value_with(item, embed))
                        .collect::<Result<Vec<_>>>()?;
                    return Ok(Value::Collection(values));
                }
                if map.contains_key(Keyword::Value.as_str()) {
                    return self.value_object(map);
                }
                if map.len() == 1 {
                    if let Some(JsonValue::String(id)) = map.get(Keyword::Id.as_str()) {
                        return Ok(Value::Reference(id.clone()));
                    }
                }
                embed(map)
            }
            JsonValue::Null => Err(CodecError::malformed("null is not a field value")),
            scalar => DatatypeTag::Default.handler().deserialize(scalar),
        }
    }

    /// Decode a `{"@value": ..., "@type": ...}` object. Unknown or missing
    /// types use the default handler.
    pub fn value_object(&self, map: &Map<String, JsonValue>) -> Result<Value> {
        let value = map
            .get(Keyword::Value.as_str())
            .ok_or_else(|| CodecError::malformed("value object without @value"))?;
        let tag = match map.get(Keyword::Type.as_str()).and_then(JsonValue::as_str) {
            Some(iri) => DatatypeTag::from_iri(iri).unwrap_or_else(|| {
                tracing::warn!(datatype = iri, "unrecognized datatype, using default");
                DatatypeTag::Default
            }),
            None => DatatypeTag::Default,
        };
        tag.handler().deserialize(value)
    }

    /// Encode a native value using the first handler that accepts it.
    ///
    /// Default values are written as bare scalars; every other datatype is
    /// wrapped in a value object.
    pub fn to_value_object(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::Collection(values) => values
                .iter()
                .map(|v| self.to_value_object(v))
                .collect::<Result<Vec<_>>>()
                .map(JsonValue::Array),
            Value::Reference(id) => Ok(id_object(id)),
            other => {
                let tag = DatatypeTag::ALL
                    .into_iter()
                    .find(|tag| tag.handler().is_instance(other))
                    .ok_or_else(|| {
                        CodecError::unsupported_type(format!(
                            "no datatype accepts a {} value",
                            other.kind()
                        ))
                    })?;
                typed_value_object(tag, other)
            }
        }
    }

    /// Encode a value of a property that references other nodes.
    ///
    /// Identifiers, strings and references are wrapped as `{"@id": ...}`;
    /// already-expanded objects are passed through.
    pub fn to_reference_value_object(&self, value: &JsonValue) -> JsonValue {
        match value {
            JsonValue::String(id) => id_object(id),
            JsonValue::Array(items) => JsonValue::Array(
                items
                    .iter()
                    .map(|item| self.to_reference_value_object(item))
                    .collect(),
            ),
            other => other.clone(),
        }
    }
}

/// Serialize `value` with the handler for `tag`.
pub(crate) fn typed_value_object(tag: DatatypeTag, value: &Value) -> Result<JsonValue> {
    let scalar = tag.handler().serialize(value)?;
    if tag == DatatypeTag::Default {
        return Ok(scalar);
    }
    let mut obj = Map::new();
    obj.insert(Keyword::Value.as_str().to_string(), scalar);
    obj.insert(
        Keyword::Type.as_str().to_string(),
        JsonValue::String(tag.iri().to_string()),
    );
    Ok(JsonValue::Object(obj))
}

pub(crate) fn id_object(id: &str) -> JsonValue {
    let mut obj = Map::new();
    obj.insert(
        Keyword::Id.as_str().to_string(),
        JsonValue::String(id.to_string()),
    );
    JsonValue::Object(obj)
}
