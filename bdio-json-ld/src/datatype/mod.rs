//! Built-in datatypes and their wire conversions.
//!
//! Each [`DatatypeTag`] has a [`DatatypeHandler`] converting between the
//! native [`Value`] and the scalar stored under `@value`.

mod content;
mod digest;
pub mod mapper;
mod product;

pub use content::{ContentRange, ContentType};
pub use digest::Digest;
pub use mapper::{MultiValuePolicy, ValueObjectMapper};
pub use product::{Product, Products, ProductsBuilder};

use crate::error::{CodecError, Result};
use crate::value::Value;
use bdio_vocab::datatype as dt;
use chrono::DateTime;
use serde_json::Value as JsonValue;
use std::fmt;
use std::str::FromStr;

/// The datatypes a term may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DatatypeTag {
    /// Plain JSON scalars (string, number, boolean)
    #[default]
    Default,
    DateTime,
    Digest,
    Long,
    Products,
    ContentRange,
    ContentType,
}

impl DatatypeTag {
    /// All datatypes in declaration order
    pub const ALL: [DatatypeTag; 7] = [
        DatatypeTag::Default,
        DatatypeTag::DateTime,
        DatatypeTag::Digest,
        DatatypeTag::Long,
        DatatypeTag::Products,
        DatatypeTag::ContentRange,
        DatatypeTag::ContentType,
    ];

    /// The datatype IRI written as `@type` of value objects (empty for
    /// `Default`)
    pub fn iri(self) -> &'static str {
        match self {
            DatatypeTag::Default => dt::DEFAULT,
            DatatypeTag::DateTime => dt::DATE_TIME,
            DatatypeTag::Digest => dt::DIGEST,
            DatatypeTag::Long => dt::LONG,
            DatatypeTag::Products => dt::PRODUCTS,
            DatatypeTag::ContentRange => dt::CONTENT_RANGE,
            DatatypeTag::ContentType => dt::CONTENT_TYPE,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DatatypeTag::Default => "Default",
            DatatypeTag::DateTime => "DateTime",
            DatatypeTag::Digest => "Digest",
            DatatypeTag::Long => "Long",
            DatatypeTag::Products => "Products",
            DatatypeTag::ContentRange => "ContentRange",
            DatatypeTag::ContentType => "ContentType",
        }
    }

    /// Look up a datatype by IRI; the empty IRI is `Default`.
    pub fn from_iri(iri: &str) -> Option<DatatypeTag> {
        DatatypeTag::ALL.into_iter().find(|t| t.iri() == iri)
    }

    pub fn handler(self) -> &'static dyn DatatypeHandler {
        match self {
            DatatypeTag::Default => &DefaultHandler,
            DatatypeTag::DateTime => &DateTimeHandler,
            DatatypeTag::Digest => &DigestHandler,
            DatatypeTag::Long => &LongHandler,
            DatatypeTag::Products => &ProductsHandler,
            DatatypeTag::ContentRange => &ContentRangeHandler,
            DatatypeTag::ContentType => &ContentTypeHandler,
        }
    }
}

impl fmt::Display for DatatypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Conversion between a native value and its `@value` scalar.
pub trait DatatypeHandler: Send + Sync {
    fn tag(&self) -> DatatypeTag;

    /// True if `value` is the native representation of this datatype
    fn is_instance(&self, value: &Value) -> bool;

    /// Produce the `@value` scalar for `value`.
    fn serialize(&self, value: &Value) -> Result<JsonValue>;

    /// Coerce a `@value` scalar; fails with `InvalidInput` when impossible.
    fn deserialize(&self, wire: &JsonValue) -> Result<Value>;
}

fn mismatch(tag: DatatypeTag, value: &Value) -> CodecError {
    CodecError::unsupported_type(format!("{} is not a {} value", value.kind(), tag))
}

fn invalid(tag: DatatypeTag, wire: &JsonValue) -> CodecError {
    let text = match wire {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    };
    CodecError::invalid_input(text, tag.name())
}

struct DefaultHandler;

impl DatatypeHandler for DefaultHandler {
    fn tag(&self) -> DatatypeTag {
        DatatypeTag::Default
    }

    fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::String(_) | Value::Number(_) | Value::Boolean(_))
    }

    fn serialize(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::String(s) => Ok(JsonValue::String(s.clone())),
            Value::Number(n) => Ok(JsonValue::Number(n.clone())),
            Value::Boolean(b) => Ok(JsonValue::Bool(*b)),
            other => Err(mismatch(self.tag(), other)),
        }
    }

    fn deserialize(&self, wire: &JsonValue) -> Result<Value> {
        match wire {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            JsonValue::Number(n) => Ok(Value::Number(n.clone())),
            JsonValue::Bool(b) => Ok(Value::Boolean(*b)),
            other => Err(invalid(self.tag(), other)),
        }
    }
}

struct DateTimeHandler;

impl DatatypeHandler for DateTimeHandler {
    fn tag(&self) -> DatatypeTag {
        DatatypeTag::DateTime
    }

    fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::DateTime(_))
    }

    fn serialize(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::DateTime(dt) => Ok(JsonValue::String(dt.to_rfc3339())),
            other => Err(mismatch(self.tag(), other)),
        }
    }

    fn deserialize(&self, wire: &JsonValue) -> Result<Value> {
        wire.as_str()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(Value::DateTime)
            .ok_or_else(|| invalid(self.tag(), wire))
    }
}

struct LongHandler;

impl DatatypeHandler for LongHandler {
    fn tag(&self) -> DatatypeTag {
        DatatypeTag::Long
    }

    fn is_instance(&self, value: &Value) -> bool {
        matches!(value, Value::Long(_))
    }

    fn serialize(&self, value: &Value) -> Result<JsonValue> {
        match value {
            Value::Long(n) => Ok(JsonValue::from(*n)),
            other => Err(mismatch(self.tag(), other)),
        }
    }

    /// Accepts integral numbers and numeric strings.
    fn deserialize(&self, wire: &JsonValue) -> Result<Value> {
        let parsed = match wire {
            JsonValue::Number(n) => n.as_i64(),
            JsonValue::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed.map(Value::Long).ok_or_else(|| invalid(self.tag(), wire))
    }
}

/// Handlers for datatypes with a textual form
macro_rules! text_handler {
    ($handler:ident, $tag:ident, $native:ty) => {
        struct $handler;

        impl DatatypeHandler for $handler {
            fn tag(&self) -> DatatypeTag {
                DatatypeTag::$tag
            }

            fn is_instance(&self, value: &Value) -> bool {
                matches!(value, Value::$tag(_))
            }

            fn serialize(&self, value: &Value) -> Result<JsonValue> {
                match value {
                    Value::$tag(v) => Ok(JsonValue::String(v.to_string())),
                    other => Err(mismatch(self.tag(), other)),
                }
            }

            fn deserialize(&self, wire: &JsonValue) -> Result<Value> {
                let text = wire.as_str().ok_or_else(|| invalid(self.tag(), wire))?;
                <$native>::from_str(text)
                    .map(Value::$tag)
                    .map_err(|_| invalid(self.tag(), wire))
            }
        }
    };
}

text_handler!(DigestHandler, Digest, Digest);
text_handler!(ProductsHandler, Products, Products);
text_handler!(ContentRangeHandler, ContentRange, ContentRange);
text_handler!(ContentTypeHandler, ContentType, ContentType);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample(tag: DatatypeTag) -> Value {
        match tag {
            DatatypeTag::Default => Value::from("plain"),
            DatatypeTag::DateTime => {
                Value::DateTime(DateTime::parse_from_rfc3339("2016-11-22T16:33:20.123-05:00").unwrap())
            }
            DatatypeTag::Digest => Value::Digest("sha1:2fd4e1c6".parse().unwrap()),
            DatatypeTag::Long => Value::Long(-42),
            DatatypeTag::Products => Value::Products("bdio/2.0 (test) other".parse().unwrap()),
            DatatypeTag::ContentRange => Value::ContentRange("bytes 0-9/10".parse().unwrap()),
            DatatypeTag::ContentType => {
                Value::ContentType("text/plain; charset=utf-8".parse().unwrap())
            }
        }
    }

    #[test]
    fn test_handlers_round_trip() {
        for tag in DatatypeTag::ALL {
            let handler = tag.handler();
            assert_eq!(handler.tag(), tag);
            let value = sample(tag);
            assert!(handler.is_instance(&value), "{} instance", tag);
            let wire = handler.serialize(&value).unwrap();
            assert_eq!(handler.deserialize(&wire).unwrap(), value, "{} round trip", tag);
        }
    }

    #[test]
    fn test_from_iri() {
        for tag in DatatypeTag::ALL {
            assert_eq!(DatatypeTag::from_iri(tag.iri()), Some(tag));
        }
        assert_eq!(DatatypeTag::from_iri("http://example.com/unknown"), None);
    }

    #[test]
    fn test_long_accepts_strings() {
        let handler = DatatypeTag::Long.handler();
        assert_eq!(handler.deserialize(&json!("10")).unwrap(), Value::Long(10));
        assert_eq!(handler.deserialize(&json!(10)).unwrap(), Value::Long(10));
        assert!(matches!(
            handler.deserialize(&json!("ten")),
            Err(CodecError::InvalidInput { .. })
        ));
        assert!(handler.deserialize(&json!(1.5)).is_err());
    }

    #[test]
    fn test_invalid_digest_names_datatype() {
        let err = DatatypeTag::Digest.handler().deserialize(&json!("nocolon")).unwrap_err();
        match err {
            CodecError::InvalidInput { value, datatype } => {
                assert_eq!(value, "nocolon");
                assert_eq!(datatype, "Digest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serialize_rejects_other_kinds() {
        assert!(matches!(
            DatatypeTag::Long.handler().serialize(&Value::from("x")),
            Err(CodecError::UnsupportedType { .. })
        ));
    }
}
