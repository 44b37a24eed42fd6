use thiserror::Error;

/// Result type alias using [`CodecError`]
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors raised while encoding or decoding BDIO documents
#[derive(Error, Debug)]
pub enum CodecError {
    /// The payload does not have the expected structure (e.g. an entry that
    /// is not a JSON array)
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    /// A value cannot be coerced to its declared datatype
    #[error("Invalid {datatype} value: {value}")]
    InvalidInput { value: String, datatype: String },

    /// The document declares a version the registry does not know
    #[error("Unsupported specification version: {version}")]
    UnsupportedSpecVersion { version: String },

    /// No datatype handler accepts the value
    #[error("Unsupported type: {description}")]
    UnsupportedType { description: String },

    /// The string cannot be interned as a vocabulary identifier
    #[error("Invalid identifier: {iri:?}")]
    InvalidIdentifier { iri: String },

    /// Base IRIs must be absolute and hierarchical
    #[error("Invalid base IRI: {base}")]
    InvalidBase { base: String },

    /// An encoded entry is larger than the configured limit
    #[error("Entry {name} exceeds the size limit (estimated {estimated_size} bytes)")]
    EntrySizeViolation { name: String, estimated_size: usize },

    /// `read()` was called on a reader that already failed
    #[error("Reader is in a failed state")]
    ReaderFailed,

    /// A node violates the domain, range or cardinality of one of its
    /// properties
    #[error("Invalid node: {message}")]
    InvalidNode { message: String },

    /// JSON parsing error (serde_json)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A field failure with the node, term and specification version it
    /// occurred in
    #[error("{source} (node: {}, term: {term}, specVersion: {spec_version})", .node.as_deref().unwrap_or("<anonymous>"))]
    Located {
        node: Option<String>,
        term: String,
        spec_version: String,
        #[source]
        source: Box<CodecError>,
    },
}

impl CodecError {
    /// Create a malformed input error
    pub fn malformed(message: impl Into<String>) -> Self {
        CodecError::MalformedInput {
            message: message.into(),
        }
    }

    /// Create an invalid input error for a datatype
    pub fn invalid_input(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        CodecError::InvalidInput {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported_type(description: impl Into<String>) -> Self {
        CodecError::UnsupportedType {
            description: description.into(),
        }
    }

    /// Create an invalid node error
    pub fn invalid_node(message: impl Into<String>) -> Self {
        CodecError::InvalidNode {
            message: message.into(),
        }
    }

    /// Attach the location of a field failure.
    pub fn located(
        self,
        node: Option<&str>,
        term: impl Into<String>,
        spec_version: impl Into<String>,
    ) -> Self {
        match self {
            located @ CodecError::Located { .. } => located,
            other => CodecError::Located {
                node: node.map(str::to_string),
                term: term.into(),
                spec_version: spec_version.into(),
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, with any location wrapper removed.
    pub fn root(&self) -> &CodecError {
        match self {
            CodecError::Located { source, .. } => source.root(),
            other => other,
        }
    }
}
