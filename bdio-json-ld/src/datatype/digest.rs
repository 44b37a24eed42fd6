use crate::error::{CodecError, Result};
use std::fmt;
use std::str::FromStr;

/// A content digest in the form `algorithm:value` (e.g. `sha1:2fd4e1c6...`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest {
    algorithm: String,
    value: String,
}

fn is_algorithm_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')
}

impl Digest {
    /// Create a digest, validating both parts.
    pub fn new(algorithm: impl Into<String>, value: impl Into<String>) -> Result<Self> {
        let algorithm = algorithm.into();
        let value = value.into();
        if algorithm.is_empty() || !algorithm.chars().all(is_algorithm_char) || value.is_empty() {
            return Err(CodecError::invalid_input(
                format!("{}:{}", algorithm, value),
                "Digest",
            ));
        }
        Ok(Self { algorithm, value })
    }

    pub fn algorithm(&self) -> &str {
        &self.algorithm
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for Digest {
    type Err = CodecError;

    /// Splits on the first `:`; the value itself may contain further colons.
    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((algorithm, value)) => Digest::new(algorithm, value)
                .map_err(|_| CodecError::invalid_input(s, "Digest")),
            None => Err(CodecError::invalid_input(s, "Digest")),
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.value)
    }
}
