//! HTTP-style content descriptors: `Content-Range` values locating a span
//! inside a file, and media types.

use crate::error::{CodecError, Result};
use std::fmt;
use std::str::FromStr;

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

fn is_token(s: &str) -> bool {
    !s.is_empty() && s.chars().all(is_token_char)
}

/// A `Content-Range` value (RFC 7233), e.g. `bytes 0-99/1234`,
/// `bytes */1234` or `chars 10-20/*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentRange {
    unit: String,
    range: Option<(u64, u64)>,
    complete_length: Option<u64>,
}

impl ContentRange {
    /// Create a range; at least one of `range` and `complete_length` must be
    /// present.
    pub fn new(unit: &str, range: Option<(u64, u64)>, complete_length: Option<u64>) -> Result<Self> {
        let value = ContentRange {
            unit: unit.to_string(),
            range,
            complete_length,
        };
        let valid_range = match (range, complete_length) {
            (None, None) => false,
            (Some((first, last)), Some(complete)) => first <= last && last < complete,
            (Some((first, last)), None) => first <= last,
            (None, Some(_)) => true,
        };
        if !is_token(unit) || !valid_range {
            return Err(CodecError::invalid_input(value.to_string(), "ContentRange"));
        }
        Ok(value)
    }

    /// A byte range with a known complete length
    pub fn bytes(first: u64, last: u64, complete_length: u64) -> Result<Self> {
        Self::new("bytes", Some((first, last)), Some(complete_length))
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// The inclusive `(first, last)` positions, if satisfiable
    pub fn range(&self) -> Option<(u64, u64)> {
        self.range
    }

    pub fn complete_length(&self) -> Option<u64> {
        self.complete_length
    }
}

impl FromStr for ContentRange {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CodecError::invalid_input(s, "ContentRange");
        let (unit, spec) = s.split_once(' ').ok_or_else(invalid)?;
        let (range, complete) = spec.split_once('/').ok_or_else(invalid)?;

        let range = match range {
            "*" => None,
            r => {
                let (first, last) = r.split_once('-').ok_or_else(invalid)?;
                let first = first.parse::<u64>().map_err(|_| invalid())?;
                let last = last.parse::<u64>().map_err(|_| invalid())?;
                Some((first, last))
            }
        };
        let complete = match complete {
            "*" => None,
            c => Some(c.parse::<u64>().map_err(|_| invalid())?),
        };
        ContentRange::new(unit, range, complete).map_err(|_| invalid())
    }
}

impl fmt::Display for ContentRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.unit)?;
        match self.range {
            Some((first, last)) => write!(f, "{}-{}", first, last)?,
            None => f.write_str("*")?,
        }
        match self.complete_length {
            Some(length) => write!(f, "/{}", length),
            None => f.write_str("/*"),
        }
    }
}

/// A media type with optional parameters, e.g. `text/plain; charset=utf-8`.
///
/// Type, subtype and parameter names are case-insensitive and stored in
/// lower case; parameter values are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentType {
    type_: String,
    subtype: String,
    parameters: Vec<(String, String)>,
}

impl ContentType {
    pub fn new(type_: &str, subtype: &str) -> Result<Self> {
        if !is_token(type_) || !is_token(subtype) {
            return Err(CodecError::invalid_input(
                format!("{}/{}", type_, subtype),
                "ContentType",
            ));
        }
        Ok(ContentType {
            type_: type_.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: Vec::new(),
        })
    }

    /// Add or replace a parameter.
    pub fn with_parameter(mut self, name: &str, value: &str) -> Result<Self> {
        if !is_token(name) || value.chars().any(|c| c.is_control() && c != '\t') {
            return Err(CodecError::invalid_input(
                format!("{}={}", name, value),
                "ContentType",
            ));
        }
        let name = name.to_ascii_lowercase();
        self.parameters.retain(|(n, _)| *n != name);
        self.parameters.push((name, value.to_string()));
        Ok(self)
    }

    pub fn type_(&self) -> &str {
        &self.type_
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// The media type without parameters
    pub fn essence(&self) -> String {
        format!("{}/{}", self.type_, self.subtype)
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.parameters
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn parameters(&self) -> &[(String, String)] {
        &self.parameters
    }

    /// True if the essence equals `media_type` (ignoring case)
    pub fn is(&self, media_type: &str) -> bool {
        self.essence().eq_ignore_ascii_case(media_type)
    }
}

/// Parse a parameter value: a token or a quoted string.
fn parameter_value(raw: &str) -> Option<String> {
    if let Some(inner) = raw.strip_prefix('"') {
        let inner = inner.strip_suffix('"')?;
        let mut value = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => value.push(chars.next()?),
                '"' => return None,
                c => value.push(c),
            }
        }
        Some(value)
    } else {
        is_token(raw).then(|| raw.to_string())
    }
}

impl FromStr for ContentType {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CodecError::invalid_input(s, "ContentType");
        let mut segments = s.split(';');
        let essence = segments.next().unwrap_or_default().trim();
        let (type_, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        let mut content_type = ContentType::new(type_, subtype).map_err(|_| invalid())?;
        for segment in segments {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            let (name, raw) = segment.split_once('=').ok_or_else(invalid)?;
            let value = parameter_value(raw.trim()).ok_or_else(invalid)?;
            content_type = content_type
                .with_parameter(name.trim(), &value)
                .map_err(|_| invalid())?;
        }
        Ok(content_type)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.type_, self.subtype)?;
        for (name, value) in &self.parameters {
            if is_token(value) {
                write!(f, "; {}={}", name, value)?;
            } else {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {}=\"{}\"", name, escaped)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_range_forms() {
        let r: ContentRange = "bytes 0-99/1234".parse().unwrap();
        assert_eq!(r.unit(), "bytes");
        assert_eq!(r.range(), Some((0, 99)));
        assert_eq!(r.complete_length(), Some(1234));

        let r: ContentRange = "bytes */1234".parse().unwrap();
        assert_eq!(r.range(), None);

        let r: ContentRange = "chars 10-20/*".parse().unwrap();
        assert_eq!(r.complete_length(), None);
        assert_eq!(r.to_string(), "chars 10-20/*");

        assert_eq!(ContentRange::bytes(0, 9, 10).unwrap().to_string(), "bytes 0-9/10");
    }

    #[test]
    fn test_content_range_rejects() {
        for input in ["bytes", "bytes 0-99", "bytes */*", "bytes 9-1/10", "bytes 0-10/10", "by tes 0-1/2", "bytes a-b/c"] {
            assert!(input.parse::<ContentRange>().is_err(), "{:?} should fail", input);
        }
    }

    #[test]
    fn test_content_type_parse() {
        let ct: ContentType = "Text/Plain; charset=UTF-8".parse().unwrap();
        assert_eq!(ct.essence(), "text/plain");
        assert_eq!(ct.parameter("CHARSET"), Some("UTF-8"));
        assert!(ct.is("text/plain"));
        assert_eq!(ct.to_string(), "text/plain; charset=UTF-8");

        let ct: ContentType = r#"application/x-thing; note="a \"b\" c""#.parse().unwrap();
        assert_eq!(ct.parameter("note"), Some(r#"a "b" c"#));
        assert_eq!(ct.to_string().parse::<ContentType>().unwrap(), ct);

        let bdio: ContentType = bdio_vocab::media_type::BDIO_ZIP.parse().unwrap();
        assert_eq!(bdio.subtype(), "vnd.blackducksoftware.bdio+zip");
    }

    #[test]
    fn test_content_type_rejects() {
        for input in ["", "text", "text/", "/plain", "text/plain; charset", "te xt/plain"] {
            assert!(input.parse::<ContentType>().is_err(), "{:?} should fail", input);
        }
    }
}
