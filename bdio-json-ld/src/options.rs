//! Encoder and decoder configuration.

use crate::error::Result;
use bdio_vocab::entry;
use serde::{Deserialize, Serialize};

/// Options shared by [`BdioWriter`](crate::archive::BdioWriter) and
/// [`BdioReader`](crate::reader::BdioReader).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BdioOptions {
    /// Upper bound on the estimated size of one data entry.
    /// Default: 16 MiB
    pub max_entry_weight: usize,

    /// Base IRI for relative node identifiers; must be absolute and
    /// hierarchical.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Version written by encoders (default: latest) or assumed by readers
    /// until a metadata node declares one (default: baseline).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spec_version: Option<String>,

    /// Fail with `EntrySizeViolation` instead of warning when an encoded
    /// entry is larger than `max_entry_weight`.
    pub strict_entry_size: bool,

    /// Pretty-print entry JSON.
    pub pretty: bool,
}

impl Default for BdioOptions {
    fn default() -> Self {
        Self {
            max_entry_weight: entry::MAX_ENTRY_SIZE,
            base: None,
            spec_version: None,
            strict_entry_size: false,
            pretty: false,
        }
    }
}

impl BdioOptions {
    /// Parse options from a JSON document; missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_max_entry_weight(mut self, max_entry_weight: usize) -> Self {
        self.max_entry_weight = max_entry_weight;
        self
    }

    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn with_spec_version(mut self, version: impl Into<String>) -> Self {
        self.spec_version = Some(version.into());
        self
    }

    pub fn with_strict_entry_size(mut self, strict: bool) -> Self {
        self.strict_entry_size = strict;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
