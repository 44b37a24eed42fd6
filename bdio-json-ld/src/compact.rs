//! Compaction: full IRIs back to short names, expanded node maps back to
//! their compact wire form.

use crate::context::Context;
use crate::error::Result;
use crate::keyword::Keyword;
use crate::spec::TermDefinition;
use crate::vocabulary::TermKind;
use serde_json::{Map, Value as JsonValue};
use std::collections::HashMap;

/// A precomputed lookup table for IRI compaction.
///
/// Prefix IRIs are sorted longest-first so the most specific prefix always
/// wins (`http://x.com/ab` before `http://x.com/a`); prefixes of equal
/// length keep their registration order.
#[derive(Debug, Clone, Default)]
pub struct ContextCompactor {
    /// Full IRI → short name; the first registered name wins
    exact: HashMap<String, String>,
    /// (prefix IRI, prefix name), longest IRI first
    prefixes: Vec<(String, String)>,
    vocab: Option<String>,
}

impl ContextCompactor {
    /// Build a compactor from term definitions, declared prefixes and the
    /// default vocabulary.
    pub fn new<'a>(
        definitions: impl IntoIterator<Item = (&'a str, &'a TermDefinition)>,
        prefixes: impl IntoIterator<Item = (&'a str, &'a str)>,
        vocab: Option<&str>,
    ) -> Self {
        let mut exact = HashMap::new();
        for (name, definition) in definitions {
            exact
                .entry(definition.term.to_string())
                .or_insert_with(|| name.to_string());
        }

        let mut prefixes: Vec<(String, String)> = prefixes
            .into_iter()
            .map(|(name, iri)| (iri.to_string(), name.to_string()))
            .collect();
        // stable: equal lengths keep registration order
        prefixes.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            exact,
            prefixes,
            vocab: vocab.map(str::to_string),
        }
    }

    /// Compact an IRI: exact match, then longest prefix, then the default
    /// vocabulary; anything else is returned unchanged.
    pub fn compact(&self, iri: &str) -> String {
        // 1. Exact match
        if let Some(name) = self.exact.get(iri) {
            return name.clone();
        }

        // 2. Longest-prefix match
        for (prefix_iri, prefix_name) in &self.prefixes {
            if let Some(suffix) = iri.strip_prefix(prefix_iri.as_str()) {
                if !suffix.is_empty() {
                    return format!("{}:{}", prefix_name, suffix);
                }
            }
        }

        // 3. Vocabulary
        if let Some(suffix) = self
            .vocab
            .as_deref()
            .and_then(|vocab| iri.strip_prefix(vocab))
        {
            if !suffix.is_empty() {
                return suffix.to_string();
            }
        }

        // 4. No match
        iri.to_string()
    }
}

// ---------------------------------------------------------------------------
// Node compaction
// ---------------------------------------------------------------------------

/// Compact an expanded node map.
pub(crate) fn node(context: &Context, expanded: &Map<String, JsonValue>) -> Result<JsonValue> {
    let mut out = Map::new();
    for (key, value) in expanded {
        match key.as_str() {
            "@id" => {
                out.insert(key.clone(), value.clone());
            }
            "@type" => {
                let types: Vec<JsonValue> = as_items(value)
                    .iter()
                    .filter_map(JsonValue::as_str)
                    .map(|t| JsonValue::String(context.compact_iri(t)))
                    .collect();
                if let Some(types) = collapse(types) {
                    out.insert(key.clone(), types);
                }
            }
            k if Keyword::is_keyword_like(k) => {
                out.insert(key.clone(), value.clone());
            }
            iri => {
                let definition = context.term_definition(iri)?;
                if let Some(compacted) = self::value(context, &definition, value)? {
                    out.insert(context.compact_iri(iri), compacted);
                }
            }
        }
    }
    Ok(JsonValue::Object(out))
}

/// Compact the expanded value of one term; `None` when nothing remains.
fn value(
    context: &Context,
    definition: &TermDefinition,
    expanded: &JsonValue,
) -> Result<Option<JsonValue>> {
    let items = as_items(expanded)
        .iter()
        .filter(|item| !item.is_null())
        .map(|item| element(context, definition, item))
        .collect::<Result<Vec<_>>>()?;
    Ok(collapse(items))
}

fn element(
    context: &Context,
    definition: &TermDefinition,
    item: &JsonValue,
) -> Result<JsonValue> {
    let JsonValue::Object(map) = item else {
        return Ok(item.clone());
    };

    if let Some(value) = map.get("@value") {
        return Ok(match map.get("@type").and_then(JsonValue::as_str) {
            None => value.clone(),
            Some(t) if t == definition.datatype.iri() => value.clone(),
            Some(t) => {
                let mut typed = map.clone();
                typed.insert("@type".to_string(), JsonValue::String(context.compact_iri(t)));
                JsonValue::Object(typed)
            }
        });
    }

    if map.len() == 1 {
        if let Some(JsonValue::String(id)) = map.get("@id") {
            return Ok(match definition.kind {
                TermKind::Object => JsonValue::String(id.clone()),
                TermKind::Vocab => JsonValue::String(context.compact_iri(id)),
                _ => item.clone(),
            });
        }
    }

    node(context, map)
}

/// The elements of an expanded value: arrays and `@list` objects are
/// unwrapped, anything else is a single element.
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

/// Empty collections are omitted and singletons become the bare value.
fn collapse(mut items: Vec<JsonValue>) -> Option<JsonValue> {
    match items.len() {
        0 => None,
        1 => items.pop(),
        _ => Some(JsonValue::Array(items)),
    }
}
