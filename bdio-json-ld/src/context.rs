use crate::compact::{self, ContextCompactor};
use crate::datatype::{MultiValuePolicy, ValueObjectMapper};
use crate::error::{CodecError, Result};
use crate::expand;
use crate::ident::Registry;
use crate::iri;
use crate::keyword::Keyword;
use crate::node::Node;
use crate::options::BdioOptions;
use crate::spec::{Specification, TermDefinition};
use indexmap::IndexMap;
use serde_json::{Map, Value as JsonValue};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

/// The active term mapping of one document session.
///
/// A context is an immutable snapshot: [`migrate`](Context::migrate) returns
/// a new context and leaves this one untouched. Clones share the definition
/// tables.
#[derive(Debug, Clone)]
pub struct Context {
    base: Option<String>,
    vocab: Option<String>,
    spec: &'static Specification,
    tables: Arc<Tables>,
    mapper: ValueObjectMapper,
}

#[derive(Debug)]
struct Tables {
    /// Short name (or old full IRI) → definition
    definitions: IndexMap<String, TermDefinition>,
    /// Prefix name → namespace IRI
    prefixes: IndexMap<String, String>,
    /// Term IRI → index of its first definition
    by_term: HashMap<String, usize>,
    compactor: ContextCompactor,
}

impl Context {
    pub fn builder() -> ContextBuilder {
        ContextBuilder::default()
    }

    /// Context used before a document declares its version: the configured
    /// version, else the baseline.
    pub fn for_reading(options: &BdioOptions) -> Result<Context> {
        ContextBuilder::default()
            .base_opt(options.base.clone())
            .spec_version(
                options
                    .spec_version
                    .as_deref()
                    .unwrap_or(Specification::baseline().version()),
            )
            .build()
    }

    /// Context used by encoders: the configured version, else the latest.
    pub fn for_writing(options: &BdioOptions) -> Result<Context> {
        ContextBuilder::default()
            .base_opt(options.base.clone())
            .spec_version(
                options
                    .spec_version
                    .as_deref()
                    .unwrap_or(Specification::latest().version()),
            )
            .build()
    }

    /// A new context reading documents of `version`, keeping this context's
    /// base IRI and multi-value policy.
    pub fn migrate(&self, version: Option<&str>) -> Result<Context> {
        let spec = Specification::for_version(version)?;
        tracing::debug!(from = self.spec.version(), to = spec.version(), "migrating context");
        ContextBuilder::default()
            .base_opt(self.base.clone())
            .spec_version(spec.version())
            .multi_value_policy(self.mapper.policy())
            .build()
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn vocab(&self) -> Option<&str> {
        self.vocab.as_deref()
    }

    pub fn spec_version(&self) -> &'static str {
        self.spec.version()
    }

    pub fn specification(&self) -> &'static Specification {
        self.spec
    }

    pub fn mapper(&self) -> &ValueObjectMapper {
        &self.mapper
    }

    /// Definition of a short name.
    pub fn definition(&self, name: &str) -> Option<&TermDefinition> {
        self.tables.definitions.get(name)
    }

    /// Definition of a full term IRI.
    pub fn definition_for(&self, iri: &str) -> Option<&TermDefinition> {
        self.tables
            .by_term
            .get(iri)
            .and_then(|&i| self.tables.definitions.get_index(i))
            .map(|(_, definition)| definition)
    }

    /// Definition of a full term IRI, synthesizing the default definition
    /// for terms this context does not know.
    pub(crate) fn term_definition(&self, iri: &str) -> Result<Cow<'_, TermDefinition>> {
        match self.definition_for(iri) {
            Some(definition) => Ok(Cow::Borrowed(definition)),
            None => Ok(Cow::Owned(TermDefinition::default_for(
                Registry::global().intern(iri)?,
            ))),
        }
    }

    /// Expand a short name, compact IRI or relative reference.
    ///
    /// Keywords pass through. Short names and `prefix:suffix` forms are
    /// substituted from the definitions and prefixes. Otherwise, relative
    /// references (`relative = true`) resolve against the base and
    /// vocabulary-relative ones (`relative = false`) get the default
    /// vocabulary prepended, unless they already contain a `:`.
    ///
    /// A relative reference is never joined to the vocabulary, even with
    /// no base set; it is returned unchanged. This departs from a literal
    /// reading of the resolution steps and follows JSON-LD `@id` handling.
    pub fn expand_iri(&self, value: &str, relative: bool) -> String {
        if Keyword::is_keyword_like(value) {
            return value.to_string();
        }
        if let Some(definition) = self.tables.definitions.get(value) {
            return definition.term.to_string();
        }
        if let Some((prefix, suffix)) = iri::parse_prefix(value) {
            if let Some(ns) = self.tables.prefixes.get(prefix) {
                return format!("{}{}", ns, suffix);
            }
            if let Some(definition) = self.tables.definitions.get(prefix) {
                return format!("{}{}", definition.term, suffix);
            }
        }
        if relative {
            if let Some(base) = &self.base {
                return iri::resolve(base, value);
            }
        } else if let Some(vocab) = &self.vocab {
            if !iri::any_iri(value) {
                return format!("{}{}", vocab, value);
            }
        }
        value.to_string()
    }

    /// Compact a full IRI to the shortest form this context can expand back.
    pub fn compact_iri(&self, value: &str) -> String {
        self.tables.compactor.compact(value)
    }

    /// Expand a node to its wire map with full IRIs as keys.
    pub fn expand(&self, node: &Node) -> Result<JsonValue> {
        expand::node(self, node)
    }

    /// Compact an expanded node map using this context's short names.
    pub fn compact(&self, expanded: &JsonValue) -> Result<JsonValue> {
        match expanded {
            JsonValue::Object(map) => compact::node(self, map),
            other => Err(CodecError::malformed(format!(
                "expected a node object, found {}",
                other
            ))),
        }
    }

    /// Decode a wire map (compact or expanded) into a node.
    pub fn expand_to_node(&self, wire: &JsonValue) -> Result<Node> {
        expand::to_node(self, wire)
    }

    /// Serialize this context as a JSON-LD `@context` value.
    ///
    /// Entries keyed by an old full IRI are omitted.
    pub fn to_json(&self) -> JsonValue {
        let mut ctx = Map::new();
        if let Some(base) = &self.base {
            ctx.insert("@base".to_string(), JsonValue::String(base.clone()));
        }
        if let Some(vocab) = &self.vocab {
            ctx.insert("@vocab".to_string(), JsonValue::String(vocab.clone()));
        }
        for (name, ns) in &self.tables.prefixes {
            ctx.insert(name.clone(), JsonValue::String(ns.clone()));
        }
        for (name, definition) in &self.tables.definitions {
            if iri::is_absolute(name) {
                continue;
            }
            ctx.insert(name.clone(), definition.to_json());
        }
        JsonValue::Object(ctx)
    }
}

/// Builder for [`Context`].
///
/// Starts from the import definitions of the requested specification
/// (latest by default); extra prefixes and definitions are layered on top.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    base: Option<String>,
    vocab: Option<Option<String>>,
    spec_version: Option<String>,
    prefixes: Vec<(String, String)>,
    definitions: Vec<(String, TermDefinition)>,
    policy: MultiValuePolicy,
}

impl ContextBuilder {
    /// Base IRI for relative identifiers; must be absolute and hierarchical.
    pub fn base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn base_opt(mut self, base: Option<String>) -> Self {
        self.base = base;
        self
    }

    /// Override the specification's default vocabulary (`None` clears it).
    pub fn vocab(mut self, vocab: Option<String>) -> Self {
        self.vocab = Some(vocab);
        self
    }

    pub fn spec_version(mut self, version: impl Into<String>) -> Self {
        self.spec_version = Some(version.into());
        self
    }

    /// Declare a namespace prefix.
    pub fn prefix(mut self, name: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.push((name.into(), iri.into()));
        self
    }

    /// Add (or replace) a term definition.
    pub fn define(mut self, name: impl Into<String>, definition: TermDefinition) -> Self {
        self.definitions.push((name.into(), definition));
        self
    }

    pub fn multi_value_policy(mut self, policy: MultiValuePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> Result<Context> {
        let spec = match self.spec_version.as_deref() {
            Some(version) => Specification::for_version(Some(version))?,
            None => Specification::latest(),
        };

        if let Some(base) = &self.base {
            if !iri::is_absolute(base) || !iri::is_hierarchical(base) {
                return Err(CodecError::InvalidBase { base: base.clone() });
            }
        }

        let mut definitions = spec.import_definitions().clone();
        definitions.extend(self.definitions);

        let mut prefixes: IndexMap<String, String> = spec
            .prefixes()
            .iter()
            .map(|(name, ns)| (name.to_string(), ns.to_string()))
            .collect();
        prefixes.extend(self.prefixes);

        let vocab = match self.vocab {
            Some(vocab) => vocab,
            None => Some(spec.vocab().to_string()),
        };

        let mut by_term = HashMap::new();
        for (i, definition) in definitions.values().enumerate() {
            by_term.entry(definition.term.to_string()).or_insert(i);
        }

        let compactor = ContextCompactor::new(
            definitions.iter().map(|(k, v)| (k.as_str(), v)),
            prefixes.iter().map(|(k, v)| (k.as_str(), v.as_str())),
            vocab.as_deref(),
        );

        Ok(Context {
            base: self.base,
            vocab,
            spec,
            tables: Arc::new(Tables {
                definitions,
                prefixes,
                by_term,
                compactor,
            }),
            mapper: ValueObjectMapper::with_policy(self.policy),
        })
    }
}
