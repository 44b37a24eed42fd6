//! Versioned specification registry.
//!
//! Every known BDIO version gets a [`Specification`] built once from the
//! vocabulary table: the term definitions as that version names them, the
//! import view that reads the version's documents with current identifiers,
//! the default vocabulary and the version's import frame.

use crate::datatype::DatatypeTag;
use crate::error::{CodecError, Result};
use crate::ident::{Identifier, Registry, Type};
use crate::keyword::Keyword;
use crate::vocabulary::{Row, TermKind, ROWS};
use bdio_vocab::{ns, spec_version};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{json, Map, Value as JsonValue};
use std::cmp::Ordering;
use std::fmt;

/// Shape of the values of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Container {
    /// At most one value; a singleton compacts to the bare value
    Single,
    /// Ordered, duplicates preserved
    List,
    /// Unordered
    Set,
    /// Decided by the number of values at runtime
    #[default]
    Unknown,
}

impl Container {
    /// The `@container` keyword declared for this shape, if any.
    pub fn keyword(self) -> Option<Keyword> {
        match self {
            Container::List => Some(Keyword::List),
            Container::Set => Some(Keyword::Set),
            Container::Single | Container::Unknown => None,
        }
    }
}

/// The meaning of one short name in one specification version.
#[derive(Debug, Clone, PartialEq)]
pub struct TermDefinition {
    /// Full IRI the short name expands to
    pub term: Identifier,
    pub kind: TermKind,
    /// Types a value of this term may have (the range of object terms)
    pub declared_types: Vec<Type>,
    /// Types of nodes that may carry this term; empty means any
    pub domain: Vec<Type>,
    pub container: Container,
    pub datatype: DatatypeTag,
}

impl TermDefinition {
    /// The definition assumed for a term the context does not know.
    pub fn default_for(term: Identifier) -> Self {
        Self {
            term,
            kind: TermKind::Data(DatatypeTag::Default),
            declared_types: Vec::new(),
            domain: Vec::new(),
            container: Container::Unknown,
            datatype: DatatypeTag::Default,
        }
    }

    /// True if values of this term are node identifiers rather than
    /// literals (`"@type": "@id"` or `"@type": "@vocab"`).
    pub fn is_identifier(&self) -> bool {
        matches!(self.kind, TermKind::Object | TermKind::Vocab)
    }

    pub fn is_class(&self) -> bool {
        matches!(self.kind, TermKind::Class { .. })
    }

    /// Classes whose nodes are written inside their referrer
    pub fn is_embedded_class(&self) -> bool {
        matches!(self.kind, TermKind::Class { embedded: true })
    }

    /// Serialize as a JSON-LD term definition.
    ///
    /// Returns the bare IRI when nothing but `@id` would be written.
    pub fn to_json(&self) -> JsonValue {
        let type_ = match self.kind {
            TermKind::Object => Some(Keyword::Id.as_str()),
            TermKind::Vocab => Some(Keyword::Vocab.as_str()),
            TermKind::Data(tag) if tag != DatatypeTag::Default => Some(tag.iri()),
            _ => None,
        };
        let container = self.container.keyword();
        if type_.is_none() && container.is_none() {
            return JsonValue::String(self.term.to_string());
        }

        let mut obj = Map::new();
        obj.insert("@id".to_string(), JsonValue::String(self.term.to_string()));
        if let Some(t) = type_ {
            obj.insert("@type".to_string(), JsonValue::String(t.to_string()));
        }
        if let Some(c) = container {
            obj.insert("@container".to_string(), JsonValue::String(c.to_string()));
        }
        JsonValue::Object(obj)
    }
}

/// One format revision.
#[derive(Debug)]
pub struct Specification {
    version: &'static str,
    ordinal: usize,
    vocab: &'static str,
    definitions: IndexMap<String, TermDefinition>,
    imports: IndexMap<String, TermDefinition>,
    prefixes: Vec<(&'static str, &'static str)>,
    import_frame: JsonValue,
}

/// Known versions, oldest first
const VERSIONS: [&str; 4] = [
    spec_version::V1_0_0,
    spec_version::V1_1_0,
    spec_version::V1_1_1,
    spec_version::V2_0_0,
];

static SPECIFICATIONS: Lazy<Vec<Specification>> = Lazy::new(|| {
    VERSIONS
        .iter()
        .enumerate()
        .map(|(ordinal, version)| Specification::build(version, ordinal))
        .collect()
});

impl Specification {
    /// Look up a specification by version.
    ///
    /// `None` and the empty string are the baseline: documents written
    /// before versioning existed declare nothing, or `""`.
    pub fn for_version(version: Option<&str>) -> Result<&'static Specification> {
        match version {
            None | Some("") => Ok(Self::baseline()),
            Some(v) => SPECIFICATIONS
                .iter()
                .find(|spec| spec.version == v)
                .ok_or_else(|| CodecError::UnsupportedSpecVersion {
                    version: v.to_string(),
                }),
        }
    }

    pub fn latest() -> &'static Specification {
        &SPECIFICATIONS[SPECIFICATIONS.len() - 1]
    }

    /// The initial format revision, assumed when a document declares no
    /// version.
    pub fn baseline() -> &'static Specification {
        &SPECIFICATIONS[0]
    }

    /// All specifications, oldest first.
    pub fn all() -> &'static [Specification] {
        &SPECIFICATIONS
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    /// Default vocabulary IRI of this version
    pub fn vocab(&self) -> &'static str {
        self.vocab
    }

    pub fn is_latest(&self) -> bool {
        self.ordinal == VERSIONS.len() - 1
    }

    /// Short names and definitions exactly as this version writes them.
    pub fn as_term_definitions(&self) -> &IndexMap<String, TermDefinition> {
        &self.definitions
    }

    /// Definitions used to read documents of this version with current
    /// identifiers.
    ///
    /// Keys are this version's short names plus, for every term whose full
    /// IRI has changed since, the old IRI; values carry the current IRI.
    pub fn import_definitions(&self) -> &IndexMap<String, TermDefinition> {
        &self.imports
    }

    /// Namespace prefixes declared by this version.
    pub fn prefixes(&self) -> &[(&'static str, &'static str)] {
        &self.prefixes
    }

    /// JSON-LD frame for documents of this version: its context plus the
    /// top-level (non-embedded) node types.
    pub fn import_frame(&self) -> &JsonValue {
        &self.import_frame
    }

    /// The JSON-LD `@context` of this version.
    pub fn context_json(&self) -> JsonValue {
        let mut ctx = Map::new();
        ctx.insert(
            Keyword::Vocab.as_str().to_string(),
            JsonValue::String(self.vocab.to_string()),
        );
        for (prefix, iri) in &self.prefixes {
            ctx.insert(prefix.to_string(), JsonValue::String(iri.to_string()));
        }
        for (name, definition) in &self.definitions {
            ctx.insert(name.clone(), definition.to_json());
        }
        JsonValue::Object(ctx)
    }

    fn build(version: &'static str, ordinal: usize) -> Specification {
        let vocab = if ordinal < VERSIONS.len() - 1 {
            ns::LEGACY
        } else {
            ns::BDIO
        };
        let registry = Registry::global();

        let mut definitions = IndexMap::new();
        let mut imports = IndexMap::new();
        let mut renamed_iris = Vec::new();
        for row in ROWS.iter().filter(|row| introduced(row, ordinal)) {
            let (name, local) = match row.legacy {
                Some(legacy) if ordinal < version_ordinal(legacy.until) => (legacy.name, legacy.name),
                _ => (row.name, ns::bdio_local(row.iri).unwrap_or(row.name)),
            };
            let versioned_iri = format!("{}{}", vocab, local);

            let versioned = definition(
                registry.intern_unchecked(&versioned_iri),
                row,
                |class| translate(class, vocab),
            );
            let current = definition(registry.intern_unchecked(row.iri), row, str::to_string);

            if versioned_iri != row.iri {
                renamed_iris.push((versioned_iri, current.clone()));
            }
            definitions.insert(name.to_string(), versioned);
            imports.insert(name.to_string(), current);
        }
        for (iri, current) in renamed_iris {
            imports.entry(iri).or_insert(current);
        }

        let mut prefixes = vec![("xsd", ns::XSD), ("rdfs", ns::RDFS)];
        if ordinal < VERSIONS.len() - 1 {
            prefixes.extend([("spdx", ns::SPDX), ("doap", ns::DOAP)]);
        }

        let mut spec = Specification {
            version,
            ordinal,
            vocab,
            definitions,
            imports,
            prefixes,
            import_frame: JsonValue::Null,
        };
        let top_level: Vec<JsonValue> = spec
            .imports
            .values()
            .filter(|d| d.is_class() && !d.is_embedded_class())
            .map(|d| JsonValue::String(d.term.to_string()))
            .collect();
        spec.import_frame = json!({
            "@context": spec.context_json(),
            "@type": top_level,
        });
        spec
    }
}

fn version_ordinal(version: &str) -> usize {
    VERSIONS
        .iter()
        .position(|v| *v == version)
        .unwrap_or(VERSIONS.len())
}

fn introduced(row: &Row, ordinal: usize) -> bool {
    version_ordinal(row.since) <= ordinal
}

/// Move a current-namespace IRI into `vocab`.
fn translate(iri: &str, vocab: &str) -> String {
    match ns::bdio_local(iri) {
        Some(local) if vocab != ns::BDIO => format!("{}{}", vocab, local),
        _ => iri.to_string(),
    }
}

fn definition(term: Identifier, row: &Row, class_iri: impl Fn(&str) -> String) -> TermDefinition {
    let types = |iris: &[&str]| -> Vec<Type> {
        iris.iter()
            .map(|iri| Type::from(Registry::global().intern_unchecked(&class_iri(iri))))
            .collect()
    };
    TermDefinition {
        term,
        kind: row.kind,
        declared_types: types(row.range),
        domain: types(row.domain),
        container: row.container,
        datatype: match row.kind {
            TermKind::Data(tag) => tag,
            _ => DatatypeTag::Default,
        },
    }
}

impl PartialEq for Specification {
    fn eq(&self, other: &Self) -> bool {
        self.ordinal == other.ordinal
    }
}

impl Eq for Specification {}

impl PartialOrd for Specification {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Specification {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordinal.cmp(&other.ordinal)
    }
}

impl fmt::Display for Specification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdio_vocab::{class, data_property as dp, individual};

    #[test]
    fn test_for_version() {
        assert_eq!(Specification::for_version(None).unwrap().version(), "1.0.0");
        assert_eq!(Specification::for_version(Some("")).unwrap().version(), "1.0.0");
        assert_eq!(Specification::for_version(Some("1.1.1")).unwrap().version(), "1.1.1");
        assert_eq!(Specification::latest().version(), "2.0.0");
        assert!(Specification::latest().is_latest());
        assert!(matches!(
            Specification::for_version(Some("3.0.0")),
            Err(CodecError::UnsupportedSpecVersion { version }) if version == "3.0.0"
        ));
    }

    #[test]
    fn test_total_order() {
        let all = Specification::all();
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Specification::baseline(), &all[0]);
    }

    #[test]
    fn test_latest_definitions_use_current_namespace() {
        let defs = Specification::latest().as_term_definitions();
        assert_eq!(defs["path"].term.as_str(), dp::PATH);
        assert_eq!(defs["size"].datatype, DatatypeTag::Long);
        assert_eq!(defs["fingerprint"].container, Container::Set);
        assert_eq!(defs["layer"].container, Container::List);
        assert!(defs["dependency"].is_identifier());
        assert_eq!(defs["dependency"].declared_types[0].as_str(), class::DEPENDENCY);
        assert!(defs["Annotation"].is_embedded_class());
        assert!(!defs.contains_key("checksum"));
    }

    #[test]
    fn test_baseline_uses_legacy_names() {
        let spec = Specification::baseline();
        let defs = spec.as_term_definitions();
        assert_eq!(spec.vocab(), ns::LEGACY);
        assert_eq!(
            defs["checksum"].term.as_str(),
            "http://blackducksoftware.com/rdf/terms#checksum"
        );
        assert!(!defs.contains_key("fingerprint"));
        assert!(!defs.contains_key("Dependency"));
        assert!(defs.contains_key("externalIdentifier_bd-suite"));
        assert_eq!(
            defs["path"].domain[0].as_str(),
            "http://blackducksoftware.com/rdf/terms#File"
        );
    }

    #[test]
    fn test_import_definitions_map_to_current_iris() {
        let imports = Specification::baseline().import_definitions();
        assert_eq!(imports["checksum"].term.as_str(), dp::FINGERPRINT);
        assert_eq!(imports["created"].term.as_str(), dp::CREATION_DATE_TIME);
        assert_eq!(imports["File"].term.as_str(), class::FILE);
        assert_eq!(
            imports["externalIdentifier_bd-hub"].term.as_str(),
            individual::BDHUB
        );
        // old full IRIs resolve too
        assert_eq!(
            imports["http://blackducksoftware.com/rdf/terms#checksum"].term.as_str(),
            dp::FINGERPRINT
        );

        let v110 = Specification::for_version(Some("1.1.0")).unwrap();
        assert!(v110.import_definitions().contains_key("externalIdentifier_bdhub"));
        assert!(v110.import_definitions().contains_key("checksum"));
    }

    #[test]
    fn test_term_definition_json() {
        let defs = Specification::latest().as_term_definitions();
        assert_eq!(defs["path"].to_json(), json!(dp::PATH));
        assert_eq!(
            defs["size"].to_json(),
            json!({"@id": dp::SIZE, "@type": bdio_vocab::datatype::LONG})
        );
        assert_eq!(
            defs["layer"].to_json(),
            json!({"@id": bdio_vocab::object_property::LAYER, "@type": "@id", "@container": "@list"})
        );
        assert_eq!(
            defs["externalSystemTypeId"].to_json(),
            json!({"@id": dp::EXTERNAL_SYSTEM_TYPE_ID, "@type": "@vocab"})
        );
    }

    #[test]
    fn test_import_frame() {
        let frame = Specification::latest().import_frame();
        assert_eq!(frame["@context"]["@vocab"], json!(ns::BDIO));
        let types = frame["@type"].as_array().unwrap();
        assert!(types.contains(&json!(class::FILE)));
        assert!(!types.contains(&json!(class::ANNOTATION)));

        let legacy = Specification::baseline().import_frame();
        assert_eq!(legacy["@context"]["spdx"], json!(ns::SPDX));
    }
}
