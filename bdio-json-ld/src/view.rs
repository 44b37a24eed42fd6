//! Typed builders for nodes of the built-in classes.
//!
//! Each builder starts a node of one class and exposes a setter per
//! property of that class. Nothing is checked until `build()`, which
//! validates the node against the domains, ranges and datatypes of the
//! latest vocabulary.

use crate::error::{CodecError, Result};
use crate::node::{Node, NodeBuilder};
use crate::spec::{Container, Specification};
use crate::value::Value;
use crate::vocabulary::{row_for_iri, TermKind};
use bdio_vocab::{class, data_property as dp, object_property as op};

/// Check every property of `node` (and of its embedded nodes).
///
/// - the node must have one of the types in the property's domain
/// - single-valued properties carry at most one value
/// - data values must be instances of the property's datatype
/// - object values must be references, or nodes whose types overlap the
///   property's range (untyped embedded nodes take the range on expansion)
///
/// Properties outside the built-in vocabulary are not checked.
pub fn validate(node: &Node) -> Result<()> {
    check(node, &[])
}

/// `implied` stands in for the types of an untyped embedded node.
fn check(node: &Node, implied: &[&str]) -> Result<()> {
    for (term, value) in node.data() {
        let Some(row) = row_for_iri(term.as_str()) else {
            continue;
        };
        let applies = row
            .domain
            .iter()
            .any(|t| node.has_type(t) || implied.contains(t));
        if !row.domain.is_empty() && !applies {
            return Err(CodecError::invalid_node(format!(
                "{} does not apply to node {}",
                row.name,
                describe(node)
            )));
        }
        if row.container == Container::Single && value.values().len() > 1 {
            return Err(CodecError::invalid_node(format!(
                "{} takes a single value, found {} on node {}",
                row.name,
                value.values().len(),
                describe(node)
            )));
        }
        for item in value.values() {
            match row.kind {
                TermKind::Data(tag) => {
                    if !tag.handler().is_instance(item) {
                        return Err(CodecError::invalid_node(format!(
                            "{} expects {} values, found {}",
                            row.name,
                            tag,
                            item.kind()
                        )));
                    }
                }
                TermKind::Object => match item {
                    Value::Reference(_) => {}
                    Value::Node(embedded) if embedded.types().is_empty() => {
                        check(embedded, row.range)?;
                    }
                    Value::Node(embedded) => {
                        let in_range =
                            row.range.is_empty() || row.range.iter().any(|t| embedded.has_type(t));
                        if !in_range {
                            return Err(CodecError::invalid_node(format!(
                                "{} does not accept node {}",
                                row.name,
                                describe(embedded)
                            )));
                        }
                        check(embedded, &[])?;
                    }
                    other => {
                        return Err(CodecError::invalid_node(format!(
                            "{} expects node values, found {}",
                            row.name,
                            other.kind()
                        )));
                    }
                },
                TermKind::Vocab => {
                    if !matches!(item, Value::String(_) | Value::Reference(_)) {
                        return Err(CodecError::invalid_node(format!(
                            "{} expects a vocabulary identifier, found {}",
                            row.name,
                            item.kind()
                        )));
                    }
                }
                TermKind::Class { .. } | TermKind::Individual => {
                    return Err(CodecError::invalid_node(format!(
                        "{} is not a property",
                        row.name
                    )));
                }
            }
        }
    }
    Ok(())
}

fn describe(node: &Node) -> String {
    let types: Vec<&str> = node
        .types()
        .iter()
        .map(|t| bdio_vocab::ns::bdio_local(t.as_str()).unwrap_or(t.as_str()))
        .collect();
    format!(
        "{} [{}]",
        node.id().unwrap_or("<anonymous>"),
        types.join(", ")
    )
}

/// Builder for a node of one class.
///
/// Values of list and set properties accumulate; other properties keep the
/// last value set.
#[derive(Debug, Clone)]
pub struct ViewBuilder {
    builder: NodeBuilder,
}

impl ViewBuilder {
    pub fn new(class_iri: &str) -> Self {
        Self {
            builder: Node::builder().type_(class_iri),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.builder = self.builder.id(id);
        self
    }

    /// Add a further type to the node.
    pub fn type_(mut self, type_iri: &str) -> Self {
        self.builder = self.builder.type_(type_iri);
        self
    }

    pub fn set(mut self, term: &str, value: impl Into<Value>) -> Self {
        let multi_valued = row_for_iri(term)
            .map(|row| matches!(row.container, Container::List | Container::Set))
            .unwrap_or(false);
        let value: Value = value.into();
        self.builder = match (multi_valued, value) {
            (true, Value::Collection(values)) => values
                .into_iter()
                .fold(self.builder, |builder, value| builder.add(term, value)),
            (true, value) => self.builder.add(term, value),
            (false, value) => self.builder.put(term, value),
        };
        self
    }

    pub fn build(self) -> Result<Node> {
        let node = self.builder.build()?;
        validate(&node)?;
        Ok(node)
    }
}

macro_rules! view_builder {
    (
        $(#[$meta:meta])*
        $name:ident => $class:expr, {
            $($setter:ident => $term:expr),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        pub struct $name(ViewBuilder);

        impl Default for $name {
            fn default() -> Self {
                Self(ViewBuilder::new($class))
            }
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }

            pub fn id(self, id: impl Into<String>) -> Self {
                Self(self.0.id(id))
            }

            /// Set a property by IRI.
            pub fn set(self, term: &str, value: impl Into<Value>) -> Self {
                Self(self.0.set(term, value))
            }

            $(
                pub fn $setter(self, value: impl Into<Value>) -> Self {
                    Self(self.0.set($term, value))
                }
            )*

            pub fn build(self) -> Result<Node> {
                self.0.build()
            }
        }
    };
}

view_builder! {
    /// A `File` node.
    FileBuilder => class::FILE, {
        path => dp::PATH,
        size => dp::SIZE,
        content_type => dp::CONTENT_TYPE,
        encoding => dp::ENCODING,
        file_system_type => dp::FILE_SYSTEM_TYPE,
        fingerprint => dp::FINGERPRINT,
        creation_date_time => dp::CREATION_DATE_TIME,
        last_modified_date_time => dp::LAST_MODIFIED_DATE_TIME,
        link_path => dp::LINK_PATH,
        parent => op::PARENT,
        note => op::NOTE,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    /// A `Component` node.
    ComponentBuilder => class::COMPONENT, {
        name => dp::NAME,
        version => dp::VERSION,
        identifier => dp::IDENTIFIER,
        namespace => dp::NAMESPACE,
        external_id => dp::EXTERNAL_ID,
        external_system_type_id => dp::EXTERNAL_SYSTEM_TYPE_ID,
        homepage => dp::HOMEPAGE,
        vendor => dp::VENDOR,
        requested_version => dp::REQUESTED_VERSION,
        resolver => dp::RESOLVER,
        context => dp::CONTEXT,
        license => op::LICENSE,
        license_conjunctive => op::LICENSE_CONJUNCTIVE,
        license_disjunctive => op::LICENSE_DISJUNCTIVE,
        license_or_later => op::LICENSE_OR_LATER,
        license_exception => op::LICENSE_EXCEPTION,
        canonical => op::CANONICAL,
        dependency => op::DEPENDENCY,
        previous_version => op::PREVIOUS_VERSION,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    /// A `Dependency`, embedded in the node that declares it.
    DependencyBuilder => class::DEPENDENCY, {
        depends_on => op::DEPENDS_ON,
        declared_by => op::DECLARED_BY,
        evidence => op::EVIDENCE,
        scope => dp::SCOPE,
        requested_version => dp::REQUESTED_VERSION,
        range => dp::RANGE,
        license => op::LICENSE,
        license_conjunctive => op::LICENSE_CONJUNCTIVE,
        license_disjunctive => op::LICENSE_DISJUNCTIVE,
        license_or_later => op::LICENSE_OR_LATER,
        license_exception => op::LICENSE_EXCEPTION,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    /// An embedded `Annotation`.
    AnnotationBuilder => class::ANNOTATION, {
        comment => dp::COMMENT,
        creator => dp::CREATOR,
        creation_date_time => dp::CREATION_DATE_TIME,
    }
}

view_builder! {
    /// An embedded `Note` on a range of a file.
    NoteBuilder => class::NOTE, {
        range => dp::RANGE,
        rights => dp::RIGHTS,
    }
}

view_builder! {
    LicenseBuilder => class::LICENSE, {
        name => dp::NAME,
        identifier => dp::IDENTIFIER,
        homepage => dp::HOMEPAGE,
        canonical => op::CANONICAL,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    ProjectBuilder => class::PROJECT, {
        name => dp::NAME,
        version => dp::VERSION,
        namespace => dp::NAMESPACE,
        homepage => dp::HOMEPAGE,
        base => op::BASE,
        dependency => op::DEPENDENCY,
        license => op::LICENSE,
        license_conjunctive => op::LICENSE_CONJUNCTIVE,
        license_disjunctive => op::LICENSE_DISJUNCTIVE,
        license_or_later => op::LICENSE_OR_LATER,
        previous_version => op::PREVIOUS_VERSION,
        subproject => op::SUBPROJECT,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    VersionBuilder => class::VERSION, {
        version => dp::VERSION,
        creation_date_time => dp::CREATION_DATE_TIME,
        previous_version => op::PREVIOUS_VERSION,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    RepositoryBuilder => class::REPOSITORY, {
        name => dp::NAME,
        namespace => dp::NAMESPACE,
        homepage => dp::HOMEPAGE,
        base => op::BASE,
        dependency => op::DEPENDENCY,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    /// A container image.
    ContainerBuilder => class::CONTAINER, {
        image => dp::IMAGE,
        architecture => dp::ARCHITECTURE,
        base => op::BASE,
        dependency => op::DEPENDENCY,
        layer => op::LAYER,
        license => op::LICENSE,
        license_conjunctive => op::LICENSE_CONJUNCTIVE,
        license_disjunctive => op::LICENSE_DISJUNCTIVE,
        license_or_later => op::LICENSE_OR_LATER,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    /// An embedded group of licenses in a license expression.
    LicenseGroupBuilder => class::LICENSE_GROUP, {
        license => op::LICENSE,
        license_conjunctive => op::LICENSE_CONJUNCTIVE,
        license_disjunctive => op::LICENSE_DISJUNCTIVE,
        license_or_later => op::LICENSE_OR_LATER,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    FileCollectionBuilder => class::FILE_COLLECTION, {
        base => op::BASE,
        dependency => op::DEPENDENCY,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    ContainerLayerBuilder => class::CONTAINER_LAYER, {
        command => dp::COMMAND,
        size => dp::SIZE,
        description => op::DESCRIPTION,
    }
}

view_builder! {
    VulnerabilityBuilder => class::VULNERABILITY, {
        comment => dp::COMMENT,
        creation_date_time => dp::CREATION_DATE_TIME,
        affected => op::AFFECTED,
        description => op::DESCRIPTION,
    }
}

/// The `BillOfMaterials` node written to the header entry.
///
/// `specVersion` defaults to the latest version; writers replace it with
/// the version they write.
#[derive(Debug, Clone)]
pub struct MetadataBuilder(ViewBuilder);

impl Default for MetadataBuilder {
    fn default() -> Self {
        Self(
            ViewBuilder::new(class::BILL_OF_MATERIALS)
                .set(dp::SPEC_VERSION, Specification::latest().version()),
        )
    }
}

impl MetadataBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(self, id: impl Into<String>) -> Self {
        Self(self.0.id(id))
    }

    pub fn name(self, name: impl Into<Value>) -> Self {
        Self(self.0.set(dp::NAME, name))
    }

    pub fn creator(self, creator: impl Into<Value>) -> Self {
        Self(self.0.set(dp::CREATOR, creator))
    }

    /// Default creator: `user@host`, either part optional.
    pub fn creator_parts(self, user: Option<&str>, host: Option<&str>) -> Self {
        let creator = match (user, host) {
            (Some(user), Some(host)) => format!("{}@{}", user, host),
            (Some(user), None) => user.to_string(),
            (None, Some(host)) => format!("@{}", host),
            (None, None) => return self,
        };
        self.creator(creator)
    }

    pub fn creation_date_time(self, created: impl Into<Value>) -> Self {
        Self(self.0.set(dp::CREATION_DATE_TIME, created))
    }

    pub fn publisher(self, publisher: impl Into<Value>) -> Self {
        Self(self.0.set(dp::PUBLISHER, publisher))
    }

    pub fn platform(self, platform: impl Into<Value>) -> Self {
        Self(self.0.set(dp::PLATFORM, platform))
    }

    pub fn build_number(self, build_number: impl Into<Value>) -> Self {
        Self(self.0.set(dp::BUILD_NUMBER, build_number))
    }

    pub fn build_details(self, build_details: impl Into<Value>) -> Self {
        Self(self.0.set(dp::BUILD_DETAILS, build_details))
    }

    pub fn source_repository(self, repository: impl Into<Value>) -> Self {
        Self(self.0.set(dp::SOURCE_REPOSITORY, repository))
    }

    pub fn source_branch(self, branch: impl Into<Value>) -> Self {
        Self(self.0.set(dp::SOURCE_BRANCH, branch))
    }

    pub fn source_revision(self, revision: impl Into<Value>) -> Self {
        Self(self.0.set(dp::SOURCE_REVISION, revision))
    }

    pub fn source_tag(self, tag: impl Into<Value>) -> Self {
        Self(self.0.set(dp::SOURCE_TAG, tag))
    }

    pub fn spec_version(self, version: &str) -> Self {
        Self(self.0.set(dp::SPEC_VERSION, version))
    }

    pub fn build(self) -> Result<Node> {
        self.0.build()
    }
}
