//! The built-in BDIO vocabulary.
//!
//! One row per class, property and named individual, tagged with the
//! specification version that introduced it. Rows are declared with their
//! current (latest) IRI; older versions derive theirs from the legacy
//! namespace and any legacy short name.

use crate::datatype::DatatypeTag;
use crate::spec::Container;
use bdio_vocab::{class, data_property as dp, individual, object_property as op, spec_version};

/// What a vocabulary row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// A node type
    Class { embedded: bool },
    /// A named value of a vocabulary-valued property
    Individual,
    /// A property with literal values of the given datatype
    Data(DatatypeTag),
    /// A property whose values reference (or embed) other nodes
    Object,
    /// A property whose values are vocabulary individuals
    Vocab,
}

/// A short name used by versions older than `until`.
#[derive(Debug, Clone, Copy)]
pub struct LegacyName {
    pub until: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct Row {
    /// Current short name
    pub name: &'static str,
    /// Current IRI
    pub iri: &'static str,
    pub kind: TermKind,
    pub container: Container,
    /// Types that may carry this property; empty means any
    pub domain: &'static [&'static str],
    /// Types a property value may have
    pub range: &'static [&'static str],
    /// Version that introduced the row
    pub since: &'static str,
    pub legacy: Option<LegacyName>,
}

const V1_0: &str = spec_version::V1_0_0;
const V1_1: &str = spec_version::V1_1_0;
const V1_1_1: &str = spec_version::V1_1_1;
const V2_0: &str = spec_version::V2_0_0;

const fn class_row(name: &'static str, iri: &'static str, since: &'static str, embedded: bool) -> Row {
    Row {
        name,
        iri,
        kind: TermKind::Class { embedded },
        container: Container::Single,
        domain: &[],
        range: &[],
        since,
        legacy: None,
    }
}

const fn data(
    name: &'static str,
    iri: &'static str,
    datatype: DatatypeTag,
    container: Container,
    domain: &'static [&'static str],
    since: &'static str,
) -> Row {
    Row {
        name,
        iri,
        kind: TermKind::Data(datatype),
        container,
        domain,
        range: &[],
        since,
        legacy: None,
    }
}

const fn object(
    name: &'static str,
    iri: &'static str,
    container: Container,
    domain: &'static [&'static str],
    range: &'static [&'static str],
    since: &'static str,
) -> Row {
    Row {
        name,
        iri,
        kind: TermKind::Object,
        container,
        domain,
        range,
        since,
        legacy: None,
    }
}

const fn named_individual(name: &'static str, iri: &'static str) -> Row {
    Row {
        name,
        iri,
        kind: TermKind::Individual,
        container: Container::Single,
        domain: &[],
        range: &[],
        since: V1_0,
        legacy: None,
    }
}

const fn renamed(row: Row, until: &'static str, name: &'static str) -> Row {
    Row {
        legacy: Some(LegacyName { until, name }),
        ..row
    }
}

use Container::{List, Set, Single};
use DatatypeTag as D;

const BOM: &str = class::BILL_OF_MATERIALS;
const ANNOTATION: &str = class::ANNOTATION;
const COMPONENT: &str = class::COMPONENT;
const CONTAINER: &str = class::CONTAINER;
const LAYER: &str = class::CONTAINER_LAYER;
const DEPENDENCY: &str = class::DEPENDENCY;
const FILE: &str = class::FILE;
const FILES: &str = class::FILE_COLLECTION;
const LICENSE: &str = class::LICENSE;
const LICENSE_GROUP: &str = class::LICENSE_GROUP;
const NOTE: &str = class::NOTE;
const PROJECT: &str = class::PROJECT;
const REPOSITORY: &str = class::REPOSITORY;
const VERSION: &str = class::VERSION;
const VULNERABILITY: &str = class::VULNERABILITY;

/// Nodes that may take part in a license expression.
const LICENSED: &[&str] = &[COMPONENT, CONTAINER, DEPENDENCY, LICENSE_GROUP, PROJECT];

/// Every row of the vocabulary, classes first.
pub static ROWS: &[Row] = &[
    // ---------------------------------------------------------------------
    // Classes
    // ---------------------------------------------------------------------
    class_row("BillOfMaterials", BOM, V1_0, false),
    class_row("File", FILE, V1_0, false),
    class_row("Component", COMPONENT, V1_0, false),
    class_row("License", LICENSE, V1_0, false),
    class_row("Project", PROJECT, V1_0, false),
    class_row("Version", VERSION, V1_0, false),
    class_row("Vulnerability", VULNERABILITY, V1_0, false),
    class_row("Repository", REPOSITORY, V1_1, false),
    class_row("Note", NOTE, V1_1_1, true),
    class_row("Annotation", ANNOTATION, V2_0, true),
    class_row("Container", CONTAINER, V2_0, false),
    class_row("ContainerLayer", LAYER, V2_0, false),
    class_row("Dependency", DEPENDENCY, V2_0, true),
    class_row("FileCollection", FILES, V2_0, false),
    class_row("LicenseGroup", LICENSE_GROUP, V2_0, true),
    // ---------------------------------------------------------------------
    // Data properties
    // ---------------------------------------------------------------------
    data("specVersion", dp::SPEC_VERSION, D::Default, Single, &[BOM], V1_0),
    data("name", dp::NAME, D::Default, Single, &[BOM, COMPONENT, LICENSE, PROJECT, REPOSITORY], V1_0),
    data("creator", dp::CREATOR, D::Default, Single, &[BOM, ANNOTATION], V1_0),
    renamed(
        data(
            "creationDateTime",
            dp::CREATION_DATE_TIME,
            D::DateTime,
            Single,
            &[BOM, ANNOTATION, FILE, VERSION, VULNERABILITY],
            V1_0,
        ),
        V2_0,
        "created",
    ),
    data("publisher", dp::PUBLISHER, D::Products, Single, &[BOM], V1_1),
    data("platform", dp::PLATFORM, D::Products, Single, &[BOM], V1_1),
    data("buildNumber", dp::BUILD_NUMBER, D::Default, Single, &[BOM], V1_1),
    data("buildDetails", dp::BUILD_DETAILS, D::Default, Single, &[BOM], V1_1),
    data("sourceRepository", dp::SOURCE_REPOSITORY, D::Default, Single, &[BOM], V1_1),
    data("sourceBranch", dp::SOURCE_BRANCH, D::Default, Single, &[BOM], V1_1),
    data("sourceRevision", dp::SOURCE_REVISION, D::Default, Single, &[BOM], V1_1),
    data("sourceTag", dp::SOURCE_TAG, D::Default, Single, &[BOM], V1_1),
    data("path", dp::PATH, D::Default, Single, &[FILE], V1_0),
    data("size", dp::SIZE, D::Long, Single, &[FILE, LAYER], V1_0),
    data("contentType", dp::CONTENT_TYPE, D::ContentType, Single, &[FILE], V1_0),
    data("encoding", dp::ENCODING, D::Default, Single, &[FILE], V1_1),
    data("fileSystemType", dp::FILE_SYSTEM_TYPE, D::Default, Single, &[FILE], V1_1),
    renamed(
        data("fingerprint", dp::FINGERPRINT, D::Digest, Set, &[FILE], V1_0),
        V2_0,
        "checksum",
    ),
    data("lastModifiedDateTime", dp::LAST_MODIFIED_DATE_TIME, D::DateTime, Single, &[FILE], V2_0),
    data("linkPath", dp::LINK_PATH, D::Default, Single, &[FILE], V1_1),
    data("homepage", dp::HOMEPAGE, D::Default, Set, &[COMPONENT, LICENSE, PROJECT, REPOSITORY], V1_0),
    data("identifier", dp::IDENTIFIER, D::Default, Single, &[COMPONENT, LICENSE], V1_0),
    data("namespace", dp::NAMESPACE, D::Default, Single, &[COMPONENT, PROJECT, REPOSITORY], V1_1),
    data("externalId", dp::EXTERNAL_ID, D::Default, Single, &[COMPONENT], V1_0),
    Row {
        kind: TermKind::Vocab,
        ..data("externalSystemTypeId", dp::EXTERNAL_SYSTEM_TYPE_ID, D::Default, Single, &[COMPONENT], V1_0)
    },
    data("version", dp::VERSION, D::Default, Single, &[COMPONENT, PROJECT, VERSION], V1_0),
    data("requestedVersion", dp::REQUESTED_VERSION, D::Default, Single, &[COMPONENT, DEPENDENCY], V2_0),
    data("vendor", dp::VENDOR, D::Default, Single, &[COMPONENT], V1_1),
    data("resolver", dp::RESOLVER, D::Products, Single, &[COMPONENT], V2_0),
    data("context", dp::CONTEXT, D::Default, Single, &[COMPONENT], V2_0),
    data("scope", dp::SCOPE, D::Default, Single, &[DEPENDENCY], V2_0),
    data("range", dp::RANGE, D::ContentRange, Set, &[DEPENDENCY, NOTE], V1_1_1),
    data("rights", dp::RIGHTS, D::Default, Single, &[NOTE], V1_1_1),
    data("comment", dp::COMMENT, D::Default, Single, &[ANNOTATION, VULNERABILITY], V1_0),
    data("image", dp::IMAGE, D::Default, Single, &[CONTAINER], V2_0),
    data("architecture", dp::ARCHITECTURE, D::Default, Single, &[CONTAINER], V2_0),
    data("command", dp::COMMAND, D::Default, Single, &[LAYER], V2_0),
    // ---------------------------------------------------------------------
    // Object properties
    // ---------------------------------------------------------------------
    object("affected", op::AFFECTED, Set, &[VULNERABILITY], &[COMPONENT, PROJECT], V1_0),
    object("base", op::BASE, Single, &[CONTAINER, FILES, PROJECT, REPOSITORY], &[FILE], V1_1),
    object("canonical", op::CANONICAL, Single, &[COMPONENT, LICENSE], &[COMPONENT, LICENSE], V2_0),
    object("declaredBy", op::DECLARED_BY, Single, &[DEPENDENCY], &[FILE], V2_0),
    object(
        "dependency",
        op::DEPENDENCY,
        Set,
        &[COMPONENT, CONTAINER, FILES, PROJECT, REPOSITORY],
        &[DEPENDENCY],
        V2_0,
    ),
    object("dependsOn", op::DEPENDS_ON, Single, &[DEPENDENCY], &[COMPONENT], V2_0),
    object("description", op::DESCRIPTION, Single, &[], &[ANNOTATION], V2_0),
    object("evidence", op::EVIDENCE, Single, &[DEPENDENCY], &[FILE], V2_0),
    object("layer", op::LAYER, List, &[CONTAINER], &[LAYER], V2_0),
    object("license", op::LICENSE, Single, LICENSED, &[LICENSE, LICENSE_GROUP], V1_0),
    object("licenseConjunctive", op::LICENSE_CONJUNCTIVE, List, LICENSED, &[LICENSE, LICENSE_GROUP], V2_0),
    object("licenseDisjunctive", op::LICENSE_DISJUNCTIVE, List, LICENSED, &[LICENSE, LICENSE_GROUP], V2_0),
    object("licenseOrLater", op::LICENSE_OR_LATER, Single, LICENSED, &[LICENSE], V2_0),
    object("licenseException", op::LICENSE_EXCEPTION, Single, &[COMPONENT, DEPENDENCY], &[LICENSE], V2_0),
    object("note", op::NOTE, List, &[FILE], &[NOTE], V1_1_1),
    object("parent", op::PARENT, Single, &[FILE], &[FILE], V1_0),
    object(
        "previousVersion",
        op::PREVIOUS_VERSION,
        Single,
        &[COMPONENT, PROJECT, VERSION],
        &[COMPONENT, PROJECT, VERSION],
        V1_0,
    ),
    object("subproject", op::SUBPROJECT, Set, &[PROJECT], &[PROJECT], V1_1),
    // ---------------------------------------------------------------------
    // External identifier systems
    // ---------------------------------------------------------------------
    named_individual("externalIdentifier_anaconda", individual::ANACONDA),
    named_individual("externalIdentifier_bower", individual::BOWER),
    named_individual("externalIdentifier_cpan", individual::CPAN),
    named_individual("externalIdentifier_goget", individual::GOGET),
    named_individual("externalIdentifier_github", individual::GITHUB),
    named_individual("externalIdentifier_maven", individual::MAVEN),
    named_individual("externalIdentifier_npmjs", individual::NPMJS),
    named_individual("externalIdentifier_nuget", individual::NUGET),
    named_individual("externalIdentifier_rubygems", individual::RUBYGEMS),
    renamed(
        named_individual("externalIdentifier_bdsuite", individual::BDSUITE),
        V1_1,
        "externalIdentifier_bd-suite",
    ),
    renamed(
        named_individual("externalIdentifier_bdhub", individual::BDHUB),
        V1_1,
        "externalIdentifier_bd-hub",
    ),
];

/// IRIs preloaded into the identifier registry.
pub fn builtin_iris() -> impl Iterator<Item = &'static str> {
    ROWS.iter().map(|row| row.iri)
}

/// Find a row by its current IRI.
pub fn row_for_iri(iri: &str) -> Option<&'static Row> {
    ROWS.iter().find(|row| row.iri == iri)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_and_iris_unique() {
        let mut names = HashSet::new();
        let mut iris = HashSet::new();
        for row in ROWS {
            assert!(names.insert(row.name), "duplicate name {}", row.name);
            assert!(iris.insert(row.iri), "duplicate iri {}", row.iri);
            assert_eq!(bdio_vocab::ns::bdio_local(row.iri).map(|l| !l.is_empty()), Some(true));
        }
    }

    #[test]
    fn test_domains_and_ranges_are_classes() {
        let classes: HashSet<&str> = ROWS
            .iter()
            .filter(|row| matches!(row.kind, TermKind::Class { .. }))
            .map(|row| row.iri)
            .collect();
        for row in ROWS {
            for iri in row.domain.iter().chain(row.range) {
                assert!(classes.contains(iri), "{} refers to unknown class {}", row.name, iri);
            }
        }
    }

    #[test]
    fn test_license_expression_terms() {
        let license = row_for_iri(op::LICENSE).unwrap();
        assert_eq!(license.range, &[LICENSE, LICENSE_GROUP]);
        assert!(license.domain.contains(&LICENSE_GROUP));
        assert!(!license.domain.contains(&FILE));

        let conjunctive = row_for_iri(op::LICENSE_CONJUNCTIVE).unwrap();
        assert_eq!(conjunctive.container, List);
        assert_eq!(conjunctive.since, V2_0);
        assert_eq!(row_for_iri(op::LICENSE_OR_LATER).unwrap().container, Single);
        assert_eq!(
            row_for_iri(LICENSE_GROUP).unwrap().kind,
            TermKind::Class { embedded: true }
        );
    }

    #[test]
    fn test_required_classes_present() {
        for iri in [
            class::FILE,
            class::COMPONENT,
            class::DEPENDENCY,
            class::ANNOTATION,
            class::CONTAINER,
            class::CONTAINER_LAYER,
            class::LICENSE,
            class::PROJECT,
            class::VERSION,
            class::REPOSITORY,
            class::NOTE,
            class::FILE_COLLECTION,
            class::LICENSE_GROUP,
            op::LICENSE_CONJUNCTIVE,
            op::LICENSE_DISJUNCTIVE,
            op::LICENSE_OR_LATER,
        ] {
            assert!(row_for_iri(iri).is_some(), "missing {}", iri);
        }
    }
}
