//! BDIO Vocabulary Constants
//!
//! This crate provides a centralized location for the IRIs, local names and
//! well-known literal values used by BDIO documents.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `ns` - Namespace IRIs (current BDIO, legacy 1.x terms, XSD, SPDX, DOAP)
//! - `class` - BDIO node classes (current namespace)
//! - `object_property` - Properties whose values reference other nodes
//! - `data_property` - Properties whose values are typed literals
//! - `datatype` - Datatype IRIs for value objects
//! - `individual` - Named vocabulary individuals (external identifier systems)
//! - `file_system_type` - Values of the `fileSystemType` property
//! - `media_type` - BDIO and JSON-LD media types
//! - `spec_version` - Known specification versions
//! - `entry` - Archive entry naming and sizing

/// Build a full IRI in the current BDIO namespace from a literal local name.
#[macro_export]
macro_rules! bdio_iri {
    ($local:literal) => {
        concat!("https://blackducksoftware.github.io/bdio#", $local)
    };
}

/// Namespace IRIs
pub mod ns {
    /// Current BDIO vocabulary namespace (2.x)
    pub const BDIO: &str = "https://blackducksoftware.github.io/bdio#";

    /// Legacy BDIO vocabulary namespace (1.x)
    pub const LEGACY: &str = "http://blackducksoftware.com/rdf/terms#";

    /// XML Schema datatypes
    pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

    /// RDF Schema
    pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";

    /// SPDX terms, used by 1.x documents
    pub const SPDX: &str = "http://spdx.org/rdf/terms#";

    /// DOAP terms, used by 1.x documents
    pub const DOAP: &str = "http://usefulinc.com/ns/doap#";

    /// Returns the local part of an IRI in the current BDIO namespace.
    pub fn bdio_local(iri: &str) -> Option<&str> {
        iri.strip_prefix(BDIO)
    }
}

/// BDIO classes
pub mod class {
    /// The document metadata node; carries the specification version
    pub const BILL_OF_MATERIALS: &str = bdio_iri!("BillOfMaterials");
    pub const ANNOTATION: &str = bdio_iri!("Annotation");
    pub const COMPONENT: &str = bdio_iri!("Component");
    pub const CONTAINER: &str = bdio_iri!("Container");
    pub const CONTAINER_LAYER: &str = bdio_iri!("ContainerLayer");
    pub const DEPENDENCY: &str = bdio_iri!("Dependency");
    pub const FILE: &str = bdio_iri!("File");
    /// An arbitrary group of files
    pub const FILE_COLLECTION: &str = bdio_iri!("FileCollection");
    pub const LICENSE: &str = bdio_iri!("License");
    /// A grouping of licenses in a license expression
    pub const LICENSE_GROUP: &str = bdio_iri!("LicenseGroup");
    pub const NOTE: &str = bdio_iri!("Note");
    pub const PROJECT: &str = bdio_iri!("Project");
    pub const REPOSITORY: &str = bdio_iri!("Repository");
    pub const VERSION: &str = bdio_iri!("Version");
    pub const VULNERABILITY: &str = bdio_iri!("Vulnerability");
}

/// Properties linking nodes to other nodes
pub mod object_property {
    pub const AFFECTED: &str = bdio_iri!("hasAffected");
    pub const BASE: &str = bdio_iri!("hasBase");
    pub const CANONICAL: &str = bdio_iri!("hasCanonical");
    pub const DECLARED_BY: &str = bdio_iri!("declaredBy");
    pub const DEPENDENCY: &str = bdio_iri!("hasDependency");
    pub const DEPENDS_ON: &str = bdio_iri!("dependsOn");
    pub const DESCRIPTION: &str = bdio_iri!("hasDescription");
    pub const EVIDENCE: &str = bdio_iri!("hasEvidence");
    /// Ordered layers of a container image
    pub const LAYER: &str = bdio_iri!("hasLayer");
    pub const LICENSE: &str = bdio_iri!("hasLicense");
    /// Lower-case `l`, as published
    pub const LICENSE_CONJUNCTIVE: &str = bdio_iri!("haslicenseConjunctive");
    pub const LICENSE_DISJUNCTIVE: &str = bdio_iri!("hasLicenseDisjunctive");
    pub const LICENSE_EXCEPTION: &str = bdio_iri!("hasLicenseException");
    pub const LICENSE_OR_LATER: &str = bdio_iri!("hasLicenseOrLater");
    pub const NOTE: &str = bdio_iri!("hasNote");
    pub const PARENT: &str = bdio_iri!("hasParent");
    pub const PREVIOUS_VERSION: &str = bdio_iri!("hasPreviousVersion");
    pub const SUBPROJECT: &str = bdio_iri!("hasSubproject");
}

/// Properties carrying literal values
pub mod data_property {
    pub const ARCHITECTURE: &str = bdio_iri!("architecture");
    pub const BUILD_DETAILS: &str = bdio_iri!("buildDetails");
    pub const BUILD_NUMBER: &str = bdio_iri!("buildNumber");
    pub const COMMAND: &str = bdio_iri!("command");
    pub const COMMENT: &str = bdio_iri!("comment");
    pub const CONTENT_TYPE: &str = bdio_iri!("contentType");
    pub const CONTEXT: &str = bdio_iri!("context");
    pub const CREATION_DATE_TIME: &str = bdio_iri!("creationDateTime");
    pub const CREATOR: &str = bdio_iri!("creator");
    pub const ENCODING: &str = bdio_iri!("encoding");
    pub const EXTERNAL_ID: &str = bdio_iri!("externalId");
    /// Vocabulary individual naming the external identifier system
    pub const EXTERNAL_SYSTEM_TYPE_ID: &str = bdio_iri!("externalSystemTypeId");
    pub const FILE_SYSTEM_TYPE: &str = bdio_iri!("fileSystemType");
    /// Digest of the file content (named `checksum` before 2.0.0)
    pub const FINGERPRINT: &str = bdio_iri!("fingerprint");
    pub const HOMEPAGE: &str = bdio_iri!("homepage");
    pub const IDENTIFIER: &str = bdio_iri!("identifier");
    pub const IMAGE: &str = bdio_iri!("image");
    pub const LAST_MODIFIED_DATE_TIME: &str = bdio_iri!("lastModifiedDateTime");
    pub const LINK_PATH: &str = bdio_iri!("linkPath");
    pub const NAME: &str = bdio_iri!("name");
    pub const NAMESPACE: &str = bdio_iri!("namespace");
    pub const PATH: &str = bdio_iri!("path");
    pub const PLATFORM: &str = bdio_iri!("platform");
    pub const PUBLISHER: &str = bdio_iri!("publisher");
    pub const RANGE: &str = bdio_iri!("range");
    pub const REQUESTED_VERSION: &str = bdio_iri!("requestedVersion");
    pub const RESOLVER: &str = bdio_iri!("resolver");
    pub const RIGHTS: &str = bdio_iri!("rights");
    pub const SCOPE: &str = bdio_iri!("scope");
    /// Size in bytes
    pub const SIZE: &str = bdio_iri!("size");
    pub const SOURCE_BRANCH: &str = bdio_iri!("sourceBranch");
    pub const SOURCE_REPOSITORY: &str = bdio_iri!("sourceRepository");
    pub const SOURCE_REVISION: &str = bdio_iri!("sourceRevision");
    pub const SOURCE_TAG: &str = bdio_iri!("sourceTag");
    /// The version field of the metadata node
    pub const SPEC_VERSION: &str = bdio_iri!("specVersion");
    pub const VENDOR: &str = bdio_iri!("vendor");
    pub const VERSION: &str = bdio_iri!("version");
}

/// Datatype IRIs
pub mod datatype {
    /// xsd:dateTime
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:long
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    pub const CONTENT_RANGE: &str = bdio_iri!("ContentRange");
    pub const CONTENT_TYPE: &str = bdio_iri!("ContentType");
    pub const DIGEST: &str = bdio_iri!("Digest");
    pub const PRODUCTS: &str = bdio_iri!("Products");

    /// The default datatype has no IRI; values are plain JSON scalars
    pub const DEFAULT: &str = "";
}

/// External identifier systems, used as values of `externalSystemTypeId`
pub mod individual {
    pub const ANACONDA: &str = bdio_iri!("externalIdentifier_anaconda");
    pub const BOWER: &str = bdio_iri!("externalIdentifier_bower");
    pub const CPAN: &str = bdio_iri!("externalIdentifier_cpan");
    pub const GOGET: &str = bdio_iri!("externalIdentifier_goget");
    pub const GITHUB: &str = bdio_iri!("externalIdentifier_github");
    pub const MAVEN: &str = bdio_iri!("externalIdentifier_maven");
    pub const NPMJS: &str = bdio_iri!("externalIdentifier_npmjs");
    pub const NUGET: &str = bdio_iri!("externalIdentifier_nuget");
    pub const RUBYGEMS: &str = bdio_iri!("externalIdentifier_rubygems");
    /// Spelled `externalIdentifier_bd-suite` in 1.0.0 documents
    pub const BDSUITE: &str = bdio_iri!("externalIdentifier_bdsuite");
    /// Spelled `externalIdentifier_bd-hub` in 1.0.0 documents
    pub const BDHUB: &str = bdio_iri!("externalIdentifier_bdhub");
}

/// Values of the `fileSystemType` property
pub mod file_system_type {
    pub const REGULAR: &str = "regular";
    pub const REGULAR_TEXT: &str = "regular/text";
    pub const DIRECTORY: &str = "directory";
    pub const DIRECTORY_ARCHIVE: &str = "directory/archive";
    pub const SYMLINK: &str = "symlink";
    pub const OTHER_DEVICE_BLOCK: &str = "other/device/block";
    pub const OTHER_DEVICE_CHARACTER: &str = "other/device/character";
    pub const OTHER_DOOR: &str = "other/door";
    pub const OTHER_PIPE: &str = "other/pipe";
    pub const OTHER_SOCKET: &str = "other/socket";
    pub const OTHER_WHITEOUT: &str = "other/whiteout";

    /// All file system types, in declaration order
    pub const ALL: &[&str] = &[
        REGULAR,
        REGULAR_TEXT,
        DIRECTORY,
        DIRECTORY_ARCHIVE,
        SYMLINK,
        OTHER_DEVICE_BLOCK,
        OTHER_DEVICE_CHARACTER,
        OTHER_DOOR,
        OTHER_PIPE,
        OTHER_SOCKET,
        OTHER_WHITEOUT,
    ];
}

/// Media types
pub mod media_type {
    /// JSON-LD
    pub const JSONLD: &str = "application/ld+json";

    /// Plain JSON
    pub const JSON: &str = "application/json";

    /// A single BDIO JSON-LD document
    pub const BDIO_JSON: &str = "application/vnd.blackducksoftware.bdio+json";

    /// A chunked BDIO archive
    pub const BDIO_ZIP: &str = "application/vnd.blackducksoftware.bdio+zip";
}

/// Specification versions
pub mod spec_version {
    pub const V1_0_0: &str = "1.0.0";
    pub const V1_1_0: &str = "1.1.0";
    pub const V1_1_1: &str = "1.1.1";
    pub const V2_0_0: &str = "2.0.0";

    /// Assumed when a document does not declare a version
    pub const BASELINE: &str = V1_0_0;

    /// Written by encoders unless configured otherwise
    pub const LATEST: &str = V2_0_0;
}

/// Archive entries
pub mod entry {
    /// Name of the leading entry holding the metadata node
    pub const HEADER: &str = "bdio-header.jsonld";

    /// Prefix of data entry names (`bdio-entry-00.jsonld`, ...)
    pub const DATA_PREFIX: &str = "bdio-entry-";

    /// Extension shared by every entry carrying JSON-LD
    pub const EXTENSION: &str = ".jsonld";

    /// Default upper bound on the estimated size of a single entry
    pub const MAX_ENTRY_SIZE: usize = 16 * 1024 * 1024;

    /// Estimated framing overhead of a data entry
    pub const ENTRY_OVERHEAD: usize = 20;

    /// Name of the data entry at `index`.
    pub fn data_name(index: usize) -> String {
        format!("{}{:02}{}", DATA_PREFIX, index, EXTENSION)
    }
}
