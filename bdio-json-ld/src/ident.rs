//! Interned vocabulary identifiers.
//!
//! Every term and type IRI is canonicalized through a process-wide
//! [`Registry`] so that equal IRIs share one allocation and equality is
//! usually a pointer comparison.

use crate::error::{CodecError, Result};
use crate::keyword::Keyword;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Serialize, Serializer};
use std::borrow::Borrow;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// An interned, immutable IRI.
#[derive(Clone)]
pub struct Identifier(Arc<str>);

impl Identifier {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || self.0 == other.0
    }
}

impl Eq for Identifier {}

impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        if Arc::ptr_eq(&self.0, &other.0) {
            return Ordering::Equal;
        }
        self.0.cmp(&other.0)
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Identifier {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Create-if-absent cache of identifiers.
///
/// Lookups of known IRIs take a shared read lock; a write lock is only taken
/// the first time an IRI is seen.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<HashSet<Arc<str>>>,
}

static GLOBAL: Lazy<Registry> =
    Lazy::new(|| Registry::with_builtins(crate::vocabulary::builtin_iris()));

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry preloaded with the given IRIs.
    pub fn with_builtins<'a>(iris: impl IntoIterator<Item = &'a str>) -> Self {
        let entries: HashSet<Arc<str>> = iris.into_iter().map(Arc::from).collect();
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// The process-wide registry, populated with the built-in vocabulary on
    /// first use.
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Return the canonical identifier for `iri`, registering it if needed.
    ///
    /// Empty strings and keyword-shaped strings (leading `@`) are rejected;
    /// keywords are represented by [`Keyword`].
    pub fn intern(&self, iri: &str) -> Result<Identifier> {
        if iri.is_empty() || Keyword::is_keyword_like(iri) {
            return Err(CodecError::InvalidIdentifier {
                iri: iri.to_string(),
            });
        }
        Ok(self.intern_unchecked(iri))
    }

    /// Intern an IRI already known to be a valid identifier.
    pub(crate) fn intern_unchecked(&self, iri: &str) -> Identifier {
        debug_assert!(!iri.is_empty() && !Keyword::is_keyword_like(iri));
        if let Some(existing) = self.entries.read().get(iri) {
            return Identifier(existing.clone());
        }
        let mut entries = self.entries.write();
        if let Some(existing) = entries.get(iri) {
            return Identifier(existing.clone());
        }
        let created: Arc<str> = Arc::from(iri);
        entries.insert(created.clone());
        Identifier(created)
    }

    pub fn contains(&self, iri: &str) -> bool {
        self.entries.read().contains(iri)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

macro_rules! identifier_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(Identifier);

        impl $name {
            /// Intern `iri` in the global registry.
            pub fn new(iri: &str) -> Result<Self> {
                Registry::global().intern(iri).map($name)
            }

            pub fn identifier(&self) -> &Identifier {
                &self.0
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<Identifier> for $name {
            fn from(id: Identifier) -> Self {
                $name(id)
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CodecError;

            fn try_from(iri: &str) -> Result<Self> {
                $name::new(iri)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                self.0.as_str()
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:?})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

identifier_newtype!(
    /// An identifier naming a property
    Term
);

identifier_newtype!(
    /// An identifier naming a node classification
    Type
);
