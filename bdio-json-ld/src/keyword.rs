use std::fmt;
use std::str::FromStr;

/// The JSON-LD keywords BDIO emits and consumes.
///
/// Keywords are never interned as vocabulary identifiers; anything starting
/// with `@` is handled through this enumeration instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Keyword {
    Context,
    Id,
    Value,
    Language,
    Type,
    Container,
    List,
    Set,
    Reverse,
    Index,
    Base,
    Vocab,
    Graph,
}

impl Keyword {
    pub const ALL: [Keyword; 13] = [
        Keyword::Context,
        Keyword::Id,
        Keyword::Value,
        Keyword::Language,
        Keyword::Type,
        Keyword::Container,
        Keyword::List,
        Keyword::Set,
        Keyword::Reverse,
        Keyword::Index,
        Keyword::Base,
        Keyword::Vocab,
        Keyword::Graph,
    ];

    /// The serialized form, including the `@` sigil
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Context => "@context",
            Keyword::Id => "@id",
            Keyword::Value => "@value",
            Keyword::Language => "@language",
            Keyword::Type => "@type",
            Keyword::Container => "@container",
            Keyword::List => "@list",
            Keyword::Set => "@set",
            Keyword::Reverse => "@reverse",
            Keyword::Index => "@index",
            Keyword::Base => "@base",
            Keyword::Vocab => "@vocab",
            Keyword::Graph => "@graph",
        }
    }

    /// Returns true if the string uses the keyword sigil.
    pub fn is_keyword_like(s: &str) -> bool {
        s.starts_with('@')
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Keyword {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Keyword::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_parse() {
        for keyword in Keyword::ALL {
            assert_eq!(keyword.as_str().parse::<Keyword>(), Ok(keyword));
        }
        assert_eq!("@json".parse::<Keyword>(), Err(()));
        assert_eq!("id".parse::<Keyword>(), Err(()));
    }
}
