//! Product tokens as used in HTTP `User-Agent`/`Server` headers
//! (`name[/version][ (comment)]`), identifying the tools that produced a
//! document.

use crate::error::{CodecError, Result};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// RFC 7230 `tchar`
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// RFC 7230 `ctext` plus the parentheses themselves
fn is_comment_char(c: char) -> bool {
    c == '\t' || (' '..='~').contains(&c) || ('\u{80}'..='\u{FF}').contains(&c)
}

fn is_ws(c: char) -> bool {
    c == ' ' || c == '\t'
}

fn balanced(comment: &str) -> bool {
    let mut depth = 0usize;
    for c in comment.chars() {
        match c {
            '(' => depth += 1,
            ')' => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            _ => {}
        }
    }
    depth == 0
}

fn invalid(value: &str) -> CodecError {
    CodecError::invalid_input(value, "Product")
}

/// A single product token.
///
/// Equality and hashing ignore the comment.
#[derive(Debug, Clone)]
pub struct Product {
    name: String,
    version: Option<String>,
    comment: Option<String>,
}

impl Product {
    /// Create a product from a name and optional version.
    pub fn new(name: impl Into<String>, version: Option<&str>) -> Result<Self> {
        Self::from_parts(name.into(), version.map(str::to_string), None)
    }

    fn from_parts(name: String, version: Option<String>, comment: Option<String>) -> Result<Self> {
        let product = Product {
            name,
            version,
            comment,
        };
        if product.name.is_empty() || !product.name.chars().all(is_token_char) {
            return Err(invalid(&product.to_string()));
        }
        if let Some(version) = &product.version {
            if version.is_empty() || !version.chars().all(is_token_char) {
                return Err(invalid(&product.to_string()));
            }
        }
        if let Some(comment) = &product.comment {
            let valid = comment.starts_with('(')
                && comment.ends_with(')')
                && comment.chars().all(is_comment_char)
                && balanced(comment);
            if !valid {
                return Err(invalid(&product.to_string()));
            }
        }
        Ok(product)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The comment including its enclosing parentheses
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Replace the comment; `text` is wrapped in parentheses.
    pub fn with_comment(&self, text: &str) -> Result<Self> {
        Self::from_parts(
            self.name.clone(),
            self.version.clone(),
            Some(format!("({})", text)),
        )
    }

    /// Add another parenthesized group after any existing comment.
    pub fn append_comment(&self, text: &str) -> Result<Self> {
        let comment = match &self.comment {
            Some(existing) => format!("{} ({})", existing, text),
            None => format!("({})", text),
        };
        Self::from_parts(self.name.clone(), self.version.clone(), Some(comment))
    }

    pub fn without_comment(&self) -> Self {
        Product {
            name: self.name.clone(),
            version: self.version.clone(),
            comment: None,
        }
    }
}

impl PartialEq for Product {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.version == other.version
    }
}

impl Eq for Product {}

impl Hash for Product {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
    }
}

impl FromStr for Product {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self> {
        let (mut name, mut version) = match s.find('/') {
            Some(pos) if pos > 0 => (&s[..pos], Some(&s[pos + 1..])),
            _ => (s, None),
        };

        let mut comment = None;
        let last = version.unwrap_or(name);
        // "(" needs at least one token character and a separator in front of it
        if let Some(start) = last.find('(').filter(|&start| start > 1) {
            comment = Some(last[start..].to_string());
            let trimmed = last[..start].trim_end_matches(is_ws);
            if version.is_some() {
                version = Some(trimmed);
            } else {
                name = trimmed;
            }
        }

        Self::from_parts(name.to_string(), version.map(str::to_string), comment)
            .map_err(|_| invalid(s))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if let Some(version) = &self.version {
            write!(f, "/{}", version)?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " {}", comment)?;
        }
        Ok(())
    }
}

/// An ordered list of products, most significant first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Products(Vec<Product>);

impl Products {
    pub fn builder() -> ProductsBuilder {
        ProductsBuilder::default()
    }

    /// The first product in the list
    pub fn most_significant(&self) -> Option<&Product> {
        self.0.first()
    }

    pub fn without_comments(&self) -> Self {
        Products(self.0.iter().map(Product::without_comment).collect())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Products {
    type Item = &'a Product;
    type IntoIter = std::slice::Iter<'a, Product>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Products {
    type Err = CodecError;

    /// Splits on whitespace; parenthesized groups following a product (with
    /// or without whitespace between them) form that product's comment.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CodecError::invalid_input(s, "Products");
        let mut products = Vec::new();
        let mut pos = 0;
        let len = s.len();

        loop {
            pos += s[pos..].len() - s[pos..].trim_start_matches(is_ws).len();
            if pos >= len {
                break;
            }
            if s[pos..].starts_with('(') {
                // a comment with no product in front of it
                return Err(invalid());
            }

            let token_end = s[pos..].find(is_ws).map_or(len, |i| pos + i);
            let token = &s[pos..token_end];
            pos = token_end;

            // Gather consecutive comment groups
            let mut comment_start = None;
            let mut comment_end = pos;
            loop {
                let next = pos + (s[pos..].len() - s[pos..].trim_start_matches(is_ws).len());
                if !s[next..].starts_with('(') {
                    break;
                }
                let mut depth = 0usize;
                let mut close = None;
                for (i, c) in s[next..].char_indices() {
                    match c {
                        '(' => depth += 1,
                        ')' => {
                            depth -= 1;
                            if depth == 0 {
                                close = Some(next + i + 1);
                                break;
                            }
                        }
                        _ => {}
                    }
                }
                let close = close.ok_or_else(invalid)?;
                comment_start.get_or_insert(next);
                comment_end = close;
                pos = close;
            }

            let product = match comment_start {
                Some(start) => {
                    let product: Product = token.parse().map_err(|_| invalid())?;
                    if product.comment.is_some() {
                        return Err(invalid());
                    }
                    Product::from_parts(
                        product.name,
                        product.version,
                        Some(s[start..comment_end].to_string()),
                    )
                    .map_err(|_| invalid())?
                }
                None => token.parse().map_err(|_| invalid())?,
            };
            products.push(product);
        }

        Ok(Products(products))
    }
}

impl fmt::Display for Products {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, product) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", product)?;
        }
        Ok(())
    }
}

/// Accumulates products, keeping the first occurrence of each distinct
/// name/version pair.
#[derive(Debug, Default)]
pub struct ProductsBuilder {
    products: Vec<Product>,
}

impl ProductsBuilder {
    pub fn add_product(mut self, product: Product) -> Self {
        if !self.products.contains(&product) {
            self.products.push(product);
        }
        self
    }

    pub fn add_products(self, products: &Products) -> Self {
        products
            .iter()
            .cloned()
            .fold(self, |builder, product| builder.add_product(product))
    }

    pub fn build(self) -> Products {
        Products(self.products)
    }
}
