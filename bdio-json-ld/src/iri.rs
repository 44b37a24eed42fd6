/// Parse a compact IRI like "spdx:checksum" into (prefix, suffix).
/// Returns None if not a valid compact IRI.
///
/// A compact IRI has the form prefix:suffix where:
/// - prefix is non-empty and does not contain /
/// - suffix does not start with //
pub fn parse_prefix(s: &str) -> Option<(&str, &str)> {
    let (prefix, suffix) = s.split_once(':')?;
    if prefix.is_empty() || prefix.contains('/') || suffix.starts_with("//") {
        return None;
    }
    Some((prefix, suffix))
}

/// Returns true if string contains a colon (looks like an IRI or compact IRI)
pub fn any_iri(s: &str) -> bool {
    s.contains(':')
}

/// Returns true if the IRI is absolute (has an RFC 3986 scheme).
///
/// A scheme is `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )` followed by `:`.
pub fn is_absolute(iri: &str) -> bool {
    scheme(iri).is_some()
}

/// Returns true for absolute IRIs whose scheme-specific part is a path
/// (`http://host/x`, `file:///x`), as opposed to opaque ones (`urn:x`).
pub fn is_hierarchical(iri: &str) -> bool {
    match scheme(iri) {
        Some(scheme) => iri[scheme.len() + 1..].starts_with('/'),
        None => false,
    }
}

fn scheme(iri: &str) -> Option<&str> {
    let (scheme, _) = iri.split_once(':')?;
    let bytes = scheme.as_bytes();
    let valid = !bytes.is_empty()
        && bytes[0].is_ascii_alphabetic()
        && bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
    valid.then_some(scheme)
}

/// Split an IRI reference at the first `?` or `#` into (path, rest).
fn split_path(s: &str) -> (&str, &str) {
    match s.find(['?', '#']) {
        Some(pos) => s.split_at(pos),
        None => (s, ""),
    }
}

/// The components of an absolute IRI needed for reference resolution.
struct Parts<'a> {
    /// `scheme:` plus `//authority` when present
    prefix: &'a str,
    path: &'a str,
    /// Query including the leading `?`, fragment removed
    query: &'a str,
}

fn parts(base: &str) -> Option<Parts<'_>> {
    let scheme = scheme(base)?;
    let without_fragment = base.split('#').next().unwrap_or(base);
    let mut authority_end = scheme.len() + 1;
    let after_scheme = &without_fragment[authority_end..];
    if let Some(rest) = after_scheme.strip_prefix("//") {
        let end = rest.find(['/', '?']).unwrap_or(rest.len());
        authority_end += 2 + end;
    }
    let (prefix, tail) = without_fragment.split_at(authority_end);
    let (path, query) = match tail.find('?') {
        Some(pos) => tail.split_at(pos),
        None => (tail, ""),
    };
    Some(Parts {
        prefix,
        path,
        query,
    })
}

/// Remove `.` and `..` segments from a path (RFC 3986 §5.2.4).
fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut output: Vec<&str> = Vec::new();
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len().saturating_sub(1);
    let mut trailing_slash = false;
    for (i, segment) in segments.iter().enumerate() {
        match *segment {
            "." => trailing_slash = i == last,
            ".." => {
                if output.len() > usize::from(absolute) {
                    output.pop();
                }
                trailing_slash = i == last;
            }
            "" if i != 0 && i != last => {}
            s => {
                output.push(s);
                trailing_slash = false;
            }
        }
    }
    let mut result = output.join("/");
    if absolute && !result.starts_with('/') {
        result.insert(0, '/');
    }
    if trailing_slash && !result.ends_with('/') {
        result.push('/');
    }
    result
}

/// Resolve an IRI reference against an absolute base IRI (RFC 3986 §5.2).
///
/// Absolute references are returned unchanged. If `base` is not absolute the
/// reference is returned unchanged as well.
pub fn resolve(base: &str, reference: &str) -> String {
    if is_absolute(reference) {
        return reference.to_string();
    }
    let Some(base) = parts(base) else {
        return reference.to_string();
    };

    if reference.is_empty() {
        return format!("{}{}{}", base.prefix, base.path, base.query);
    }
    if reference.starts_with('#') {
        return format!("{}{}{}{}", base.prefix, base.path, base.query, reference);
    }
    if reference.starts_with('?') {
        return format!("{}{}{}", base.prefix, base.path, reference);
    }
    if let Some(network) = reference.strip_prefix("//") {
        let scheme_end = base.prefix.find(':').unwrap_or(0);
        return format!("{}://{}", &base.prefix[..scheme_end], network);
    }

    let (path, rest) = split_path(reference);
    let merged = if path.starts_with('/') {
        path.to_string()
    } else if base.path.is_empty() && base.prefix.contains("//") {
        format!("/{}", path)
    } else {
        match base.path.rfind('/') {
            Some(pos) => format!("{}{}", &base.path[..=pos], path),
            None => path.to_string(),
        }
    };
    format!("{}{}{}", base.prefix, remove_dot_segments(&merged), rest)
}
