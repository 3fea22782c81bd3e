//! Minimal IRI handling: dot-segment removal and relative reference
//! resolution, enough for Turtle `@base` processing and identifier
//! normalization.

use crate::error::{GraphError, GraphResult};

/// Whether `iri` starts with a URI scheme (`http:`, `urn:`, ...).
pub fn has_scheme(iri: &str) -> bool {
    match iri.find(':') {
        Some(0) | None => false,
        Some(idx) => {
            let scheme = &iri[..idx];
            scheme.starts_with(|c: char| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
    }
}

/// Split an absolute IRI into its origin (`scheme://authority`) and the
/// remainder starting at the path. IRIs without an authority have an empty
/// origin.
pub fn split_origin(iri: &str) -> (&str, &str) {
    match iri.find("://") {
        Some(idx) => {
            let after = idx + 3;
            let path_start = iri[after..]
                .find(['/', '?', '#'])
                .map_or(iri.len(), |p| after + p);
            iri.split_at(path_start)
        }
        None => ("", iri),
    }
}

/// Remove `.` and `..` segments and collapse empty segments in a path.
///
/// A trailing slash is kept, so container paths stay containers.
pub fn remove_dot_segments(path: &str) -> String {
    let absolute = path.starts_with('/');
    let segments: Vec<&str> = path.split('/').collect();
    let last = segments.len() - 1;
    let mut output: Vec<&str> = Vec::with_capacity(segments.len());
    let mut trailing_slash = false;

    for (idx, segment) in segments.iter().enumerate() {
        match *segment {
            "." | "" => trailing_slash = idx == last && idx > 0,
            ".." => {
                output.pop();
                trailing_slash = idx == last;
            }
            name => {
                output.push(name);
                trailing_slash = false;
            }
        }
    }

    let mut result = String::with_capacity(path.len());
    if absolute {
        result.push('/');
    }
    result.push_str(&output.join("/"));
    if trailing_slash && !output.is_empty() {
        result.push('/');
    }
    result
}

/// Resolve `iri` against `base`. Absolute IRIs are returned unchanged.
pub fn resolve(base: Option<&str>, iri: &str) -> GraphResult<String> {
    if has_scheme(iri) {
        return Ok(iri.to_string());
    }
    let base = base.ok_or_else(|| GraphError::RelativeIri(iri.to_string()))?;
    let base = base.split('#').next().unwrap_or(base);

    if iri.is_empty() {
        return Ok(base.to_string());
    }
    if iri.starts_with('#') {
        return Ok(format!("{base}{iri}"));
    }

    let (origin, rest) = split_origin(base);
    let base_path = rest.split('?').next().unwrap_or(rest);

    if let Some(authority) = iri.strip_prefix("//") {
        let scheme = base.split(':').next().unwrap_or("http");
        return Ok(format!("{scheme}://{authority}"));
    }
    if iri.starts_with('?') {
        return Ok(format!("{origin}{base_path}{iri}"));
    }

    let suffix_start = iri.find(['?', '#']).unwrap_or(iri.len());
    let (path, suffix) = iri.split_at(suffix_start);
    let merged = if path.starts_with('/') {
        path.to_string()
    } else {
        let dir = match base_path.rfind('/') {
            Some(idx) => &base_path[..=idx],
            None => "/",
        };
        format!("{dir}{path}")
    };
    Ok(format!("{origin}{}{suffix}", remove_dot_segments(&merged)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn scheme_detection() {
        assert!(has_scheme("http://example.com/"));
        assert!(has_scheme("urn:uuid:1234"));
        assert!(!has_scheme("/foo/bar"));
        assert!(!has_scheme("foo/bar:baz"));
        assert!(!has_scheme(":nope"));
    }

    #[test]
    fn dot_segments() {
        assert_eq!(remove_dot_segments("/a/b/../c"), "/a/c");
        assert_eq!(remove_dot_segments("/a/./b/"), "/a/b/");
        assert_eq!(remove_dot_segments("/a//b"), "/a/b");
        assert_eq!(remove_dot_segments("/a/.."), "/");
        assert_eq!(remove_dot_segments("/../.."), "/");
        assert_eq!(remove_dot_segments("/"), "/");
        assert_eq!(remove_dot_segments(""), "");
    }

    #[test]
    fn resolve_references() {
        let base = Some("http://test.com/foo/bar");
        assert_eq!(resolve(base, "baz").unwrap(), "http://test.com/foo/baz");
        assert_eq!(resolve(base, "./").unwrap(), "http://test.com/foo/");
        assert_eq!(resolve(base, "../x").unwrap(), "http://test.com/x");
        assert_eq!(resolve(base, "/abs").unwrap(), "http://test.com/abs");
        assert_eq!(resolve(base, "#me").unwrap(), "http://test.com/foo/bar#me");
        assert_eq!(resolve(base, "").unwrap(), "http://test.com/foo/bar");
        assert_eq!(
            resolve(base, "//other.org/p").unwrap(),
            "http://other.org/p"
        );
        assert_eq!(
            resolve(base, "http://elsewhere/").unwrap(),
            "http://elsewhere/"
        );
    }

    #[test]
    fn relative_without_base_fails() {
        assert_eq!(
            resolve(None, "foo"),
            Err(GraphError::RelativeIri("foo".into()))
        );
    }

    proptest! {
        #[test]
        fn dot_segment_removal_is_idempotent(path in "(/[a-z.]{0,3}){0,6}/?") {
            let once = remove_dot_segments(&path);
            prop_assert_eq!(remove_dot_segments(&once), once);
        }
    }
}
