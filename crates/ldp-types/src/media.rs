//! Media types known to the server.

/// Internal quad-stream representation. Never leaves the process.
pub const INTERNAL_QUADS: &str = "internal/quads";

pub const TEXT_TURTLE: &str = "text/turtle";

pub const SPARQL_UPDATE: &str = "application/sparql-update";

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Essence of a media type: parameters removed, trimmed, lowercased.
///
/// `text/turtle; charset=utf-8` becomes `text/turtle`.
pub fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Whether two media types (or ranges) match, honoring `*/*` and `type/*`.
pub fn matches(left: &str, right: &str) -> bool {
    let left = essence(left);
    let right = essence(right);
    if left == "*/*" || right == "*/*" {
        return true;
    }
    let (l_main, l_sub) = left.split_once('/').unwrap_or((left.as_str(), ""));
    let (r_main, r_sub) = right.split_once('/').unwrap_or((right.as_str(), ""));
    l_main == r_main && (l_sub == "*" || r_sub == "*" || l_sub == r_sub)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_parameters() {
        assert_eq!(essence("Text/Turtle ; charset=utf-8"), "text/turtle");
        assert_eq!(essence("internal/quads"), INTERNAL_QUADS);
    }

    #[test]
    fn wildcard_matching_is_symmetric() {
        assert!(matches("*/*", TEXT_TURTLE));
        assert!(matches(TEXT_TURTLE, "*/*"));
        assert!(matches("text/*", TEXT_TURTLE));
        assert!(matches(TEXT_TURTLE, "text/*"));
        assert!(matches("text/turtle;q=0.5", TEXT_TURTLE));
        assert!(!matches("text/*", INTERNAL_QUADS));
        assert!(!matches(TEXT_TURTLE, "text/plain"));
    }
}
