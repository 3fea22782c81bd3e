use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use ldp_types::Credentials;

const WEB_ID_SCHEME: &str = "WebID";

/// Credentials named by the `Authorization` header.
///
/// Accepts `WebID <iri>`, `WebID iri`, or a bare IRI. Any other scheme, or
/// no header at all, is anonymous.
pub fn credentials_from_headers(headers: &HeaderMap) -> Credentials {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return Credentials::anonymous();
    };
    let value = value.trim();
    let web_id = match value.split_once(char::is_whitespace) {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(WEB_ID_SCHEME) => rest.trim(),
        Some((scheme, _)) => {
            tracing::debug!(scheme, "ignoring unsupported authorization scheme");
            return Credentials::anonymous();
        }
        None => value,
    };
    let web_id = web_id
        .strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(web_id);

    if web_id.is_empty() {
        Credentials::anonymous()
    } else {
        Credentials::agent(web_id)
    }
}
