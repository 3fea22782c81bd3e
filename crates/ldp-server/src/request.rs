//! Turning HTTP requests into operations.

use axum::body::{Body, HttpBody};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::request::Parts;
use axum::http::HeaderMap;
use futures::TryStreamExt;
use ldp_operations::{parse_body, LdpRequest, Operation, RawBody};
use ldp_types::{
    LdpError, LdpResult, RepresentationMetadata, RepresentationPreferences, ResourceIdentifier,
};

use crate::app::LdpApp;
use crate::auth::credentials_from_headers;

const SLUG: &str = "slug";

/// Media preferences from `Accept`. No header accepts anything.
pub fn preferences_from_headers(headers: &HeaderMap) -> RepresentationPreferences {
    match headers.get(ACCEPT).and_then(|v| v.to_str().ok()) {
        Some(accept) => RepresentationPreferences::from_accept_header(accept),
        None => RepresentationPreferences::any(),
    }
}

/// The request body with its metadata, or `None` when it is empty.
fn raw_body(headers: &HeaderMap, body: Body, target: &ResourceIdentifier) -> Option<RawBody> {
    if body.size_hint().exact() == Some(0) {
        return None;
    }

    let mut metadata = RepresentationMetadata::default().with_identifier(target.clone());
    metadata.content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    metadata.slug = headers
        .get(SLUG)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let data = body
        .into_data_stream()
        .map_err(|e| LdpError::Io(std::io::Error::other(e)));
    Some(RawBody {
        metadata,
        data: Box::pin(data),
    })
}

/// Parse the parts and body of a request into an authenticated operation.
pub async fn parse_request(app: &LdpApp, parts: Parts, body: Body) -> LdpResult<LdpRequest> {
    let target = app.target(parts.uri.path())?;
    let credentials = credentials_from_headers(&parts.headers);
    let preferences = preferences_from_headers(&parts.headers);
    let body = parse_body(app.body_parser(), raw_body(&parts.headers, body, &target)).await?;

    let mut operation = Operation::new(parts.method.as_str(), target).with_preferences(preferences);
    operation.body = body;
    Ok(LdpRequest {
        credentials,
        operation,
    })
}
