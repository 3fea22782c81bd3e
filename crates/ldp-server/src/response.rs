//! Writing operation results as HTTP responses.

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, LOCATION};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use ldp_operations::{ResponseDescription, ResponseKind};
use ldp_types::{LdpError, LdpResult, ResourceIdentifier};

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError(pub LdpError);

impl From<LdpError> for ApiError {
    fn from(e: LdpError) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(%status, error = %self.0, "request rejected");
        }
        (status, self.0.to_string()).into_response()
    }
}

fn header_value(value: &str) -> LdpResult<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| LdpError::Internal(format!("invalid header value {value:?}: {e}")))
}

fn with_location(status: StatusCode, identifier: &ResourceIdentifier) -> LdpResult<Response> {
    Ok((status, [(LOCATION, header_value(identifier.as_str())?)]).into_response())
}

/// Status, headers and body for a completed operation.
pub fn write_response(description: ResponseDescription) -> Result<Response, ApiError> {
    let ResponseDescription { identifier, kind } = description;
    let response = match kind {
        ResponseKind::Representation(representation) => {
            if !representation.is_binary() {
                return Err(LdpError::UnsupportedMediaType(format!(
                    "{} cannot be serialized for transfer",
                    representation.content_type().unwrap_or("unknown type")
                ))
                .into());
            }
            let content_type = representation.metadata.content_type.clone();
            let body = Body::from_stream(representation.into_byte_stream()?);
            let mut response = (StatusCode::OK, body).into_response();
            if let Some(content_type) = content_type {
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, header_value(&content_type)?);
            }
            response
        }
        ResponseKind::Metadata(metadata) => {
            let mut response = StatusCode::OK.into_response();
            if let Some(content_type) = &metadata.content_type {
                response
                    .headers_mut()
                    .insert(CONTENT_TYPE, header_value(content_type)?);
            }
            response
        }
        ResponseKind::Created => with_location(StatusCode::CREATED, &identifier)?,
        ResponseKind::Reset => with_location(StatusCode::RESET_CONTENT, &identifier)?,
    };
    Ok(response)
}
