use std::sync::Arc;

use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};

use crate::app::LdpApp;
use crate::request::parse_request;
use crate::response::{write_response, ApiError};

/// Serves every LDP request: parse, authorize, run, write.
pub async fn ldp_handler(State(app): State<Arc<LdpApp>>, request: Request) -> Response {
    match handle(&app, request).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn handle(app: &LdpApp, request: Request) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();
    let request = parse_request(app, parts, body).await?;
    let description = app.handle(request).await?;
    write_response(description)
}
