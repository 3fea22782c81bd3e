use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::app::LdpApp;
use crate::handler;

/// Build the axum router. Every path and method is an LDP request.
pub fn build_router(app: Arc<LdpApp>) -> Router {
    Router::new()
        .fallback(handler::ldp_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(app)
}
