//! HTTP binding for the LDP server.
//!
//! Every request is mapped onto a resource under the configured base URL,
//! parsed into an operation, authorized against Web Access Control policies,
//! and executed on the layered resource stores.

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod handler;
pub mod request;
pub mod response;
pub mod router;
pub mod server;

pub use app::LdpApp;
pub use auth::credentials_from_headers;
pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::LdpServer;
