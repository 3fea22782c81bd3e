//! LDP operations and the authenticated request pipeline.
//!
//! An [`Operation`] is what the transport parsed out of a request. The
//! [`AuthenticatedLdpHandler`] extracts the permissions it needs, asks the
//! authorizer, and then dispatches it to the handler for its method.
//!
//! # Key Types
//!
//! - [`Operation`] / [`ResponseDescription`] -- pipeline input and output
//! - [`handlers`] -- one handler per HTTP method
//! - [`MethodPermissionsExtractor`] / [`SparqlPatchPermissionsExtractor`]
//! - [`SparqlUpdateBodyParser`] / [`RawBodyParser`] -- request body parsing

pub mod body;
pub mod handlers;
pub mod ldp_handler;
pub mod operation;
pub mod permissions;

pub use body::{body_parser_dispatcher, parse_body, BodyParser, RawBody, RawBodyParser, SparqlUpdateBodyParser};
pub use handlers::{operation_dispatcher, OperationHandler};
pub use ldp_handler::{AuthenticatedLdpHandler, LdpRequest};
pub use operation::{Operation, OperationSummary, RequestBody, ResponseDescription, ResponseKind};
pub use permissions::{
    permissions_dispatcher, MethodPermissionsExtractor, PermissionsExtractor,
    SparqlPatchPermissionsExtractor,
};
