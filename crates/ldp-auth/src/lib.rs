//! Web Access Control for the LDP server.
//!
//! [`AclAuthorizer`] decides whether credentials hold the modes an operation
//! needs, reading policy documents through a resource store and walking up
//! the container hierarchy until one is found.

pub mod authorizer;
pub mod manager;
pub mod policy;

pub use authorizer::{AclAuthorizer, Authorizer, AuthorizerArgs, AuthorizerConfig};
pub use manager::{AclManager, UrlBasedAclManager};
pub use policy::public_container_policy;
