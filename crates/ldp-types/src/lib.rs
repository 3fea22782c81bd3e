//! Foundation types for the LDP server.
//!
//! Every other crate in the workspace builds on these definitions: resource
//! identifiers, representations and their metadata, content preferences,
//! permission sets, credentials, patches, the shared error taxonomy, and the
//! capability-checked handler abstraction used for all pluggable behavior.
//!
//! # Key Types
//!
//! - [`ResourceIdentifier`] -- normalized absolute resource IRI
//! - [`Representation`] -- metadata plus a lazy byte or quad stream
//! - [`RepresentationPreferences`] -- weighted media-type preferences
//! - [`PermissionSet`] -- the access modes an operation requires
//! - [`AsyncHandler`] / [`Dispatcher`] -- "can handle, then handle" composition
//! - [`LdpError`] -- error taxonomy shared by all layers

pub mod credentials;
pub mod error;
pub mod handler;
pub mod identifier;
pub mod media;
pub mod patch;
pub mod permissions;
pub mod preferences;
pub mod representation;

pub use credentials::Credentials;
pub use error::{LdpError, LdpResult};
pub use handler::{AsyncHandler, Committed, Dispatcher};
pub use identifier::ResourceIdentifier;
pub use patch::Patch;
pub use permissions::{AccessMode, PermissionSet};
pub use preferences::{Preference, RepresentationPreferences};
pub use representation::{
    ByteStream, QuadStream, Representation, RepresentationData, RepresentationMetadata,
};
