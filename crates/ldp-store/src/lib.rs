//! Resource stores for the LDP server.
//!
//! [`ResourceStore`] is the capability set every store exposes. The
//! in-memory backend holds the data; [`ConvertingStore`] and
//! [`PatchingStore`] decorate any store with format conversion and atomic
//! patching, guarded per resource by a [`ResourceLocker`].
//!
//! # Key Types
//!
//! - [`ResourceStore`] -- read, create, replace, delete, patch
//! - [`InMemoryResourceStore`] -- `RwLock`-backed base store
//! - [`ConvertingStore`] -- converts on read and to the canonical type on write
//! - [`PatchingStore`] / [`SparqlUpdatePatcher`] -- locked read-modify-write
//! - [`ContainerManager`] -- parent-container lookup

pub mod container;
pub mod converting;
pub mod locker;
pub mod memory;
pub mod patching;
pub mod traits;

pub use container::{ContainerManager, UrlContainerManager};
pub use converting::ConvertingStore;
pub use locker::{InMemoryResourceLocker, Lock, LockerConfig, ResourceLocker};
pub use memory::{InMemoryResourceStore, LDP};
pub use patching::{PatchArgs, PatchHandler, PatchingStore, SparqlUpdatePatcher};
pub use traits::ResourceStore;
