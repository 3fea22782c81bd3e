//! Built-in operation handlers, one per HTTP method.

use std::sync::Arc;

use ldp_auth::AclManager;
use ldp_store::ResourceStore;
use ldp_types::{AsyncHandler, Dispatcher};

use crate::operation::{Operation, ResponseDescription};

pub mod delete;
pub mod get;
pub mod head;
pub mod patch;
pub mod post;
pub mod put;

pub use delete::DeleteOperationHandler;
pub use get::GetOperationHandler;
pub use head::HeadOperationHandler;
pub use patch::PatchOperationHandler;
pub use post::PostOperationHandler;
pub use put::PutOperationHandler;

/// Anything that executes operations.
pub type OperationHandler = dyn AsyncHandler<Operation, ResponseDescription>;

/// A dispatcher over every built-in handler, all backed by `store`.
/// `acl_manager` tells `POST` and `PUT` which targets are policy documents.
pub fn operation_dispatcher(
    store: Arc<dyn ResourceStore>,
    acl_manager: Arc<dyn AclManager>,
) -> Dispatcher<Operation, ResponseDescription> {
    let handlers: Vec<Arc<OperationHandler>> = vec![
        Arc::new(GetOperationHandler::new(store.clone())),
        Arc::new(HeadOperationHandler::new(store.clone())),
        Arc::new(PostOperationHandler::new(store.clone(), acl_manager.clone())),
        Arc::new(PutOperationHandler::new(store.clone(), acl_manager)),
        Arc::new(PatchOperationHandler::new(store.clone())),
        Arc::new(DeleteOperationHandler::new(store)),
    ];
    Dispatcher::new("operations", handlers)
}
