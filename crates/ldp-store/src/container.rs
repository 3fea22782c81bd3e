use ldp_types::{LdpError, LdpResult, ResourceIdentifier};

/// Maps a resource to the container holding it.
pub trait ContainerManager: Send + Sync {
    /// Parent container of `identifier`. Fails for the root container.
    fn get_container(&self, identifier: &ResourceIdentifier) -> LdpResult<ResourceIdentifier>;
}

/// Derives containers from identifier paths, bounded by a root.
#[derive(Clone, Debug)]
pub struct UrlContainerManager {
    root: ResourceIdentifier,
}

impl UrlContainerManager {
    pub fn new(root: ResourceIdentifier) -> Self {
        Self { root }
    }
}

impl ContainerManager for UrlContainerManager {
    fn get_container(&self, identifier: &ResourceIdentifier) -> LdpResult<ResourceIdentifier> {
        if identifier == &self.root {
            return Err(LdpError::Internal(format!(
                "root container {identifier} has no parent"
            )));
        }
        match identifier.parent() {
            Some(parent) if parent.is_within(&self.root) => Ok(parent),
            _ => Err(LdpError::Internal(format!(
                "{identifier} is outside the root container {}",
                self.root
            ))),
        }
    }
}
