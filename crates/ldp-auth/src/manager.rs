use ldp_types::{LdpResult, ResourceIdentifier};

/// Maps resources to the policy documents governing them.
pub trait AclManager: Send + Sync {
    /// Identifier of the policy document for `identifier`. A policy document
    /// maps to itself.
    fn get_acl(&self, identifier: &ResourceIdentifier) -> LdpResult<ResourceIdentifier>;

    /// Whether `identifier` is a policy document.
    fn is_acl(&self, identifier: &ResourceIdentifier) -> bool;
}

/// Policy documents live next to their resource with an `.acl` suffix:
/// `/foo/bar` is governed by `/foo/bar.acl`, `/foo/` by `/foo/.acl`.
#[derive(Clone, Debug)]
pub struct UrlBasedAclManager {
    suffix: String,
}

impl UrlBasedAclManager {
    pub fn new() -> Self {
        Self::with_suffix(".acl")
    }

    pub fn with_suffix(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }
}

impl Default for UrlBasedAclManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AclManager for UrlBasedAclManager {
    fn get_acl(&self, identifier: &ResourceIdentifier) -> LdpResult<ResourceIdentifier> {
        if self.is_acl(identifier) {
            return Ok(identifier.clone());
        }
        ResourceIdentifier::parse(&format!("{identifier}{}", self.suffix))
    }

    fn is_acl(&self, identifier: &ResourceIdentifier) -> bool {
        identifier.as_str().ends_with(&self.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(path: &str) -> ResourceIdentifier {
        ResourceIdentifier::parse(&format!("http://test.com{path}")).unwrap()
    }

    #[test]
    fn acl_names() {
        let manager = UrlBasedAclManager::new();
        assert_eq!(manager.get_acl(&id("/foo/bar")).unwrap(), id("/foo/bar.acl"));
        assert_eq!(manager.get_acl(&id("/foo/")).unwrap(), id("/foo/.acl"));
        assert_eq!(manager.get_acl(&id("/foo/.acl")).unwrap(), id("/foo/.acl"));
    }

    #[test]
    fn acl_detection() {
        let manager = UrlBasedAclManager::default();
        assert!(manager.is_acl(&id("/.acl")));
        assert!(manager.is_acl(&id("/doc.acl")));
        assert!(!manager.is_acl(&id("/foo")));
        assert!(!manager.is_acl(&id("/foo/")));
    }
}
