use std::fmt;
use std::str::FromStr;

use ldp_graph::iri::{remove_dot_segments, split_origin};
use serde::{Deserialize, Serialize};

use crate::error::{LdpError, LdpResult};

/// The absolute IRI of a resource.
///
/// Identifiers are normalized on construction: dot segments and duplicate
/// slashes are removed, and query and fragment are dropped. A trailing slash
/// marks a container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ResourceIdentifier(String);

impl ResourceIdentifier {
    /// Parse and normalize an absolute IRI.
    pub fn parse(raw: &str) -> LdpResult<Self> {
        let (origin, rest) = split_origin(raw);
        if origin.is_empty() {
            return Err(LdpError::UnsupportedOperation(format!(
                "resource identifier must be an absolute IRI: {raw}"
            )));
        }
        let path = rest.split(['?', '#']).next().unwrap_or_default();
        let path = if path.is_empty() {
            "/".to_string()
        } else {
            remove_dot_segments(path)
        };
        Ok(Self(format!("{origin}{path}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Origin part (`scheme://authority`).
    pub fn origin(&self) -> &str {
        split_origin(&self.0).0
    }

    /// Path part, always starting with `/`.
    pub fn path(&self) -> &str {
        split_origin(&self.0).1
    }

    pub fn is_container(&self) -> bool {
        self.0.ends_with('/')
    }

    /// Last path segment, without a trailing slash.
    pub fn name(&self) -> &str {
        self.path()
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
    }

    /// Identifier of a member named `name` inside this container.
    pub fn child(&self, name: &str, container: bool) -> LdpResult<Self> {
        if !self.is_container() {
            return Err(LdpError::UnsupportedOperation(format!(
                "{self} is not a container"
            )));
        }
        if name.is_empty() || name.contains(['/', '?', '#']) || name == "." || name == ".." {
            return Err(LdpError::UnsupportedOperation(format!(
                "invalid member name: {name:?}"
            )));
        }
        let suffix = if container { "/" } else { "" };
        Self::parse(&format!("{}{name}{suffix}", self.0))
    }

    /// The container one path level up, or `None` at the origin root.
    pub fn parent(&self) -> Option<Self> {
        let path = self.path();
        if path == "/" {
            return None;
        }
        let trimmed = path.trim_end_matches('/');
        let cut = trimmed.rfind('/').map_or(1, |idx| idx + 1);
        Some(Self(format!("{}{}", self.origin(), &trimmed[..cut])))
    }

    /// Whether `self` equals `other` or lies below it.
    pub fn is_within(&self, other: &ResourceIdentifier) -> bool {
        self == other || (other.is_container() && self.0.starts_with(&other.0))
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ResourceIdentifier {
    type Err = LdpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ResourceIdentifier {
    type Error = LdpError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for ResourceIdentifier {
    type Error = LdpError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ResourceIdentifier> for String {
    fn from(id: ResourceIdentifier) -> Self {
        id.0
    }
}

impl AsRef<str> for ResourceIdentifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
