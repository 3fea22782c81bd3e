use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ServerError, ServerResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Public URL of the root container. Request paths are resolved against
    /// it, so it must end in `/`.
    pub base_url: String,
    /// Type every document is stored in. Empty stores bodies as sent.
    pub canonical_content_type: String,
    /// Patch lock acquisition timeout. `0` waits forever.
    pub lock_timeout_ms: u64,
    /// Most containers searched upwards for a policy document.
    pub max_acl_depth: usize,
    /// Write a public root policy at startup if none exists.
    pub bootstrap_root_acl: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: "http://localhost:3000/".into(),
            canonical_content_type: "text/turtle".into(),
            lock_timeout_ms: 30_000,
            max_acl_depth: 32,
            bootstrap_root_acl: true,
        }
    }
}

impl ServerConfig {
    pub fn from_toml_str(text: &str) -> ServerResult<Self> {
        toml::from_str(text).map_err(|e| ServerError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> ServerResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn canonical_type(&self) -> Option<&str> {
        Some(self.canonical_content_type.as_str()).filter(|ty| !ty.is_empty())
    }

    pub fn lock_timeout(&self) -> Option<Duration> {
        (self.lock_timeout_ms > 0).then(|| Duration::from_millis(self.lock_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(c.base_url, "http://localhost:3000/");
        assert_eq!(c.canonical_type(), Some("text/turtle"));
        assert_eq!(c.lock_timeout(), Some(Duration::from_secs(30)));
        assert_eq!(c.max_acl_depth, 32);
        assert!(c.bootstrap_root_acl);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = ServerConfig::from_toml_str(
            "base_url = \"https://pod.example/\"\nlock_timeout_ms = 0\n",
        )
        .unwrap();
        assert_eq!(c.base_url, "https://pod.example/");
        assert_eq!(c.lock_timeout(), None);
        assert_eq!(c.max_acl_depth, 32);
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let err = ServerConfig::from_toml_str("max_acl_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ServerError::Config(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let c = ServerConfig {
            canonical_content_type: String::new(),
            ..ServerConfig::default()
        };
        let text = toml::to_string(&c).unwrap();
        let parsed = ServerConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, c);
        assert_eq!(parsed.canonical_type(), None);
    }
}
