use std::sync::Arc;

use tokio::net::TcpListener;

use crate::app::LdpApp;
use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;

/// LDP resource server.
pub struct LdpServer {
    config: ServerConfig,
    app: Arc<LdpApp>,
}

impl LdpServer {
    pub fn new(config: ServerConfig) -> ServerResult<Self> {
        let app = Arc::new(LdpApp::from_config(&config)?);
        Ok(Self { config, app })
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn app(&self) -> &Arc<LdpApp> {
        &self.app
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.app.clone())
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            bind_addr = %self.config.bind_addr,
            base_url = %self.config.base_url,
            "LDP server listening"
        );
        axum::serve(listener, app).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_construction() {
        let server = LdpServer::new(ServerConfig::default()).unwrap();
        assert_eq!(server.config().bind_addr, "127.0.0.1:3000".parse().unwrap());
        assert_eq!(server.app().root().as_str(), "http://localhost:3000/");
    }

    #[test]
    fn router_builds() {
        let server = LdpServer::new(ServerConfig::default()).unwrap();
        let _router = server.router();
    }
}
