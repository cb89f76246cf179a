//! Server configuration

use crate::CorsPolicy;

/// Port used when no port is configured
pub const DEFAULT_PORT: u16 = 3001;

/// Configuration injected into the server at startup
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// TCP port to listen on (all interfaces)
    pub port: u16,
    /// Cross-origin access policy
    pub cors: CorsPolicy,
}
