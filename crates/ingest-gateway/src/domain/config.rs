//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// HTTP server configuration
    pub http: HttpConfig,
    /// Message bus (Kafka) configuration
    pub bus: BusConfig,
    /// Readiness probe configuration
    pub health: HealthConfig,
    /// CORS configuration
    pub cors: CorsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            bus: BusConfig::default(),
            health: HealthConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bus.bootstrap_servers.is_empty()
            || self.bus.bootstrap_servers.iter().any(|s| s.trim().is_empty())
        {
            return Err(ConfigError::InvalidBus(
                "bootstrap_servers cannot be empty".into(),
            ));
        }

        if self.bus.topic.trim().is_empty() {
            return Err(ConfigError::InvalidBus("topic cannot be empty".into()));
        }

        if self.health.probe_timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(
                "probe timeout cannot be 0".into(),
            ));
        }

        Ok(())
    }

    /// Get HTTP server bind address
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.http.host, self.http.port)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Bind address
    pub host: IpAddr,
    /// Port (default: 9001)
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)),
            port: 9001,
        }
    }
}

/// Message bus configuration.
///
/// The topic is bound here once at process-configuration time; the publish
/// path never routes to more than this single destination.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BusConfig {
    /// Broker bootstrap list
    pub bootstrap_servers: Vec<String>,
    /// Destination topic for enriched events
    pub topic: String,
    /// TLS material (optional)
    pub tls: Option<TlsConfig>,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            bootstrap_servers: vec!["localhost:9092".to_string()],
            topic: "quickstart".to_string(),
            tls: None,
        }
    }
}

/// TLS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TlsConfig {
    /// Path to CA certificate file
    pub ca_location: String,
    /// Path to client certificate file
    pub certificate_location: String,
    /// Path to client key file
    pub key_location: String,
}

/// Readiness probe configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Bound on the broker readiness probe (in seconds)
    pub probe_timeout_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            probe_timeout_secs: 5,
        }
    }
}

impl HealthConfig {
    /// Probe timeout as a `Duration`
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

/// CORS configuration.
///
/// `t`, `v` and `messageid` are producer-supplied pass-through headers;
/// they are accepted at the boundary but never read by the core.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origins ("*" for all)
    pub allowed_origins: Vec<String>,
    /// Allowed methods
    pub allowed_methods: Vec<String>,
    /// Allowed headers
    pub allowed_headers: Vec<String>,
    /// Allow credentials
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            allowed_headers: vec![
                "Content-Type".to_string(),
                "t".to_string(),
                "v".to_string(),
                "messageid".to_string(),
            ],
            allow_credentials: true,
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Invalid bus configuration
    #[error("invalid bus configuration: {0}")]
    InvalidBus(String),
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
}
