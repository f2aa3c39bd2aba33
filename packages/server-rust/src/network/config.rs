//! Transport settings: where to listen, TLS, CORS, and request/shutdown timeouts.

use std::path::PathBuf;
use std::time::Duration;

/// How the HTTP listener is set up.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub host: String,
    /// 0 lets the OS pick a free port.
    pub port: u16,
    /// Serve HTTPS instead of plain HTTP when set.
    pub tls: Option<TlsConfig>,
    /// Origins allowed by CORS. `"*"` allows any origin.
    pub cors_origins: Vec<String>,
    /// Requests still running after this long are answered with `408`.
    pub request_timeout: Duration,
    /// Grace period for in-flight requests once shutdown begins.
    pub drain_timeout: Duration,
}

impl NetworkConfig {
    /// `host:port` as handed to the TCP listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 0,
            tls: None,
            cors_origins: vec!["*".to_string()],
            request_timeout: Duration::from_secs(30),
            drain_timeout: Duration::from_secs(30),
        }
    }
}

/// PEM files for HTTPS. Both are required, so there is no default.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}
