//! Connectivity probes gate whether a fetch is attempted at all.

use async_trait::async_trait;
use std::{fmt::Debug, time::Duration};
use tokio::{net::TcpStream, time::timeout};

pub const DEFAULT_PROBE_HOST: &str = "api.openweathermap.org";
pub const DEFAULT_PROBE_PORT: u16 = 443;

const PROBE_TIMEOUT: Duration = Duration::from_secs(3);

#[async_trait]
pub trait ConnectivityProbe: Send + Sync + Debug {
    async fn is_online(&self) -> bool;
}

/// Probe for hosts that gate connectivity themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysOnline;

#[async_trait]
impl ConnectivityProbe for AlwaysOnline {
    async fn is_online(&self) -> bool {
        true
    }
}

/// Reports the network reachable iff a TCP connection to `host:port` opens in time.
#[derive(Debug, Clone)]
pub struct TcpProbe {
    host: String,
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            timeout: PROBE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TcpProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_HOST, DEFAULT_PROBE_PORT)
    }
}

#[async_trait]
impl ConnectivityProbe for TcpProbe {
    async fn is_online(&self) -> bool {
        let addr = (self.host.as_str(), self.port);

        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_)) => true,
            Ok(Err(e)) => {
                tracing::debug!(host = %self.host, port = self.port, error = %e, "connectivity probe failed");
                false
            }
            Err(_) => {
                tracing::debug!(host = %self.host, port = self.port, "connectivity probe timed out");
                false
            }
        }
    }
}
