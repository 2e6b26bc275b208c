//! TCP dial probe.
//!
//! Opens a connection to `host:port` within a timeout and closes it
//! straight away. No bytes are exchanged.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use tcpcheck_core::Target;

/// Dial timeout used when none is configured.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(5);

/// Why a dial failed. Logged, then collapsed into `success = false`.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("connection timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(#[from] io::Error),
}

/// Outcome of one probe. Lives for a single cycle.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub target: Arc<Target>,
    pub success: bool,
    pub duration: Duration,
}

/// Something that can check a target's reachability.
pub trait Prober: Send + Sync + 'static {
    fn probe(&self, target: Arc<Target>) -> impl Future<Output = ProbeResult> + Send;
}

/// Probes targets with a single bounded TCP connect.
#[derive(Debug, Clone)]
pub struct TcpProber {
    timeout: Duration,
}

impl TcpProber {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(DEFAULT_DIAL_TIMEOUT)
    }
}

impl TcpProber {
    /// Probe using `connect` to open the connection. The stream is
    /// dropped as soon as it is established.
    async fn probe_with<F, Fut, S>(&self, target: Arc<Target>, connect: F) -> ProbeResult
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = io::Result<S>>,
    {
        let address = target.address();
        debug!(%address, env = %target.env(), alias = %target.alias(), "checking endpoint");

        let start = Instant::now();
        let outcome = within(self.timeout, connect(address.clone()))
            .await
            .map(drop);
        let duration = start.elapsed();

        let success = match outcome {
            Ok(()) if target.is_annotated() => {
                info!(%address, env = %target.env(), alias = %target.alias(), ?duration, "connected");
                true
            }
            Ok(()) => {
                info!(%address, ?duration, "connected");
                true
            }
            Err(e) => {
                warn!(%address, env = %target.env(), alias = %target.alias(), error = %e, ?duration, "connection failed");
                false
            }
        };

        ProbeResult {
            target,
            success,
            duration,
        }
    }
}

impl Prober for TcpProber {
    async fn probe(&self, target: Arc<Target>) -> ProbeResult {
        self.probe_with(target, TcpStream::connect).await
    }
}

async fn within<F, T>(timeout: Duration, fut: F) -> Result<T, ProbeError>
where
    F: Future<Output = io::Result<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(ProbeError::Connect(e)),
        Err(_) => Err(ProbeError::Timeout(timeout)),
    }
}
