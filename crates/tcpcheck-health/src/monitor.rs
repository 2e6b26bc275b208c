//! Check scheduler — background loop that probes every target each cycle.
//!
//! A cycle fans out one task per target, records each outcome in the
//! [`MetricsRegistry`] as soon as the probe returns, and waits for all
//! tasks before sleeping. The loop runs until the shutdown signal fires.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Semaphore, watch};
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info};

use tcpcheck_core::Target;
use tcpcheck_metrics::MetricsRegistry;

use crate::checker::{ProbeResult, Prober};

/// Everything one cycle produced. Logged, never exported.
#[derive(Debug)]
pub struct CycleReport {
    pub results: Vec<ProbeResult>,
    pub duration: Duration,
}

impl CycleReport {
    pub fn up_count(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn down_count(&self) -> usize {
        self.results.len() - self.up_count()
    }
}

/// Drives periodic check cycles over a fixed target list.
pub struct CheckScheduler<P> {
    /// Loaded once at startup.
    targets: Arc<[Arc<Target>]>,
    prober: Arc<P>,
    registry: MetricsRegistry,
    interval: Duration,
    /// Caps concurrent dials when set; `None` means one task per target.
    limiter: Option<Arc<Semaphore>>,
}

impl<P: Prober> CheckScheduler<P> {
    pub fn new(
        targets: Vec<Target>,
        prober: P,
        registry: MetricsRegistry,
        interval: Duration,
    ) -> Self {
        Self {
            targets: targets.into_iter().map(Arc::new).collect(),
            prober: Arc::new(prober),
            registry,
            interval,
            limiter: None,
        }
    }

    /// Limit the number of probes in flight. Zero is treated as one.
    pub fn with_max_concurrency(mut self, limit: usize) -> Self {
        self.limiter = Some(Arc::new(Semaphore::new(limit.max(1))));
        self
    }

    pub fn targets(&self) -> &[Arc<Target>] {
        &self.targets
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Probe every target concurrently and wait for all of them.
    ///
    /// Each task writes its gauge before returning, so the registry is
    /// fully updated once this resolves. A panicking probe is logged and
    /// leaves its series untouched.
    pub async fn run_cycle(&self) -> CycleReport {
        let start = Instant::now();
        info!(targets = self.targets.len(), "starting concurrent checks");

        let mut tasks = JoinSet::new();
        for target in self.targets.iter() {
            let target = Arc::clone(target);
            let prober = Arc::clone(&self.prober);
            let registry = self.registry.clone();
            let limiter = self.limiter.clone();

            tasks.spawn(async move {
                // The semaphore is never closed.
                let _permit = match limiter {
                    Some(sem) => sem.acquire_owned().await.ok(),
                    None => None,
                };
                let result = prober.probe(target).await;
                registry
                    .set_up(&result.target.labels(), result.success)
                    .await;
                result
            });
        }

        let mut results = Vec::with_capacity(self.targets.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => error!(error = %e, "probe task failed"),
            }
        }

        let report = CycleReport {
            results,
            duration: start.elapsed(),
        };
        info!(
            duration = ?report.duration,
            up = report.up_count(),
            down = report.down_count(),
            "completed all checks"
        );
        report
    }

    /// Run cycles until `shutdown` fires or its sender is dropped.
    ///
    /// The first cycle starts immediately; later ones start `interval`
    /// after the previous cycle finished.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval().as_secs(),
            targets = self.targets().len(),
            "check scheduler started"
        );

        loop {
            let stopped = *shutdown.borrow();
            if stopped {
                break;
            }

            tokio::select! {
                _ = self.run_cycle() => {}
                _ = shutdown.changed() => break,
            }

            debug!(interval = ?self.interval, "sleeping until next cycle");
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("check scheduler shutting down");
    }
}
