//! tcpcheck-health — TCP reachability probes and the check cycle.
//!
//! # Architecture
//!
//! ```text
//! CheckScheduler::run()
//!   └── every interval: run_cycle()
//!       ├── one task per Target (optionally capped by a semaphore)
//!       │   ├── Prober::probe() → ProbeResult
//!       │   └── MetricsRegistry::set_up(labels, success)
//!       └── wait for all tasks → CycleReport
//! ```
//!
//! A probe is a single bounded TCP dial. Failures of any kind (timeout,
//! refusal, DNS) collapse to `success = false`; there are no retries and
//! no backoff. One slow target never holds up its siblings beyond its
//! own dial timeout.

pub mod checker;
pub mod monitor;

pub use checker::{DEFAULT_DIAL_TIMEOUT, ProbeError, ProbeResult, Prober, TcpProber};
pub use monitor::{CheckScheduler, CycleReport};
