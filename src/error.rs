use std::time::Duration;

use thiserror::Error;

/// A failure while reading one tick's counters. Always recoverable: the tick
/// is skipped and the previous baseline stays in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SampleError {
    /// The OS reported no network interfaces at all.
    #[error("network interfaces could not be enumerated")]
    InterfaceEnumeration,
    /// None of the configured interfaces exist right now.
    #[error("none of the watched interfaces are present: {}", .0.join(", "))]
    NoMatchingInterface(Vec<String>),
}

/// A failure that prevents the monitor from running.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("sampling interval must be greater than zero, got {0:?}")]
    InvalidInterval(Duration),
    #[error("the monitor is already running")]
    AlreadyRunning,
    #[error("failed to spawn the sampler thread: {0}")]
    Spawn(#[from] std::io::Error),
}
