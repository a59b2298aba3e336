//! Cumulative interface byte counters.

use sysinfo::Networks;

use crate::error::SampleError;

/// Summed cumulative counters over the watched interfaces
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub bytes_received: u64,
    pub bytes_sent: u64,
}

/// Anything that can report cumulative rx/tx byte counters.
pub trait CounterSource {
    fn read(&mut self) -> Result<Counters, SampleError>;
}

/// Counter source backed by `sysinfo`, summing the configured interfaces
/// (or every non-loopback interface when none are configured).
pub struct SysinfoCounters {
    networks: Networks,
    interfaces: Vec<String>,
}

impl SysinfoCounters {
    pub fn new(interfaces: Vec<String>) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            interfaces,
        }
    }
}

impl CounterSource for SysinfoCounters {
    fn read(&mut self) -> Result<Counters, SampleError> {
        // true = drop interfaces that disappeared since the last refresh
        self.networks.refresh(true);

        sum_interfaces(
            self.networks
                .iter()
                .map(|(name, data)| (name.as_str(), data.total_received(), data.total_transmitted())),
            &self.interfaces,
        )
    }
}

/// Loopback traffic never leaves the host, so it is left out of the default set.
pub fn is_loopback(name: &str) -> bool {
    name == "lo" || name.starts_with("lo0") || name.to_ascii_lowercase().contains("loopback")
}

/// Sum `(name, rx, tx)` triples, keeping only `wanted` names (or all
/// non-loopback names when `wanted` is empty).
pub fn sum_interfaces<'a, I>(entries: I, wanted: &[String]) -> Result<Counters, SampleError>
where
    I: IntoIterator<Item = (&'a str, u64, u64)>,
{
    let mut seen_any = false;
    let mut matched = false;
    let mut totals = Counters::default();

    for (name, rx, tx) in entries {
        seen_any = true;
        let keep = if wanted.is_empty() {
            !is_loopback(name)
        } else {
            wanted.iter().any(|w| w == name)
        };
        if keep {
            matched = true;
            totals.bytes_received = totals.bytes_received.saturating_add(rx);
            totals.bytes_sent = totals.bytes_sent.saturating_add(tx);
        }
    }

    if !seen_any {
        return Err(SampleError::InterfaceEnumeration);
    }
    if !matched && !wanted.is_empty() {
        return Err(SampleError::NoMatchingInterface(wanted.to_vec()));
    }
    Ok(totals)
}
