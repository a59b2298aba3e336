//! Line-per-tick output for pipes and scripts (`--plain`).

use std::io::{self, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::{DateTime, Local, TimeZone};

use crate::config::NetpulseConfig;
use crate::system::counters::SysinfoCounters;
use crate::system::reachability::DefaultRouteProbe;
use crate::system::sampler::{Monitor, Reading};

/// `HH:MM:SS  down 2.0 KB/s  up 512 B/s  online`
///
/// Baseline and skipped ticks have no rate and print `-` for both speeds.
pub fn format_line(reading: &Reading, at: DateTime<Local>) -> String {
    let down = reading.download().unwrap_or_else(|| "-".to_string());
    let up = reading.upload().unwrap_or_else(|| "-".to_string());
    let state = if reading.connected { "online" } else { "offline" };
    format!("{}  down {down}  up {up}  {state}", at.format("%H:%M:%S"))
}

fn local_time(timestamp_millis: i64) -> DateTime<Local> {
    Local
        .timestamp_millis_opt(timestamp_millis)
        .single()
        .unwrap_or_else(Local::now)
}

/// When plain mode should stop, if ever. A deadline past what `Instant` can
/// hold means no deadline.
fn countdown_deadline(now: Instant, countdown_secs: u64) -> Option<Instant> {
    if countdown_secs == 0 {
        return None;
    }
    now.checked_add(Duration::from_secs(countdown_secs))
}

/// Print readings until `count` ticks have gone by, the countdown runs out,
/// or stdout goes away.
pub fn run(config: &NetpulseConfig, count: Option<u64>) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let mut monitor = Monitor::new();
    monitor
        .start(
            Duration::from_millis(config.update_interval_ms),
            SysinfoCounters::new(config.interfaces.clone()),
            DefaultRouteProbe,
            tx,
        )
        .context("unable to start the sampler")?;

    let deadline = countdown_deadline(Instant::now(), config.countdown_secs);

    let stdout = io::stdout();
    let mut printed = 0u64;
    loop {
        let reading = match deadline {
            Some(deadline) => {
                let Some(left) = deadline.checked_duration_since(Instant::now()) else {
                    break;
                };
                match rx.recv_timeout(left) {
                    Ok(reading) => reading,
                    Err(mpsc::RecvTimeoutError::Timeout) => break,
                    Err(mpsc::RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match rx.recv() {
                Ok(reading) => reading,
                Err(_) => break,
            },
        };

        let line = format_line(&reading, local_time(reading.timestamp_millis));
        let mut out = stdout.lock();
        if writeln!(out, "{line}").and_then(|_| out.flush()).is_err() {
            // Closed pipe, e.g. `netpulse --plain | head -3`
            log::debug!("stdout closed, stopping");
            break;
        }

        printed += 1;
        if count.is_some_and(|n| printed >= n) {
            break;
        }
    }

    monitor.stop();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SampleError;
    use crate::system::counters::Counters;
    use crate::system::network::Rate;

    fn noon() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 12, 0, 7).unwrap()
    }

    #[test]
    fn measured_line() {
        let reading = Reading {
            timestamp_millis: 0,
            rate: Some(Rate {
                bytes_per_sec_down: 2_000.0,
                bytes_per_sec_up: 512.0,
            }),
            counters: Some(Counters {
                bytes_received: 3_000,
                bytes_sent: 512,
            }),
            connected: true,
            skipped: None,
        };
        assert_eq!(
            format_line(&reading, noon()),
            "12:00:07  down 2.0 KB/s  up 512 B/s  online"
        );
    }

    #[test]
    fn countdown_deadlines() {
        let now = Instant::now();
        assert_eq!(countdown_deadline(now, 0), None);
        assert_eq!(countdown_deadline(now, 90), Some(now + Duration::from_secs(90)));
        assert_eq!(countdown_deadline(now, u64::MAX), None);
    }

    #[test]
    fn skipped_line_uses_dashes() {
        let reading = Reading {
            timestamp_millis: 0,
            rate: None,
            counters: None,
            connected: false,
            skipped: Some(SampleError::InterfaceEnumeration),
        };
        assert_eq!(format_line(&reading, noon()), "12:00:07  down -  up -  offline");
    }
}
