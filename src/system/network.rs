//! Interface byte-counter samples and the rates derived from them.

/// One reading of the cumulative interface counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    /// Wall-clock time of the read, in milliseconds since the Unix epoch
    pub timestamp_millis: i64,
    /// Cumulative bytes received since the interface came up
    pub bytes_received: u64,
    /// Cumulative bytes sent since the interface came up
    pub bytes_sent: u64,
}

/// Throughput between two samples
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rate {
    pub bytes_per_sec_down: f64,
    pub bytes_per_sec_up: f64,
}

impl Rate {
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Derive upload/download throughput from two consecutive samples.
///
/// A non-increasing timestamp (clock stepped back, duplicate tick) yields a
/// zero rate. A counter that went backwards (interface reset) contributes
/// zero for that direction instead of underflowing.
pub fn compute_rate(previous: &Sample, current: &Sample) -> Rate {
    let elapsed_millis = match current.timestamp_millis.checked_sub(previous.timestamp_millis) {
        Some(ms) if ms > 0 => ms,
        _ => return Rate::zero(),
    };

    let elapsed_secs = elapsed_millis as f64 / 1000.0;
    let rx_diff = current.bytes_received.saturating_sub(previous.bytes_received);
    let tx_diff = current.bytes_sent.saturating_sub(previous.bytes_sent);

    Rate {
        bytes_per_sec_down: rx_diff as f64 / elapsed_secs,
        bytes_per_sec_up: tx_diff as f64 / elapsed_secs,
    }
}

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * KIB;
const GIB: f64 = 1024.0 * MIB;

/// Format a throughput as B/s, KB/s or MB/s.
pub fn format_speed(bytes_per_sec: f64) -> String {
    // NaN and negatives have no meaningful speed
    let value = if bytes_per_sec.is_finite() && bytes_per_sec > 0.0 {
        bytes_per_sec
    } else {
        0.0
    };

    if value >= MIB {
        format!("{:.1} MB/s", value / MIB)
    } else if value >= KIB {
        format!("{:.1} KB/s", value / KIB)
    } else {
        format!("{:.0} B/s", value)
    }
}

/// Format a cumulative byte count (B, KB, MB, GB)
pub fn format_bytes(bytes: u64) -> String {
    let b = bytes as f64;
    if b >= GIB {
        format!("{:.2} GB", b / GIB)
    } else if b >= MIB {
        format!("{:.1} MB", b / MIB)
    } else if b >= KIB {
        format!("{:.1} KB", b / KIB)
    } else {
        format!("{} B", bytes)
    }
}

/// What the presentation layer shows for the network (latest tick)
#[derive(Debug, Clone)]
pub struct NetworkInfo {
    /// Download speed, already formatted
    pub download: String,
    /// Upload speed, already formatted
    pub upload: String,
    /// Latest raw rate, if one has been computed yet
    pub rate: Option<Rate>,
    /// Total received across the watched interfaces
    pub total_rx: u64,
    /// Total transmitted across the watched interfaces
    pub total_tx: u64,
}

impl Default for NetworkInfo {
    fn default() -> Self {
        Self {
            download: format_speed(0.0),
            upload: format_speed(0.0),
            rate: None,
            total_rx: 0,
            total_tx: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(timestamp_millis: i64, bytes_received: u64, bytes_sent: u64) -> Sample {
        Sample {
            timestamp_millis,
            bytes_received,
            bytes_sent,
        }
    }

    #[test]
    fn rate_is_diff_over_elapsed_seconds() {
        let rate = compute_rate(&sample(1_000, 10_000, 500), &sample(3_000, 14_000, 1_500));
        assert_eq!(rate.bytes_per_sec_down, 2_000.0);
        assert_eq!(rate.bytes_per_sec_up, 500.0);
    }

    #[test]
    fn rate_handles_sub_second_intervals() {
        let rate = compute_rate(&sample(0, 0, 0), &sample(250, 1_000, 0));
        assert_eq!(rate.bytes_per_sec_down, 4_000.0);
        assert_eq!(rate.bytes_per_sec_up, 0.0);
    }

    #[test]
    fn counter_rollback_clamps_to_zero() {
        let rate = compute_rate(&sample(0, 50_000, 100), &sample(1_000, 10, 1_124));
        assert_eq!(rate.bytes_per_sec_down, 0.0);
        assert_eq!(rate.bytes_per_sec_up, 1_024.0);
    }

    #[test]
    fn backwards_or_equal_clock_gives_zero_rate() {
        let prev = sample(5_000, 0, 0);
        assert_eq!(compute_rate(&prev, &sample(5_000, 9_999, 9_999)), Rate::zero());
        assert_eq!(compute_rate(&prev, &sample(4_000, 9_999, 9_999)), Rate::zero());
    }

    #[test]
    fn timestamps_too_far_apart_give_zero_rate() {
        let prev = sample(i64::MIN, 0, 0);
        let cur = sample(i64::MAX, 1_000, 1_000);
        assert_eq!(compute_rate(&prev, &cur), Rate::zero());
    }

    #[test]
    fn format_speed_thresholds() {
        assert_eq!(format_speed(0.0), "0 B/s");
        assert_eq!(format_speed(1023.0), "1023 B/s");
        assert_eq!(format_speed(1024.0), "1.0 KB/s");
        assert_eq!(format_speed(2048.0), "2.0 KB/s");
        assert_eq!(format_speed(2000.0), "2.0 KB/s");
        assert_eq!(format_speed(1_048_576.0), "1.0 MB/s");
        assert_eq!(format_speed(5_242_880.0), "5.0 MB/s");
    }

    #[test]
    fn format_speed_rejects_garbage() {
        assert_eq!(format_speed(-10.0), "0 B/s");
        assert_eq!(format_speed(f64::NAN), "0 B/s");
        assert_eq!(format_speed(f64::INFINITY), "0 B/s");
    }

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
        assert_eq!(format_bytes(5 * 1024 * 1024 * 1024), "5.00 GB");
    }
}
