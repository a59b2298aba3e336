//! The live activity session: the timestamps the panel counts against.
//!
//! Created when monitoring starts and dropped when it stops, so nothing about
//! a previous session leaks into the next one.

use chrono::{DateTime, Duration, Local};

#[derive(Debug, Clone)]
pub struct ActivitySession {
    pub started_at: DateTime<Local>,
    /// End of the countdown, if the session has one
    pub ends_at: Option<DateTime<Local>>,
    /// Set while the session is paused
    pub paused_at: Option<DateTime<Local>>,
    /// Time of the last reading shown
    pub last_update: Option<DateTime<Local>>,
    /// Number of readings received
    pub updates: u64,
    paused_total: Duration,
}

impl ActivitySession {
    /// A countdown that would run past the end of the calendar is dropped.
    pub fn start(now: DateTime<Local>, countdown: Option<Duration>) -> Self {
        Self {
            started_at: now,
            ends_at: countdown.and_then(|c| now.checked_add_signed(c)),
            paused_at: None,
            last_update: None,
            updates: 0,
            paused_total: Duration::zero(),
        }
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn pause(&mut self, now: DateTime<Local>) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Resume after a pause. The countdown end moves out by the paused span.
    pub fn resume(&mut self, now: DateTime<Local>) {
        if let Some(paused_at) = self.paused_at.take() {
            let span = (now - paused_at).max(Duration::zero());
            self.paused_total = self.paused_total + span;
            if let Some(ends_at) = self.ends_at.as_mut() {
                *ends_at = ends_at.checked_add_signed(span).unwrap_or(*ends_at);
            }
        }
    }

    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        if self.is_paused() {
            self.resume(now);
        } else {
            self.pause(now);
        }
    }

    pub fn record_update(&mut self, now: DateTime<Local>) {
        self.last_update = Some(now);
        self.updates += 1;
    }

    /// The clock the countdown runs on: frozen at the pause time while paused
    fn effective_now(&self, now: DateTime<Local>) -> DateTime<Local> {
        self.paused_at.unwrap_or(now)
    }

    /// Active (unpaused) time since the session started
    pub fn elapsed(&self, now: DateTime<Local>) -> Duration {
        (self.effective_now(now) - self.started_at - self.paused_total).max(Duration::zero())
    }

    /// Time left on the countdown, never negative
    pub fn remaining(&self, now: DateTime<Local>) -> Option<Duration> {
        let ends_at = self.ends_at?;
        Some((ends_at - self.effective_now(now)).max(Duration::zero()))
    }

    /// Fraction of the countdown used up, in `0.0..=1.0`
    pub fn progress(&self, now: DateTime<Local>) -> Option<f64> {
        let ends_at = self.ends_at?;
        let total = (ends_at - self.started_at - self.paused_total).num_milliseconds();
        if total <= 0 {
            return Some(1.0);
        }
        let used = self.elapsed(now).num_milliseconds() as f64 / total as f64;
        Some(used.clamp(0.0, 1.0))
    }

    pub fn is_expired(&self, now: DateTime<Local>) -> bool {
        !self.is_paused() && self.remaining(now).is_some_and(|r| r <= Duration::zero())
    }
}

/// `MM:SS`, or `H:MM:SS` past an hour
pub fn format_clock(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m:02}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn at(secs: i64) -> DateTime<Local> {
        Local.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn countdown_counts_down() {
        let session = ActivitySession::start(at(0), Some(Duration::seconds(200)));
        assert_eq!(session.remaining(at(50)), Some(Duration::seconds(150)));
        assert_eq!(session.progress(at(50)), Some(0.25));
        assert!(!session.is_expired(at(199)));
        assert!(session.is_expired(at(200)));
        assert_eq!(session.remaining(at(500)), Some(Duration::zero()));
        assert_eq!(session.progress(at(500)), Some(1.0));
    }

    #[test]
    fn unrepresentable_countdown_is_dropped() {
        let session = ActivitySession::start(at(0), Some(Duration::MAX));
        assert_eq!(session.ends_at, None);
        assert!(!session.is_expired(at(0)));
    }

    #[test]
    fn no_countdown_never_expires() {
        let session = ActivitySession::start(at(0), None);
        assert_eq!(session.remaining(at(10_000)), None);
        assert_eq!(session.progress(at(10_000)), None);
        assert!(!session.is_expired(at(10_000)));
        assert_eq!(session.elapsed(at(90)), Duration::seconds(90));
    }

    #[test]
    fn pause_freezes_and_resume_extends() {
        let mut session = ActivitySession::start(at(0), Some(Duration::seconds(100)));
        session.pause(at(40));
        assert_eq!(session.remaining(at(90)), Some(Duration::seconds(60)));
        assert_eq!(session.elapsed(at(90)), Duration::seconds(40));
        assert!(!session.is_expired(at(500)));

        session.resume(at(90));
        assert!(!session.is_paused());
        assert_eq!(session.ends_at, Some(at(150)));
        assert_eq!(session.remaining(at(100)), Some(Duration::seconds(50)));
        assert_eq!(session.elapsed(at(100)), Duration::seconds(50));
        assert_eq!(session.progress(at(100)), Some(0.5));
    }

    #[test]
    fn toggle_and_double_pause() {
        let mut session = ActivitySession::start(at(0), None);
        session.toggle_pause(at(5));
        session.pause(at(8));
        assert_eq!(session.paused_at, Some(at(5)));
        session.toggle_pause(at(10));
        assert!(!session.is_paused());
        assert_eq!(session.elapsed(at(20)), Duration::seconds(15));
    }

    #[test]
    fn updates_are_recorded() {
        let mut session = ActivitySession::start(at(0), None);
        session.record_update(at(1));
        session.record_update(at(2));
        assert_eq!(session.updates, 2);
        assert_eq!(session.last_update, Some(at(2)));
    }

    #[test]
    fn clock_formatting() {
        assert_eq!(format_clock(Duration::seconds(0)), "00:00");
        assert_eq!(format_clock(Duration::seconds(125)), "02:05");
        assert_eq!(format_clock(Duration::seconds(3_725)), "1:02:05");
        assert_eq!(format_clock(Duration::seconds(-3)), "00:00");
    }
}
