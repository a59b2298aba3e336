use std::collections::VecDeque;
use std::time::Duration;

use chrono::{DateTime, Local};

use crate::color_scheme::{ColorScheme, ColorSchemeId};
use crate::config::{NetpulseConfig, MAX_INTERVAL_MS, MIN_INTERVAL_MS};
use crate::error::SampleError;
use crate::session::ActivitySession;
use crate::system::network::{format_speed, NetworkInfo};
use crate::system::sampler::Reading;

/// Number of download samples kept for the sparkline
pub const HISTORY_LEN: usize = 120;

/// Interval steps for the +/- keys, in milliseconds
const INTERVAL_STEPS_MS: &[u64] = &[200, 250, 500, 1000, 1500, 2000, 3000, 5000, 10_000];

/// Which view/mode the app is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Help,
}

/// Work the main loop has to carry out on the monitor or the settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    StartMonitor,
    StopMonitor,
    SetInterval(Duration),
    SaveConfig,
}

/// Main application state
pub struct App {
    pub mode: AppMode,
    pub should_quit: bool,

    // Latest data from the sampler
    pub network_info: NetworkInfo,
    pub connected: bool,
    /// Download rates (B/s), oldest first
    pub history: VecDeque<u64>,
    /// Why the last tick was skipped, cleared by the next good one
    pub last_skip: Option<SampleError>,

    // Live activity session; None while stopped
    pub session: Option<ActivitySession>,
    pub ended_at: Option<DateTime<Local>>,

    // Settings
    pub update_interval_ms: u64,
    pub interfaces: Vec<String>,
    pub countdown_secs: u64,
    pub show_totals: bool,
    pub show_history: bool,
    pub color_scheme_id: ColorSchemeId,
    pub color_scheme: ColorScheme,
    pub settings_dirty: bool,

    pub requests: Vec<Request>,
}

impl App {
    pub fn new(config: &NetpulseConfig) -> Self {
        Self {
            mode: AppMode::Normal,
            should_quit: false,

            network_info: NetworkInfo::default(),
            connected: false,
            history: VecDeque::with_capacity(HISTORY_LEN),
            last_skip: None,

            session: None,
            ended_at: None,

            update_interval_ms: config.update_interval_ms,
            interfaces: config.interfaces.clone(),
            countdown_secs: config.countdown_secs,
            show_totals: config.show_totals,
            show_history: config.show_history,
            color_scheme_id: config.color_scheme_id,
            color_scheme: ColorScheme::from_id(config.color_scheme_id),
            settings_dirty: false,

            requests: Vec::new(),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    /// Session length, or `None` when disabled or too large to represent
    pub fn countdown(&self) -> Option<chrono::Duration> {
        if self.countdown_secs == 0 {
            return None;
        }
        i64::try_from(self.countdown_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.session.as_ref().is_some_and(ActivitySession::is_paused)
    }

    /// Fold one tick into the displayed state.
    pub fn apply_reading(&mut self, reading: Reading, now: DateTime<Local>) {
        self.connected = reading.connected;

        let Some(session) = self.session.as_mut() else {
            // Straggler from a monitor that has since been stopped
            return;
        };
        if session.is_paused() {
            return;
        }
        session.record_update(now);

        if let Some(err) = reading.skipped {
            self.last_skip = Some(err);
            return;
        }
        self.last_skip = None;

        if let Some(counters) = reading.counters {
            self.network_info.total_rx = counters.bytes_received;
            self.network_info.total_tx = counters.bytes_sent;
        }
        if let Some(rate) = reading.rate {
            self.network_info.download = format_speed(rate.bytes_per_sec_down);
            self.network_info.upload = format_speed(rate.bytes_per_sec_up);
            self.network_info.rate = Some(rate);

            if self.history.len() == HISTORY_LEN {
                self.history.pop_front();
            }
            self.history.push_back(rate.bytes_per_sec_down.max(0.0) as u64);
        }
    }

    /// Begin a fresh session and ask for the monitor to be started.
    pub fn start_session(&mut self, now: DateTime<Local>) {
        if self.session.is_some() {
            return;
        }
        self.session = Some(ActivitySession::start(now, self.countdown()));
        self.ended_at = None;
        self.network_info = NetworkInfo::default();
        self.history.clear();
        self.last_skip = None;
        self.requests.push(Request::StartMonitor);
        log::info!("session started");
    }

    /// Drop the session and ask for the monitor to be stopped.
    pub fn end_session(&mut self, now: DateTime<Local>) {
        if self.session.take().is_none() {
            return;
        }
        self.ended_at = Some(now);
        self.requests.push(Request::StopMonitor);
        log::info!("session ended");
    }

    pub fn toggle_pause(&mut self, now: DateTime<Local>) {
        if let Some(session) = self.session.as_mut() {
            session.toggle_pause(now);
        }
    }

    /// End the session once its countdown has run out. Returns whether it did.
    pub fn check_expiry(&mut self, now: DateTime<Local>) -> bool {
        let expired = self.session.as_ref().is_some_and(|s| s.is_expired(now));
        if expired {
            self.end_session(now);
        }
        expired
    }

    pub fn interval_up(&mut self) {
        let next = INTERVAL_STEPS_MS
            .iter()
            .copied()
            .find(|&step| step > self.update_interval_ms)
            .unwrap_or(MAX_INTERVAL_MS);
        self.set_interval_ms(next);
    }

    pub fn interval_down(&mut self) {
        let prev = INTERVAL_STEPS_MS
            .iter()
            .rev()
            .copied()
            .find(|&step| step < self.update_interval_ms)
            .unwrap_or(MIN_INTERVAL_MS);
        self.set_interval_ms(prev);
    }

    fn set_interval_ms(&mut self, ms: u64) {
        let ms = ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
        if ms == self.update_interval_ms {
            return;
        }
        self.update_interval_ms = ms;
        self.settings_dirty = true;
        self.requests.push(Request::SetInterval(self.interval()));
    }

    pub fn cycle_color_scheme(&mut self) {
        self.color_scheme_id = self.color_scheme_id.next();
        self.color_scheme = ColorScheme::from_id(self.color_scheme_id);
        self.settings_dirty = true;
    }

    pub fn request_save(&mut self) {
        self.requests.push(Request::SaveConfig);
    }

    pub fn take_requests(&mut self) -> Vec<Request> {
        std::mem::take(&mut self.requests)
    }
}
