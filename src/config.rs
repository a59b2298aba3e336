//! netpulse settings persistence (rc-style key=value format)
//!
//! Lives at `<config dir>/netpulse/netpulserc` unless `--config` points elsewhere.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::color_scheme::ColorSchemeId;

pub const MIN_INTERVAL_MS: u64 = 200;
pub const MAX_INTERVAL_MS: u64 = 10_000;
/// Longest countdown a session can run: one week
pub const MAX_COUNTDOWN_SECS: u64 = 7 * 24 * 60 * 60;

/// Default config file path: `<config dir>/netpulse/netpulserc`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("netpulse").join("netpulserc"))
}

/// Persistable settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetpulseConfig {
    pub update_interval_ms: u64,
    /// Interfaces to sum; empty means every non-loopback interface
    pub interfaces: Vec<String>,
    /// Session countdown length; 0 disables the countdown
    pub countdown_secs: u64,
    pub color_scheme_id: ColorSchemeId,
    pub show_totals: bool,
    pub show_history: bool,
}

impl Default for NetpulseConfig {
    fn default() -> Self {
        Self {
            update_interval_ms: 1000,
            interfaces: Vec::new(),
            countdown_secs: 0,
            color_scheme_id: ColorSchemeId::Default,
            show_totals: true,
            show_history: true,
        }
    }
}

impl NetpulseConfig {
    /// Load config from file, returning defaults if it doesn't exist or can't be read
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(err) => {
                log::debug!("no config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Parse rc content. Unknown keys and malformed values are ignored.
    pub fn parse(content: &str) -> Self {
        let mut cfg = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim();
            match key.trim() {
                "update_interval_ms" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.update_interval_ms = v.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS);
                    }
                }
                "interfaces" => {
                    cfg.interfaces = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(String::from)
                        .collect();
                }
                "countdown_secs" => {
                    if let Ok(v) = value.parse::<u64>() {
                        cfg.countdown_secs = v.min(MAX_COUNTDOWN_SECS);
                    }
                }
                "color_scheme" => {
                    if let Ok(idx) = value.parse::<usize>() {
                        cfg.color_scheme_id = ColorSchemeId::from_index(idx);
                    }
                }
                "show_totals" => cfg.show_totals = value == "1",
                "show_history" => cfg.show_history = value == "1",
                _ => {}
            }
        }

        cfg
    }

    pub fn to_rc_string(&self) -> String {
        let b = |v: bool| if v { "1" } else { "0" };

        let lines = [
            "# netpulse configuration file".to_string(),
            "# Rewritten when settings change from inside netpulse".to_string(),
            String::new(),
            format!("update_interval_ms={}", self.update_interval_ms),
            format!("interfaces={}", self.interfaces.join(",")),
            format!("countdown_secs={}", self.countdown_secs),
            format!("color_scheme={}", self.color_scheme_id as usize),
            format!("show_totals={}", b(self.show_totals)),
            format!("show_history={}", b(self.show_history)),
        ];
        lines.join("\n") + "\n"
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create config dir {}", parent.display()))?;
        }
        fs::write(path, self.to_rc_string())
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Build config from current App state
    pub fn from_app(app: &crate::app::App) -> Self {
        Self {
            update_interval_ms: app.update_interval_ms,
            interfaces: app.interfaces.clone(),
            countdown_secs: app.countdown_secs,
            color_scheme_id: app.color_scheme_id,
            show_totals: app.show_totals,
            show_history: app.show_history,
        }
    }
}
