//! Argument parsing via clap.

use std::path::PathBuf;
use std::time::Duration;

use clap::{crate_description, crate_name, crate_version, ArgAction, Parser};

/// The arguments for netpulse.
#[derive(Parser, Debug)]
#[command(
    name = crate_name!(),
    version = crate_version!(),
    about = crate_description!(),
)]
pub struct Args {
    #[arg(
        short = 'i',
        long,
        value_name = "DURATION",
        value_parser = parse_interval,
        help = "Sampling interval, e.g. 1, 1.5, 500ms or 2s.",
        long_help = "Sampling interval. A bare number is read as seconds; otherwise any humantime \
                     duration such as 500ms or 2s is accepted. Must be greater than zero."
    )]
    pub interval: Option<Duration>,

    #[arg(
        short = 'I',
        long = "interface",
        value_name = "NAME",
        action = ArgAction::Append,
        help = "Interface to watch; repeat to sum several. Defaults to all non-loopback interfaces."
    )]
    pub interfaces: Vec<String>,

    #[arg(
        short = 't',
        long,
        value_name = "DURATION",
        value_parser = parse_countdown,
        help = "Length of the session countdown, e.g. 200s or 5m. 0 disables it."
    )]
    pub countdown: Option<Duration>,

    #[arg(long, help = "Print one line per tick instead of drawing the panel.")]
    pub plain: bool,

    #[arg(
        short = 'n',
        long,
        value_name = "N",
        requires = "plain",
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Exit after N ticks (plain mode only)."
    )]
    pub count: Option<u64>,

    #[arg(short = 'C', long, value_name = "PATH", help = "Use this settings file instead of the default one.")]
    pub config: Option<PathBuf>,
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<f64>() {
        return Duration::try_from_secs_f64(secs).map_err(|_| format!("invalid duration: {value}"));
    }
    humantime::parse_duration(value).map_err(|err| format!("invalid duration {value:?}: {err}"))
}

fn parse_interval(value: &str) -> Result<Duration, String> {
    let interval = parse_duration(value)?;
    if interval.is_zero() {
        return Err("the interval must be greater than zero".to_string());
    }
    Ok(interval)
}

fn parse_countdown(value: &str) -> Result<Duration, String> {
    parse_duration(value)
}
