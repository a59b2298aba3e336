//! The periodic read → diff → format loop.
//!
//! [`Sampler`] is the per-tick state machine and owns the only "previous
//! sample" slot. [`Monitor`] moves a sampler onto one worker thread, so ticks
//! can never overlap, and streams a [`Reading`] per tick over a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::{MonitorError, SampleError};
use crate::system::cancellation::CancellationToken;
use crate::system::counters::{CounterSource, Counters};
use crate::system::network::{compute_rate, format_speed, Rate, Sample};
use crate::system::reachability::ConnectivityProbe;

/// Result of one tick of the [`Sampler`]
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// First successful read: the baseline was captured, no rate yet.
    Baseline(Counters),
    /// A rate against the previous sample.
    Measured { rate: Rate, counters: Counters },
    /// The counters could not be read; the previous baseline is untouched.
    Skipped(SampleError),
}

pub struct Sampler<S> {
    source: S,
    previous: Option<Sample>,
}

impl<S: CounterSource> Sampler<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous: None,
        }
    }

    /// Read the counters and diff them against the previous sample.
    pub fn tick(&mut self, now_millis: i64) -> TickOutcome {
        let counters = match self.source.read() {
            Ok(counters) => counters,
            Err(err) => return TickOutcome::Skipped(err),
        };

        let current = Sample {
            timestamp_millis: now_millis,
            bytes_received: counters.bytes_received,
            bytes_sent: counters.bytes_sent,
        };

        match self.previous.replace(current) {
            None => TickOutcome::Baseline(counters),
            Some(previous) => TickOutcome::Measured {
                rate: compute_rate(&previous, &current),
                counters,
            },
        }
    }

    #[cfg(test)]
    pub fn baseline(&self) -> Option<&Sample> {
        self.previous.as_ref()
    }
}

/// Everything one tick produced, handed to the presentation layer
#[derive(Debug, Clone)]
pub struct Reading {
    pub timestamp_millis: i64,
    /// `None` on the baseline tick and on skipped ticks
    pub rate: Option<Rate>,
    /// Cumulative totals, when the read succeeded
    pub counters: Option<Counters>,
    pub connected: bool,
    /// Why the tick was skipped, if it was
    pub skipped: Option<SampleError>,
}

impl Reading {
    pub fn from_outcome(timestamp_millis: i64, outcome: TickOutcome, connected: bool) -> Self {
        let (rate, counters, skipped) = match outcome {
            TickOutcome::Baseline(counters) => (None, Some(counters), None),
            TickOutcome::Measured { rate, counters } => (Some(rate), Some(counters), None),
            TickOutcome::Skipped(err) => (None, None, Some(err)),
        };
        Self {
            timestamp_millis,
            rate,
            counters,
            connected,
            skipped,
        }
    }

    pub fn download(&self) -> Option<String> {
        self.rate.map(|r| format_speed(r.bytes_per_sec_down))
    }

    pub fn upload(&self) -> Option<String> {
        self.rate.map(|r| format_speed(r.bytes_per_sec_up))
    }
}

/// Messages from the owner to a running sampler thread
#[derive(Debug)]
enum ControlEvent {
    SetInterval(Duration),
}

struct Running {
    token: Arc<CancellationToken>,
    control: Sender<ControlEvent>,
    handle: JoinHandle<()>,
}

/// Owns the sampler thread. `Stopped` ⇄ `Running`; each tick is a self-loop.
#[derive(Default)]
pub struct Monitor {
    running: Option<Running>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// False once the worker has exited, including on its own after the
    /// receiving end went away.
    pub fn is_running(&self) -> bool {
        self.running.as_ref().is_some_and(|r| !r.handle.is_finished())
    }

    /// Start ticking every `interval`. The first tick fires one interval
    /// after the call.
    pub fn start<S, P>(
        &mut self, interval: Duration, source: S, probe: P, sender: Sender<Reading>,
    ) -> Result<(), MonitorError>
    where
        S: CounterSource + Send + 'static,
        P: ConnectivityProbe + Send + 'static,
    {
        if interval.is_zero() {
            return Err(MonitorError::InvalidInterval(interval));
        }
        if self.is_running() {
            return Err(MonitorError::AlreadyRunning);
        }
        // Reap a worker that already exited on its own
        self.stop();

        let token = Arc::new(CancellationToken::default());
        let (control, control_rx) = mpsc::channel();
        let handle = {
            let token = token.clone();
            thread::Builder::new()
                .name("netpulse-sampler".into())
                .spawn(move || {
                    run_sampler(Sampler::new(source), probe, interval, &token, control_rx, sender)
                })?
        };

        log::info!("monitor started, interval {interval:?}");
        self.running = Some(Running {
            token,
            control,
            handle,
        });
        Ok(())
    }

    /// Prevent further ticks. An in-flight tick finishes before this returns.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.token.cancel();
        if running.handle.join().is_err() {
            log::warn!("sampler thread panicked");
        }
        log::info!("monitor stopped");
    }

    /// Change the tick interval of a running monitor, effective from the next sleep.
    pub fn set_interval(&self, interval: Duration) -> Result<(), MonitorError> {
        if interval.is_zero() {
            return Err(MonitorError::InvalidInterval(interval));
        }
        if let Some(running) = &self.running {
            // A closed channel means the thread is already on its way out.
            let _ = running.control.send(ControlEvent::SetInterval(interval));
        }
        Ok(())
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn run_sampler<S, P>(
    mut sampler: Sampler<S>, mut probe: P, mut interval: Duration, token: &CancellationToken,
    control: Receiver<ControlEvent>, sender: Sender<Reading>,
) where
    S: CounterSource,
    P: ConnectivityProbe,
{
    loop {
        if token.sleep_with_cancellation(interval) {
            break;
        }

        while let Ok(message) = control.try_recv() {
            match message {
                ControlEvent::SetInterval(new_interval) => {
                    log::debug!("interval changed to {new_interval:?}");
                    interval = new_interval;
                }
            }
        }

        let now = now_millis();
        let outcome = sampler.tick(now);
        if let TickOutcome::Skipped(err) = &outcome {
            log::debug!("skipping tick: {err}");
        }
        let connected = probe.is_reachable();

        if sender.send(Reading::from_outcome(now, outcome, connected)).is_err() {
            // Nobody is listening anymore.
            break;
        }
    }
}
