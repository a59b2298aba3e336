use std::{
    sync::{Condvar, Mutex, PoisonError},
    time::Duration,
};

/// Stops the sampler thread. Sleeping on it can be cut short by `cancel`.
#[derive(Default)]
pub struct CancellationToken {
    cancelled: Mutex<bool>,
    cvar: Condvar,
}

impl CancellationToken {
    /// Idempotent: once cancelled, stays cancelled.
    pub fn cancel(&self) {
        let mut guard = self.cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        if !*guard {
            *guard = true;
            self.cvar.notify_all();
        }
    }

    /// Sleep for `duration` unless cancelled first. Returns whether the token
    /// is cancelled on wake-up.
    pub fn sleep_with_cancellation(&self, duration: Duration) -> bool {
        let guard = self.cancelled.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .cvar
            .wait_timeout_while(guard, duration, |cancelled| !*cancelled)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}
