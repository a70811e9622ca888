use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// One-way stop flag that sleeping tasks can wait on.
///
/// Once [`StopSignal::stop`] is called every current and future wait returns immediately.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    /// A signal that has not fired.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the signal and wake every waiter.
    pub fn stop(&self) {
        *self.flag() = true;
        self.wake.notify_all();
    }

    /// Return `true` once the signal has fired.
    pub fn is_stopped(&self) -> bool {
        *self.flag()
    }

    /// Sleep until `deadline` or until the signal fires, whichever comes first.
    ///
    /// Returns `true` when woken by the signal.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut stopped = self.flag();
        loop {
            if *stopped {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            stopped = match self.wake.wait_timeout(stopped, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn flag(&self) -> MutexGuard<'_, bool> {
        // The flag is a plain bool; a panic elsewhere cannot leave it inconsistent.
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/stop.rs"]
mod tests;
