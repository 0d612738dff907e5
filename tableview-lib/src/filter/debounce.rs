//! Cancellable scheduled task for as-you-type input.

use std::time::{Duration, Instant};

/// A last-write-wins scheduled value.
///
/// Scheduling replaces any pending value and restarts the delay, so a burst
/// of inputs fires once with the final value. The debouncer has no timer of
/// its own: callers pass the current [`Instant`], which lets tests drive it
/// with a fake clock.
///
/// # Example
///
/// ```
/// use std::time::{Duration, Instant};
/// use tableview_lib::filter::Debouncer;
///
/// let mut debouncer = Debouncer::new(Duration::from_millis(300));
/// let start = Instant::now();
///
/// debouncer.schedule("l", start);
/// debouncer.schedule("la", start + Duration::from_millis(100));
/// debouncer.schedule("lap", start + Duration::from_millis(200));
///
/// assert_eq!(debouncer.poll(start + Duration::from_millis(400)), None);
/// assert_eq!(debouncer.poll(start + Duration::from_millis(500)), Some("lap"));
/// assert_eq!(debouncer.poll(start + Duration::from_millis(900)), None);
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given delay.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// The delay between the last schedule and firing.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the delay. A pending value keeps its deadline.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Schedule `value`, cancelling any pending one. Returns the deadline.
    pub fn schedule(&mut self, value: T, now: Instant) -> Instant {
        let deadline = now + self.delay;
        if self.pending.is_some() {
            log::trace!("debounce: replacing pending value");
        }
        self.pending = Some(Pending { value, deadline });
        deadline
    }

    /// Fire the pending value if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Fire the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }

    /// Drop the pending value without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        let cancelled = self.pending.take().map(|p| p.value);
        if cancelled.is_some() {
            log::trace!("debounce: pending value cancelled");
        }
        cancelled
    }

    /// Returns `true` if a value is waiting to fire.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending value fires.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Time left until the pending value fires.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline().map(|d| d.saturating_duration_since(now))
    }
}
