use crate::consts;
use std::time::Duration;

/// The snake's current pace, expressed as the time between two steps
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Speed {
    interval: Duration,
}

impl Speed {
    pub(crate) fn new() -> Speed {
        Speed {
            interval: consts::TICK_START,
        }
    }

    pub(crate) fn interval(self) -> Duration {
        self.interval
    }

    /// Shorten the tick interval by one decrement, stopping at
    /// [`TICK_MIN`][consts::TICK_MIN].  Returns `true` if the interval
    /// changed.
    pub(crate) fn speed_up(&mut self) -> bool {
        let faster = self
            .interval
            .saturating_sub(consts::TICK_DECREMENT)
            .max(consts::TICK_MIN);
        let changed = faster != self.interval;
        self.interval = faster;
        changed
    }

    /// Steps per second, for display
    pub(crate) fn steps_per_second(self) -> f64 {
        1.0 / self.interval.as_secs_f64()
    }
}
