//! Cancelable fixed-interval ticker driven by frame timestamps
//!
//! Drives the difficulty ramp. It never fires on its own: the owner polls it
//! with the current time and gets back how many intervals elapsed. Once
//! stopped, or dropped along with its run, it can never fire again.

/// Shortest interval accepted; anything positive but shorter is raised to it
pub const MIN_INTERVAL_MS: f64 = 100.0;

/// Fixed-interval ticker
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTicker {
    interval_ms: f64,
    next_due: Option<f64>,
}

impl IntervalTicker {
    pub fn new(interval_ms: f64) -> Self {
        let interval_ms = if interval_ms > 0.0 && interval_ms < MIN_INTERVAL_MS {
            log::warn!("Ticker interval {} ms raised to {} ms", interval_ms, MIN_INTERVAL_MS);
            MIN_INTERVAL_MS
        } else {
            interval_ms
        };
        Self {
            interval_ms,
            next_due: None,
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start counting from `now`. Starting a running ticker is a no-op.
    pub fn start(&mut self, now: f64) -> bool {
        if self.is_running() {
            return false;
        }
        if !(self.interval_ms > 0.0) {
            log::warn!("Ticker interval {} ms is not positive, not starting", self.interval_ms);
            return false;
        }
        self.next_due = Some(now + self.interval_ms);
        true
    }

    /// Stopping a stopped ticker is a no-op
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// Number of whole intervals elapsed since the last poll
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let fired = ((now - due) / self.interval_ms).floor() as u32 + 1;
        self.next_due = Some(due + fired as f64 * self.interval_ms);
        fired
    }
}
