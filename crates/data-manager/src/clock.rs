//! Time source for the "No Data" placeholder

/// Supplies the current instant in epoch milliseconds
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> f64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        chrono::Utc::now().timestamp_millis() as f64
    }
}

/// A clock frozen at one instant, for reproducible output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    millis: f64,
}

impl FixedClock {
    pub fn new(millis: f64) -> Self {
        Self { millis }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> f64 {
        self.millis
    }
}
