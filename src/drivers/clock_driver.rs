//! Clock driver.

use std::thread;
use std::time::Duration;

use super::ClockInterface;

/// Clock driver backed by the host sleep.
#[derive(Default)]
pub struct NativeClockDriver;

impl NativeClockDriver {
    /// Creates new driver.
    pub fn new() -> Self {
        Default::default()
    }
}

impl ClockInterface for NativeClockDriver {
    fn sleep_millis(&self, millis: u64) {
        thread::sleep(Duration::from_millis(millis));
    }
}
