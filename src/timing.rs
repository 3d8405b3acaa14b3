//! Blocking delays.
//!
//! Every wait in this crate (retry backoff, screen alternation, LCD command
//! settling) goes through [`Sleep`] so that tests can record the requested
//! durations instead of actually blocking.

use std::thread;
use std::time::Duration;

/// A source of blocking delays.
pub trait Sleep {
    fn sleep(&mut self, duration: Duration);
}

/// Real delays backed by `std::thread::sleep`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    fn sleep(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

impl<S: Sleep + ?Sized> Sleep for &mut S {
    fn sleep(&mut self, duration: Duration) {
        (**self).sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn thread_sleep_blocks_for_at_least_the_requested_time() {
        let start = Instant::now();
        ThreadSleep.sleep(Duration::from_millis(20));
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
