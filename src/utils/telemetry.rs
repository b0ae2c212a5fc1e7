// file: src/utils/telemetry.rs
// description: request timing for the backend call observability contract

use std::time::{Duration, Instant};

/// Wall-clock timer around a single backend round trip. Every call logs
/// its elapsed time, success or failure.
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_measures_elapsed_time() {
        let timer = RequestTimer::start();
        std::thread::sleep(Duration::from_millis(10));
        assert!(timer.elapsed() >= Duration::from_millis(10));
        assert!(timer.elapsed_ms() >= 10);
    }
}
