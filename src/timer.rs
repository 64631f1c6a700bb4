use std::time::{Duration, Instant};

/// Whole-second stopwatch driven by the frame loop.
///
/// Mirrors a one-second interval timer: seconds are only counted once a full
/// second has passed since the last count, and stopping drops any partial
/// second.
#[derive(Debug, Clone, Default)]
pub struct ElapsedTimer {
    seconds: u64,
    last_mark: Option<Instant>,
}

impl ElapsedTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting from `now`. No-op if already running.
    pub fn start(&mut self, now: Instant) {
        if self.last_mark.is_none() {
            self.last_mark = Some(now);
        }
    }

    /// Stop counting, keeping the seconds counted so far. Idempotent.
    pub fn stop(&mut self) {
        self.last_mark = None;
    }

    /// Stop and zero. Idempotent.
    pub fn reset(&mut self) {
        self.stop();
        self.seconds = 0;
    }

    /// Count every full second elapsed since the last mark
    pub fn poll(&mut self, now: Instant) {
        if let Some(mark) = self.last_mark {
            let elapsed = now.saturating_duration_since(mark);
            let whole = elapsed.as_secs();
            if whole > 0 {
                self.seconds += whole;
                self.last_mark = Some(mark + Duration::from_secs(whole));
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.last_mark.is_some()
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    /// "HH:MM:SS"
    pub fn formatted(&self) -> String {
        format_hms(self.seconds)
    }
}

/// Format seconds as zero-padded "HH:MM:SS"
pub fn format_hms(total: u64) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
