use std::collections::VecDeque;
use std::time::Duration;

/// Sliding-window counter of completed resizes.
///
/// Timestamps are seconds since the epoch, appended in the order they were
/// observed. The wall clock can step backwards, so that order is not assumed
/// to be chronological. State is local to one running instance and is lost
/// on a cold start.
#[derive(Debug, Clone)]
pub struct RateTracker {
    threshold_count: usize,
    window_secs: f64,
    timestamps: VecDeque<f64>,
}

impl RateTracker {
    pub fn new(threshold_count: usize, window: Duration) -> Self {
        Self {
            threshold_count,
            window_secs: window.as_secs_f64(),
            timestamps: VecDeque::new(),
        }
    }

    pub fn record(&mut self, now: f64) {
        self.timestamps.push_back(now);
    }

    /// Drops every entry older than the window. An entry exactly `window`
    /// seconds old is kept.
    pub fn prune(&mut self, now: f64) {
        let window = self.window_secs;
        self.timestamps.retain(|&t| now - t <= window);
    }

    pub fn exceeded(&self) -> bool {
        self.timestamps.len() > self.threshold_count
    }

    /// Records a completion, prunes with the same `now` and reports whether
    /// the threshold is exceeded.
    pub fn record_and_check(&mut self, now: f64) -> bool {
        self.record(now);
        self.prune(now);
        self.exceeded()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub const fn threshold_count(&self) -> usize {
        self.threshold_count
    }

    /// Window length in minutes, as shown in alert messages.
    pub fn window_minutes(&self) -> f64 {
        self.window_secs / 60.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> RateTracker {
        RateTracker::new(5, Duration::from_secs(600))
    }

    #[test]
    fn test_entry_at_window_boundary_is_kept() {
        let mut tracker = tracker();
        tracker.record(1_000.0);
        tracker.prune(1_600.0);
        assert_eq!(tracker.len(), 1);

        tracker.prune(1_600.5);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_exceeded_only_above_threshold() {
        let mut tracker = tracker();
        for i in 0..5 {
            assert!(!tracker.record_and_check(1_000.0 + f64::from(i)));
        }
        assert!(!tracker.exceeded());
        assert!(tracker.record_and_check(1_005.0));
    }

    #[test]
    fn test_alert_repeats_while_over_threshold() {
        let mut tracker = tracker();
        for i in 0..6 {
            tracker.record_and_check(1_000.0 + f64::from(i));
        }
        assert!(tracker.record_and_check(1_010.0));
        assert!(tracker.record_and_check(1_020.0));
        assert_eq!(tracker.len(), 8);
    }

    #[test]
    fn test_stale_entries_removed_on_next_record() {
        let mut tracker = tracker();
        for i in 0..6 {
            tracker.record(f64::from(i));
        }
        assert!(tracker.exceeded());

        assert!(!tracker.record_and_check(700.0));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_partial_prune_keeps_recent_entries() {
        let mut tracker = tracker();
        tracker.record(0.0);
        tracker.record(100.0);
        tracker.record(650.0);
        tracker.prune(700.0);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_prune_drops_stale_entry_behind_recent_one() {
        let mut tracker = tracker();
        tracker.record(1_000.0);
        tracker.record(500.0);
        tracker.prune(1_200.0);
        assert_eq!(tracker.len(), 1);
        assert!(tracker.timestamps.iter().all(|&t| 1_200.0 - t <= 600.0));
    }

    #[test]
    fn test_window_minutes() {
        assert!((tracker().window_minutes() - 10.0).abs() < f64::EPSILON);
        assert_eq!(format!("{:?}", tracker().window_minutes()), "10.0");
    }
}
