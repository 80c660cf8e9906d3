//! Event bus metrics
//!
//! Global counters go through the `metrics` facade and are a no-op until a
//! recorder (e.g. the Prometheus exporter) is installed.

use metrics::counter;

/// Record one publish call and how many listeners it reached
///
/// A publish that found no listeners is also counted as unrouted.
pub fn record_event_published(bus: &str, event_type: &str, listeners: usize) {
    counter!(
        "eventbus_events_published_total",
        "bus" => bus.to_string(),
        "event_type" => event_type.to_string()
    )
    .increment(1);

    if listeners == 0 {
        counter!(
            "eventbus_events_unrouted_total",
            "bus" => bus.to_string(),
            "event_type" => event_type.to_string()
        )
        .increment(1);
    }
}

/// Record one listener invocation that returned normally
pub fn record_listener_invocation(bus: &str, event_type: &str) {
    counter!(
        "eventbus_listener_invocations_total",
        "bus" => bus.to_string(),
        "event_type" => event_type.to_string()
    )
    .increment(1);
}

/// Record a listener panic caught by the dispatcher
pub fn record_listener_failure(bus: &str, event_type: &str) {
    counter!(
        "eventbus_listener_failures_total",
        "bus" => bus.to_string(),
        "event_type" => event_type.to_string()
    )
    .increment(1);
}

/// Record a new subscription
pub fn record_subscription(bus: &str, event_type: &str) {
    counter!(
        "eventbus_subscriptions_total",
        "bus" => bus.to_string(),
        "event_type" => event_type.to_string()
    )
    .increment(1);
}

/// Summary of a [`RunningStats`]
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    /// Fold another accumulator into this one (Chan et al. parallel merge)
    pub fn merge(&mut self, other: &RunningStats) {
        if other.count == 0 {
            return;
        }
        if self.count == 0 {
            *self = other.clone();
            return;
        }

        let count = self.count + other.count;
        let delta = other.mean - self.mean;
        self.mean += delta * other.count as f64 / count as f64;
        self.m2 += other.m2 + delta * delta * (self.count as f64 * other.count as f64) / count as f64;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.count = count;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn summary(&self) -> StatsSummary {
        StatsSummary::from(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_stats() {
        let mut stats = RunningStats::default();

        stats.push(1.0);
        stats.push(2.0);
        stats.push(3.0);
        stats.push(4.0);
        stats.push(5.0);

        assert_eq!(stats.count(), 5);
        assert!((stats.mean() - 3.0).abs() < 1e-10);
        assert!((stats.min() - 1.0).abs() < 1e-10);
        assert!((stats.max() - 5.0).abs() < 1e-10);
        assert!((stats.variance() - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_merge_matches_sequential() {
        let mut left = RunningStats::default();
        let mut right = RunningStats::default();
        let mut all = RunningStats::default();

        for v in [1.0, 2.0, 3.0] {
            left.push(v);
            all.push(v);
        }
        for v in [4.0, 5.0] {
            right.push(v);
            all.push(v);
        }

        left.merge(&right);

        assert_eq!(left.count(), all.count());
        assert!((left.mean() - all.mean()).abs() < 1e-10);
        assert!((left.variance() - all.variance()).abs() < 1e-10);
        assert!((left.min() - 1.0).abs() < 1e-10);
        assert!((left.max() - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_merge_into_empty() {
        let mut empty = RunningStats::default();
        let mut other = RunningStats::default();
        other.push(7.0);

        empty.merge(&other);
        assert_eq!(empty.count(), 1);
        assert!((empty.mean() - 7.0).abs() < 1e-10);
    }

    #[test]
    fn test_summary_display() {
        let summary = StatsSummary {
            count: 100,
            min: 0.010,
            max: 0.250,
            mean: 0.050,
            std_dev: 0.020,
        };

        let output = format!("{}", summary);
        assert!(output.contains("min=0.010"));
        assert!(output.contains("(n=100)"));
        assert_eq!(format!("{}", StatsSummary::default()), "N/A");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_event_published("test", "test:event", 0);
        record_listener_invocation("test", "test:event");
        record_listener_failure("test", "test:event");
        record_subscription("test", "test:event");
    }
}
