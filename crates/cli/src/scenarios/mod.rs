//! Example scenarios built on the dispatcher.
//!
//! Each scenario wires a few components to one or more buses, publishes a
//! short script of events and records what the listeners did in a
//! [`Transcript`].

pub mod basic;
pub mod buses;
pub mod game;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use dispatcher::{Dispatcher, DispatcherConfig, FailurePolicy, MetricsSnapshot};

/// Options shared by all scenarios
#[derive(Debug, Clone, Copy)]
pub struct ScenarioOptions {
    pub failure_policy: FailurePolicy,
    /// Game scenario only
    pub respawn_delay: Duration,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::default(),
            respawn_delay: Duration::from_millis(500),
        }
    }
}

impl ScenarioOptions {
    /// Build a named bus using these options
    pub fn bus(&self, name: &str) -> Arc<Dispatcher> {
        Arc::new(Dispatcher::with_config(
            DispatcherConfig::named(name).with_failure_policy(self.failure_policy),
        ))
    }
}

/// Ordered record of listener output, echoed to stdout
#[derive(Debug, Clone, Default)]
pub struct Transcript(Arc<Mutex<Vec<String>>>);

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, line: impl Into<String>) {
        let line = line.into();
        println!("{line}");
        self.lock().push(line);
    }

    pub fn lines(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Whether any recorded line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|line| line.contains(needle))
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Final metrics of every bus a scenario used
#[derive(Debug, Clone, Default)]
pub struct ScenarioReport {
    pub buses: Vec<(String, MetricsSnapshot)>,
}

impl ScenarioReport {
    pub fn from_buses<'a>(buses: impl IntoIterator<Item = &'a Arc<Dispatcher>>) -> Self {
        Self {
            buses: buses
                .into_iter()
                .map(|bus| (bus.name().to_string(), bus.metrics()))
                .collect(),
        }
    }

    pub fn bus(&self, name: &str) -> Option<&MetricsSnapshot> {
        self.buses
            .iter()
            .find(|(bus, _)| bus == name)
            .map(|(_, metrics)| metrics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_preserves_order() {
        let transcript = Transcript::new();
        let clone = transcript.clone();

        transcript.record("first");
        clone.record("second");

        assert_eq!(transcript.lines(), vec!["first", "second"]);
        assert!(transcript.contains("sec"));
        assert!(!transcript.contains("third"));
    }

    #[test]
    fn test_options_build_named_bus() {
        let options = ScenarioOptions {
            failure_policy: FailurePolicy::Isolate,
            ..ScenarioOptions::default()
        };
        let bus = options.bus("audio");

        assert_eq!(bus.name(), "audio");
        assert_eq!(bus.failure_policy(), FailurePolicy::Isolate);

        let report = ScenarioReport::from_buses([&bus]);
        assert_eq!(report.bus("audio"), Some(&MetricsSnapshot::default()));
        assert!(report.bus("physics").is_none());
    }
}
