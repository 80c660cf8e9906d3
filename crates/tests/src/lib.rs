//! # Integration Tests
//!
//! Cross-crate tests for the event bus.
//!
//! Covers:
//! - Contract checks between `contracts` and `dispatcher`
//! - Collaborators holding the bus as `Arc<dyn EventBus>`
//! - Multi-bus wiring and concurrent publishers

#[cfg(test)]
mod contract_tests {
    use contracts::{EventError, EventType};
    use dispatcher::{DispatcherConfig, FailurePolicy};

    #[test]
    fn test_event_type_is_shared_between_crates() {
        let event_type: dispatcher::EventType = EventType::from("user:logged_in");
        assert_eq!(event_type.domain(), Some("user"));
        assert_eq!(event_type, "user:logged_in");
    }

    #[test]
    fn test_error_names_the_category() {
        let err = EventError::listener_panicked(&EventType::from("physics:collision"), 2, "boom");
        let message = err.to_string();
        assert!(message.contains("physics:collision"));
        assert!(message.contains("boom"));
    }

    #[test]
    fn test_config_snapshot() {
        let config: DispatcherConfig =
            serde_json::from_str(r#"{"name":"audio","failure_policy":"isolate"}"#).unwrap();
        assert_eq!(config.name, "audio");
        assert_eq!(config.failure_policy, FailurePolicy::Isolate);

        let defaults: DispatcherConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults.failure_policy, FailurePolicy::Propagate);
    }
}

#[cfg(test)]
mod bus_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::thread;

    use contracts::{Event, EventBus, EventType};
    use dispatcher::{Dispatcher, DispatcherConfig, FailurePolicy};
    use observability::{RunningStats, StatsSummary};

    #[derive(Debug, Clone, PartialEq)]
    struct Sequenced {
        producer: usize,
        seq: usize,
    }

    impl Event for Sequenced {
        fn event_type(&self) -> EventType {
            "test:sequenced".into()
        }
    }

    #[derive(Debug, Clone)]
    struct Collision {
        force: f64,
    }

    impl Event for Collision {
        fn event_type(&self) -> EventType {
            "physics:collision".into()
        }
    }

    #[derive(Debug, Clone)]
    struct SoundPlay {
        sound_id: &'static str,
    }

    impl Event for SoundPlay {
        fn event_type(&self) -> EventType {
            "audio:play".into()
        }
    }

    /// Publishes through the trait object only
    struct Announcer {
        bus: Arc<dyn EventBus>,
    }

    impl Announcer {
        fn announce(&self, sound_id: &'static str) {
            self.bus.publish_ref(&SoundPlay { sound_id });
        }
    }

    #[test]
    fn test_trait_object_collaborator() {
        let bus = Arc::new(Dispatcher::with_config(DispatcherConfig::named("audio")));
        let played = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&played);
        bus.subscribe_listener(
            "audio:play".into(),
            Arc::new(move |event: &dyn Event| {
                if let Some(sound) = event.downcast_ref::<SoundPlay>() {
                    sink.lock().unwrap().push(sound.sound_id);
                }
            }),
        );

        let announcer = Announcer {
            bus: Arc::clone(&bus) as Arc<dyn EventBus>,
        };
        announcer.announce("click");
        announcer.announce("beep");

        assert_eq!(*played.lock().unwrap(), vec!["click", "beep"]);
        assert_eq!(bus.metrics().published, 2);
        assert_eq!(bus.metrics().delivered, 2);
    }

    #[test]
    fn test_forwarding_between_buses() {
        let physics = Arc::new(Dispatcher::with_config(DispatcherConfig::named("physics")));
        let audio = Arc::new(Dispatcher::with_config(DispatcherConfig::named("audio")));
        let sounds = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&sounds);
        audio.subscribe_typed("audio:play", move |_: &SoundPlay| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let forward = Arc::clone(&audio);
        physics.subscribe_typed("physics:collision", move |e: &Collision| {
            if e.force > 50.0 {
                forward.publish(SoundPlay {
                    sound_id: "impact_heavy",
                });
            }
        });

        for force in [10.0, 60.0, 75.0, 50.0] {
            physics.publish(Collision { force });
        }

        assert_eq!(sounds.load(Ordering::SeqCst), 2);
        assert_eq!(physics.metrics().published, 4);
        assert_eq!(audio.metrics().published, 2);
        assert_eq!(physics.listener_count("audio:play"), 0);
    }

    #[test]
    fn test_concurrent_producers_keep_per_producer_order() {
        const PRODUCERS: usize = 8;
        const PER_PRODUCER: usize = 250;

        let bus = Dispatcher::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        bus.subscribe_typed("test:sequenced", move |e: &Sequenced| {
            sink.lock().unwrap().push(e.clone());
        });

        thread::scope(|s| {
            for producer in 0..PRODUCERS {
                let bus = &bus;
                s.spawn(move || {
                    for seq in 0..PER_PRODUCER {
                        bus.publish(Sequenced { producer, seq });
                    }
                });
            }
        });

        let received = received.lock().unwrap();
        assert_eq!(received.len(), PRODUCERS * PER_PRODUCER);

        for producer in 0..PRODUCERS {
            let seqs: Vec<usize> = received
                .iter()
                .filter(|e| e.producer == producer)
                .map(|e| e.seq)
                .collect();
            assert_eq!(seqs, (0..PER_PRODUCER).collect::<Vec<_>>());
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_tokio_publishers_share_one_bus() {
        let bus = Arc::new(Dispatcher::new());
        let count = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&count);
        bus.subscribe("test:sequenced", move |_: &dyn Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..10)
            .map(|producer| {
                let bus = Arc::clone(&bus);
                tokio::spawn(async move {
                    for seq in 0..100 {
                        bus.publish(Sequenced { producer, seq });
                        tokio::task::yield_now().await;
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 1000);
        assert_eq!(bus.metrics().published, 1000);
    }

    #[test]
    fn test_propagated_panic_leaves_bus_usable() {
        let bus = Arc::new(Dispatcher::new());
        let after = Arc::new(AtomicUsize::new(0));

        bus.subscribe("physics:collision", |event: &dyn Event| {
            if let Some(c) = event.downcast_ref::<Collision>() {
                assert!(c.force < 100.0, "force out of range");
            }
        });
        let counter = Arc::clone(&after);
        bus.subscribe("physics:collision", move |_: &dyn Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let publisher = Arc::clone(&bus);
        let result = thread::spawn(move || publisher.publish(Collision { force: 500.0 })).join();
        assert!(result.is_err());
        assert_eq!(after.load(Ordering::SeqCst), 0);

        // Subscribe and publish still work from other threads
        bus.subscribe("audio:play", |_: &dyn Event| {});
        bus.publish(Collision { force: 1.0 });
        assert_eq!(after.load(Ordering::SeqCst), 1);
        assert_eq!(bus.listener_count("audio:play"), 1);
    }

    #[test]
    fn test_isolated_bus_reports_failures() {
        let bus = Dispatcher::with_config(
            DispatcherConfig::named("isolated").with_failure_policy(FailurePolicy::Isolate),
        );
        let after = Arc::new(AtomicUsize::new(0));

        bus.subscribe("physics:collision", |_: &dyn Event| panic!("listener failed"));
        let counter = Arc::clone(&after);
        bus.subscribe("physics:collision", move |_: &dyn Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(Collision { force: 1.0 });
        bus.publish(Collision { force: 2.0 });

        assert_eq!(after.load(Ordering::SeqCst), 2);
        let metrics = bus.metrics();
        assert_eq!(metrics.failed, 2);
        assert_eq!(metrics.delivered, 2);
    }

    #[test]
    fn test_independent_buses_do_not_share_listeners() {
        let first = Dispatcher::new();
        let second = Dispatcher::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&hits);
        first.subscribe("audio:play", move |_: &dyn Event| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        second.publish(SoundPlay { sound_id: "x" });
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(second.metrics().unrouted, 1);

        first.publish(SoundPlay { sound_id: "x" });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listeners_aggregate_payloads_into_running_stats() {
        let bus = Dispatcher::new();
        let forces = Arc::new(Mutex::new(RunningStats::default()));

        let stats = Arc::clone(&forces);
        bus.subscribe_typed("physics:collision", move |e: &Collision| {
            stats.lock().unwrap().push(e.force);
        });

        thread::scope(|s| {
            for chunk in [[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]] {
                let bus = &bus;
                s.spawn(move || {
                    for force in chunk {
                        bus.publish(Collision { force });
                    }
                });
            }
        });

        let summary = StatsSummary::from(&*forces.lock().unwrap());
        assert_eq!(summary.count, 6);
        assert!((summary.mean - 3.5).abs() < 1e-10);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.max, 6.0);
    }
}
