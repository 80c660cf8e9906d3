//! `bench` command implementation.

use std::fmt;
use std::thread;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use dispatcher::{Dispatcher, DispatcherConfig, Event, EventType, FailurePolicy, MetricsSnapshot};
use observability::{RunningStats, StatsSummary};

use crate::cli::BenchArgs;
use crate::error::{CliError, Result};

const BENCH_EVENT: &str = "bench:test";

#[derive(Debug, Clone)]
struct BenchEvent;

impl Event for BenchEvent {
    fn event_type(&self) -> EventType {
        BENCH_EVENT.into()
    }
}

/// Results of a benchmark run
#[derive(Debug, Clone, Default)]
pub struct BenchStats {
    pub threads: usize,
    pub listeners: usize,
    pub publishes: u64,
    pub publish_duration: Duration,
    /// Per-publish latency in microseconds
    pub publish_latency_us: RunningStats,
    pub subscriptions: u64,
    pub subscribe_duration: Duration,
    pub bus: MetricsSnapshot,
}

impl BenchStats {
    /// Publish calls per second across all threads
    pub fn publish_rate(&self) -> f64 {
        rate(self.publishes, self.publish_duration)
    }

    /// Subscribe calls per second
    pub fn subscribe_rate(&self) -> f64 {
        rate(self.subscriptions, self.subscribe_duration)
    }

    pub fn report(&self) -> BenchReport {
        let latency = self.publish_latency_us.summary();
        BenchReport {
            threads: self.threads,
            listeners: self.listeners,
            publishes: self.publishes,
            publishes_per_sec: self.publish_rate(),
            publish_latency_us_min: latency.min,
            publish_latency_us_max: latency.max,
            publish_latency_us_mean: latency.mean,
            publish_latency_us_std: latency.std_dev,
            subscriptions: self.subscriptions,
            subscriptions_per_sec: self.subscribe_rate(),
            delivered: self.bus.delivered,
            unrouted: self.bus.unrouted,
        }
    }
}

impl fmt::Display for BenchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let latency = StatsSummary::from(&self.publish_latency_us);

        writeln!(f, "\n=== Benchmark Results ===\n")?;
        writeln!(f, "Publish")?;
        writeln!(f, "   ├─ Threads: {}", self.threads)?;
        writeln!(f, "   ├─ Listeners: {}", self.listeners)?;
        writeln!(f, "   ├─ Calls: {}", self.publishes)?;
        writeln!(f, "   ├─ Duration: {:.3}s", self.publish_duration.as_secs_f64())?;
        writeln!(f, "   ├─ Throughput: {:.0} publishes/s", self.publish_rate())?;
        writeln!(f, "   ├─ Latency (us): {}", latency)?;
        writeln!(f, "   └─ Listener invocations: {}", self.bus.delivered)?;

        writeln!(f, "\nSubscribe")?;
        writeln!(f, "   ├─ Calls: {}", self.subscriptions)?;
        writeln!(f, "   ├─ Duration: {:.3}s", self.subscribe_duration.as_secs_f64())?;
        writeln!(f, "   └─ Throughput: {:.0} subscribes/s", self.subscribe_rate())
    }
}

/// Flat, serializable view of [`BenchStats`]
#[derive(Debug, Clone, Serialize)]
pub struct BenchReport {
    pub threads: usize,
    pub listeners: usize,
    pub publishes: u64,
    pub publishes_per_sec: f64,
    pub publish_latency_us_min: f64,
    pub publish_latency_us_max: f64,
    pub publish_latency_us_mean: f64,
    pub publish_latency_us_std: f64,
    pub subscriptions: u64,
    pub subscriptions_per_sec: f64,
    pub delivered: u64,
    pub unrouted: u64,
}

/// Execute the `bench` command
pub fn run_bench(args: &BenchArgs) -> Result<()> {
    validate(args)?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    info!(
        listeners = args.listeners,
        iterations = args.iterations,
        threads = args.threads,
        isolate = args.isolate,
        "Starting benchmark"
    );

    let stats = bench(args)?;

    info!(
        publishes_per_sec = format!("{:.0}", stats.publish_rate()),
        subscribes_per_sec = format!("{:.0}", stats.subscribe_rate()),
        "Benchmark completed"
    );

    println!("{}", render(&stats, args.json)?);

    Ok(())
}

/// Render the results as a JSON report or a text summary
fn render(stats: &BenchStats, json: bool) -> Result<String> {
    if json {
        serde_json::to_string_pretty(&stats.report()).map_err(|e| CliError::Other(e.into()))
    } else {
        Ok(stats.to_string())
    }
}

fn validate(args: &BenchArgs) -> Result<()> {
    if args.threads == 0 {
        return Err(CliError::invalid_bench_args("--threads must be at least 1"));
    }
    if args.iterations < args.threads as u64 {
        return Err(CliError::invalid_bench_args(format!(
            "--iterations ({}) must be at least --threads ({})",
            args.iterations, args.threads
        )));
    }
    Ok(())
}

/// Run the publish and subscribe measurements
pub fn bench(args: &BenchArgs) -> Result<BenchStats> {
    let policy = if args.isolate {
        FailurePolicy::Isolate
    } else {
        FailurePolicy::Propagate
    };
    let bus = Dispatcher::with_config(DispatcherConfig::named("bench").with_failure_policy(policy));
    for _ in 0..args.listeners {
        bus.subscribe(BENCH_EVENT, |_: &dyn Event| {});
    }

    let per_thread = args.iterations / args.threads as u64;
    let started = Instant::now();
    let latency = publish_concurrently(&bus, args.threads, per_thread)?;
    let publish_duration = started.elapsed();

    let subscribe_bus = Dispatcher::with_config(DispatcherConfig::named("bench-subscribe"));
    let started = Instant::now();
    for _ in 0..args.subscriptions {
        subscribe_bus.subscribe(BENCH_EVENT, |_: &dyn Event| {});
    }
    let subscribe_duration = started.elapsed();

    Ok(BenchStats {
        threads: args.threads,
        listeners: args.listeners,
        publishes: per_thread * args.threads as u64,
        publish_duration,
        publish_latency_us: latency,
        subscriptions: args.subscriptions,
        subscribe_duration,
        bus: bus.metrics(),
    })
}

/// Publish from `threads` workers and merge their latency samples
fn publish_concurrently(bus: &Dispatcher, threads: usize, per_thread: u64) -> Result<RunningStats> {
    let results: Vec<_> = thread::scope(|s| {
        let workers: Vec<_> = (0..threads)
            .map(|_| s.spawn(|| publish_loop(bus, per_thread)))
            .collect();

        // Join every worker before inspecting results
        workers.into_iter().map(|worker| worker.join()).collect()
    });

    let mut merged = RunningStats::default();
    for (worker, result) in results.into_iter().enumerate() {
        let stats = result.map_err(|_| CliError::bench_worker_failed(worker))?;
        merged.merge(&stats);
    }
    Ok(merged)
}

fn publish_loop(bus: &Dispatcher, iterations: u64) -> RunningStats {
    let mut stats = RunningStats::default();
    let event = BenchEvent;

    for _ in 0..iterations {
        let started = Instant::now();
        bus.publish_ref(&event);
        stats.push(started.elapsed().as_secs_f64() * 1_000_000.0);
    }

    stats
}

fn rate(count: u64, duration: Duration) -> f64 {
    if duration.as_secs_f64() > 0.0 {
        count as f64 / duration.as_secs_f64()
    } else {
        0.0
    }
}
