//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};

/// Event bus - in-process publish/subscribe demos and benchmarks
#[derive(Parser, Debug)]
#[command(
    name = "eventbus",
    author,
    version,
    about = "In-process publish/subscribe event bus",
    long_about = "Demos and benchmarks for a thread-safe, in-process event bus.\n\n\
                  Components subscribe to named event categories and publishers \n\
                  broadcast typed events without referencing each other."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "EVENTBUS_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "EVENTBUS_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run an example scenario
    Demo(DemoArgs),

    /// Measure publish and subscribe throughput
    Bench(BenchArgs),
}

/// Arguments for the `demo` command
#[derive(Parser, Debug, Clone)]
pub struct DemoArgs {
    /// Scenario to run
    #[arg(value_enum)]
    pub scenario: Scenario,

    /// Delay before a dead player respawns (game scenario)
    #[arg(long, default_value = "500", env = "EVENTBUS_RESPAWN_DELAY_MS")]
    pub respawn_delay_ms: u64,

    /// Keep dispatching when a listener panics instead of propagating the panic
    #[arg(long)]
    pub isolate: bool,
}

/// Arguments for the `bench` command
#[derive(Parser, Debug, Clone)]
pub struct BenchArgs {
    /// Listeners subscribed to the benchmark category (0 = measure the unrouted path)
    #[arg(long, default_value = "1")]
    pub listeners: usize,

    /// Total publish calls, split evenly across threads
    #[arg(long, default_value = "100000", env = "EVENTBUS_BENCH_ITERATIONS")]
    pub iterations: u64,

    /// Concurrent publisher threads
    #[arg(long, default_value = "1")]
    pub threads: usize,

    /// Subscribe calls to time on a separate bus
    #[arg(long, default_value = "10000")]
    pub subscriptions: u64,

    /// Dispatch under the isolating failure policy
    #[arg(long)]
    pub isolate: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "EVENTBUS_METRICS_PORT")]
    pub metrics_port: u16,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Example scenarios
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scenario {
    /// User login/logout and chat messages on one bus
    Basic,
    /// Player and world buses driving audio, physics and render systems
    Game,
    /// Application, physics and audio buses with cross-bus forwarding
    Buses,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
