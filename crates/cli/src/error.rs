//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid benchmark parameters
    #[error("Invalid benchmark parameters: {message}")]
    InvalidBenchArgs { message: String },

    /// A benchmark worker thread panicked
    #[error("Benchmark worker {worker} panicked")]
    BenchWorkerFailed { worker: usize },

    /// A scenario did not reach its expected end state
    #[error("Scenario '{scenario}' failed: {message}")]
    Scenario { scenario: String, message: String },

    /// Generic error wrapper
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    pub fn invalid_bench_args(message: impl Into<String>) -> Self {
        Self::InvalidBenchArgs {
            message: message.into(),
        }
    }

    pub fn bench_worker_failed(worker: usize) -> Self {
        Self::BenchWorkerFailed { worker }
    }

    pub fn scenario(scenario: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Scenario {
            scenario: scenario.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
