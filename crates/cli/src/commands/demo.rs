//! `demo` command implementation.

use std::time::Duration;

use tracing::info;

use dispatcher::FailurePolicy;

use crate::cli::{DemoArgs, Scenario};
use crate::error::Result;
use crate::scenarios::{self, ScenarioOptions, ScenarioReport, Transcript};

/// Execute the `demo` command
pub async fn run_demo(args: &DemoArgs) -> Result<()> {
    let options = ScenarioOptions {
        failure_policy: if args.isolate {
            FailurePolicy::Isolate
        } else {
            FailurePolicy::Propagate
        },
        respawn_delay: Duration::from_millis(args.respawn_delay_ms),
    };

    info!(
        scenario = ?args.scenario,
        failure_policy = ?options.failure_policy,
        "Running scenario"
    );

    println!("=== {} ===\n", title(args.scenario));

    let transcript = Transcript::new();
    let report = match args.scenario {
        Scenario::Basic => scenarios::basic::run(&options, &transcript),
        Scenario::Game => scenarios::game::run(&options, &transcript).await?,
        Scenario::Buses => scenarios::buses::run(&options, &transcript),
    };

    println!("\n=== Example Complete ===");
    print_report(&report);

    Ok(())
}

fn title(scenario: Scenario) -> &'static str {
    match scenario {
        Scenario::Basic => "EventBus Basic Example",
        Scenario::Game => "Game Event Bus Example",
        Scenario::Buses => "Multiple Event Buses Example",
    }
}

fn print_report(report: &ScenarioReport) {
    for (bus, metrics) in &report.buses {
        info!(
            bus = %bus,
            published = metrics.published,
            delivered = metrics.delivered,
            unrouted = metrics.unrouted,
            failed = metrics.failed,
            subscriptions = metrics.subscriptions,
            "Bus summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_demo_buses_isolated() {
        let args = DemoArgs {
            scenario: Scenario::Buses,
            respawn_delay_ms: 0,
            isolate: true,
        };
        run_demo(&args).await.unwrap();
    }

    #[test]
    fn test_titles_are_distinct() {
        assert_ne!(title(Scenario::Basic), title(Scenario::Game));
        assert_ne!(title(Scenario::Game), title(Scenario::Buses));
    }
}
