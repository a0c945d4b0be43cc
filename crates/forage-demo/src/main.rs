//! Hunter-gatherer demo binary.
//!
//! Runs one agent through the forage loop and logs every decision.
//!
//! ```bash
//! FORAGE_SEED=7 RUST_LOG=forage_demo=debug cargo run -p forage-demo
//! ```

use anyhow::Result;
use forage_demo::{DemoConfig, HunterGatherer, SimError, Simulation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let config = DemoConfig::from_env();
    setup_logging();

    tracing::info!(
        ticks = config.ticks,
        seed = ?config.seed,
        start_energy = config.start_energy,
        strict_names = config.strict_names,
        "starting forage run"
    );

    let mut sim = Simulation::new(
        HunterGatherer::new(config.start_energy),
        config.evaluator_config(),
        config.seed,
    );

    for _ in 0..config.ticks {
        match sim.step() {
            Ok(report) => tracing::info!(
                tick = report.tick,
                action = %report.action,
                outcome = ?report.outcome,
                energy = report.energy,
                "tick"
            ),
            Err(err @ SimError::Starved { .. }) => {
                tracing::error!(error = %err, "run ended");
                return Err(err.into());
            }
            Err(err) => return Err(err.into()),
        }
    }

    let agent = sim.agent();
    tracing::info!(
        ticks = sim.tick_count(),
        energy = agent.energy,
        fruit = agent.fruit,
        nuts = agent.nuts,
        "agent survived"
    );
    Ok(())
}

/// Logs to stderr, filtered by `RUST_LOG` with `info` as the floor.
fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
