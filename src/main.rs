use anyhow::{Context, Result};
use barge_sim::simulation::{DeparturePolicy, Duration, SimConfig, Simulation, Timestamp};
use clap::Parser;
use log::info;

#[derive(Parser)]
#[command(name = "barge_sim")]
#[command(about = "Headless container network simulation")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "96")]
    ticks: u64,

    /// Simulated minutes per tick
    #[arg(long, default_value = "30")]
    step_minutes: i64,

    /// Seed for the sample container requests
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Number of sample container requests
    #[arg(long, default_value = "5")]
    containers: usize,

    /// Hold loaded barges until the service's next scheduled departure
    #[arg(long)]
    scheduled: bool,

    /// Print a report every N ticks
    #[arg(long, default_value = "8")]
    report_every: u64,

    /// Start time as YYYY-MM-DDTHH:MM (defaults to now)
    #[arg(long)]
    start: Option<String>,

    /// Wall-clock pause between reports in milliseconds
    #[arg(long, default_value = "0")]
    pace_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,barge_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;
    run_headless(&cli, config)
}

fn build_config(cli: &Cli) -> Result<SimConfig> {
    let policy = if cli.scheduled {
        DeparturePolicy::Scheduled
    } else {
        DeparturePolicy::Opportunistic
    };
    let step = Duration::try_minutes(cli.step_minutes)
        .with_context(|| format!("--step-minutes {} is out of range", cli.step_minutes))?;
    let mut config = SimConfig::default()
        .with_step(step)
        .with_departure_policy(policy);

    if let Some(start) = &cli.start {
        let epoch = Timestamp::parse_from_str(start, "%Y-%m-%dT%H:%M")
            .with_context(|| format!("Invalid start time {start:?}, expected YYYY-MM-DDTHH:MM"))?;
        config = config.with_epoch(epoch);
    }

    Ok(config)
}

/// Run the simulation without any front end, printing periodic reports
fn run_headless(cli: &Cli, config: SimConfig) -> Result<()> {
    let mut sim = Simulation::sample_network(config, cli.seed, cli.containers)
        .context("Failed to seed the sample network")?;

    info!(
        "Running {} ticks of {} minutes ({:?} departures)",
        cli.ticks,
        cli.step_minutes,
        sim.config().departure_policy
    );

    println!("Initial state:");
    sim.print_summary();
    sim.print_network();

    let report_every = cli.report_every.max(1);
    for tick in 1..=cli.ticks {
        let summary = sim
            .step()
            .with_context(|| format!("Tick {tick} failed"))?;
        if summary.delivered > 0 || summary.committed > 0 {
            info!(
                "tick {}: {} committed, {} departed, {} arrived, {} loaded, {} delivered",
                tick,
                summary.committed,
                summary.departed,
                summary.arrived,
                summary.loaded,
                summary.delivered
            );
        }

        if tick % report_every == 0 {
            println!("{}", sim.report().context("Failed to build report")?);
            if cli.pace_ms > 0 && tick < cli.ticks {
                std::thread::sleep(std::time::Duration::from_millis(cli.pace_ms));
            }
        }
    }

    println!("=== Final State ===");
    sim.print_summary();
    let report = sim.report().context("Failed to build final report")?;
    println!("{}", report);

    info!("=== SIMULATION COMPLETE ===");
    info!("Total containers: {}", report.total_containers);
    info!("Delivered: {}", report.delivered);
    info!("Stranded: {}", report.stranded);
    Ok(())
}
