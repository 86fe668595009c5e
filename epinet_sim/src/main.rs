//! Epinet Simulator CLI
//!
//! Run multilayer SIR outbreaks headlessly, from presets or a JSON config.

use clap::Parser;
use epinet_core::Topology;
use epinet_env::Seed;
use epinet_sim::scenarios::ScenarioId;
use epinet_sim::{ScenarioResult, ScenarioRunner, SimConfig, SimError};
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Epinet multilayer SIR simulator
#[derive(Parser, Debug)]
#[command(name = "epinet-sim")]
#[command(about = "Run multilayer network SIR epidemic simulations", long_about = None)]
struct Args {
    /// Seed for the whole run (number or text)
    #[arg(short, long)]
    seed: Option<String>,

    /// Number of agents (overrides scenario/config)
    #[arg(short, long)]
    agents: Option<usize>,

    /// Scenario to run (random_mixing, small_world, scale_free, household_work, weekly_gathering, superspreader, all)
    #[arg(short = 'S', long, default_value = "all")]
    scenario: String,

    /// JSON run configuration; replaces the scenario presets
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum steps per outbreak
    #[arg(long)]
    steps: Option<u64>,

    /// Extra outbreaks reseeded on the same network
    #[arg(long, default_value = "0")]
    reseeds: usize,

    /// Export frames to a JSON file (single scenario or config only)
    #[arg(long)]
    export: Option<PathBuf>,

    /// Include the final network (agents and edges) in the export
    #[arg(long)]
    with_network: bool,

    /// List scenarios and topologies, then exit
    #[arg(long)]
    list: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    if args.list {
        list_presets();
        return;
    }

    if !args.json {
        info!("Epinet Simulator v{}", env!("CARGO_PKG_VERSION"));
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    }

    match run(&args) {
        Ok(results) => report(&args, &results),
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Resolves the runs requested on the command line and executes them.
fn run(args: &Args) -> Result<Vec<ScenarioResult>, SimError> {
    let mut runner = ScenarioRunner::new().with_reseeds(args.reseeds);
    if let Some(seed) = &args.seed {
        runner = runner.with_seed(Seed::from(seed.as_str()));
    }
    if let Some(agents) = args.agents {
        runner = runner.with_agents(agents);
    }
    if let Some(steps) = args.steps {
        runner = runner.with_max_steps(steps);
    }

    let runs: Vec<(String, SimConfig)> = match &args.config {
        Some(path) => {
            let config = SimConfig::from_json_file(path)?;
            info!("Loaded config from {}", path.display());
            vec![("custom".to_string(), config)]
        }
        None if args.scenario == "all" => ScenarioId::all()
            .into_iter()
            .map(|s| (s.name().to_string(), s.config()))
            .collect(),
        None => {
            let scenario: ScenarioId = args
                .scenario
                .parse()
                .map_err(|_| SimError::UnknownScenario(args.scenario.clone()))?;
            vec![(scenario.name().to_string(), scenario.config())]
        }
    };

    if let Some(export_path) = &args.export {
        if runs.len() > 1 {
            return Err(SimError::config(
                "--export only supports a single scenario or --config, not 'all'",
            ));
        }
        let Some((name, config)) = runs.into_iter().next() else {
            return Ok(Vec::new());
        };
        let (result, export) = runner.run_with_export(&name, config, args.with_network);
        export.write_to_file(export_path)?;
        info!("Exported {} frames to {}", export.frames.len(), export_path.display());
        return Ok(vec![result]);
    }

    Ok(runs
        .into_iter()
        .map(|(name, config)| runner.run_config(&name, config))
        .collect())
}

fn report(args: &Args, results: &[ScenarioResult]) {
    if args.json {
        let summary = serde_json::json!({
            "total": results.len(),
            "results": results,
        });
        match serde_json::to_string_pretty(&summary) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                error!("Failed to encode summary: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    info!("");
    info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    for result in results {
        let last = result.outbreaks.last();
        info!(
            "{} (seed={}): {} agents, {} layers, mean attack rate {:.1}%, final {:?}",
            result.scenario,
            result.seed,
            result.num_agents,
            result.num_layers,
            result.mean_attack_rate() * 100.0,
            last.map(|o| o.final_stats)
        );
    }
}

fn list_presets() {
    println!("Scenarios:");
    for scenario in ScenarioId::all() {
        println!("  {:<18} {}", scenario.name(), scenario.description());
    }
    println!("Topologies:");
    for topology in Topology::all() {
        println!("  {:<18} {}", topology.name(), topology.description());
    }
}
