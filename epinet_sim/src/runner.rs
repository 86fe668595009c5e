//! Scenario runner - executes outbreaks and summarizes them.

use crate::config::SimConfig;
use crate::exporter::SimExport;
use crate::scenarios::ScenarioId;
use crate::world::SimWorld;

use epinet_core::SimStats;
use epinet_env::Seed;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Summary of one outbreak, from seeding to extinction or the step limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutbreakMetrics {
    /// Steps taken
    pub steps: u64,

    /// Highest simultaneous infected count
    pub peak_infected: usize,

    /// First step at which the peak was reached (0 = at seeding)
    pub peak_step: u64,

    pub final_stats: SimStats,

    /// Fraction of agents ever infected
    pub attack_rate: f64,

    /// Infections caused per layer
    pub spread_by_layer: Vec<u64>,

    /// No infected agent left at the end
    pub extinct: bool,
}

impl OutbreakMetrics {
    /// Summarizes the world's current outbreak.
    pub fn from_world(world: &SimWorld) -> Self {
        let mut peak_infected = world.initial_stats().infected;
        let mut peak_step = 0;
        for record in world.history() {
            if record.stats.infected > peak_infected {
                peak_infected = record.stats.infected;
                peak_step = record.step;
            }
        }

        let final_stats = world.stats();
        Self {
            steps: world.iteration(),
            peak_infected,
            peak_step,
            final_stats,
            attack_rate: final_stats.attack_rate(),
            spread_by_layer: world.spread_by_layer(),
            extinct: final_stats.infected == 0,
        }
    }
}

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// Scenario that was run
    pub scenario: String,

    /// Seed used
    pub seed: Seed,

    pub num_agents: usize,

    pub num_layers: usize,

    /// One entry per outbreak (first seeding plus each reseed)
    pub outbreaks: Vec<OutbreakMetrics>,
}

impl ScenarioResult {
    /// Mean attack rate over all outbreaks.
    pub fn mean_attack_rate(&self) -> f64 {
        if self.outbreaks.is_empty() {
            return 0.0;
        }
        self.outbreaks.iter().map(|o| o.attack_rate).sum::<f64>() / self.outbreaks.len() as f64
    }

    /// True when every outbreak died out before the step limit.
    pub fn all_extinct(&self) -> bool {
        self.outbreaks.iter().all(|o| o.extinct)
    }
}

/// Runs scenarios with optional overrides.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    /// Overrides the scenario seed
    seed: Option<Seed>,

    /// Overrides the population size
    num_agents: Option<usize>,

    /// Overrides the per-outbreak step limit
    max_steps: Option<u64>,

    /// Extra outbreaks on the same network
    reseeds: usize,
}

impl ScenarioRunner {
    /// Creates a runner that uses scenario values as-is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the seed.
    pub fn with_seed(mut self, seed: Seed) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the population size.
    pub fn with_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = Some(num_agents);
        self
    }

    /// Sets the maximum steps per outbreak.
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Runs `reseeds` further outbreaks on the same network after the first.
    pub fn with_reseeds(mut self, reseeds: usize) -> Self {
        self.reseeds = reseeds;
        self
    }

    /// Applies the runner's overrides to `config`.
    pub fn apply_overrides(&self, mut config: SimConfig) -> SimConfig {
        if let Some(seed) = &self.seed {
            config.seed = seed.clone();
        }
        if let Some(num_agents) = self.num_agents {
            config.num_agents = num_agents;
        }
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }
        config
    }

    /// Runs a preset scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        info!("Starting scenario: {} ({})", scenario.name(), scenario.description());
        self.run_config(scenario.name(), scenario.config())
    }

    /// Runs an arbitrary config under `name`.
    pub fn run_config(&self, name: &str, config: SimConfig) -> ScenarioResult {
        self.execute(name, config, None)
    }

    /// Runs a config and also collects every frame for export.
    pub fn run_with_export(
        &self,
        name: &str,
        config: SimConfig,
        include_network: bool,
    ) -> (ScenarioResult, SimExport) {
        let config = self.apply_overrides(config);
        let mut export = SimExport::new(name, &config);
        let result = self.execute(name, config, Some((&mut export, include_network)));
        (result, export)
    }

    fn execute(
        &self,
        name: &str,
        config: SimConfig,
        mut export: Option<(&mut SimExport, bool)>,
    ) -> ScenarioResult {
        let config = self.apply_overrides(config);
        let max_steps = config.max_steps;
        let mut world = SimWorld::new(config);
        let mut outbreaks = Vec::with_capacity(self.reseeds + 1);

        for round in 0..=self.reseeds {
            if round > 0 {
                world.reseed();
            }
            world.run(max_steps);

            let metrics = OutbreakMetrics::from_world(&world);
            info!(
                "{} outbreak {}: {} steps, peak {} at t={}, attack rate {:.1}%{}",
                name,
                round,
                metrics.steps,
                metrics.peak_infected,
                metrics.peak_step,
                metrics.attack_rate * 100.0,
                if metrics.extinct { "" } else { " (still spreading)" }
            );
            debug!("  spread by layer: {:?}", metrics.spread_by_layer);

            if let Some((export, _)) = export.as_mut() {
                export.record_outbreak(round, &world);
            }
            outbreaks.push(metrics);
        }

        if let Some((export, include_network)) = export {
            export.finalize(&world, include_network);
        }

        ScenarioResult {
            scenario: name.to_string(),
            seed: world.config().seed.clone(),
            num_agents: world.network().num_agents(),
            num_layers: world.network().num_layers(),
            outbreaks,
        }
    }
}
