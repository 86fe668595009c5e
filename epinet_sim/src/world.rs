//! SimWorld - owns one network, its random source and the step counter.

use crate::config::SimConfig;

use epinet_core::{
    get_stats, seed_infected, spread_by_layer, step_report, LayerId, Network, SimStats,
};
use epinet_env::SeededRandom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// One tick as seen from outside the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// 1-based step number
    pub step: u64,

    /// Counts after the step
    pub stats: SimStats,

    /// Layers that infected at least one agent
    pub active_layers: BTreeSet<LayerId>,

    /// New infections per layer
    pub new_infections: Vec<u32>,

    pub new_recoveries: usize,
}

/// What [`SimWorld::apply_config`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigChange {
    /// Network regenerated and reseeded
    Rebuilt,

    /// Network kept, infection reseeded
    Reseeded,

    /// Only rates or frequencies changed; the outbreak continues
    Updated,
}

/// The SimWorld - the single execution context of a run.
///
/// Every mutating call takes `&mut self`, so steps can never run
/// concurrently or re-entrantly on the same network.
pub struct SimWorld {
    /// Configuration
    config: SimConfig,

    /// Random source shared by generation, seeding and stepping
    rng: SeededRandom,

    network: Network,

    /// Counts right after the last seeding
    initial_stats: SimStats,

    /// Steps taken since the last seeding
    iteration: u64,

    history: Vec<StepRecord>,
}

impl SimWorld {
    /// Builds and seeds a fresh world from `config`.
    pub fn new(config: SimConfig) -> Self {
        let config = config.normalized();
        let mut rng = SeededRandom::new(&config.seed);
        let network = Network::build(config.num_agents, &config.layers, &mut rng);

        let mut world = Self {
            config,
            rng,
            network,
            initial_stats: SimStats::default(),
            iteration: 0,
            history: Vec::new(),
        };
        world.seed_outbreak();

        info!(
            "World ready: seed={} agents={} layers={} initial_infected={}",
            world.config.seed,
            world.network.num_agents(),
            world.network.num_layers(),
            world.initial_stats.infected
        );
        world
    }

    /// Advances one step and records it.
    pub fn tick(&mut self) -> &StepRecord {
        self.iteration += 1;
        let outcome = step_report(
            &mut self.network,
            self.config.spread_rate,
            self.config.recovery_rate,
            self.iteration,
            &mut self.rng,
        );

        let record = StepRecord {
            step: self.iteration,
            stats: get_stats(&self.network),
            active_layers: outcome.active_layers,
            new_infections: outcome.new_infections_by_layer,
            new_recoveries: outcome.new_recoveries,
        };

        debug!(
            "t={} | S={} I={} R={} | active={:?}",
            record.step,
            record.stats.susceptible,
            record.stats.infected,
            record.stats.recovered,
            record.active_layers
        );

        self.history.push(record);
        &self.history[self.history.len() - 1]
    }

    /// Ticks until no agent is infected or `max_steps` steps have been taken
    /// since seeding. Returns the number of steps run by this call.
    pub fn run(&mut self, max_steps: u64) -> u64 {
        let start = self.iteration;
        while self.iteration < max_steps && !self.is_extinct() {
            self.tick();
        }
        self.iteration - start
    }

    /// Keeps the network and reseeds the infection from the current stream.
    pub fn reseed(&mut self) {
        self.seed_outbreak();
        info!("Reseeded {} agents on existing network", self.initial_stats.infected);
    }

    /// Regenerates the network from the configured seed, as [`SimWorld::new`] would.
    pub fn rebuild(&mut self) {
        self.rng.reseed(&self.config.seed);
        self.network = Network::build(self.config.num_agents, &self.config.layers, &mut self.rng);
        self.seed_outbreak();
        info!(
            "Rebuilt network: agents={} layers={}",
            self.network.num_agents(),
            self.network.num_layers()
        );
    }

    /// Switches to `config`, doing the cheapest reset that honours it.
    pub fn apply_config(&mut self, config: SimConfig) -> ConfigChange {
        let config = config.normalized();
        let rebuild = self.config.requires_rebuild(&config);
        let reseed = self.config.initial_infected != config.initial_infected;
        self.config = config;

        if rebuild {
            self.rebuild();
            return ConfigChange::Rebuilt;
        }

        for (id, layer) in self.config.layers.iter().enumerate() {
            self.network.set_layer_frequency(id, layer.frequency);
        }

        if reseed {
            self.reseed();
            ConfigChange::Reseeded
        } else {
            ConfigChange::Updated
        }
    }

    /// True when no agent is currently infected.
    pub fn is_extinct(&self) -> bool {
        self.stats().infected == 0
    }

    pub fn stats(&self) -> SimStats {
        get_stats(&self.network)
    }

    pub fn initial_stats(&self) -> SimStats {
        self.initial_stats
    }

    pub fn spread_by_layer(&self) -> Vec<u64> {
        spread_by_layer(&self.network)
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Steps taken since the last seeding.
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    /// Step records since the last seeding.
    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    /// Random values consumed since the stream was last restarted.
    pub fn draws(&self) -> u64 {
        self.rng.draws()
    }

    fn seed_outbreak(&mut self) {
        seed_infected(&mut self.network, self.config.initial_infected, &mut self.rng);
        self.initial_stats = get_stats(&self.network);
        self.iteration = 0;
        self.history.clear();
    }
}
