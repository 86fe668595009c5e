//! Run configuration.

use crate::error::{Result, SimError};
use epinet_core::{LayerConfig, Topology};
use epinet_env::Seed;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Inbound parameters of one simulation run.
///
/// Missing JSON fields fall back to [`SimConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Master seed for generation and stepping
    pub seed: Seed,

    /// Population size
    pub num_agents: usize,

    /// Per-contact transmission probability (scaled by edge weight)
    pub spread_rate: f64,

    /// Per-step recovery probability
    pub recovery_rate: f64,

    /// Agents infected at seeding time
    pub initial_infected: usize,

    /// Contact layers, in id order
    pub layers: Vec<LayerConfig>,

    /// Upper bound on steps per outbreak
    pub max_steps: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: Seed::default(),
            num_agents: 200,
            spread_rate: 0.3,
            recovery_rate: 0.1,
            initial_infected: 5,
            layers: vec![LayerConfig::new(Topology::Random, 0.05, 1)],
            max_steps: 500,
        }
    }
}

impl SimConfig {
    /// Loads a config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| SimError::io(path.display().to_string(), e))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_seed(mut self, seed: impl Into<Seed>) -> Self {
        self.seed = seed.into();
        self
    }

    pub fn with_agents(mut self, num_agents: usize) -> Self {
        self.num_agents = num_agents;
        self
    }

    pub fn with_rates(mut self, spread_rate: f64, recovery_rate: f64) -> Self {
        self.spread_rate = spread_rate;
        self.recovery_rate = recovery_rate;
        self
    }

    pub fn with_initial_infected(mut self, count: usize) -> Self {
        self.initial_infected = count;
        self
    }

    pub fn with_layers(mut self, layers: Vec<LayerConfig>) -> Self {
        self.layers = layers;
        self
    }

    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Clamps rates into `[0, 1]` (NaN to 0) and normalizes every layer.
    pub fn normalized(&self) -> Self {
        Self {
            spread_rate: clamp_rate(self.spread_rate),
            recovery_rate: clamp_rate(self.recovery_rate),
            layers: self.layers.iter().map(LayerConfig::normalized).collect(),
            ..self.clone()
        }
    }

    /// True when moving from `self` to `other` needs a freshly built network.
    ///
    /// Agent count, layer count, topology and connectivity are generation
    /// inputs; rates, frequencies and the seeding count are not.
    pub fn requires_rebuild(&self, other: &SimConfig) -> bool {
        self.seed != other.seed
            || self.num_agents != other.num_agents
            || self.layers.len() != other.layers.len()
            || self
                .layers
                .iter()
                .zip(&other.layers)
                .any(|(a, b)| a.requires_regeneration(b))
    }
}

fn clamp_rate(rate: f64) -> f64 {
    if rate.is_nan() {
        0.0
    } else {
        rate.clamp(0.0, 1.0)
    }
}
