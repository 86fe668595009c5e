//! JSON exporter for external renderers.
//!
//! Exports per-step frames plus an optional final network snapshot, the
//! same data the chart and graph views consume.

use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::world::{SimWorld, StepRecord};

use epinet_core::{layer_stats, Agent, Edge, LayerId, LayerStats, Network, SimStats, Topology};
use epinet_env::Seed;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single exported tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimFrame {
    /// Outbreak index (0 for the first seeding, then one per reseed)
    pub outbreak: usize,

    /// Step number; 0 is the state right after seeding
    pub step: u64,

    pub stats: SimStats,

    /// Layers to highlight for this tick
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub active_layers: BTreeSet<LayerId>,

    pub new_infections: Vec<u32>,

    pub new_recoveries: usize,
}

impl SimFrame {
    fn from_record(outbreak: usize, record: &StepRecord) -> Self {
        Self {
            outbreak,
            step: record.step,
            stats: record.stats,
            active_layers: record.active_layers.clone(),
            new_infections: record.new_infections.clone(),
            new_recoveries: record.new_recoveries,
        }
    }
}

/// Edges and schedule of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub id: LayerId,
    pub topology: Topology,
    pub connectivity: f64,
    pub frequency: u32,
    pub edges: Vec<Edge>,
}

/// Read-only copy of a network for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub agents: Vec<Agent>,
    pub layers: Vec<LayerSnapshot>,
}

impl From<&Network> for NetworkSnapshot {
    fn from(network: &Network) -> Self {
        Self {
            agents: network.agents().to_vec(),
            layers: network
                .layers()
                .iter()
                .map(|layer| LayerSnapshot {
                    id: layer.id,
                    topology: layer.topology,
                    connectivity: layer.connectivity,
                    frequency: layer.frequency,
                    edges: layer.edges.clone(),
                })
                .collect(),
        }
    }
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Seed used
    pub seed: Seed,

    /// Parameters of the run
    pub config: SimConfig,

    /// Structure of every layer
    pub layers: Vec<LayerStats>,

    /// All frames, every outbreak in order
    pub frames: Vec<SimFrame>,

    /// Counts at the end of the last outbreak
    pub final_stats: SimStats,

    /// Infections caused per layer in the last outbreak
    pub spread_by_layer: Vec<u64>,

    /// Final network, if requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkSnapshot>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(scenario: &str, config: &SimConfig) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed: config.seed.clone(),
            config: config.clone(),
            layers: Vec::new(),
            frames: Vec::new(),
            final_stats: SimStats::default(),
            spread_by_layer: Vec::new(),
            network: None,
        }
    }

    /// Appends the frames of the world's current outbreak, starting with
    /// the post-seeding state.
    pub fn record_outbreak(&mut self, outbreak: usize, world: &SimWorld) {
        self.frames.push(SimFrame {
            outbreak,
            step: 0,
            stats: world.initial_stats(),
            active_layers: BTreeSet::new(),
            new_infections: vec![0; world.network().num_layers()],
            new_recoveries: 0,
        });
        self.frames.extend(
            world
                .history()
                .iter()
                .map(|record| SimFrame::from_record(outbreak, record)),
        );
    }

    /// Finalizes the export from the world's end state.
    pub fn finalize(&mut self, world: &SimWorld, include_network: bool) {
        self.config = world.config().clone();
        self.layers = layer_stats(world.network());
        self.final_stats = world.stats();
        self.spread_by_layer = world.spread_by_layer();
        self.network = include_network.then(|| NetworkSnapshot::from(world.network()));
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path).map_err(|e| SimError::io(path.display().to_string(), e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| SimError::io(path.display().to_string(), e))?;
        Ok(())
    }
}
