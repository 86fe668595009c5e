//! Layers: one contact graph over the shared agent arena.

use crate::agent::{AgentId, LayerId};
use crate::topology::{generate_edges, Topology};
use epinet_env::RandomSource;
use serde::{Deserialize, Serialize};

/// Directed, weighted contact. Each undirected connection is stored twice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: AgentId,
    pub target: AgentId,
    /// Transmission multiplier in `[0.3, 1.0]`
    pub weight: f64,
}

impl Edge {
    pub fn new(source: AgentId, target: AgentId, weight: f64) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }
}

/// Generation parameters for one layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub topology: Topology,

    /// Density parameter in `[0, 1]`
    pub connectivity: f64,

    /// Layer fires every `frequency` steps
    #[serde(default = "default_frequency")]
    pub frequency: u32,
}

fn default_frequency() -> u32 {
    1
}

impl LayerConfig {
    pub fn new(topology: Topology, connectivity: f64, frequency: u32) -> Self {
        Self {
            topology,
            connectivity,
            frequency,
        }
    }

    /// Clamps the parameters into their valid ranges.
    ///
    /// NaN connectivity becomes 0 and a zero frequency becomes 1.
    pub fn normalized(&self) -> Self {
        let connectivity = if self.connectivity.is_nan() {
            0.0
        } else {
            self.connectivity.clamp(0.0, 1.0)
        };
        Self {
            topology: self.topology,
            connectivity,
            frequency: self.frequency.max(1),
        }
    }

    /// True when switching from `self` to `other` needs fresh edges.
    ///
    /// Frequency only gates firing, so it can change in place.
    pub fn requires_regeneration(&self, other: &LayerConfig) -> bool {
        self.topology != other.topology || self.connectivity != other.connectivity
    }
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::new(Topology::Random, 0.05, 1)
    }
}

/// Neighbour lookup for one layer: `source -> [(target, weight)]`, in edge order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborIndex {
    neighbors: Vec<Vec<(AgentId, f64)>>,
}

impl NeighborIndex {
    /// Indexes `edges` over `num_agents` agents. Out-of-range endpoints are skipped.
    pub fn build(edges: &[Edge], num_agents: usize) -> Self {
        let mut neighbors = vec![Vec::new(); num_agents];
        for edge in edges {
            if edge.source < num_agents && edge.target < num_agents {
                neighbors[edge.source].push((edge.target, edge.weight));
            }
        }
        Self { neighbors }
    }

    /// Weighted neighbours of `agent`; empty for unknown ids.
    pub fn neighbors(&self, agent: AgentId) -> &[(AgentId, f64)] {
        self.neighbors.get(agent).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn degree(&self, agent: AgentId) -> usize {
        self.neighbors(agent).len()
    }
}

/// One contact graph with its firing schedule.
#[derive(Debug, Clone, Serialize)]
pub struct Layer {
    pub id: LayerId,
    pub topology: Topology,
    pub connectivity: f64,
    pub frequency: u32,
    pub edges: Vec<Edge>,

    /// Edges never change after construction, so the lookup is built once.
    #[serde(skip)]
    index: NeighborIndex,
}

impl Layer {
    /// Generates a layer from `config`, drawing edges from `rng`.
    pub fn generate<R: RandomSource + ?Sized>(
        id: LayerId,
        config: &LayerConfig,
        num_agents: usize,
        rng: &mut R,
    ) -> Self {
        let config = config.normalized();
        let edges = generate_edges(config.topology, num_agents, config.connectivity, rng);
        Self::from_edges(id, &config, edges, num_agents)
    }

    /// Wraps an existing edge list.
    pub fn from_edges(id: LayerId, config: &LayerConfig, edges: Vec<Edge>, num_agents: usize) -> Self {
        let config = config.normalized();
        let index = NeighborIndex::build(&edges, num_agents);
        Self {
            id,
            topology: config.topology,
            connectivity: config.connectivity,
            frequency: config.frequency,
            edges,
            index,
        }
    }

    /// Whether this layer spreads on 1-based step `iter`.
    ///
    /// Fires on `1, 1 + f, 1 + 2f, ...`. Step 0 is treated as `-1 mod f`.
    pub fn fires_on(&self, iter: u64) -> bool {
        let frequency = self.frequency.max(1) as i128;
        (iter as i128 - 1).rem_euclid(frequency) == 0
    }

    pub fn neighbors(&self, agent: AgentId) -> &[(AgentId, f64)] {
        self.index.neighbors(agent)
    }

    pub fn index(&self) -> &NeighborIndex {
        &self.index
    }

    /// Undirected connections (half the directed edge count).
    pub fn connection_count(&self) -> usize {
        self.edges.len() / 2
    }

    pub fn config(&self) -> LayerConfig {
        LayerConfig::new(self.topology, self.connectivity, self.frequency)
    }

    pub(crate) fn set_frequency(&mut self, frequency: u32) {
        self.frequency = frequency.max(1);
    }

    pub(crate) fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }

    /// Drops edges touching agents outside `[0, num_agents)` and rebuilds
    /// the neighbour index.
    pub(crate) fn restrict_to(&mut self, num_agents: usize) {
        self.edges
            .retain(|e| e.source < num_agents && e.target < num_agents);
        self.index = NeighborIndex::build(&self.edges, num_agents);
    }
}
