//! Contact-graph generators.
//!
//! Every generator returns undirected connections as matched directed pairs:
//! `(u, v, w)` is present iff `(v, u, w)` is, with an independently drawn
//! weight in `[EDGE_WEIGHT_MIN, EDGE_WEIGHT_MAX]`. Fewer than two agents
//! always yields no edges.

use crate::agent::AgentId;
use crate::layer::Edge;
use epinet_env::RandomSource;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lightest possible edge weight.
pub const EDGE_WEIGHT_MIN: f64 = 0.3;

/// Heaviest possible edge weight.
pub const EDGE_WEIGHT_MAX: f64 = 1.0;

/// Watts-Strogatz rewiring probability.
pub const REWIRE_PROBABILITY: f64 = 0.1;

/// Contact-graph model of a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Erdős–Rényi: every pair connected independently
    Random,

    /// Watts–Strogatz: rewired ring lattice
    #[serde(alias = "small_world")]
    SmallWorld,

    /// Barabási–Albert: preferential attachment
    #[serde(alias = "scale_free")]
    ScaleFree,
}

impl Topology {
    /// Returns all topologies.
    pub fn all() -> Vec<Topology> {
        vec![Topology::Random, Topology::SmallWorld, Topology::ScaleFree]
    }

    /// Returns the topology name.
    pub fn name(&self) -> &'static str {
        match self {
            Topology::Random => "random",
            Topology::SmallWorld => "smallworld",
            Topology::ScaleFree => "scalefree",
        }
    }

    /// Returns a description of the model.
    pub fn description(&self) -> &'static str {
        match self {
            Topology::Random => "Erdős–Rényi random graph, each pair linked with p = connectivity",
            Topology::SmallWorld => "Watts–Strogatz ring lattice with 10% rewiring",
            Topology::ScaleFree => "Barabási–Albert preferential attachment, m = round(3 * connectivity)",
        }
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Topology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "random" | "er" | "erdos_renyi" => Ok(Topology::Random),
            "smallworld" | "small_world" | "ws" | "watts_strogatz" => Ok(Topology::SmallWorld),
            "scalefree" | "scale_free" | "ba" | "barabasi_albert" => Ok(Topology::ScaleFree),
            _ => Err(format!("Unknown topology: {}", s)),
        }
    }
}

/// Generates the edge set of one layer with the given model.
pub fn generate_edges<R: RandomSource + ?Sized>(
    topology: Topology,
    num_agents: usize,
    connectivity: f64,
    rng: &mut R,
) -> Vec<Edge> {
    match topology {
        Topology::Random => random_edges(num_agents, connectivity, rng),
        Topology::SmallWorld => small_world_edges(num_agents, connectivity, rng),
        Topology::ScaleFree => scale_free_edges(num_agents, connectivity, rng),
    }
}

/// Erdős–Rényi: one draw per unordered pair `i < j`, kept with p = `connectivity`.
pub fn random_edges<R: RandomSource + ?Sized>(
    num_agents: usize,
    connectivity: f64,
    rng: &mut R,
) -> Vec<Edge> {
    let mut edges = Vec::new();
    if num_agents < 2 {
        return edges;
    }

    for i in 0..num_agents {
        for j in (i + 1)..num_agents {
            if rng.next_f64() < connectivity {
                push_pair(&mut edges, i, j, rng);
            }
        }
    }

    edges
}

/// Ring-lattice degree for a small-world layer: even, within `[2, n-1]`.
pub fn lattice_degree(num_agents: usize, connectivity: f64) -> usize {
    let k = ((connectivity * num_agents as f64 * 0.5).round() as usize).saturating_mul(2);
    k.min(num_agents.saturating_sub(1)).max(2)
}

/// Watts–Strogatz: ring lattice of degree `k`, then each lattice edge is
/// rewired with probability [`REWIRE_PROBABILITY`].
///
/// A rewired edge keeps its source and retries up to `n` random targets that
/// are neither the source nor already adjacent. When every try collides the
/// edge is dropped, so the layer may end up sparser than the lattice.
pub fn small_world_edges<R: RandomSource + ?Sized>(
    num_agents: usize,
    connectivity: f64,
    rng: &mut R,
) -> Vec<Edge> {
    let n = num_agents;
    if n < 2 {
        return Vec::new();
    }

    let half = lattice_degree(n, connectivity) / 2;
    let mut adjacency = AdjacencyMatrix::new(n);
    let mut lattice = Vec::new();

    for i in 0..n {
        for offset in 1..=half {
            let j = (i + offset) % n;
            if j != i && !adjacency.contains(i, j) {
                adjacency.insert(i, j);
                lattice.push((i, j));
            }
        }
    }

    for (source, target) in lattice {
        if rng.next_f64() >= REWIRE_PROBABILITY {
            continue;
        }
        adjacency.remove(source, target);

        for _ in 0..n {
            let candidate = rng.next_index(n);
            if candidate != source && !adjacency.contains(source, candidate) {
                adjacency.insert(source, candidate);
                break;
            }
        }
    }

    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if adjacency.contains(i, j) {
                push_pair(&mut edges, i, j, rng);
            }
        }
    }
    edges
}

/// Edges each new node attaches with in a scale-free layer.
pub fn attachment_count(connectivity: f64) -> usize {
    ((connectivity * 3.0).round() as usize).max(1)
}

/// Barabási–Albert: clique on `min(m+1, n)` seed nodes, then every further
/// node draws up to `m` distinct targets with probability proportional to
/// their current degree.
///
/// Node `i` gives up after `3 * i` draws, so late nodes in a tiny graph may
/// attach with fewer than `m` edges. Degrees are updated once a node's
/// targets are fixed.
pub fn scale_free_edges<R: RandomSource + ?Sized>(
    num_agents: usize,
    connectivity: f64,
    rng: &mut R,
) -> Vec<Edge> {
    let n = num_agents;
    let mut edges = Vec::new();
    if n < 2 {
        return edges;
    }

    let m = attachment_count(connectivity);
    let init_nodes = (m + 1).min(n);
    let mut degree = vec![0u64; n];

    for i in 0..init_nodes {
        for j in (i + 1)..init_nodes {
            push_pair(&mut edges, i, j, rng);
            degree[i] += 1;
            degree[j] += 1;
        }
    }

    for node in init_nodes..n {
        let total: u64 = degree[..node].iter().sum();
        if total == 0 {
            continue;
        }

        let mut targets: Vec<AgentId> = Vec::with_capacity(m);
        let mut attempts = 0;
        while targets.len() < m && attempts < 3 * node {
            attempts += 1;
            let threshold = rng.next_f64() * total as f64;
            let picked = pick_by_degree(&degree[..node], threshold);
            if !targets.contains(&picked) {
                targets.push(picked);
            }
        }

        for &target in &targets {
            push_pair(&mut edges, node, target, rng);
            degree[node] += 1;
            degree[target] += 1;
        }
    }

    edges
}

/// First index whose running degree sum exceeds `threshold`.
fn pick_by_degree(degree: &[u64], threshold: f64) -> AgentId {
    let mut cumulative = 0.0;
    for (idx, &d) in degree.iter().enumerate() {
        cumulative += d as f64;
        if cumulative > threshold {
            return idx;
        }
    }
    // Only reachable through float round-off at the very top of the range.
    degree.iter().rposition(|&d| d > 0).unwrap_or(0)
}

fn draw_weight<R: RandomSource + ?Sized>(rng: &mut R) -> f64 {
    EDGE_WEIGHT_MIN + rng.next_f64() * (EDGE_WEIGHT_MAX - EDGE_WEIGHT_MIN)
}

fn push_pair<R: RandomSource + ?Sized>(edges: &mut Vec<Edge>, a: AgentId, b: AgentId, rng: &mut R) {
    let weight = draw_weight(rng);
    edges.push(Edge::new(a, b, weight));
    edges.push(Edge::new(b, a, weight));
}

/// Dense symmetric adjacency used while rewiring.
struct AdjacencyMatrix {
    n: usize,
    cells: Vec<bool>,
}

impl AdjacencyMatrix {
    fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![false; n * n],
        }
    }

    fn contains(&self, a: usize, b: usize) -> bool {
        self.cells[a * self.n + b]
    }

    fn insert(&mut self, a: usize, b: usize) {
        self.cells[a * self.n + b] = true;
        self.cells[b * self.n + a] = true;
    }

    fn remove(&mut self, a: usize, b: usize) {
        self.cells[a * self.n + b] = false;
        self.cells[b * self.n + a] = false;
    }
}
