//! Aggregate counts over a network.

use crate::agent::{AgentState, LayerId};
use crate::network::Network;
use crate::topology::Topology;
use serde::{Deserialize, Serialize};

/// Number of agents in each compartment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimStats {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

impl SimStats {
    /// Always equals the network's agent count.
    pub fn total(&self) -> usize {
        self.susceptible + self.infected + self.recovered
    }

    /// Agents that have ever been infected.
    pub fn ever_infected(&self) -> usize {
        self.infected + self.recovered
    }

    /// Fraction of the population ever infected; 0 for an empty network.
    pub fn attack_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.ever_infected() as f64 / total as f64,
        }
    }
}

/// Counts agents per state. Pure, O(num_agents).
pub fn get_stats(network: &Network) -> SimStats {
    let mut stats = SimStats::default();
    for agent in network.agents() {
        match agent.state {
            AgentState::Susceptible => stats.susceptible += 1,
            AgentState::Infected => stats.infected += 1,
            AgentState::Recovered => stats.recovered += 1,
        }
    }
    stats
}

/// Total infections caused through each layer, indexed by layer id.
pub fn spread_by_layer(network: &Network) -> Vec<u64> {
    let mut totals = vec![0u64; network.num_layers()];
    for agent in network.agents() {
        for (layer, &count) in agent.infected_count.iter().enumerate() {
            if let Some(total) = totals.get_mut(layer) {
                *total += count as u64;
            }
        }
    }
    totals
}

/// Structural summary of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStats {
    pub id: LayerId,
    pub topology: Topology,
    pub frequency: u32,
    /// Undirected connections
    pub connections: usize,
    pub mean_degree: f64,
    pub max_degree: usize,
}

/// Summarizes every layer's structure.
pub fn layer_stats(network: &Network) -> Vec<LayerStats> {
    let n = network.num_agents();
    network
        .layers()
        .iter()
        .map(|layer| {
            let max_degree = (0..n).map(|id| layer.index().degree(id)).max().unwrap_or(0);
            let mean_degree = if n == 0 {
                0.0
            } else {
                layer.edges.len() as f64 / n as f64
            };
            LayerStats {
                id: layer.id,
                topology: layer.topology,
                frequency: layer.frequency,
                connections: layer.connection_count(),
                mean_degree,
                max_degree,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::simulate_step;
    use crate::layer::{Edge, Layer, LayerConfig};
    use crate::seeding::seed_infected;
    use approx::assert_relative_eq;
    use epinet_env::{ScriptedRandom, Seed, SeededRandom};

    #[test]
    fn test_stats_sum_to_population() {
        let mut rng = SeededRandom::new(&Seed::Number(4));
        let mut net = Network::build(120, &[LayerConfig::new(Topology::Random, 0.05, 1)], &mut rng);
        seed_infected(&mut net, 4, &mut rng);
        for iter in 1..=30 {
            simulate_step(&mut net, 0.5, 0.15, iter, &mut rng);
            assert_eq!(get_stats(&net).total(), 120);
        }
    }

    #[test]
    fn test_attack_rate() {
        let stats = SimStats {
            susceptible: 6,
            infected: 1,
            recovered: 3,
        };
        assert_eq!(stats.ever_infected(), 4);
        assert_relative_eq!(stats.attack_rate(), 0.4);
        assert_eq!(SimStats::default().attack_rate(), 0.0);
    }

    #[test]
    fn test_spread_by_layer_matches_infections() {
        let edges = vec![Edge::new(0, 1, 1.0), Edge::new(1, 0, 1.0), Edge::new(0, 2, 1.0), Edge::new(2, 0, 1.0)];
        let layer = Layer::from_edges(0, &LayerConfig::default(), edges, 3);
        let mut net = Network::with_layers(3, vec![layer]);
        seed_infected(&mut net, 1, &mut ScriptedRandom::constant(0.0));
        simulate_step(&mut net, 1.0, 0.0, 1, &mut ScriptedRandom::constant(0.0));

        assert_eq!(spread_by_layer(&net), vec![2]);
        assert_eq!(get_stats(&net).infected, 3);
    }

    #[test]
    fn test_layer_stats() {
        let edges = vec![Edge::new(0, 1, 1.0), Edge::new(1, 0, 1.0), Edge::new(0, 2, 1.0), Edge::new(2, 0, 1.0)];
        let layer = Layer::from_edges(0, &LayerConfig::new(Topology::ScaleFree, 0.2, 2), edges, 4);
        let net = Network::with_layers(4, vec![layer]);

        let stats = layer_stats(&net);
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].connections, 2);
        assert_eq!(stats[0].max_degree, 2);
        assert_eq!(stats[0].frequency, 2);
        assert_relative_eq!(stats[0].mean_degree, 1.0);
    }
}
