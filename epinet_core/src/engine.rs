//! Step engine: one epidemic tick across all layers.
//!
//! # Order of a step
//!
//! 1. Layers fire in ascending id order, each gated by its frequency.
//! 2. A firing layer snapshots the infected set before spreading, so agents
//!    it infects cannot spread again in the same pass. A later layer takes a
//!    fresh snapshot and does see them.
//! 3. Every infected susceptible-neighbour pair draws once and transmits iff
//!    `draw < spread_rate * weight`.
//! 4. After all layers, every infected agent (including new ones) draws once
//!    and recovers iff `draw < recovery_rate`.

use crate::agent::{AgentId, AgentState, LayerId};
use crate::network::Network;
use epinet_env::RandomSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::trace;

/// Everything that happened during one step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepOutcome {
    /// Layers that produced at least one infection
    pub active_layers: BTreeSet<LayerId>,

    /// New infections per layer, indexed by layer id
    pub new_infections_by_layer: Vec<u32>,

    pub new_recoveries: usize,
}

impl StepOutcome {
    pub fn new_infections(&self) -> usize {
        self.new_infections_by_layer.iter().map(|&c| c as usize).sum()
    }
}

/// Advances the epidemic by one step and returns the active layer ids.
///
/// `iter` is 1-based. Never fails; an empty network is a no-op.
pub fn simulate_step<R: RandomSource + ?Sized>(
    network: &mut Network,
    spread_rate: f64,
    recovery_rate: f64,
    iter: u64,
    rng: &mut R,
) -> BTreeSet<LayerId> {
    step_report(network, spread_rate, recovery_rate, iter, rng).active_layers
}

/// Same as [`simulate_step`], reporting per-layer infection and recovery counts.
pub fn step_report<R: RandomSource + ?Sized>(
    network: &mut Network,
    spread_rate: f64,
    recovery_rate: f64,
    iter: u64,
    rng: &mut R,
) -> StepOutcome {
    let mut outcome = StepOutcome {
        new_infections_by_layer: vec![0; network.num_layers()],
        ..Default::default()
    };

    for layer_id in 0..network.num_layers() {
        let snapshot: Vec<AgentId> = match network.layer(layer_id) {
            Some(layer) if layer.fires_on(iter) => network.infected_ids(),
            _ => continue,
        };
        let (layers, agents) = network.split_mut();
        let layer = &layers[layer_id];

        for spreader in snapshot {
            for &(target, weight) in layer.neighbors(spreader) {
                if !agents[target].is_susceptible() {
                    continue;
                }
                if rng.next_f64() >= spread_rate * weight {
                    continue;
                }

                let neighbor = &mut agents[target];
                neighbor.state = AgentState::Infected;
                if neighbor.infected_by_layer.is_none() {
                    neighbor.infected_by_layer = Some(layer.id);
                }
                if let Some(count) = agents[spreader].infected_count.get_mut(layer.id) {
                    *count += 1;
                }

                outcome.active_layers.insert(layer.id);
                outcome.new_infections_by_layer[layer.id] += 1;
            }
        }
    }

    for agent in network.agents_mut() {
        if agent.is_infected() && rng.next_f64() < recovery_rate {
            agent.state = AgentState::Recovered;
            outcome.new_recoveries += 1;
        }
    }

    trace!(
        "Step {}: +{} infected, +{} recovered, active layers {:?}",
        iter,
        outcome.new_infections(),
        outcome.new_recoveries,
        outcome.active_layers
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::{Edge, Layer, LayerConfig};
    use crate::seeding::seed_infected;
    use crate::stats::get_stats;
    use crate::topology::Topology;
    use epinet_env::{ScriptedRandom, Seed, SeededRandom};

    /// Undirected weight-1.0 path 0 - 1 - ... - (n-1).
    fn path_layer(n: usize, frequency: u32) -> Layer {
        let mut edges = Vec::new();
        for i in 1..n {
            edges.push(Edge::new(i - 1, i, 1.0));
            edges.push(Edge::new(i, i - 1, 1.0));
        }
        Layer::from_edges(0, &LayerConfig::new(Topology::Random, 0.0, frequency), edges, n)
    }

    fn star_layer(n: usize, weight: f64) -> Layer {
        let mut edges = Vec::new();
        for i in 1..n {
            edges.push(Edge::new(0, i, weight));
            edges.push(Edge::new(i, 0, weight));
        }
        Layer::from_edges(0, &LayerConfig::new(Topology::ScaleFree, 0.0, 1), edges, n)
    }

    /// Infects agent 0 only.
    fn seed_first(network: &mut Network) {
        seed_infected(network, 1, &mut ScriptedRandom::constant(0.0));
    }

    #[test]
    fn test_certain_spread_over_full_weight() {
        let mut net = Network::with_layers(6, vec![star_layer(6, 1.0)]);
        seed_first(&mut net);

        let mut rng = SeededRandom::new(&Seed::Number(1));
        let active = simulate_step(&mut net, 1.0, 0.0, 1, &mut rng);

        assert_eq!(active, BTreeSet::from([0]));
        assert_eq!(get_stats(&net).infected, 6);
        assert_eq!(net.agent(0).unwrap().infected_count, vec![5]);
        for id in 1..6 {
            assert_eq!(net.agent(id).unwrap().infected_by_layer, Some(0));
        }
    }

    #[test]
    fn test_weight_scales_transmission() {
        let mut net = Network::with_layers(2, vec![star_layer(2, 0.5)]);
        seed_first(&mut net);

        // 0.6 >= 1.0 * 0.5: no transmission
        let active = simulate_step(&mut net, 1.0, 0.0, 1, &mut ScriptedRandom::constant(0.6));
        assert!(active.is_empty());
        assert!(net.agent(1).unwrap().is_susceptible());

        // 0.4 < 0.5: transmission
        let active = simulate_step(&mut net, 1.0, 0.0, 2, &mut ScriptedRandom::constant(0.4));
        assert_eq!(active, BTreeSet::from([0]));
        assert!(net.agent(1).unwrap().is_infected());
    }

    #[test]
    fn test_frequency_gates_firing() {
        let mut net = Network::with_layers(5, vec![path_layer(5, 3)]);
        seed_first(&mut net);
        let mut rng = SeededRandom::new(&Seed::Number(2));

        assert_eq!(simulate_step(&mut net, 1.0, 0.0, 1, &mut rng), BTreeSet::from([0]));
        assert_eq!(get_stats(&net).infected, 2);

        for iter in [2, 3] {
            assert!(simulate_step(&mut net, 1.0, 0.0, iter, &mut rng).is_empty());
            assert_eq!(get_stats(&net).infected, 2);
        }

        assert_eq!(simulate_step(&mut net, 1.0, 0.0, 4, &mut rng), BTreeSet::from([0]));
        assert_eq!(get_stats(&net).infected, 3);
    }

    #[test]
    fn test_no_chain_within_one_pass() {
        let mut net = Network::with_layers(3, vec![path_layer(3, 1)]);
        seed_first(&mut net);

        simulate_step(&mut net, 1.0, 0.0, 1, &mut ScriptedRandom::constant(0.0));

        assert!(net.agent(1).unwrap().is_infected());
        assert!(net.agent(2).unwrap().is_susceptible());
    }

    #[test]
    fn test_later_layer_sees_earlier_infections() {
        // Layer 0 links 0-1, layer 1 links 1-2.
        let first = Layer::from_edges(
            0,
            &LayerConfig::default(),
            vec![Edge::new(0, 1, 1.0), Edge::new(1, 0, 1.0)],
            3,
        );
        let second = Layer::from_edges(
            1,
            &LayerConfig::default(),
            vec![Edge::new(1, 2, 1.0), Edge::new(2, 1, 1.0)],
            3,
        );
        let mut net = Network::with_layers(3, vec![first, second]);
        seed_first(&mut net);

        let outcome = step_report(&mut net, 1.0, 0.0, 1, &mut ScriptedRandom::constant(0.0));

        assert_eq!(outcome.active_layers, BTreeSet::from([0, 1]));
        assert_eq!(outcome.new_infections_by_layer, vec![1, 1]);
        assert_eq!(net.agent(2).unwrap().infected_by_layer, Some(1));
        assert_eq!(net.agent(1).unwrap().infected_count, vec![0, 1]);
        assert_eq!(net.agent(0).unwrap().infected_count, vec![1, 0]);
    }

    #[test]
    fn test_full_recovery_includes_new_cases() {
        let mut net = Network::with_layers(4, vec![star_layer(4, 1.0)]);
        seed_first(&mut net);

        let outcome = step_report(&mut net, 1.0, 1.0, 1, &mut SeededRandom::new(&Seed::Number(5)));

        assert_eq!(outcome.new_infections(), 3);
        assert_eq!(outcome.new_recoveries, 4);
        let stats = get_stats(&net);
        assert_eq!(stats.infected, 0);
        assert_eq!(stats.recovered, 4);
    }

    #[test]
    fn test_recovered_is_terminal() {
        let mut rng = SeededRandom::new(&Seed::Number(77));
        let configs = [
            LayerConfig::new(Topology::Random, 0.1, 1),
            LayerConfig::new(Topology::SmallWorld, 0.1, 2),
        ];
        let mut net = Network::build(80, &configs, &mut rng);
        seed_infected(&mut net, 5, &mut rng);

        let mut recovered = std::collections::HashSet::new();
        for iter in 1..=60 {
            simulate_step(&mut net, 0.4, 0.2, iter, &mut rng);
            for id in &recovered {
                assert!(net.agent(*id).unwrap().is_recovered());
            }
            recovered.extend(net.agents().iter().filter(|a| a.is_recovered()).map(|a| a.id));
        }
    }

    #[test]
    fn test_empty_network_is_noop() {
        let mut rng = SeededRandom::default();
        let mut net = Network::build(0, &[LayerConfig::default()], &mut rng);
        assert!(simulate_step(&mut net, 1.0, 1.0, 1, &mut rng).is_empty());

        let mut no_layers = Network::build(5, &[], &mut rng);
        seed_infected(&mut no_layers, 2, &mut rng);
        assert!(simulate_step(&mut no_layers, 1.0, 0.0, 1, &mut rng).is_empty());
        assert_eq!(get_stats(&no_layers).infected, 2);
    }

    #[test]
    fn test_step_zero_fires_only_every_step_layers() {
        let mut net = Network::with_layers(2, vec![path_layer(2, 2)]);
        seed_first(&mut net);
        let active = simulate_step(&mut net, 1.0, 0.0, 0, &mut ScriptedRandom::constant(0.0));
        assert!(active.is_empty());
    }
}
