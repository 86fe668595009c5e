//! The Network aggregate: agent arena plus layers.

use crate::agent::{Agent, AgentId, LayerId};
use crate::layer::{Layer, LayerConfig};
use epinet_env::RandomSource;
use serde::Serialize;
use tracing::debug;

/// Agents shared by every layer, addressed by index.
///
/// Invariants:
/// - every layer addresses agents in `[0, num_agents)`
/// - every agent's `infected_count` has one slot per layer
#[derive(Debug, Clone, Serialize)]
pub struct Network {
    agents: Vec<Agent>,
    layers: Vec<Layer>,
}

impl Network {
    /// Builds a fresh network: all agents susceptible, one generated layer
    /// per config, layer ids assigned in input order.
    ///
    /// An empty `layer_configs` is accepted and yields a network whose
    /// state can never change.
    pub fn build<R: RandomSource + ?Sized>(
        num_agents: usize,
        layer_configs: &[LayerConfig],
        rng: &mut R,
    ) -> Self {
        let layers: Vec<Layer> = layer_configs
            .iter()
            .enumerate()
            .map(|(id, config)| Layer::generate(id, config, num_agents, rng))
            .collect();

        for layer in &layers {
            debug!(
                "Layer {} ({}): c={:.3} f={} connections={}",
                layer.id,
                layer.topology,
                layer.connectivity,
                layer.frequency,
                layer.connection_count()
            );
        }

        Self::with_layers(num_agents, layers)
    }

    /// Assembles a network from prebuilt layers. Layer ids are reassigned
    /// by position, and edges naming agents outside `[0, num_agents)` are
    /// dropped.
    pub fn with_layers(num_agents: usize, mut layers: Vec<Layer>) -> Self {
        for (id, layer) in layers.iter_mut().enumerate() {
            layer.set_id(id);
            layer.restrict_to(num_agents);
        }
        let agents = (0..num_agents).map(|id| Agent::new(id, layers.len())).collect();
        Self { agents, layers }
    }

    pub fn num_agents(&self) -> usize {
        self.agents.len()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id)
    }

    /// Changes a layer's firing frequency without touching its edges.
    ///
    /// Returns `false` for an unknown layer. Zero is clamped to 1.
    pub fn set_layer_frequency(&mut self, id: LayerId, frequency: u32) -> bool {
        match self.layers.get_mut(id) {
            Some(layer) => {
                layer.set_frequency(frequency);
                true
            }
            None => false,
        }
    }

    /// Current layer configs, in id order.
    pub fn layer_configs(&self) -> Vec<LayerConfig> {
        self.layers.iter().map(Layer::config).collect()
    }

    /// Ids of currently infected agents, ascending.
    pub fn infected_ids(&self) -> Vec<AgentId> {
        self.agents
            .iter()
            .filter(|a| a.is_infected())
            .map(|a| a.id)
            .collect()
    }

    pub(crate) fn agents_mut(&mut self) -> &mut [Agent] {
        &mut self.agents
    }

    /// Splits the borrow so a step can read layers while mutating agents.
    pub(crate) fn split_mut(&mut self) -> (&[Layer], &mut [Agent]) {
        (&self.layers, &mut self.agents)
    }
}
