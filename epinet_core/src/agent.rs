//! Agents and their SIR state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of an agent in the network arena, `[0, num_agents)`.
pub type AgentId = usize;

/// Index of a layer in the network, in build order.
pub type LayerId = usize;

/// Epidemic compartment of an agent.
///
/// Transitions are monotonic: `Susceptible -> Infected -> Recovered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentState {
    Susceptible,
    Infected,
    Recovered,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Susceptible => "susceptible",
            AgentState::Infected => "infected",
            AgentState::Recovered => "recovered",
        };
        write!(f, "{}", name)
    }
}

/// A single member of the population.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Stable arena index
    pub id: AgentId,

    pub state: AgentState,

    /// Layer that carried the infection to this agent.
    ///
    /// `None` both for agents never infected and for initial seeders; the
    /// two are told apart by `state`.
    pub infected_by_layer: Option<LayerId>,

    /// Infections this agent caused, per layer. Length equals the layer count.
    pub infected_count: Vec<u32>,
}

impl Agent {
    /// Creates a fresh susceptible agent with zeroed counters.
    pub fn new(id: AgentId, num_layers: usize) -> Self {
        Self {
            id,
            state: AgentState::Susceptible,
            infected_by_layer: None,
            infected_count: vec![0; num_layers],
        }
    }

    /// Returns the agent to a fresh susceptible state.
    pub fn reset(&mut self, num_layers: usize) {
        self.state = AgentState::Susceptible;
        self.infected_by_layer = None;
        self.infected_count.clear();
        self.infected_count.resize(num_layers, 0);
    }

    pub fn is_susceptible(&self) -> bool {
        self.state == AgentState::Susceptible
    }

    pub fn is_infected(&self) -> bool {
        self.state == AgentState::Infected
    }

    pub fn is_recovered(&self) -> bool {
        self.state == AgentState::Recovered
    }

    /// True for agents infected at seeding time rather than through a layer.
    pub fn is_seeder(&self) -> bool {
        self.state != AgentState::Susceptible && self.infected_by_layer.is_none()
    }
}
