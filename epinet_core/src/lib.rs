//! Epinet Core - multilayer network SIR epidemic engine
//!
//! Agents live in a single arena shared by every layer. Each layer is an
//! independent contact graph over the same agents, with its own topology,
//! density and firing frequency.
//!
//! # Pipeline
//!
//! ```text
//! RandomSource ─► topology generators ─► Network::build
//!                                              │
//!                                        seed_infected
//!                                              │
//!                          simulate_step (repeated) ─► get_stats
//! ```
//!
//! # Usage
//!
//! ```
//! use epinet_core::{get_stats, seed_infected, simulate_step, LayerConfig, Network, Topology};
//! use epinet_env::{Seed, SeededRandom};
//!
//! let mut rng = SeededRandom::new(&Seed::Number(42));
//! let layers = [LayerConfig::new(Topology::SmallWorld, 0.1, 1)];
//! let mut network = Network::build(100, &layers, &mut rng);
//! seed_infected(&mut network, 3, &mut rng);
//!
//! for iter in 1..=20 {
//!     simulate_step(&mut network, 0.3, 0.1, iter, &mut rng);
//! }
//! assert_eq!(get_stats(&network).total(), 100);
//! ```
//!
//! The engine never fails: degenerate inputs (no agents, no layers,
//! frequency 0) are clamped or produce an empty, no-op result.

pub mod agent;
pub mod engine;
pub mod layer;
pub mod network;
pub mod seeding;
pub mod stats;
pub mod topology;

pub use agent::{Agent, AgentId, AgentState, LayerId};
pub use engine::{simulate_step, step_report, StepOutcome};
pub use layer::{Edge, Layer, LayerConfig, NeighborIndex};
pub use network::Network;
pub use seeding::seed_infected;
pub use stats::{get_stats, layer_stats, spread_by_layer, LayerStats, SimStats};
pub use topology::{generate_edges, Topology};
