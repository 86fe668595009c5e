//! Epinet Simulation Harness
//!
//! Drives the epidemic engine without a GUI: the timer loop of an
//! interactive front end is replaced by [`SimWorld::run`], and the rendered
//! views by structured logs and a JSON frame export.
//!
//! # Core Principle: One Seed, One Run
//!
//! Network generation, seeding and every step draw from a single random
//! stream owned by the [`SimWorld`]. Re-running a config with the same seed
//! reproduces the outbreak exactly.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────┐
//! │                    SimWorld                       │
//! │  ┌──────────────┐   ┌──────────────────────────┐  │
//! │  │ SeededRandom │──►│ Network (agents, layers) │  │
//! │  └──────────────┘   └──────────────────────────┘  │
//! │          │                     │                  │
//! │          └──── simulate_step ◄─┘                  │
//! └───────────────────────────────────────────────────┘
//!          │                                │
//!   ScenarioRunner                     SimExport
//!  (outbreak metrics)               (frames as JSON)
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use epinet_sim::{ScenarioRunner, scenarios::ScenarioId};
//! use epinet_env::Seed;
//!
//! let runner = ScenarioRunner::new()
//!     .with_seed(Seed::Number(42))
//!     .with_max_steps(300);
//!
//! let result = runner.run(ScenarioId::HouseholdWork);
//! println!("attack rate: {:.2}", result.mean_attack_rate());
//! ```

mod config;
mod error;
mod exporter;
mod runner;
pub mod scenarios;
mod world;

pub use config::SimConfig;
pub use error::{Result, SimError};
pub use exporter::{LayerSnapshot, NetworkSnapshot, SimExport, SimFrame};
pub use runner::{OutbreakMetrics, ScenarioResult, ScenarioRunner};
pub use world::{ConfigChange, SimWorld, StepRecord};
