//! Preset outbreak scenarios.

use crate::config::SimConfig;
use epinet_core::{LayerConfig, Topology};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// Single well-mixed random layer
    RandomMixing,

    /// Single clustered small-world layer
    SmallWorld,

    /// Single scale-free layer with hubs
    ScaleFree,

    // ═══════════════════════════════════════════════════
    // MULTILAYER SCENARIOS
    // ═══════════════════════════════════════════════════

    /// Households every day, workplaces every day, community every 3 days
    HouseholdWork,

    /// Sparse daily contacts plus a dense weekly gathering
    WeeklyGathering,

    /// Dense scale-free layer with high transmissibility
    Superspreader,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::RandomMixing,
            ScenarioId::SmallWorld,
            ScenarioId::ScaleFree,
            ScenarioId::HouseholdWork,
            ScenarioId::WeeklyGathering,
            ScenarioId::Superspreader,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::RandomMixing => "random_mixing",
            ScenarioId::SmallWorld => "small_world",
            ScenarioId::ScaleFree => "scale_free",
            ScenarioId::HouseholdWork => "household_work",
            ScenarioId::WeeklyGathering => "weekly_gathering",
            ScenarioId::Superspreader => "superspreader",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::RandomMixing => "200 agents, one Erdős–Rényi layer (c=0.03)",
            ScenarioId::SmallWorld => "200 agents, one Watts–Strogatz layer (k=8)",
            ScenarioId::ScaleFree => "200 agents, one Barabási–Albert layer (m=2)",
            ScenarioId::HouseholdWork => "household ring + scale-free work + random community every 3rd step",
            ScenarioId::WeeklyGathering => "sparse daily ring + dense random gathering every 7th step",
            ScenarioId::Superspreader => "scale-free hubs (m=3), spread 0.5, recovery 0.2",
        }
    }

    /// Returns true if the scenario has more than one layer.
    pub fn is_multilayer(&self) -> bool {
        self.layers().len() > 1
    }

    /// Layer stack of the scenario, in id order.
    pub fn layers(&self) -> Vec<LayerConfig> {
        match self {
            ScenarioId::RandomMixing => vec![LayerConfig::new(Topology::Random, 0.03, 1)],
            ScenarioId::SmallWorld => vec![LayerConfig::new(Topology::SmallWorld, 0.04, 1)],
            ScenarioId::ScaleFree => vec![LayerConfig::new(Topology::ScaleFree, 0.7, 1)],
            ScenarioId::HouseholdWork => vec![
                LayerConfig::new(Topology::SmallWorld, 0.02, 1),
                LayerConfig::new(Topology::ScaleFree, 0.34, 1),
                LayerConfig::new(Topology::Random, 0.01, 3),
            ],
            ScenarioId::WeeklyGathering => vec![
                LayerConfig::new(Topology::SmallWorld, 0.02, 1),
                LayerConfig::new(Topology::Random, 0.1, 7),
            ],
            ScenarioId::Superspreader => vec![LayerConfig::new(Topology::ScaleFree, 1.0, 1)],
        }
    }

    /// Full run configuration for this scenario.
    pub fn config(&self) -> SimConfig {
        let base = SimConfig::default()
            .with_agents(200)
            .with_initial_infected(3)
            .with_layers(self.layers());

        match self {
            ScenarioId::Superspreader => base.with_rates(0.5, 0.2),
            ScenarioId::WeeklyGathering => base.with_rates(0.3, 0.08),
            _ => base.with_rates(0.25, 0.1),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random_mixing" | "randommixing" | "random" => Ok(ScenarioId::RandomMixing),
            "small_world" | "smallworld" => Ok(ScenarioId::SmallWorld),
            "scale_free" | "scalefree" => Ok(ScenarioId::ScaleFree),
            "household_work" | "householdwork" => Ok(ScenarioId::HouseholdWork),
            "weekly_gathering" | "weeklygathering" => Ok(ScenarioId::WeeklyGathering),
            "superspreader" => Ok(ScenarioId::Superspreader),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for scenario in ScenarioId::all() {
            assert_eq!(scenario.name().parse::<ScenarioId>().unwrap(), scenario);
            assert_eq!(scenario.to_string(), scenario.name());
        }
        assert!("zombies".parse::<ScenarioId>().is_err());
    }

    #[test]
    fn test_multilayer_flags() {
        assert!(!ScenarioId::RandomMixing.is_multilayer());
        assert!(ScenarioId::HouseholdWork.is_multilayer());
        assert_eq!(ScenarioId::HouseholdWork.layers()[2].frequency, 3);
        assert_eq!(ScenarioId::WeeklyGathering.layers()[1].frequency, 7);
    }

    #[test]
    fn test_config_matches_layers() {
        for scenario in ScenarioId::all() {
            let config = scenario.config();
            assert_eq!(config.layers, scenario.layers());
            assert_eq!(config.num_agents, 200);
            assert_eq!(config, config.normalized());
        }
    }
}
