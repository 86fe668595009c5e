//! Initial infection seeding.

use crate::agent::{AgentId, AgentState};
use crate::network::Network;
use epinet_env::RandomSource;
use tracing::debug;

/// Resets every agent, then infects `min(count, num_agents)` distinct agents
/// chosen uniformly at random.
///
/// Seeders keep `infected_by_layer = None`. Layers are left untouched, so
/// this is the cheap "keep network, reseed infection" reset. Counters are
/// resized to the current layer count.
///
/// Returns the seeded ids in selection order.
pub fn seed_infected<R: RandomSource + ?Sized>(
    network: &mut Network,
    count: usize,
    rng: &mut R,
) -> Vec<AgentId> {
    let num_layers = network.num_layers();
    let agents = network.agents_mut();
    for agent in agents.iter_mut() {
        agent.reset(num_layers);
    }

    let n = agents.len();
    let k = count.min(n);

    // Partial Fisher-Yates: the first k slots end up as a uniform sample.
    let mut pool: Vec<AgentId> = (0..n).collect();
    for i in 0..k {
        let j = i + rng.next_index(n - i);
        pool.swap(i, j);
    }
    pool.truncate(k);

    for &id in &pool {
        agents[id].state = AgentState::Infected;
    }

    debug!("Seeded {} of {} agents", k, n);
    pool
}
