//! Monte Carlo agents.
//!
//! Episodes are generated to the end, or cut at `max_episode_len` steps, and
//! learned from backwards with discounted returns `G = r + gamma * G`.
mod config;
mod exploring_starts;
mod off_policy;
mod on_policy;
mod stats;
use crate::util::explore;
use anyhow::Result;
pub use config::McConfig;
pub use exploring_starts::MonteCarloEs;
pub use off_policy::OffPolicyMc;
pub use on_policy::OnPolicyMc;
use rand::Rng;
pub use stats::ReturnStats;
use std::collections::HashSet;
use tabula_core::{Env, EpsilonGreedy, QTable};

/// `(state, action, reward)` triples from the start of an episode.
type Episode<E> = Vec<(<E as Env>::State, <E as Env>::Act, f64)>;

/// Discounted return from each step of the episode to its end.
fn returns<S, A>(episode: &[(S, A, f64)], gamma: f64) -> Vec<f64> {
    let mut g = 0.0;
    let mut gs = vec![0.0; episode.len()];
    for (t, (_, _, r)) in episode.iter().enumerate().rev() {
        g = gamma * g + r;
        gs[t] = g;
    }
    gs
}

/// Indices of the first occurrence of each state-action pair, in time order.
fn first_visits<S, A>(episode: &[(S, A, f64)]) -> Vec<usize>
where
    S: Eq + std::hash::Hash,
    A: Eq + std::hash::Hash,
{
    let mut seen = HashSet::new();
    episode
        .iter()
        .enumerate()
        .filter(|(_, (s, a, _))| seen.insert((s, a)))
        .map(|(t, _)| t)
        .collect()
}

/// Generates an episode from reset, choosing actions epsilon-greedily over `q`.
fn generate_episode<E: Env, R: Rng>(
    env: &mut E,
    q: &mut QTable<E::State, E::Act>,
    explorer: &EpsilonGreedy,
    rng: &mut R,
    max_len: usize,
) -> Result<Episode<E>> {
    let mut episode = vec![];
    let mut state = env.reset()?;
    for _ in 0..max_len {
        let a = explore(explorer, q, env, &state, rng)?;
        let step = env.step(&a)?;
        let done = step.is_done();
        episode.push((state, a, step.reward));
        state = step.state;
        if done {
            break;
        }
    }
    Ok(episode)
}
