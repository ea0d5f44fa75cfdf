//! Helpers shared by the agents.
use anyhow::Result;
use rand::{seq::SliceRandom, Rng};
use tabula_core::{error::TabulaError, Env, EpsilonGreedy, PolicyTable, QTable};

/// A uniformly random legal action in the state.
pub(crate) fn random_action<E: Env, R: Rng>(
    env: &E,
    state: &E::State,
    rng: &mut R,
) -> Result<E::Act> {
    env.actions(state)
        .choose(rng)
        .cloned()
        .ok_or_else(|| TabulaError::EmptyActionSet(format!("state {:?}", state)).into())
}

/// The policy action of the state, a random legal action if the policy has none.
pub(crate) fn act_or_random<E: Env, R: Rng>(
    policy: &PolicyTable<E::State, E::Act>,
    env: &E,
    state: &E::State,
    rng: &mut R,
) -> Result<E::Act> {
    match policy.get(state) {
        Some(a) => Ok(a.clone()),
        None => random_action(env, state, rng),
    }
}

/// Epsilon-greedy action over the legal actions of the state.
///
/// Materializes the row of the state in `q`.
pub(crate) fn explore<E: Env, R: Rng>(
    explorer: &EpsilonGreedy,
    q: &mut QTable<E::State, E::Act>,
    env: &E,
    state: &E::State,
    rng: &mut R,
) -> Result<E::Act> {
    let actions = env.actions(state);
    let q_values = q.action_values(state, &actions);
    explorer.select_action(&q_values, &actions, rng)
}

/// Gives every state with a legal action an entry in the policy.
///
/// Missing states get their first legal action, so `act` no longer draws from
/// the random fallback for any state the environment knows.
pub(crate) fn complete_policy<E: Env>(policy: &mut PolicyTable<E::State, E::Act>, env: &E) {
    for s in env.states() {
        if policy.get(&s).is_some() {
            continue;
        }
        if let Some(a) = env.actions(&s).into_iter().next() {
            policy.insert(s, a);
        }
    }
}

/// States the environment does not report as terminal.
pub(crate) fn non_terminal_states<E: Env>(env: &E) -> Vec<E::State> {
    env.states()
        .into_iter()
        .filter(|s| !env.is_terminal(s))
        .collect()
}
