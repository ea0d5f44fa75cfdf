//! Dynamic programming agents.
//!
//! Both agents compute one-step returns by moving the environment into a state
//! and stepping it, so they require environments with
//! [`Capability::StateForcing`](tabula_core::Capability::StateForcing).
mod config;
mod policy_iteration;
mod value_iteration;
use anyhow::Result;
pub use config::DpConfig;
pub use policy_iteration::PolicyIteration;
use tabula_core::{Env, VTable};
pub use value_iteration::ValueIteration;

/// Returns `(next_state, reward)` of taking action `a` in state `s`.
fn simulate<E: Env>(env: &mut E, s: &E::State, a: &E::Act) -> Result<(E::State, f64)> {
    env.reset()?;
    env.force_state(s)?;
    let step = env.step(a)?;
    Ok((step.state, step.reward))
}

/// One-step lookahead values `r + gamma * V[s']` of the legal actions of `s`.
fn lookahead<E: Env>(
    env: &mut E,
    v: &VTable<E::State>,
    gamma: f64,
    s: &E::State,
) -> Result<Vec<(E::Act, f64)>> {
    env.actions(s)
        .into_iter()
        .map(|a| {
            let (next, r) = simulate(env, s, &a)?;
            Ok((a, r + gamma * v.get(&next)))
        })
        .collect()
}

/// The first action with the largest value.
fn argmax<A: Clone>(values: &[(A, f64)]) -> Option<A> {
    let mut best: Option<&(A, f64)> = None;
    for av in values {
        if best.map_or(true, |b| av.1 > b.1) {
            best = Some(av);
        }
    }
    best.map(|(a, _)| a.clone())
}

/// Terminal states and states without legal actions keep their initial value.
fn is_absorbing<E: Env>(env: &E, s: &E::State) -> bool {
    env.is_terminal(s) || env.actions(s).is_empty()
}

/// Action assigned to absorbing states, the first legal one or the default action.
fn placeholder_action<E: Env>(env: &E, s: &E::State) -> E::Act {
    env.actions(s).into_iter().next().unwrap_or_default()
}
