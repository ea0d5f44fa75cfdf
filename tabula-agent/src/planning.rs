//! Model-based planning agents.
//!
//! Each real step is learned from with a Q-Learning update, recorded in a
//! [`Model`], and followed by `n_planning_steps` Q-Learning updates on
//! transitions replayed from the model. A replayed transition is terminal if
//! the environment reports its next state as terminal.
mod config;
mod dyna_q;
mod dyna_q_plus;
mod model;
use crate::td::td_update;
pub use config::DynaConfig;
pub use dyna_q::DynaQ;
pub use dyna_q_plus::DynaQPlus;
pub use model::{Model, Transition};
use tabula_core::{Discrete, QTable};

/// Q-Learning update of `Q[s][a]` with `reward + bonus` and the bootstrap on `next`.
#[allow(clippy::too_many_arguments)]
fn q_learning_update<S: Discrete, A: Discrete>(
    q: &mut QTable<S, A>,
    s: &S,
    a: &A,
    reward: f64,
    next: &S,
    done: bool,
    gamma: f64,
    alpha: f64,
) {
    let target = if done {
        reward
    } else {
        reward + gamma * q.max(next)
    };
    td_update(q, s, a, target, alpha);
}
