//! Temporal-difference agents.
//!
//! The agents learn action values online with `Q[s][a] += alpha * (target - Q[s][a])`,
//! acting epsilon-greedily, and differ in the bootstrap of the target. The
//! greedy policy is extracted once training ends.
mod config;
mod expected_sarsa;
mod q_learning;
mod sarsa;
pub use config::TdConfig;
pub use expected_sarsa::ExpectedSarsa;
pub use q_learning::QLearning;
pub use sarsa::Sarsa;
use tabula_core::{Discrete, QTable};

/// Moves `Q[s][a]` towards `target` with step size `alpha`.
pub(crate) fn td_update<S: Discrete, A: Discrete>(
    q: &mut QTable<S, A>,
    s: &S,
    a: &A,
    target: f64,
    alpha: f64,
) {
    let v = q.entry(s, a);
    *v += alpha * (target - *v);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_td_update() {
        let mut q = QTable::<usize, usize>::default();
        td_update(&mut q, &0, &1, 1.0, 0.5);
        assert_eq!(q.get(&0, &1), 0.5);
        td_update(&mut q, &0, &1, 1.0, 0.5);
        assert_eq!(q.get(&0, &1), 0.75);
    }
}
