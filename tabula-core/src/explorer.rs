//! Epsilon-greedy action selection.
use crate::error::TabulaError;
use anyhow::Result;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer.
///
/// With probability `epsilon` a uniformly random action is taken, otherwise a
/// uniformly random one among the actions sharing the largest value. The
/// random number generator is owned by the caller.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Probability of taking a random action.
    pub epsilon: f64,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self { epsilon: 0.1 }
    }
}

impl EpsilonGreedy {
    /// Constructs epsilon-greedy explorer.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Selects an action.
    ///
    /// NaN values never count as the largest one.
    ///
    /// * `q_values` - values of `actions`, index by index.
    /// * `actions` - candidate actions.
    pub fn select_action<A: Clone>(
        &self,
        q_values: &[f64],
        actions: &[A],
        rng: &mut impl Rng,
    ) -> Result<A> {
        if actions.is_empty() {
            return Err(TabulaError::EmptyActionSet("epsilon-greedy selection".into()).into());
        }
        if q_values.len() != actions.len() {
            return Err(TabulaError::DimensionMismatch {
                expected: actions.len(),
                actual: q_values.len(),
            }
            .into());
        }

        if rng.gen::<f64>() < self.epsilon {
            return Ok(actions[rng.gen_range(0..actions.len())].clone());
        }

        let max = q_values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let best = q_values
            .iter()
            .enumerate()
            .filter(|(_, q)| **q == max)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();
        if best.is_empty() {
            return Err(TabulaError::IncomparableValues(actions.len()).into());
        }
        Ok(actions[best[rng.gen_range(0..best.len())]].clone())
    }

    /// Probability with which [`EpsilonGreedy::select_action`] picks an action
    /// out of `n_actions`, depending on whether it is the greedy one.
    pub fn action_probability(&self, is_greedy: bool, n_actions: usize) -> f64 {
        let explore = self.epsilon / n_actions as f64;
        if is_greedy {
            1.0 - self.epsilon + explore
        } else {
            explore
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_greedy_without_exploration() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(42);
        let explorer = EpsilonGreedy::new(0.0);
        let q_values = [0.1, 0.7, -0.2, 0.7];
        let actions = ['a', 'b', 'c', 'd'];

        let mut seen = vec![];
        for _ in 0..200 {
            let a = explorer.select_action(&q_values, &actions, &mut rng)?;
            assert!(a == 'b' || a == 'd');
            seen.push(a);
        }
        // Ties are broken uniformly.
        assert!(seen.contains(&'b') && seen.contains(&'d'));
        Ok(())
    }

    #[test]
    fn test_uniform_with_full_exploration() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(7);
        let explorer = EpsilonGreedy::new(1.0);
        let q_values = [10.0, 0.0, 0.0];
        let actions = [0usize, 1, 2];
        let n = 30_000;

        let mut counts = [0usize; 3];
        for _ in 0..n {
            counts[explorer.select_action(&q_values, &actions, &mut rng)?] += 1;
        }
        for c in counts {
            let freq = c as f64 / n as f64;
            assert!((freq - 1.0 / 3.0).abs() < 0.02, "{:?}", counts);
        }
        Ok(())
    }

    #[test]
    fn test_invalid_inputs() {
        let mut rng = SmallRng::seed_from_u64(0);
        let explorer = EpsilonGreedy::default();

        let err = explorer
            .select_action::<usize>(&[], &[], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulaError>(),
            Some(TabulaError::EmptyActionSet(_))
        ));

        let err = explorer
            .select_action(&[0.0], &[0usize, 1], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulaError>(),
            Some(TabulaError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
    }

    #[test]
    fn test_nan_values() -> Result<()> {
        let mut rng = SmallRng::seed_from_u64(0);
        let explorer = EpsilonGreedy::new(0.0);

        let err = explorer
            .select_action(&[f64::NAN, f64::NAN], &[0usize, 1], &mut rng)
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulaError>(),
            Some(TabulaError::IncomparableValues(2))
        ));

        for _ in 0..20 {
            let a = explorer.select_action(&[f64::NAN, -1.0], &[0usize, 1], &mut rng)?;
            assert_eq!(a, 1);
        }
        Ok(())
    }

    #[test]
    fn test_action_probability() {
        let explorer = EpsilonGreedy::new(0.1);
        let p_greedy = explorer.action_probability(true, 4);
        let p_other = explorer.action_probability(false, 4);
        assert!((p_greedy - 0.925).abs() < 1e-12);
        assert!((p_greedy + 3.0 * p_other - 1.0).abs() < 1e-12);
    }
}
