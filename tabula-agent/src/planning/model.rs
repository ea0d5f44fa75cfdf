//! Learned environment model.
use indexmap::IndexMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tabula_core::Discrete;

/// Last observed outcome of a state-action pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    /// Reward.
    pub reward: f64,

    /// Next state.
    pub next_state: S,

    /// Real time step at which the pair was last taken.
    pub visited_at: usize,
}

/// Deterministic model `(state, action) -> (reward, next state)` of the environment.
///
/// A later observation of a pair overwrites the earlier one. Only pairs
/// observed at least once can be sampled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Model<S: Discrete, A: Discrete>(IndexMap<S, IndexMap<A, Transition<S>>>);

impl<S: Discrete, A: Discrete> Default for Model<S, A> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<S: Discrete, A: Discrete> Model<S, A> {
    /// Records the outcome of taking `a` in `s` at time step `t`.
    pub fn record(&mut self, s: &S, a: &A, reward: f64, next_state: S, t: usize) {
        let transition = Transition {
            reward,
            next_state,
            visited_at: t,
        };
        self.0
            .entry(s.clone())
            .or_default()
            .insert(a.clone(), transition);
    }

    /// Samples a uniformly random observed state, then one of its observed actions.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Option<(&S, &A, &Transition<S>)> {
        if self.0.is_empty() {
            return None;
        }
        let (s, row) = self.0.get_index(rng.gen_range(0..self.0.len()))?;
        if row.is_empty() {
            return None;
        }
        let (a, transition) = row.get_index(rng.gen_range(0..row.len()))?;
        Some((s, a, transition))
    }

    /// Number of states with a recorded action.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::SmallRng, SeedableRng};

    #[test]
    fn test_record_and_sample() {
        let mut rng = SmallRng::seed_from_u64(0);
        let mut model = Model::<usize, usize>::default();
        assert!(model.sample(&mut rng).is_none());

        model.record(&0, &1, 0.0, 1, 0);
        model.record(&1, &1, 1.0, 2, 1);
        model.record(&0, &1, 0.5, 2, 2);
        assert_eq!(model.len(), 2);

        // Only recorded pairs are sampled, the later observation of (0, 1) wins.
        for _ in 0..50 {
            let (s, a, transition) = model.sample(&mut rng).expect("non-empty model");
            assert_eq!(*a, 1);
            match *s {
                0 => assert_eq!(
                    transition,
                    &Transition {
                        reward: 0.5,
                        next_state: 2,
                        visited_at: 2
                    }
                ),
                1 => assert_eq!(transition.visited_at, 1),
                _ => panic!("unrecorded state {}", s),
            }
        }
    }
}
