//! Return statistics.
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabula_core::{Discrete, QTable};

/// Number of returns recorded for each state-action pair.
///
/// Together with a [`QTable`] holding their running mean, this stands for the
/// full list of returns of each pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct ReturnStats<S: Discrete, A: Discrete>(IndexMap<S, IndexMap<A, usize>>);

impl<S: Discrete, A: Discrete> Default for ReturnStats<S, A> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<S: Discrete, A: Discrete> ReturnStats<S, A> {
    /// Records return `g` of the pair and moves `q` to the mean of all its returns.
    pub fn record(&mut self, q: &mut QTable<S, A>, s: &S, a: &A, g: f64) -> f64 {
        let n = self
            .0
            .entry(s.clone())
            .or_default()
            .entry(a.clone())
            .or_insert(0);
        *n += 1;
        let mean = q.entry(s, a);
        *mean += (g - *mean) / *n as f64;
        *mean
    }

    /// Number of returns recorded for the pair.
    pub fn count(&self, s: &S, a: &A) -> usize {
        self.0
            .get(s)
            .and_then(|row| row.get(a))
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_mean() {
        let mut stats = ReturnStats::default();
        let mut q = QTable::<usize, usize>::default();
        for g in [1.0, 2.0, 6.0] {
            stats.record(&mut q, &0, &1, g);
        }
        assert_eq!(stats.count(&0, &1), 3);
        assert_eq!(stats.count(&1, &1), 0);
        assert!((q.get(&0, &1) - 3.0).abs() < 1e-12);
    }
}
