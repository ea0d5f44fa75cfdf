//! Sparse tables learned by agents.
//!
//! Every table keeps insertion order, so iteration and greedy tie-breaking
//! follow the order in which entries were first written.
use crate::Discrete;
use anyhow::Result;
use indexmap::{map::Iter, IndexMap};
use log::info;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::{BufReader, Write},
    path::Path,
};

/// State values. Absent entries read as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct VTable<S: Discrete>(IndexMap<S, f64>);

impl<S: Discrete> Default for VTable<S> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<S: Discrete> VTable<S> {
    /// A table holding `0.0` for each of the given states.
    pub fn zeros(states: &[S]) -> Self {
        Self(states.iter().map(|s| (s.clone(), 0.0)).collect())
    }

    /// Value of the state.
    pub fn get(&self, s: &S) -> f64 {
        self.0.get(s).copied().unwrap_or(0.0)
    }

    /// Sets the value of the state.
    pub fn set(&mut self, s: &S, v: f64) {
        self.0.insert(s.clone(), v);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(state, value)` pairs.
    pub fn iter(&self) -> Iter<'_, S, f64> {
        self.0.iter()
    }

    /// The largest absolute difference between the two tables over the union of their states.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.0
            .keys()
            .chain(other.0.keys())
            .map(|s| (self.get(s) - other.get(s)).abs())
            .fold(0.0, f64::max)
    }
}

/// Action values, lazily populated. Absent entries read as `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct QTable<S: Discrete, A: Discrete>(IndexMap<S, IndexMap<A, f64>>);

impl<S: Discrete, A: Discrete> Default for QTable<S, A> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<S: Discrete, A: Discrete> QTable<S, A> {
    /// Value of the state-action pair.
    pub fn get(&self, s: &S, a: &A) -> f64 {
        self.0
            .get(s)
            .and_then(|row| row.get(a))
            .copied()
            .unwrap_or(0.0)
    }

    /// Mutable reference to the value of the pair, inserting `0.0` if absent.
    pub fn entry(&mut self, s: &S, a: &A) -> &mut f64 {
        self.0
            .entry(s.clone())
            .or_default()
            .entry(a.clone())
            .or_insert(0.0)
    }

    /// Sets the value of the state-action pair.
    pub fn set(&mut self, s: &S, a: &A, v: f64) {
        *self.entry(s, a) = v;
    }

    /// The recorded action values of the state.
    pub fn row(&self, s: &S) -> Option<&IndexMap<A, f64>> {
        self.0.get(s)
    }

    /// Values of the given actions in the state, in the same order.
    ///
    /// Missing entries are inserted with `0.0`, so a later greedy lookup sees
    /// every action that was a candidate here.
    pub fn action_values(&mut self, s: &S, actions: &[A]) -> Vec<f64> {
        let row = self.0.entry(s.clone()).or_default();
        actions
            .iter()
            .map(|a| *row.entry(a.clone()).or_insert(0.0))
            .collect()
    }

    /// The first recorded action with the largest value, `None` if the state has no entry.
    pub fn greedy(&self, s: &S) -> Option<A> {
        let mut best: Option<(&A, f64)> = None;
        for (a, &q) in self.0.get(s)? {
            if best.map_or(true, |(_, v)| q > v) {
                best = Some((a, q));
            }
        }
        best.map(|(a, _)| a.clone())
    }

    /// The largest recorded value of the state, `0.0` if none is recorded.
    pub fn max(&self, s: &S) -> f64 {
        match self.0.get(s) {
            Some(row) if !row.is_empty() => {
                row.values().copied().fold(f64::NEG_INFINITY, f64::max)
            }
            _ => 0.0,
        }
    }

    /// Greedy policy over every state with at least one recorded action.
    pub fn greedy_policy(&self) -> PolicyTable<S, A> {
        let mut policy = PolicyTable::default();
        for s in self.0.keys() {
            if let Some(a) = self.greedy(s) {
                policy.insert(s.clone(), a);
            }
        }
        policy
    }

    /// States with a row in the table.
    pub fn states(&self) -> impl Iterator<Item = &S> {
        self.0.keys()
    }

    /// Number of states with a row in the table.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Deterministic policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct PolicyTable<S: Discrete, A: Discrete>(IndexMap<S, A>);

impl<S: Discrete, A: Discrete> Default for PolicyTable<S, A> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<S: Discrete, A: Discrete> PolicyTable<S, A> {
    /// Action for the state.
    pub fn get(&self, s: &S) -> Option<&A> {
        self.0.get(s)
    }

    /// Sets the action for the state, returning the previous one.
    pub fn insert(&mut self, s: S, a: A) -> Option<A> {
        self.0.insert(s, a)
    }

    /// Number of states with an action.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the policy is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(state, action)` pairs.
    pub fn iter(&self) -> Iter<'_, S, A> {
        self.0.iter()
    }
}

/// A learned policy with its value table, the artifact persisted after training.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(serialize = "T: Serialize", deserialize = "T: DeserializeOwned"))]
pub struct Trained<S: Discrete, A: Discrete, T> {
    /// The learned policy.
    pub policy: PolicyTable<S, A>,

    /// The learned value table.
    pub table: T,
}

impl<S, A, T> Trained<S, A, T>
where
    S: Discrete,
    A: Discrete,
    T: Serialize + DeserializeOwned,
{
    /// Constructs the artifact.
    pub fn new(policy: PolicyTable<S, A>, table: T) -> Self {
        Self { policy, table }
    }

    /// Loads the artifact from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load trained policy from {}", path_.display());
        Ok(b)
    }

    /// Saves the artifact as YAML, creating the parent directory if needed.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        if let Some(dir) = path_.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save trained policy into {}", path_.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_greedy_takes_first_max() {
        let mut q = QTable::<usize, usize>::default();
        q.set(&0, &2, 0.5);
        q.set(&0, &0, 1.0);
        q.set(&0, &1, 1.0);
        assert_eq!(q.greedy(&0), Some(0));
        assert_eq!(q.max(&0), 1.0);
        assert_eq!(q.greedy(&1), None);
        assert_eq!(q.max(&1), 0.0);
    }

    #[test]
    fn test_action_values_materialize_row() {
        let mut q = QTable::<usize, usize>::default();
        q.set(&3, &1, -1.0);
        assert_eq!(q.action_values(&3, &[0, 1]), vec![0.0, -1.0]);
        assert_eq!(q.row(&3).map(|r| r.len()), Some(2));

        // The freshly inserted zero beats the negative value.
        assert_eq!(q.greedy(&3), Some(0));
        assert_eq!(q.greedy_policy().get(&3), Some(&0));
    }

    #[test]
    fn test_vtable_defaults() {
        let mut v = VTable::zeros(&[0usize, 1, 2]);
        v.set(&1, 0.25);
        assert_eq!(v.get(&1), 0.25);
        assert_eq!(v.get(&7), 0.0);
        let w = VTable::zeros(&[0usize, 1]);
        assert_eq!(v.max_abs_diff(&w), 0.25);
    }

    #[test]
    fn test_serde_trained() -> Result<()> {
        let mut q = QTable::<usize, usize>::default();
        q.set(&0, &1, 0.5);
        q.set(&1, &0, 0.25);
        let trained = Trained::new(q.greedy_policy(), q);

        let dir = TempDir::new("trained")?;
        let path = dir.path().join("nested").join("artifact.yaml");
        trained.save(&path)?;
        let trained_ = Trained::<usize, usize, QTable<usize, usize>>::load(&path)?;
        assert_eq!(trained, trained_);
        Ok(())
    }
}
