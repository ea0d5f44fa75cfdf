//! Configuration of dynamic programming agents.
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`PolicyIteration`](super::PolicyIteration) and
/// [`ValueIteration`](super::ValueIteration).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DpConfig {
    pub(super) discount_factor: f64,
    pub(super) theta: f64,
    pub(super) seed: u64,
}

impl Default for DpConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.99,
            theta: 1e-6,
            seed: 42,
        }
    }
}

impl DpConfig {
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Threshold on the largest value change of a sweep, below which the values converged.
    pub fn theta(mut self, v: f64) -> Self {
        self.theta = v;
        self
    }

    /// Seed of the random number generator.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`DpConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of DP agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DpConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of DP agent into {}", path_.display());
        Ok(())
    }
}
