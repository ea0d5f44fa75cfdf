//! Configuration of planning agents.
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`DynaQ`](super::DynaQ) and [`DynaQPlus`](super::DynaQPlus).
///
/// `kappa` is only used by [`DynaQPlus`](super::DynaQPlus).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct DynaConfig {
    pub(super) discount_factor: f64,
    pub(super) learning_rate: f64,
    pub(super) epsilon: f64,
    pub(super) n_planning_steps: usize,
    pub(super) kappa: f64,
    pub(super) max_episode_len: usize,
    pub(super) seed: u64,
}

impl Default for DynaConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.99,
            learning_rate: 0.1,
            epsilon: 0.1,
            n_planning_steps: 5,
            kappa: 0.001,
            max_episode_len: 1000,
            seed: 42,
        }
    }
}

impl DynaConfig {
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Step size of the updates.
    pub fn learning_rate(mut self, v: f64) -> Self {
        self.learning_rate = v;
        self
    }

    /// Exploration rate.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
        self
    }

    /// Number of simulated updates after each real step.
    pub fn n_planning_steps(mut self, v: usize) -> Self {
        self.n_planning_steps = v;
        self
    }

    /// Scale of the exploration bonus `kappa * sqrt(elapsed)`.
    pub fn kappa(mut self, v: f64) -> Self {
        self.kappa = v;
        self
    }

    /// Episodes are cut after this number of steps.
    pub fn max_episode_len(mut self, v: usize) -> Self {
        self.max_episode_len = v;
        self
    }

    /// Seed of the random number generator.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    /// Constructs [`DynaConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of Dyna agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`DynaConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of Dyna agent into {}", path_.display());
        Ok(())
    }
}
