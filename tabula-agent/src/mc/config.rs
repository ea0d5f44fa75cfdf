//! Configuration of Monte Carlo agents.
use anyhow::Result;
use log::info;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of the Monte Carlo agents.
///
/// `epsilon` is not used by [`MonteCarloEs`](super::MonteCarloEs), which
/// explores through its random starts.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct McConfig {
    pub(super) discount_factor: f64,
    pub(super) epsilon: f64,
    pub(super) max_episode_len: usize,
    pub(super) seed: u64,
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            discount_factor: 0.99,
            epsilon: 0.1,
            max_episode_len: 1000,
            seed: 42,
        }
    }
}

impl McConfig {
    /// Discount factor.
    pub fn discount_factor(mut self, v: f64) -> Self {
        self.discount_factor = v;
        self
    }

    /// Exploration rate of the epsilon-greedy behaviour policy.
    pub fn epsilon(mut self, v: f64) -> Self {
        self.epsilon = v;
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

    /// Constructs [`McConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path_ = path.as_ref().to_owned();
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        info!("Load config of MC agent from {}", path_.display());
        Ok(b)
    }

    /// Saves [`McConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path_ = path.as_ref().to_owned();
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        info!("Save config of MC agent into {}", path_.display());
        Ok(())
    }
}
