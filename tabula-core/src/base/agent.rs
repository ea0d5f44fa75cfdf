//! Agent.
use super::{Env, Policy};
use crate::{PolicyTable, Trained};
use anyhow::Result;
use serde::{de::DeserializeOwned, Serialize};
use std::{fs, path::Path};

/// Name of the file [`Agent::save_params`] writes.
const PARAMS_FILE: &str = "agent.bin";

/// Represents a trainable policy on an environment.
///
/// An agent exclusively owns its environment and the tables it learns.
pub trait Agent<E: Env>: Policy<E> {
    /// The learned value table, a [`VTable`](crate::VTable) or [`QTable`](crate::QTable).
    type Table: Clone + Serialize + DeserializeOwned;

    /// Trains the agent with the given episode budget.
    ///
    /// Returns the learned policy and value table.
    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>>;

    /// The current policy.
    fn policy(&self) -> &PolicyTable<E::State, E::Act>;

    /// The current value table.
    fn table(&self) -> &Self::Table;

    /// The environment the agent interacts with.
    fn env(&self) -> &E;

    /// The environment the agent interacts with.
    fn env_mut(&mut self) -> &mut E;

    /// Serializes the configuration and every learned table into an opaque blob.
    fn snapshot(&self) -> Result<Vec<u8>>;

    /// Restores the state serialized with [`Agent::snapshot`].
    fn restore(&mut self, blob: &[u8]) -> Result<()>;

    /// Save the parameters of the agent in the given directory.
    fn save_params(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path)?;
        fs::write(path.join(PARAMS_FILE), self.snapshot()?)?;
        Ok(())
    }

    /// Load the parameters of the agent from the given directory.
    fn load_params(&mut self, path: &Path) -> Result<()> {
        let blob = fs::read(path.join(PARAMS_FILE))?;
        self.restore(&blob)
    }
}
