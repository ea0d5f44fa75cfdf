//! Policy.
use super::Env;
use anyhow::Result;
use serde::de::DeserializeOwned;
use std::path::Path;

/// A policy on an environment.
///
/// Policy is a deterministic mapping from a state to an action.
pub trait Policy<E: Env> {
    /// Returns the action for the given state.
    ///
    /// States the policy has no entry for get a uniformly random legal action.
    fn act(&mut self, state: &E::State) -> Result<E::Act>;
}

/// A configurable object, having type parameter.
///
/// Agents own the environment they learn on, so it is handed over when building.
pub trait Configurable<E: Env> {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config, env: E) -> Self;

    /// Build the object with the configuration in the yaml file of the given path.
    fn build_from_path(path: impl AsRef<Path>, env: E) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(Self::build(config, env))
    }
}
