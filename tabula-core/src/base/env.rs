//! Environment.
use super::{Capabilities, Capability, Discrete, Info, Step};
use crate::error::TabulaError;
use anyhow::Result;

/// Represents a finite environment, typically an MDP.
///
/// Algorithms depend on this trait only, so any algorithm can drive any
/// environment. The two optional capabilities, terminal detection and state
/// forcing, have default implementations behaving as if the capability were
/// absent. An environment providing either of them overrides the method and
/// declares it in [`Env::capabilities`].
///
/// Once an episode has ended, [`Env::step`] keeps returning the same state
/// with reward `0.0` and `is_terminated == true` until the next reset.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// State of the environment.
    type State: Discrete;

    /// Action of the environment.
    type Act: Discrete;

    /// Information in the [`Step`] object.
    type Info: Info;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// Resets the environment and returns the initial state.
    fn reset(&mut self) -> Result<Self::State>;

    /// Performs an environment step.
    ///
    /// Applying an action outside [`Env::actions`] of the current state fails
    /// with [`TabulaError::InvalidAction`].
    fn step(&mut self, a: &Self::Act) -> Result<Step<Self>>
    where
        Self: Sized;

    /// Returns the legal actions in the given state.
    fn actions(&self, state: &Self::State) -> Vec<Self::Act>;

    /// Enumerates all states.
    fn states(&self) -> Vec<Self::State>;

    /// Returns a text rendering of the current state.
    fn render(&self) -> String;

    /// Optional capabilities of the environment.
    fn capabilities(&self) -> Capabilities {
        Capabilities::default()
    }

    /// Returns `true` if the state is terminal.
    ///
    /// Without terminal detection no state is terminal.
    fn is_terminal(&self, _state: &Self::State) -> bool {
        false
    }

    /// Moves the environment into the given state.
    ///
    /// Callers reset the environment first, then force the state. Without
    /// state forcing this fails with [`TabulaError::MissingCapability`].
    fn force_state(&mut self, _state: &Self::State) -> Result<()> {
        Err(TabulaError::MissingCapability(
            Capability::StateForcing,
            "Env::force_state".into(),
        )
        .into())
    }
}
