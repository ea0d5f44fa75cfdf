//! Core functionalities.
mod agent;
mod capability;
mod env;
mod policy;
mod step;
pub use agent::Agent;
pub use capability::{Capabilities, Capability};
pub use env::Env;
pub use policy::{Configurable, Policy};
pub use step::{Info, Step};

use serde::{de::DeserializeOwned, Serialize};
use std::{fmt::Debug, hash::Hash};

/// A discrete identifier of states or actions.
///
/// Values are used as keys of the tables agents learn, so they must be hashable
/// and serializable. `Default` gives the placeholder action assigned to states
/// without legal actions.
pub trait Discrete: Clone + Eq + Hash + Debug + Default + Serialize + DeserializeOwned {}

impl<T> Discrete for T where
    T: Clone + Eq + Hash + Debug + Default + Serialize + DeserializeOwned
{
}
