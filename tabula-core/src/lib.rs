#![warn(missing_docs)]
//! A library for tabular reinforcement learning.
//!
//! This crate defines the contract between environments and agents, the sparse
//! tables agents learn, the epsilon-greedy explorer and a thin training loop
//! ([`Trainer`]) with an evaluator and records.
pub mod dummy;
pub mod error;
pub mod record;
pub mod util;

mod base;
pub use base::{
    Agent, Capabilities, Capability, Configurable, Discrete, Env, Info, Policy, Step,
};

mod table;
pub use table::{PolicyTable, QTable, Trained, VTable};

mod explorer;
pub use explorer::EpsilonGreedy;

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator};

mod trainer;
pub use trainer::{Trainer, TrainerConfig, ARTIFACT_FILE};
