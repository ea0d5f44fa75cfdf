//! Tabular reinforcement learning in Rust.
//!
//! Tabula consists of the following crates:
//!
//! * [tabula-core](tabula_core) provides the contract between environments and
//!   agents ([`Env`], [`Agent`]), sparse value tables, the epsilon-greedy
//!   explorer, errors, records and a thin [`Trainer`] with an evaluator.
//! * [tabula-env](tabula_env) includes Line World, Grid World, two levels of
//!   Monty Hall and a two-round Rock-Paper-Scissors.
//! * [tabula-agent](tabula_agent) includes the learning algorithms: dynamic
//!   programming, Monte Carlo control, temporal-difference control and
//!   Dyna-style planning.
//!
//! This crate re-exports all of them and holds the demos in `examples/`.
//!
//! ```
//! use tabula::{
//!     agent::td::{QLearning, TdConfig},
//!     env::{LineWorld, LineWorldConfig},
//!     Agent, Configurable, Env,
//! };
//!
//! let env = LineWorld::build(&LineWorldConfig::default(), 0).unwrap();
//! let config = TdConfig::default().discount_factor(0.9).epsilon(0.3);
//! let mut agent = QLearning::build(config, env);
//! let trained = agent.train(1000).unwrap();
//! assert_eq!(trained.policy.get(&3), Some(&1));
//! ```
pub use tabula_agent as agent;
pub use tabula_core::*;
pub use tabula_env as env;
