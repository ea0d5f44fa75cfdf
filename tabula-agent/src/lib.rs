//! Tabular reinforcement learning algorithms.
//!
//! Every agent owns the environment it learns on and is built with
//! [`Configurable::build`](tabula_core::Configurable::build) from a serde
//! configuration. Training with [`Agent::train`](tabula_core::Agent::train)
//! returns the learned policy together with a value table ([`dp`]) or an
//! action-value table (the others).
//!
//! * [`dp`]: Policy Iteration, Value Iteration.
//! * [`mc`]: Monte Carlo Exploring Starts, on-policy first-visit MC,
//!   off-policy MC with weighted importance sampling.
//! * [`td`]: SARSA, Q-Learning, Expected SARSA.
//! * [`planning`]: Dyna-Q, Dyna-Q+.
pub mod dp;
pub mod mc;
pub mod planning;
pub mod td;
mod util;
