//! Discrete environments for [`tabula-core`](tabula_core).
//!
//! All environments use `usize` states and actions, are built with
//! [`Env::build`](tabula_core::Env::build) from a serde configuration and a
//! random seed, and reject actions outside the legal set of the current state.
//!
//! | environment | terminal detection | state forcing |
//! |---|---|---|
//! | [`LineWorld`] | yes | yes |
//! | [`GridWorld`] | yes | yes |
//! | [`MontyHallLvl1`] | yes | yes |
//! | [`MontyHallLvl2`] | yes | no |
//! | [`RockPaperScissors`] | yes | yes |
//!
//! Here is an example of stepping Line World to its goal.
//!
//! ```
//! use tabula_core::Env as _;
//! use tabula_env::{LineWorld, LineWorldConfig};
//!
//! let mut env = LineWorld::build(&LineWorldConfig::default(), 0).unwrap();
//! let mut state = env.reset().unwrap();
//! loop {
//!     let step = env.step(&1).unwrap();
//!     state = step.state;
//!     if step.is_done() {
//!         break;
//!     }
//! }
//! assert_eq!(state, 6);
//! ```
mod grid_world;
mod line_world;
mod monty_hall;
mod rock_paper_scissors;
mod util;

pub use grid_world::{GridWorld, GridWorldConfig};
pub use line_world::{LineWorld, LineWorldConfig};
pub use monty_hall::{MontyHallLvl1, MontyHallLvl1Config, MontyHallLvl2, MontyHallLvl2Config};
pub use rock_paper_scissors::{RockPaperScissors, RockPaperScissorsConfig, RoundInfo};
