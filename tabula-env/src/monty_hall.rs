//! Monty Hall problems.
//!
//! The car is placed behind a random door and the host never opens the door
//! of the current choice nor the one hiding the car.
mod lvl1;
mod lvl2;
pub use lvl1::{MontyHallLvl1, MontyHallLvl1Config};
pub use lvl2::{MontyHallLvl2, MontyHallLvl2Config};
