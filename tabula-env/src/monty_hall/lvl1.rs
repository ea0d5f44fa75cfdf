//! Monty Hall with three doors and a single keep-or-switch decision.
use crate::util::{check_action, check_state, seeded_rng};
use anyhow::{anyhow, Result};
use log::trace;
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tabula_core::{Capabilities, Env, Step};

const N_DOORS: usize = 3;

/// The initial door is picked, the host is about to open a door.
const PICKED: usize = 0;
/// The host opened a door, the agent keeps or switches.
const OPENED: usize = 1;
/// The final door is revealed.
const REVEALED: usize = 2;

const WAIT: usize = 0;
const KEEP: usize = 1;
const SWITCH: usize = 2;

/// Configuration of [`MontyHallLvl1`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct MontyHallLvl1Config {}

/// Monty Hall with three doors.
///
/// * States: `0` (initial door picked at random), `1` (host opened a door),
///   `2` (terminal).
/// * Actions: `0` (wait) in states `0` and `2`, `1` (keep) or `2` (switch) in state `1`.
/// * Reward: `1.0` if the final door hides the car.
pub struct MontyHallLvl1 {
    car: usize,
    first_choice: usize,
    opened: Option<usize>,
    state: usize,
    rng: SmallRng,
}

impl MontyHallLvl1 {
    fn open_door(&mut self) -> Result<usize> {
        let candidates = (0..N_DOORS)
            .filter(|&d| d != self.first_choice && d != self.car)
            .collect::<Vec<_>>();
        let door = *candidates
            .choose(&mut self.rng)
            .ok_or_else(|| anyhow!("No door left for the host to open"))?;
        self.opened = Some(door);
        Ok(door)
    }

    fn switched_door(&self) -> Option<usize> {
        (0..N_DOORS).find(|&d| d != self.first_choice && Some(d) != self.opened)
    }
}

impl Env for MontyHallLvl1 {
    type Config = MontyHallLvl1Config;
    type State = usize;
    type Act = usize;
    type Info = ();

    fn build(_config: &Self::Config, seed: i64) -> Result<Self> {
        let mut rng = seeded_rng(seed);
        Ok(Self {
            car: rng.gen_range(0..N_DOORS),
            first_choice: rng.gen_range(0..N_DOORS),
            opened: None,
            state: PICKED,
            rng,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.car = self.rng.gen_range(0..N_DOORS);
        self.first_choice = self.rng.gen_range(0..N_DOORS);
        self.opened = None;
        self.state = PICKED;
        Ok(self.state)
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.state == REVEALED {
            return Ok(Step::new(REVEALED, *a, 0.0, true, ()));
        }
        check_action(&self.actions(&self.state), a, self.state)?;

        if self.state == PICKED {
            let door = self.open_door()?;
            trace!("Host opened door {}", door);
            self.state = OPENED;
            return Ok(Step::new(OPENED, *a, 0.0, false, ()));
        }

        let final_choice = match *a {
            KEEP => self.first_choice,
            _ => self
                .switched_door()
                .ok_or_else(|| anyhow!("No door to switch to"))?,
        };
        self.state = REVEALED;
        let reward = if final_choice == self.car { 1.0 } else { 0.0 };
        Ok(Step::new(REVEALED, *a, reward, true, ()))
    }

    fn actions(&self, state: &usize) -> Vec<usize> {
        match *state {
            OPENED => vec![KEEP, SWITCH],
            _ => vec![WAIT],
        }
    }

    fn states(&self) -> Vec<usize> {
        vec![PICKED, OPENED, REVEALED]
    }

    fn render(&self) -> String {
        match self.state {
            PICKED => format!("Phase 1: initial choice is door {}", self.first_choice),
            OPENED => format!(
                "Phase 2: host opened door {:?}, choice is door {}. KEEP(1) or SWITCH(2)?",
                self.opened, self.first_choice
            ),
            _ => format!("End: the car was behind door {}", self.car),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state == REVEALED
    }

    /// Keeps the hidden car and initial choice, opening a consistent door when
    /// moving past the first phase.
    fn force_state(&mut self, state: &usize) -> Result<()> {
        check_state(*state, REVEALED + 1)?;
        match *state {
            PICKED => self.opened = None,
            _ => {
                if self.opened.is_none() {
                    self.open_door()?;
                }
            }
        }
        self.state = *state;
        Ok(())
    }
}
