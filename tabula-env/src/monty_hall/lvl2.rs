//! Monty Hall with five doors and four keep-or-switch decisions.
use crate::util::{check_action, seeded_rng};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use tabula_core::{Capabilities, Capability, Env, Step};

const N_DOORS: usize = 5;
const N_DECISIONS: usize = 4;

const KEEP: usize = 0;
const SWITCH: usize = 1;

/// Configuration of [`MontyHallLvl2`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct MontyHallLvl2Config {}

/// Monty Hall with five doors.
///
/// At each of the four steps the host opens one more door, neither the current
/// choice nor the car, if any is left; then the agent keeps (`0`) or switches
/// (`1`) to a random unopened door. After the fourth decision the car is
/// revealed and the reward is `1.0` if the choice hides it.
///
/// * State: `step_count * 5 + current_choice`, terminal from `20` on.
///
/// The hidden opened doors cannot be recovered from the state, so this
/// environment does not support state forcing.
pub struct MontyHallLvl2 {
    car: usize,
    choice: usize,
    opened: Vec<usize>,
    step_count: usize,
    done: bool,
    rng: SmallRng,
}

impl MontyHallLvl2 {
    fn state(&self) -> usize {
        self.step_count * N_DOORS + self.choice
    }
}

impl Env for MontyHallLvl2 {
    type Config = MontyHallLvl2Config;
    type State = usize;
    type Act = usize;
    type Info = ();

    fn build(_config: &Self::Config, seed: i64) -> Result<Self> {
        let mut rng = seeded_rng(seed);
        Ok(Self {
            car: rng.gen_range(0..N_DOORS),
            choice: rng.gen_range(0..N_DOORS),
            opened: vec![],
            step_count: 0,
            done: false,
            rng,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.car = self.rng.gen_range(0..N_DOORS);
        self.choice = self.rng.gen_range(0..N_DOORS);
        self.opened.clear();
        self.step_count = 0;
        self.done = false;
        Ok(self.state())
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.done {
            return Ok(Step::new(self.state(), *a, 0.0, true, ()));
        }
        check_action(&[KEEP, SWITCH], a, self.state())?;

        let closed = (0..N_DOORS)
            .filter(|d| *d != self.choice && *d != self.car && !self.opened.contains(d))
            .collect::<Vec<_>>();
        if let Some(&door) = closed.choose(&mut self.rng) {
            trace!("Host opened door {}", door);
            self.opened.push(door);
        }

        if *a == SWITCH {
            let remaining = (0..N_DOORS)
                .filter(|d| *d != self.choice && !self.opened.contains(d))
                .collect::<Vec<_>>();
            // With every other door open there is nothing to switch to.
            if let Some(&door) = remaining.choose(&mut self.rng) {
                self.choice = door;
            }
        }

        self.step_count += 1;
        if self.step_count >= N_DECISIONS {
            self.done = true;
            let reward = if self.choice == self.car { 1.0 } else { 0.0 };
            return Ok(Step::new(self.state(), *a, reward, true, ()));
        }
        Ok(Step::new(self.state(), *a, 0.0, false, ()))
    }

    fn actions(&self, _state: &usize) -> Vec<usize> {
        vec![KEEP, SWITCH]
    }

    fn states(&self) -> Vec<usize> {
        (0..N_DOORS * N_DOORS).collect()
    }

    fn render(&self) -> String {
        let mut out = format!(
            "Step {}: doors opened={:?}, current choice={}",
            self.step_count, self.opened, self.choice
        );
        if self.done {
            let result = if self.choice == self.car { "WIN" } else { "LOSE" };
            out.push_str(&format!("\nResult: car was behind {}. {}", self.car, result));
        }
        out
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::default().terminal_detection(true)
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state >= N_DECISIONS * N_DOORS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::error::TabulaError;

    #[test]
    fn test_episode_has_four_decisions() -> Result<()> {
        let mut env = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 5)?;
        for _ in 0..50 {
            let mut state = env.reset()?;
            assert!(state < N_DOORS);
            for t in 1..=N_DECISIONS {
                let step = env.step(&SWITCH)?;
                assert_eq!(step.state / N_DOORS, t);
                assert_eq!(step.is_done(), t == N_DECISIONS);
                assert!(!env.opened.contains(&env.car));
                state = step.state;
            }
            assert!(env.is_terminal(&state));
        }
        Ok(())
    }

    #[test]
    fn test_no_state_forcing() -> Result<()> {
        let mut env = MontyHallLvl2::build(&MontyHallLvl2Config::default(), 0)?;
        assert!(!env.capabilities().has(Capability::StateForcing));
        let err = env.force_state(&3).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulaError>(),
            Some(TabulaError::MissingCapability(Capability::StateForcing, _))
        ));
        Ok(())
    }
}
