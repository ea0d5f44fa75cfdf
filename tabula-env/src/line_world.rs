//! Line World.
use crate::util::{check_action, check_state};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tabula_core::{Capabilities, Env, Step};

const LEFT: usize = 0;
const RIGHT: usize = 1;

/// Configuration of [`LineWorld`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct LineWorldConfig {
    length: usize,
    start_pos: usize,
    goal_pos: Option<usize>,
}

impl Default for LineWorldConfig {
    fn default() -> Self {
        Self {
            length: 7,
            start_pos: 3,
            goal_pos: None,
        }
    }
}

impl LineWorldConfig {
    /// Sets the number of cells.
    pub fn length(mut self, v: usize) -> Self {
        self.length = v;
        self
    }

    /// Sets the start cell.
    pub fn start_pos(mut self, v: usize) -> Self {
        self.start_pos = v;
        self
    }

    /// Sets the goal cell. The last cell is the goal by default.
    pub fn goal_pos(mut self, v: usize) -> Self {
        self.goal_pos = Some(v);
        self
    }
}

/// The agent moves on a line of cells.
///
/// * Actions: `0` (left) and `1` (right), clamped at both ends.
/// * Reward: `1.0` when reaching the goal, which ends the episode, `0.0` otherwise.
pub struct LineWorld {
    length: usize,
    start_pos: usize,
    goal_pos: usize,
    pos: usize,
    done: bool,
}

impl Env for LineWorld {
    type Config = LineWorldConfig;
    type State = usize;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        let goal_pos = config.goal_pos.unwrap_or(config.length.saturating_sub(1));
        ensure!(config.length > 0, "Line World needs at least one cell");
        check_state(config.start_pos, config.length)?;
        check_state(goal_pos, config.length)?;
        Ok(Self {
            length: config.length,
            start_pos: config.start_pos,
            goal_pos,
            pos: config.start_pos,
            done: false,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.pos = self.start_pos;
        self.done = false;
        Ok(self.pos)
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.done {
            return Ok(Step::new(self.pos, *a, 0.0, true, ()));
        }
        check_action(&[LEFT, RIGHT], a, self.pos)?;

        self.pos = match *a {
            LEFT => self.pos.saturating_sub(1),
            _ => (self.pos + 1).min(self.length - 1),
        };
        self.done = self.pos == self.goal_pos;
        let reward = if self.done { 1.0 } else { 0.0 };
        Ok(Step::new(self.pos, *a, reward, self.done, ()))
    }

    fn actions(&self, _state: &usize) -> Vec<usize> {
        vec![LEFT, RIGHT]
    }

    fn states(&self) -> Vec<usize> {
        (0..self.length).collect()
    }

    fn render(&self) -> String {
        (0..self.length)
            .map(|i| match (i == self.pos, i == self.goal_pos) {
                (true, true) => "[X]",
                (true, false) => "[A]",
                (false, true) => "[G]",
                (false, false) => "[_]",
            })
            .collect()
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state == self.goal_pos
    }

    fn force_state(&mut self, state: &usize) -> Result<()> {
        check_state(*state, self.length)?;
        self.pos = *state;
        self.done = self.is_terminal(state);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::error::TabulaError;

    #[test]
    fn test_walk_to_goal() -> Result<()> {
        let mut env = LineWorld::build(&LineWorldConfig::default(), 0)?;
        assert_eq!(env.reset()?, 3);

        let step = env.step(&RIGHT)?;
        assert_eq!((step.state, step.reward, step.is_done()), (4, 0.0, false));
        env.step(&RIGHT)?;
        env.step(&RIGHT)?;
        assert_eq!(env.render(), "[_][_][_][_][_][_][X]");

        // Stepping after the end is a no-op.
        let step = env.step(&LEFT)?;
        assert_eq!((step.state, step.reward, step.is_done()), (6, 0.0, true));
        Ok(())
    }

    #[test]
    fn test_clamped_and_invalid() -> Result<()> {
        let config = LineWorldConfig::default().start_pos(0);
        let mut env = LineWorld::build(&config, 0)?;
        env.reset()?;
        assert_eq!(env.step(&LEFT)?.state, 0);

        let err = env.step(&2).map(|_| ()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TabulaError>(),
            Some(TabulaError::InvalidAction(_))
        ));
        Ok(())
    }

    #[test]
    fn test_force_state() -> Result<()> {
        let mut env = LineWorld::build(&LineWorldConfig::default().goal_pos(0), 0)?;
        env.reset()?;
        env.force_state(&1)?;
        let step = env.step(&LEFT)?;
        assert!(step.is_done());
        assert_eq!(step.reward, 1.0);
        assert!(env.force_state(&7).is_err());
        Ok(())
    }
}
