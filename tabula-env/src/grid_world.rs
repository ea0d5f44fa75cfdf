//! Grid World.
use crate::util::{check_action, check_state};
use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use tabula_core::{Capabilities, Env, Step};

const UP: usize = 0;
const RIGHT: usize = 1;
const DOWN: usize = 2;
const LEFT: usize = 3;

/// Configuration of [`GridWorld`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct GridWorldConfig {
    size: usize,
}

impl Default for GridWorldConfig {
    fn default() -> Self {
        Self { size: 5 }
    }
}

impl GridWorldConfig {
    /// Sets the side length of the square grid.
    pub fn size(mut self, v: usize) -> Self {
        self.size = v;
        self
    }
}

/// The agent moves on a square grid from the top-left to the bottom-right corner.
///
/// * State: `row * size + col`.
/// * Actions: `0` (up), `1` (right), `2` (down), `3` (left), clamped at the borders.
/// * Reward: `1.0` when reaching the goal, which ends the episode, `0.0` otherwise.
pub struct GridWorld {
    size: usize,
    row: usize,
    col: usize,
    done: bool,
}

impl GridWorld {
    fn goal(&self) -> usize {
        self.size * self.size - 1
    }

    fn state(&self) -> usize {
        self.row * self.size + self.col
    }
}

impl Env for GridWorld {
    type Config = GridWorldConfig;
    type State = usize;
    type Act = usize;
    type Info = ();

    fn build(config: &Self::Config, _seed: i64) -> Result<Self> {
        ensure!(config.size > 0, "Grid World needs at least one cell");
        Ok(Self {
            size: config.size,
            row: 0,
            col: 0,
            done: false,
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.row = 0;
        self.col = 0;
        self.done = false;
        Ok(self.state())
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.done {
            return Ok(Step::new(self.state(), *a, 0.0, true, ()));
        }
        check_action(&[UP, RIGHT, DOWN, LEFT], a, self.state())?;

        let last = self.size - 1;
        match *a {
            UP => self.row = self.row.saturating_sub(1),
            RIGHT => self.col = (self.col + 1).min(last),
            DOWN => self.row = (self.row + 1).min(last),
            _ => self.col = self.col.saturating_sub(1),
        }
        self.done = self.state() == self.goal();
        let reward = if self.done { 1.0 } else { 0.0 };
        Ok(Step::new(self.state(), *a, reward, self.done, ()))
    }

    fn actions(&self, _state: &usize) -> Vec<usize> {
        vec![UP, RIGHT, DOWN, LEFT]
    }

    fn states(&self) -> Vec<usize> {
        (0..self.size * self.size).collect()
    }

    fn render(&self) -> String {
        let border = "=".repeat(self.size * 4 + 1);
        let mut out = border.clone();
        for row in 0..self.size {
            out.push_str("\n|");
            for col in 0..self.size {
                let s = row * self.size + col;
                let cell = match (s == self.state(), s == self.goal()) {
                    (true, true) => " W ",
                    (true, false) => " A ",
                    (false, true) => " G ",
                    (false, false) => " . ",
                };
                out.push_str(cell);
                out.push('|');
            }
            out.push('\n');
            out.push_str(&border);
        }
        out.push_str(&format!(
            "\nPosition: ({}, {}) | Done: {}",
            self.row, self.col, self.done
        ));
        out
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state == self.goal()
    }

    fn force_state(&mut self, state: &usize) -> Result<()> {
        check_state(*state, self.size * self.size)?;
        self.row = state / self.size;
        self.col = state % self.size;
        self.done = self.is_terminal(state);
        Ok(())
    }
}
