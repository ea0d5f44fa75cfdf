//! Two-round Rock Paper Scissors.
use crate::util::{check_action, check_state, seeded_rng};
use anyhow::Result;
use rand::{rngs::SmallRng, Rng};
use serde::{Deserialize, Serialize};
use tabula_core::{Capabilities, Env, Info, Step};

const MOVES: [&str; 3] = ["Rock", "Paper", "Scissors"];
const START: usize = 0;
const TERMINAL: usize = 10;

/// Configuration of [`RockPaperScissors`].
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct RockPaperScissorsConfig {}

/// Moves played in a round.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoundInfo {
    /// Round number, `1` or `2`. `0` when the game was already over.
    pub round: usize,

    /// Move of the agent.
    pub agent: usize,

    /// Move of the opponent.
    pub opponent: usize,
}

impl Info for RoundInfo {}

/// Two rounds of Rock (`0`), Paper (`1`) and Scissors (`2`).
///
/// The opponent plays randomly in the first round and repeats the first move
/// of the agent in the second round.
///
/// * States: `0` (start), `1 + 3 * agent_r1 + opponent_r1` after the first
///   round, `10` (terminal).
/// * Reward: `1.0` for a win, `-1.0` for a loss, `0.0` for a tie, each round.
pub struct RockPaperScissors {
    round: usize,
    agent_r1: usize,
    opponent_r1: usize,
    total_reward: f64,
    done: bool,
    rng: SmallRng,
}

impl RockPaperScissors {
    fn state(&self) -> usize {
        match (self.done, self.round) {
            (true, _) => TERMINAL,
            (false, 0) => START,
            _ => 1 + 3 * self.agent_r1 + self.opponent_r1,
        }
    }

    fn payoff(agent: usize, opponent: usize) -> f64 {
        [0.0, 1.0, -1.0][(agent + 3 - opponent) % 3]
    }
}

impl Env for RockPaperScissors {
    type Config = RockPaperScissorsConfig;
    type State = usize;
    type Act = usize;
    type Info = RoundInfo;

    fn build(_config: &Self::Config, seed: i64) -> Result<Self> {
        Ok(Self {
            round: 0,
            agent_r1: 0,
            opponent_r1: 0,
            total_reward: 0.0,
            done: false,
            rng: seeded_rng(seed),
        })
    }

    fn reset(&mut self) -> Result<usize> {
        self.round = 0;
        self.total_reward = 0.0;
        self.done = false;
        Ok(START)
    }

    fn step(&mut self, a: &usize) -> Result<Step<Self>> {
        if self.done {
            return Ok(Step::new(TERMINAL, *a, 0.0, true, RoundInfo::default()));
        }
        check_action(&[0, 1, 2], a, self.state())?;

        let opponent = match self.round {
            0 => self.rng.gen_range(0..MOVES.len()),
            _ => self.agent_r1,
        };
        let reward = Self::payoff(*a, opponent);
        self.total_reward += reward;

        if self.round == 0 {
            self.agent_r1 = *a;
            self.opponent_r1 = opponent;
            self.round = 1;
        } else {
            self.done = true;
        }
        let info = RoundInfo {
            round: self.round + self.done as usize,
            agent: *a,
            opponent,
        };
        Ok(Step::new(self.state(), *a, reward, self.done, info))
    }

    fn actions(&self, _state: &usize) -> Vec<usize> {
        vec![0, 1, 2]
    }

    fn states(&self) -> Vec<usize> {
        (START..=TERMINAL).collect()
    }

    fn render(&self) -> String {
        match (self.done, self.round) {
            (true, _) => format!("Game over. Score: {}", self.total_reward),
            (false, 0) => "Round 1: choose 0:Rock, 1:Paper, 2:Scissors".to_string(),
            _ => format!(
                "Round 2: opponent played {} and will now play {}",
                MOVES[self.opponent_r1], MOVES[self.agent_r1]
            ),
        }
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::all()
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state == TERMINAL
    }

    fn force_state(&mut self, state: &usize) -> Result<()> {
        check_state(*state, TERMINAL + 1)?;
        match *state {
            START => {
                self.reset()?;
            }
            TERMINAL => self.done = true,
            s => {
                self.agent_r1 = (s - 1) / 3;
                self.opponent_r1 = (s - 1) % 3;
                self.round = 1;
                self.done = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payoff() {
        assert_eq!(RockPaperScissors::payoff(1, 0), 1.0);
        assert_eq!(RockPaperScissors::payoff(0, 1), -1.0);
        assert_eq!(RockPaperScissors::payoff(2, 2), 0.0);
        assert_eq!(RockPaperScissors::payoff(0, 2), 1.0);
    }

    #[test]
    fn test_opponent_repeats_first_move() -> Result<()> {
        let mut env = RockPaperScissors::build(&RockPaperScissorsConfig::default(), 7)?;
        for _ in 0..20 {
            assert_eq!(env.reset()?, START);
            let step = env.step(&2)?;
            assert_eq!(step.state, 1 + 3 * 2 + step.info.opponent);
            assert_eq!(step.info.round, 1);

            // Rock beats the repeated Scissors.
            let step = env.step(&0)?;
            assert_eq!(step.info.opponent, 2);
            assert_eq!((step.state, step.reward, step.is_done()), (TERMINAL, 1.0, true));
        }
        Ok(())
    }

    #[test]
    fn test_force_state() -> Result<()> {
        let mut env = RockPaperScissors::build(&RockPaperScissorsConfig::default(), 0)?;
        env.reset()?;
        env.force_state(&5)?;
        assert_eq!((env.agent_r1, env.opponent_r1), (1, 1));

        // The opponent plays Paper, Scissors wins.
        let step = env.step(&2)?;
        assert_eq!((step.reward, step.is_done()), (1.0, true));
        assert!(env.force_state(&11).is_err());
        Ok(())
    }
}
