//! Expected SARSA.
use super::{td_update, TdConfig};
use crate::util::{act_or_random, complete_policy, explore};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// Expected SARSA.
///
/// The target bootstraps on the expected value of the next state under the
/// epsilon-greedy policy rather than on a sampled next action.
pub struct ExpectedSarsa<E: Env> {
    config: TdConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> ExpectedSarsa<E> {
    /// Expected action value of the state, `0.0` if it has no recorded value.
    fn expected_value(&self, state: &E::State) -> f64 {
        let best = match self.q.greedy(state) {
            Some(best) => best,
            None => return 0.0,
        };
        let actions = self.env.actions(state);
        let n_actions = actions.len();
        actions
            .iter()
            .map(|a| {
                let p = self.explorer.action_probability(*a == best, n_actions);
                p * self.q.get(state, a)
            })
            .sum()
    }

    fn run_episode(&mut self) -> Result<usize> {
        let gamma = self.config.discount_factor;
        let mut state = self.env.reset()?;

        for t in 0..self.config.max_episode_len {
            let a = explore(&self.explorer, &mut self.q, &self.env, &state, &mut self.rng)?;
            let step = self.env.step(&a)?;
            let target = if step.is_done() {
                step.reward
            } else {
                step.reward + gamma * self.expected_value(&step.state)
            };
            td_update(&mut self.q, &state, &a, target, self.config.learning_rate);
            if step.is_done() {
                return Ok(t + 1);
            }
            state = step.state;
        }
        Ok(self.config.max_episode_len)
    }
}

impl<E: Env> Configurable<E> for ExpectedSarsa<E> {
    type Config = TdConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            explorer: EpsilonGreedy::new(config.epsilon),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            q: QTable::default(),
            policy: PolicyTable::default(),
        }
    }
}

impl<E: Env> Policy<E> for ExpectedSarsa<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for ExpectedSarsa<E> {
    type Table = QTable<E::State, E::Act>;

    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        for i in 0..episodes {
            let n_steps = self.run_episode()?;
            trace!("Episode {}: {} steps", i, n_steps);
        }
        self.policy = self.q.greedy_policy();
        complete_policy(&mut self.policy, &self.env);
        Ok(Trained::new(self.policy.clone(), self.q.clone()))
    }

    fn policy(&self) -> &PolicyTable<E::State, E::Act> {
        &self.policy
    }

    fn table(&self) -> &Self::Table {
        &self.q
    }

    fn env(&self) -> &E {
        &self.env
    }

    fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    fn snapshot(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(&(&self.config, &self.q, &self.policy))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, q, policy): (TdConfig, _, _) = bincode::deserialize(blob)?;
        self.explorer = EpsilonGreedy::new(config.epsilon);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.policy = policy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_expected_value() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default(), 0)?;
        let mut agent = ExpectedSarsa::build(TdConfig::default().epsilon(0.2), env);
        assert_eq!(agent.expected_value(&0), 0.0);

        agent.q.set(&0, &0, 1.0);
        agent.q.set(&0, &1, 3.0);
        // Greedy action 1 has probability 0.9, action 0 has 0.1.
        assert!((agent.expected_value(&0) - 2.8).abs() < 1e-12);
        Ok(())
    }
}
