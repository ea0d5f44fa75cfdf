//! SARSA.
use super::{td_update, TdConfig};
use crate::util::{act_or_random, complete_policy, explore};
use anyhow::Result;
use log::trace;
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// SARSA, on-policy TD control.
///
/// The next action is chosen before the update and is the one taken next,
/// so the target is `r + gamma * Q[s'][a']`.
pub struct Sarsa<E: Env> {
    config: TdConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    rng: SmallRng,
}

impl<E: Env> Sarsa<E> {
    fn run_episode(&mut self) -> Result<usize> {
        let gamma = self.config.discount_factor;
        let mut state = self.env.reset()?;
        let mut a = explore(&self.explorer, &mut self.q, &self.env, &state, &mut self.rng)?;

        for t in 0..self.config.max_episode_len {
            let step = self.env.step(&a)?;
            if step.is_done() {
                td_update(&mut self.q, &state, &a, step.reward, self.config.learning_rate);
                return Ok(t + 1);
            }

            let next = step.state;
            let next_a = explore(&self.explorer, &mut self.q, &self.env, &next, &mut self.rng)?;
            let target = step.reward + gamma * self.q.get(&next, &next_a);
            td_update(&mut self.q, &state, &a, target, self.config.learning_rate);
            state = next;
            a = next_a;
        }
        Ok(self.config.max_episode_len)
    }
}

impl<E: Env> Configurable<E> for Sarsa<E> {
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

impl<E: Env> Policy<E> for Sarsa<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for Sarsa<E> {
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
    fn test_terminal_target_is_reward() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(2), 0)?;
        let config = TdConfig::default().learning_rate(1.0).epsilon(1.0);
        let mut agent = Sarsa::build(config, env);
        let trained = agent.train(20)?;

        // With a unit step size the last update sets the value to the reward.
        assert_eq!(trained.table.get(&0, &1), 1.0);
        assert_eq!(trained.policy.get(&0), Some(&1));
        Ok(())
    }
}
