//! Dyna-Q.
use super::{q_learning_update, DynaConfig, Model};
use crate::util::{act_or_random, complete_policy, explore};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// Dyna-Q, Q-Learning with planning on a learned model.
pub struct DynaQ<E: Env> {
    config: DynaConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    model: Model<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    n_steps: usize,
    rng: SmallRng,
}

impl<E: Env> DynaQ<E> {
    fn plan(&mut self) {
        for _ in 0..self.config.n_planning_steps {
            let (s, a, transition) = match self.model.sample(&mut self.rng) {
                Some((s, a, transition)) => (s.clone(), a.clone(), transition.clone()),
                None => return,
            };
            let done = self.env.is_terminal(&transition.next_state);
            q_learning_update(
                &mut self.q,
                &s,
                &a,
                transition.reward,
                &transition.next_state,
                done,
                self.config.discount_factor,
                self.config.learning_rate,
            );
        }
    }

    fn run_episode(&mut self) -> Result<usize> {
        let mut state = self.env.reset()?;

        for t in 0..self.config.max_episode_len {
            let a = explore(&self.explorer, &mut self.q, &self.env, &state, &mut self.rng)?;
            let step = self.env.step(&a)?;
            let done = step.is_done();
            q_learning_update(
                &mut self.q,
                &state,
                &a,
                step.reward,
                &step.state,
                done,
                self.config.discount_factor,
                self.config.learning_rate,
            );
            self.model
                .record(&state, &a, step.reward, step.state.clone(), self.n_steps);
            self.plan();
            self.n_steps += 1;

            if done {
                return Ok(t + 1);
            }
            state = step.state;
        }
        Ok(self.config.max_episode_len)
    }
}

impl<E: Env> Configurable<E> for DynaQ<E> {
    type Config = DynaConfig;

    fn build(config: Self::Config, env: E) -> Self {
        Self {
            explorer: EpsilonGreedy::new(config.epsilon),
            rng: SmallRng::seed_from_u64(config.seed),
            config,
            env,
            q: QTable::default(),
            model: Model::default(),
            policy: PolicyTable::default(),
            n_steps: 0,
        }
    }
}

impl<E: Env> Policy<E> for DynaQ<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for DynaQ<E> {
    type Table = QTable<E::State, E::Act>;

    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        for i in 0..episodes {
            let n_steps = self.run_episode()?;
            trace!("Episode {}: {} steps", i, n_steps);
        }
        debug!(
            "Dyna-Q took {} real steps, the model covers {} states",
            self.n_steps,
            self.model.len()
        );
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
        Ok(bincode::serialize(&(
            &self.config,
            &self.q,
            &self.model,
            &self.policy,
            self.n_steps,
        ))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, q, model, policy, n_steps): (DynaConfig, _, _, _, usize) =
            bincode::deserialize(blob)?;
        self.explorer = EpsilonGreedy::new(config.epsilon);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.model = model;
        self.policy = policy;
        self.n_steps = n_steps;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_planning_propagates_values() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(5), 0)?;
        let config = DynaConfig::default()
            .discount_factor(0.9)
            .epsilon(1.0)
            .n_planning_steps(50);
        let mut agent = DynaQ::build(config, env);
        let trained = agent.train(30)?;

        assert_eq!(agent.model.len(), 4);
        for s in 0..4 {
            assert_eq!(trained.policy.get(&s), Some(&1));
        }
        Ok(())
    }
}
