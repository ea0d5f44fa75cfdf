//! Dyna-Q+.
use super::{q_learning_update, DynaConfig, Model};
use crate::util::{act_or_random, complete_policy, explore};
use anyhow::Result;
use log::{debug, trace};
use rand::{rngs::SmallRng, SeedableRng};
use tabula_core::{Agent, Configurable, Env, EpsilonGreedy, Policy, PolicyTable, QTable, Trained};

/// Dyna-Q+, Dyna-Q with an exploration bonus for pairs not taken for a long time.
///
/// Planning updates add `kappa * sqrt(t - t_last)` to the modelled reward,
/// where `t` counts real steps and `t_last` is the step the pair was last
/// taken. Real updates get no bonus. Actions never taken in a state are not
/// part of the model and are never planned on.
pub struct DynaQPlus<E: Env> {
    config: DynaConfig,
    env: E,
    explorer: EpsilonGreedy,
    q: QTable<E::State, E::Act>,
    model: Model<E::State, E::Act>,
    policy: PolicyTable<E::State, E::Act>,
    time_step: usize,
    rng: SmallRng,
}

impl<E: Env> DynaQPlus<E> {
    fn bonus(&self, visited_at: usize) -> f64 {
        let elapsed = self.time_step.saturating_sub(visited_at) as f64;
        self.config.kappa * elapsed.sqrt()
    }

    /// Learns from a real step without bonus and stamps the pair with the current time step.
    fn learn(&mut self, s: &E::State, a: &E::Act, reward: f64, next: &E::State, done: bool) {
        q_learning_update(
            &mut self.q,
            s,
            a,
            reward,
            next,
            done,
            self.config.discount_factor,
            self.config.learning_rate,
        );
        self.model.record(s, a, reward, next.clone(), self.time_step);
    }

    fn plan(&mut self) {
        for _ in 0..self.config.n_planning_steps {
            let (s, a, transition) = match self.model.sample(&mut self.rng) {
                Some((s, a, transition)) => (s.clone(), a.clone(), transition.clone()),
                None => return,
            };
            let done = self.env.is_terminal(&transition.next_state);
            let reward = transition.reward + self.bonus(transition.visited_at);
            q_learning_update(
                &mut self.q,
                &s,
                &a,
                reward,
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
            self.learn(&state, &a, step.reward, &step.state, done);
            self.plan();
            self.time_step += 1;

            if done {
                return Ok(t + 1);
            }
            state = step.state;
        }
        Ok(self.config.max_episode_len)
    }
}

impl<E: Env> Configurable<E> for DynaQPlus<E> {
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
            time_step: 0,
        }
    }
}

impl<E: Env> Policy<E> for DynaQPlus<E> {
    fn act(&mut self, state: &E::State) -> Result<E::Act> {
        act_or_random(&self.policy, &self.env, state, &mut self.rng)
    }
}

impl<E: Env> Agent<E> for DynaQPlus<E> {
    type Table = QTable<E::State, E::Act>;

    fn train(&mut self, episodes: usize) -> Result<Trained<E::State, E::Act, Self::Table>> {
        for i in 0..episodes {
            let n_steps = self.run_episode()?;
            trace!("Episode {}: {} steps", i, n_steps);
        }
        debug!(
            "Dyna-Q+ took {} real steps, the model covers {} states",
            self.time_step,
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
            self.time_step,
        ))?)
    }

    fn restore(&mut self, blob: &[u8]) -> Result<()> {
        let (config, q, model, policy, time_step): (DynaConfig, _, _, _, usize) =
            bincode::deserialize(blob)?;
        self.explorer = EpsilonGreedy::new(config.epsilon);
        self.rng = SmallRng::seed_from_u64(config.seed);
        self.config = config;
        self.q = q;
        self.model = model;
        self.policy = policy;
        self.time_step = time_step;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use tabula_core::dummy::{DummyConfig, DummyEnv};

    #[test]
    fn test_bonus_grows_with_elapsed_steps() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default(), 0)?;
        let mut agent = DynaQPlus::build(DynaConfig::default().kappa(0.5), env);
        agent.time_step = 16;
        assert_eq!(agent.bonus(16), 0.0);
        assert_eq!(agent.bonus(12), 1.0);
        assert_eq!(agent.bonus(0), 2.0);
        Ok(())
    }

    #[test]
    fn test_unvisited_actions_are_not_planned() -> Result<()> {
        let env = DummyEnv::build(&DummyConfig::default().length(3), 0)?;
        let config = DynaConfig::default().epsilon(0.0).n_planning_steps(10);
        let mut agent = DynaQPlus::build(config, env);
        agent.train(1)?;

        // Every sampled pair was taken for real, the others keep their initial value.
        let mut rng = SmallRng::seed_from_u64(0);
        let mut recorded = HashSet::new();
        for _ in 0..200 {
            if let Some((s, a, _)) = agent.model.sample(&mut rng) {
                recorded.insert((*s, *a));
            }
        }
        for s in 0..2 {
            for a in 0..2 {
                if !recorded.contains(&(s, a)) {
                    assert!(agent.q.get(&s, &a) == 0.0);
                }
            }
        }
        assert!(agent.time_step > 0);
        Ok(())
    }

    fn agent(kappa: f64) -> Result<DynaQPlus<DummyEnv>> {
        let env = DummyEnv::build(&DummyConfig::default().length(3), 0)?;
        let config = DynaConfig::default()
            .discount_factor(0.5)
            .learning_rate(1.0)
            .kappa(kappa)
            .n_planning_steps(1);
        Ok(DynaQPlus::build(config, env))
    }

    #[test]
    fn test_planning_adds_bonus_to_modelled_reward() -> Result<()> {
        let mut agent = agent(0.5)?;
        agent.model.record(&0, &1, 0.0, 1, 0);
        agent.q.set(&1, &1, 2.0);
        agent.time_step = 4;
        agent.plan();

        // 0.0 + 0.5 * sqrt(4 - 0) + 0.5 * 2.0
        assert_eq!(agent.q.get(&0, &1), 2.0);
        assert_eq!(agent.time_step, 4);
        let mut rng = SmallRng::seed_from_u64(0);
        let (_, _, transition) = agent.model.sample(&mut rng).expect("one recorded pair");
        assert_eq!(transition.visited_at, 0);
        Ok(())
    }

    #[test]
    fn test_real_steps_get_no_bonus() -> Result<()> {
        let mut agent = agent(10.0)?;
        agent.model.record(&0, &1, 0.0, 1, 0);
        agent.q.set(&1, &1, 2.0);
        agent.time_step = 100;
        agent.learn(&0, &1, 0.0, &1, false);

        // 0.0 + 0.5 * 2.0, the elapsed 100 steps add nothing.
        assert_eq!(agent.q.get(&0, &1), 1.0);
        let mut rng = SmallRng::seed_from_u64(0);
        let (_, _, transition) = agent.model.sample(&mut rng).expect("one recorded pair");
        assert_eq!(transition.visited_at, 100);
        Ok(())
    }
}
